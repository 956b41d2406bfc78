//! Backslash escaping for header values.
//!
//! Header values live on a single line, so control characters and quotes are
//! stored as two-character escape sequences:
//!
//! | literal         | escaped |
//! |-----------------|---------|
//! | newline         | `\n`    |
//! | carriage return | `\r`    |
//! | tab             | `\t`    |
//! | backslash       | `\\`    |
//! | double quote    | `\"`    |
//! | single quote    | `\'`    |
//!
//! [`unescape`] keeps unknown sequences such as `\d` untouched, which lets
//! regular expressions be written naturally in `extract` headers.

/// Escapes control characters, backslashes and quotes.
///
/// # Examples
///
/// ```
/// use lmp_pm::escape::escape;
///
/// assert_eq!(escape("a\tb\n"), r"a\tb\n");
/// assert_eq!(escape(r"\d"), r"\\d");
/// ```
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            other => out.push(other),
        }
    }
    out
}

/// Reverses [`escape`].
///
/// # Examples
///
/// ```
/// use lmp_pm::escape::unescape;
///
/// assert_eq!(unescape(r"line\nnext"), "line\nnext");
/// assert_eq!(unescape(r"\d+"), r"\d+");
/// assert_eq!(unescape(r"\\d+"), r"\d+");
/// ```
#[must_use]
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            // trailing lone backslash
            None => out.push('\\'),
        }
    }
    out
}
