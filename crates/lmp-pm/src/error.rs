//! Error types for the template parser crate.

/// Category of a template parse failure.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Header line is not of the form `key: value`.
    #[error("malformed header option")]
    MalformedHeader,

    /// Record has no `name` header.
    #[error("missing prompt name")]
    MissingName,

    /// Header block runs to the end of input without a closing fence.
    #[error("missing closing header line")]
    MissingClosingFence,

    /// Deprecated `paste` header holds a value outside `after`, `before`, `replace`.
    #[error("invalid paste value")]
    InvalidPastedValue,

    /// `extract` header does not compile as a regular expression.
    #[error("invalid extract pattern")]
    InvalidExtractPattern,
}

/// A template file could not be parsed.
///
/// Parsing is all-or-nothing: a single error discards every record of the
/// input text. `line` is 1-based and `detail` carries the offending text so
/// the user can locate the problem in the source file.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {line}: {detail}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// 1-based line number in the parsed text.
    pub line: usize,
    /// Offending content or additional context.
    pub detail: String,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, line: usize, detail: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            detail: detail.into(),
        }
    }
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_line_and_detail() {
        let err = ParseError::new(ParseErrorKind::MalformedHeader, 3, "no colon here");
        assert_eq!(
            err.to_string(),
            "malformed header option at line 3: no colon here"
        );
    }
}
