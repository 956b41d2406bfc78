//! Template file parser.
//!
//! A template file is a sequence of records. Each record is a header block
//! between two fence lines followed by a free-form body:
//!
//! ```text
//! ---
//! name: Summarize
//! model: llama3
//! temperature: 0.1
//! ---
//! Summarize the following text:
//! $clipboard
//! ```
//!
//! Fences are `---` or `___` and are interchangeable. The fence that ends a
//! body opens the next record's header. Lines before the first fence are
//! ignored, and lines consisting only of an HTML comment are skipped in
//! both sections.

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::escape::unescape;
use crate::prompt::{ModelOptions, PasteMode, Prompt};
use regex::Regex;
use std::sync::LazyLock;

static COMMENT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!--.*-->$").expect("invalid comment line regex"));

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject records without a `name` header. When disabled such records
    /// get an empty name.
    pub require_name: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { require_name: true }
    }
}

/// Converts template text into [`Prompt`] records.
///
/// # Examples
///
/// ```
/// use lmp_pm::{ParseOptions, Parser};
///
/// let parser = Parser::new(ParseOptions { require_name: false });
/// let prompts = parser.parse("---\nmodel: llama3\n---\nHi")?;
/// assert_eq!(prompts[0].name, "");
/// # Ok::<(), lmp_pm::ParseError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    /// Creates a parser with the given options.
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parses every record in `text`.
    ///
    /// # Errors
    ///
    /// Any malformed record fails the whole input; no partial list is
    /// returned. See [`ParseErrorKind`] for the failure categories.
    pub fn parse(&self, text: &str) -> Result<Vec<Prompt>> {
        let lines: Vec<&str> = text.lines().collect();
        let mut prompts = Vec::new();

        let mut idx = lines
            .iter()
            .position(|line| is_fence(line))
            .unwrap_or(lines.len());

        while idx < lines.len() {
            let fence_line = idx + 1;
            idx += 1;

            let mut header = Header::default();
            let mut closed = false;
            while idx < lines.len() {
                if is_fence(lines[idx]) {
                    closed = true;
                    idx += 1;
                    break;
                }
                header.parse_line(lines[idx].trim(), idx + 1)?;
                idx += 1;
            }

            if !closed {
                return Err(ParseError::new(
                    ParseErrorKind::MissingClosingFence,
                    fence_line,
                    "header block is not closed by `---` or `___`",
                ));
            }

            let mut body = Vec::new();
            while idx < lines.len() && !is_fence(lines[idx]) {
                if !is_comment(lines[idx].trim()) {
                    body.push(lines[idx]);
                }
                idx += 1;
            }

            prompts.push(header.into_prompt(join_body(&body), fence_line, self.options)?);
        }

        Ok(prompts)
    }
}

/// Parses `text` with default options (names required).
///
/// # Examples
///
/// ```
/// use lmp_pm::parse_templates;
///
/// let prompts = parse_templates("---\nname: Greet\n---\nHello $input\n")?;
/// assert_eq!(prompts.len(), 1);
/// assert_eq!(prompts[0].prompt, "Hello $input");
/// # Ok::<(), lmp_pm::ParseError>(())
/// ```
///
/// # Errors
///
/// See [`Parser::parse`].
pub fn parse_templates(text: &str) -> Result<Vec<Prompt>> {
    Parser::default().parse(text)
}

/// Header fields collected for one record.
#[derive(Debug, Default)]
struct Header {
    name: Option<String>,
    model: Option<String>,
    extract: Option<String>,
    paste: Option<PasteMode>,
    options: ModelOptions,
}

impl Header {
    fn parse_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        if line.is_empty() || is_comment(line) {
            return Ok(());
        }

        let malformed = || ParseError::new(ParseErrorKind::MalformedHeader, line_no, line);
        let (key, value) = line.split_once(':').ok_or_else(malformed)?;
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            return Err(malformed());
        }

        match key {
            "name" => self.name = Some(value.to_string()),
            "model" => self.model = Some(value.to_string()),
            "extract" => {
                let pattern = unescape(value);
                if let Err(e) = Regex::new(&pattern) {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidExtractPattern,
                        line_no,
                        format!("{pattern}: {e}"),
                    ));
                }
                self.extract = Some(pattern);
            }
            "paste" => {
                let mode = value.parse::<PasteMode>().map_err(|detail| {
                    ParseError::new(ParseErrorKind::InvalidPastedValue, line_no, detail)
                })?;
                self.paste = Some(mode);
            }
            _ => {
                self.options.insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    fn into_prompt(self, body: String, fence_line: usize, options: ParseOptions) -> Result<Prompt> {
        let name = match self.name {
            Some(name) => name,
            None if options.require_name => {
                return Err(ParseError::new(
                    ParseErrorKind::MissingName,
                    fence_line,
                    "record has no `name` header",
                ));
            }
            None => String::new(),
        };

        Ok(Prompt {
            name,
            prompt: body,
            model: self.model,
            extract: self.extract,
            paste: self.paste,
            model_options: self.options,
            source_file: None,
        })
    }
}

fn is_fence(line: &str) -> bool {
    line == "---" || line == "___"
}

fn is_comment(line: &str) -> bool {
    COMMENT_LINE.is_match(line)
}

/// Joins body lines, dropping leading and trailing blank lines.
fn join_body(lines: &[&str]) -> String {
    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return String::new();
    };
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(start);
    lines[start..=end].join("\n")
}
