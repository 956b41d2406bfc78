//! Error types for LMP operations.
//!
//! [`LmpError`] covers loading, configuration and session failures.
//! Substitution has its own error type, [`SubstituteError`], because one of
//! its outcomes (user cancellation) is not a failure and callers usually
//! want to treat it silently.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by a [`ValueSource`](crate::tools::source::ValueSource).
#[derive(Error, Debug)]
pub enum SourceError {
    /// Reading the user's answer failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Source-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Outcome of a substitution that did not produce a final string.
#[derive(Error, Debug)]
pub enum SubstituteError {
    /// The user cancelled an interactive step.
    #[error("cancelled")]
    Cancelled,

    /// A referenced register holds no text.
    #[error("{} is empty", label_of(.register))]
    EmptyRegister {
        /// Register name as written after `$register_`.
        register: char,
    },

    /// The value source itself failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl SubstituteError {
    /// Whether the user aborted; such outcomes need no error message.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SubstituteError::Cancelled)
    }
}

/// Human-readable name of a register.
///
/// # Examples
///
/// ```
/// use lmp_core::error::register_label;
///
/// assert_eq!(register_label('+'), "Clipboard");
/// assert_eq!(register_label('0'), "Yanked text");
/// assert_eq!(register_label('a'), "Register a");
/// ```
#[must_use]
pub fn register_label(register: char) -> String {
    match register {
        '+' => "Clipboard".to_string(),
        '0' => "Yanked text".to_string(),
        other => format!("Register {other}"),
    }
}

fn label_of(register: &char) -> String {
    register_label(*register)
}

/// Comprehensive error types for LMP operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum LmpError {
    // Template errors
    /// A template file failed to parse.
    #[error("{}: {source}", .path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Parser error with line number.
        #[source]
        source: lmp_pm::ParseError,
    },

    /// No prompt with the given name is loaded.
    #[error("prompt not found: {0}")]
    PromptNotFound(String),

    /// Substitution failed or was cancelled.
    #[error(transparent)]
    Substitute(#[from] SubstituteError),

    // File system errors
    /// Path not found in the file system.
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    /// Invalid path provided.
    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),

    /// Error reading file.
    #[error("file read error: {0}")]
    FileReadError(String),

    /// Error writing file.
    #[error("file write error: {0}")]
    FileWriteError(String),

    /// Permission denied for the specified operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    // Config errors
    /// Error parsing configuration file.
    #[error("config parse error: {0}")]
    ConfigParseError(String),

    /// Template file pattern is not a valid glob.
    #[error("invalid template pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Pattern from the configuration.
        pattern: String,
        /// Glob compiler message.
        reason: String,
    },
}

impl LmpError {
    /// Whether this error is a user cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LmpError::Substitute(e) if e.is_cancelled())
    }
}

/// Result type alias for LMP operations.
pub type Result<T> = std::result::Result<T, LmpError>;
