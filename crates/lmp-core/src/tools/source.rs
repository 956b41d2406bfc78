//! Value source trait for placeholder substitution.
//!
//! The substitution engine never talks to the user or the host directly.
//! Every interactive answer, register lookup and filetype query goes through
//! a [`ValueSource`], so hosts can plug in their own UI and tests can use a
//! scripted fake.

use crate::error::SourceError;
use async_trait::async_trait;
use std::fmt;

/// Result alias for value source calls.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Where the text for a `$select` placeholder comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectSource {
    /// The system clipboard (`$clipboard`).
    Clipboard,
    /// Free-text input (`$input`).
    Input,
    /// The last yanked text (`$yanked`).
    Yanked,
}

impl SelectSource {
    /// Choices offered for `$select`, in display order.
    pub const ALL: [SelectSource; 3] = [
        SelectSource::Clipboard,
        SelectSource::Input,
        SelectSource::Yanked,
    ];

    /// Placeholder that replaces `$select` once this source is chosen.
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            SelectSource::Clipboard => "$clipboard",
            SelectSource::Input => "$input",
            SelectSource::Yanked => "$yanked",
        }
    }

    /// Lowercase label shown to the user.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SelectSource::Clipboard => "clipboard",
            SelectSource::Input => "input",
            SelectSource::Yanked => "yanked",
        }
    }
}

impl fmt::Display for SelectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Capabilities the substitution engine needs from its host.
///
/// Each call resolves exactly once. Returning `Ok(None)` from an interactive
/// method means the user cancelled, which aborts the whole substitution.
#[async_trait]
pub trait ValueSource: Send + Sync {
    /// Asks the user for free text.
    ///
    /// # Arguments
    ///
    /// * `prompt` - Visible prompt, e.g. `"Input: "` or `"City: "`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the answer cannot be read.
    async fn input(&self, prompt: &str) -> SourceResult<Option<String>>;

    /// Asks the user to pick one of `choices`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the answer cannot be read.
    async fn choose(
        &self,
        prompt: &str,
        choices: &[SelectSource],
    ) -> SourceResult<Option<SelectSource>>;

    /// Returns the contents of register `name`. Unknown or unset registers
    /// yield an empty string.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the host cannot be queried.
    async fn register(&self, name: char) -> SourceResult<String>;

    /// Returns the filetype of the buffer the prompt runs against.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the host cannot be queried.
    async fn filetype(&self) -> SourceResult<String>;
}
