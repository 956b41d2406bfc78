//! The parsed prompt record.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Name of the "last executed prompt" pseudo-entry.
pub const DOT_PROMPT_NAME: &str = ".";

/// Header keys assigned to dedicated [`Prompt`] fields instead of
/// [`Prompt::model_options`].
pub const RESERVED_KEYS: [&str; 4] = ["name", "model", "extract", "paste"];

/// Extra header fields handed to the model backend untouched.
pub type ModelOptions = BTreeMap<String, String>;

/// Where a response should be inserted relative to the selection.
///
/// Set through the deprecated `paste` header; kept so old template files
/// keep parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasteMode {
    /// Insert after the selection.
    After,
    /// Insert before the selection.
    Before,
    /// Replace the selection.
    Replace,
}

impl PasteMode {
    /// Header spelling of this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PasteMode::After => "after",
            PasteMode::Before => "before",
            PasteMode::Replace => "replace",
        }
    }
}

impl fmt::Display for PasteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PasteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "after" => Ok(PasteMode::After),
            "before" => Ok(PasteMode::Before),
            "replace" => Ok(PasteMode::Replace),
            other => Err(format!(
                "'{other}' (expected one of: after, before, replace)"
            )),
        }
    }
}

/// One prompt template.
///
/// Records produced by the parser always carry a valid `extract` pattern
/// and never hold a reserved key in `model_options`.
///
/// # Examples
///
/// ```
/// use lmp_pm::Prompt;
///
/// let prompt = Prompt::ephemeral("scratch", "Explain $input");
/// assert_eq!(prompt.name, "scratch");
/// assert!(!prompt.is_persistable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Identifier used for lookup.
    pub name: String,

    /// Template body, may contain placeholders.
    pub prompt: String,

    /// Backend model to use, if the template names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Regular expression applied to responses, stored unescaped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<String>,

    /// Deprecated insertion mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paste: Option<PasteMode>,

    /// Non-reserved header fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub model_options: ModelOptions,

    /// File the record was loaded from. `None` for synthetic prompts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,
}

impl Prompt {
    /// Creates a prompt with the given name and body and no metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            model: None,
            extract: None,
            paste: None,
            model_options: ModelOptions::new(),
            source_file: None,
        }
    }

    /// Wraps scratch content in a prompt that is never written to disk.
    #[must_use]
    pub fn ephemeral(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(name, prompt)
    }

    /// Sets the backend model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Adds a model option.
    ///
    /// Reserved keys are ignored so that `model_options` never shadows a
    /// dedicated field.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if !is_reserved_key(&key) {
            self.model_options.insert(key, value.into());
        }
        self
    }

    /// Whether the record belongs to a template file.
    #[must_use]
    pub fn is_persistable(&self) -> bool {
        self.source_file.is_some()
    }

    /// Whether this is the "last executed prompt" pseudo-entry.
    #[must_use]
    pub fn is_dot(&self) -> bool {
        self.name == DOT_PROMPT_NAME
    }

    /// Compiles the `extract` pattern.
    ///
    /// Returns `None` when the prompt has no pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex error for hand-built prompts with a bad pattern.
    /// Parsed prompts are validated up front and always succeed.
    pub fn extract_regex(&self) -> Option<Result<Regex, regex::Error>> {
        self.extract.as_deref().map(Regex::new)
    }
}

/// Returns `true` for header keys that map to dedicated fields.
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_option_skips_reserved_keys() {
        let prompt = Prompt::new("a", "body")
            .with_option("temperature", "0.2")
            .with_option("model", "llama3")
            .with_option("name", "other");

        assert_eq!(prompt.model_options.len(), 1);
        assert_eq!(prompt.model_options["temperature"], "0.2");
        assert_eq!(prompt.name, "a");
        assert!(prompt.model.is_none());
    }

    #[test]
    fn test_paste_mode_from_str() {
        assert_eq!("after".parse::<PasteMode>(), Ok(PasteMode::After));
        assert_eq!("replace".parse::<PasteMode>(), Ok(PasteMode::Replace));
        assert!("inline".parse::<PasteMode>().is_err());
    }

    #[test]
    fn test_extract_regex_compiles_on_demand() {
        let mut prompt = Prompt::new("a", "");
        assert!(prompt.extract_regex().is_none());

        prompt.extract = Some(r"```(\w+)".to_string());
        let regex = prompt.extract_regex().unwrap().unwrap();
        assert!(regex.is_match("```rust"));
    }

    #[test]
    fn test_dot_prompt_detection() {
        assert!(Prompt::ephemeral(DOT_PROMPT_NAME, "x").is_dot());
        assert!(!Prompt::new("dot", "x").is_dot());
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let json = serde_json::to_value(Prompt::new("a", "b")).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "a", "prompt": "b" }));
    }
}
