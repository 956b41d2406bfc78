//! Configuration for template loading and sessions.
//!
//! Defaults are derived from a root directory. An optional
//! `.lmp/config.toml` under that root overrides individual settings:
//!
//! ```toml
//! template_dirs = ["prompts", "/home/me/.config/lmp/prompts"]
//! pattern = "*.md"
//! require_name = true
//! merge = "replace"
//! default_model = "llama3"
//! ```

use crate::error::{LmpError, Result};
use lmp_pm::{MergePolicy, ParseOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main LMP configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LmpConfig {
    /// Root directory the relative paths resolve against.
    pub root: PathBuf,

    /// Path to the configuration file (`.lmp/config.toml`).
    pub config_file: PathBuf,

    /// Directories scanned for template files, in load order.
    pub template_dirs: Vec<PathBuf>,

    /// Glob matched against file names inside `template_dirs`.
    pub pattern: String,

    /// Reject template records without a `name` header.
    pub require_name: bool,

    /// How same-name prompts from different files combine.
    pub merge: MergePolicy,

    /// Model used when a prompt does not name one.
    pub default_model: Option<String>,
}

/// On-disk shape of `.lmp/config.toml`; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    template_dirs: Option<Vec<PathBuf>>,
    pattern: Option<String>,
    require_name: Option<bool>,
    merge: Option<MergePolicy>,
    default_model: Option<String>,
}

impl LmpConfig {
    /// Creates a configuration with defaults derived from `root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lmp_core::LmpConfig;
    /// use std::path::PathBuf;
    ///
    /// let config = LmpConfig::new(PathBuf::from("/work"));
    /// assert_eq!(config.template_dirs, vec![PathBuf::from("/work/prompts")]);
    /// assert_eq!(config.pattern, "*.md");
    /// assert!(config.require_name);
    /// ```
    pub fn new(root: PathBuf) -> Self {
        Self {
            config_file: root.join(".lmp").join("config.toml"),
            template_dirs: vec![root.join("prompts")],
            pattern: "*.md".to_string(),
            require_name: true,
            merge: MergePolicy::default(),
            default_model: None,
            root,
        }
    }

    /// Loads `.lmp/config.toml` under `root`, falling back to defaults for
    /// anything the file does not set. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `LmpError::ConfigParseError` for malformed TOML or unknown
    /// keys, and `LmpError::FileReadError` if the file cannot be read.
    pub fn load(root: PathBuf) -> Result<Self> {
        let mut config = Self::new(root);
        if !config.config_file.is_file() {
            tracing::debug!(
                path = %config.config_file.display(),
                "no config file, using defaults"
            );
            return Ok(config);
        }

        let text = std::fs::read_to_string(&config.config_file).map_err(|e| {
            LmpError::FileReadError(format!("{}: {e}", config.config_file.display()))
        })?;
        config.apply_toml(&text)?;
        Ok(config)
    }

    /// Applies overrides from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `LmpError::ConfigParseError` if the text is not a valid
    /// configuration.
    pub fn apply_toml(&mut self, text: &str) -> Result<()> {
        let file: FileConfig = toml::from_str(text).map_err(|e| {
            LmpError::ConfigParseError(format!("{}: {e}", self.config_file.display()))
        })?;

        if let Some(dirs) = file.template_dirs {
            self.template_dirs = dirs.into_iter().map(|d| self.resolve(&d)).collect();
        }
        if let Some(pattern) = file.pattern {
            self.pattern = pattern;
        }
        if let Some(require_name) = file.require_name {
            self.require_name = require_name;
        }
        if let Some(merge) = file.merge {
            self.merge = merge;
        }
        if file.default_model.is_some() {
            self.default_model = file.default_model;
        }
        Ok(())
    }

    /// Appends an extra template directory (e.g. from the command line).
    #[must_use]
    pub fn with_template_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = self.resolve(dir.as_ref());
        self.template_dirs.push(dir);
        self
    }

    /// Parser options implied by this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            require_name: self.require_name,
        }
    }

    fn resolve(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        }
    }
}
