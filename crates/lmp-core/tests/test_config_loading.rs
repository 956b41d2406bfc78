//! Integration tests for configuration loading and management.
//!
//! Tests config file parsing, defaults, and loading behavior.

use lmp_core::{LmpConfig, LmpError};
use lmp_pm::MergePolicy;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_load_defaults_when_missing() {
    let temp_dir = TempDir::new().unwrap();

    // Load config when file doesn't exist
    let config = LmpConfig::load(temp_dir.path().to_path_buf()).unwrap();

    assert_eq!(config.root, temp_dir.path().to_path_buf());
    assert_eq!(config.template_dirs, vec![temp_dir.path().join("prompts")]);
    assert_eq!(config.pattern, "*.md");
    assert!(config.require_name);
    assert_eq!(config.merge, MergePolicy::Accumulate);
    assert_eq!(config.default_model, None);
}

#[test]
fn test_config_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let lmp_dir = temp_dir.path().join(".lmp");
    fs::create_dir_all(&lmp_dir).unwrap();

    let config_content = r#"
template_dirs = ["prompts", "shared"]
pattern = "*.prompt.md"
require_name = false
merge = "replace"
default_model = "llama3"
"#;
    fs::write(lmp_dir.join("config.toml"), config_content).unwrap();

    let config = LmpConfig::load(temp_dir.path().to_path_buf()).unwrap();

    assert_eq!(
        config.template_dirs,
        vec![
            temp_dir.path().join("prompts"),
            temp_dir.path().join("shared")
        ]
    );
    assert_eq!(config.pattern, "*.prompt.md");
    assert!(!config.require_name);
    assert_eq!(config.merge, MergePolicy::ReplaceByName);
    assert_eq!(config.default_model.as_deref(), Some("llama3"));
}

#[test]
fn test_config_invalid_toml_fails() {
    let temp_dir = TempDir::new().unwrap();
    let lmp_dir = temp_dir.path().join(".lmp");
    fs::create_dir_all(&lmp_dir).unwrap();

    fs::write(lmp_dir.join("config.toml"), "invalid { toml").unwrap();

    let err = LmpConfig::load(temp_dir.path().to_path_buf()).unwrap_err();
    assert!(matches!(err, LmpError::ConfigParseError(_)));
}

#[test]
fn test_config_partial_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let lmp_dir = temp_dir.path().join(".lmp");
    fs::create_dir_all(&lmp_dir).unwrap();

    fs::write(lmp_dir.join("config.toml"), "merge = \"replace\"\n").unwrap();

    let config = LmpConfig::load(temp_dir.path().to_path_buf()).unwrap();

    // Overridden value
    assert_eq!(config.merge, MergePolicy::ReplaceByName);

    // Default values preserved
    assert_eq!(config.pattern, "*.md");
    assert_eq!(config.template_dirs, vec![temp_dir.path().join("prompts")]);
}

#[test]
fn test_config_root_is_not_overridable() {
    let temp_dir = TempDir::new().unwrap();
    let lmp_dir = temp_dir.path().join(".lmp");
    fs::create_dir_all(&lmp_dir).unwrap();

    fs::write(lmp_dir.join("config.toml"), "root = \"/some/other/path\"\n").unwrap();

    let result = LmpConfig::load(temp_dir.path().to_path_buf());
    assert!(matches!(result, Err(LmpError::ConfigParseError(_))));
}
