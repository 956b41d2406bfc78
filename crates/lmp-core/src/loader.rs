//! Loading template files into a [`PromptCollection`].
//!
//! Every file is parsed on its own. A file that fails to parse is reported
//! and skipped; the remaining files still load.

use crate::config::LmpConfig;
use crate::error::{LmpError, Result};
use crate::tools::fs::FsAdapter;
use globset::{Glob, GlobMatcher};
use lmp_pm::{ParseOptions, Parser, Prompt, PromptCollection, write_templates};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A template file that could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    /// The skipped file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub error: LmpError,
}

/// Result of scanning the configured template directories.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Prompts from every file that parsed.
    pub prompts: PromptCollection,
    /// Files that were skipped.
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// Whether every file loaded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads all template files found in `config.template_dirs`.
///
/// Directories are scanned in order and files within a directory by name.
/// Missing directories are skipped with a warning.
///
/// # Errors
///
/// Returns `LmpError::InvalidPattern` if `config.pattern` is not a valid
/// glob. Unreadable directories and per-file failures are collected in
/// [`LoadReport::failures`] instead.
#[tracing::instrument(skip_all, fields(dirs = config.template_dirs.len()))]
pub fn load_templates(config: &LmpConfig, fs: &dyn FsAdapter) -> Result<LoadReport> {
    let matcher = compile_pattern(&config.pattern)?;
    let options = config.parse_options();
    let mut report = LoadReport::default();

    for dir in &config.template_dirs {
        if !fs.is_dir(dir) {
            warn!(dir = %dir.display(), "template directory not found, skipping");
            continue;
        }

        let mut names = match fs.list_dir(dir) {
            Ok(names) => names,
            Err(error) => {
                warn!(dir = %dir.display(), %error, "cannot list template directory, skipping");
                report.failures.push(LoadFailure {
                    path: dir.clone(),
                    error,
                });
                continue;
            }
        };
        names.sort();

        for name in names.into_iter().filter(|n| matcher.is_match(n)) {
            let path = dir.join(&name);
            if !fs.is_file(&path) {
                continue;
            }
            match load_file(&path, fs, options) {
                Ok(prompts) => {
                    debug!(path = %path.display(), count = prompts.len(), "loaded templates");
                    report.prompts = report.prompts.merged(prompts, config.merge);
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping template file");
                    report.failures.push(LoadFailure { path, error });
                }
            }
        }
    }

    info!(
        prompts = report.prompts.len(),
        failures = report.failures.len(),
        "templates loaded"
    );
    Ok(report)
}

/// Loads one template file; every record gets `source_file` set.
///
/// # Errors
///
/// Returns `LmpError::Parse` with the file path and line number if the file
/// is malformed, or the adapter's error if it cannot be read.
pub fn load_file(
    path: &Path,
    fs: &dyn FsAdapter,
    options: ParseOptions,
) -> Result<PromptCollection> {
    let text = fs.read_to_string(path)?;
    let prompts = Parser::new(options)
        .parse(&text)
        .map_err(|source| LmpError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(prompts
        .into_iter()
        .map(|mut prompt| {
            prompt.source_file = Some(path.to_path_buf());
            prompt
        })
        .collect())
}

/// Writes every persistable prompt into a single template file.
///
/// Prompts without a source file (the dot prompt, scratch prompts) are
/// skipped. Returns how many prompts were written.
///
/// # Errors
///
/// Returns the adapter's error if the file cannot be written.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn export_templates<'a>(
    path: &Path,
    prompts: impl IntoIterator<Item = &'a Prompt>,
    fs: &dyn FsAdapter,
) -> Result<usize> {
    let persistable: Vec<&Prompt> = prompts.into_iter().filter(|p| p.is_persistable()).collect();
    fs.write(path, &write_templates(persistable.iter().copied()))?;
    info!(count = persistable.len(), "exported templates");
    Ok(persistable.len())
}

fn compile_pattern(pattern: &str) -> Result<GlobMatcher> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| LmpError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fs_mock::MockFsAdapter;
    use lmp_pm::MergePolicy;

    fn config(dirs: &[&str]) -> LmpConfig {
        let mut config = LmpConfig::new(PathBuf::from("/work"));
        config.template_dirs = dirs.iter().map(PathBuf::from).collect();
        config
    }

    #[test]
    fn test_bad_file_is_skipped_others_load() {
        let fs = MockFsAdapter::new();
        fs.add_file("/p/a.md", "---\nname: A\n---\nalpha");
        fs.add_file("/p/b.md", "---\nname: B\nnot a header\n---\nbeta");
        fs.add_file("/p/c.md", "---\nname: C\n---\ngamma");

        let report = load_templates(&config(&["/p"]), &fs).unwrap();

        assert_eq!(report.prompts.names(), vec!["A", "C"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, PathBuf::from("/p/b.md"));
        match &report.failures[0].error {
            LmpError::Parse { source, .. } => assert_eq!(source.line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_pattern_filters_files_and_sets_source() {
        let fs = MockFsAdapter::new();
        fs.add_file("/p/keep.md", "---\nname: Keep\n---\n");
        fs.add_file("/p/notes.txt", "---\nbroken\n");

        let report = load_templates(&config(&["/p"]), &fs).unwrap();
        assert!(report.is_clean());
        let keep = report.prompts.get("Keep").unwrap();
        assert_eq!(keep.source_file.as_deref(), Some(Path::new("/p/keep.md")));
    }

    #[test]
    fn test_missing_directory_is_skipped() {
        let fs = MockFsAdapter::new();
        fs.add_file("/p/a.md", "---\nname: A\n---\n");

        let report = load_templates(&config(&["/missing", "/p"]), &fs).unwrap();
        assert_eq!(report.prompts.len(), 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_merge_policy_across_directories() {
        let fs = MockFsAdapter::new();
        fs.add_file("/base/x.md", "---\nname: Fix\n---\nbase");
        fs.add_file("/user/x.md", "---\nname: Fix\n---\nuser");

        let mut cfg = config(&["/base", "/user"]);
        let report = load_templates(&cfg, &fs).unwrap();
        assert_eq!(report.prompts.len(), 2);
        assert_eq!(report.prompts.get("Fix").unwrap().prompt, "base");

        cfg.merge = MergePolicy::ReplaceByName;
        let report = load_templates(&cfg, &fs).unwrap();
        assert_eq!(report.prompts.len(), 1);
        assert_eq!(report.prompts.get("Fix").unwrap().prompt, "user");
    }

    #[test]
    fn test_lenient_names_follow_config() {
        let fs = MockFsAdapter::new();
        fs.add_file("/p/a.md", "---\nmodel: m\n---\nbody");

        let mut cfg = config(&["/p"]);
        assert_eq!(load_templates(&cfg, &fs).unwrap().failures.len(), 1);

        cfg.require_name = false;
        let report = load_templates(&cfg, &fs).unwrap();
        assert_eq!(report.prompts.names(), vec![""]);
    }

    #[test]
    fn test_unlistable_directory_is_reported_others_load() {
        // the path exists, so it is not skipped as missing, but cannot be listed
        let fs = FailingListFs(MockFsAdapter::new());
        fs.0.add_file("/p/a.md", "---\nname: A\n---\nalpha");
        fs.0.add_dir("/locked");

        let report = load_templates(&config(&["/locked", "/p"]), &fs).unwrap();

        assert_eq!(report.prompts.names(), vec!["A"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, PathBuf::from("/locked"));
        assert!(matches!(
            report.failures[0].error,
            LmpError::PermissionDenied(_)
        ));
    }

    /// Mock tree whose `/locked` directory refuses to be listed.
    struct FailingListFs(MockFsAdapter);

    impl FsAdapter for FailingListFs {
        fn read_to_string(&self, path: &Path) -> Result<String> {
            self.0.read_to_string(path)
        }

        fn write(&self, path: &Path, content: &str) -> Result<()> {
            self.0.write(path, content)
        }

        fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
            if path == Path::new("/locked") {
                return Err(LmpError::PermissionDenied(path.display().to_string()));
            }
            self.0.list_dir(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.0.is_dir(path)
        }

        fn is_file(&self, path: &Path) -> bool {
            self.0.is_file(path)
        }
    }

    #[test]
    fn test_invalid_pattern() {
        let mut cfg = config(&["/p"]);
        cfg.pattern = "[".to_string();
        let err = load_templates(&cfg, &MockFsAdapter::new()).unwrap_err();
        assert!(matches!(err, LmpError::InvalidPattern { .. }));
    }

    #[test]
    fn test_export_skips_synthetic_prompts() {
        let fs = MockFsAdapter::new();
        fs.add_file("/p/a.md", "---\nname: A\nmodel: m\n---\nalpha\n");
        let report = load_templates(&config(&["/p"]), &fs).unwrap();

        let dot = Prompt::ephemeral(lmp_pm::DOT_PROMPT_NAME, "last run");
        let all: Vec<&Prompt> = report.prompts.iter().chain([&dot]).collect();

        let written = export_templates(Path::new("/out/all.md"), all, &fs).unwrap();
        assert_eq!(written, 1);
        assert_eq!(
            fs.file("/out/all.md").as_deref(),
            Some("---\nname: A\nmodel: m\n---\nalpha\n")
        );
    }
}
