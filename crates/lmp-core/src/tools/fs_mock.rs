//! In-memory [`FsAdapter`] for tests.

use crate::error::{LmpError, Result};
use crate::tools::fs::FsAdapter;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory file tree.
///
/// Directories exist implicitly as ancestors of stored files, or explicitly
/// through [`MockFsAdapter::add_dir`].
///
/// # Examples
///
/// ```
/// use lmp_core::tools::fs::FsAdapter;
/// use lmp_core::tools::fs_mock::MockFsAdapter;
/// use std::path::Path;
///
/// let fs = MockFsAdapter::new();
/// fs.add_file("/prompts/a.md", "---\nname: A\n---\n");
/// assert!(fs.is_dir(Path::new("/prompts")));
/// assert_eq!(fs.list_dir(Path::new("/prompts")).unwrap(), vec!["a.md"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFsAdapter {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    dirs: Arc<Mutex<Vec<PathBuf>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockFsAdapter {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a file.
    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        lock(&self.files).insert(path.into(), content.into());
    }

    /// Registers an empty directory.
    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut dirs = lock(&self.dirs);
        if !dirs.contains(&path) {
            dirs.push(path);
        }
    }

    /// Returns a file's content, if present.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        lock(&self.files).get(path.as_ref()).cloned()
    }
}

impl FsAdapter for MockFsAdapter {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.file(path)
            .ok_or_else(|| LmpError::PathNotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.add_file(path, content);
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        if self.is_file(path) {
            return Err(LmpError::InvalidPath(path.to_path_buf()));
        }
        if !self.is_dir(path) {
            return Err(LmpError::PathNotFound(path.to_path_buf()));
        }

        let mut names: Vec<String> = Vec::new();
        let files = lock(&self.files);
        let dirs = lock(&self.dirs);
        let children = files.keys().chain(dirs.iter()).filter_map(|p| {
            // direct children plus the first component of deeper paths
            let rest = p.strip_prefix(path).ok()?;
            rest.components()
                .next()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
        });
        for name in children {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn is_dir(&self, path: &Path) -> bool {
        lock(&self.dirs).iter().any(|d| d.starts_with(path))
            || lock(&self.files)
                .keys()
                .any(|f| f != path && f.starts_with(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        lock(&self.files).contains_key(path)
    }
}
