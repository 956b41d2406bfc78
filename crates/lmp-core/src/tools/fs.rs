//! File system access for template loading and export.
//!
//! The loader only needs a handful of operations, so they sit behind
//! [`FsAdapter`] and tests can run against an in-memory tree.

use crate::error::Result;
use std::path::Path;

/// File system operations used by the template loader.
pub trait FsAdapter: Send + Sync {
    /// Reads a template file.
    ///
    /// # Errors
    ///
    /// Returns `LmpError::PathNotFound` if the file does not exist and
    /// `LmpError::FileReadError` for other failures.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Writes `content` to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `LmpError::PermissionDenied` or `LmpError::FileWriteError`.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Lists entry names (not full paths) of a directory.
    ///
    /// # Errors
    ///
    /// Returns `LmpError::PathNotFound` if the directory does not exist and
    /// `LmpError::InvalidPath` if `path` is not a directory.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
}
