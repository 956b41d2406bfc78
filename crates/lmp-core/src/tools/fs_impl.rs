//! [`FsAdapter`] backed by `std::fs`.

use crate::error::{LmpError, Result};
use crate::tools::fs::FsAdapter;
use std::io::ErrorKind;
use std::path::Path;

/// Real file system access.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFsAdapter;

impl StdFsAdapter {
    /// Creates the adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FsAdapter for StdFsAdapter {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LmpError::PathNotFound(path.to_path_buf()),
            _ => LmpError::FileReadError(format!("{}: {e}", path.display())),
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let write_error = |e: std::io::Error| match e.kind() {
            ErrorKind::PermissionDenied => LmpError::PermissionDenied(path.display().to_string()),
            _ => LmpError::FileWriteError(format!("{}: {e}", path.display())),
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, content).map_err(write_error)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            return Err(LmpError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(LmpError::InvalidPath(path.to_path_buf()));
        }

        let read_error =
            |e: std::io::Error| LmpError::FileReadError(format!("{}: {e}", path.display()));
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path).map_err(read_error)? {
            let entry = entry.map_err(read_error)?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
