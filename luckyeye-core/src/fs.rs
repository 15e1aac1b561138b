//! Filesystem abstractions used by rules and project detection.

use std::path::Path;

use crate::error::Result;

/// Abstraction over filesystem access for testability.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem {
    /// Whether a regular file exists at the path.
    fn is_file(&self, path: &Path) -> bool;
    /// Read a file into a string.
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// Default filesystem implementation backed by `std::fs`.
#[derive(Debug, Default, Clone)]
pub struct StdFileSystem;

impl StdFileSystem {
    /// Create a new standard filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for StdFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }
}
