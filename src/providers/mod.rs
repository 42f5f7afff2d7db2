//! Filesystem providers
//!
//! The listing and the file operations never call `std::fs` directly; they go
//! through the [`FileSystem`] trait so the engine can be driven against the
//! local disk or any other backend that can list, stat and mutate paths.

mod local;

pub use local::LocalProvider;

use crate::fs::{DirectoryEntry, EntryKind};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("I/O error: {0}")]
    Io(io::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Classify an I/O error that happened while touching `path`
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let shown = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => ProviderError::NotFound(shown),
            io::ErrorKind::PermissionDenied => ProviderError::PermissionDenied(shown),
            io::ErrorKind::AlreadyExists => ProviderError::AlreadyExists(shown),
            _ => ProviderError::Io(err),
        }
    }
}

impl From<io::Error> for ProviderError {
    fn from(err: io::Error) -> Self {
        ProviderError::Io(err)
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// How a path should be removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Remove directories together with their contents
    pub recursive: bool,
    /// Move to the trash / recycle bin instead of unlinking
    pub recoverable: bool,
}

/// Trait for filesystem backends
///
/// All paths are absolute. A missing path on `stat` is a normal answer
/// (`Ok(None)`), not an error.
pub trait FileSystem: Send {
    /// Kind of the entry at `path`, or None if nothing is there
    fn stat(&self, path: &Path) -> ProviderResult<Option<EntryKind>>;

    /// List directory contents (unsorted, no parent entry)
    fn read_dir(&self, path: &Path) -> ProviderResult<Vec<DirectoryEntry>>;

    /// Rename/move a file or directory
    fn rename(&mut self, from: &Path, to: &Path, overwrite: bool) -> ProviderResult<()>;

    /// Delete a file or directory
    fn delete(&mut self, path: &Path, options: DeleteOptions) -> ProviderResult<()>;

    /// Create a directory and any missing parents. Succeeds if it already exists.
    fn create_directory(&mut self, path: &Path) -> ProviderResult<()>;

    /// Write file contents, replacing any existing file
    fn write_file(&mut self, path: &Path, data: &[u8]) -> ProviderResult<()>;

    /// Read file contents
    fn read(&self, path: &Path) -> ProviderResult<Vec<u8>>;

    /// The user's home directory
    fn home_dir(&self) -> PathBuf;

    /// Convenience: does anything exist at `path`
    fn exists(&self, path: &Path) -> ProviderResult<bool> {
        Ok(self.stat(path)?.is_some())
    }
}
