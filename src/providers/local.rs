//! Local filesystem provider

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::fs::{DirectoryEntry, EntryKind};
use super::{DeleteOptions, FileSystem, ProviderError, ProviderResult};

/// Provider for local filesystem operations
#[derive(Debug, Clone)]
pub struct LocalProvider {
    /// Whether recoverable deletes go to the system trash
    use_trash: bool,
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalProvider {
    /// Create a new local provider
    pub fn new() -> Self {
        Self { use_trash: true }
    }

    /// Enable or disable the system trash for recoverable deletes.
    /// When disabled, recoverable deletes unlink permanently.
    pub fn with_trash(mut self, use_trash: bool) -> Self {
        self.use_trash = use_trash;
        self
    }

    fn remove_permanently(path: &Path, kind: EntryKind, recursive: bool) -> io::Result<()> {
        match (kind, recursive) {
            (EntryKind::Directory, true) => fs::remove_dir_all(path),
            (EntryKind::Directory, false) => fs::remove_dir(path),
            (EntryKind::File, _) => fs::remove_file(path),
        }
    }
}

impl FileSystem for LocalProvider {
    fn stat(&self, path: &Path) -> ProviderResult<Option<EntryKind>> {
        match fs::metadata(path) {
            Ok(meta) => Ok(Some(EntryKind::from_metadata(&meta))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ProviderError::from_io(e, path)),
        }
    }

    fn read_dir(&self, path: &Path) -> ProviderResult<Vec<DirectoryEntry>> {
        crate::fs::read_directory(path).map_err(|e| ProviderError::from_io(e, path))
    }

    fn rename(&mut self, from: &Path, to: &Path, overwrite: bool) -> ProviderResult<()> {
        if !overwrite && fs::symlink_metadata(to).is_ok() {
            return Err(ProviderError::AlreadyExists(to.display().to_string()));
        }
        fs::rename(from, to).map_err(|e| ProviderError::from_io(e, from))
    }

    fn delete(&mut self, path: &Path, options: DeleteOptions) -> ProviderResult<()> {
        // symlink_metadata so a link is removed, not its target
        let meta = fs::symlink_metadata(path).map_err(|e| ProviderError::from_io(e, path))?;
        let kind = if meta.is_dir() { EntryKind::Directory } else { EntryKind::File };

        if options.recoverable && self.use_trash {
            if kind.is_dir() && !options.recursive && fs::read_dir(path)?.next().is_some() {
                return Err(ProviderError::Other(format!(
                    "Directory not empty: {}",
                    path.display()
                )));
            }
            return trash::delete(path).map_err(|e| ProviderError::Other(e.to_string()));
        }

        Self::remove_permanently(path, kind, options.recursive)
            .map_err(|e| ProviderError::from_io(e, path))
    }

    fn create_directory(&mut self, path: &Path) -> ProviderResult<()> {
        fs::create_dir_all(path).map_err(|e| ProviderError::from_io(e, path))
    }

    fn write_file(&mut self, path: &Path, data: &[u8]) -> ProviderResult<()> {
        fs::write(path, data).map_err(|e| ProviderError::from_io(e, path))
    }

    fn read(&self, path: &Path) -> ProviderResult<Vec<u8>> {
        fs::read(path).map_err(|e| ProviderError::from_io(e, path))
    }

    fn home_dir(&self) -> PathBuf {
        #[cfg(unix)]
        {
            std::env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("/"))
        }
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\"))
        }
        #[cfg(not(any(unix, windows)))]
        {
            PathBuf::from("/")
        }
    }
}
