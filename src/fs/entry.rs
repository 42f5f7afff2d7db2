//! Directory entry representation

use std::fs;
use std::path::Path;

/// Kind of a filesystem entry as far as the listing is concerned
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Classify from metadata that already followed symlinks
    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }

    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }
}

/// Represents a single file or directory inside the directory being rendered.
/// Created fresh on every render and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// File/directory name (no path separators)
    pub name: String,
    /// Whether this is a directory
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, EntryKind::File)
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, EntryKind::Directory)
    }

    /// Create a DirectoryEntry from a path.
    ///
    /// Symlinks are followed, so a link to a directory lists as a directory.
    /// Fails if the entry vanished or the link target is gone.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(Self {
            name,
            kind: EntryKind::from_metadata(&metadata),
        })
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_classifies_kind() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("a.txt"), "a").unwrap();

        let dir = DirectoryEntry::from_path(&tmp.path().join("sub")).unwrap();
        assert_eq!(dir, DirectoryEntry::directory("sub"));

        let file = DirectoryEntry::from_path(&tmp.path().join("a.txt")).unwrap();
        assert_eq!(file, DirectoryEntry::file("a.txt"));
    }

    #[test]
    fn test_from_path_missing_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(DirectoryEntry::from_path(&tmp.path().join("nope")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_directory_lists_as_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();

        let entry = DirectoryEntry::from_path(&tmp.path().join("link")).unwrap();
        assert_eq!(entry.kind, EntryKind::Directory);
        assert_eq!(entry.name, "link");
    }
}
