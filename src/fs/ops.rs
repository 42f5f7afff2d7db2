//! Filesystem operations

use std::fs;
use std::io;
use std::path::Path;

use super::entry::DirectoryEntry;

/// Read directory contents and return a list of DirectoryEntry.
///
/// Entries that disappear between enumeration and stat (or dangling links)
/// are dropped without being reported.
pub fn read_directory(path: &Path) -> io::Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        match DirectoryEntry::from_path(&entry.path()) {
            Ok(dir_entry) => entries.push(dir_entry),
            Err(e) => {
                tracing::debug!("skipping {:?}: {}", entry.path(), e);
            }
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::EntryKind;

    #[test]
    fn test_read_directory_lists_children() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("d")).unwrap();
        std::fs::write(tmp.path().join("a.txt"), "").unwrap();

        let mut entries = read_directory(tmp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].name, "d");
        assert_eq!(entries[1].kind, EntryKind::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn test_read_directory_drops_dangling_links() {
        let tmp = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(tmp.path().join("missing"), tmp.path().join("dangling")).unwrap();
        std::fs::write(tmp.path().join("ok.txt"), "").unwrap();

        let entries = read_directory(tmp.path()).unwrap();
        assert_eq!(entries, vec![DirectoryEntry::file("ok.txt")]);
    }

    #[test]
    fn test_read_directory_missing_dir_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(read_directory(&tmp.path().join("nope")).is_err());
    }
}
