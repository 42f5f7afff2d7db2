//! Directory listing: the text that represents a directory, and the mapping
//! from each line back to a filesystem path.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};
use crate::fs::utils::{dirname, join, strip_trailing_slash};
use crate::fs::{DirectoryEntry, EntryKind};
use crate::providers::FileSystem;

/// The synthetic line standing for the enclosing directory
pub const PARENT_SENTINEL: &str = "../";

/// A rendered directory: one line per entry, directories first, with the
/// parent sentinel on line 0 unless the directory is the filesystem root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    dir: PathBuf,
    lines: Vec<String>,
}

impl Listing {
    /// Render `dir` through the filesystem provider.
    ///
    /// Fails with `NotFound` if `dir` is missing or is not a directory.
    pub fn render(fs: &dyn FileSystem, dir: &Path) -> AppResult<Self> {
        match fs.stat(dir)? {
            Some(EntryKind::Directory) => {}
            _ => return Err(AppError::NotFound(dir.to_path_buf())),
        }
        let entries = fs.read_dir(dir)?;
        let listing = Self::from_entries(dir, entries);
        tracing::debug!("rendered {:?}: {} line(s)", dir, listing.len());
        Ok(listing)
    }

    /// Build a listing from already-enumerated entries
    pub fn from_entries(dir: &Path, mut entries: Vec<DirectoryEntry>) -> Self {
        entries.sort_by(compare_entries);

        let has_parent = dirname(dir) != dir;
        let mut lines = Vec::with_capacity(entries.len() + usize::from(has_parent));
        if has_parent {
            lines.push(PARENT_SENTINEL.to_string());
        }
        lines.extend(entries.iter().map(render_line));

        Self {
            dir: dir.to_path_buf(),
            lines,
        }
    }

    /// Directory this listing was rendered from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether line 0 is the parent sentinel
    pub fn has_parent(&self) -> bool {
        self.lines.first().is_some_and(|l| is_parent_sentinel(l))
    }

    /// Absolute path the line at `index` stands for
    pub fn path_at(&self, index: usize) -> Option<PathBuf> {
        self.line(index).map(|line| line_to_path(&self.dir, line))
    }

    /// Index of the first line with exactly this text
    pub fn position(&self, line: &str) -> Option<usize> {
        self.lines.iter().position(|l| l == line)
    }

    /// Index of the entry line resolving to `path`. The parent sentinel
    /// never matches.
    pub fn position_of_path(&self, path: &Path) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !is_parent_sentinel(line))
            .find(|(_, line)| line_to_path(&self.dir, line).as_path() == path)
            .map(|(i, _)| i)
    }
}

/// Directories before files, then case-sensitive name order
fn compare_entries(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    b.is_dir().cmp(&a.is_dir()).then_with(|| a.name.cmp(&b.name))
}

/// Text of the line representing an entry
pub fn render_line(entry: &DirectoryEntry) -> String {
    match entry.kind {
        EntryKind::Directory => format!("{}/", entry.name),
        EntryKind::File => entry.name.clone(),
    }
}

/// Absolute path a listing line stands for
pub fn line_to_path(dir: &Path, line: &str) -> PathBuf {
    join(dir, strip_trailing_slash(line))
}

pub fn is_parent_sentinel(line: &str) -> bool {
    line == PARENT_SENTINEL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::LocalProvider;
    use proptest::prelude::*;

    fn workspace(files: &[&str]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for name in files {
            let path = tmp.path().join(name);
            if name.ends_with('/') {
                std::fs::create_dir_all(&path).unwrap();
            } else {
                std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                std::fs::write(&path, name).unwrap();
            }
        }
        tmp
    }

    #[test]
    fn test_render_orders_directories_first() {
        let tmp = workspace(&[".git/", ".env", "a.txt", "b.txt", "c.txt", "d/d1.txt", "e/"]);
        let listing = Listing::render(&LocalProvider::new(), tmp.path()).unwrap();
        assert_eq!(
            listing.lines(),
            &["../", ".git/", "d/", "e/", ".env", "a.txt", "b.txt", "c.txt"]
        );
    }

    #[test]
    fn test_render_nested_directory() {
        let tmp = workspace(&["a.txt", "d/d1.txt"]);
        let fs = LocalProvider::new();
        let root = Listing::render(&fs, tmp.path()).unwrap();
        assert_eq!(root.lines(), &["../", "d/", "a.txt"]);

        let d = root.path_at(root.position("d/").unwrap()).unwrap();
        let inner = Listing::render(&fs, &d).unwrap();
        assert_eq!(inner.lines(), &["../", "d1.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_root_has_no_parent_sentinel() {
        let listing = Listing::render(&LocalProvider::new(), Path::new("/")).unwrap();
        assert!(!listing.has_parent());
        assert!(listing.position(PARENT_SENTINEL).is_none());
    }

    #[test]
    fn test_render_missing_is_not_found() {
        let tmp = workspace(&["a.txt"]);
        let fs = LocalProvider::new();
        assert!(matches!(
            Listing::render(&fs, &tmp.path().join("gone")),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            Listing::render(&fs, &tmp.path().join("a.txt")),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_case_sensitive_ordering() {
        let listing = Listing::from_entries(
            Path::new("/w"),
            vec![
                DirectoryEntry::file("b"),
                DirectoryEntry::file("B"),
                DirectoryEntry::file("a"),
                DirectoryEntry::directory("Z"),
            ],
        );
        assert_eq!(listing.lines(), &["../", "Z/", "B", "a", "b"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_line_to_path() {
        let dir = Path::new("/w/sub");
        assert_eq!(line_to_path(dir, "d/"), PathBuf::from("/w/sub/d"));
        assert_eq!(line_to_path(dir, "a.txt"), PathBuf::from("/w/sub/a.txt"));
        assert_eq!(line_to_path(dir, "../"), PathBuf::from("/w"));
    }

    #[cfg(unix)]
    #[test]
    fn test_position_of_path_skips_sentinel() {
        let listing = Listing::from_entries(
            Path::new("/w/d"),
            vec![DirectoryEntry::file("a"), DirectoryEntry::directory("e")],
        );
        assert_eq!(listing.position_of_path(Path::new("/w")), None);
        assert_eq!(listing.position_of_path(Path::new("/w/d/e")), Some(1));
        assert_eq!(listing.position_of_path(Path::new("/w/d/a")), Some(2));
    }

    #[test]
    fn test_is_parent_sentinel() {
        assert!(is_parent_sentinel("../"));
        assert!(!is_parent_sentinel(".."));
        assert!(!is_parent_sentinel("a/"));
    }

    fn arb_entry() -> impl Strategy<Value = DirectoryEntry> {
        ("[a-zA-Z0-9._-]{1,8}", any::<bool>()).prop_map(|(name, is_dir)| {
            let kind = if is_dir { EntryKind::Directory } else { EntryKind::File };
            DirectoryEntry::new(name, kind)
        })
    }

    fn unique_entries() -> impl Strategy<Value = Vec<DirectoryEntry>> {
        prop::collection::vec(arb_entry(), 0..24).prop_map(|mut entries| {
            let mut seen = std::collections::HashSet::new();
            entries.retain(|e| e.name != "." && e.name != ".." && seen.insert(e.name.clone()));
            entries
        })
    }

    proptest! {
        #[test]
        fn prop_directories_precede_files_in_name_order(entries in unique_entries()) {
            let listing = Listing::from_entries(Path::new("/w"), entries);
            let body = &listing.lines()[1..];
            let first_file = body.iter().position(|l| !l.ends_with('/')).unwrap_or(body.len());
            prop_assert!(body[first_file..].iter().all(|l| !l.ends_with('/')));
            let names: Vec<&str> = body.iter().map(|l| strip_trailing_slash(l)).collect();
            prop_assert!(names[..first_file].windows(2).all(|w| w[0] < w[1]));
            prop_assert!(names[first_file..].windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn prop_line_to_path_inverts_rendering(entries in unique_entries()) {
            let dir = Path::new("/w/sub");
            let listing = Listing::from_entries(dir, entries.clone());
            for entry in &entries {
                let line = render_line(entry);
                prop_assert!(listing.position(&line).is_some());
                prop_assert_eq!(line_to_path(dir, &line), join(dir, &entry.name));
            }
        }

        #[test]
        fn prop_sentinel_iff_not_root(entries in unique_entries()) {
            let listing = Listing::from_entries(Path::new("/w"), entries.clone());
            prop_assert!(listing.has_parent());
            let root = Listing::from_entries(Path::new("/"), entries);
            prop_assert!(!root.has_parent());
        }
    }
}
