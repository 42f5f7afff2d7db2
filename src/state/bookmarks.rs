//! Named directory bookmarks, persisted through a key-value store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::AppResult;
use crate::store::{FlatTable, KeyValueStore};

/// Key under which the bookmark table is stored
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// Register -> absolute path table.
///
/// The cache is loaded once from the store; every change is written back
/// immediately.
pub struct BookmarkRegistry {
    store: Box<dyn KeyValueStore>,
    entries: BTreeMap<String, PathBuf>,
}

impl BookmarkRegistry {
    pub fn load(store: Box<dyn KeyValueStore>) -> AppResult<Self> {
        let entries = store
            .get(BOOKMARKS_KEY)?
            .into_iter()
            .map(|(register, path)| (register, PathBuf::from(path)))
            .collect();
        Ok(Self { store, entries })
    }

    /// Upsert a bookmark. An existing register is overwritten silently.
    pub fn save(&mut self, register: &str, path: &Path) -> AppResult<()> {
        if let Some(old) = self.entries.insert(register.to_string(), path.to_path_buf()) {
            tracing::debug!("bookmark '{}' overwritten (was {:?})", register, old);
        }
        self.persist()
    }

    /// Remove a bookmark; unknown registers are ignored
    pub fn delete(&mut self, register: &str) -> AppResult<()> {
        if self.entries.remove(register).is_none() {
            return Ok(());
        }
        self.persist()
    }

    pub fn lookup(&self, register: &str) -> Option<&Path> {
        self.entries.get(register).map(PathBuf::as_path)
    }

    /// All bookmarks, ordered by register
    pub fn list(&self) -> Vec<(String, PathBuf)> {
        self.entries
            .iter()
            .map(|(register, path)| (register.clone(), path.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&mut self) -> AppResult<()> {
        let table: FlatTable = self
            .entries
            .iter()
            .map(|(register, path)| (register.clone(), path.to_string_lossy().into_owned()))
            .collect();
        self.store.set(BOOKMARKS_KEY, &table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, TomlStore};

    fn registry() -> BookmarkRegistry {
        BookmarkRegistry::load(Box::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_save_list_delete() {
        let mut bookmarks = registry();
        bookmarks.save("w", Path::new("/proj")).unwrap();
        assert!(bookmarks.list().contains(&("w".to_string(), PathBuf::from("/proj"))));

        bookmarks.delete("w").unwrap();
        assert!(!bookmarks.list().iter().any(|(register, _)| register == "w"));
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_save_overwrites_silently() {
        let mut bookmarks = registry();
        bookmarks.save("w", Path::new("/one")).unwrap();
        bookmarks.save("w", Path::new("/two")).unwrap();
        assert_eq!(bookmarks.list(), vec![("w".to_string(), PathBuf::from("/two"))]);
        assert_eq!(bookmarks.lookup("w"), Some(Path::new("/two")));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut bookmarks = registry();
        bookmarks.save("a", Path::new("/a")).unwrap();
        bookmarks.delete("zzz").unwrap();
        assert_eq!(bookmarks.list().len(), 1);
    }

    #[test]
    fn test_bookmarks_survive_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("state.toml");

        let mut bookmarks = BookmarkRegistry::load(Box::new(TomlStore::new(&path))).unwrap();
        bookmarks.save("w", Path::new("/proj")).unwrap();
        bookmarks.save("h", Path::new("/home/me")).unwrap();
        bookmarks.delete("h").unwrap();
        drop(bookmarks);

        let reloaded = BookmarkRegistry::load(Box::new(TomlStore::new(&path))).unwrap();
        assert_eq!(reloaded.list(), vec![("w".to_string(), PathBuf::from("/proj"))]);
    }
}
