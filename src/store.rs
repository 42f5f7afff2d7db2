//! Persistent key-value storage for session-independent state.
//!
//! Values are flat string tables stored under a namespaced key. The TOML
//! backend keeps each key as a table in `state.toml`, so the file stays
//! readable and hand-editable.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use toml_edit::{DocumentMut, Item, Table, value};

use crate::errors::{AppError, AppResult};

/// A flat name -> value mapping
pub type FlatTable = BTreeMap<String, String>;

pub trait KeyValueStore: Send {
    /// Table stored under `key`; empty when nothing was stored yet
    fn get(&self, key: &str) -> AppResult<FlatTable>;

    /// Replace the table stored under `key`
    fn set(&mut self, key: &str, table: &FlatTable) -> AppResult<()>;
}

/// Store backed by a TOML file, one table per key.
///
/// Writes go through `toml_edit` so comments and unrelated tables in the
/// file are preserved.
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
}

impl TomlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_document(&self) -> AppResult<DocumentMut> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(DocumentMut::new()),
            Err(e) => return Err(AppError::Store(format!("{}: {}", self.path.display(), e))),
        };
        content
            .parse::<DocumentMut>()
            .map_err(|e| AppError::Store(format!("{}: {}", self.path.display(), e)))
    }
}

impl KeyValueStore for TomlStore {
    fn get(&self, key: &str) -> AppResult<FlatTable> {
        let doc = self.load_document()?;
        let Some(table) = doc.get(key).and_then(Item::as_table_like) else {
            return Ok(FlatTable::new());
        };

        let mut out = FlatTable::new();
        for (name, item) in table.iter() {
            match item.as_str() {
                Some(s) => {
                    out.insert(name.to_string(), s.to_string());
                }
                None => tracing::warn!("{}: ignoring non-string entry {}.{}", self.path.display(), key, name),
            }
        }
        Ok(out)
    }

    fn set(&mut self, key: &str, table: &FlatTable) -> AppResult<()> {
        let mut doc = self.load_document()?;

        let mut tbl = Table::new();
        for (name, val) in table {
            tbl.insert(name, value(val.as_str()));
        }
        doc.insert(key, Item::Table(tbl));

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, doc.to_string())
            .map_err(|e| AppError::Store(format!("{}: {}", self.path.display(), e)))?;
        tracing::debug!("stored {} entr(ies) under [{}]", table.len(), key);
        Ok(())
    }
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, FlatTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<FlatTable> {
        Ok(self.tables.get(key).cloned().unwrap_or_default())
    }

    fn set(&mut self, key: &str, table: &FlatTable) -> AppResult<()> {
        self.tables.insert(key.to_string(), table.clone());
        Ok(())
    }
}
