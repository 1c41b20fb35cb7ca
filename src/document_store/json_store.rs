//! A small document store persisted as a single JSON file.
//!
//! The file holds one object per table, each mapping the stringified
//! integer document id to the document itself:
//!
//! ```json
//! {"content": {"1": {"name": "imported-a.jpg"}}, "playlists": {}}
//! ```
//!
//! Ids are assigned as `max(existing) + 1`, so ascending id order is the
//! insertion order.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type DocId = u64;
pub type Document = Map<String, Value>;

type Table = BTreeMap<DocId, Document>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed store file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct JsonDocumentStore {
    /// None for in-memory stores, which never touch the disk.
    path: Option<PathBuf>,
    tables: BTreeMap<String, Table>,
}

impl JsonDocumentStore {
    /// Opens the store at `path`, creating an empty one if the file is
    /// missing or empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let existed = path.exists();
        let tables = if existed {
            let raw = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                    path: path.clone(),
                    source,
                })?
            }
        } else {
            BTreeMap::new()
        };

        let store = Self {
            path: Some(path),
            tables,
        };
        if !existed {
            store.persist()?;
        }
        Ok(store)
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            tables: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Inserts a document and returns its newly assigned id.
    pub fn insert(&mut self, table: &str, doc: Document) -> Result<DocId, StoreError> {
        let entries = self.tables.entry(table.to_owned()).or_default();
        let id = entries.keys().next_back().map(|last| last + 1).unwrap_or(1);
        entries.insert(id, doc);
        self.persist()?;
        Ok(id)
    }

    /// All documents of a table in ascending id order.
    pub fn all(&self, table: &str) -> Vec<(DocId, Document)> {
        self.tables
            .get(table)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(id, doc)| (*id, doc.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, table: &str, id: DocId) -> Option<&Document> {
        self.tables.get(table)?.get(&id)
    }

    /// First document (lowest id) whose `field` equals `value` exactly.
    pub fn find_first(&self, table: &str, field: &str, value: &Value) -> Option<(DocId, &Document)> {
        self.tables
            .get(table)?
            .iter()
            .find(|(_, doc)| doc.get(field) == Some(value))
            .map(|(id, doc)| (*id, doc))
    }

    /// Merges `fields` into every document whose `field` equals `value`.
    /// Existing keys are overwritten, other keys are left alone.
    /// Returns the ids of the updated documents.
    pub fn update_where(
        &mut self,
        table: &str,
        field: &str,
        value: &Value,
        fields: &Document,
    ) -> Result<Vec<DocId>, StoreError> {
        let mut updated = Vec::new();
        if let Some(entries) = self.tables.get_mut(table) {
            for (id, doc) in entries.iter_mut() {
                if doc.get(field) != Some(value) {
                    continue;
                }
                for (key, new_value) in fields {
                    doc.insert(key.clone(), new_value.clone());
                }
                updated.push(*id);
            }
        }
        if !updated.is_empty() {
            self.persist()?;
        }
        Ok(updated)
    }

    pub fn len(&self, table: &str) -> usize {
        self.tables.get(table).map(BTreeMap::len).unwrap_or(0)
    }

    /// Writes the whole store to a temp file next to the target and renames
    /// it into place.
    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(io_err)?;

        let json = serde_json::to_string(&self.tables)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}
