//! Durable key-value storage for the saved gallery.
//!
//! The gallery persists as a single JSON array under one storage key
//! (`savedQRs` by default). Two layers live here:
//!
//! - [`KeyValueStore`]: a synchronous string-to-string store.
//!   [`FileStore`] keeps every key in one JSON object file and replaces the
//!   file through a temp-file rename, so each `set` is a whole-file swap.
//!   [`MemoryStore`] backs tests and throwaway sessions.
//! - [`RecordStore`]: the saved list on top of a key. Loading never fails:
//!   a missing key, an unreadable file or a payload that is not a JSON array
//!   all read as an empty gallery.
//!
//! ## Corrupt entries
//!
//! Entries without an `id` are skipped by [`RecordStore::load`] and so never
//! shown or counted. They are *not* purged: [`RecordStore::load_raw`] returns
//! them and writers put them back untouched. Nothing compacts the list
//! implicitly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One saved artifact as persisted: `{id, img, text, date}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord {
    /// Millisecond timestamp, unique within the list.
    pub id: i64,
    /// PNG as a `data:image/png;base64,...` URL.
    #[serde(default)]
    pub img: String,
    /// Content the symbol encodes.
    #[serde(default)]
    pub text: String,
    /// Local creation date for display.
    #[serde(default)]
    pub date: String,
}

impl SavedRecord {
    /// Parse a raw stored entry, rejecting entries without a usable `id`.
    ///
    /// Any other field that is missing or not a string reads as empty.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let field = |name: &str| {
            entry
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(Self {
            id: entry_id(entry)?,
            img: field("img"),
            text: field("text"),
            date: field("date"),
        })
    }
}

/// The `id` of a raw entry, if it has an integer one.
pub fn entry_id(entry: &Value) -> Option<i64> {
    entry.get("id").and_then(Value::as_i64)
}

/// Synchronous string key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-process store; contents vanish with the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// All keys in one JSON object file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(StoreError::Json(e)) => {
                warn!(path = %self.path.display(), "store file unreadable, starting over: {e}");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string(&map)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// The saved gallery list stored under one key.
#[derive(Debug)]
pub struct RecordStore<S> {
    kv: S,
    key: String,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Every stored entry, including ones [`load`](Self::load) would skip.
    ///
    /// Never fails: unreadable or unparsable payloads read as empty.
    pub fn load_raw(&self) -> Vec<Value> {
        let payload = match self.kv.get(&self.key) {
            Ok(Some(p)) => p,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, "failed to read saved list: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Value>>(&payload) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(key = %self.key, "saved list is not a JSON array: {e}");
                Vec::new()
            }
        }
    }

    /// Valid records, in stored order (most recent first).
    pub fn load(&self) -> Vec<SavedRecord> {
        let raw = self.load_raw();
        let records: Vec<SavedRecord> = raw.iter().filter_map(SavedRecord::from_entry).collect();
        if records.len() != raw.len() {
            debug!(
                skipped = raw.len() - records.len(),
                "skipping saved entries without an id"
            );
        }
        records
    }

    /// Replace the whole stored list.
    pub fn save_all(&mut self, entries: &[Value]) -> Result<(), StoreError> {
        let payload = serde_json::to_string(entries)?;
        self.kv.set(&self.key, payload)
    }
}
