// src/storage.rs
use crate::errors::StorageError;
use crate::feed::FeedId;
use crate::lanes::LaneList;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const LANES_KEY: &str = "reddit_lanes_v1";

// ===== key-value store
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value under `key`. A write is all-or-nothing.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ===== File-backed store: one JSON object of key -> string
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/redlanes/store.json`
    pub fn default_path() -> Result<PathBuf, StorageError> {
        let base = dirs::config_dir().ok_or(StorageError::NoLocation)?;
        Ok(base.join("redlanes").join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("FileStore: discarding unreadable store {}: {}", self.path.display(), e);
                HashMap::new()
            }
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("FileStore: wrote {} to {}", key, self.path.display());
        Ok(())
    }
}

// ===== In-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::NoLocation)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::NoLocation)?;
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ===== Persistent lane list
pub struct LaneStore {
    store: Box<dyn KeyValueStore>,
}

impl LaneStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the saved list, or the default list when nothing usable is saved.
    pub fn load(&self) -> LaneList {
        match self.try_load() {
            Ok(Some(list)) => {
                info!("LaneStore: loaded {} lanes", list.len());
                list
            }
            Ok(None) => {
                debug!("LaneStore: nothing saved, using defaults");
                LaneList::default_lanes()
            }
            Err(e) => {
                warn!("LaneStore: falling back to defaults: {}", e);
                LaneList::default_lanes()
            }
        }
    }

    fn try_load(&self) -> Result<Option<LaneList>, StorageError> {
        let Some(raw) = self.store.get(LANES_KEY)? else {
            return Ok(None);
        };
        let ids: Vec<FeedId> = serde_json::from_str(&raw)?;
        if ids.is_empty() {
            return Ok(None);
        }
        Ok(Some(LaneList::new(ids)))
    }

    pub fn save(&mut self, list: &LaneList) -> Result<(), StorageError> {
        let raw = serde_json::to_string(list.ids())?;
        self.store.set(LANES_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &LaneList) -> Vec<&str> {
        list.ids().iter().map(FeedId::as_str).collect()
    }

    #[test]
    fn load_returns_saved_list() {
        let store = MemoryStore::with_value(LANES_KEY, r#"["rust","zig","Golang"]"#);
        let lanes = LaneStore::new(Box::new(store)).load();
        assert_eq!(names(&lanes), vec!["rust", "zig", "Golang"]);
    }

    #[test]
    fn load_falls_back_to_defaults_for_unusable_values() {
        let cases = ["", "not json", "{}", "[]", "[1,2]", r#"[""]"#, "null", r#""rust""#];
        for raw in cases {
            let store = MemoryStore::with_value(LANES_KEY, raw);
            let lanes = LaneStore::new(Box::new(store)).load();
            assert_eq!(lanes, LaneList::default_lanes(), "value {:?}", raw);
        }
    }

    #[test]
    fn load_with_empty_store_uses_defaults() {
        let lanes = LaneStore::new(Box::new(MemoryStore::new())).load();
        assert_eq!(names(&lanes), vec!["learnprogramming", "javascript"]);
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        let mut lanes = LaneStore::new(Box::new(store.clone()));
        let list = LaneList::new(vec![
            FeedId::parse("typescript").unwrap(),
            FeedId::parse("Rust").unwrap(),
        ]);
        lanes.save(&list).unwrap();

        assert_eq!(store.get(LANES_KEY).unwrap().as_deref(), Some(r#"["typescript","Rust"]"#));
        assert_eq!(names(&lanes.load()), vec!["typescript", "Rust"]);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut first = LaneStore::new(Box::new(FileStore::new(&path)));
        first.save(&LaneList::new(vec![FeedId::parse("rust").unwrap()])).unwrap();

        let second = LaneStore::new(Box::new(FileStore::new(&path)));
        assert_eq!(names(&second.load()), vec!["rust"]);
    }

    #[test]
    fn file_store_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{{{ garbage").unwrap();

        let mut lanes = LaneStore::new(Box::new(FileStore::new(&path)));
        assert_eq!(lanes.load(), LaneList::default_lanes());

        lanes.save(&LaneList::new(vec![FeedId::parse("zig").unwrap()])).unwrap();
        assert_eq!(names(&lanes.load()), vec!["zig"]);
    }
}
