//! String-valued key/value storage for persisted panel state.
//!
//! The host settings backend is an external collaborator; this trait is the
//! seam. Two implementations ship with the crate: an in-memory store used by
//! tests and headless runs, and a JSON file store for the CLI.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Backend holding string settings by key.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` means the key has never been written.
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set_string(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    writes: usize,
    fail_reads: bool,
    fail_writes: bool,
}

/// In-memory store.
///
/// Clones share the same storage, so a test can hand one clone to a
/// tracker and inspect writes through another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one value.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .inner
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Current value for `key`, bypassing failure simulation.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.borrow().values.get(key).cloned()
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    /// Make subsequent reads fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.borrow_mut().fail_reads = fail;
    }

    /// Make subsequent writes fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        let inner = self.inner.borrow();
        if inner.fail_reads {
            return Err(Error::read(key, "store unavailable"));
        }
        Ok(inner.values.get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(Error::write(key, "store unavailable"));
        }
        inner.values.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}

/// Settings file holding one JSON object of string values.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// original, so a crash mid-write leaves the previous contents intact.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self, key: &str) -> Result<Map<String, Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(Error::read(key, e)),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(Error::read(key, "settings file is not a JSON object")),
            Err(e) => Err(Error::read(key, e)),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        let map = self.read_all(key)?;
        match map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(Error::read(key, "value is not a string")),
        }
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut map = self.read_all(key).unwrap_or_default();
        map.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::write(key, e))?;
            }
        }
        let body = serde_json::to_string_pretty(&Value::Object(map)).map_err(|e| Error::write(key, e))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body).map_err(|e| Error::write(key, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| Error::write(key, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip_and_sharing() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.set_string("k", "v").unwrap();
        assert_eq!(store.get_string("k").unwrap(), Some("v".to_string()));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_memory_store_failures() {
        let mut store = MemoryStore::with_value("k", "v");
        store.set_fail_reads(true);
        assert!(matches!(store.get_string("k"), Err(Error::PersistenceRead { .. })));
        store.set_fail_writes(true);
        assert!(matches!(store.set_string("k", "w"), Err(Error::PersistenceWrite { .. })));
        assert_eq!(store.value("k"), Some("v".to_string()));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_json_file_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("settings.json"));
        assert_eq!(store.get_string("emoji-usage").unwrap(), None);
    }

    #[test]
    fn test_json_file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut store = JsonFileStore::new(&path);
        store.set_string("a", "1").unwrap();
        store.set_string("b", "2").unwrap();
        assert_eq!(store.get_string("a").unwrap(), Some("1".to_string()));
        assert_eq!(store.get_string("b").unwrap(), Some("2".to_string()));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_json_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(store.get_string("a").is_err());
        store.set_string("a", "fresh").unwrap();
        assert_eq!(store.get_string("a").unwrap(), Some("fresh".to_string()));
    }
}
