//! Key-value persistence for navigation configuration and publication flags.
//!
//! Values are opaque strings; callers serialize their own records. Backends:
//! a JSON file on disk and an in-memory map for tests.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::warn;

use crate::path_processing::{env_or_config_path, expand_tilde};

/// Environment variable controlling the store file location.
pub const STORE_PATH_ENV: &str = "SELFTAPE_STORE_PATH";

/// Default filename for the persisted store.
pub const STORE_FILE_NAME: &str = "store.json";

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure while reading or writing the store file.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Shared trait implemented by persistence backends.
///
/// Writes are durable once `set`/`remove` return. A read never observes a
/// partially written value.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Fully replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// JSON-backed store persisted as a single object of string values.
///
/// Every read goes back to disk so that edits made by another process are
/// picked up on the next load; concurrent writers follow last-write-wins.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store at the provided path (or the default path when omitted).
    pub fn new<P: Into<Option<PathBuf>>>(path: P) -> Self {
        let path = match path.into() {
            Some(path) => expand_tilde(&path.to_string_lossy()),
            None => default_store_path(),
        };
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(None::<PathBuf>)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<IndexMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<IndexMap<String, String>>(&content) {
                Ok(entries) => Ok(entries),
                Err(error) => {
                    warn!(
                        path = %self.path.display(),
                        error = %error,
                        "Failed to parse store file; treating it as empty"
                    );
                    Ok(IndexMap::new())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(IndexMap::new()),
            Err(error) => Err(StoreError::Io(error)),
        }
    }

    fn write_entries(&self, entries: &IndexMap<String, String>) -> Result<(), StoreError> {
        let parent_directory = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()).unwrap_or(Path::new("."));
        fs::create_dir_all(parent_directory)?;
        let content = serde_json::to_string_pretty(entries)?;

        let temp_path = build_temp_store_path(parent_directory);
        let mut temp_file = File::create(&temp_path)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.sync_all()?;
        drop(temp_file);

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut IndexMap<String, String>) -> bool) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");
        let mut entries = self.read_entries()?;
        if apply(&mut entries) {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| entries.shift_remove(key).is_some())
    }
}

/// In-memory store primarily used for unit testing.
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    writes: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set`/`remove` calls observed so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().expect("store lock poisoned").keys().cloned().collect()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().expect("store lock poisoned").get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().expect("store lock poisoned").insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().expect("store lock poisoned").remove(key);
        Ok(())
    }
}

pub fn default_store_path() -> PathBuf {
    env_or_config_path(STORE_PATH_ENV, STORE_FILE_NAME)
}

fn build_temp_store_path(parent_directory: &Path) -> PathBuf {
    let process_identifier = std::process::id();
    let timestamp_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or_default();
    parent_directory.join(format!(".selftape-store-{process_identifier}-{timestamp_nanos}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn in_memory_store_round_trip() {
        let store = InMemoryStore::new();
        assert!(store.get("selftape.nav.actor").unwrap().is_none());

        store.set("selftape.nav.actor", "[]").unwrap();
        assert_eq!(store.get("selftape.nav.actor").unwrap().as_deref(), Some("[]"));
        store.remove("selftape.nav.actor").unwrap();
        assert!(store.get("selftape.nav.actor").unwrap().is_none());
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn json_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let store = JsonFileStore::new(Some(path.clone()));
        store.set("selftape.publication", r#"{"coursesPublished":true}"#).unwrap();
        drop(store);

        let reopened = JsonFileStore::new(Some(path));
        assert_eq!(
            reopened.get("selftape.publication").unwrap().as_deref(),
            Some(r#"{"coursesPublished":true}"#)
        );
    }

    #[test]
    fn json_store_sees_writes_from_another_handle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let reader = JsonFileStore::new(Some(path.clone()));
        let writer = JsonFileStore::new(Some(path));

        assert!(reader.get("key").unwrap().is_none());
        writer.set("key", "first").unwrap();
        assert_eq!(reader.get("key").unwrap().as_deref(), Some("first"));
        writer.set("key", "second").unwrap();
        assert_eq!(reader.get("key").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn invalid_json_reads_as_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(Some(path));
        assert!(store.get("selftape.nav.actor").unwrap().is_none());
        store.set("selftape.nav.actor", "{}").unwrap();
        assert_eq!(store.get("selftape.nav.actor").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn removing_missing_key_does_not_create_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::new(Some(path.clone()));
        store.remove("absent").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn concurrent_writes_keep_every_key() {
        let dir = tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(Some(dir.path().join("store.json"))));
        let mut handles = Vec::new();
        for index in 0..5 {
            let handle_store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                handle_store.set(&format!("key{index}"), &index.to_string()).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        for index in 0..5 {
            assert_eq!(store.get(&format!("key{index}")).unwrap(), Some(index.to_string()));
        }
    }

    #[test]
    fn default_path_honors_env_override() {
        temp_env::with_var(STORE_PATH_ENV, Some("~/custom/store.json"), || {
            assert_eq!(default_store_path(), expand_tilde("~/custom/store.json"));
        });
    }
}
