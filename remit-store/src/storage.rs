//! Key-value storage backends.
//!
//! Session, profile and device state live in a flat string-to-string map,
//! the same shape a browser's local storage offers. Three backends are
//! provided:
//!
//! - [`FileStore`] - JSON map on disk, written atomically
//! - [`MemoryStore`] - process-local map for tests and throwaway sessions
//! - [`crate::keychain::KeychainStore`] - system keychain, for secrets
//!
//! All operations are synchronous and serialized by a mutex, so every
//! `get`/`set`/`remove` is atomic with respect to other callers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::persistence::write_atomic;

// ============================================================================
// Key-Value Trait
// ============================================================================

/// Persistent string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - Value found
    /// * `Ok(None)` - No value stored under `key`
    /// * `Err(e)` - Backend failure
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes a value. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Memory Store
// ============================================================================

/// In-memory backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        lock(&self.values).len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        lock(&self.values).is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.values).remove(key);
        Ok(())
    }
}

// ============================================================================
// File Store
// ============================================================================

/// JSON-file backend.
///
/// The whole map is loaded on open and rewritten on every mutation. A
/// missing or corrupted file opens as an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = Self::read_map(&path);
        debug!(path = %path.display(), keys = values.len(), "Opened file store");

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(path: &Path) -> HashMap<String, String> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read storage file");
                return HashMap::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Corrupted storage file, starting empty");
            HashMap::new()
        })
    }

    fn flush(&self, values: &HashMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(values)?;
        write_atomic(&self.path, &json)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = lock(&self.values);
        let mut next = values.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *values = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = lock(&self.values);
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut next = values.clone();
        next.remove(key);
        self.flush(&next)?;
        *values = next;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.remove("k").unwrap();
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path);
        store.set("device_id", "abc").unwrap();
        drop(store);

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("device_id").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_store_corrupted_file_opens_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("access_token").unwrap(), None);

        // First write replaces the corrupted file.
        store.set("access_token", "t").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("access_token"));
    }

    #[test]
    fn test_file_store_remove_missing_does_not_create_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");

        let store = FileStore::open(&path);
        store.remove("nothing").unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_failed_write_leaves_map_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let store = FileStore::open(blocker.join("storage.json"));
        assert!(store.set("access_token", "t").is_err());
        assert_eq!(store.get("access_token").unwrap(), None);
    }

    #[test]
    fn test_file_store_failed_remove_keeps_value() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("state");
        let path = dir.join("storage.json");

        let store = FileStore::open(&path);
        store.set("access_token", "t").unwrap();

        // Swap the directory for a plain file so the next flush fails.
        std::fs::remove_dir_all(&dir).unwrap();
        std::fs::write(&dir, "").unwrap();

        assert!(store.remove("access_token").is_err());
        assert_eq!(store.get("access_token").unwrap().as_deref(), Some("t"));
    }
}
