//! Swappable persistence backends for client state.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not read or write its medium.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be serialized or deserialized.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend's internal lock was poisoned.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A key-value store for serialized state lists.
///
/// Mirrors the shape of browser local storage: string keys, string values,
/// explicit removal. Implementations must tolerate concurrent readers; the
/// stores in this crate serialize their own writes.
pub trait Storage: Send + Sync {
    /// Load the serialized value under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Persist `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn store(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage with local-storage semantics.
///
/// State lives only as long as the instance; clearing it is equivalent to a
/// shopper clearing their browser storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every stored value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if the internal lock is poisoned.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.values
            .lock()
            .map_err(|_| StorageError::Poisoned)?
            .clear();
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// File-backed storage keeping one JSON document per key.
///
/// Suitable for a desktop or kiosk client where state should survive
/// restarts. Keys map to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.load("cart").unwrap().is_none());

        storage.store("cart", "[1,2,3]").unwrap();
        assert_eq!(storage.load("cart").unwrap().as_deref(), Some("[1,2,3]"));

        storage.remove("cart").unwrap();
        assert!(storage.load("cart").unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_clear() {
        let storage = MemoryStorage::new();
        storage.store("cart", "[]").unwrap();
        storage.store("wishlist", "[]").unwrap();
        storage.clear().unwrap();
        assert!(storage.load("cart").unwrap().is_none());
        assert!(storage.load("wishlist").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path()).unwrap();

        assert!(storage.load("compareList").unwrap().is_none());
        storage.store("compareList", "[7]").unwrap();
        assert_eq!(storage.load("compareList").unwrap().as_deref(), Some("[7]"));

        // A second instance over the same directory sees the value.
        let other = JsonFileStorage::new(dir.path()).unwrap();
        assert_eq!(other.load("compareList").unwrap().as_deref(), Some("[7]"));

        storage.remove("compareList").unwrap();
        assert!(storage.load("compareList").unwrap().is_none());

        // Removing a missing key is not an error.
        storage.remove("compareList").unwrap();
    }
}
