//! Session record storage.
//!
//! A [`SessionStore`] is a small string-keyed JSON document, the shape of
//! browser local storage. The signed-in user lives under
//! [`session_keys::USER`](crate::models::session_keys::USER).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

/// Errors from reading or writing session records.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key/value storage for the session record.
pub trait SessionStore: Send {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get_value(&self, key: &str) -> Result<Option<Value>, SessionStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn insert_value(&mut self, key: &str, value: Value) -> Result<(), SessionStoreError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), SessionStoreError>;
}

/// Typed access on top of any [`SessionStore`].
pub trait SessionStoreExt: SessionStore {
    /// Read and deserialize the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage fails or the value has the wrong shape.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionStoreError> {
        self.get_value(key)?
            .map(serde_json::from_value)
            .transpose()
            .map_err(SessionStoreError::from)
    }

    /// Serialize and store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage fails.
    fn insert<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), SessionStoreError> {
        let value = serde_json::to_value(value)?;
        self.insert_value(key, value)
    }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}

/// Session records kept in memory, lost when the process exits.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    entries: BTreeMap<String, Value>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_value(&self, key: &str) -> Result<Option<Value>, SessionStoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn insert_value(&mut self, key: &str, value: Value) -> Result<(), SessionStoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionStoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Session records kept in a JSON file on disk.
///
/// The whole document is re-read and rewritten on every operation; it only
/// ever holds a handful of keys.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, Value>, SessionStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, entries: &BTreeMap<String, Value>) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get_value(&self, key: &str) -> Result<Option<Value>, SessionStoreError> {
        Ok(self.read()?.remove(key))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn insert_value(&mut self, key: &str, value: Value) -> Result<(), SessionStoreError> {
        let mut entries = self.read()?;
        entries.insert(key.to_string(), value);
        self.write(&entries)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove(&mut self, key: &str) -> Result<(), SessionStoreError> {
        let mut entries = self.read()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("nextshop-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemorySessionStore::new();
        store.insert("theme", &"dark").unwrap();
        assert_eq!(store.get::<String>("theme").unwrap().as_deref(), Some("dark"));
        store.remove("theme").unwrap();
        assert!(store.get::<String>("theme").unwrap().is_none());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileSessionStore::new(temp_path("session.json"));
        assert!(store.get_value("user").unwrap().is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = temp_path("session.json");
        let mut store = FileSessionStore::new(&path);
        store.insert("user", &serde_json::json!({ "id": 1 })).unwrap();
        store.insert("theme", &"light").unwrap();

        let reopened = FileSessionStore::new(&path);
        let user: Value = reopened.get("user").unwrap().unwrap();
        assert_eq!(user["id"], 1);

        let mut reopened = reopened;
        reopened.remove("user").unwrap();
        assert!(FileSessionStore::new(&path).get_value("user").unwrap().is_none());
        assert!(FileSessionStore::new(&path).get_value("theme").unwrap().is_some());

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let path = temp_path("session.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.get_value("user"), Err(SessionStoreError::Json(_))));

        std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
