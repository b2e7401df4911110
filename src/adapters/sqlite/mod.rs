//! SQLite adapter: Implementation of LocalStore.
//!
//! Provides a durable key/value table standing in for browser local storage.
//!
//! # Mutex Behavior
//!
//! The connection is protected by a `Mutex`. A poisoned mutex (from a panic
//! in another thread) is reported as [`StorageError::LockPoisoned`] so that
//! callers can fall back to defaults instead of aborting the UI.
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use crate::ports::LocalStore;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Cannot create database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// SQLite-backed local store.
pub struct SqliteLocalStore {
    conn: Mutex<Connection>,
}

impl SqliteLocalStore {
    /// Open (or create) the store at the given database path.
    ///
    /// Parent directories are created when missing.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        tracing::debug!("Opened local store at {}", path.display());
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.lock()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(())
    }

    /// Number of stored keys.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn len(&self) -> Result<usize, StorageError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM local_storage", [], |row| {
            row.get(0)
        })?;
        Ok(count as usize)
    }

    /// Whether the store holds no keys.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl LocalStore for SqliteLocalStore {
    type Error = StorageError;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, now],
        )?;

        tracing::trace!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM local_storage", [])?;
        tracing::warn!("Cleared all data from local store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_roundtrip() {
        let store = SqliteLocalStore::in_memory().expect("Should create db");

        assert!(store.get_item("user").expect("Should read").is_none());

        store.set_item("user", r#"{"name":"Aline"}"#).expect("Should write");
        assert_eq!(
            store.get_item("user").expect("Should read").as_deref(),
            Some(r#"{"name":"Aline"}"#)
        );

        // Overwrite replaces
        store.set_item("user", "{}").expect("Should write");
        assert_eq!(store.get_item("user").expect("Should read").as_deref(), Some("{}"));
        assert_eq!(store.len().expect("Should count"), 1);

        store.remove_item("user").expect("Should remove");
        assert!(store.get_item("user").expect("Should read").is_none());

        // Removing a missing key is fine
        store.remove_item("user").expect("Should remove");
    }

    #[test]
    fn test_clear() {
        let store = SqliteLocalStore::in_memory().expect("Should create db");
        store.set_item("a", "1").expect("Should write");
        store.set_item("b", "2").expect("Should write");
        assert_eq!(store.len().expect("Should count"), 2);

        store.clear().expect("Should clear");
        assert!(store.is_empty().expect("Should count"));
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().expect("Should create dir");
        let path = dir.path().join("nested").join("safecell.db");

        {
            let store = SqliteLocalStore::new(&path).expect("Should open");
            store.set_item("district_stats", "{}").expect("Should write");
        }

        let reopened = SqliteLocalStore::new(&path).expect("Should reopen");
        assert_eq!(
            reopened.get_item("district_stats").expect("Should read").as_deref(),
            Some("{}")
        );
    }
}
