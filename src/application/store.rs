//! Typed access to the local store.
//!
//! Reads never fail: a missing key, an unreadable backend or malformed JSON
//! all yield the default value and a warning in the log. Writes report
//! errors so callers can decide whether to surface them.

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::adapters::StorageError;
use crate::domain::{
    DetectionRecord, DistrictStatsTable, FeedbackRecord, LogEntry, SessionUser,
};
use crate::ports::{LocalStore, StorageKey};
use crate::SafecellError;

/// Default cap on stored detection records.
pub const DEFAULT_MAX_DETECTIONS: usize = 1000;

/// Default cap on activity log entries.
pub const DEFAULT_MAX_LOGS: usize = 500;

/// Retention caps for the bounded lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    pub max_detections: usize,
    pub max_logs: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            max_detections: DEFAULT_MAX_DETECTIONS,
            max_logs: DEFAULT_MAX_LOGS,
        }
    }
}

/// Shared handle over a [`LocalStore`] that speaks in domain types.
///
/// Clones share one update lock, so read-modify-write updates from the
/// persistence thread and the UI thread never overwrite each other.
pub struct RecordStore<S: LocalStore> {
    store: Arc<S>,
    limits: StoreLimits,
    update_lock: Arc<Mutex<()>>,
}

impl<S: LocalStore> Clone for RecordStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            limits: self.limits,
            update_lock: Arc::clone(&self.update_lock),
        }
    }
}

impl<S> RecordStore<S>
where
    S: LocalStore,
    S::Error: Into<StorageError>,
{
    pub fn new(store: Arc<S>, limits: StoreLimits) -> Self {
        Self {
            store,
            limits,
            update_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    /// Read and parse `key`, or `None` when absent or unreadable.
    pub fn read_optional<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                let e: StorageError = e.into();
                tracing::warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Discarding malformed value under {}: {}", key, e);
                None
            }
        }
    }

    /// Read and parse `key`, falling back to `T::default()`.
    pub fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.read_optional(key).unwrap_or_default()
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// # Errors
    /// Returns error if serialization or the backend write fails.
    pub fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), SafecellError> {
        let raw = serde_json::to_string(value).map_err(StorageError::from)?;
        self.store
            .set_item(key, &raw)
            .map_err(|e| SafecellError::Storage(e.into()))
    }

    /// Read `key`, apply `update`, and write the result back while holding
    /// the update lock shared by every clone of this store.
    ///
    /// # Errors
    /// Returns error if serialization or the backend write fails.
    pub fn update_json<T, F>(&self, key: &str, update: F) -> Result<(), SafecellError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T),
    {
        // The lock guards no data, so a poisoned lock is still usable.
        let _guard = self.update_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut value: T = self.read_json(key);
        update(&mut value);
        self.write_json(key, &value)
    }

    /// Remove `key`.
    ///
    /// # Errors
    /// Returns error if the backend write fails.
    pub fn remove(&self, key: &str) -> Result<(), SafecellError> {
        self.store
            .remove_item(key)
            .map_err(|e| SafecellError::Storage(e.into()))
    }

    /// Detection records, oldest first.
    pub fn detections(&self) -> Vec<DetectionRecord> {
        self.read_json(StorageKey::DETECTIONS)
    }

    /// Append a record, keeping only the most recent `max_detections`.
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    pub fn append_detection(&self, record: &DetectionRecord) -> Result<(), SafecellError> {
        let max = self.limits.max_detections;
        self.update_json(StorageKey::DETECTIONS, |records: &mut Vec<DetectionRecord>| {
            records.push(record.clone());
            keep_most_recent(records, max);
        })
    }

    pub fn district_stats(&self) -> DistrictStatsTable {
        self.read_json(StorageKey::DISTRICT_STATS)
    }

    /// Replace the district aggregate table.
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    pub fn save_district_stats(&self, table: &DistrictStatsTable) -> Result<(), SafecellError> {
        self.write_json(StorageKey::DISTRICT_STATS, table)
    }

    /// Update the district aggregate table in place.
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    pub fn update_district_stats<F>(&self, update: F) -> Result<(), SafecellError>
    where
        F: FnOnce(&mut DistrictStatsTable),
    {
        self.update_json::<DistrictStatsTable, _>(StorageKey::DISTRICT_STATS, update)
    }

    /// Activity log, oldest first.
    pub fn logs(&self) -> Vec<LogEntry> {
        self.read_json(StorageKey::LOGS)
    }

    /// Append a log entry, keeping only the most recent `max_logs`.
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    pub fn append_log(&self, entry: LogEntry) -> Result<(), SafecellError> {
        let max = self.limits.max_logs;
        self.update_json(StorageKey::LOGS, |logs: &mut Vec<LogEntry>| {
            logs.push(entry);
            keep_most_recent(logs, max);
        })
    }

    pub fn feedback(&self) -> Vec<FeedbackRecord> {
        self.read_json(StorageKey::FEEDBACK)
    }

    /// Append a feedback record.
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    pub fn append_feedback(&self, record: FeedbackRecord) -> Result<(), SafecellError> {
        self.update_json(StorageKey::FEEDBACK, |all: &mut Vec<FeedbackRecord>| all.push(record))
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.read_optional(StorageKey::USER)
    }

    /// Id of the signed-in user, if any.
    pub fn user_id(&self) -> Option<String> {
        self.user().map(|u| u.id)
    }

    /// Store the signed-in user.
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    pub fn set_user(&self, user: &SessionUser) -> Result<(), SafecellError> {
        self.write_json(StorageKey::USER, user)
    }

    /// Forget the signed-in user.
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    pub fn clear_user(&self) -> Result<(), SafecellError> {
        self.remove(StorageKey::USER)
    }
}

fn keep_most_recent<T>(items: &mut Vec<T>, max: usize) {
    if items.len() > max {
        let excess = items.len() - max;
        items.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::SqliteLocalStore;
    use crate::domain::fixtures::sample_record;
    use crate::domain::{DetectionOutcome, LogLevel, UserRole};

    fn store_with(limits: StoreLimits) -> RecordStore<SqliteLocalStore> {
        let backend = SqliteLocalStore::in_memory().expect("Should create db");
        RecordStore::new(Arc::new(backend), limits)
    }

    #[test]
    fn test_missing_keys_read_as_default() {
        let store = store_with(StoreLimits::default());
        assert!(store.detections().is_empty());
        assert!(store.logs().is_empty());
        assert!(store.district_stats().is_empty());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_malformed_value_reads_as_default() {
        let backend = Arc::new(SqliteLocalStore::in_memory().expect("Should create db"));
        backend
            .set_item(StorageKey::DETECTIONS, "not json")
            .expect("Should write");

        let store = RecordStore::new(backend, StoreLimits::default());
        assert!(store.detections().is_empty());

        // Appending replaces the corrupt value
        store
            .append_detection(&sample_record(DetectionOutcome::Negative, 70))
            .expect("Should append");
        assert_eq!(store.detections().len(), 1);
    }

    #[test]
    fn test_detections_pruned_to_most_recent() {
        let store = store_with(StoreLimits {
            max_detections: 3,
            max_logs: 10,
        });

        for confidence in [10, 20, 30, 40, 50] {
            store
                .append_detection(&sample_record(DetectionOutcome::Positive, confidence))
                .expect("Should append");
        }

        let kept: Vec<u8> = store.detections().iter().map(|r| r.confidence_level).collect();
        assert_eq!(kept, vec![30, 40, 50]);
    }

    #[test]
    fn test_logs_bounded() {
        let store = store_with(StoreLimits {
            max_detections: 10,
            max_logs: 2,
        });
        for action in ["a", "b", "c"] {
            store
                .append_log(LogEntry::new(LogLevel::Info, action, "", None))
                .expect("Should append");
        }
        let actions: Vec<String> = store.logs().into_iter().map(|l| l.action).collect();
        assert_eq!(actions, vec!["b", "c"]);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let store = store_with(StoreLimits::default());

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store
                            .append_log(LogEntry::new(LogLevel::Info, &format!("t{t}-{i}"), "", None))
                            .expect("Should append");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("Thread should finish");
        }

        assert_eq!(store.logs().len(), 100);
    }

    #[test]
    fn test_user_roundtrip() {
        let store = store_with(StoreLimits::default());
        let user = SessionUser::new("Aline", "aline@moh.gov.rw", UserRole::HealthWorker)
            .expect("Should create user");

        store.set_user(&user).expect("Should save");
        assert_eq!(store.user_id(), Some(user.id.clone()));

        store.clear_user().expect("Should clear");
        assert!(store.user().is_none());
    }
}
