//! Local store port: key/value persistence for client-side state.
//!
//! Values are JSON strings. Keys are fixed and listed in [`StorageKey`].

/// Keys written to the local store.
pub struct StorageKey;

impl StorageKey {
    /// Signed-in user session
    pub const USER: &'static str = "user";
    /// Feedback records
    pub const FEEDBACK: &'static str = "safecell_feedback";
    /// Activity log, bounded
    pub const LOGS: &'static str = "safecell_logs";
    /// Detection records, bounded
    pub const DETECTIONS: &'static str = "malaria_detections";
    /// Per-district aggregates
    pub const DISTRICT_STATS: &'static str = "district_stats";

    /// Every key the application writes.
    pub const ALL: [&'static str; 5] = [
        Self::USER,
        Self::FEEDBACK,
        Self::LOGS,
        Self::DETECTIONS,
        Self::DISTRICT_STATS,
    ];
}

/// Trait for local key/value storage.
///
/// All data stays on the device. Implementations must be safe to share
/// between the UI thread and background workers.
pub trait LocalStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the raw value stored under `key`.
    ///
    /// # Returns
    /// `None` if nothing is stored.
    ///
    /// # Errors
    /// Returns error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove the value stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    /// Returns error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), Self::Error>;

    /// Remove every stored value.
    ///
    /// # Errors
    /// Returns error if the backend cannot be written.
    fn clear(&self) -> Result<(), Self::Error>;
}
