//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `sqlite`: SQLite for the local store
//! - `http`: reqwest clients for the prediction service and detection archive
//! - `sanitize`: PII filtering for logs

pub mod http;
pub mod sanitize;
pub mod sqlite;

// Re-export storage error for lib.rs
pub use sqlite::StorageError;
