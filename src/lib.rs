//! # SafeCell
//!
//! Local-first malaria blood-smear detection for health workers.
//!
//! This crate provides:
//! - A location cascade over Rwanda's province / district / sector /
//!   facility hierarchy
//! - Submission of smear images to an external prediction service
//! - Local record keeping with district aggregates and statistics
//! - Terminal UI for clinic deployment
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (Location, DetectionRecord, aggregates)
//! - `reference`: Static administrative reference data
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (SQLite, HTTP, log sanitizer)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod reference;
pub mod tui;

pub use config::AppConfig;
pub use domain::{DetectionOutcome, DetectionRecord, Location};

/// Result type for SafeCell operations
pub type Result<T> = std::result::Result<T, SafecellError>;

/// Main error type for SafeCell
#[derive(Debug, thiserror::Error)]
pub enum SafecellError {
    #[error("{0}")]
    Validation(#[from] domain::ValidationError),

    #[error("{0}")]
    Service(#[from] ports::ServiceError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Export failed: {0}")]
    Export(#[from] application::ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SafecellError {
    /// Message suitable for showing inline in the UI.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Service(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
