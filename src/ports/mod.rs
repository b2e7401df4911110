//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (local store, prediction
//! service, detection archive).

mod archive;
mod prediction;
mod storage;

pub use archive::{DetectionArchive, PersistReceipt};
pub use prediction::{PredictionService, ServiceError};
pub use storage::{LocalStore, StorageKey};
