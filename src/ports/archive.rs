//! Detection archive port: remote persistence of detection records.

use serde::{Deserialize, Serialize};

use super::ServiceError;
use crate::domain::DetectionRecord;

/// Acknowledgement returned by the archive after storing a record.
///
/// A success status is what counts; either field may be missing from the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistReceipt {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
}

/// Trait for the remote detection archive.
pub trait DetectionArchive: Send + Sync {
    /// Store one record remotely.
    ///
    /// # Errors
    /// Returns a [`ServiceError`] if the archive rejects or cannot receive it.
    fn persist(&self, record: &DetectionRecord) -> Result<PersistReceipt, ServiceError>;

    /// Fetch every archived record.
    ///
    /// # Errors
    /// Returns a [`ServiceError`] if the archive is unreachable.
    fn fetch_all(&self) -> Result<Vec<DetectionRecord>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_tolerates_missing_fields() {
        let receipt: PersistReceipt =
            serde_json::from_str(r#"{"status":"saved"}"#).expect("Should parse");
        assert_eq!(receipt.id, "");
        assert_eq!(receipt.status, "saved");

        let empty: PersistReceipt = serde_json::from_str("{}").expect("Should parse");
        assert_eq!(empty, PersistReceipt::default());
    }
}
