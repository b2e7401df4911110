//! Prediction port: the external blood-smear classifier.

use crate::domain::{ImageUpload, RawPrediction};

/// Errors talking to an external HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service could not be reached at all
    #[error("Cannot reach {service}: {message}")]
    Unreachable { service: String, message: String },

    /// The service answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be understood
    #[error("Unexpected response from {service}: {message}")]
    InvalidResponse { service: String, message: String },

    /// The HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl ServiceError {
    /// Message suitable for showing to the health worker.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unreachable { .. } => {
                "The prediction service is unavailable. Check the connection and try again."
                    .to_string()
            }
            Self::Rejected { message, .. } => message.clone(),
            Self::InvalidResponse { .. } => {
                "The prediction service returned an unexpected response.".to_string()
            }
            Self::Client(_) => "The application could not start a network client.".to_string(),
        }
    }
}

/// Trait for the image classification service.
///
/// The classifier is opaque: it takes one image and returns a label with a
/// confidence in `[0, 1]`.
pub trait PredictionService: Send + Sync {
    /// Classify one blood-smear image.
    ///
    /// # Errors
    /// Returns a [`ServiceError`] if the call fails or the response cannot
    /// be parsed.
    fn predict(&self, image: &ImageUpload) -> Result<RawPrediction, ServiceError>;

    /// Human-readable name for logs and status lines.
    fn name(&self) -> &str {
        "prediction service"
    }
}
