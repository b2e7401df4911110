//! Validation errors raised before any network call is made.

use super::image::MAX_IMAGE_BYTES;
use super::location::PATIENT_ID_MIN_LEN;

/// Input rejected on the client side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Image is {size} bytes; the maximum is {max} bytes")]
    ImageTooLarge { size: u64, max: u64 },

    #[error("Unsupported image type {0}: only JPEG and PNG are accepted")]
    UnsupportedImageType(String),

    #[error("Cannot read image: {0}")]
    UnreadableImage(String),

    #[error("Location is incomplete: select province, district, sector and facility")]
    IncompleteLocation,

    #[error("Patient ID must be at least {PATIENT_ID_MIN_LEN} digits")]
    PatientIdTooShort,

    #[error("Invalid input: {0}")]
    InvalidField(String),
}

impl ValidationError {
    /// Shorthand used by the upload form hint.
    #[must_use]
    pub fn max_image_megabytes() -> u64 {
        MAX_IMAGE_BYTES / (1024 * 1024)
    }
}
