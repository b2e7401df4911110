//! Domain layer: Core business types and logic.
//!
//! This module contains plain data types and validation rules with no I/O.
//! All types are serializable with the same JSON shape the web client used.

mod aggregate;
mod detection;
mod image;
mod location;
mod records;
mod validation;

pub use aggregate::{positive_rate, DistrictAggregate, DistrictStatsTable};
pub use detection::{
    confidence_to_level, DetectionOutcome, DetectionRecord, Prediction, RawPrediction,
    LABEL_PARASITIZED, LABEL_UNINFECTED,
};
pub use image::{ImageFormat, ImageMetadata, ImageUpload, MAX_IMAGE_BYTES};
pub use location::{
    is_valid_patient_id, Coordinates, DistrictRef, FacilityKind, FacilityRef, Location, NamedRef,
    PATIENT_ID_MIN_LEN,
};
pub use records::{FeedbackRecord, LogEntry, LogLevel, SessionUser, UserRole, RATING_RANGE};
pub use validation::ValidationError;

/// Generate a random UUID v4 string using a CSPRNG.
///
/// ChaCha20 seeded from OS entropy keeps identifiers unpredictable on
/// every platform.
pub(crate) fn new_id() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn sample_location() -> Location {
        Location {
            province: NamedRef {
                id: "kigali".into(),
                name: "Kigali City".into(),
            },
            district: DistrictRef {
                id: "gasabo".into(),
                name: "Gasabo".into(),
                coordinates: Coordinates {
                    lat: -1.9025,
                    lng: 30.1133,
                },
            },
            sector: NamedRef {
                id: "kimironko".into(),
                name: "Kimironko".into(),
            },
            facility: Some(FacilityRef {
                id: "kibagabaga-hospital".into(),
                name: "Kibagabaga Hospital".into(),
                kind: FacilityKind::DistrictHospital,
            }),
            patient_id: "12345".into(),
        }
    }

    pub(crate) fn sample_metadata() -> ImageMetadata {
        ImageMetadata {
            file_name: "smear.png".into(),
            file_size: 2048,
            file_type: "image/png".into(),
        }
    }

    pub(crate) fn sample_record(result: DetectionOutcome, confidence_level: u8) -> DetectionRecord {
        DetectionRecord::new(
            Prediction {
                result,
                confidence_level,
            },
            sample_location(),
            sample_metadata(),
            350,
        )
    }

    /// A record with a fixed timestamp, for time-range tests.
    pub(crate) fn record_at(
        result: DetectionOutcome,
        confidence_level: u8,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) -> DetectionRecord {
        let mut record = sample_record(result, confidence_level);
        record.timestamp = timestamp;
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation() {
        let id1 = new_id();
        let id2 = new_id();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
        assert_eq!(&id1[14..15], "4");
    }
}
