//! Detection result types.
//!
//! Represents the normalized output of the malaria blood-smear classifier
//! and the record kept for every completed detection.

use serde::{Deserialize, Serialize};

use super::{ImageMetadata, Location};

/// Classification label returned by the prediction service for infected cells.
pub const LABEL_PARASITIZED: &str = "Parasitized";

/// Classification label returned by the prediction service for clean cells.
pub const LABEL_UNINFECTED: &str = "Uninfected";

/// Normalized detection outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionOutcome {
    /// Malaria parasites detected
    Positive,
    /// No parasites detected
    Negative,
}

impl DetectionOutcome {
    /// Map a raw classifier label onto an outcome.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            l if l.eq_ignore_ascii_case(LABEL_PARASITIZED) => Some(Self::Positive),
            l if l.eq_ignore_ascii_case(LABEL_UNINFECTED) => Some(Self::Negative),
            _ => None,
        }
    }

    /// Human-readable description for the result view.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Positive => "Malaria parasites detected - refer for treatment",
            Self::Negative => "No malaria parasites detected",
        }
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }
}

impl std::fmt::Display for DetectionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "Positive"),
            Self::Negative => write!(f, "Negative"),
        }
    }
}

/// Raw body returned by the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    /// Classifier label (`Parasitized` or `Uninfected`)
    pub result: String,
    /// Classifier confidence (0.0 to 1.0)
    pub confidence: f64,
}

/// Prediction after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub result: DetectionOutcome,
    /// Confidence as a whole percentage (0 to 100)
    pub confidence_level: u8,
}

impl Prediction {
    /// Normalize a raw classifier response.
    ///
    /// Returns `None` when the label is not one the classifier is known to emit.
    #[must_use]
    pub fn from_raw(raw: &RawPrediction) -> Option<Self> {
        let result = DetectionOutcome::from_label(&raw.result)?;
        Some(Self {
            result,
            confidence_level: confidence_to_level(raw.confidence),
        })
    }
}

/// Convert a 0..1 confidence into a rounded 0..100 percentage.
#[must_use]
pub fn confidence_to_level(confidence: f64) -> u8 {
    if !confidence.is_finite() {
        return 0;
    }
    (confidence * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Complete detection record including location and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    /// Unique identifier
    pub id: String,

    /// When the prediction came back
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Normalized outcome
    pub result: DetectionOutcome,

    /// Confidence as a whole percentage
    pub confidence_level: u8,

    /// Where the sample was taken
    pub location: Location,

    /// Uploaded file details
    pub image_metadata: ImageMetadata,

    /// Round-trip time of the prediction call
    pub processing_time_ms: u64,
}

impl DetectionRecord {
    /// Create a new record from a normalized prediction.
    #[must_use]
    pub fn new(
        prediction: Prediction,
        location: Location,
        image_metadata: ImageMetadata,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            id: super::new_id(),
            timestamp: chrono::Utc::now(),
            result: prediction.result,
            confidence_level: prediction.confidence_level.min(100),
            location,
            image_metadata,
            processing_time_ms,
        }
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.result.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{sample_location, sample_metadata};

    #[test]
    fn test_outcome_from_label() {
        assert_eq!(
            DetectionOutcome::from_label("Parasitized"),
            Some(DetectionOutcome::Positive)
        );
        assert_eq!(
            DetectionOutcome::from_label("uninfected"),
            Some(DetectionOutcome::Negative)
        );
        assert_eq!(DetectionOutcome::from_label("Unknown"), None);
    }

    #[test]
    fn test_prediction_normalization() {
        let raw = RawPrediction {
            result: "Parasitized".into(),
            confidence: 0.8765,
        };
        let prediction = Prediction::from_raw(&raw).expect("Should normalize");
        assert_eq!(prediction.result, DetectionOutcome::Positive);
        assert_eq!(prediction.confidence_level, 88);
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(confidence_to_level(1.7), 100);
        assert_eq!(confidence_to_level(-0.2), 0);
        assert_eq!(confidence_to_level(f64::NAN), 0);
    }

    #[test]
    fn test_record_wire_format() {
        let prediction = Prediction {
            result: DetectionOutcome::Negative,
            confidence_level: 93,
        };
        let record = DetectionRecord::new(prediction, sample_location(), sample_metadata(), 420);

        let json = serde_json::to_value(&record).expect("Should serialize");
        assert_eq!(json["result"], "negative");
        assert_eq!(json["confidenceLevel"], 93);
        assert_eq!(json["processingTimeMs"], 420);
        assert_eq!(json["imageMetadata"]["fileType"], "image/png");
        assert_eq!(record.id.len(), 36);
    }
}
