//! Administrative location types.
//!
//! A location tags every detection with Rwanda's
//! province / district / sector / facility hierarchy plus the patient
//! identifier entered by the health worker.

use serde::{Deserialize, Serialize};

/// Minimum number of characters for a valid patient identifier.
pub const PATIENT_ID_MIN_LEN: usize = 5;

/// Geographic centroid of a district (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Kind of health facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacilityKind {
    /// National or provincial referral hospital
    ReferralHospital,
    /// District hospital
    DistrictHospital,
    /// Health center
    HealthCenter,
}

impl std::fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReferralHospital => write!(f, "Referral Hospital"),
            Self::DistrictHospital => write!(f, "District Hospital"),
            Self::HealthCenter => write!(f, "Health Center"),
        }
    }
}

/// An `{id, name}` pair for provinces and sectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

/// A district reference with its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictRef {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
}

/// A facility reference with its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FacilityKind,
}

/// A fully resolved administrative location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub province: NamedRef,
    pub district: DistrictRef,
    pub sector: NamedRef,
    pub facility: Option<FacilityRef>,
    pub patient_id: String,
}

impl Location {
    /// Whether every level is filled and the patient identifier is long enough.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.province.id.is_empty()
            && !self.district.id.is_empty()
            && !self.sector.id.is_empty()
            && self.facility.as_ref().is_some_and(|f| !f.id.is_empty())
            && is_valid_patient_id(&self.patient_id)
    }

    /// Facility display name, or an empty string when none was chosen.
    #[must_use]
    pub fn facility_name(&self) -> &str {
        self.facility.as_ref().map_or("", |f| f.name.as_str())
    }

    /// The `(province, district, sector, facility)` id tuple.
    #[must_use]
    pub fn ids(&self) -> (&str, &str, &str, Option<&str>) {
        (
            &self.province.id,
            &self.district.id,
            &self.sector.id,
            self.facility.as_ref().map(|f| f.id.as_str()),
        )
    }
}

/// Check the patient identifier length rule.
#[must_use]
pub fn is_valid_patient_id(value: &str) -> bool {
    value.chars().count() >= PATIENT_ID_MIN_LEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::sample_location;

    #[test]
    fn test_complete_location() {
        assert!(sample_location().is_complete());
    }

    #[test]
    fn test_short_patient_id_is_incomplete() {
        let mut location = sample_location();
        location.patient_id = "1234".into();
        assert!(!location.is_complete());
    }

    #[test]
    fn test_missing_facility_is_incomplete() {
        let mut location = sample_location();
        location.facility = None;
        assert!(!location.is_complete());
        assert_eq!(location.facility_name(), "");
    }

    #[test]
    fn test_patient_id_length_rule() {
        assert!(!is_valid_patient_id("1234"));
        assert!(is_valid_patient_id(&"7".repeat(PATIENT_ID_MIN_LEN)));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample_location()).expect("Should serialize");
        assert_eq!(json["patientId"], "12345");
        assert_eq!(json["facility"]["type"], "districtHospital");
        assert_eq!(json["district"]["coordinates"]["lat"], -1.9025);
    }
}
