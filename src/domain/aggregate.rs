//! Per-district case rollups used by the map and statistics views.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::DetectionRecord;

/// Case counts for one district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictAggregate {
    pub province_id: String,
    pub district_id: String,
    pub district_name: String,
    pub total_cases: u64,
    pub positive_cases: u64,
    pub facilities: BTreeSet<String>,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl DistrictAggregate {
    /// Share of positive cases as a percentage with one decimal.
    #[must_use]
    pub fn positive_rate(&self) -> f64 {
        positive_rate(self.total_cases, self.positive_cases)
    }
}

/// Positive rate as a percentage rounded to one decimal.
///
/// `positive_rate(45, 12) == 26.7`. A zero total yields `0.0`.
#[must_use]
pub fn positive_rate(total: u64, positive: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = positive as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// All district aggregates, keyed by `"{province}:{district}"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictStatsTable {
    /// Set when the table was seeded with illustrative data rather than real records
    #[serde(default)]
    pub seeded_from_placeholder: bool,
    #[serde(default)]
    pub districts: BTreeMap<String, DistrictAggregate>,
}

impl DistrictStatsTable {
    /// Key used for a `(province, district)` pair.
    #[must_use]
    pub fn key(province_id: &str, district_id: &str) -> String {
        format!("{province_id}:{district_id}")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    #[must_use]
    pub fn get(&self, province_id: &str, district_id: &str) -> Option<&DistrictAggregate> {
        self.districts.get(&Self::key(province_id, district_id))
    }

    /// Fold one new record into its district's counts.
    pub fn ingest(&mut self, record: &DetectionRecord) {
        let location = &record.location;
        let key = Self::key(&location.province.id, &location.district.id);

        let entry = self
            .districts
            .entry(key)
            .or_insert_with(|| DistrictAggregate {
                province_id: location.province.id.clone(),
                district_id: location.district.id.clone(),
                district_name: location.district.name.clone(),
                total_cases: 0,
                positive_cases: 0,
                facilities: BTreeSet::new(),
                last_updated: record.timestamp,
            });

        entry.total_cases += 1;
        if record.is_positive() {
            entry.positive_cases += 1;
        }
        if let Some(facility) = &location.facility {
            entry.facilities.insert(facility.name.clone());
        }
        if record.timestamp > entry.last_updated {
            entry.last_updated = record.timestamp;
        }
    }

    /// Districts ordered by positive cases, highest first.
    #[must_use]
    pub fn ranked(&self) -> Vec<&DistrictAggregate> {
        let mut rows: Vec<&DistrictAggregate> = self.districts.values().collect();
        rows.sort_by(|a, b| {
            b.positive_cases
                .cmp(&a.positive_cases)
                .then(b.total_cases.cmp(&a.total_cases))
                .then(a.district_name.cmp(&b.district_name))
        });
        rows
    }

    #[must_use]
    pub fn total_cases(&self) -> u64 {
        self.districts.values().map(|d| d.total_cases).sum()
    }

    #[must_use]
    pub fn positive_cases(&self) -> u64 {
        self.districts.values().map(|d| d.positive_cases).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::sample_record;
    use crate::domain::DetectionOutcome;

    #[test]
    fn test_positive_rate_rounding() {
        assert_eq!(positive_rate(45, 12), 26.7);
        assert_eq!(positive_rate(3, 1), 33.3);
        assert_eq!(positive_rate(0, 0), 0.0);
        assert_eq!(positive_rate(10, 10), 100.0);
    }

    #[test]
    fn test_ingest_is_incremental() {
        let mut table = DistrictStatsTable::default();
        table.ingest(&sample_record(DetectionOutcome::Positive, 90));
        table.ingest(&sample_record(DetectionOutcome::Negative, 75));
        table.ingest(&sample_record(DetectionOutcome::Positive, 60));

        let agg = table.get("kigali", "gasabo").expect("Should exist");
        assert_eq!(agg.total_cases, 3);
        assert_eq!(agg.positive_cases, 2);
        assert!(agg.total_cases >= agg.positive_cases);
        assert_eq!(agg.facilities.len(), 1);
        assert!(agg.facilities.contains("Kibagabaga Hospital"));
    }

    #[test]
    fn test_table_json_uses_string_keys() {
        let mut table = DistrictStatsTable::default();
        table.ingest(&sample_record(DetectionOutcome::Negative, 50));
        let json = serde_json::to_value(&table).expect("Should serialize");
        assert!(json["districts"]["kigali:gasabo"].is_object());
        assert_eq!(json["seededFromPlaceholder"], false);
    }
}
