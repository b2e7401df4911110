//! Record browser: filtering stored detections.

use chrono::{DateTime, Utc};

use super::{RecordStore, TimeRange};
use crate::adapters::StorageError;
use crate::domain::{DetectionOutcome, DetectionRecord};
use crate::ports::LocalStore;

/// Filter applied to the record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionFilter {
    pub province: Option<String>,
    pub district: Option<String>,
    pub outcome: Option<DetectionOutcome>,
    pub range: TimeRange,
    /// Substring of the patient identifier
    pub patient_query: String,
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self {
            province: None,
            district: None,
            outcome: None,
            range: TimeRange::All,
            patient_query: String::new(),
        }
    }
}

impl DetectionFilter {
    #[must_use]
    pub fn matches(&self, record: &DetectionRecord, now: DateTime<Utc>) -> bool {
        let location = &record.location;
        self.province
            .as_deref()
            .map_or(true, |p| location.province.id == p)
            && self
                .district
                .as_deref()
                .map_or(true, |d| location.district.id == d)
            && self.outcome.map_or(true, |o| record.result == o)
            && self.range.contains(record.timestamp, now)
            && (self.patient_query.is_empty() || location.patient_id.contains(&self.patient_query))
    }

    /// Matching records, newest first.
    #[must_use]
    pub fn apply(&self, records: Vec<DetectionRecord>, now: DateTime<Utc>) -> Vec<DetectionRecord> {
        let mut matching: Vec<DetectionRecord> =
            records.into_iter().filter(|r| self.matches(r, now)).collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching
    }

    /// Cycle the outcome filter: any, positive, negative.
    pub fn cycle_outcome(&mut self) {
        self.outcome = match self.outcome {
            None => Some(DetectionOutcome::Positive),
            Some(DetectionOutcome::Positive) => Some(DetectionOutcome::Negative),
            Some(DetectionOutcome::Negative) => None,
        };
    }

    /// Whether any field narrows the list.
    #[must_use]
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }
}

/// Read-only view over locally stored detections.
pub struct RecordBrowser<S: LocalStore> {
    records: RecordStore<S>,
}

impl<S> RecordBrowser<S>
where
    S: LocalStore,
    S::Error: Into<StorageError>,
{
    pub fn new(records: RecordStore<S>) -> Self {
        Self { records }
    }

    /// Stored records matching `filter`, newest first.
    pub fn list(&self, filter: &DetectionFilter) -> Vec<DetectionRecord> {
        filter.apply(self.records.detections(), Utc::now())
    }

    pub fn count(&self) -> usize {
        self.records.detections().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::SqliteLocalStore;
    use crate::application::StoreLimits;
    use crate::domain::fixtures::{record_at, sample_record};
    use crate::reference::ReferenceTable;
    use chrono::Duration;
    use std::sync::Arc;

    fn musanze_record() -> DetectionRecord {
        let mut record = sample_record(DetectionOutcome::Negative, 66);
        record.location = ReferenceTable::rwanda()
            .resolve("northern", "musanze", "kinigi", "kinigi-hc")
            .expect("Should resolve")
            .into_location("77001");
        record
    }

    #[test]
    fn test_filter_fields() {
        let now = Utc::now();
        let gasabo = sample_record(DetectionOutcome::Positive, 90);
        let musanze = musanze_record();

        let by_province = DetectionFilter {
            province: Some("northern".into()),
            ..DetectionFilter::default()
        };
        assert!(!by_province.matches(&gasabo, now));
        assert!(by_province.matches(&musanze, now));

        let by_outcome = DetectionFilter {
            outcome: Some(DetectionOutcome::Positive),
            ..DetectionFilter::default()
        };
        assert!(by_outcome.matches(&gasabo, now));
        assert!(!by_outcome.matches(&musanze, now));

        let by_patient = DetectionFilter {
            patient_query: "770".into(),
            ..DetectionFilter::default()
        };
        assert!(by_patient.matches(&musanze, now));
        assert!(!by_patient.matches(&gasabo, now));
    }

    #[test]
    fn test_apply_sorts_newest_first() {
        let now = Utc::now();
        let records = vec![
            record_at(DetectionOutcome::Negative, 10, now - Duration::days(3)),
            record_at(DetectionOutcome::Negative, 20, now - Duration::hours(1)),
            record_at(DetectionOutcome::Negative, 30, now - Duration::days(40)),
        ];
        let filter = DetectionFilter {
            range: TimeRange::Month,
            ..DetectionFilter::default()
        };
        let levels: Vec<u8> = filter
            .apply(records, now)
            .iter()
            .map(|r| r.confidence_level)
            .collect();
        assert_eq!(levels, vec![20, 10]);
    }

    #[test]
    fn test_cycle_outcome() {
        let mut filter = DetectionFilter::default();
        assert!(!filter.is_active());
        filter.cycle_outcome();
        assert_eq!(filter.outcome, Some(DetectionOutcome::Positive));
        assert!(filter.is_active());
        filter.cycle_outcome();
        filter.cycle_outcome();
        assert!(filter.outcome.is_none());
    }

    #[test]
    fn test_browser_lists_stored_records() {
        let backend = SqliteLocalStore::in_memory().expect("Should create db");
        let store = RecordStore::new(Arc::new(backend), StoreLimits::default());
        store
            .append_detection(&sample_record(DetectionOutcome::Positive, 90))
            .expect("Should append");
        store.append_detection(&musanze_record()).expect("Should append");

        let browser = RecordBrowser::new(store);
        assert_eq!(browser.count(), 2);
        let filter = DetectionFilter {
            district: Some("musanze".into()),
            ..DetectionFilter::default()
        };
        assert_eq!(browser.list(&filter).len(), 1);
    }
}
