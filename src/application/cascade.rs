//! Location cascade: four dependent selections plus a patient identifier.
//!
//! The cascade moves through [`CascadeLevel`]s as the health worker picks a
//! province, district, sector and facility. Changing an ancestor clears
//! descendants that no longer belong to it. After every change the resolved
//! [`Location`] (or `None`) is compared with the last value handed to the
//! listener and the listener is only invoked when it differs.

use zeroize::Zeroize;

use crate::domain::{Location, ValidationError, PATIENT_ID_MIN_LEN};
use crate::reference::{ReferenceTable, SelectOption};

/// Callback receiving the completed location, or `None` once it becomes
/// incomplete again.
pub type LocationListener = Box<dyn FnMut(Option<&Location>) + Send>;

/// Deepest level with a contiguous selection above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CascadeLevel {
    Empty,
    Province,
    District,
    Sector,
    Facility,
}

/// Raw ids currently selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub province: Option<String>,
    pub district: Option<String>,
    pub sector: Option<String>,
    pub facility: Option<String>,
    pub patient_id: String,
}

impl Selection {
    fn clear_below_province(&mut self) {
        self.district = None;
        self.sector = None;
        self.facility = None;
    }
}

/// Location cascade state machine.
pub struct LocationCascade {
    table: ReferenceTable,
    selection: Selection,
    last_emitted: Option<Location>,
    listener: Option<LocationListener>,
}

impl std::fmt::Debug for LocationCascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationCascade")
            .field("selection", &self.selection)
            .field("level", &self.level())
            .field("complete", &self.last_emitted.is_some())
            .finish()
    }
}

fn non_empty(id: &str) -> Option<String> {
    let id = id.trim();
    (!id.is_empty()).then(|| id.to_string())
}

fn contains(options: &[SelectOption], id: &str) -> bool {
    options.iter().any(|o| o.value == id)
}

impl LocationCascade {
    #[must_use]
    pub fn new(table: ReferenceTable) -> Self {
        Self {
            table,
            selection: Selection::default(),
            last_emitted: None,
            listener: None,
        }
    }

    /// Install the change listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: LocationListener) {
        self.listener = Some(listener);
    }

    /// Builder form of [`set_listener`](Self::set_listener).
    #[must_use]
    pub fn with_listener(mut self, listener: LocationListener) -> Self {
        self.set_listener(listener);
        self
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The last completed location handed to the listener.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        self.last_emitted.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.last_emitted.is_some()
    }

    /// Current level of the state machine.
    #[must_use]
    pub fn level(&self) -> CascadeLevel {
        let s = &self.selection;
        match (&s.province, &s.district, &s.sector, &s.facility) {
            (None, ..) => CascadeLevel::Empty,
            (Some(_), None, ..) => CascadeLevel::Province,
            (Some(_), Some(_), None, _) => CascadeLevel::District,
            (Some(_), Some(_), Some(_), None) => CascadeLevel::Sector,
            (Some(_), Some(_), Some(_), Some(_)) => CascadeLevel::Facility,
        }
    }

    /// Select a province. A district that is not part of the new province
    /// is cleared together with its sector and facility.
    pub fn set_province(&mut self, id: &str) {
        let province = non_empty(id);
        match &province {
            None => self.selection.clear_below_province(),
            Some(p) => {
                let districts = self.table.districts_of(p);
                let keep = self
                    .selection
                    .district
                    .as_deref()
                    .is_some_and(|d| contains(&districts, d));
                if !keep {
                    self.selection.clear_below_province();
                }
            }
        }
        self.selection.province = province;
        self.notify();
    }

    /// Select a district. Sector and facility are cleared independently
    /// when they are not listed under the new district.
    pub fn set_district(&mut self, id: &str) {
        let district = non_empty(id);
        match (&self.selection.province, &district) {
            (Some(p), Some(d)) => {
                let sectors = self.table.sectors_of(p, d);
                if !self
                    .selection
                    .sector
                    .as_deref()
                    .is_some_and(|s| contains(&sectors, s))
                {
                    self.selection.sector = None;
                }

                let facilities = self.table.facilities_of(p, d);
                if !self
                    .selection
                    .facility
                    .as_deref()
                    .is_some_and(|f| contains(&facilities, f))
                {
                    self.selection.facility = None;
                }
            }
            _ => {
                self.selection.sector = None;
                self.selection.facility = None;
            }
        }
        self.selection.district = district;
        self.notify();
    }

    pub fn set_sector(&mut self, id: &str) {
        self.selection.sector = non_empty(id);
        self.notify();
    }

    pub fn set_facility(&mut self, id: &str) {
        self.selection.facility = non_empty(id);
        self.notify();
    }

    /// Set the patient identifier. Only ASCII digits are kept; the previous
    /// value is wiped.
    pub fn set_patient_id(&mut self, value: &str) {
        let digits: String = value.chars().filter(char::is_ascii_digit).collect();
        let mut previous = std::mem::replace(&mut self.selection.patient_id, digits);
        previous.zeroize();
        self.notify();
    }

    /// Inline error for the patient identifier field.
    ///
    /// An empty field is not flagged; a partially typed one is.
    #[must_use]
    pub fn patient_id_error(&self) -> Option<ValidationError> {
        let len = self.selection.patient_id.chars().count();
        (len > 0 && len < PATIENT_ID_MIN_LEN).then_some(ValidationError::PatientIdTooShort)
    }

    /// Clear every selection.
    pub fn reset(&mut self) {
        self.selection = Selection::default();
        self.notify();
    }

    #[must_use]
    pub fn province_options(&self) -> Vec<SelectOption> {
        self.table.provinces()
    }

    #[must_use]
    pub fn district_options(&self) -> Vec<SelectOption> {
        self.selection
            .province
            .as_deref()
            .map(|p| self.table.districts_of(p))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn sector_options(&self) -> Vec<SelectOption> {
        match (&self.selection.province, &self.selection.district) {
            (Some(p), Some(d)) => self.table.sectors_of(p, d),
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn facility_options(&self) -> Vec<SelectOption> {
        match (&self.selection.province, &self.selection.district) {
            (Some(p), Some(d)) => self.table.facilities_of(p, d),
            _ => Vec::new(),
        }
    }

    /// Resolve the current selection, if it is complete and valid.
    fn resolve(&self) -> Option<Location> {
        let s = &self.selection;
        if s.patient_id.chars().count() < PATIENT_ID_MIN_LEN {
            return None;
        }
        let place = self.table.resolve(
            s.province.as_deref()?,
            s.district.as_deref()?,
            s.sector.as_deref()?,
            s.facility.as_deref()?,
        )?;
        Some(place.into_location(s.patient_id.clone()))
    }

    fn notify(&mut self) {
        let current = self.resolve();
        if current == self.last_emitted {
            return;
        }

        tracing::debug!(
            level = ?self.level(),
            complete = current.is_some(),
            "Location selection changed"
        );
        self.last_emitted = current;
        if let Some(listener) = self.listener.as_mut() {
            listener(self.last_emitted.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Emissions = Arc<Mutex<Vec<Option<Location>>>>;

    fn recording_cascade() -> (LocationCascade, Emissions) {
        let emissions: Emissions = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&emissions);
        let cascade = LocationCascade::new(ReferenceTable::rwanda()).with_listener(Box::new(
            move |location: Option<&Location>| {
                sink.lock().expect("Lock").push(location.cloned());
            },
        ));
        (cascade, emissions)
    }

    fn fill_gasabo(cascade: &mut LocationCascade) {
        cascade.set_province("kigali");
        cascade.set_district("gasabo");
        cascade.set_sector("kimironko");
        cascade.set_facility("kibagabaga-hospital");
    }

    #[test]
    fn test_levels_advance() {
        let mut cascade = LocationCascade::new(ReferenceTable::rwanda());
        assert_eq!(cascade.level(), CascadeLevel::Empty);
        cascade.set_province("kigali");
        assert_eq!(cascade.level(), CascadeLevel::Province);
        cascade.set_district("gasabo");
        assert_eq!(cascade.level(), CascadeLevel::District);
        cascade.set_sector("kimironko");
        assert_eq!(cascade.level(), CascadeLevel::Sector);
        cascade.set_facility("kibagabaga-hospital");
        assert_eq!(cascade.level(), CascadeLevel::Facility);
    }

    #[test]
    fn test_province_change_resets_foreign_district() {
        let mut cascade = LocationCascade::new(ReferenceTable::rwanda());
        fill_gasabo(&mut cascade);

        cascade.set_province("northern");
        let s = cascade.selection();
        assert_eq!(s.province.as_deref(), Some("northern"));
        assert!(s.district.is_none());
        assert!(s.sector.is_none());
        assert!(s.facility.is_none());
        assert_eq!(cascade.level(), CascadeLevel::Province);
    }

    #[test]
    fn test_reselecting_same_province_keeps_district() {
        let mut cascade = LocationCascade::new(ReferenceTable::rwanda());
        fill_gasabo(&mut cascade);

        cascade.set_province("kigali");
        assert_eq!(cascade.selection().district.as_deref(), Some("gasabo"));
        assert_eq!(cascade.selection().sector.as_deref(), Some("kimironko"));
    }

    #[test]
    fn test_district_change_clears_foreign_sector_and_facility() {
        let mut cascade = LocationCascade::new(ReferenceTable::rwanda());
        fill_gasabo(&mut cascade);

        cascade.set_district("kicukiro");
        assert!(cascade.selection().sector.is_none());
        assert!(cascade.selection().facility.is_none());
        assert_eq!(cascade.level(), CascadeLevel::District);
        assert!(!cascade.sector_options().is_empty());
    }

    #[test]
    fn test_emits_only_when_complete() {
        let (mut cascade, emissions) = recording_cascade();
        fill_gasabo(&mut cascade);
        cascade.set_patient_id("1234");
        assert!(emissions.lock().expect("Lock").is_empty());
        assert!(!cascade.is_complete());

        cascade.set_patient_id("12345");
        let got = emissions.lock().expect("Lock").clone();
        assert_eq!(got.len(), 1);
        let location = got[0].as_ref().expect("Should be complete");
        assert_eq!(location.patient_id, "12345");
        assert_eq!(location.facility_name(), "Kibagabaga Hospital");
        assert!(location.is_complete());
    }

    #[test]
    fn test_identical_location_not_reemitted() {
        let (mut cascade, emissions) = recording_cascade();
        fill_gasabo(&mut cascade);
        cascade.set_patient_id("12345");

        cascade.set_facility("kibagabaga-hospital");
        cascade.set_sector("kimironko");
        cascade.set_patient_id("12345");
        cascade.set_province("kigali");

        assert_eq!(emissions.lock().expect("Lock").len(), 1);
    }

    #[test]
    fn test_none_emitted_once_on_becoming_incomplete() {
        let (mut cascade, emissions) = recording_cascade();
        fill_gasabo(&mut cascade);
        cascade.set_patient_id("12345");

        cascade.set_patient_id("123");
        cascade.set_patient_id("12");
        cascade.set_sector("remera");

        let got = emissions.lock().expect("Lock").clone();
        assert_eq!(got.len(), 2);
        assert!(got[0].is_some());
        assert!(got[1].is_none());

        // Becoming complete again emits the new location
        cascade.set_patient_id("67890");
        let got = emissions.lock().expect("Lock").clone();
        assert_eq!(got.len(), 3);
        let location = got[2].as_ref().expect("Should be complete");
        assert_eq!(location.sector.id, "remera");
    }

    #[test]
    fn test_patient_id_digits_only() {
        let mut cascade = LocationCascade::new(ReferenceTable::rwanda());
        cascade.set_patient_id("ab12-3 4x5");
        assert_eq!(cascade.selection().patient_id, "12345");

        cascade.set_patient_id("12a");
        assert_eq!(cascade.selection().patient_id, "12");
        assert_eq!(
            cascade.patient_id_error(),
            Some(ValidationError::PatientIdTooShort)
        );

        cascade.set_patient_id("");
        assert!(cascade.patient_id_error().is_none());
    }

    #[test]
    fn test_invalid_tuple_never_completes() {
        let (mut cascade, emissions) = recording_cascade();
        cascade.set_province("kigali");
        cascade.set_district("gasabo");
        cascade.set_sector("not-a-sector");
        cascade.set_facility("kibagabaga-hospital");
        cascade.set_patient_id("12345");

        assert_eq!(cascade.level(), CascadeLevel::Facility);
        assert!(!cascade.is_complete());
        assert!(emissions.lock().expect("Lock").is_empty());
    }

    #[test]
    fn test_reset_clears_and_signals() {
        let (mut cascade, emissions) = recording_cascade();
        fill_gasabo(&mut cascade);
        cascade.set_patient_id("12345");

        cascade.reset();
        assert_eq!(cascade.level(), CascadeLevel::Empty);
        assert_eq!(cascade.selection(), &Selection::default());
        assert!(cascade.district_options().is_empty());

        let got = emissions.lock().expect("Lock").clone();
        assert_eq!(got.len(), 2);
        assert!(got[1].is_none());
    }

    #[test]
    fn test_listener_can_feed_channel() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut cascade = LocationCascade::new(ReferenceTable::rwanda());
        cascade.set_listener(Box::new(move |location: Option<&Location>| {
            let _ = tx.send(location.map(|l| l.district.name.clone()));
        }));

        fill_gasabo(&mut cascade);
        cascade.set_patient_id("55555");
        assert_eq!(rx.try_recv().expect("Should receive"), Some("Gasabo".to_string()));
        assert!(rx.try_recv().is_err());
    }
}
