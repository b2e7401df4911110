//! Static reference data: provinces, districts, sectors and facilities.
//!
//! The table is read-only and process-wide. Lookups never fail: an unknown
//! key path yields an empty option list, and [`ReferenceTable::resolve`]
//! yields `None` when any id is invalid.

mod rwanda;

use serde::Serialize;

use crate::domain::{Coordinates, DistrictRef, FacilityKind, FacilityRef, Location, NamedRef};

/// A `{value, label}` pair for selection lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug)]
pub struct ProvinceEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub districts: &'static [DistrictEntry],
}

#[derive(Debug)]
pub struct DistrictEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub coordinates: Coordinates,
    pub sectors: &'static [SectorEntry],
    pub facilities: &'static [FacilityEntry],
}

#[derive(Debug)]
pub struct SectorEntry {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug)]
pub struct FacilityEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: FacilityKind,
}

/// Denormalized names and coordinates for a full id tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub province: NamedRef,
    pub district: DistrictRef,
    pub sector: NamedRef,
    pub facility: FacilityRef,
}

impl ResolvedPlace {
    /// Attach a patient identifier to form a [`Location`].
    #[must_use]
    pub fn into_location(self, patient_id: impl Into<String>) -> Location {
        Location {
            province: self.province,
            district: self.district,
            sector: self.sector,
            facility: Some(self.facility),
            patient_id: patient_id.into(),
        }
    }
}

/// Handle to a static reference table.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceTable {
    provinces: &'static [ProvinceEntry],
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::rwanda()
    }
}

impl ReferenceTable {
    /// Rwanda's administrative hierarchy.
    #[must_use]
    pub fn rwanda() -> Self {
        Self {
            provinces: rwanda::PROVINCES,
        }
    }

    /// Use a custom table.
    #[must_use]
    pub fn new(provinces: &'static [ProvinceEntry]) -> Self {
        Self { provinces }
    }

    /// All provinces, in table order.
    #[must_use]
    pub fn provinces(&self) -> Vec<SelectOption> {
        self.provinces
            .iter()
            .map(|p| SelectOption {
                value: p.id,
                label: p.name,
            })
            .collect()
    }

    /// Districts of a province.
    #[must_use]
    pub fn districts_of(&self, province_id: &str) -> Vec<SelectOption> {
        self.province(province_id)
            .map(|p| {
                p.districts
                    .iter()
                    .map(|d| SelectOption {
                        value: d.id,
                        label: d.name,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sectors of a district.
    #[must_use]
    pub fn sectors_of(&self, province_id: &str, district_id: &str) -> Vec<SelectOption> {
        self.district(province_id, district_id)
            .map(|d| {
                d.sectors
                    .iter()
                    .map(|s| SelectOption {
                        value: s.id,
                        label: s.name,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Facilities of a district.
    #[must_use]
    pub fn facilities_of(&self, province_id: &str, district_id: &str) -> Vec<SelectOption> {
        self.district(province_id, district_id)
            .map(|d| {
                d.facilities
                    .iter()
                    .map(|f| SelectOption {
                        value: f.id,
                        label: f.name,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolve a full id tuple into names and coordinates.
    #[must_use]
    pub fn resolve(
        &self,
        province_id: &str,
        district_id: &str,
        sector_id: &str,
        facility_id: &str,
    ) -> Option<ResolvedPlace> {
        let province = self.province(province_id)?;
        let district = province.districts.iter().find(|d| d.id == district_id)?;
        let sector = district.sectors.iter().find(|s| s.id == sector_id)?;
        let facility = district.facilities.iter().find(|f| f.id == facility_id)?;

        Some(ResolvedPlace {
            province: NamedRef {
                id: province.id.to_string(),
                name: province.name.to_string(),
            },
            district: DistrictRef {
                id: district.id.to_string(),
                name: district.name.to_string(),
                coordinates: district.coordinates,
            },
            sector: NamedRef {
                id: sector.id.to_string(),
                name: sector.name.to_string(),
            },
            facility: FacilityRef {
                id: facility.id.to_string(),
                name: facility.name.to_string(),
                kind: facility.kind,
            },
        })
    }

    /// Display name of a province.
    #[must_use]
    pub fn province_name(&self, province_id: &str) -> Option<&'static str> {
        self.province(province_id).map(|p| p.name)
    }

    /// Display name of a district.
    #[must_use]
    pub fn district_name(&self, province_id: &str, district_id: &str) -> Option<&'static str> {
        self.district(province_id, district_id).map(|d| d.name)
    }

    /// Coordinates of a district.
    #[must_use]
    pub fn district_coordinates(&self, province_id: &str, district_id: &str) -> Option<Coordinates> {
        self.district(province_id, district_id).map(|d| d.coordinates)
    }

    fn province(&self, province_id: &str) -> Option<&'static ProvinceEntry> {
        self.provinces.iter().find(|p| p.id == province_id)
    }

    fn district(&self, province_id: &str, district_id: &str) -> Option<&'static DistrictEntry> {
        self.province(province_id)?
            .districts
            .iter()
            .find(|d| d.id == district_id)
    }
}
