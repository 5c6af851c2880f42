//! Canonical site and table types produced by the normalizer.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, RowValidationError};

/// Which side of a proximity query a dataset plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Reference points (schools)
    Reference,
    /// Candidate locations (addresses)
    Candidate,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Reference => write!(f, "reference"),
            Role::Candidate => write!(f, "candidate"),
        }
    }
}

/// A validated point with a display identifier.
///
/// Fields are private so a site can only exist with a non-empty identifier
/// and in-range coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalSite {
    id_text: String,
    lon: f64,
    lat: f64,
}

impl CanonicalSite {
    pub fn new(
        id_text: impl Into<String>,
        lon: f64,
        lat: f64,
    ) -> std::result::Result<Self, RowValidationError> {
        let id_text = id_text.into();
        if id_text.trim().is_empty() {
            return Err(RowValidationError::MissingIdentifier);
        }
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(RowValidationError::OutOfRange { lon, lat });
        }
        Ok(Self { id_text, lon, lat })
    }

    pub fn id_text(&self) -> &str {
        &self.id_text
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }
}

/// One normalized row: the site plus its region tag (reference tables only)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub site: CanonicalSite,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_tag: Option<String>,
}

/// Ordered, uniformly-shaped sequence of normalized rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalTable {
    role: Role,
    records: Vec<CanonicalRecord>,
}

impl CanonicalTable {
    pub fn new(role: Role, records: Vec<CanonicalRecord>) -> Self {
        Self { role, records }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    /// Sites in source order
    pub fn sites(&self) -> impl Iterator<Item = &CanonicalSite> {
        self.records.iter().map(|r| &r.site)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, de-duplicated identifiers, for building a selection list
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.records.iter().map(|r| r.site.id_text()).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// First record whose identifier equals `label` exactly
    pub fn find(&self, label: &str) -> Result<&CanonicalRecord> {
        self.records
            .iter()
            .find(|r| r.site.id_text() == label)
            .ok_or_else(|| Error::UnknownReference {
                label: label.to_string(),
                available: self.records.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: &str, lon: f64, lat: f64) -> CanonicalRecord {
        CanonicalRecord {
            site: CanonicalSite::new(label, lon, lat).unwrap(),
            region_tag: None,
        }
    }

    #[test]
    fn test_site_rejects_out_of_range() {
        assert!(matches!(
            CanonicalSite::new("a", 181.0, 0.0),
            Err(RowValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            CanonicalSite::new("a", 0.0, -90.5),
            Err(RowValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            CanonicalSite::new("a", f64::NAN, 0.0),
            Err(RowValidationError::OutOfRange { .. })
        ));
        assert!(CanonicalSite::new("a", -180.0, 90.0).is_ok());
    }

    #[test]
    fn test_site_rejects_blank_identifier() {
        assert_eq!(
            CanonicalSite::new("  ", 0.0, 0.0),
            Err(RowValidationError::MissingIdentifier)
        );
    }

    #[test]
    fn test_labels_sorted_and_unique() {
        let table = CanonicalTable::new(
            Role::Reference,
            vec![
                record("Oak Elementary", 0.0, 0.0),
                record("Birch High", 1.0, 1.0),
                record("Oak Elementary", 2.0, 2.0),
            ],
        );
        assert_eq!(table.labels(), vec!["Birch High", "Oak Elementary"]);
    }

    #[test]
    fn test_find_takes_first_match() {
        let table = CanonicalTable::new(
            Role::Reference,
            vec![record("Oak", 0.0, 0.0), record("Oak", 2.0, 2.0)],
        );
        let found = table.find("Oak").unwrap();
        assert_eq!(found.site.lon(), 0.0);

        let err = table.find("Pine").unwrap_err();
        assert!(matches!(err, Error::UnknownReference { available: 2, .. }));
    }
}
