//! Query output and its flattened export form.

use serde::Serialize;

use super::CanonicalSite;

/// A candidate site within the query radius
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityResult {
    pub site: CanonicalSite,
    pub distance_miles: f64,
}

/// Flat row written to delimited exports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub identifier: String,
    pub longitude: f64,
    pub latitude: f64,
    pub distance_miles: f64,
}

impl From<&ProximityResult> for ExportRecord {
    fn from(result: &ProximityResult) -> Self {
        Self {
            identifier: result.site.id_text().to_string(),
            longitude: result.site.lon(),
            latitude: result.site.lat(),
            distance_miles: result.distance_miles,
        }
    }
}
