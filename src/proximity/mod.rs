//! Proximity queries: haversine distance from a reference site to every
//! candidate, filtered by radius.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CanonicalSite, CanonicalTable, ProximityResult};

/// Mean Earth radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Meters per mile, as used for drawing the buffer on a map
pub const METERS_PER_MILE: f64 = 1609.0;

/// Radius choices offered to users, in miles
pub const RADIUS_PRESETS: &[f64] = &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 1.0, 2.0, 3.0, 4.0, 5.0];

pub const DEFAULT_RADIUS_MILES: f64 = 0.5;

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultOrder {
    /// Same order as the candidate table
    #[default]
    Input,
    /// Nearest first; ties keep input order
    Distance,
}

/// Great-circle distance in miles between two sites.
pub fn haversine_miles(from: &CanonicalSite, to: &CanonicalSite) -> f64 {
    let lat1 = from.lat().to_radians();
    let lat2 = to.lat().to_radians();
    let dlat = (to.lat() - from.lat()).to_radians();
    let dlon = (to.lon() - from.lon()).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * a.sqrt().asin()
}

/// Every candidate within `radius_miles` of `reference` (closed boundary),
/// in candidate table order. A radius that is not positive matches nothing.
pub fn query(
    reference: &CanonicalSite,
    candidates: &CanonicalTable,
    radius_miles: f64,
) -> Vec<ProximityResult> {
    query_with_order(reference, candidates, radius_miles, ResultOrder::Input)
}

pub fn query_with_order(
    reference: &CanonicalSite,
    candidates: &CanonicalTable,
    radius_miles: f64,
    order: ResultOrder,
) -> Vec<ProximityResult> {
    if radius_miles.is_nan() || radius_miles <= 0.0 {
        debug!("Radius {} is not positive, nothing matches", radius_miles);
        return Vec::new();
    }

    let mut results: Vec<ProximityResult> = candidates
        .sites()
        .filter_map(|site| {
            let distance_miles = haversine_miles(reference, site);
            (distance_miles <= radius_miles).then(|| ProximityResult {
                site: site.clone(),
                distance_miles,
            })
        })
        .collect();

    if order == ResultOrder::Distance {
        results.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    }

    debug!(
        "{} of {} candidates within {} miles of '{}'",
        results.len(),
        candidates.len(),
        radius_miles,
        reference.id_text()
    );

    results
}

/// Parse a user-supplied radius. Only non-numeric input is an error;
/// zero or negative values are accepted and simply match nothing.
pub fn parse_radius(input: &str) -> Result<f64> {
    match input.trim().parse::<f64>() {
        Ok(radius) if !radius.is_nan() => Ok(radius),
        _ => Err(Error::InvalidRadius(input.to_string())),
    }
}
