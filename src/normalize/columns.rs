//! Column role inference.
//!
//! Coordinate and identifier columns are each found by an ordered list of
//! detection strategies. The first strategy that produces a mapping wins;
//! if all of them decline the schema is ambiguous.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Role;

/// Recognized longitude headers, after trim + lowercase, in priority order
const LONGITUDE_NAMES: &[&str] = &["lon", "longitude", "lng", "long", "x", "point_x"];

/// Recognized latitude headers, after trim + lowercase, in priority order
const LATITUDE_NAMES: &[&str] = &["lat", "latitude", "y", "point_y"];

const REFERENCE_IDENTIFIERS: &[&str] = &["label", "name", "school", "school_name"];
const CANDIDATE_IDENTIFIERS: &[&str] = &["address", "full_address", "street_address"];

/// Region/shortname headers used for shard routing (reference role only)
const REGION_COLUMNS: &[&str] = &["region", "region_tag", "shortname", "short_name"];

/// What the normalizer observed about a single column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    /// Trimmed, lower-cased header
    pub name: String,
    /// At least half of the non-empty values parse as finite floats
    pub numeric: bool,
    /// Largest absolute value among the values that parse, for numeric columns
    pub max_abs: Option<f64>,
}

impl ColumnProfile {
    /// Profile a column from its raw values.
    ///
    /// A few unparseable cells do not disqualify a numeric column; those rows
    /// are rejected individually later.
    pub fn from_values<'a>(name: &str, values: impl Iterator<Item = &'a str>) -> Self {
        let mut seen = 0usize;
        let mut parsed = 0usize;
        let mut max_abs: Option<f64> = None;

        for value in values.map(str::trim).filter(|v| !v.is_empty()) {
            seen += 1;
            if let Ok(v) = value.parse::<f64>() {
                if v.is_finite() {
                    parsed += 1;
                    max_abs = Some(max_abs.map_or(v.abs(), |m| m.max(v.abs())));
                }
            }
        }

        let numeric = parsed > 0 && parsed * 2 >= seen;
        Self {
            name: name.to_string(),
            numeric,
            max_abs: if numeric { max_abs } else { None },
        }
    }
}

/// Column indices of the canonical fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub identifier: usize,
    pub lon: usize,
    pub lat: usize,
    pub region: Option<usize>,
}

/// Ways of locating the coordinate pair, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateStrategy {
    /// A recognized longitude header and a recognized latitude header,
    /// in any spelling combination (`lon`/`latitude`, `lng`/`lat`, ...)
    NamedPair,
    /// Exactly two numeric columns
    NumericPair,
}

impl CoordinateStrategy {
    pub const PRIORITY: &'static [CoordinateStrategy] =
        &[CoordinateStrategy::NamedPair, CoordinateStrategy::NumericPair];

    /// Returns `(lon, lat)` column indices, or `None` to decline
    pub fn detect(&self, columns: &[ColumnProfile]) -> Option<(usize, usize)> {
        match self {
            CoordinateStrategy::NamedPair => {
                let lon = LONGITUDE_NAMES
                    .iter()
                    .find_map(|name| position(columns, name))?;
                let lat = LATITUDE_NAMES
                    .iter()
                    .find_map(|name| position(columns, name))?;
                Some((lon, lat))
            }
            CoordinateStrategy::NumericPair => {
                let numeric: Vec<usize> = columns
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.numeric)
                    .map(|(i, _)| i)
                    .collect();
                let &[first, second] = numeric.as_slice() else {
                    return None;
                };
                // Only longitude can exceed 90 in magnitude; otherwise keep column order.
                let beyond_lat = |i: usize| columns[i].max_abs.is_some_and(|m| m > 90.0);
                if beyond_lat(second) && !beyond_lat(first) {
                    Some((second, first))
                } else {
                    Some((first, second))
                }
            }
        }
    }
}

/// Ways of locating the identifier column, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierStrategy {
    /// A recognized header for the role (`label` or `address`)
    NamedAlias,
    /// The only column not already claimed
    SingleRemaining,
}

impl IdentifierStrategy {
    pub const PRIORITY: &'static [IdentifierStrategy] = &[
        IdentifierStrategy::NamedAlias,
        IdentifierStrategy::SingleRemaining,
    ];

    pub fn detect(&self, columns: &[ColumnProfile], role: Role, taken: &[usize]) -> Option<usize> {
        let free = |i: &usize| !taken.contains(i);
        match self {
            IdentifierStrategy::NamedAlias => identifier_aliases(role)
                .iter()
                .find_map(|alias| position(columns, alias).filter(free)),
            IdentifierStrategy::SingleRemaining => {
                let mut remaining = (0..columns.len()).filter(free);
                match (remaining.next(), remaining.next()) {
                    (Some(only), None) => Some(only),
                    _ => None,
                }
            }
        }
    }
}

fn identifier_aliases(role: Role) -> &'static [&'static str] {
    match role {
        Role::Reference => REFERENCE_IDENTIFIERS,
        Role::Candidate => CANDIDATE_IDENTIFIERS,
    }
}

fn position(columns: &[ColumnProfile], name: &str) -> Option<usize> {
    columns.iter().position(|c| c.name == name)
}

fn column_names(columns: &[ColumnProfile]) -> Vec<String> {
    columns.iter().map(|c| c.name.clone()).collect()
}

/// Resolve every canonical field to a column index.
pub fn infer_mapping(columns: &[ColumnProfile], role: Role) -> Result<ColumnMapping> {
    let (lon, lat) = CoordinateStrategy::PRIORITY
        .iter()
        .find_map(|strategy| {
            let found = strategy.detect(columns)?;
            debug!("Coordinate columns resolved by {:?}", strategy);
            Some(found)
        })
        .ok_or_else(|| {
            let numeric = columns.iter().filter(|c| c.numeric).count();
            Error::SchemaAmbiguity {
                reason: format!(
                    "no recognized coordinate headers and {} numeric columns (expected exactly 2)",
                    numeric
                ),
                columns: column_names(columns),
            }
        })?;

    let mut taken = vec![lon, lat];

    let region = match role {
        Role::Reference => REGION_COLUMNS
            .iter()
            .find_map(|name| position(columns, name).filter(|i| !taken.contains(i))),
        Role::Candidate => None,
    };
    taken.extend(region);

    let identifier = IdentifierStrategy::PRIORITY
        .iter()
        .find_map(|strategy| {
            let found = strategy.detect(columns, role, &taken)?;
            debug!("Identifier column resolved by {:?}", strategy);
            Some(found)
        })
        .ok_or_else(|| {
            let remaining = columns
                .iter()
                .enumerate()
                .filter(|(i, _)| !taken.contains(i))
                .map(|(_, c)| c.name.as_str())
                .collect::<Vec<_>>();
            Error::SchemaAmbiguity {
                reason: format!(
                    "cannot pick a {} identifier column from [{}]; expected one of [{}] or a single remaining column",
                    role,
                    remaining.join(", "),
                    identifier_aliases(role).join(", ")
                ),
                columns: column_names(columns),
            }
        })?;

    Ok(ColumnMapping {
        identifier,
        lon,
        lat,
        region,
    })
}
