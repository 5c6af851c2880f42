//! Error types for loading, normalizing and querying datasets.

use thiserror::Error;

/// Structural failures. Any of these aborts the whole load or query.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("ambiguous schema: {reason} (columns seen: {})", .columns.join(", "))]
    SchemaAmbiguity {
        reason: String,
        columns: Vec<String>,
    },

    #[error("unknown region '{tag}' (known regions: {})", .known.join(", "))]
    UnknownRegion { tag: String, known: Vec<String> },

    #[error("reference site '{0}' has no region tag, cannot route to a shard")]
    MissingRegionTag(String),

    #[error("region '{0}' is registered more than once")]
    DuplicateRegion(String),

    #[error("no reference site labelled '{label}' ({available} sites loaded)")]
    UnknownReference { label: String, available: usize },

    #[error("invalid radius '{0}': expected a number of miles")]
    InvalidRadius(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Soft, per-row failure. The row is dropped and the failure is reported
/// next to the normalized table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowValidationError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("identifier is empty")]
    MissingIdentifier,

    #[error("column '{column}' value '{value}' is not a number")]
    UnparseableCoordinate { column: String, value: String },

    #[error("coordinate ({lon}, {lat}) is outside the valid lon/lat range")]
    OutOfRange { lon: f64, lat: f64 },
}

/// A dropped row and the reason it was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRejection {
    /// 1-based line number in the source text
    pub line: u64,
    pub error: RowValidationError,
}
