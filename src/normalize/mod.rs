//! Schema normalization.
//!
//! Turns a delimited dataset with an unknown delimiter and variant column
//! names into a [`CanonicalTable`]. Rows with bad coordinates or a blank
//! identifier are dropped and reported; structural problems fail the load.

mod columns;
mod delimiter;

pub use columns::{
    infer_mapping, ColumnMapping, ColumnProfile, CoordinateStrategy, IdentifierStrategy,
};
pub use delimiter::{infer_delimiter, CANDIDATE_DELIMITERS};

use csv::ReaderBuilder;
use tracing::{debug, info, warn};

use crate::error::{Error, Result, RowRejection, RowValidationError};
use crate::models::{CanonicalRecord, CanonicalSite, CanonicalTable, Role};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A parsed but not yet interpreted dataset
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Header names, trimmed and lower-cased
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source text
    pub line: u64,
    pub fields: Vec<String>,
}

impl RawTable {
    /// Build from already-split rows, e.g. handed over by another loader
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self {
            headers: headers.iter().map(|h| normalize_header(h)).collect(),
            rows,
        }
    }

    /// Split delimited text. The first record is the header row.
    pub fn parse(text: &[u8], delimiter: u8) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text);

        // Fields are decoded lossily so one badly-encoded cell (Latin-1
        // exports) cannot take the whole file down.
        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| normalize_header(&String::from_utf8_lossy(h)))
            .collect();

        let mut rows = Vec::new();
        for record in reader.byte_records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            rows.push(RawRow {
                line,
                fields: record
                    .iter()
                    .map(|f| String::from_utf8_lossy(f).into_owned())
                    .collect(),
            });
        }

        Ok(Self { headers, rows })
    }
}

/// Normalized table plus the rows that were dropped on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub table: CanonicalTable,
    pub rejected: Vec<RowRejection>,
}

/// Normalize raw delimited bytes for the given role.
pub fn normalize(raw: &[u8], role: Role) -> Result<Normalized> {
    let text = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    let delimiter = infer_delimiter(text)?;
    let table = RawTable::parse(text, delimiter)?;
    normalize_table(&table, role)
}

/// Normalize an already-split table for the given role.
pub fn normalize_table(raw: &RawTable, role: Role) -> Result<Normalized> {
    let width = raw.headers.len();
    if width == 0 {
        return Err(Error::MalformedInput("dataset has no header row".to_string()));
    }

    let mut rejected = Vec::new();
    let mut well_formed = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        if row.fields.len() == width {
            well_formed.push(row);
        } else {
            rejected.push(RowRejection {
                line: row.line,
                error: RowValidationError::FieldCount {
                    expected: width,
                    found: row.fields.len(),
                },
            });
        }
    }

    let profiles: Vec<ColumnProfile> = raw
        .headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            ColumnProfile::from_values(name, well_formed.iter().map(|r| r.fields[i].as_str()))
        })
        .collect();

    let mapping = infer_mapping(&profiles, role)?;
    debug!(
        "{} columns: identifier='{}' lon='{}' lat='{}' region={:?}",
        role,
        raw.headers[mapping.identifier],
        raw.headers[mapping.lon],
        raw.headers[mapping.lat],
        mapping.region.map(|i| raw.headers[i].as_str())
    );

    let mut records = Vec::with_capacity(well_formed.len());
    for row in well_formed {
        match canonical_record(row, &mapping, &raw.headers) {
            Ok(record) => records.push(record),
            Err(error) => rejected.push(RowRejection {
                line: row.line,
                error,
            }),
        }
    }
    rejected.sort_by_key(|r| r.line);

    if !rejected.is_empty() {
        warn!(
            "Dropped {} of {} {} rows (first: line {}: {})",
            rejected.len(),
            raw.rows.len(),
            role,
            rejected[0].line,
            rejected[0].error
        );
    }
    info!("Normalized {} {} rows", records.len(), role);

    Ok(Normalized {
        table: CanonicalTable::new(role, records),
        rejected,
    })
}

fn canonical_record(
    row: &RawRow,
    mapping: &ColumnMapping,
    headers: &[String],
) -> std::result::Result<CanonicalRecord, RowValidationError> {
    let coordinate = |i: usize| {
        let value = row.fields[i].trim();
        value
            .parse::<f64>()
            .map_err(|_| RowValidationError::UnparseableCoordinate {
                column: headers[i].clone(),
                value: value.to_string(),
            })
    };

    let lon = coordinate(mapping.lon)?;
    let lat = coordinate(mapping.lat)?;
    let site = CanonicalSite::new(row.fields[mapping.identifier].trim(), lon, lat)?;

    let region_tag = mapping
        .region
        .map(|i| row.fields[i].trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string);

    Ok(CanonicalRecord { site, region_tag })
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHOOLS: &str = "\
label,lon,lat,shortname
Oak Elementary,-87.65,41.85,NORTH
Birch High,-87.70,41.90,south
";

    #[test]
    fn test_reference_table() {
        let normalized = normalize(SCHOOLS.as_bytes(), Role::Reference).unwrap();
        assert!(normalized.rejected.is_empty());

        let table = normalized.table;
        assert_eq!(table.role(), Role::Reference);
        assert_eq!(table.len(), 2);
        let first = &table.records()[0];
        assert_eq!(first.site.id_text(), "Oak Elementary");
        assert_eq!(first.site.lon(), -87.65);
        assert_eq!(first.site.lat(), 41.85);
        assert_eq!(first.region_tag.as_deref(), Some("NORTH"));
    }

    #[test]
    fn test_bom_and_header_whitespace() {
        let text = "\u{feff} Address ; LON ;Lat\n12 Main St;-87.6;41.8\n";
        let normalized = normalize(text.as_bytes(), Role::Candidate).unwrap();
        assert_eq!(normalized.table.len(), 1);
        assert_eq!(normalized.table.records()[0].site.id_text(), "12 Main St");
    }

    #[test]
    fn test_bad_rows_dropped_and_counted() {
        let text = "\
address,lon,lat
1 Good St,-87.6,41.8
2 Bad St,abc,41.8
3 Far St,-200.0,41.8
,-87.6,41.8
6 Good St,-87.7,41.9
";
        let normalized = normalize(text.as_bytes(), Role::Candidate).unwrap();
        let ids: Vec<&str> = normalized.table.sites().map(|s| s.id_text()).collect();
        assert_eq!(ids, vec!["1 Good St", "6 Good St"]);

        let lines: Vec<u64> = normalized.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(matches!(
            normalized.rejected[0].error,
            RowValidationError::UnparseableCoordinate { .. }
        ));
        assert!(matches!(
            normalized.rejected[1].error,
            RowValidationError::OutOfRange { .. }
        ));
        assert_eq!(
            normalized.rejected[2].error,
            RowValidationError::MissingIdentifier
        );
    }

    #[test]
    fn test_short_row_rejected_by_field_count() {
        let row = |line: u64, fields: &[&str]| RawRow {
            line,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        };
        let raw = RawTable::new(
            vec!["address".to_string(), "lon".to_string(), "lat".to_string()],
            vec![
                row(2, &["1 Good St", "-87.6", "41.8"]),
                row(3, &["2 Short St", "-87.6"]),
            ],
        );
        let normalized = normalize_table(&raw, Role::Candidate).unwrap();
        assert_eq!(normalized.table.len(), 1);
        assert_eq!(
            normalized.rejected,
            vec![RowRejection {
                line: 3,
                error: RowValidationError::FieldCount {
                    expected: 3,
                    found: 2
                }
            }]
        );
    }

    #[test]
    fn test_idempotent() {
        let a = normalize(SCHOOLS.as_bytes(), Role::Reference).unwrap();
        let b = normalize(SCHOOLS.as_bytes(), Role::Reference).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_column_name_and_delimiter_invariance() {
        let comma = "address,lon,lat\n1 Main St,-87.6,41.8\n2 Elm Rd,-87.7,41.9\n";
        let semicolon = "Longitude;Latitude;ADDRESS\n-87.6;41.8;1 Main St\n-87.7;41.9;2 Elm Rd\n";
        let tab = "x\ty\taddress\n-87.6\t41.8\t1 Main St\n-87.7\t41.9\t2 Elm Rd\n";
        let mixed = "zip|Latitude|address|lng\n60601|41.8|1 Main St|-87.6\n60602|41.9|2 Elm Rd|-87.7\n";

        let a = normalize(comma.as_bytes(), Role::Candidate).unwrap().table;
        let b = normalize(semicolon.as_bytes(), Role::Candidate).unwrap().table;
        let c = normalize(tab.as_bytes(), Role::Candidate).unwrap().table;
        let d = normalize(mixed.as_bytes(), Role::Candidate).unwrap().table;
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
    }

    #[test]
    fn test_unrecognized_headers_numeric_pair() {
        let text = "site,x,y,owner\nOak,-87.6,41.8,city\n";
        // `site` and `owner` are both unrecognized text columns.
        let err = normalize(text.as_bytes(), Role::Reference).unwrap_err();
        assert!(matches!(err, Error::SchemaAmbiguity { .. }));

        let text = "site,easting,northing\nOak,-87.6,41.8\n";
        let normalized = normalize(text.as_bytes(), Role::Reference).unwrap();
        let site = &normalized.table.records()[0].site;
        assert_eq!((site.lon(), site.lat()), (-87.6, 41.8));
    }

    #[test]
    fn test_unrecognized_headers_with_bad_coordinate_row() {
        let text = "site,easting,northing\nOak,-87.6,41.8\nBirch,n/a,41.9\n";
        let normalized = normalize(text.as_bytes(), Role::Reference).unwrap();

        let ids: Vec<&str> = normalized.table.sites().map(|s| s.id_text()).collect();
        assert_eq!(ids, vec!["Oak"]);
        assert_eq!(
            normalized.rejected,
            vec![RowRejection {
                line: 3,
                error: RowValidationError::UnparseableCoordinate {
                    column: "easting".to_string(),
                    value: "n/a".to_string(),
                },
            }]
        );
    }

    #[test]
    fn test_invalid_utf8_field_does_not_abort_load() {
        let text = b"address,lon,lat\n1 Main St,-87.6,41.8\n2 Pe\xF1asco Rd,-87.7,41.9\n";
        let normalized = normalize(text, Role::Candidate).unwrap();
        assert!(normalized.rejected.is_empty());
        assert_eq!(normalized.table.len(), 2);
        assert_eq!(normalized.table.records()[0].site.id_text(), "1 Main St");
        assert_eq!(
            normalized.table.records()[1].site.id_text(),
            "2 Pe\u{FFFD}asco Rd"
        );
    }

    #[test]
    fn test_malformed_input() {
        let text = "address lon lat\n1 Main St -87.6 41.8\n";
        assert!(matches!(
            normalize(text.as_bytes(), Role::Candidate),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_raw_table_entry_point() {
        let raw = RawTable::new(
            vec![" Label ".to_string(), "LON".to_string(), "LAT".to_string()],
            vec![RawRow {
                line: 2,
                fields: vec!["Oak".to_string(), "1.5".to_string(), "2.5".to_string()],
            }],
        );
        let normalized = normalize_table(&raw, Role::Reference).unwrap();
        assert_eq!(normalized.table.records()[0].site.id_text(), "Oak");
        assert_eq!(normalized.table.records()[0].region_tag, None);
    }

    #[test]
    fn test_empty_region_value_is_none() {
        let text = "label,lon,lat,region\nOak,1.0,2.0,\n";
        let normalized = normalize(text.as_bytes(), Role::Reference).unwrap();
        assert_eq!(normalized.table.records()[0].region_tag, None);
    }
}
