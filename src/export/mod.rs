//! Result export: delimited text for download and GeoJSON for map previews.

mod preview;

pub use preview::{preview, Feature, FeatureCollection, FeatureProperties, Geometry};

use csv::WriterBuilder;
use std::io::Write;

use crate::error::Result;
use crate::models::{ExportRecord, ProximityResult};

/// Header row of the CSV export, matching [`ExportRecord`]'s fields
pub const EXPORT_HEADERS: [&str; 4] = ["identifier", "longitude", "latitude", "distance_miles"];

/// Write results as comma-separated text with a header row.
///
/// The header is written even when there are no results.
pub fn write_csv<W: Write>(results: &[ProximityResult], writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(EXPORT_HEADERS)?;
    for result in results {
        writer.serialize(ExportRecord::from(result))?;
    }
    writer.flush()?;
    Ok(())
}

/// Download file name such as `Oak_Elementary_0.5mi.csv`
pub fn export_file_name(label: &str, radius_miles: f64) -> String {
    let stem: String = label
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    format!("{}_{}mi.csv", stem, radius_miles)
}
