//! Delimiter inference by field-count consistency over a leading sample.

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};

/// Delimiters tried, in tie-break priority order
pub const CANDIDATE_DELIMITERS: &[u8] = &[b',', b';', b'\t', b'|'];

/// Number of leading records (header included) inspected per candidate
const SAMPLE_RECORDS: usize = 64;

/// Pick the delimiter that splits every sampled record into the same number
/// of fields (more than one). The widest consistent split wins; ties go to
/// the earlier entry in [`CANDIDATE_DELIMITERS`].
pub fn infer_delimiter(text: &[u8]) -> Result<u8> {
    let mut best: Option<(u8, usize)> = None;

    for &delimiter in CANDIDATE_DELIMITERS {
        let Some(width) = consistent_width(text, delimiter) else {
            debug!("Delimiter {} gives inconsistent field counts", display(delimiter));
            continue;
        };
        if width < 2 {
            continue;
        }
        if best.map_or(true, |(_, w)| width > w) {
            best = Some((delimiter, width));
        }
    }

    match best {
        Some((delimiter, width)) => {
            debug!("Inferred delimiter {} ({} fields)", display(delimiter), width);
            Ok(delimiter)
        }
        None => Err(Error::MalformedInput(format!(
            "no delimiter among {} splits the first {} lines into a consistent number of fields",
            CANDIDATE_DELIMITERS
                .iter()
                .map(|d| display(*d))
                .collect::<Vec<_>>()
                .join(", "),
            SAMPLE_RECORDS
        ))),
    }
}

fn consistent_width(text: &[u8], delimiter: u8) -> Option<usize> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text);

    let mut width = None;
    for record in reader.byte_records().take(SAMPLE_RECORDS) {
        let len = record.ok()?.len();
        match width {
            None => width = Some(len),
            Some(w) if w != len => return None,
            Some(_) => {}
        }
    }
    width
}

/// Human-readable delimiter name for logs and error messages
pub fn display(delimiter: u8) -> &'static str {
    match delimiter {
        b',' => "comma",
        b';' => "semicolon",
        b'\t' => "tab",
        b'|' => "pipe",
        _ => "other",
    }
}
