//! Reads ride records out of a CSV export of the ride sheet.
//!
//! The sheet carries three metadata rows before the data; the time sits in
//! column A and the pickup/drop-off coordinates in columns D and E.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

use crate::types::RideRecord;

/// Where the interesting cells live in the source sheet. Columns are
/// zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLayout {
    pub skip_rows: usize,
    pub time_column: usize,
    pub pickup_column: usize,
    pub dropoff_column: usize,
}

impl Default for SourceLayout {
    fn default() -> Self {
        SourceLayout {
            skip_rows: 3,
            time_column: 0,
            pickup_column: 3,
            dropoff_column: 4,
        }
    }
}

/// Returns `bytes` unchanged, or gunzipped when `source` names a `.gz` file.
pub fn decompress(source: &str, bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !source.ends_with(".gz") {
        return Ok(bytes);
    }

    let mut decoder = GzDecoder::new(bytes.as_slice());
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .with_context(|| format!("failed to gunzip {source}"))?;
    debug!(compressed = bytes.len(), decompressed = out.len(), "Source gunzipped");
    Ok(out)
}

/// Parses CSV bytes into [`RideRecord`]s according to `layout`.
///
/// `skip_rows` counts physical lines, blank ones included. Rows shorter than
/// a configured column simply leave that cell empty.
///
/// # Errors
///
/// Returns an error if the CSV stream itself cannot be read (I/O failure or
/// invalid UTF-8). Malformed cell contents are not an error here.
pub fn load_records(bytes: &[u8], layout: &SourceLayout) -> Result<Vec<RideRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(skip_lines(bytes, layout.skip_rows));

    let mut records = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let row = result.with_context(|| format!("failed to read source record {}", index + 1))?;

        records.push(RideRecord {
            time_raw: row.get(layout.time_column).unwrap_or_default().to_string(),
            pickup_raw: cell(&row, layout.pickup_column),
            dropoff_raw: cell(&row, layout.dropoff_column),
        });
    }

    debug!(records = records.len(), "Source rows loaded");
    Ok(records)
}

/// Drops the first `n` physical lines. Done on raw bytes because the csv
/// reader silently discards blank lines.
fn skip_lines(bytes: &[u8], n: usize) -> &[u8] {
    let mut rest = bytes;
    for _ in 0..n {
        match rest.iter().position(|&b| b == b'\n') {
            Some(end) => rest = &rest[end + 1..],
            None => return &[],
        }
    }
    rest
}

fn cell(row: &csv::StringRecord, column: usize) -> Option<String> {
    row.get(column)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}
