//! CSV loading: file path in, ordered `RawRow` sequence out.

use crate::error::{Result, SeedError};
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One CSV data row: header name to trimmed cell text. Ephemeral, only
/// lives for the duration of a run.
pub type RawRow = HashMap<String, String>;

/// Reads the whole file into memory as raw rows. The first line is the
/// header; a leading UTF-8 BOM is stripped; cells are trimmed; lines
/// whose cells are all empty are dropped. No side effects beyond the
/// read itself.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>> {
    if !path.exists() {
        return Err(SeedError::FileNotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Cell accessor; missing columns read as empty.
pub fn field<'a>(row: &'a RawRow, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}

/// Cell accessor for nullable columns: empty string coalesces to None.
pub fn optional(row: &RawRow, name: &str) -> Option<String> {
    match field(row, name) {
        "" => None,
        value => Some(value.to_string()),
    }
}
