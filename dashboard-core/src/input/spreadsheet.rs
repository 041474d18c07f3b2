use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use super::InputRow;
use crate::error::{DashError, Result};

pub const MAILING_DOMAIN: &str = "Mailing Domain";
pub const TRACKING_DOMAIN: &str = "Tracking Domain";
pub const IMAGE_HOSTING_DOMAIN: &str = "Image Hosting Domain";

/// Header names every spreadsheet must carry, in result-row order.
pub const REQUIRED_COLUMNS: [&str; 3] = [MAILING_DOMAIN, TRACKING_DOMAIN, IMAGE_HOSTING_DOMAIN];

/// Reads a CSV spreadsheet, or TSV when the file ends in `.tsv`.
pub fn read_spreadsheet(path: impl AsRef<Path>) -> Result<Vec<InputRow>> {
    let path = path.as_ref();
    let delimiter = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    };

    debug!(path = %path.display(), delimiter = ?(delimiter as char), "Reading spreadsheet");
    let file = File::open(path)?;
    parse_spreadsheet(file, delimiter)
}

/// Parses spreadsheet rows into `[mailing, tracking, image]` input rows.
///
/// The mailing domain is primary. Every row is validated before any is
/// returned: a missing header or a row too short to hold a required column
/// rejects the whole file.
pub fn parse_spreadsheet<R: Read>(reader: R, delimiter: u8) -> Result<Vec<InputRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DashError::EmptyInput("spreadsheet is empty".to_string()));
    }

    let indices = column_indices(&headers)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let data_row = i + 1;

        let mut domains = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for (column, &idx) in REQUIRED_COLUMNS.iter().zip(indices.iter()) {
            let value = record.get(idx).ok_or_else(|| DashError::MissingColumn {
                column: column.to_string(),
                row: Some(data_row),
            })?;
            domains.push(value.to_string());
        }

        if domains.iter().all(String::is_empty) {
            continue;
        }
        rows.push(InputRow::new(domains));
    }

    if rows.is_empty() {
        return Err(DashError::EmptyInput(
            "spreadsheet has headers but no data rows".to_string(),
        ));
    }

    debug!(rows = rows.len(), "Spreadsheet parsed");
    Ok(rows)
}

fn column_indices(headers: &StringRecord) -> Result<[usize; 3]> {
    let mut indices = [0usize; 3];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| DashError::MissingColumn {
                column: column.to_string(),
                row: None,
            })?;
    }
    Ok(indices)
}
