//! Delimited-text export with a header row.

use std::io::Write;

use csv::Writer;

use super::OutputFormatter;
use crate::aggregate::{batch_headers, ResultRow};
use crate::error::Result;

/// Writes `rows` as CSV. Columns a row lacks are left blank.
pub fn write_csv<W: Write>(rows: &[ResultRow], writer: W) -> Result<()> {
    let headers = batch_headers(rows);
    let mut writer = Writer::from_writer(writer);

    writer.write_record(&headers)?;
    for row in rows {
        let record = headers.iter().map(|h| row.get(h).unwrap_or(""));
        writer.write_record(record)?;
    }

    writer.flush()?;
    Ok(())
}

pub struct CsvFormatter;

impl OutputFormatter for CsvFormatter {
    fn format_rows(&self, rows: &[ResultRow]) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = write_csv(rows, &mut buffer) {
            return format!("CSV export failed: {}", e);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
