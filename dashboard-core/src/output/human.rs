use colored::Colorize;

use super::OutputFormatter;
use crate::aggregate::ResultRow;
use crate::colors::PaletteExt;
use crate::dns::{NO_MX, UNRESOLVED};
use crate::expiry::{ExpiryBand, UNKNOWN_EXPIRY};

/// Renders each row as an aligned block of `label  value` lines.
///
/// Expiry cells are colored by band; sentinels are dimmed.
pub struct HumanFormatter {
    use_colors: bool,
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn header(&self, text: &str) -> String {
        if self.use_colors {
            format!("\n{}\n{}", text.heading(), "─".repeat(text.chars().count()).muted())
        } else {
            format!("\n{}\n{}", text, "-".repeat(text.chars().count()))
        }
    }

    fn label(&self, text: &str, width: usize) -> String {
        let padded = format!("{:<width$}", text, width = width);
        if self.use_colors {
            padded.label().bold().to_string()
        } else {
            padded
        }
    }

    fn value(&self, column: &str, text: &str, band: Option<ExpiryBand>) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        let is_expiry = column.starts_with("Expiry Date") || column.starts_with("Expiry Status");
        match band {
            Some(band) if is_expiry => text.band(band).to_string(),
            _ if is_sentinel(text) => text.muted().to_string(),
            _ => text.value().to_string(),
        }
    }

    fn format_row(&self, index: usize, row: &ResultRow) -> String {
        let mut output = Vec::new();

        let title = row
            .columns
            .first()
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
            .unwrap_or("(blank)");
        output.push(self.header(&format!("Row {}: {}", index + 1, title)));

        let width = row.headers().map(|h| h.chars().count()).max().unwrap_or(0);
        for (column, value) in &row.columns {
            output.push(format!(
                "  {}  {}",
                self.label(column, width),
                self.value(column, value, row.band)
            ));
        }

        output.join("\n")
    }
}

fn is_sentinel(text: &str) -> bool {
    text == UNRESOLVED || text == NO_MX || text == UNKNOWN_EXPIRY || text.is_empty()
}

impl OutputFormatter for HumanFormatter {
    fn format_rows(&self, rows: &[ResultRow]) -> String {
        if rows.is_empty() {
            return "No results".to_string();
        }

        rows.iter()
            .enumerate()
            .map(|(i, row)| self.format_row(i, row))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
