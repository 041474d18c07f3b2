//! Parsing of submitted domains into rows.

mod spreadsheet;
mod text;

use serde::{Deserialize, Serialize};

pub use spreadsheet::{
    parse_spreadsheet, read_spreadsheet, IMAGE_HOSTING_DOMAIN, MAILING_DOMAIN,
    REQUIRED_COLUMNS, TRACKING_DOMAIN,
};
pub use text::parse_text;

/// How a submission was entered; decides the result column schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Text,
    Spreadsheet,
}

/// The domains that make up one result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRow {
    pub domains: Vec<String>,
    /// Index into `domains` of the domain that gets full enrichment
    pub primary: usize,
}

impl InputRow {
    pub fn new(domains: Vec<String>) -> Self {
        Self {
            domains,
            primary: 0,
        }
    }

    /// Short description for progress output.
    pub fn label(&self) -> String {
        self.domains
            .get(self.primary)
            .or_else(|| self.domains.first())
            .cloned()
            .unwrap_or_default()
    }
}
