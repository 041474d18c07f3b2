//! Registration expiry dates and their urgency bands.

mod lookup;

use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use lookup::{ExpiryLookup, RegistrationSource, RegistryLookup};

/// Rendered in place of a date when no expiry could be found.
pub const UNKNOWN_EXPIRY: &str = "Unknown";

/// Expiry of one main domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "date", rename_all = "lowercase")]
pub enum ExpiryRecord {
    Known(NaiveDate),
    Unknown,
}

impl ExpiryRecord {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ExpiryRecord::Known(date) => Some(*date),
            ExpiryRecord::Unknown => None,
        }
    }
}

impl From<Option<NaiveDate>> for ExpiryRecord {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or(ExpiryRecord::Unknown, ExpiryRecord::Known)
    }
}

impl fmt::Display for ExpiryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryRecord::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            ExpiryRecord::Unknown => write!(f, "{}", UNKNOWN_EXPIRY),
        }
    }
}

/// Urgency of an expiry date relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryBand {
    Unknown,
    Expired,
    Critical,
    Warning,
    Ok,
}

impl ExpiryBand {
    /// Band of `record` as of the current UTC date.
    ///
    /// Always recomputed: a cached date moves between bands as days pass.
    pub fn today(record: &ExpiryRecord) -> Self {
        expiry_style_class(record, Utc::now().date_naive())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryBand::Unknown => "unknown",
            ExpiryBand::Expired => "expired",
            ExpiryBand::Critical => "critical",
            ExpiryBand::Warning => "warning",
            ExpiryBand::Ok => "ok",
        }
    }
}

impl fmt::Display for ExpiryBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an expiry record to its urgency band as of `today`.
pub fn expiry_style_class(record: &ExpiryRecord, today: NaiveDate) -> ExpiryBand {
    let Some(date) = record.date() else {
        return ExpiryBand::Unknown;
    };

    match (date - today).num_days() {
        days if days < 0 => ExpiryBand::Expired,
        0..=30 => ExpiryBand::Critical,
        31..=90 => ExpiryBand::Warning,
        _ => ExpiryBand::Ok,
    }
}
