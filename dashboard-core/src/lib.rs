pub mod aggregate;
pub mod cache;
pub mod colors;
pub mod config;
pub mod dns;
pub mod error;
pub mod expiry;
pub mod input;
pub mod output;
pub mod rdap;
pub mod suffix;
pub mod validation;
pub mod whois;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{DashError, Result};

pub use aggregate::{ProgressCallback, ResultRow, RowAggregator};
pub use cache::LookupCache;
pub use config::DashboardConfig;
pub use dns::{AddressLookup, DnsBackend, DomainResolver, HickoryBackend, MxAddresses, MxSlot};
pub use expiry::{
    expiry_style_class, ExpiryBand, ExpiryLookup, ExpiryRecord, RegistrationSource,
    RegistryLookup,
};
pub use input::{parse_spreadsheet, parse_text, read_spreadsheet, InputMode, InputRow};
pub use output::{OutputFormat, OutputFormatter};
pub use suffix::main_domain;
