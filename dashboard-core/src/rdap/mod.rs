mod client;
mod types;

pub use client::{RdapClient, DEFAULT_HTTP_TIMEOUT};
pub use types::{RdapDomain, RdapEvent};
