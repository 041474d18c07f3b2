mod client;
mod parser;
mod servers;

pub use client::{WhoisClient, DEFAULT_WHOIS_TIMEOUT};
pub use parser::{extract_referral, parse_date, WhoisRecord};
pub use servers::{get_tld, get_whois_server, IANA_WHOIS_SERVER};
