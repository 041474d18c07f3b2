mod backend;
mod records;
mod resolver;

pub use backend::{DnsBackend, HickoryBackend, DEFAULT_DNS_TIMEOUT};
pub use records::{
    top_mx_records, AddressLookup, MxAddresses, MxRecord, MxSlot, NO_MX, UNRESOLVED,
};
pub use resolver::DomainResolver;
