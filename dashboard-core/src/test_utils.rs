//! In-memory lookup backends for tests.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::dns::{DnsBackend, MxRecord};
use crate::error::{DashError, Result};
use crate::expiry::RegistrationSource;

/// DNS backend answering from fixed tables. Unknown names fail like NXDOMAIN.
#[derive(Default)]
pub struct StaticDns {
    hosts: HashMap<String, Vec<IpAddr>>,
    mx: HashMap<String, Vec<MxRecord>>,
    calls: AtomicUsize,
}

impl StaticDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: &str, addresses: &[&str]) -> Self {
        let parsed = addresses
            .iter()
            .map(|a| a.parse().expect("test address must parse"))
            .collect();
        self.hosts.insert(host.to_string(), parsed);
        self
    }

    pub fn with_mx(mut self, domain: &str, records: &[(&str, u16)]) -> Self {
        let records = records
            .iter()
            .map(|(exchange, preference)| MxRecord::new(*exchange, *preference))
            .collect();
        self.mx.insert(domain.to_string(), records);
        self
    }

    /// Number of backend queries served, both record types.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsBackend for StaticDns {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.hosts
            .get(host)
            .cloned()
            .ok_or_else(|| DashError::DnsError(format!("NXDOMAIN: {}", host)))
    }

    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mx
            .get(domain)
            .cloned()
            .ok_or_else(|| DashError::DnsError(format!("no MX for {}", domain)))
    }
}

/// Registration source answering from a fixed table. Unknown domains fail.
#[derive(Default)]
pub struct StaticRegistry {
    expiries: HashMap<String, Option<NaiveDate>>,
    calls: AtomicUsize,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expiry(mut self, domain: &str, date: NaiveDate) -> Self {
        self.expiries.insert(domain.to_string(), Some(date));
        self
    }

    /// Domain the registry knows but reports no expiry for.
    pub fn without_expiry(mut self, domain: &str) -> Self {
        self.expiries.insert(domain.to_string(), None);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistrationSource for StaticRegistry {
    async fn expiration(&self, domain: &str) -> Result<Option<NaiveDate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.expiries
            .get(domain)
            .copied()
            .ok_or_else(|| DashError::RdapError(format!("404 for {}", domain)))
    }
}
