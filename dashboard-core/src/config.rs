use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_TTL;
use crate::dns::DEFAULT_DNS_TIMEOUT;
use crate::rdap::DEFAULT_HTTP_TIMEOUT;
use crate::whois::DEFAULT_WHOIS_TIMEOUT;

/// Settings for one dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Per-query DNS timeout
    pub dns_timeout: Duration,
    /// Timeout for RDAP requests, bootstrap included
    pub http_timeout: Duration,
    /// Timeout for each WHOIS connect/read/write step
    pub whois_timeout: Duration,
    pub cache_enabled: bool,
    pub cache_ttl: Duration,
    /// Whether primary domains get RDAP/WHOIS expiry lookups
    pub expiry_enabled: bool,
    /// Custom nameserver; Google DNS when unset
    pub nameserver: Option<IpAddr>,
    /// Rows processed at once; output order never changes
    pub concurrency: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dns_timeout: DEFAULT_DNS_TIMEOUT,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            whois_timeout: DEFAULT_WHOIS_TIMEOUT,
            cache_enabled: true,
            cache_ttl: DEFAULT_CACHE_TTL,
            expiry_enabled: true,
            nameserver: None,
            concurrency: 1,
        }
    }
}

impl DashboardConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_expiry(mut self, enabled: bool) -> Self {
        self.expiry_enabled = enabled;
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.dns_timeout, Duration::from_secs(5));
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.whois_timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(86_400));
        assert!(config.cache_enabled);
        assert!(config.expiry_enabled);
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn test_concurrency_floor() {
        assert_eq!(DashboardConfig::default().with_concurrency(0).concurrency, 1);
        assert_eq!(DashboardConfig::default().with_concurrency(8).concurrency, 8);
    }
}
