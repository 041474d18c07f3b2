use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use tracing::{debug, instrument};

use super::records::MxRecord;
use crate::error::{DashError, Result};

/// Default timeout for DNS queries (5 seconds).
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw record queries the resolver is built on.
///
/// Implementations report failures as errors; turning them into
/// `Unresolved`/`None` is the resolver's job.
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// Returns every A and AAAA address for `host`.
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>>;

    /// Returns MX answers for `domain` in response order.
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>>;
}

/// DNS backend using hickory-resolver.
///
/// Uses Google DNS by default, or a single custom nameserver.
pub struct HickoryBackend {
    resolver: TokioAsyncResolver,
}

impl HickoryBackend {
    pub fn new(nameserver: Option<IpAddr>, timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 2;
        opts.use_hosts_file = false;

        let config = match nameserver {
            Some(ip) => {
                let socket_addr = SocketAddr::new(ip, 53);
                let mut config = ResolverConfig::new();
                config.add_name_server(NameServerConfig::new(socket_addr, Protocol::Udp));
                config
            }
            None => ResolverConfig::google(),
        };

        debug!(
            nameserver = ?nameserver,
            timeout_secs = timeout.as_secs(),
            "Building DNS resolver"
        );

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

impl Default for HickoryBackend {
    fn default() -> Self {
        Self::new(None, DEFAULT_DNS_TIMEOUT)
    }
}

#[async_trait]
impl DnsBackend for HickoryBackend {
    #[instrument(skip(self))]
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>> {
        let response = self
            .resolver
            .lookup_ip(host)
            .await
            .map_err(|e| DashError::DnsError(format!("address lookup failed: {}", e)))?;

        Ok(response.iter().collect())
    }

    #[instrument(skip(self))]
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>> {
        let response = self
            .resolver
            .mx_lookup(domain)
            .await
            .map_err(|e| DashError::DnsError(format!("MX lookup failed: {}", e)))?;

        Ok(response
            .iter()
            .map(|mx| MxRecord::new(mx.exchange().to_string(), mx.preference()))
            .collect())
    }
}
