use std::sync::Arc;

use tracing::{debug, instrument};

use super::backend::DnsBackend;
use super::records::{top_mx_records, AddressLookup, MxAddresses, MxRecord, MxSlot};
use crate::cache::{cache_key, LookupCache};

/// Resolves hostnames to address sets and domains to their top two MX slots.
///
/// Failures never escape: they become `Unresolved` or an absent slot.
/// Results are memoized in the shared [`LookupCache`].
#[derive(Clone)]
pub struct DomainResolver {
    backend: Arc<dyn DnsBackend>,
    cache: Arc<LookupCache>,
}

impl DomainResolver {
    pub fn new(backend: Arc<dyn DnsBackend>, cache: Arc<LookupCache>) -> Self {
        Self { backend, cache }
    }

    /// Resolves every address (A and AAAA) of `host`.
    #[instrument(skip(self))]
    pub async fn resolve_addresses(&self, host: &str) -> AddressLookup {
        let key = cache_key(host);
        if key.is_empty() {
            return AddressLookup::Unresolved;
        }

        if let Some(hit) = self.cache.addresses.get(&key) {
            return hit;
        }

        let result = match self.backend.lookup_ip(&key).await {
            Ok(addresses) => AddressLookup::from_addresses(addresses),
            Err(e) => {
                debug!(error = %e, "Address lookup failed");
                AddressLookup::Unresolved
            }
        };

        self.cache.addresses.insert(key, result.clone());
        result
    }

    /// Resolves the addresses behind the two highest-priority MX exchanges.
    ///
    /// Only the first two preference ranks are ever inspected.
    #[instrument(skip(self))]
    pub async fn resolve_mx(&self, domain: &str) -> MxAddresses {
        let key = cache_key(domain);
        if key.is_empty() {
            return MxAddresses::none();
        }

        if let Some(hit) = self.cache.mx.get(&key) {
            return hit;
        }

        let records = match self.backend.lookup_mx(&key).await {
            Ok(records) => records,
            Err(e) => {
                debug!(error = %e, "MX lookup failed");
                Vec::new()
            }
        };

        let mut top = top_mx_records(records).into_iter();
        let mx1 = self.resolve_slot(top.next()).await;
        let mx2 = self.resolve_slot(top.next()).await;
        let result = MxAddresses { mx1, mx2 };

        self.cache.mx.insert(key, result.clone());
        result
    }

    async fn resolve_slot(&self, record: Option<MxRecord>) -> MxSlot {
        match record {
            Some(record) => {
                let addresses = self.resolve_addresses(&record.exchange).await;
                MxSlot::Present {
                    exchange: record.exchange,
                    addresses,
                }
            }
            None => MxSlot::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StaticDns;

    fn resolver(dns: StaticDns) -> (DomainResolver, Arc<StaticDns>) {
        let dns = Arc::new(dns);
        let resolver = DomainResolver::new(dns.clone(), Arc::new(LookupCache::default()));
        (resolver, dns)
    }

    #[tokio::test]
    async fn test_resolve_addresses_sorted() {
        let (resolver, _) = resolver(StaticDns::new().with_host("a.com", &["9.9.9.9", "1.2.3.4"]));

        let result = resolver.resolve_addresses("a.com").await;
        assert_eq!(result.to_string(), "1.2.3.4,9.9.9.9");
    }

    #[tokio::test]
    async fn test_unknown_host_is_unresolved() {
        let (resolver, _) = resolver(StaticDns::new());

        assert_eq!(
            resolver.resolve_addresses("missing.example").await,
            AddressLookup::Unresolved
        );
    }

    #[tokio::test]
    async fn test_empty_answer_is_unresolved() {
        let (resolver, _) = resolver(StaticDns::new().with_host("empty.com", &[]));

        assert_eq!(
            resolver.resolve_addresses("empty.com").await,
            AddressLookup::Unresolved
        );
    }

    #[tokio::test]
    async fn test_blank_host_skips_network() {
        let (resolver, dns) = resolver(StaticDns::new());

        assert_eq!(resolver.resolve_addresses("   ").await, AddressLookup::Unresolved);
        assert_eq!(resolver.resolve_mx("").await, MxAddresses::none());
        assert_eq!(dns.calls(), 0);
    }

    #[tokio::test]
    async fn test_resolve_addresses_is_memoized() {
        let (resolver, dns) = resolver(StaticDns::new().with_host("a.com", &["1.2.3.4"]));

        let first = resolver.resolve_addresses("a.com").await;
        let second = resolver.resolve_addresses("A.COM").await;

        assert_eq!(first, second);
        assert_eq!(dns.calls(), 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_gives_same_answers() {
        let dns = Arc::new(StaticDns::new().with_host("a.com", &["1.2.3.4"]));
        let resolver = DomainResolver::new(dns.clone(), Arc::new(LookupCache::disabled()));

        let first = resolver.resolve_addresses("a.com").await;
        let second = resolver.resolve_addresses("a.com").await;

        assert_eq!(first, second);
        assert_eq!(dns.calls(), 2);
    }

    #[tokio::test]
    async fn test_resolve_mx_single_exchange() {
        let (resolver, _) = resolver(
            StaticDns::new()
                .with_mx("a.com", &[("mail.a.com.", 10)])
                .with_host("mail.a.com", &["5.6.7.8"]),
        );

        let mx = resolver.resolve_mx("a.com").await;
        assert_eq!(mx.mx1.exchange(), Some("mail.a.com"));
        assert_eq!(mx.mx1.to_string(), "5.6.7.8");
        assert_eq!(mx.mx2, MxSlot::Absent);
        assert_eq!(mx.mx2.to_string(), "None");
    }

    #[tokio::test]
    async fn test_resolve_mx_uses_two_lowest_preferences() {
        let (resolver, _) = resolver(
            StaticDns::new()
                .with_mx(
                    "b.com",
                    &[("backup.b.com.", 30), ("mx1.b.com.", 5), ("mx2.b.com.", 10)],
                )
                .with_host("mx1.b.com", &["10.0.0.1"])
                .with_host("mx2.b.com", &["10.0.0.2"])
                .with_host("backup.b.com", &["10.0.0.3"]),
        );

        let mx = resolver.resolve_mx("b.com").await;
        assert_eq!(mx.mx1.to_string(), "10.0.0.1");
        assert_eq!(mx.mx2.to_string(), "10.0.0.2");
    }

    #[tokio::test]
    async fn test_resolve_mx_failure_gives_two_none_slots() {
        let (resolver, _) = resolver(StaticDns::new());

        let mx = resolver.resolve_mx("nomail.com").await;
        assert_eq!(mx, MxAddresses::none());
    }

    #[tokio::test]
    async fn test_resolve_mx_exchange_without_addresses() {
        let (resolver, _) = resolver(StaticDns::new().with_mx("a.com", &[("gone.a.com.", 10)]));

        let mx = resolver.resolve_mx("a.com").await;
        assert_eq!(mx.mx1.to_string(), "Unresolved");
        assert_eq!(mx.mx2.to_string(), "None");
    }
}
