use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, instrument};

use super::ExpiryRecord;
use crate::cache::{cache_key, LookupCache};
use crate::error::Result;
use crate::rdap::RdapClient;
use crate::validation::normalize_domain;
use crate::whois::WhoisClient;

/// Source of registration expiry dates.
///
/// `Ok(None)` means the source answered without an expiry; errors mean it
/// could not answer at all. Either way the caller sees `Unknown`.
#[async_trait]
pub trait RegistrationSource: Send + Sync {
    async fn expiration(&self, domain: &str) -> Result<Option<NaiveDate>>;
}

#[async_trait]
impl RegistrationSource for RdapClient {
    async fn expiration(&self, domain: &str) -> Result<Option<NaiveDate>> {
        let rdap = self.lookup_domain(domain).await?;
        debug!(name = ?rdap.ldh_name, events = rdap.events.len(), "RDAP answered");
        Ok(rdap.expiration_date())
    }
}

#[async_trait]
impl RegistrationSource for WhoisClient {
    async fn expiration(&self, domain: &str) -> Result<Option<NaiveDate>> {
        let record = self.lookup(domain).await?;
        debug!(
            server = %record.whois_server,
            candidates = record.expiration_dates.len(),
            "WHOIS answered"
        );
        Ok(record.expiration_date())
    }
}

/// RDAP first, WHOIS when RDAP fails or has no expiration event.
#[derive(Clone)]
pub struct RegistryLookup {
    rdap: Arc<dyn RegistrationSource>,
    whois: Arc<dyn RegistrationSource>,
}

impl RegistryLookup {
    pub fn new(http_timeout: Duration, whois_timeout: Duration) -> Result<Self> {
        Ok(Self::with_sources(
            Arc::new(RdapClient::new(http_timeout)?),
            Arc::new(WhoisClient::new().with_timeout(whois_timeout)),
        ))
    }

    pub fn with_sources(
        rdap: Arc<dyn RegistrationSource>,
        whois: Arc<dyn RegistrationSource>,
    ) -> Self {
        Self { rdap, whois }
    }
}

#[async_trait]
impl RegistrationSource for RegistryLookup {
    #[instrument(skip(self))]
    async fn expiration(&self, domain: &str) -> Result<Option<NaiveDate>> {
        let domain = normalize_domain(domain)?;

        match self.rdap.expiration(&domain).await {
            Ok(Some(date)) => {
                debug!("RDAP lookup successful");
                return Ok(Some(date));
            }
            Ok(None) => {
                debug!("RDAP response has no expiration event, falling back to WHOIS");
            }
            Err(e) => {
                debug!(error = %e, "RDAP failed, falling back to WHOIS");
            }
        }

        self.whois.expiration(&domain).await
    }
}

/// Expiry lookups for main domains, memoized per domain.
///
/// Failures of every kind collapse to [`ExpiryRecord::Unknown`]. When
/// disabled, no source is consulted and every record is `Unknown`.
#[derive(Clone)]
pub struct ExpiryLookup {
    source: Arc<dyn RegistrationSource>,
    cache: Arc<LookupCache>,
    enabled: bool,
}

impl ExpiryLookup {
    pub fn new(source: Arc<dyn RegistrationSource>, cache: Arc<LookupCache>) -> Self {
        Self {
            source,
            cache,
            enabled: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[instrument(skip(self))]
    pub async fn expiry_date(&self, main_domain: &str) -> ExpiryRecord {
        let key = cache_key(main_domain);
        if !self.enabled || key.is_empty() {
            return ExpiryRecord::Unknown;
        }

        if let Some(hit) = self.cache.expiry.get(&key) {
            return hit;
        }

        let record = match self.source.expiration(&key).await {
            Ok(date) => ExpiryRecord::from(date),
            Err(e) => {
                debug!(error = %e, "Expiry lookup failed");
                ExpiryRecord::Unknown
            }
        };

        self.cache.expiry.insert(key, record);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StaticRegistry;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lookup(registry: StaticRegistry) -> (ExpiryLookup, Arc<StaticRegistry>) {
        let registry = Arc::new(registry);
        let lookup = ExpiryLookup::new(registry.clone(), Arc::new(LookupCache::default()));
        (lookup, registry)
    }

    #[tokio::test]
    async fn test_known_expiry() {
        let (lookup, _) =
            lookup(StaticRegistry::new().with_expiry("example.com", date(2027, 1, 31)));

        assert_eq!(
            lookup.expiry_date("example.com").await,
            ExpiryRecord::Known(date(2027, 1, 31))
        );
    }

    #[tokio::test]
    async fn test_source_failure_is_unknown() {
        let (lookup, _) = lookup(StaticRegistry::new());
        assert_eq!(lookup.expiry_date("missing.com").await, ExpiryRecord::Unknown);
    }

    #[tokio::test]
    async fn test_answer_without_expiry_is_unknown() {
        let (lookup, _) = lookup(StaticRegistry::new().without_expiry("noexp.com"));
        assert_eq!(lookup.expiry_date("noexp.com").await, ExpiryRecord::Unknown);
    }

    #[tokio::test]
    async fn test_memoized_per_main_domain() {
        let (lookup, registry) =
            lookup(StaticRegistry::new().with_expiry("example.com", date(2027, 1, 31)));

        let first = lookup.expiry_date("example.com").await;
        let second = lookup.expiry_date("Example.com.").await;

        assert_eq!(first, second);
        assert_eq!(registry.calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_memoized_too() {
        let (lookup, registry) = lookup(StaticRegistry::new());

        lookup.expiry_date("missing.com").await;
        lookup.expiry_date("missing.com").await;

        assert_eq!(registry.calls(), 1);
    }

    #[tokio::test]
    async fn test_disabled_never_queries() {
        let (lookup, registry) =
            lookup(StaticRegistry::new().with_expiry("example.com", date(2027, 1, 31)));
        let lookup = lookup.with_enabled(false);

        assert_eq!(lookup.expiry_date("example.com").await, ExpiryRecord::Unknown);
        assert_eq!(registry.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_domain_skips_source() {
        let (lookup, registry) = lookup(StaticRegistry::new());

        assert_eq!(lookup.expiry_date("  ").await, ExpiryRecord::Unknown);
        assert_eq!(registry.calls(), 0);
    }

    fn registry(
        rdap: StaticRegistry,
        whois: StaticRegistry,
    ) -> (RegistryLookup, Arc<StaticRegistry>, Arc<StaticRegistry>) {
        let rdap = Arc::new(rdap);
        let whois = Arc::new(whois);
        (
            RegistryLookup::with_sources(rdap.clone(), whois.clone()),
            rdap,
            whois,
        )
    }

    #[tokio::test]
    async fn test_rdap_answer_skips_whois() {
        let (registry, rdap, whois) = registry(
            StaticRegistry::new().with_expiry("example.com", date(2027, 1, 31)),
            StaticRegistry::new().with_expiry("example.com", date(2030, 1, 1)),
        );

        assert_eq!(
            registry.expiration("Example.COM.").await.unwrap(),
            Some(date(2027, 1, 31))
        );
        assert_eq!(rdap.calls(), 1);
        assert_eq!(whois.calls(), 0);
    }

    #[tokio::test]
    async fn test_rdap_failure_falls_back_to_whois() {
        let (registry, _, whois) = registry(
            StaticRegistry::new(),
            StaticRegistry::new().with_expiry("example.io", date(2026, 12, 1)),
        );

        assert_eq!(
            registry.expiration("example.io").await.unwrap(),
            Some(date(2026, 12, 1))
        );
        assert_eq!(whois.calls(), 1);
    }

    #[tokio::test]
    async fn test_rdap_without_expiration_event_falls_back_to_whois() {
        let (registry, rdap, whois) = registry(
            StaticRegistry::new().without_expiry("example.de"),
            StaticRegistry::new().with_expiry("example.de", date(2026, 3, 15)),
        );

        assert_eq!(
            registry.expiration("example.de").await.unwrap(),
            Some(date(2026, 3, 15))
        );
        assert_eq!((rdap.calls(), whois.calls()), (1, 1));
    }

    #[tokio::test]
    async fn test_both_sources_failing_is_an_error() {
        let (registry, _, _) = registry(StaticRegistry::new(), StaticRegistry::new());
        assert!(registry.expiration("example.net").await.is_err());

        let lookup = ExpiryLookup::new(Arc::new(registry), Arc::new(LookupCache::default()));
        assert_eq!(lookup.expiry_date("example.net").await, ExpiryRecord::Unknown);
    }

    #[tokio::test]
    async fn test_malformed_names_never_reach_a_source() {
        let (registry, rdap, whois) = registry(StaticRegistry::new(), StaticRegistry::new());

        for name in ["not a domain", "localhost", "bad_name.com"] {
            assert!(matches!(
                registry.expiration(name).await,
                Err(crate::error::DashError::InvalidDomain(_))
            ));
        }
        assert_eq!((rdap.calls(), whois.calls()), (0, 0));
    }
}
