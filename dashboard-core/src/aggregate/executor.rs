use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, instrument};

use super::row::ResultRow;
use crate::cache::LookupCache;
use crate::config::DashboardConfig;
use crate::dns::{AddressLookup, DnsBackend, DomainResolver, HickoryBackend, MxAddresses};
use crate::error::Result;
use crate::expiry::{ExpiryBand, ExpiryLookup, ExpiryRecord, RegistrationSource, RegistryLookup};
use crate::input::{InputMode, InputRow};
use crate::suffix::main_domain;

pub type ProgressCallback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Spreadsheet column prefixes, one per domain slot.
const SHEET_SLOTS: [&str; 3] = ["Mailing", "Tracking", "Image Hosting"];

/// Everything the primary domain of a row gets beyond its own addresses.
struct Enrichment {
    mx: MxAddresses,
    main: String,
    main_addresses: AddressLookup,
    expiry: ExpiryRecord,
    band: ExpiryBand,
}

/// Turns input rows into result rows.
///
/// Clones share the lookup cache, so a session can keep one aggregator and
/// benefit from memoized answers across submissions.
#[derive(Clone)]
pub struct RowAggregator {
    resolver: DomainResolver,
    expiry: ExpiryLookup,
    cache: Arc<LookupCache>,
    mode: InputMode,
    concurrency: usize,
}

impl RowAggregator {
    pub fn new(
        dns: Arc<dyn DnsBackend>,
        registry: Arc<dyn RegistrationSource>,
        cache: Arc<LookupCache>,
    ) -> Self {
        Self {
            resolver: DomainResolver::new(dns, cache.clone()),
            expiry: ExpiryLookup::new(registry, cache.clone()),
            cache,
            mode: InputMode::Text,
            concurrency: 1,
        }
    }

    /// Builds the production stack: hickory DNS plus RDAP/WHOIS.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let cache = Arc::new(if config.cache_enabled {
            LookupCache::new(config.cache_ttl)
        } else {
            LookupCache::disabled()
        });
        let dns = Arc::new(HickoryBackend::new(config.nameserver, config.dns_timeout));
        let registry = Arc::new(RegistryLookup::new(
            config.http_timeout,
            config.whois_timeout,
        )?);

        Ok(Self::new(dns, registry, cache)
            .with_expiry(config.expiry_enabled)
            .with_concurrency(config.concurrency))
    }

    pub fn with_mode(mut self, mode: InputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_expiry(mut self, enabled: bool) -> Self {
        self.expiry = self.expiry.with_enabled(enabled);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn expiry_enabled(&self) -> bool {
        self.expiry.is_enabled()
    }

    pub fn cache(&self) -> &Arc<LookupCache> {
        &self.cache
    }

    /// Builds one row. The domain at `detailed_index` is fully enriched;
    /// the others only get their addresses. An out-of-range index means no
    /// domain is enriched.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn build_row(&self, domains: &[String], detailed_index: usize) -> ResultRow {
        match self.mode {
            InputMode::Text => self.build_text_row(domains, detailed_index).await,
            InputMode::Spreadsheet => self.build_sheet_row(domains, detailed_index).await,
        }
    }

    /// Builds every row, at most `concurrency` at a time. Output order always
    /// matches input order.
    pub async fn build_batch(
        &self,
        rows: &[InputRow],
        progress: Option<ProgressCallback>,
    ) -> Vec<ResultRow> {
        let total = rows.len();
        let completed = Arc::new(AtomicUsize::new(0));

        debug!(
            total = total,
            concurrency = self.concurrency,
            "Starting batch"
        );

        stream::iter(rows)
            .map(|row| {
                let completed = completed.clone();
                let progress = progress.as_ref();

                async move {
                    let result = self.build_row(&row.domains, row.primary).await;

                    let count = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(progress) = progress {
                        progress(count, total, &row.label());
                    }

                    result
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn build_text_row(&self, domains: &[String], primary: usize) -> ResultRow {
        let mut row = ResultRow::default();

        for (i, domain) in domains.iter().enumerate() {
            let domain = domain.trim();
            row.push(format!("Domain {}", i + 1), domain);
            row.push(
                format!("A Record ({})", domain),
                self.resolver.resolve_addresses(domain).await,
            );

            if i == primary {
                let e = self.enrich(domain).await;
                row.push(format!("MX1 IP ({})", domain), &e.mx.mx1);
                row.push(format!("MX2 IP ({})", domain), &e.mx.mx2);
                row.push(format!("Main Domain ({})", domain), &e.main);
                row.push(format!("A Record (Main {})", e.main), &e.main_addresses);
                row.push(format!("Expiry Date ({})", e.main), e.expiry);
                row.push(format!("Expiry Status ({})", e.main), e.band);
                row.band = Some(e.band);
            }
        }

        row
    }

    async fn build_sheet_row(&self, domains: &[String], primary: usize) -> ResultRow {
        let mut row = ResultRow::default();

        for (i, slot) in SHEET_SLOTS.iter().enumerate() {
            let domain = domains.get(i).map(|d| d.trim()).unwrap_or_default();
            row.push(format!("{} Domain", slot), domain);
            row.push(
                format!("{} A Record", slot),
                self.resolver.resolve_addresses(domain).await,
            );

            // Enrichment columns sit after the mailing slot whichever domain is primary
            if i == 0 {
                let detailed = domains.get(primary).map(|d| d.trim()).unwrap_or_default();
                let e = self.enrich(detailed).await;
                row.push("MX1 IP", &e.mx.mx1);
                row.push("MX2 IP", &e.mx.mx2);
                row.push("Main Domain", &e.main);
                row.push("Main Domain A Record", &e.main_addresses);
                row.push("Expiry Date", e.expiry);
                row.push("Expiry Status", e.band);
                row.band = Some(e.band);
            }
        }

        row
    }

    async fn enrich(&self, domain: &str) -> Enrichment {
        let mx = self.resolver.resolve_mx(domain).await;
        let main = main_domain(domain);
        let main_addresses = self.resolver.resolve_addresses(&main).await;
        let expiry = self.expiry.expiry_date(&main).await;

        Enrichment {
            mx,
            band: ExpiryBand::today(&expiry),
            main,
            main_addresses,
            expiry,
        }
    }
}
