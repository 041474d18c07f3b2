use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::types::RdapDomain;
use crate::cache::SingleValueCache;
use crate::error::{DashError, Result};

const IANA_BOOTSTRAP_DNS: &str = "https://data.iana.org/rdap/dns.json";

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const BOOTSTRAP_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// TLD -> RDAP base URL, as published by IANA.
type BootstrapTable = HashMap<String, String>;

#[derive(Deserialize)]
struct BootstrapResponse {
    services: Vec<Vec<serde_json::Value>>,
}

/// RDAP client for domain objects.
///
/// The IANA bootstrap table is fetched on first use and kept for a day.
/// Clones share it.
#[derive(Clone)]
pub struct RdapClient {
    http: Client,
    bootstrap: Arc<SingleValueCache<BootstrapTable>>,
}

impl RdapClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("domdash/", env!("CARGO_PKG_VERSION"), " (RDAP Client)"))
            .build()?;

        Ok(Self {
            http,
            bootstrap: Arc::new(SingleValueCache::new(BOOTSTRAP_TTL)),
        })
    }

    async fn bootstrap_table(&self) -> Result<BootstrapTable> {
        if let Some(table) = self.bootstrap.get() {
            return Ok(table);
        }

        debug!("Loading RDAP bootstrap data from IANA");
        let response = self.http.get(IANA_BOOTSTRAP_DNS).send().await?;
        if !response.status().is_success() {
            return Err(DashError::RdapBootstrapError(format!(
                "IANA bootstrap returned status {}",
                response.status()
            )));
        }

        let data: BootstrapResponse = response.json().await?;
        let table = parse_bootstrap(data);
        debug!(dns_entries = table.len(), "RDAP bootstrap loaded");

        self.bootstrap.set(table.clone());
        Ok(table)
    }

    /// Fetches the RDAP domain object for `domain`.
    #[instrument(skip(self), fields(domain = %domain))]
    pub async fn lookup_domain(&self, domain: &str) -> Result<RdapDomain> {
        let domain = domain.trim().trim_end_matches('.').to_lowercase();
        let table = self.bootstrap_table().await?;

        let base_url = rdap_base_for(&table, &domain).ok_or_else(|| {
            DashError::RdapBootstrapError(format!("No RDAP server for {}", domain))
        })?;

        let url = format!("{}domain/{}", ensure_trailing_slash(base_url), domain);
        debug!(url = %url, "Querying RDAP");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/rdap+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DashError::RdapError(format!(
                "RDAP query failed with status {}",
                response.status()
            )));
        }

        let rdap: RdapDomain = response.json().await?;
        Ok(rdap)
    }
}

fn parse_bootstrap(data: BootstrapResponse) -> BootstrapTable {
    let mut table = HashMap::new();

    for service in data.services {
        if service.len() < 2 {
            continue;
        }
        if let (Some(tlds), Some(urls)) = (service[0].as_array(), service[1].as_array()) {
            // Prefer an https endpoint when a service lists several
            let url = urls
                .iter()
                .filter_map(|u| u.as_str())
                .find(|u| u.starts_with("https://"))
                .or_else(|| urls.first().and_then(|u| u.as_str()));

            if let Some(url) = url {
                for tld in tlds.iter().filter_map(|t| t.as_str()) {
                    table.insert(tld.to_lowercase(), url.to_string());
                }
            }
        }
    }

    table
}

fn rdap_base_for<'a>(table: &'a BootstrapTable, domain: &str) -> Option<&'a str> {
    let tld = domain.rsplit('.').next().filter(|t| !t.is_empty())?;
    table.get(tld).map(String::as_str)
}

fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
