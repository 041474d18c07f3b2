use std::collections::HashSet;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use super::parser::WhoisRecord;
use super::servers::{get_tld, get_whois_server, IANA_WHOIS_SERVER};
use crate::error::{DashError, Result};
use crate::validation::check_whois_server;

const WHOIS_PORT: u16 = 43;
pub const DEFAULT_WHOIS_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RESPONSE_SIZE: usize = 1024 * 1024; // 1MB
const MAX_REFERRAL_DEPTH: u8 = 3;

/// Port-43 WHOIS client that follows registry referrals.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    timeout: Duration,
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WhoisClient {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_WHOIS_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Looks up `domain`, starting from the built-in registry server for its
    /// TLD or from IANA when the TLD isn't listed.
    #[instrument(skip(self), fields(domain = %domain))]
    pub async fn lookup(&self, domain: &str) -> Result<WhoisRecord> {
        let domain = domain.trim().trim_end_matches('.').to_lowercase();
        let tld = get_tld(&domain).ok_or_else(|| DashError::InvalidDomain(domain.clone()))?;
        if !domain.contains('.') {
            return Err(DashError::InvalidDomain(domain));
        }

        let mut server = get_whois_server(tld)
            .unwrap_or(IANA_WHOIS_SERVER)
            .to_string();
        let mut chain = ReferralChain::default();

        for depth in 0..=MAX_REFERRAL_DEPTH {
            if !chain.enter(&server) {
                warn!(server = %server, "Circular WHOIS referral detected");
                break;
            }

            debug!(whois_server = %server, depth = depth, "Querying WHOIS server");
            let raw_response = match self.query_server(&server, &domain).await {
                Ok(raw) => raw,
                Err(e) => {
                    chain.fail(e)?;
                    break;
                }
            };

            let record = WhoisRecord::parse(&domain, &server, &raw_response);
            let Some(next) = chain.accept(record) else {
                break;
            };
            if depth == MAX_REFERRAL_DEPTH {
                warn!(server = %server, "Max referral depth exceeded");
                break;
            }
            if let Err(e) = check_whois_server(&next, WHOIS_PORT).await {
                debug!(error = %e, referral = %next, "Not following referral");
                break;
            }

            debug!(referral = %next, "Following referral");
            server = next;
        }

        chain.finish(tld)
    }

    async fn query_server(&self, server: &str, query: &str) -> Result<String> {
        let addr = format!("{}:{}", server, WHOIS_PORT);

        let mut stream = timeout(self.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| DashError::Timeout(format!("Connection to {} timed out", server)))?
            .map_err(|e| DashError::WhoisError(format!("Failed to connect to {}: {}", server, e)))?;

        let query_bytes = format!("{}\r\n", query);
        timeout(self.timeout, stream.write_all(query_bytes.as_bytes()))
            .await
            .map_err(|_| DashError::Timeout("Write timed out".to_string()))?
            .map_err(|e| DashError::WhoisError(format!("Failed to send query: {}", e)))?;

        let mut response = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            match timeout(self.timeout, stream.read(&mut buf)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => {
                    response.extend_from_slice(&buf[..n]);
                    if response.len() > MAX_RESPONSE_SIZE {
                        return Err(DashError::WhoisError("Response too large".to_string()));
                    }
                }
                Ok(Err(e)) => {
                    return Err(DashError::WhoisError(format!("Read error: {}", e)));
                }
                Err(_) => {
                    if !response.is_empty() {
                        break;
                    }
                    return Err(DashError::Timeout("Read timed out".to_string()));
                }
            }
        }

        Ok(decode_response(response))
    }
}

/// Answers gathered while walking registry and registrar referrals.
#[derive(Debug, Default)]
struct ReferralChain {
    visited: HashSet<String>,
    best: Option<WhoisRecord>,
}

impl ReferralChain {
    /// Marks `server` as queried; false when it was already visited.
    fn enter(&mut self, server: &str) -> bool {
        self.visited.insert(server.to_string())
    }

    /// Records an answer and returns the unvisited server it refers to.
    ///
    /// Registrar answers sometimes omit the expiry the registry had; those
    /// don't replace an answer that carried one.
    fn accept(&mut self, record: WhoisRecord) -> Option<String> {
        let next = record
            .referral
            .clone()
            .filter(|server| !self.visited.contains(server));

        let keep_previous = record.expiration_date().is_none()
            && self
                .best
                .as_ref()
                .is_some_and(|prev| prev.expiration_date().is_some());
        if !keep_previous {
            self.best = Some(record);
        }

        next
    }

    /// A failed query ends the walk; it is only an error when nothing has
    /// answered yet.
    fn fail(&self, error: DashError) -> Result<()> {
        match self.best {
            Some(_) => {
                debug!(error = %error, "Referral query failed, keeping last answer");
                Ok(())
            }
            None => Err(error),
        }
    }

    fn finish(self, tld: &str) -> Result<WhoisRecord> {
        self.best
            .ok_or_else(|| DashError::WhoisServerNotFound(tld.to_string()))
    }
}

/// UTF-8 when valid, otherwise Latin-1.
fn decode_response(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&c| c as char).collect(),
    }
}
