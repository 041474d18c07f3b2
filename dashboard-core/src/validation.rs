//! Checks applied before a name is sent to a registry.
//!
//! DNS lookups tolerate any input (bad names just come back `Unresolved`),
//! but RDAP and WHOIS queries are only made for plausible domain names, and
//! WHOIS referrals are only followed to public addresses.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use tracing::debug;

use crate::error::{DashError, Result};

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Lower-cases `domain`, drops one root dot and checks it is a plausible
/// multi-label LDH name.
pub fn normalize_domain(domain: &str) -> Result<String> {
    let domain = domain.trim().trim_end_matches('.').to_lowercase();
    let invalid = || DashError::InvalidDomain(domain.clone());

    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN || !domain.contains('.') {
        return Err(invalid());
    }

    for label in domain.split('.') {
        let ldh = label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if label.is_empty()
            || label.len() > MAX_LABEL_LEN
            || !ldh
            || label.starts_with('-')
            || label.ends_with('-')
        {
            return Err(invalid());
        }
    }

    Ok(domain)
}

/// True for addresses a referral must never send a query to: private,
/// loopback, link-local, documentation, multicast and other reserved ranges.
pub fn is_private_or_reserved_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => is_private_or_reserved_ipv4(ipv4),
        IpAddr::V6(ipv6) => is_private_or_reserved_ipv6(ipv6),
    }
}

fn is_private_or_reserved_ipv4(ip: &Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();

    ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_unspecified()
        // TEST-NET-1/2/3
        || (a, b, c) == (192, 0, 2)
        || (a, b, c) == (198, 51, 100)
        || (a, b, c) == (203, 0, 113)
        // Shared address space (100.64.0.0/10)
        || (a == 100 && (b & 0xc0) == 64)
        // Multicast and reserved (224.0.0.0/3)
        || a >= 224
}

fn is_private_or_reserved_ipv6(ip: &Ipv6Addr) -> bool {
    let first = ip.segments()[0];

    ip.is_loopback()
        || ip.is_unspecified()
        // Unique local (fc00::/7)
        || (first & 0xfe00) == 0xfc00
        // Link-local (fe80::/10)
        || (first & 0xffc0) == 0xfe80
        // Multicast (ff00::/8)
        || (first >> 8) == 0xff
        || ip
            .to_ipv4_mapped()
            .is_some_and(|ipv4| is_private_or_reserved_ipv4(&ipv4))
}

/// Resolves a WHOIS server named in a referral and refuses it when any of
/// its addresses is private or reserved.
pub async fn check_whois_server(server: &str, port: u16) -> Result<()> {
    let addrs = tokio::net::lookup_host((server, port))
        .await
        .map_err(|e| DashError::WhoisError(format!("Failed to resolve {}: {}", server, e)))?;

    for addr in addrs {
        if is_private_or_reserved_ip(&addr.ip()) {
            debug!(server = %server, ip = %addr.ip(), "Referral points at a reserved address");
            return Err(DashError::UnsafeServer(server.to_string()));
        }
    }

    Ok(())
}
