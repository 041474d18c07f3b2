//! Main-domain derivation using the Public Suffix List.
//!
//! Handles multi-label suffixes the way registries do:
//! - mail.example.com -> example.com
//! - sub.example.co.uk -> example.co.uk
//! - myblog.blogspot.com -> blogspot.com (private suffixes don't count)
//! - host.unknown-tld -> host.unknown-tld (no listed suffix, input returned as-is)

use serde::{Deserialize, Serialize};

/// A hostname split at its public suffix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainParts {
    /// Labels left of the registrable label, dot-joined (may be empty)
    pub subdomain: String,
    /// The registrable label itself (e.g. "example")
    pub label: String,
    /// The listed public suffix (e.g. "co.uk")
    pub suffix: String,
}

impl DomainParts {
    /// Returns `label.suffix` when both parts are present.
    pub fn registrable(&self) -> Option<String> {
        if self.label.is_empty() || self.suffix.is_empty() {
            None
        } else {
            Some(format!("{}.{}", self.label, self.suffix))
        }
    }
}

/// Splits `host` into subdomain, registrable label and public suffix.
///
/// Only ICANN suffixes that are actually on the list count. Private entries
/// (`blogspot.com`, `github.io`) and the implicit wildcard rule for unknown
/// TLDs are ignored, so hosted sites fold into the registered domain.
/// Parts that can't be identified are left empty.
pub fn split(host: &str) -> DomainParts {
    let name = host.trim().trim_end_matches('.').to_lowercase();
    let Some(suffix) = icann_suffix(&name) else {
        return DomainParts::default();
    };

    let rest = name
        .strip_suffix(suffix)
        .map(|s| s.trim_end_matches('.'))
        .unwrap_or_default();
    let (subdomain, label) = rest.rsplit_once('.').unwrap_or(("", rest));

    DomainParts {
        subdomain: subdomain.to_string(),
        label: label.to_string(),
        suffix: suffix.to_string(),
    }
}

/// Longest right-hand part of `name` that is a listed ICANN suffix.
fn icann_suffix(name: &str) -> Option<&str> {
    let mut candidate = name;
    loop {
        let listed = psl::suffix(candidate.as_bytes()).is_some_and(|suffix| {
            suffix.as_bytes() == candidate.as_bytes()
                && suffix.is_known()
                && suffix.typ() == Some(psl::Type::Icann)
        });
        if listed {
            return Some(candidate);
        }
        candidate = candidate.split_once('.')?.1;
    }
}

/// Derives the registrable "main domain" of `host`.
///
/// Returns `label.suffix` when both are identified, otherwise `host`
/// unchanged. Never fails.
pub fn main_domain(host: &str) -> String {
    split(host).registrable().unwrap_or_else(|| host.to_string())
}
