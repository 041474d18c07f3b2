use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Rendered in place of an address list when a host has no addresses.
pub const UNRESOLVED: &str = "Unresolved";

/// Rendered in place of an MX slot with no exchange at that rank.
pub const NO_MX: &str = "None";

/// Outcome of resolving one hostname's addresses.
///
/// A resolved set is never empty: an empty answer is `Unresolved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "addresses", rename_all = "lowercase")]
pub enum AddressLookup {
    Resolved(BTreeSet<String>),
    Unresolved,
}

impl AddressLookup {
    /// Builds a lookup from raw addresses, deduplicated and sorted as strings.
    pub fn from_addresses<I>(addresses: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        let set: BTreeSet<String> = addresses.into_iter().map(|ip| ip.to_string()).collect();
        if set.is_empty() {
            AddressLookup::Unresolved
        } else {
            AddressLookup::Resolved(set)
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, AddressLookup::Resolved(_))
    }

    pub fn addresses(&self) -> Option<&BTreeSet<String>> {
        match self {
            AddressLookup::Resolved(set) => Some(set),
            AddressLookup::Unresolved => None,
        }
    }
}

impl fmt::Display for AddressLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressLookup::Resolved(set) => {
                let joined = set.iter().map(String::as_str).collect::<Vec<_>>().join(",");
                write!(f, "{}", joined)
            }
            AddressLookup::Unresolved => write!(f, "{}", UNRESOLVED),
        }
    }
}

/// One MX answer: exchange host and preference (lower wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxRecord {
    pub exchange: String,
    pub preference: u16,
}

impl MxRecord {
    pub fn new(exchange: impl Into<String>, preference: u16) -> Self {
        Self {
            exchange: exchange.into(),
            preference,
        }
    }
}

/// Keeps the two highest-priority MX records.
///
/// Sorting is stable, so equal preferences keep answer order. Trailing root
/// dots are stripped from exchange names.
pub fn top_mx_records(mut records: Vec<MxRecord>) -> Vec<MxRecord> {
    records.sort_by_key(|r| r.preference);
    records.truncate(2);
    for record in &mut records {
        record.exchange = record.exchange.trim_end_matches('.').to_string();
    }
    records
}

/// One preference-ranked MX position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MxSlot {
    Present {
        exchange: String,
        addresses: AddressLookup,
    },
    Absent,
}

impl MxSlot {
    pub fn exchange(&self) -> Option<&str> {
        match self {
            MxSlot::Present { exchange, .. } => Some(exchange),
            MxSlot::Absent => None,
        }
    }
}

impl fmt::Display for MxSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MxSlot::Present { addresses, .. } => write!(f, "{}", addresses),
            MxSlot::Absent => write!(f, "{}", NO_MX),
        }
    }
}

/// Exactly two MX slots: the lowest and second-lowest preference exchanges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxAddresses {
    pub mx1: MxSlot,
    pub mx2: MxSlot,
}

impl MxAddresses {
    pub fn none() -> Self {
        Self {
            mx1: MxSlot::Absent,
            mx2: MxSlot::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answer_is_unresolved() {
        assert_eq!(
            AddressLookup::from_addresses(Vec::<IpAddr>::new()),
            AddressLookup::Unresolved
        );
        assert_eq!(AddressLookup::Unresolved.to_string(), "Unresolved");
    }

    #[test]
    fn test_addresses_are_deduplicated_and_sorted() {
        let ips: Vec<IpAddr> = ["9.9.9.9", "1.2.3.4", "10.0.0.1", "1.2.3.4"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let lookup = AddressLookup::from_addresses(ips);

        assert!(lookup.is_resolved());
        assert_eq!(lookup.addresses().unwrap().len(), 3);
        // Lexicographic, not numeric
        assert_eq!(lookup.to_string(), "1.2.3.4,10.0.0.1,9.9.9.9");
    }

    #[test]
    fn test_top_mx_records_stable_by_preference() {
        let records = vec![
            MxRecord::new("c.example.com.", 20),
            MxRecord::new("a.example.com.", 10),
            MxRecord::new("b.example.com.", 10),
            MxRecord::new("d.example.com.", 5),
        ];
        let top = top_mx_records(records);

        assert_eq!(
            top,
            vec![
                MxRecord::new("d.example.com", 5),
                MxRecord::new("a.example.com", 10),
            ]
        );
    }

    #[test]
    fn test_top_mx_records_tie_keeps_answer_order() {
        let records = vec![
            MxRecord::new("second.example.com.", 10),
            MxRecord::new("first.example.com.", 10),
        ];
        let top = top_mx_records(records);

        assert_eq!(top[0].exchange, "second.example.com");
        assert_eq!(top[1].exchange, "first.example.com");
    }

    #[test]
    fn test_mx_slot_display() {
        let slot = MxSlot::Present {
            exchange: "mail.a.com".to_string(),
            addresses: AddressLookup::from_addresses(vec!["5.6.7.8".parse().unwrap()]),
        };
        assert_eq!(slot.to_string(), "5.6.7.8");
        assert_eq!(slot.exchange(), Some("mail.a.com"));
        assert_eq!(MxSlot::Absent.to_string(), "None");

        let unresolved = MxSlot::Present {
            exchange: "gone.a.com".to_string(),
            addresses: AddressLookup::Unresolved,
        };
        assert_eq!(unresolved.to_string(), "Unresolved");
    }
}
