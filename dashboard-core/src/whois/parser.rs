use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lines that carry a registration expiry, across the formats registries use.
static EXPIRY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^\s*(?:Registry Expiry Date|Registrar Registration Expiration Date|Expiration Date|Expiry Date|Expiration Time|Expires On|Expires|Expire|paid-till|renewal date)\s*:\s*(.+?)\s*$",
    )
    .expect("Invalid WHOIS expiry regex")
});

static REFERRAL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^\s*(?:refer|whois|Registrar WHOIS Server|Whois Server|ReferralServer)\s*:\s*(?:whois://|rwhois://)?([A-Za-z0-9.-]+)",
    )
    .expect("Invalid WHOIS referral regex")
});

/// The parts of a WHOIS answer the dashboard cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoisRecord {
    pub domain: String,
    pub whois_server: String,
    /// Every parseable expiry value, in the order the server sent them
    pub expiration_dates: Vec<NaiveDate>,
    /// Next server the answer points to
    pub referral: Option<String>,
}

impl WhoisRecord {
    pub fn parse(domain: &str, whois_server: &str, raw: &str) -> Self {
        let mut expiration_dates = Vec::new();
        for caps in EXPIRY_LINE.captures_iter(raw) {
            if let Some(date) = caps.get(1).and_then(|m| parse_date(m.as_str())) {
                if !expiration_dates.contains(&date) {
                    expiration_dates.push(date);
                }
            }
        }

        WhoisRecord {
            domain: domain.to_string(),
            whois_server: whois_server.to_string(),
            expiration_dates,
            referral: extract_referral(raw),
        }
    }

    /// The first expiry value the server reported.
    ///
    /// Some servers repeat the field (registry and registrar copies); no
    /// precedence beyond answer order is applied.
    pub fn expiration_date(&self) -> Option<NaiveDate> {
        self.expiration_dates.first().copied()
    }
}

/// Finds the next WHOIS server an answer points to, if any.
pub fn extract_referral(response: &str) -> Option<String> {
    REFERRAL_LINE
        .captures_iter(response)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().trim_end_matches('.').to_lowercase())
        .find(|server| server.contains('.'))
}

/// Parses the date formats seen in WHOIS answers into a calendar date.
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let cleaned = date_str
        .trim()
        .trim_end_matches(" (UTC)")
        .trim_end_matches(" UTC")
        .trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.date_naive());
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y.%m.%d %H:%M:%S",
    ];
    for fmt in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt.date());
        }
    }

    let date_formats = [
        "%Y-%m-%d", "%d-%b-%Y", "%d-%B-%Y", "%Y.%m.%d", "%Y/%m/%d", "%d.%m.%Y", "%d/%m/%Y",
        "%b %d %Y", "%d %B %Y",
    ];
    for fmt in &date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(d);
        }
    }

    // "2026-03-01 12:00:00 +0100" and similar: retry with the leading token
    let first = cleaned.split_whitespace().next()?;
    if first != cleaned {
        return parse_date(first);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_verisign_style() {
        let raw = r#"
   Domain Name: EXAMPLE.COM
   Registry Domain ID: 2336799_DOMAIN_COM-VRSN
   Registrar WHOIS Server: whois.iana.org
   Updated Date: 2024-08-14T07:01:34Z
   Creation Date: 1995-08-14T04:00:00Z
   Registry Expiry Date: 2025-08-13T04:00:00Z
   Registrar: RESERVED-Internet Assigned Numbers Authority
"#;
        let record = WhoisRecord::parse("example.com", "whois.verisign-grs.com", raw);

        assert_eq!(record.expiration_date(), Some(ymd(2025, 8, 13)));
        assert_eq!(record.expiration_dates.len(), 1);
        assert_eq!(record.referral.as_deref(), Some("whois.iana.org"));
    }

    #[test]
    fn test_multiple_expiry_values_take_first() {
        let raw = "Registry Expiry Date: 2027-01-02T00:00:00Z\n\
                   Registrar Registration Expiration Date: 2027-01-03T00:00:00Z\n";
        let record = WhoisRecord::parse("example.org", "whois.pir.org", raw);

        assert_eq!(record.expiration_dates, vec![ymd(2027, 1, 2), ymd(2027, 1, 3)]);
        assert_eq!(record.expiration_date(), Some(ymd(2027, 1, 2)));
    }

    #[test]
    fn test_unparseable_expiry_is_skipped() {
        let raw = "Expiry Date: REDACTED\npaid-till: 2026.05.01\n";
        let record = WhoisRecord::parse("example.ru", "whois.tcinet.ru", raw);

        assert_eq!(record.expiration_date(), Some(ymd(2026, 5, 1)));
    }

    #[test]
    fn test_no_expiry() {
        let record = WhoisRecord::parse("example.com", "whois.example", "No match for domain");
        assert_eq!(record.expiration_date(), None);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2025-08-13T04:00:00Z"), Some(ymd(2025, 8, 13)));
        assert_eq!(parse_date("2025-08-13T04:00:00.000Z"), Some(ymd(2025, 8, 13)));
        assert_eq!(parse_date("2025-08-13T04:00:00+02:00"), Some(ymd(2025, 8, 13)));
        assert_eq!(parse_date("2025-08-13 04:00:00 UTC"), Some(ymd(2025, 8, 13)));
        assert_eq!(parse_date("13-Aug-2025"), Some(ymd(2025, 8, 13)));
        assert_eq!(parse_date("13-August-2025"), Some(ymd(2025, 8, 13)));
        assert_eq!(parse_date("2025/08/13"), Some(ymd(2025, 8, 13)));
        assert_eq!(parse_date("13.08.2025"), Some(ymd(2025, 8, 13)));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_extract_referral() {
        assert_eq!(
            extract_referral("refer:        whois.verisign-grs.com\n"),
            Some("whois.verisign-grs.com".to_string())
        );
        assert_eq!(
            extract_referral("Registrar WHOIS Server: whois.markmonitor.com\n"),
            Some("whois.markmonitor.com".to_string())
        );
        assert_eq!(
            extract_referral("ReferralServer: whois://whois.ripe.net\n"),
            Some("whois.ripe.net".to_string())
        );
        assert_eq!(extract_referral("Registrar WHOIS Server: \n"), None);
    }
}
