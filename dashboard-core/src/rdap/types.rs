use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// RDAP domain object, reduced to what expiry lookups read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdapDomain {
    #[serde(default)]
    pub ldh_name: Option<String>,

    #[serde(default)]
    pub events: Vec<RdapEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdapEvent {
    pub event_action: String,
    #[serde(default)]
    pub event_date: Option<String>,
}

impl RdapEvent {
    /// Calendar date of the event; accepts RFC 3339 timestamps and bare dates.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.event_date.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }
}

impl RdapDomain {
    /// Date of the first `expiration` event.
    pub fn expiration_date(&self) -> Option<NaiveDate> {
        self.events
            .iter()
            .find(|e| e.event_action.eq_ignore_ascii_case("expiration"))
            .and_then(|e| e.parsed_date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiration_from_events() {
        let body = r#"{
            "objectClassName": "domain",
            "ldhName": "EXAMPLE.COM",
            "events": [
                {"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z"},
                {"eventAction": "expiration", "eventDate": "2026-08-13T04:00:00Z"},
                {"eventAction": "last update of RDAP database", "eventDate": "2026-01-01T00:00:00Z"}
            ],
            "entities": [],
            "nameservers": []
        }"#;
        let domain: RdapDomain = serde_json::from_str(body).unwrap();

        assert_eq!(domain.ldh_name.as_deref(), Some("EXAMPLE.COM"));
        assert_eq!(
            domain.expiration_date(),
            NaiveDate::from_ymd_opt(2026, 8, 13)
        );
    }

    #[test]
    fn test_missing_expiration_event() {
        let body = r#"{"ldhName": "example.de", "events": [{"eventAction": "last changed", "eventDate": "2020-01-01T00:00:00Z"}]}"#;
        let domain: RdapDomain = serde_json::from_str(body).unwrap();
        assert_eq!(domain.expiration_date(), None);
    }

    #[test]
    fn test_event_date_formats() {
        let event = |date: &str| RdapEvent {
            event_action: "expiration".to_string(),
            event_date: Some(date.to_string()),
        };

        assert_eq!(
            event("2027-03-01T23:30:00-05:00").parsed_date(),
            NaiveDate::from_ymd_opt(2027, 3, 1)
        );
        assert_eq!(event("2027-03-01").parsed_date(), NaiveDate::from_ymd_opt(2027, 3, 1));
        assert_eq!(event("soon").parsed_date(), None);
    }
}
