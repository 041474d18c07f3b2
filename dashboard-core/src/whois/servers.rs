use once_cell::sync::Lazy;
use std::collections::HashMap;

/// IANA's WHOIS service; answers for any TLD with a `refer:` line.
pub const IANA_WHOIS_SERVER: &str = "whois.iana.org";

/// Registry WHOIS servers for TLDs common enough to skip the IANA hop.
static WHOIS_SERVERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("com", "whois.verisign-grs.com"),
        ("net", "whois.verisign-grs.com"),
        ("cc", "ccwhois.verisign-grs.com"),
        ("tv", "whois.nic.tv"),
        ("org", "whois.pir.org"),
        ("info", "whois.afilias.net"),
        ("biz", "whois.nic.biz"),
        ("io", "whois.nic.io"),
        ("co", "whois.nic.co"),
        ("me", "whois.nic.me"),
        ("ai", "whois.nic.ai"),
        ("app", "whois.nic.google"),
        ("dev", "whois.nic.google"),
        ("xyz", "whois.nic.xyz"),
        ("online", "whois.nic.online"),
        ("site", "whois.nic.site"),
        ("email", "whois.nic.email"),
        ("uk", "whois.nic.uk"),
        ("de", "whois.denic.de"),
        ("fr", "whois.nic.fr"),
        ("nl", "whois.domain-registry.nl"),
        ("eu", "whois.eu"),
        ("ca", "whois.cira.ca"),
        ("au", "whois.auda.org.au"),
        ("in", "whois.registry.in"),
        ("us", "whois.nic.us"),
    ])
});

/// Returns the registry WHOIS server for `tld`, if it is in the built-in table.
pub fn get_whois_server(tld: &str) -> Option<&'static str> {
    WHOIS_SERVERS.get(tld.to_lowercase().as_str()).copied()
}

/// Returns the last label of `domain`.
pub fn get_tld(domain: &str) -> Option<&str> {
    domain.rsplit('.').next().filter(|tld| !tld.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_tld() {
        assert_eq!(get_tld("example.co.uk"), Some("uk"));
        assert_eq!(get_tld("example.com"), Some("com"));
        assert_eq!(get_tld("example."), None);
    }

    #[test]
    fn test_known_server_lookup_is_case_insensitive() {
        assert_eq!(get_whois_server("COM"), Some("whois.verisign-grs.com"));
        assert_eq!(get_whois_server("zz"), None);
    }
}
