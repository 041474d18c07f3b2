use super::InputRow;
use crate::error::{DashError, Result};

/// Parses free text: one row per line, `|` between the domains of a row.
///
/// Blank lines and blank entries are skipped; the first domain of each row is
/// primary.
pub fn parse_text(input: &str) -> Result<Vec<InputRow>> {
    let rows: Vec<InputRow> = input
        .lines()
        .map(|line| {
            line.split('|')
                .map(str::trim)
                .filter(|domain| !domain.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .filter(|domains| !domains.is_empty())
        .map(InputRow::new)
        .collect();

    if rows.is_empty() {
        return Err(DashError::EmptyInput(
            "enter at least one domain".to_string(),
        ));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row() {
        let rows = parse_text("a.com|b.com").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].domains, vec!["a.com", "b.com"]);
        assert_eq!(rows[0].primary, 0);
    }

    #[test]
    fn test_multiple_rows_and_whitespace() {
        let rows = parse_text("  a.com | b.com \n\n c.com\n| |\nd.com||e.com\n").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].domains, vec!["a.com", "b.com"]);
        assert_eq!(rows[1].domains, vec!["c.com"]);
        assert_eq!(rows[2].domains, vec!["d.com", "e.com"]);
    }

    #[test]
    fn test_malformed_domains_are_kept() {
        let rows = parse_text("not a domain|exa mple").unwrap();
        assert_eq!(rows[0].domains, vec!["not a domain", "exa mple"]);
    }

    #[test]
    fn test_empty_submission_rejected() {
        for input in ["", "   ", "\n\n", "| |", " | \n |"] {
            assert!(
                matches!(parse_text(input), Err(DashError::EmptyInput(_))),
                "accepted {:?}",
                input
            );
        }
    }
}
