use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::expiry::ExpiryBand;

/// One flat output row: ordered `(column, value)` pairs.
///
/// `band` is the expiry urgency of the row's primary domain, used for
/// styling; it is also present as the text of the expiry status column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRow {
    pub columns: Vec<(String, String)>,
    pub band: Option<ExpiryBand>,
}

impl ResultRow {
    pub(crate) fn push(&mut self, column: impl Into<String>, value: impl ToString) {
        self.columns.push((column.into(), value.to_string()));
    }

    /// Value of the first column named `column`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Serialized as a JSON object with columns in row order.
impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Union of the rows' column names, in first-seen order.
///
/// Text-mode rows differ in width and naming, so exports use this as the
/// shared header.
pub fn batch_headers(rows: &[ResultRow]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for name in row.headers() {
            if !headers.iter().any(|h| h == name) {
                headers.push(name.to_string());
            }
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> ResultRow {
        let mut row = ResultRow::default();
        for (name, value) in pairs {
            row.push(*name, value);
        }
        row
    }

    #[test]
    fn test_get_and_headers() {
        let r = row(&[("Domain 1", "a.com"), ("A Record (a.com)", "1.2.3.4")]);
        assert_eq!(r.get("A Record (a.com)"), Some("1.2.3.4"));
        assert_eq!(r.get("Domain 2"), None);
        assert_eq!(r.headers().collect::<Vec<_>>(), vec!["Domain 1", "A Record (a.com)"]);
    }

    #[test]
    fn test_serialize_keeps_column_order() {
        let r = row(&[("Zeta", "1"), ("Alpha", "2")]);
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"Zeta":"1","Alpha":"2"}"#);
    }

    #[test]
    fn test_batch_headers_union() {
        let rows = vec![
            row(&[("Domain 1", "a.com"), ("A Record (a.com)", "x")]),
            row(&[("Domain 1", "b.com"), ("A Record (b.com)", "y"), ("Domain 2", "c.com")]),
        ];
        assert_eq!(
            batch_headers(&rows),
            vec!["Domain 1", "A Record (a.com)", "A Record (b.com)", "Domain 2"]
        );
    }
}
