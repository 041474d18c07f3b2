use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("No domains to check: {0}")]
    EmptyInput(String),

    #[error("Spreadsheet is missing required column '{column}'{}", row_suffix(.row))]
    MissingColumn { column: String, row: Option<usize> },

    #[error("CSV error: {0}")]
    Spreadsheet(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WHOIS lookup failed: {0}")]
    WhoisError(String),

    #[error("WHOIS server not found for TLD: {0}")]
    WhoisServerNotFound(String),

    #[error("RDAP lookup failed: {0}")]
    RdapError(String),

    #[error("RDAP bootstrap failed: {0}")]
    RdapBootstrapError(String),

    #[error("DNS resolution failed: {0}")]
    DnsError(String),

    #[error("Refusing to query {0}: it resolves to a private or reserved address")]
    UnsafeServer(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomain(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl DashError {
    /// True for errors caused by what the user submitted, as opposed to a failed lookup.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DashError::EmptyInput(_)
                | DashError::MissingColumn { .. }
                | DashError::Spreadsheet(_)
                | DashError::Io(_)
        )
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(row) => format!(" (row {})", row),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
