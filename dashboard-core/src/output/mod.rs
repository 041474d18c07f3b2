mod csv;
mod human;
mod json;

pub use self::csv::{write_csv, CsvFormatter};
pub use human::HumanFormatter;
pub use json::JsonFormatter;

use serde::{Deserialize, Serialize};

use crate::aggregate::ResultRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" | "table" => Ok(OutputFormat::Human),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

pub trait OutputFormatter {
    fn format_rows(&self, rows: &[ResultRow]) -> String;
}

/// Formatter for `format`; `colors` only affects the human table.
pub fn get_formatter(format: OutputFormat, colors: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Human if colors => Box::new(HumanFormatter::new()),
        OutputFormat::Human => Box::new(HumanFormatter::new().without_colors()),
        OutputFormat::Csv => Box::new(CsvFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!("human".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }
}
