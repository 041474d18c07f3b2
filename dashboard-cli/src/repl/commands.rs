use std::path::PathBuf;

use dashboard_core::output::OutputFormat;
use dashboard_core::RowAggregator;

/// Session state shared by every submission.
///
/// The aggregator (and with it the lookup cache) lives as long as the session.
#[derive(Clone)]
pub struct CommandContext {
    pub output_format: OutputFormat,
    pub output_path: Option<PathBuf>,
    pub aggregator: RowAggregator,
}

impl CommandContext {
    pub fn new(aggregator: RowAggregator, output_format: OutputFormat) -> Self {
        Self {
            output_format,
            output_path: None,
            aggregator,
        }
    }
}

#[derive(Debug)]
pub enum CommandResult {
    Continue,
    Exit,
    Error(String),
}

/// One parsed line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
    ClearScreen,
    SetOutput(OutputFormat),
    SetFile(Option<PathBuf>),
    SetExpiry(bool),
    CacheClear,
    CacheStats,
    Sheet(PathBuf),
    /// Anything else: `|`-separated domains for one row
    Check(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = parts.first() else {
            return Err("Nothing to do".to_string());
        };
        let args = &parts[1..];

        match first.to_lowercase().as_str() {
            "help" | "?" => Ok(ReplCommand::Help),
            "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
            "clear" => Ok(ReplCommand::ClearScreen),
            "set" => parse_set(args),
            "cache" => match args {
                ["clear"] => Ok(ReplCommand::CacheClear),
                [] | ["stats"] => Ok(ReplCommand::CacheStats),
                _ => Err("Usage: cache [clear|stats]".to_string()),
            },
            "sheet" => match args {
                [] => Err("Usage: sheet <file.csv|file.tsv>".to_string()),
                _ => Ok(ReplCommand::Sheet(PathBuf::from(args.join(" ")))),
            },
            _ => Ok(ReplCommand::Check(line.to_string())),
        }
    }
}

fn parse_set(args: &[&str]) -> Result<ReplCommand, String> {
    match args {
        ["output", format] => format.parse().map(ReplCommand::SetOutput),
        ["file", "off" | "none"] => Ok(ReplCommand::SetFile(None)),
        ["file", path] => Ok(ReplCommand::SetFile(Some(PathBuf::from(path)))),
        ["expiry", "on"] => Ok(ReplCommand::SetExpiry(true)),
        ["expiry", "off"] => Ok(ReplCommand::SetExpiry(false)),
        _ => Err(
            "Usage: set output <human|csv|json> | set file <path|off> | set expiry <on|off>"
                .to_string(),
        ),
    }
}
