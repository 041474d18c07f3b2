mod display;
mod repl;
mod report;

use std::io::Read;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dashboard_core::colors::PaletteExt;
use dashboard_core::output::OutputFormat;
use dashboard_core::{
    parse_text, read_spreadsheet, DashboardConfig, InputMode, InputRow, RowAggregator,
};
use tracing_subscriber::EnvFilter;

use crate::display::ProgressWriterFactory;

#[derive(Parser)]
#[command(name = "domdash")]
#[command(about = "Domain dashboard - A records, MX IPs, main domains and expiry dates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    opts: GlobalOpts,
}

#[derive(Subcommand)]
enum Commands {
    /// Check rows of `|`-separated domains (reads stdin when none are given)
    Check {
        /// One argument per row, e.g. "example.com|mail.example.net"
        inputs: Vec<String>,
    },
    /// Check every row of a CSV or TSV spreadsheet
    Sheet {
        /// File with Mailing Domain, Tracking Domain and Image Hosting Domain columns
        file: PathBuf,
    },
}

#[derive(Args)]
struct GlobalOpts {
    /// Output format (human, csv or json)
    #[arg(short, long, default_value = "human", global = true)]
    format: OutputFormat,

    /// Write results to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Skip RDAP/WHOIS expiry lookups
    #[arg(long, global = true)]
    no_expiry: bool,

    /// Don't memoize lookups
    #[arg(long, global = true)]
    no_cache: bool,

    /// Cache lifetime in seconds
    #[arg(long, default_value_t = 86_400, global = true)]
    cache_ttl: u64,

    /// Nameserver to query instead of Google DNS
    #[arg(long, global = true)]
    nameserver: Option<IpAddr>,

    /// DNS timeout in seconds
    #[arg(long, default_value_t = 5, global = true)]
    dns_timeout: u64,

    /// RDAP timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    http_timeout: u64,

    /// WHOIS timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    whois_timeout: u64,

    /// Rows checked at once
    #[arg(short = 'j', long, default_value_t = 1, global = true)]
    concurrency: usize,
}

impl GlobalOpts {
    fn to_config(&self) -> DashboardConfig {
        DashboardConfig {
            dns_timeout: Duration::from_secs(self.dns_timeout),
            http_timeout: Duration::from_secs(self.http_timeout),
            whois_timeout: Duration::from_secs(self.whois_timeout),
            cache_ttl: Duration::from_secs(self.cache_ttl),
            nameserver: self.nameserver,
            ..DashboardConfig::default()
        }
        .with_cache(!self.no_cache)
        .with_expiry(!self.no_expiry)
        .with_concurrency(self.concurrency)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(ProgressWriterFactory)
        .init();

    let cli = Cli::parse();
    let aggregator = RowAggregator::from_config(&cli.opts.to_config())?;

    match cli.command {
        Some(cmd) => execute_command(cmd, &cli.opts, aggregator).await,
        None => {
            let mut context = repl::CommandContext::new(aggregator, cli.opts.format);
            context.output_path = cli.opts.output.clone();
            let mut repl = repl::Repl::new(context)?;
            repl.run().await
        }
    }
}

async fn execute_command(
    command: Commands,
    opts: &GlobalOpts,
    aggregator: RowAggregator,
) -> anyhow::Result<()> {
    let (mode, rows) = match command {
        Commands::Check { inputs } => (InputMode::Text, exit_on_input_error(read_text_rows(inputs))),
        Commands::Sheet { file } => (
            InputMode::Spreadsheet,
            exit_on_input_error(read_spreadsheet(&file)),
        ),
    };

    let aggregator = aggregator.with_mode(mode);
    let results = report::run_batch(&aggregator, &rows).await;

    let output = opts.output.as_deref();
    report::emit(&results, opts.format, output, report::use_colors(output))
}

fn read_text_rows(inputs: Vec<String>) -> dashboard_core::Result<Vec<InputRow>> {
    let text = if inputs.is_empty() || inputs == ["-"] {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        inputs.join("\n")
    };
    parse_text(&text)
}

/// Rejected input ends the run before any lookup is made.
fn exit_on_input_error<T>(result: dashboard_core::Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            let hint = if e.is_input_error() {
                ""
            } else {
                " (unexpected failure)"
            };
            eprintln!("{} {}{}", "Error:".danger().bold(), e, hint.dimmed());
            std::process::exit(1);
        }
    }
}
