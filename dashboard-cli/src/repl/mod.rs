mod commands;
mod completer;

pub use commands::{CommandContext, CommandResult, ReplCommand};
pub use completer::DashCompleter;

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use dashboard_core::colors::PaletteExt;
use dashboard_core::output::OutputFormat;
use dashboard_core::{parse_text, read_spreadsheet, InputMode, InputRow};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Editor};

use crate::report::{emit, run_batch, use_colors};

const HISTORY_FILE: &str = ".domdash_history";

pub struct Repl {
    editor: Editor<DashCompleter, DefaultHistory>,
    context: CommandContext,
}

impl Repl {
    pub fn new(context: CommandContext) -> anyhow::Result<Self> {
        let config = rustyline::Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(rustyline::EditMode::Emacs)
            .build();

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(DashCompleter::new()));
        let _ = editor.load_history(&history_path());

        Ok(Self { editor, context })
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.print_banner();

        loop {
            let prompt = self.get_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    self.editor.add_history_entry(line)?;

                    match self.execute_line(line).await {
                        CommandResult::Continue => {}
                        CommandResult::Exit => break,
                        CommandResult::Error(e) => {
                            eprintln!("{} {}", "Error:".danger().bold(), e);
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("exit");
                    break;
                }
                Err(err) => {
                    eprintln!("{} {:?}", "Error:".danger().bold(), err);
                    break;
                }
            }
        }

        let _ = self.editor.save_history(&history_path());
        Ok(())
    }

    fn print_banner(&self) {
        println!();
        println!(
            "  {} - A records, MX IPs, main domains and expiry dates",
            format!("domdash v{}", env!("CARGO_PKG_VERSION")).heading()
        );
        println!(
            "  Enter domains separated by {}, or type {} for commands\n",
            "|".label(),
            "help".good()
        );
    }

    fn get_prompt(&self) -> String {
        let format_indicator = match self.context.output_format {
            OutputFormat::Human => "",
            OutputFormat::Csv => " [csv]",
            OutputFormat::Json => " [json]",
        };
        let expiry_indicator = if self.context.aggregator.expiry_enabled() {
            ""
        } else {
            " [no-expiry]"
        };
        format!(
            "{}{} ",
            "domdash".bright_cyan().bold(),
            format!("{}{}›", format_indicator, expiry_indicator).white()
        )
    }

    async fn execute_line(&mut self, line: &str) -> CommandResult {
        let command = match ReplCommand::parse(line) {
            Ok(command) => command,
            Err(e) => return CommandResult::Error(e),
        };

        match command {
            ReplCommand::Help => {
                self.print_help();
                CommandResult::Continue
            }
            ReplCommand::Exit => CommandResult::Exit,
            ReplCommand::ClearScreen => {
                print!("\x1B[2J\x1B[1;1H");
                let _ = std::io::stdout().flush();
                CommandResult::Continue
            }
            ReplCommand::SetOutput(format) => {
                self.context.output_format = format;
                println!("Output format set to {}", format!("{:?}", format).to_lowercase().good());
                CommandResult::Continue
            }
            ReplCommand::SetFile(path) => {
                match &path {
                    Some(p) => println!("Results will be written to {}", p.display().to_string().label()),
                    None => println!("Results will be printed"),
                }
                self.context.output_path = path;
                CommandResult::Continue
            }
            ReplCommand::SetExpiry(enabled) => {
                self.context.aggregator = self.context.aggregator.clone().with_expiry(enabled);
                println!(
                    "Expiry lookups {}",
                    if enabled { "enabled".good() } else { "disabled".caution() }
                );
                CommandResult::Continue
            }
            ReplCommand::CacheClear => {
                self.context.aggregator.cache().clear();
                println!("{} Cache cleared", "✓".good());
                CommandResult::Continue
            }
            ReplCommand::CacheStats => {
                let cache = self.context.aggregator.cache();
                cache.cleanup();
                println!(
                    "  {} addresses, {} MX sets, {} expiry dates cached",
                    cache.addresses.len(),
                    cache.mx.len(),
                    cache.expiry.len()
                );
                CommandResult::Continue
            }
            ReplCommand::Sheet(path) => self.execute_sheet(&path).await,
            ReplCommand::Check(text) => match parse_text(&text) {
                Ok(rows) => self.submit(InputMode::Text, &rows).await,
                Err(e) => CommandResult::Error(e.to_string()),
            },
        }
    }

    async fn execute_sheet(&self, path: &Path) -> CommandResult {
        match read_spreadsheet(path) {
            Ok(rows) => self.submit(InputMode::Spreadsheet, &rows).await,
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    async fn submit(&self, mode: InputMode, rows: &[InputRow]) -> CommandResult {
        let aggregator = self.context.aggregator.clone().with_mode(mode);
        let results = run_batch(&aggregator, rows).await;

        let output = self.context.output_path.as_deref();
        match emit(&results, self.context.output_format, output, use_colors(output)) {
            Ok(()) => CommandResult::Continue,
            Err(e) => CommandResult::Error(format!("{:#}", e)),
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "CHECKING DOMAINS".heading());
        println!("  {:<34} Check one row (first domain is fully enriched)", "<a.com|b.com|...>".label());
        println!("  {:<34} Check every row of a CSV/TSV spreadsheet", "sheet <file>".label());
        println!(
            "  {}",
            "Spreadsheets need Mailing Domain, Tracking Domain and Image Hosting Domain columns".dimmed()
        );
        println!();
        println!("{}", "SETTINGS".heading());
        println!("  {:<34} Change output format", "set output <human|csv|json>".label());
        println!("  {:<34} Write results to a file instead", "set file <path|off>".label());
        println!("  {:<34} Toggle RDAP/WHOIS expiry lookups", "set expiry <on|off>".label());
        println!("  {:<34} Show or clear the lookup cache", "cache [clear|stats]".label());
        println!("  {:<34} Clear screen", "clear".label());
        println!("  {:<34} Exit the program", "exit".label());
        println!();
    }
}

fn history_path() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|p| p.join(HISTORY_FILE))
        .unwrap_or_else(|| HISTORY_FILE.into())
}
