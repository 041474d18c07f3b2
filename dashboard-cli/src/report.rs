//! Running a batch with progress display, and writing its results.

use std::fs::File;
use std::io::{BufWriter, IsTerminal};
use std::path::Path;

use anyhow::Context;
use dashboard_core::colors::PaletteExt;
use dashboard_core::output::{get_formatter, write_csv, OutputFormat};
use dashboard_core::{InputRow, ProgressCallback, ResultRow, RowAggregator};
use indicatif::{ProgressBar, ProgressStyle};

use crate::display::{clear_batch_progress_bar, set_batch_progress_bar, Spinner};

/// Runs `rows` through the aggregator with a spinner (one row) or a
/// progress bar (several).
pub async fn run_batch(aggregator: &RowAggregator, rows: &[InputRow]) -> Vec<ResultRow> {
    if let [row] = rows {
        let spinner = Spinner::new(&format!("Checking {}", row.label()));
        set_batch_progress_bar(spinner.bar());
        let results = aggregator.build_batch(rows, None).await;
        clear_batch_progress_bar();
        spinner.finish();
        return results;
    }

    let progress = ProgressBar::new(rows.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|style| style.progress_chars("█▓░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    set_batch_progress_bar(progress.clone());

    let bar = progress.clone();
    let callback: ProgressCallback = Box::new(move |current, _total, label| {
        bar.set_position(current as u64);
        bar.set_message(label.to_string());
    });

    let results = aggregator.build_batch(rows, Some(callback)).await;

    clear_batch_progress_bar();
    progress.finish_and_clear();
    results
}

/// Colors only for results printed to an interactive terminal.
pub fn use_colors(output: Option<&Path>) -> bool {
    output.is_none() && std::io::stdout().is_terminal()
}

/// Prints `rows` in `format`, or writes them to `output` when given.
pub fn emit(
    rows: &[ResultRow],
    format: OutputFormat,
    output: Option<&Path>,
    colors: bool,
) -> anyhow::Result<()> {
    let Some(path) = output else {
        println!("{}", get_formatter(format, colors).format_rows(rows));
        return Ok(());
    };

    match format {
        OutputFormat::Csv => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(rows, BufWriter::new(file))?;
        }
        _ => {
            let text = get_formatter(format, false).format_rows(rows);
            std::fs::write(path, text + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    eprintln!(
        "{} Wrote {} rows to {}",
        "✓".good(),
        rows.len(),
        path.display().to_string().label()
    );
    Ok(())
}
