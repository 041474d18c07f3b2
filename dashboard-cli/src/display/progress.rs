//! Routes tracing output around an active progress bar.
//!
//! While a batch is running, log lines are printed through the bar so they
//! don't tear its display.

use indicatif::ProgressBar;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The progress bar of the batch currently running, if any.
static BATCH_PROGRESS_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<ProgressBar>> {
    BATCH_PROGRESS_BAR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

pub fn set_batch_progress_bar(pb: ProgressBar) {
    *slot() = Some(pb);
}

pub fn clear_batch_progress_bar() {
    *slot() = None;
}

fn batch_progress_bar() -> Option<ProgressBar> {
    slot().clone()
}

fn emit_line(line: &str) -> std::io::Result<()> {
    if let Some(pb) = batch_progress_bar() {
        pb.println(line);
        Ok(())
    } else {
        let mut stderr = std::io::stderr();
        stderr.write_all(line.as_bytes())?;
        stderr.write_all(b"\n")
    }
}

/// Line-buffered writer that prints complete lines via [`emit_line`].
#[derive(Default)]
pub struct ProgressWriter {
    buffer: Vec<u8>,
}

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            let line = String::from_utf8_lossy(&line);
            emit_line(line.trim_end_matches('\n'))?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.buffer.is_empty() {
            let rest = String::from_utf8_lossy(&self.buffer).trim_end().to_string();
            self.buffer.clear();
            if !rest.is_empty() {
                emit_line(&rest)?;
            }
        }
        Ok(())
    }
}

impl Drop for ProgressWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// `MakeWriter` for tracing-subscriber.
#[derive(Default)]
pub struct ProgressWriterFactory;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ProgressWriterFactory {
    type Writer = ProgressWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ProgressWriter::default()
    }
}
