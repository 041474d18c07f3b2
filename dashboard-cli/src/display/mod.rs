mod progress;
mod spinner;

pub use progress::{clear_batch_progress_bar, set_batch_progress_bar, ProgressWriterFactory};
pub use spinner::Spinner;
