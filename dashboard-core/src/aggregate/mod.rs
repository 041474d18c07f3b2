mod executor;
mod row;

pub use executor::{ProgressCallback, RowAggregator};
pub use row::{batch_headers, ResultRow};
