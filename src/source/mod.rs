//! CSV source: rows, batches, and the batched reader.

mod reader;
mod row;

pub use reader::BatchReader;
pub use row::{Batch, Row};

use std::fs::File;
use std::path::Path;

use crate::error_handling::SourceError;

/// Opens `path` and returns its non-blank rows grouped into batches of `batch_size`.
///
/// # Errors
///
/// Fails with `SourceError::NotFound` when the path does not exist.
pub fn read_csv_in_batches(path: &Path, batch_size: usize) -> Result<BatchReader<File>, SourceError> {
    BatchReader::open(path, batch_size)
}
