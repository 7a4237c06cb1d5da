//! Batched CSV reader.
//!
//! Reads the source strictly sequentially and hands out one batch at a time;
//! nothing is buffered beyond the batch being filled.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::debug;

use crate::config::MAX_PREALLOCATED_ROWS;
use crate::error_handling::SourceError;

use super::row::{Batch, Row};

/// Lazy, finite, non-restartable sequence of batches read from CSV.
///
/// Every batch holds `batch_size` rows except possibly the last. Blank rows
/// (every field empty or whitespace) are skipped and never counted. After the
/// first read error the iterator yields that error once and then ends; the
/// partially filled batch is dropped.
pub struct BatchReader<R: Read = File> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    batch_size: usize,
    record: StringRecord,
    blank_rows: usize,
    done: bool,
}

impl BatchReader<File> {
    /// Opens a CSV file for batched reading.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::NotFound` if the path does not exist, `SourceError::Io`
    /// if it cannot be opened, and `SourceError::Csv` if the header line is unreadable.
    pub fn open(path: &Path, batch_size: usize) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
            _ => SourceError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        debug!("Opened CSV file {}", path.display());
        Self::from_reader(file, batch_size)
    }
}

impl<R: Read> BatchReader<R> {
    /// Wraps any reader producing CSV text with a header line.
    ///
    /// A `batch_size` of 0 is treated as 1.
    pub fn from_reader(rdr: R, batch_size: usize) -> Result<Self, SourceError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);

        let headers = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == 0 {
                    name.trim_start_matches('\u{feff}').to_string()
                } else {
                    name.to_string()
                }
            })
            .collect();

        Ok(BatchReader {
            reader,
            headers,
            batch_size: batch_size.max(1),
            record: StringRecord::new(),
            blank_rows: 0,
            done: false,
        })
    }

    /// Column names from the header line.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of blank rows skipped so far.
    pub fn blank_rows(&self) -> usize {
        self.blank_rows
    }

    fn current_row(&self) -> Row {
        // Extra unnamed fields are dropped; missing trailing fields are omitted.
        self.headers
            .iter()
            .zip(self.record.iter())
            .map(|(name, value)| (name.as_str(), value))
            .collect()
    }
}

/// True when every field of the record is empty or whitespace.
pub fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

impl<R: Read> Iterator for BatchReader<R> {
    type Item = Result<Batch, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut batch = Vec::with_capacity(self.batch_size.min(MAX_PREALLOCATED_ROWS));
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {
                    if is_blank(&self.record) {
                        self.blank_rows += 1;
                        continue;
                    }
                    batch.push(self.current_row());
                    if batch.len() >= self.batch_size {
                        return Some(Ok(batch));
                    }
                }
                Ok(false) => {
                    self.done = true;
                    return if batch.is_empty() {
                        None
                    } else {
                        Some(Ok(batch))
                    };
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(SourceError::Csv(e)));
                }
            }
        }
    }
}
