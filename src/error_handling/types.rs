//! Error type definitions.
//!
//! This module defines the error enums of each concern and the categories
//! used to count rejected records.

use std::path::PathBuf;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors raised while reading the CSV source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source path does not exist.
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be opened.
    #[error("Failed to open CSV file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV, invalid UTF-8, or an I/O error mid-read.
    #[error("Failed to read CSV record: {0}")]
    Csv(#[from] csv::Error),
}

/// One record of a batch that the store refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// Position of the record inside its batch
    pub index: usize,
    pub kind: ErrorType,
    pub message: String,
}

/// Errors reported by a document store.
///
/// The orchestrator matches on the variant rather than on error text.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store is unreachable or rejected the credentials.
    #[error("Document store unreachable: {0}")]
    Connectivity(String),

    /// Some records of an unordered insert were rejected; the others were persisted.
    #[error("Bulk write completed with errors: inserted={inserted}, rejected={}", failures.len())]
    PartialWrite {
        inserted: usize,
        failures: Vec<RecordFailure>,
    },

    /// The whole operation failed and nothing can be assumed persisted.
    #[error("Document store operation failed: {0}")]
    Total(String),
}

/// Fatal conditions that end a migration run.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// The connectivity check failed; no batch was attempted.
    #[error("Failed to connect to the document store: {0}")]
    Connectivity(String),

    /// The CSV source does not exist.
    #[error("CSV file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Anything else; the run stops immediately.
    #[error("Unexpected error during migration")]
    Unexpected(#[from] anyhow::Error),
}

impl From<SourceError> for MigrationError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::NotFound(path) => MigrationError::SourceNotFound(path),
            other => MigrationError::Unexpected(other.into()),
        }
    }
}

/// Categories of rejected records, counted over a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// Unique key already present in the collection (or earlier in the batch)
    DuplicateKey,
    /// Any other per-record rejection (validation, malformed value, size limit)
    DocumentRejected,
    /// Records written but the write concern could not be satisfied
    WriteConcern,
    /// Records lost because the whole batch failed to submit
    BatchFailure,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DuplicateKey => "Duplicate key",
            ErrorType::DocumentRejected => "Document rejected",
            ErrorType::WriteConcern => "Write concern error",
            ErrorType::BatchFailure => "Batch failure",
        }
    }
}
