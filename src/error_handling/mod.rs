//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions per concern (initialization, source, store, run)
//! - Categorization of rejected records
//! - Per-category error counters for a run
//!
//! Only [`MigrationError`] stops a run. Per-record and per-batch failures are
//! absorbed into [`ProcessingStats`] and the run summary.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_server_code, truncate_message};
pub use stats::ProcessingStats;
pub use types::{
    ErrorType, InitializationError, MigrationError, RecordFailure, SourceError, StoreError,
};
