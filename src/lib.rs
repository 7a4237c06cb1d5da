//! healthcare_migrate library: batched CSV to document store migration
//!
//! Reads a CSV file lazily in fixed-size batches and inserts every batch into a
//! document collection with an unordered bulk write. Rejected records are
//! counted and the run goes on; only an unreachable store, a missing source, or
//! an unexpected failure stops it.
//!
//! # Example
//!
//! ```no_run
//! use healthcare_migrate::{migrate, Config, LogReporter};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     source: Some(std::path::PathBuf::from("healthcare_dataset.csv")),
//!     batch_size: 500,
//!     ..Default::default()
//! };
//!
//! let report = migrate(&config, &mut LogReporter::new()).await?;
//! println!(
//!     "Read {} rows: {} inserted, {} failed",
//!     report.summary.rows_read, report.summary.inserted, report.summary.errors
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod config;
mod error_handling;
pub mod initialization;
mod run;
mod source;
mod storage;

// Re-export public API
pub use app::{print_error_statistics, LogReporter, ProgressReporter, RunState};
pub use config::{Backend, Config, ConfigError, LogFormat, LogLevel};
pub use error_handling::{
    categorize_server_code, ErrorType, InitializationError, MigrationError, ProcessingStats,
    RecordFailure, SourceError, StoreError,
};
pub use run::{migrate, run_migration, submit_batch, BatchOutcome, BatchResult, MigrationReport, RunSummary};
pub use source::{read_csv_in_batches, Batch, BatchReader, Row};
pub use storage::{run_migrations, AnyStore, DocumentStore, MongoStore, SqliteStore};
