//! Migration run orchestration.
//!
//! A run goes `Connecting → Streaming → Finished`:
//! 1. Connecting: check that the store is reachable; failure ends the run
//!    before any batch is read.
//! 2. Streaming: read a batch, submit it, add its counts to the summary, repeat
//!    until the source is exhausted. Batch failures are counted, never fatal.
//!    A missing source or a read error ends the run immediately.
//! 3. Finished: optionally verify the collection count and build the report.

mod finalize;
mod submit;
mod summary;

use std::path::Path;
use std::time::Instant;

use crate::app::{ProgressReporter, RunState};
use crate::config::Config;
use crate::error_handling::{ErrorType, MigrationError, ProcessingStats, StoreError};
use crate::source::read_csv_in_batches;
use crate::storage::{AnyStore, DocumentStore};

use finalize::finalize_run;

pub use submit::{submit_batch, BatchOutcome};
pub use summary::{BatchResult, MigrationReport, RunSummary};

/// Counters gathered while streaming.
#[derive(Debug, Default)]
pub(crate) struct StreamProgress {
    summary: RunSummary,
    batches: usize,
    blank_rows: usize,
}

/// Connects to the configured store and runs the migration.
///
/// # Errors
///
/// Returns a `MigrationError` for the fatal conditions: store unreachable,
/// source not found, or any unexpected failure.
///
/// # Example
///
/// ```no_run
/// use healthcare_migrate::{migrate, Backend, Config, LogReporter};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     source: Some(PathBuf::from("data/healthcare_dataset.csv")),
///     backend: Backend::Sqlite,
///     ..Default::default()
/// };
/// let report = migrate(&config, &mut LogReporter::new()).await?;
/// println!("inserted {} documents", report.summary.inserted);
/// # Ok(())
/// # }
/// ```
pub async fn migrate(
    config: &Config,
    reporter: &mut dyn ProgressReporter,
) -> Result<MigrationReport, MigrationError> {
    let store = match AnyStore::connect(config).await {
        Ok(store) => store,
        Err(e) => {
            let err = MigrationError::Connectivity(store_error_message(e));
            reporter.run_aborted(&err);
            return Err(err);
        }
    };
    run_migration(config, store, reporter).await
}

/// Runs the migration against an already constructed store.
///
/// The store is closed before returning, whatever the outcome.
///
/// # Errors
///
/// Same as [`migrate`].
pub async fn run_migration<S: DocumentStore>(
    config: &Config,
    store: S,
    reporter: &mut dyn ProgressReporter,
) -> Result<MigrationReport, MigrationError> {
    let start_time = Instant::now();
    let source = config.source_path();
    let batch_size = config.batch_size.max(1);
    reporter.run_started(&source, batch_size, &config.target_description());

    reporter.state_changed(RunState::Connecting);
    if let Err(e) = store.ping().await {
        store.close().await;
        let err = MigrationError::Connectivity(store_error_message(e));
        reporter.run_aborted(&err);
        return Err(err);
    }

    reporter.state_changed(RunState::Streaming);
    let mut stats = ProcessingStats::new();
    let outcome = match stream_batches(&store, &source, batch_size, &mut stats, reporter).await {
        Ok(progress) => {
            reporter.state_changed(RunState::Finished);
            Ok(finalize_run(&store, config.verify, progress, source, start_time, reporter).await)
        }
        Err(e) => Err(e),
    };
    store.close().await;

    match outcome {
        Ok(report) => {
            reporter.run_finished(&report, &stats);
            Ok(report)
        }
        Err(e) => {
            reporter.run_aborted(&e);
            Err(e)
        }
    }
}

async fn stream_batches<S: DocumentStore>(
    store: &S,
    source: &Path,
    batch_size: usize,
    stats: &mut ProcessingStats,
    reporter: &mut dyn ProgressReporter,
) -> Result<StreamProgress, MigrationError> {
    let mut reader = read_csv_in_batches(source, batch_size)?;
    let mut progress = StreamProgress::default();

    for batch in reader.by_ref() {
        let batch = batch?;
        let outcome = submit_batch(store, &batch).await;
        count_failures(stats, &outcome);

        progress.summary.record(batch.len(), outcome.result());
        progress.batches += 1;
        reporter.batch_completed(progress.batches, batch.len(), &outcome, &progress.summary);
    }

    progress.blank_rows = reader.blank_rows();
    Ok(progress)
}

fn count_failures(stats: &mut ProcessingStats, outcome: &BatchOutcome) {
    match outcome {
        BatchOutcome::Complete(_) => {}
        BatchOutcome::Partial { failures, .. } => {
            for failure in failures {
                stats.increment_error(failure.kind);
            }
        }
        BatchOutcome::Failed { result, .. } => {
            stats.add_errors(ErrorType::BatchFailure, result.error_count);
        }
    }
}

fn store_error_message(e: StoreError) -> String {
    match e {
        StoreError::Connectivity(message) | StoreError::Total(message) => message,
        other => other.to_string(),
    }
}
