//! Progress reporting.
//!
//! The orchestrator receives a [`ProgressReporter`] explicitly and sends every
//! progress event through it. [`LogReporter`] turns the events into log lines;
//! tests substitute a recorder.

use std::path::Path;

use log::{debug, error, info, warn};

use crate::config::MAX_LOGGED_FAILURES_PER_BATCH;
use crate::error_handling::{MigrationError, ProcessingStats, RecordFailure, StoreError};
use crate::run::{BatchOutcome, MigrationReport, RunSummary};

use super::statistics::print_error_statistics;

/// Phases of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Connecting,
    Streaming,
    Finished,
}

/// Receives the events of one migration run.
///
/// Every method has an empty default so implementations override only what
/// they need.
pub trait ProgressReporter {
    fn run_started(&mut self, _source: &Path, _batch_size: usize, _target: &str) {}

    fn state_changed(&mut self, _state: RunState) {}

    /// Called after every batch with the batch outcome and the updated totals.
    fn batch_completed(
        &mut self,
        _batch_number: usize,
        _batch_size: usize,
        _outcome: &BatchOutcome,
        _totals: &RunSummary,
    ) {
    }

    /// Called with the post-run document count, or the error that prevented it.
    fn verified(&mut self, _count: &Result<u64, StoreError>, _inserted: usize) {}

    fn run_finished(&mut self, _report: &MigrationReport, _stats: &ProcessingStats) {}

    fn run_aborted(&mut self, _error: &MigrationError) {}
}

/// Reports progress through the `log` facade.
#[derive(Debug, Default)]
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        LogReporter
    }

    fn log_rejections(batch_number: usize, failures: &[RecordFailure]) {
        for (i, failure) in failures.iter().enumerate() {
            if i < MAX_LOGGED_FAILURES_PER_BATCH {
                warn!(
                    "Batch {}: record {} rejected ({}): {}",
                    batch_number, failure.index, failure.kind, failure.message
                );
            } else {
                debug!(
                    "Batch {}: record {} rejected ({}): {}",
                    batch_number, failure.index, failure.kind, failure.message
                );
            }
        }
        if failures.len() > MAX_LOGGED_FAILURES_PER_BATCH {
            warn!(
                "Batch {}: {} more rejected records (use --log-level debug to see them)",
                batch_number,
                failures.len() - MAX_LOGGED_FAILURES_PER_BATCH
            );
        }
    }
}

impl ProgressReporter for LogReporter {
    fn run_started(&mut self, source: &Path, batch_size: usize, target: &str) {
        info!("Starting CSV → document store migration");
        info!("CSV file: {}", source.display());
        info!("Batch size: {}", batch_size);
        info!("Target: {}", target);
    }

    fn state_changed(&mut self, state: RunState) {
        debug!("Migration state: {:?}", state);
    }

    fn batch_completed(
        &mut self,
        batch_number: usize,
        batch_size: usize,
        outcome: &BatchOutcome,
        totals: &RunSummary,
    ) {
        let result = outcome.result();
        match outcome {
            BatchOutcome::Complete(_) => {}
            BatchOutcome::Partial { failures, .. } => {
                error!(
                    "Bulk write completed with errors: success={}, errors={}",
                    result.success_count, result.error_count
                );
                Self::log_rejections(batch_number, failures);
            }
            BatchOutcome::Failed { reason, .. } => {
                error!(
                    "Batch {} failed entirely, counting {} documents as errors: {}",
                    batch_number, batch_size, reason
                );
            }
        }
        info!(
            "Processed batch: size={}, success={}, errors={}, totals=(rows={}, success={}, errors={})",
            batch_size,
            result.success_count,
            result.error_count,
            totals.rows_read,
            totals.inserted,
            totals.errors
        );
    }

    fn verified(&mut self, count: &Result<u64, StoreError>, inserted: usize) {
        match count {
            Ok(count) if *count < inserted as u64 => warn!(
                "Verification: collection holds {} documents but {} were inserted by this run",
                count, inserted
            ),
            Ok(count) => info!(
                "Verification: collection holds {} documents ({} inserted by this run)",
                count, inserted
            ),
            Err(e) => warn!("Verification skipped, could not count documents: {}", e),
        }
    }

    fn run_finished(&mut self, report: &MigrationReport, stats: &ProcessingStats) {
        let summary = &report.summary;
        info!(
            "Migration summary: rows_read={}, inserted={}, errors={}",
            summary.rows_read, summary.inserted, summary.errors
        );
        print_error_statistics(stats);
        if report.blank_rows > 0 {
            info!("Skipped {} blank rows", report.blank_rows);
        }
        info!(
            "Finished {} batch{} in {:.1}s",
            report.batches,
            if report.batches == 1 { "" } else { "es" },
            report.elapsed_seconds
        );
        if !report.is_success() {
            warn!("No document was inserted; the run counts as failed");
        }
    }

    fn run_aborted(&mut self, error: &MigrationError) {
        match error {
            MigrationError::Unexpected(source) => {
                error!("Unexpected error during migration: {:#}", source)
            }
            other => error!("{}", other),
        }
    }
}
