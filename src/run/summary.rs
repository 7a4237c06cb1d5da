//! Per-batch results and run totals.

use std::path::PathBuf;

use serde::Serialize;

/// Outcome counts of one submitted batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Records actually persisted
    pub success_count: usize,
    /// Records that failed
    pub error_count: usize,
}

impl BatchResult {
    pub fn new(success_count: usize, error_count: usize) -> Self {
        BatchResult {
            success_count,
            error_count,
        }
    }

    /// The whole batch counted as failed.
    pub fn total_failure(batch_size: usize) -> Self {
        BatchResult::new(0, batch_size)
    }
}

/// Running totals over all batches of one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Non-blank rows taken from the source and submitted
    pub rows_read: usize,
    pub inserted: usize,
    pub errors: usize,
}

impl RunSummary {
    /// Adds one batch of `batch_size` rows.
    pub fn record(&mut self, batch_size: usize, result: &BatchResult) {
        self.rows_read += batch_size;
        self.inserted += result.success_count;
        self.errors += result.error_count;
    }
}

/// Results of a migration run that reached the end of the source.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub summary: RunSummary,
    /// Number of batches submitted
    pub batches: usize,
    /// Blank rows skipped by the reader
    pub blank_rows: usize,
    pub source: PathBuf,
    pub elapsed_seconds: f64,
    /// Documents in the target collection after the run, when verification ran
    pub collection_count: Option<u64>,
}

impl MigrationReport {
    /// A run succeeds when at least one record landed, whatever the error count.
    pub fn is_success(&self) -> bool {
        self.summary.inserted > 0
    }

    /// Process exit code: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}
