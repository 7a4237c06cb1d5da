//! Bulk submitter.
//!
//! Turns the store's tagged result for one batch into counts. Per-record and
//! per-batch failures never escape as errors.

use crate::error_handling::{RecordFailure, StoreError};
use crate::source::Row;
use crate::storage::DocumentStore;

use super::summary::BatchResult;

/// What happened to one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every record persisted.
    Complete(BatchResult),
    /// Some records rejected; the others persisted.
    Partial {
        result: BatchResult,
        failures: Vec<RecordFailure>,
    },
    /// Nothing can be assumed persisted; all records count as errors.
    Failed { result: BatchResult, reason: String },
}

impl BatchOutcome {
    pub fn result(&self) -> &BatchResult {
        match self {
            BatchOutcome::Complete(result)
            | BatchOutcome::Partial { result, .. }
            | BatchOutcome::Failed { result, .. } => result,
        }
    }
}

/// Inserts `batch` as an unordered bulk write and measures the outcome.
///
/// - All accepted: `{success_count: n, error_count: 0}`.
/// - Partial rejection: persisted count plus rejected count, with details.
/// - Any other store error: `{success_count: 0, error_count: batch.len()}`.
pub async fn submit_batch<S: DocumentStore>(store: &S, batch: &[Row]) -> BatchOutcome {
    match store.insert_unordered(batch).await {
        Ok(inserted) => BatchOutcome::Complete(BatchResult::new(inserted, 0)),
        Err(StoreError::PartialWrite { inserted, failures }) => BatchOutcome::Partial {
            result: BatchResult::new(inserted, failures.len()),
            failures,
        },
        Err(e @ (StoreError::Connectivity(_) | StoreError::Total(_))) => BatchOutcome::Failed {
            result: BatchResult::total_failure(batch.len()),
            reason: e.to_string(),
        },
    }
}
