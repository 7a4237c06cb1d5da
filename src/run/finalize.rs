//! Run finalization.
//!
//! Runs the optional verification and assembles the report once the source is
//! exhausted. Closing the store is left to the caller so it happens on every
//! path.

use std::path::PathBuf;
use std::time::Instant;

use crate::app::ProgressReporter;
use crate::storage::DocumentStore;

use super::summary::MigrationReport;
use super::StreamProgress;

/// Finalize a completed run and produce its report.
///
/// With `verify` set, counts the documents in the target collection. A failed
/// count is reported and leaves `collection_count` empty; it never changes the
/// outcome of the run.
pub(super) async fn finalize_run<S: DocumentStore>(
    store: &S,
    verify: bool,
    progress: StreamProgress,
    source: PathBuf,
    start_time: Instant,
    reporter: &mut dyn ProgressReporter,
) -> MigrationReport {
    let collection_count = if verify {
        let count = store.count_documents().await;
        reporter.verified(&count, progress.summary.inserted);
        count.ok()
    } else {
        None
    };

    MigrationReport {
        summary: progress.summary,
        batches: progress.batches,
        blank_rows: progress.blank_rows,
        source,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
        collection_count,
    }
}
