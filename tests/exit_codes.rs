//! Tests for the exit code policy: 0 when at least one document was inserted,
//! 1 otherwise. Fatal errors produce no report and always map to 1.

mod helpers;

use healthcare_migrate::{run_migration, BatchResult, MigrationReport, RunSummary};
use helpers::{patient_rows, test_config, write_csv, FakeStore, RecordingReporter};
use std::path::PathBuf;
use tempfile::TempDir;

fn report(inserted: usize, errors: usize) -> MigrationReport {
    let mut summary = RunSummary::default();
    summary.record(inserted + errors, &BatchResult::new(inserted, errors));
    MigrationReport {
        summary,
        batches: 1,
        blank_rows: 0,
        source: PathBuf::from("patients.csv"),
        elapsed_seconds: 0.5,
        collection_count: None,
    }
}

#[test]
fn test_any_insert_means_success() {
    assert_eq!(report(1, 0).exit_code(), 0);
    assert_eq!(report(1, 54_999).exit_code(), 0);
}

#[test]
fn test_no_insert_means_failure() {
    assert_eq!(report(0, 0).exit_code(), 1);
    assert_eq!(report(0, 10).exit_code(), 1);
}

#[tokio::test]
async fn test_errors_alone_do_not_fail_the_run() {
    let dir = TempDir::new().unwrap();
    let source = write_csv(dir.path(), "patients.csv", &patient_rows(10));
    let store = FakeStore::new().with_existing_keys(1..=9);

    let report = run_migration(&test_config(&source, 4), store, &mut RecordingReporter::default())
        .await
        .unwrap();

    assert_eq!(report.summary.inserted, 1);
    assert_eq!(report.summary.errors, 9);
    assert_eq!(report.exit_code(), 0);
}

#[tokio::test]
async fn test_every_row_rejected_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let source = write_csv(dir.path(), "patients.csv", &patient_rows(10));
    let store = FakeStore::new().with_existing_keys(1..=10);

    let report = run_migration(&test_config(&source, 4), store, &mut RecordingReporter::default())
        .await
        .unwrap();

    assert_eq!(report.summary.inserted, 0);
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_header_only_source_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let source = write_csv(dir.path(), "patients.csv", &[]);
    let mut reporter = RecordingReporter::default();

    let report = run_migration(&test_config(&source, 1000), FakeStore::new(), &mut reporter)
        .await
        .unwrap();

    assert_eq!(report.batches, 0);
    assert_eq!(report.summary.rows_read, 0);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(reporter.finished, Some(0));
}

#[tokio::test]
async fn test_every_batch_failing_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let source = write_csv(dir.path(), "patients.csv", &patient_rows(5));
    let store = FakeStore::failing_on(&[1, 2, 3]);

    let report = run_migration(&test_config(&source, 2), store, &mut RecordingReporter::default())
        .await
        .unwrap();

    assert_eq!(report.summary.errors, 5);
    assert_eq!(report.exit_code(), 1);
}
