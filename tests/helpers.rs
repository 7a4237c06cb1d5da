// Shared test helpers: CSV fixtures, an in-memory document store, and a
// reporter that records every progress event.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use healthcare_migrate::{
    Backend, BatchOutcome, BatchResult, Config, DocumentStore, ErrorType, MigrationError,
    MigrationReport, ProcessingStats, ProgressReporter, RecordFailure, Row, RunState, RunSummary,
    StoreError,
};

pub const HEADER: &str = "_id,Name,Age,Gender,Medical Condition,Billing Amount";

/// Writes `lines` under `HEADER` to `dir/name` and returns the path.
pub fn write_csv(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut content = String::from(HEADER);
    content.push('\n');
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(&path, content).expect("Failed to write CSV fixture");
    path
}

/// `count` patient rows with keys `1..=count`.
pub fn patient_rows(count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| format!("{},Patient {},{},Female,Asthma,{}.50", i, i, 20 + i % 60, 1000 + i))
        .collect()
}

/// Config that reads `source` in batches of `batch_size`.
pub fn test_config(source: &Path, batch_size: usize) -> Config {
    Config {
        source: Some(source.to_path_buf()),
        batch_size,
        ..Default::default()
    }
}

/// Observable state of a [`FakeStore`], shared with the test after the store is consumed.
#[derive(Debug, Default)]
pub struct FakeState {
    pub keys: HashSet<String>,
    pub documents: Vec<Row>,
    pub ping_calls: usize,
    pub insert_calls: usize,
    pub closed: bool,
}

/// In-memory store that rejects duplicate `_id` values like a unique index.
#[derive(Clone, Default)]
pub struct FakeStore {
    pub state: Arc<Mutex<FakeState>>,
    /// Ping fails with a connectivity error
    pub unreachable: bool,
    /// 1-based insert calls that fail entirely
    pub failing_batches: HashSet<usize>,
    /// count_documents fails
    pub count_fails: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        FakeStore {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn failing_on(batches: &[usize]) -> Self {
        FakeStore {
            failing_batches: batches.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Pre-populates keys as if an earlier run inserted them.
    pub fn with_existing_keys(self, keys: impl IntoIterator<Item = usize>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.keys.extend(keys.into_iter().map(|k| k.to_string()));
        }
        self
    }

    pub fn handle(&self) -> Arc<Mutex<FakeState>> {
        Arc::clone(&self.state)
    }
}

impl DocumentStore for FakeStore {
    fn backend(&self) -> Backend {
        Backend::Mongo
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.state.lock().unwrap().ping_calls += 1;
        if self.unreachable {
            return Err(StoreError::Connectivity(
                "connection refused: localhost:27017".to_string(),
            ));
        }
        Ok(())
    }

    async fn insert_unordered(&self, batch: &[Row]) -> Result<usize, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.insert_calls += 1;
        if self.failing_batches.contains(&state.insert_calls) {
            return Err(StoreError::Total("network timeout".to_string()));
        }

        let mut failures = Vec::new();
        let mut inserted = 0;
        for (index, row) in batch.iter().enumerate() {
            if let Some(key) = row.document_key() {
                if !state.keys.insert(key.to_string()) {
                    failures.push(RecordFailure {
                        index,
                        kind: ErrorType::DuplicateKey,
                        message: format!("E11000 duplicate key error dup key: {{ _id: \"{}\" }}", key),
                    });
                    continue;
                }
            }
            state.documents.push(row.clone());
            inserted += 1;
        }

        if failures.is_empty() {
            Ok(inserted)
        } else {
            Err(StoreError::PartialWrite { inserted, failures })
        }
    }

    async fn count_documents(&self) -> Result<u64, StoreError> {
        if self.count_fails {
            return Err(StoreError::Total("count timed out".to_string()));
        }
        Ok(self.state.lock().unwrap().documents.len() as u64)
    }

    async fn close(self) {
        self.state.lock().unwrap().closed = true;
    }
}

/// Reporter that keeps every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub started: bool,
    pub states: Vec<RunState>,
    pub batches: Vec<(usize, usize, BatchResult)>,
    pub totals: Vec<RunSummary>,
    pub failures: Vec<RecordFailure>,
    pub verified: Option<Result<u64, String>>,
    pub finished: Option<usize>,
    pub duplicate_keys: usize,
    pub batch_failures: usize,
    pub aborted: Option<String>,
}

impl ProgressReporter for RecordingReporter {
    fn run_started(&mut self, _source: &Path, _batch_size: usize, _target: &str) {
        self.started = true;
    }

    fn state_changed(&mut self, state: RunState) {
        self.states.push(state);
    }

    fn batch_completed(
        &mut self,
        batch_number: usize,
        batch_size: usize,
        outcome: &BatchOutcome,
        totals: &RunSummary,
    ) {
        self.batches.push((batch_number, batch_size, *outcome.result()));
        self.totals.push(*totals);
        if let BatchOutcome::Partial { failures, .. } = outcome {
            self.failures.extend(failures.iter().cloned());
        }
    }

    fn verified(&mut self, count: &Result<u64, StoreError>, _inserted: usize) {
        self.verified = Some(count.as_ref().copied().map_err(|e| e.to_string()));
    }

    fn run_finished(&mut self, report: &MigrationReport, stats: &ProcessingStats) {
        self.finished = Some(report.summary.inserted);
        self.duplicate_keys = stats.get_error_count(ErrorType::DuplicateKey);
        self.batch_failures = stats.get_error_count(ErrorType::BatchFailure);
    }

    fn run_aborted(&mut self, error: &MigrationError) {
        self.aborted = Some(error.to_string());
    }
}
