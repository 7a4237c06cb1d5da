//! Processing statistics tracking.
//!
//! Counts rejected records per [`ErrorType`] over one migration run. The run is
//! single-threaded, so plain counters owned by the orchestrator are enough.

use std::collections::HashMap;
use strum::IntoEnumIterator;

use super::types::ErrorType;

/// Per-category error counters for a run.
///
/// All error types are initialized to zero on creation.
#[derive(Debug, Clone)]
pub struct ProcessingStats {
    errors: HashMap<ErrorType, usize>,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    pub fn new() -> Self {
        let errors = ErrorType::iter().map(|e| (e, 0)).collect();
        ProcessingStats { errors }
    }

    /// Increment an error counter by one.
    pub fn increment_error(&mut self, error: ErrorType) {
        self.add_errors(error, 1);
    }

    /// Increment an error counter by `count`.
    pub fn add_errors(&mut self, error: ErrorType, count: usize) {
        *self.errors.entry(error).or_insert(0) += count;
    }

    /// Get the count for an error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors.get(&error).copied().unwrap_or(0)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }
}
