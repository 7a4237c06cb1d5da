//! Main application modules.
//!
//! This module provides progress reporting and statistics printing used by the
//! migration run.

pub mod progress;
pub mod statistics;

// Re-export public API
pub use progress::{LogReporter, ProgressReporter, RunState};
pub use statistics::print_error_statistics;
