//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, limits)
//! - The `Config` struct, parsed once from CLI flags and environment variables
//! - Validation of the parsed configuration

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{parse_batch_size, Backend, Config, ConfigError, LogFormat, LogLevel};
