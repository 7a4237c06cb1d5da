//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, ProcessingStats};

/// Prints the per-category error counts to the log.
///
/// Prints nothing when the run had no errors.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = error_stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_error_statistics_empty_and_populated() {
        // Only checks that printing never panics.
        print_error_statistics(&ProcessingStats::new());

        let mut stats = ProcessingStats::new();
        stats.increment_error(ErrorType::DuplicateKey);
        stats.add_errors(ErrorType::BatchFailure, 3);
        print_error_statistics(&stats);
    }
}
