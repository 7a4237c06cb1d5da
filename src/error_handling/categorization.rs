//! Error categorization.
//!
//! Maps store-specific rejection codes onto [`ErrorType`] and keeps rejection
//! messages to a loggable size.

use crate::config::{DUPLICATE_KEY_CODE, MAX_ERROR_MESSAGE_LENGTH};

use super::types::ErrorType;

/// Categorizes a MongoDB server error code for a single rejected document.
pub fn categorize_server_code(code: i32) -> ErrorType {
    match code {
        // 11001 and 12582 are legacy duplicate key codes still seen on older servers
        DUPLICATE_KEY_CODE | 11001 | 12582 => ErrorType::DuplicateKey,
        // WriteConcernFailed, WriteConcernLegacyOK
        64 | 100 => ErrorType::WriteConcern,
        _ => ErrorType::DocumentRejected,
    }
}

/// Strips control characters and truncates long messages.
///
/// Newlines and tabs are kept. Truncation respects UTF-8 character boundaries
/// and notes the original length.
pub fn truncate_message(message: &str) -> String {
    let sanitized: String = message
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    let char_count = sanitized.chars().count();
    if char_count <= MAX_ERROR_MESSAGE_LENGTH {
        return sanitized;
    }

    let keep = MAX_ERROR_MESSAGE_LENGTH.saturating_sub(50);
    let head: String = sanitized.chars().take(keep).collect();
    format!(
        "{}... (truncated, original length: {} chars)",
        head, char_count
    )
}
