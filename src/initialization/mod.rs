//! Process setup run once by the binary before a migration starts.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
