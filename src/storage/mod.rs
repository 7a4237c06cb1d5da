// storage/mod.rs
// Document store backends

mod migrations;
mod mongo;
mod pool;
mod sqlite;
mod store;

// Re-export commonly used items
pub use migrations::run_migrations;
pub use mongo::MongoStore;
pub use sqlite::SqliteStore;
pub use store::{AnyStore, DocumentStore};
