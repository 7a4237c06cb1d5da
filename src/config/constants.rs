//! Configuration constants.
//!
//! Defaults used when neither a CLI flag nor an environment variable provides
//! a value, plus a few operational limits of the loader.

use std::time::Duration;

// Connection defaults (local MongoDB container)
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 27017;
pub const DEFAULT_USER: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "secure_password";
pub const DEFAULT_AUTH_DB: &str = "admin";

// Target
pub const DEFAULT_DATABASE: &str = "healthcare_db";
pub const DEFAULT_COLLECTION: &str = "patient_records";

/// Source file used when running on the host.
pub const DEFAULT_CSV_PATH: &str = "data/healthcare_dataset.csv";
/// Source file used inside the compose network, where the dataset is mounted at `/data`.
pub const CONTAINER_CSV_PATH: &str = "/data/healthcare_dataset.csv";
/// Host name of the database service inside the compose network.
pub const CONTAINER_HOST: &str = "mongo";

/// Rows per bulk insert when `MIGRATION_BATCH_SIZE` is unset or not a number.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Upper bound on rows reserved up front per batch; larger batches grow as they fill.
pub const MAX_PREALLOCATED_ROWS: usize = 10_000;

pub const DEFAULT_SQLITE_PATH: &str = "./healthcare_migration.db";

/// Server selection timeout applied when connecting to MongoDB.
/// This is the only timeout in the whole run; inserts block until the driver returns.
pub const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Application name reported to the server in the connection handshake.
pub const APP_NAME: &str = "healthcare_migrate";

/// Maximum number of rejected-record details logged at warn level per batch.
/// Remaining details go to debug so a badly broken batch can't flood the log.
pub const MAX_LOGGED_FAILURES_PER_BATCH: usize = 5;

/// Maximum error message length kept per rejected record.
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

/// MongoDB server error code for duplicate key violations.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Column name whose value becomes the document key.
pub const DOCUMENT_KEY_FIELD: &str = "_id";
