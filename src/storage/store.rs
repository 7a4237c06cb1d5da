//! The document store seam.
//!
//! The orchestrator is generic over [`DocumentStore`], so tests can drive a run
//! against an in-memory fake while production uses MongoDB or SQLite.

use crate::config::{Backend, Config};
use crate::error_handling::StoreError;
use crate::source::Row;

use super::mongo::MongoStore;
use super::sqlite::SqliteStore;

/// A collection that accepts unordered bulk inserts.
///
/// Calls are awaited one at a time; implementations never see two operations
/// in flight.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Which backend this is, for logging.
    fn backend(&self) -> Backend;

    /// Checks that the store is reachable and accepts our credentials.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Inserts every row as a new document without stopping at the first rejection.
    ///
    /// Returns the number of persisted documents when all were accepted.
    /// A partial rejection is reported as `StoreError::PartialWrite`, anything
    /// that prevents the batch from being attempted as `StoreError::Total`.
    async fn insert_unordered(&self, batch: &[Row]) -> Result<usize, StoreError>;

    /// Number of documents currently in the target collection.
    async fn count_documents(&self) -> Result<u64, StoreError>;

    /// Releases connections.
    async fn close(self)
    where
        Self: Sized;
}

/// The store selected by configuration.
pub enum AnyStore {
    Mongo(MongoStore),
    Sqlite(SqliteStore),
}

impl AnyStore {
    /// Builds the configured store.
    ///
    /// For MongoDB this only prepares the client; reachability is checked by
    /// [`DocumentStore::ping`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connectivity` when the client or pool cannot be created.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        match config.backend {
            Backend::Mongo => Ok(AnyStore::Mongo(MongoStore::connect(config).await?)),
            Backend::Sqlite => Ok(AnyStore::Sqlite(
                SqliteStore::connect(&config.sqlite_path, &config.collection).await?,
            )),
        }
    }
}

impl DocumentStore for AnyStore {
    fn backend(&self) -> Backend {
        match self {
            AnyStore::Mongo(s) => s.backend(),
            AnyStore::Sqlite(s) => s.backend(),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match self {
            AnyStore::Mongo(s) => s.ping().await,
            AnyStore::Sqlite(s) => s.ping().await,
        }
    }

    async fn insert_unordered(&self, batch: &[Row]) -> Result<usize, StoreError> {
        match self {
            AnyStore::Mongo(s) => s.insert_unordered(batch).await,
            AnyStore::Sqlite(s) => s.insert_unordered(batch).await,
        }
    }

    async fn count_documents(&self) -> Result<u64, StoreError> {
        match self {
            AnyStore::Mongo(s) => s.count_documents().await,
            AnyStore::Sqlite(s) => s.count_documents().await,
        }
    }

    async fn close(self) {
        match self {
            AnyStore::Mongo(s) => s.close().await,
            AnyStore::Sqlite(s) => s.close().await,
        }
    }
}
