//! SQLite backend.
//!
//! Stores each row as a JSON document in the `documents` table. A batch is one
//! transaction with one `INSERT` per row; SQLite undoes only the failing
//! statement on a constraint violation, so the rest of the batch still commits.

use std::path::Path;

use log::debug;
use sqlx::SqlitePool;

use crate::config::Backend;
use crate::error_handling::{truncate_message, ErrorType, RecordFailure, StoreError};
use crate::source::Row;

use super::pool::init_db_pool_with_path;
use super::store::DocumentStore;

/// A named collection inside a SQLite document table.
pub struct SqliteStore {
    pool: SqlitePool,
    collection: String,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file and applies the schema.
    pub async fn connect(db_path: &Path, collection: &str) -> Result<Self, StoreError> {
        let pool = init_db_pool_with_path(db_path).await?;
        Ok(Self::with_pool(pool, collection))
    }

    /// Wraps an existing pool whose schema is already migrated.
    pub fn with_pool(pool: SqlitePool, collection: &str) -> Self {
        SqliteStore {
            pool,
            collection: collection.to_string(),
        }
    }
}

impl DocumentStore for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Connectivity(e.to_string()))
    }

    async fn insert_unordered(&self, batch: &[Row]) -> Result<usize, StoreError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Total(e.to_string()))?;
        let inserted_at = chrono::Utc::now().timestamp_millis();
        let mut inserted = 0usize;
        let mut failures = Vec::new();

        for (index, row) in batch.iter().enumerate() {
            let body = match serde_json::to_string(row) {
                Ok(body) => body,
                Err(e) => {
                    failures.push(RecordFailure {
                        index,
                        kind: ErrorType::DocumentRejected,
                        message: truncate_message(&e.to_string()),
                    });
                    continue;
                }
            };

            let result = sqlx::query(
                "INSERT INTO documents (collection, doc_key, body, inserted_at)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&self.collection)
            .bind(row.document_key())
            .bind(body)
            .bind(inserted_at)
            .execute(&mut *tx)
            .await;

            match result {
                Ok(_) => inserted += 1,
                Err(sqlx::Error::Database(db_err)) => {
                    let kind = if db_err.is_unique_violation() {
                        ErrorType::DuplicateKey
                    } else {
                        ErrorType::DocumentRejected
                    };
                    failures.push(RecordFailure {
                        index,
                        kind,
                        message: truncate_message(db_err.message()),
                    });
                }
                // Dropping the transaction rolls back whatever this batch wrote.
                Err(e) => return Err(StoreError::Total(e.to_string())),
            }
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Total(e.to_string()))?;
        debug!(
            "Committed {} of {} documents to collection '{}'",
            inserted,
            batch.len(),
            self.collection
        );

        if failures.is_empty() {
            Ok(inserted)
        } else {
            Err(StoreError::PartialWrite { inserted, failures })
        }
    }

    async fn count_documents(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
            .bind(&self.collection)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Total(e.to_string()))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn close(self) {
        // Checkpoint WAL file for clean database state
        if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await
        {
            log::warn!(
                "Failed to checkpoint WAL file (this is non-critical): {}",
                e
            );
        }
        self.pool.close().await;
        debug!("Database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().copied().collect()
    }

    async fn temp_store(dir: &TempDir, collection: &str) -> SqliteStore {
        SqliteStore::connect(&dir.path().join("test.db"), collection)
            .await
            .expect("Failed to open test database")
    }

    #[tokio::test]
    async fn test_insert_all_rows() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir, "patient_records").await;
        store.ping().await.unwrap();

        let batch = vec![row(&[("Name", "A")]), row(&[("Name", "B")])];
        assert_eq!(store.insert_unordered(&batch).await.unwrap(), 2);
        assert_eq!(store.count_documents().await.unwrap(), 2);
        store.close().await;
    }

    #[tokio::test]
    async fn test_duplicate_key_rejects_only_that_row() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir, "patient_records").await;

        let batch = vec![
            row(&[("_id", "1"), ("Name", "A")]),
            row(&[("_id", "2"), ("Name", "B")]),
            row(&[("_id", "1"), ("Name", "A again")]),
            row(&[("_id", "3"), ("Name", "C")]),
        ];
        match store.insert_unordered(&batch).await {
            Err(StoreError::PartialWrite { inserted, failures }) => {
                assert_eq!(inserted, 3);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].index, 2);
                assert_eq!(failures[0].kind, ErrorType::DuplicateKey);
            }
            other => panic!("expected PartialWrite, got {:?}", other),
        }
        assert_eq!(store.count_documents().await.unwrap(), 3);
        store.close().await;
    }

    #[tokio::test]
    async fn test_rows_without_key_never_conflict() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir, "patient_records").await;

        let batch = vec![row(&[("Name", "Same")]), row(&[("Name", "Same")])];
        assert_eq!(store.insert_unordered(&batch).await.unwrap(), 2);
        assert_eq!(store.insert_unordered(&batch).await.unwrap(), 2);
        assert_eq!(store.count_documents().await.unwrap(), 4);
        store.close().await;
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("shared.db");
        let first = SqliteStore::connect(&db_path, "first").await.unwrap();
        let second = SqliteStore::connect(&db_path, "second").await.unwrap();

        let batch = vec![row(&[("_id", "1")])];
        assert_eq!(first.insert_unordered(&batch).await.unwrap(), 1);
        // Same key in another collection is not a duplicate.
        assert_eq!(second.insert_unordered(&batch).await.unwrap(), 1);
        assert_eq!(first.count_documents().await.unwrap(), 1);
        assert_eq!(second.count_documents().await.unwrap(), 1);
        first.close().await;
        second.close().await;
    }

    #[tokio::test]
    async fn test_body_is_json_object() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir, "patient_records").await;
        store
            .insert_unordered(&[row(&[("Name", "A"), ("Age", "42")])])
            .await
            .unwrap();

        let body: String = sqlx::query_scalar("SELECT body FROM documents LIMIT 1")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(body, r#"{"Name":"A","Age":"42"}"#);
        store.close().await;
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir, "patient_records").await;
        assert_eq!(store.insert_unordered(&[]).await.unwrap(), 0);
        store.close().await;
    }
}
