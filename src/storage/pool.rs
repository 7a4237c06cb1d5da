//! Database connection pool management.
//!
//! This module initializes the SQLite connection pool used by the sqlite backend:
//! - Automatic database file creation
//! - WAL mode enabled
//! - Schema migrations applied

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, error};
use sqlx::SqlitePool;

use crate::error_handling::StoreError;

use super::migrations::run_migrations;

/// Initializes and returns a database connection pool for `db_path`.
///
/// Creates the database file if it doesn't exist, enables WAL mode and runs
/// migrations.
///
/// # Errors
///
/// Returns `StoreError::Connectivity` if the file cannot be created, the pool
/// cannot connect, or the schema cannot be applied.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<SqlitePool, StoreError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(db_path)
    {
        Ok(_) => debug!("Database file {} created.", db_path_str),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("Database file {} already exists.", db_path_str)
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(StoreError::Connectivity(format!(
                "cannot create database file {}: {}",
                db_path_str, e
            )));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path_str))
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            StoreError::Connectivity(e.to_string())
        })?;

    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            StoreError::Connectivity(e.to_string())
        })?;

    run_migrations(&pool).await.map_err(|e| {
        error!("Failed to run migrations: {e:#}");
        StoreError::Connectivity(format!("{:#}", e))
    })?;

    Ok(pool)
}
