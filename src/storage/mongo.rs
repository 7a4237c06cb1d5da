//! MongoDB backend.

use log::{debug, warn};
use mongodb::bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Collection};

use crate::config::{Backend, Config, APP_NAME, SERVER_SELECTION_TIMEOUT};
use crate::error_handling::{categorize_server_code, truncate_message, RecordFailure, StoreError};
use crate::source::Row;

use super::store::DocumentStore;

/// A MongoDB collection authenticated with the configured user.
pub struct MongoStore {
    client: Client,
    collection: Collection<Document>,
    auth_db: String,
}

impl MongoStore {
    /// Creates the client. No network round-trip happens until the first operation.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let uri = format!("mongodb://{}:{}/", config.host, config.port);
        let mut options = ClientOptions::parse(uri.as_str())
            .await
            .map_err(|e| StoreError::Connectivity(e.to_string()))?;

        // Credentials are set on the parsed options so they never need URI escaping.
        let mut credential = Credential::default();
        credential.username = Some(config.user.clone());
        credential.password = Some(config.password.clone());
        credential.source = Some(config.auth_db.clone());
        options.credential = Some(credential);
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connectivity(e.to_string()))?;
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);

        debug!(
            "MongoDB client created for {}:{} (collection {}.{})",
            config.host, config.port, config.database, config.collection
        );

        Ok(MongoStore {
            client,
            collection,
            auth_db: config.auth_db.clone(),
        })
    }
}

/// Converts a row into a BSON document with string values, keeping column order.
pub fn row_to_document(row: &Row) -> Document {
    let mut document = Document::new();
    for (name, value) in row.iter() {
        document.insert(name, value);
    }
    document
}

/// Classifies an `insert_many` error.
///
/// An `InsertMany` error means the server attempted every document; every
/// document not listed in `write_errors` was persisted. Anything else (network,
/// authentication, server selection) means nothing can be assumed written.
pub fn classify_insert_error(error: MongoError, batch_len: usize) -> StoreError {
    match error.kind.as_ref() {
        ErrorKind::InsertMany(failure) => {
            if let Some(wc) = &failure.write_concern_error {
                warn!(
                    "Write concern error during insert_many: {}",
                    truncate_message(&wc.message)
                );
            }
            let failures: Vec<RecordFailure> = failure
                .write_errors
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|we| RecordFailure {
                    index: we.index,
                    kind: categorize_server_code(we.code),
                    message: truncate_message(&we.message),
                })
                .collect();
            StoreError::PartialWrite {
                inserted: batch_len.saturating_sub(failures.len()),
                failures,
            }
        }
        _ => StoreError::Total(error.to_string()),
    }
}

impl DocumentStore for MongoStore {
    fn backend(&self) -> Backend {
        Backend::Mongo
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database(&self.auth_db)
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Connectivity(e.to_string()))
    }

    async fn insert_unordered(&self, batch: &[Row]) -> Result<usize, StoreError> {
        if batch.is_empty() {
            return Ok(0);
        }
        let documents: Vec<Document> = batch.iter().map(row_to_document).collect();

        match self.collection.insert_many(&documents).ordered(false).await {
            Ok(result) => Ok(result.inserted_ids.len()),
            Err(e) => Err(classify_insert_error(e, batch.len())),
        }
    }

    async fn count_documents(&self) -> Result<u64, StoreError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|e| StoreError::Total(e.to_string()))
    }

    async fn close(self) {
        self.client.shutdown().await;
        debug!("MongoDB client shut down");
    }
}
