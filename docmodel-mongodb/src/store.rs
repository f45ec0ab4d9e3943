use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use mongodb::{
    Client, Collection as MongoCollection,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::ClientOptions,
};
use tracing::trace;
use docmodel_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{ModelError, ModelResult},
    index::IndexSpec,
};

use crate::index::index_model;

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;


#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    fn not_found(id: &ObjectId, collection: &str) -> ModelError {
        ModelError::DocumentNotFound(id.to_hex(), collection.to_string())
    }

    async fn shutdown(self) -> ModelResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert(&self, collection: &str, document: Document) -> ModelResult<()> {
        trace!(collection, "insert_one");

        let key = document.get_object_id("_id").ok();

        self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| write_error(&e, key.as_ref(), collection))?;

        Ok(())
    }

    async fn update_by_id(&self, collection: &str, id: &ObjectId, document: Document) -> ModelResult<()> {
        trace!(collection, %id, "replace_one");

        let result = self.get_collection(collection)
            .replace_one(doc! { "_id": *id }, document)
            .await
            .map_err(|e| write_error(&e, Some(id), collection))?;

        if result.matched_count == 0 {
            return Err(Self::not_found(id, collection));
        }

        Ok(())
    }

    async fn remove_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<()> {
        trace!(collection, %id, "delete_one");

        let result = self.get_collection(collection)
            .delete_one(doc! { "_id": *id })
            .await
            .map_err(|e| ModelError::Backend(e.to_string()))?;

        if result.deleted_count == 0 {
            return Err(Self::not_found(id, collection));
        }

        Ok(())
    }

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<Document> {
        trace!(collection, %id, "find_one");

        self.get_collection(collection)
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| ModelError::Backend(e.to_string()))?
            .ok_or_else(|| Self::not_found(id, collection))
    }

    async fn ensure_indexes(&self, collection: &str, indexes: Vec<IndexSpec>) -> ModelResult<()> {
        if indexes.is_empty() {
            return Ok(());
        }

        self.get_collection(collection)
            .create_indexes(indexes.into_iter().map(index_model))
            .await
            .map_err(|e| ModelError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn shutdown(self) -> ModelResult<()> {
        self.shutdown().await
    }
}

fn write_error_code(error: &MongoError) -> Option<i32> {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        _ => None,
    }
}

fn write_error(error: &MongoError, key: Option<&ObjectId>, collection: &str) -> ModelError {
    classify_write_error(write_error_code(error), error.to_string(), key, collection)
}

/// Maps a failed write to the error the in-memory backend reports for the same failure.
///
/// A duplicate key is reported as [`ModelError::DocumentAlreadyExists`], naming the
/// document key when it is known and the server message otherwise.
fn classify_write_error(
    code: Option<i32>,
    message: String,
    key: Option<&ObjectId>,
    collection: &str,
) -> ModelError {
    match code {
        Some(DUPLICATE_KEY) => ModelError::DocumentAlreadyExists(
            key.map_or(message, |id| id.to_hex()),
            collection.to_string(),
        ),
        _ => ModelError::Backend(message),
    }
}

/// Connection settings for [`MongoDbStore`]: a connection string and the database to use.
pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> ModelResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| ModelError::Initialization(e.to_string()))?,
            )
            .map_err(|e| ModelError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
