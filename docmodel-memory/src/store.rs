//! In-memory storage implementation for model stores.
//!
//! Documents are kept as BSON documents in HashMaps keyed by their `_id`, behind
//! async-safe read-write locks.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Document, oid::ObjectId};
use tracing::trace;

use docmodel_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{ModelError, ModelResult},
    index::IndexSpec,
};

type CollectionMap = HashMap<ObjectId, Document>;
type StoreMap = HashMap<String, CollectionMap>;
type IndexMap = HashMap<String, Vec<IndexSpec>>;


/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// Every operation takes the store lock once, so each insert, update, removal and
/// lookup is atomic.
///
/// Index declarations are recorded but not enforced.
///
/// # Example
///
/// ```ignore
/// use docmodel_memory::InMemoryStore;
/// use docmodel::backend::StoreBackend;
/// use bson::{doc, oid::ObjectId};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let id = ObjectId::new();
///     store.insert("users", doc! { "_id": id, "name": "Alice" }).await?;
///
///     let stored = store.find_by_id("users", &id).await?;
///     assert_eq!(stored.get_str("name")?, "Alice");
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
    /// Index declarations per collection, in the order they were first ensured
    indexes: Arc<RwLock<IndexMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
            indexes: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use docmodel_memory::InMemoryStore;
    ///
    /// let store = InMemoryStore::builder().build().await.unwrap();
    /// ```
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Returns the number of documents stored in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }

    /// Returns the indexes ensured on a collection.
    pub async fn indexes(&self, collection: &str) -> Vec<IndexSpec> {
        self.indexes
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn not_found(id: &ObjectId, collection: &str) -> ModelError {
        ModelError::DocumentNotFound(id.to_hex(), collection.to_string())
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert(&self, collection: &str, mut document: Document) -> ModelResult<()> {
        // Documents without a key get one, like a real store would assign.
        let id = match document.get("_id") {
            None => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
            Some(_) => document
                .get_object_id("_id")
                .map_err(|e| ModelError::InvalidDocument(format!("_id: {e}")))?,
        };

        trace!(collection, %id, "insert");

        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        if collection_map.contains_key(&id) {
            return Err(ModelError::DocumentAlreadyExists(id.to_hex(), collection.to_string()));
        }

        collection_map.insert(id, document);

        Ok(())
    }

    async fn update_by_id(&self, collection: &str, id: &ObjectId, mut document: Document) -> ModelResult<()> {
        trace!(collection, %id, "update_by_id");

        document.insert("_id", *id);

        let mut store = self.store.write().await;
        let stored = store
            .get_mut(collection)
            .and_then(|collection_map| collection_map.get_mut(id))
            .ok_or_else(|| Self::not_found(id, collection))?;

        *stored = document;

        Ok(())
    }

    async fn remove_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<()> {
        trace!(collection, %id, "remove_by_id");

        self.store
            .write()
            .await
            .get_mut(collection)
            .and_then(|collection_map| collection_map.remove(id))
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id, collection))
    }

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<Document> {
        trace!(collection, %id, "find_by_id");

        self.store
            .read()
            .await
            .get(collection)
            .and_then(|collection_map| collection_map.get(id))
            .cloned()
            .ok_or_else(|| Self::not_found(id, collection))
    }

    async fn ensure_indexes(&self, collection: &str, indexes: Vec<IndexSpec>) -> ModelResult<()> {
        let mut guard = self.indexes.write().await;
        let known = guard
            .entry(collection.to_string())
            .or_default();

        for index in indexes {
            if !known.contains(&index) {
                known.push(index);
            }
        }

        Ok(())
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// The in-memory store has no configuration, so building always succeeds.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> ModelResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[tokio::test]
    async fn insert_then_find() {
        let store = InMemoryStore::new();
        let id = ObjectId::new();

        store.insert("users", doc! { "_id": id, "name": "Alice" }).await.unwrap();

        let found = store.find_by_id("users", &id).await.unwrap();
        assert_eq!(found, doc! { "_id": id, "name": "Alice" });
        assert_eq!(store.count("users").await, 1);
    }

    #[tokio::test]
    async fn insert_assigns_missing_key() {
        let store = InMemoryStore::new();

        store.insert("events", doc! { "name": "signup" }).await.unwrap();
        store.insert("events", doc! { "name": "signup" }).await.unwrap();

        assert_eq!(store.count("events").await, 2);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryStore::new();
        let id = ObjectId::new();

        store.insert("users", doc! { "_id": id }).await.unwrap();
        let err = store.insert("users", doc! { "_id": id }).await.unwrap_err();

        assert!(matches!(err, ModelError::DocumentAlreadyExists(..)));
    }

    #[tokio::test]
    async fn non_object_id_key_is_invalid() {
        let store = InMemoryStore::new();

        let err = store.insert("users", doc! { "_id": "alice" }).await.unwrap_err();

        assert!(matches!(err, ModelError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn update_replaces_whole_document() {
        let store = InMemoryStore::new();
        let id = ObjectId::new();
        store.insert("users", doc! { "_id": id, "name": "Alice", "age": 30 }).await.unwrap();

        store.update_by_id("users", &id, doc! { "name": "Alicia" }).await.unwrap();

        assert_eq!(
            store.find_by_id("users", &id).await.unwrap(),
            doc! { "name": "Alicia", "_id": id }
        );
    }

    #[tokio::test]
    async fn missing_documents_are_not_found() {
        let store = InMemoryStore::new();
        let id = ObjectId::new();

        assert!(store.update_by_id("users", &id, doc! {}).await.unwrap_err().is_not_found());
        assert!(store.remove_by_id("users", &id).await.unwrap_err().is_not_found());
        assert!(store.find_by_id("users", &id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn remove_then_find_is_not_found() {
        let store = InMemoryStore::new();
        let id = ObjectId::new();
        store.insert("users", doc! { "_id": id }).await.unwrap();

        store.remove_by_id("users", &id).await.unwrap();

        assert!(store.find_by_id("users", &id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn ensured_indexes_are_recorded_once() {
        let store = InMemoryStore::new();
        let email = IndexSpec::on(["email"]).unique();

        store.ensure_indexes("users", vec![email.clone()]).await.unwrap();
        store.ensure_indexes("users", vec![email.clone()]).await.unwrap();

        assert_eq!(store.indexes("users").await, vec![email]);
        assert!(store.indexes("posts").await.is_empty());
    }
}
