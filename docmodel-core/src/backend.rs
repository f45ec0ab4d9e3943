//! Storage backend abstraction for models.
//!
//! This module defines the Store Adapter: the handful of document operations the
//! model layer needs from a document store. Backends own their connections; the
//! model layer only ever issues one of these calls per operation.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use docmodel::backend::StoreBackend;
//! use bson::{doc, oid::ObjectId};
//!
//! let backend = MyBackendImpl::new();
//!
//! let id = ObjectId::new();
//! backend.insert("users", doc! { "_id": id, "name": "Alice" }).await?;
//! let stored = backend.find_by_id("users", &id).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use std::{any::Any, fmt::Debug};

use crate::{error::ModelResult, index::IndexSpec};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. Each operation must be atomic at the
/// document level; the model layer takes no locks of its own, so concurrent saves of
/// different records rely entirely on the backend.
///
/// # Error Handling
///
/// Errors are returned to callers unmodified, so backends should use the
/// [`ModelError`](crate::error::ModelError) variant that matches the failure, in
/// particular [`ModelError::DocumentNotFound`](crate::error::ModelError::DocumentNotFound)
/// for a missing document.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a new document into a collection.
    ///
    /// The document key is read from its `_id` field. When the document has no `_id`,
    /// the backend assigns one.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DocumentAlreadyExists`](crate::error::ModelError::DocumentAlreadyExists)
    /// or a backend error if the key is taken.
    async fn insert(&self, collection: &str, document: Document) -> ModelResult<()>;

    /// Replaces the whole document stored under `id`.
    ///
    /// This is a full replace, not a partial patch: fields missing from `document`
    /// are removed from the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DocumentNotFound`](crate::error::ModelError::DocumentNotFound)
    /// if no document has this key.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        document: Document,
    ) -> ModelResult<()>;

    /// Removes the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DocumentNotFound`](crate::error::ModelError::DocumentNotFound)
    /// if no document has this key.
    async fn remove_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<()>;

    /// Fetches the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DocumentNotFound`](crate::error::ModelError::DocumentNotFound)
    /// if no document has this key.
    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<Document>;

    /// Creates the given indexes on a collection if they don't exist yet.
    ///
    /// The specs are passed through exactly as the model declared them.
    async fn ensure_indexes(&self, collection: &str, indexes: Vec<IndexSpec>) -> ModelResult<()>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op, but backends with external
    /// connections should override this.
    async fn shutdown(self) -> ModelResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn insert(&self, collection: &str, document: Document) -> ModelResult<()> {
        StoreBackend::insert(*self, collection, document).await
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        document: Document,
    ) -> ModelResult<()> {
        StoreBackend::update_by_id(*self, collection, id, document).await
    }

    async fn remove_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<()> {
        StoreBackend::remove_by_id(*self, collection, id).await
    }

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<Document> {
        StoreBackend::find_by_id(*self, collection, id).await
    }

    async fn ensure_indexes(&self, collection: &str, indexes: Vec<IndexSpec>) -> ModelResult<()> {
        StoreBackend::ensure_indexes(*self, collection, indexes).await
    }
}

/// Object-safe mirror of [`StoreBackend`], implemented for every backend.
///
/// `Box<dyn DynStoreBackend>` implements [`StoreBackend`] itself, which lets a
/// [`ModelStore`](crate::store::ModelStore) pick its backend at runtime.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert(&self, collection: &str, document: Document) -> ModelResult<()>;
    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        document: Document,
    ) -> ModelResult<()>;
    async fn remove_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<()>;
    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<Document>;
    async fn ensure_indexes(&self, collection: &str, indexes: Vec<IndexSpec>) -> ModelResult<()>;
    async fn shutdown_boxed(self: Box<Self>) -> ModelResult<()>;

    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

#[async_trait]
impl<B: StoreBackend + 'static> DynStoreBackend for B {
    async fn insert(&self, collection: &str, document: Document) -> ModelResult<()> {
        StoreBackend::insert(self, collection, document).await
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        document: Document,
    ) -> ModelResult<()> {
        StoreBackend::update_by_id(self, collection, id, document).await
    }

    async fn remove_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<()> {
        StoreBackend::remove_by_id(self, collection, id).await
    }

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<Document> {
        StoreBackend::find_by_id(self, collection, id).await
    }

    async fn ensure_indexes(&self, collection: &str, indexes: Vec<IndexSpec>) -> ModelResult<()> {
        StoreBackend::ensure_indexes(self, collection, indexes).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> ModelResult<()> {
        StoreBackend::shutdown(*self).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[async_trait]
impl StoreBackend for Box<dyn DynStoreBackend> {
    async fn insert(&self, collection: &str, document: Document) -> ModelResult<()> {
        DynStoreBackend::insert(&**self, collection, document).await
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        document: Document,
    ) -> ModelResult<()> {
        DynStoreBackend::update_by_id(&**self, collection, id, document).await
    }

    async fn remove_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<()> {
        DynStoreBackend::remove_by_id(&**self, collection, id).await
    }

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<Document> {
        DynStoreBackend::find_by_id(&**self, collection, id).await
    }

    async fn ensure_indexes(&self, collection: &str, indexes: Vec<IndexSpec>) -> ModelResult<()> {
        DynStoreBackend::ensure_indexes(&**self, collection, indexes).await
    }

    async fn shutdown(self) -> ModelResult<()> {
        DynStoreBackend::shutdown_boxed(self).await
    }
}

/// Factory trait for backends; the builder carries the backend's configuration.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> ModelResult<Self::Backend>;
}
