//! Main model store interface.
//!
//! A [`ModelStore`] owns one backend and hands out typed collections. The backend is
//! constructed by the caller and passed in, so tests can substitute any
//! [`StoreBackend`] implementation.
//!
//! - [`ModelStore`] - Store bound to a specific backend type
//! - [`DynModelStore`] - Store over a boxed backend chosen at runtime
//!
//! # Example
//!
//! ```ignore
//! use docmodel::{prelude::*, memory::InMemoryStore};
//!
//! let store = ModelStore::new(InMemoryStore::builder().build().await?);
//! let users = store.collection::<User>();
//!
//! let mut user = User::new("mattdennebaum", "s0m#Pa$2wD", "matt@example.com");
//! users.validate(&user).into_result()?;
//! users.save(&mut user).await?;
//! ```

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::ModelCollection,
    error::ModelResult,
    model::Model,
};

/// A model store bound to a specific backend implementation.
#[derive(Debug)]
pub struct ModelStore<B: StoreBackend> {
    backend: B,
}

/// A model store whose backend is chosen at runtime.
pub type DynModelStore = ModelStore<Box<dyn DynStoreBackend>>;

impl<B: StoreBackend> ModelStore<B> {
    /// Creates a new model store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the backend this store issues calls to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gets the typed collection for a model type.
    ///
    /// The model's [`Schema`](crate::schema::Schema) is built here, once, and reused
    /// by every operation on the returned collection.
    pub fn collection<M: Model>(&self) -> ModelCollection<'_, B, M> {
        ModelCollection::new(&self.backend)
    }

    /// Shuts down the store and releases backend resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to shut down.
    pub async fn shutdown(self) -> ModelResult<()> {
        self.backend.shutdown().await
    }
}

impl<B: StoreBackend + 'static> ModelStore<B> {
    /// Converts this store into one that dispatches to its backend dynamically.
    pub fn into_dyn(self) -> DynModelStore {
        let backend: Box<dyn DynStoreBackend> = Box::new(self.backend);

        ModelStore::new(backend)
    }
}

impl DynModelStore {
    /// Returns the backend as its concrete type, if it is a `T`.
    pub fn backend_as<T: StoreBackend + 'static>(&self) -> Option<&T> {
        DynStoreBackend::as_any(&*self.backend).downcast_ref::<T>()
    }
}
