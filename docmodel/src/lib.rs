//! Main docmodel crate: save, load, delete and validate records in a document store.
//!
//! This crate is the primary entry point for users of docmodel. It re-exports the
//! core types, the `Model` derive macro and the storage backends.
//!
//! # Features
//!
//! - **Model records** - Plain serde structs become persisted documents
//! - **Validation** - Required fields and custom validators, checked in declared order
//! - **Defaults** - Values written into a record before its first insert
//! - **Identity handling** - New records get an `ObjectId`; saved records are updated in place
//! - **Multiple backends** - In-memory and MongoDB storage behind one trait
//!
//! # Quick Start
//!
//! ```ignore
//! use docmodel::{prelude::*, memory::InMemoryStore};
//! use docmodel::bson::oid::ObjectId;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize, Model)]
//! #[model(collection = "users", validator = username_length)]
//! pub struct User {
//!     #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
//!     pub id: Option<ObjectId>,
//!     #[model(required)]
//!     pub username: String,
//!     #[model(required)]
//!     pub password: String,
//!     #[model(required)]
//!     pub email: String,
//!     #[model(default = vec!["member".to_string()])]
//!     pub roles: Vec<String>,
//! }
//!
//! fn username_length(user: &User) -> Outcome {
//!     Outcome::ensure(user.username.len() >= 5, "username is less than 5 chars long")
//! }
//!
//! #[tokio::main]
//! async fn main() -> ModelResult<()> {
//!     let store = ModelStore::new(InMemoryStore::builder().build().await?);
//!     let users = store.collection::<User>();
//!
//!     let mut user = User {
//!         username: "mattdennebaum".into(),
//!         password: "s0m#Pa$2wD".into(),
//!         email: "matt@example.com".into(),
//!         ..User::default()
//!     };
//!
//!     // Validation is explicit; save does not validate.
//!     users.validate(&user).into_result()?;
//!
//!     // No identity yet: inserts, assigning an ObjectId and the default roles.
//!     users.save(&mut user).await?;
//!
//!     // Has an identity: replaces the stored document.
//!     user.email = "matt@example.org".into();
//!     users.save(&mut user).await?;
//!
//!     println!("{}", users.serialize(&user)?);
//!
//!     users.delete(&user).await?;
//!     store.shutdown().await
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! `ModelStore::into_dyn` boxes the backend so the store type no longer depends on
//! which backend was chosen:
//!
//! ```ignore
//! let store: DynModelStore = if use_mongo {
//!     ModelStore::new(MongoDbStore::builder(dsn, "app").build().await?).into_dyn()
//! } else {
//!     ModelStore::new(InMemoryStore::new()).into_dyn()
//! };
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use docmodel_core::{
    backend, collection, defaults, error, field, index, model, schema, store, validate,
    default_values, required_fields,
};
pub use docmodel_macros::Model;

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docmodel_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use docmodel_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
