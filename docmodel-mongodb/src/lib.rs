//! MongoDB backend implementation for docmodel.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! Records are stored as-is: the model's `_id` becomes the MongoDB document key,
//! updates replace the whole document and index declarations become MongoDB indexes.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! docmodel = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The builder takes a MongoDB connection string and the database to use; that is
//! the whole configuration.
//!
//! # Example
//!
//! ```ignore
//! use docmodel::{prelude::*, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = MongoDbStore::builder("mongodb://localhost:27017", "test")
//!         .build()
//!         .await?;
//!     let store = ModelStore::new(backend);
//!
//!     store.collection::<User>().ensure_indexes().await?;
//!     store.shutdown().await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmodel_mongodb;

pub mod store;
mod index;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
