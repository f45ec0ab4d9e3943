//! In-memory document storage backend for docmodel.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is ideal for development
//! and testing.
//!
//! # Quick Start
//!
//! ```ignore
//! use docmodel::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = ModelStore::new(InMemoryStore::builder().build().await?);
//!     let users = store.collection::<User>();
//!
//!     let mut user = User { name: "Alice".to_string(), ..User::default() };
//!     users.save(&mut user).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmodel_memory;

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
