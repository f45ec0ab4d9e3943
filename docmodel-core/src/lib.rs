//! Model-oriented persistence for schemaless document stores.
//!
//! This crate is the core of the docmodel project and provides:
//!
//! - **Model traits** ([`model`]) - Identity, collection name and schema hook for persisted records
//! - **Field accessors** ([`field`]) - Typed, named accessors for required fields and defaults
//! - **Schemas** ([`schema`]) - The per-type descriptor of required fields, validators, defaults and indexes
//! - **Validation** ([`validate`]) - Required-field checks followed by custom validators
//! - **Defaults** ([`defaults`]) - Default values written before a record's first insert
//! - **Indexes** ([`index`]) - Index declarations passed through to the backend
//! - **Store backend abstraction** ([`backend`]) - The operations a document store must provide
//! - **Collections** ([`collection`]) - Save, load, delete and serialize for one model type
//! - **Model store** ([`store`]) - Owns a backend and hands out typed collections
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use docmodel::{prelude::*, required_fields};
//! use bson::oid::ObjectId;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! pub struct User {
//!     #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
//!     pub id: Option<ObjectId>,
//!     pub name: String,
//! }
//!
//! impl Model for User {
//!     fn collection_name() -> &'static str {
//!         "users"
//!     }
//!
//!     fn id(&self) -> Option<&ObjectId> {
//!         self.id.as_ref()
//!     }
//!
//!     fn id_mut(&mut self) -> Option<&mut Option<ObjectId>> {
//!         Some(&mut self.id)
//!     }
//!
//!     fn schema() -> Schema<Self> {
//!         Schema::builder().required_fields(required_fields![name]).build()
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmodel_core;

pub mod backend;
pub mod collection;
pub mod defaults;
pub mod error;
pub mod field;
pub mod index;
pub mod model;
pub mod schema;
pub mod store;
pub mod validate;
