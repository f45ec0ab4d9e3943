//! Convenient re-exports of commonly used types from docmodel.
//!
//! ```ignore
//! use docmodel::prelude::*;
//! ```
//!
//! This provides access to:
//! - The `Model` trait and derive macro
//! - Schemas, field accessors and validation outcomes
//! - Model stores, collections and backends
//! - Error types

pub use docmodel_core::{
    backend::{DynStoreBackend, StoreBackend, StoreBackendBuilder},
    collection::ModelCollection,
    error::{ModelError, ModelResult},
    field::{DefaultValue, FieldValue, RequiredField},
    index::IndexSpec,
    model::{Model, ModelExt},
    schema::{Schema, SchemaBuilder},
    store::{DynModelStore, ModelStore},
    validate::Outcome,
};
pub use docmodel_macros::Model;
