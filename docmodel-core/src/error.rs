//! Error types and result types for model operations.
//!
//! Validation failures and store failures share one enum so callers can use `?`
//! across `validate`, `save`, `load` and `delete`. Use [`ModelResult<T>`] as the
//! return type for fallible operations.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when validating or persisting a model.
///
/// Apart from [`ModelError::Validation`] and [`ModelError::Unsaved`], every variant is
/// produced by a store backend or an encoder and is passed to the caller unmodified.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A required field is unset or a validator rejected the record.
    /// The reason is meant for humans; branch on the variant, not the text.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The operation needs a record identity but the record was never saved or loaded.
    /// The argument is the collection name.
    #[error("Can't operate on an unloaded record in collection {0}")]
    Unsaved(String),
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A document with the given ID already exists in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document {0} already exists in collection {1}")]
    DocumentAlreadyExists(String, String),
    /// The requested document was not found in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document not found {0} in collection {1}")]
    DocumentNotFound(String, String),
    /// The record did not encode to a BSON document, or a stored document is malformed.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl ModelError {
    /// Returns `true` if this error reports a missing document.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ModelError::DocumentNotFound(..))
    }
}

/// A specialized `Result` type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

impl From<BsonError> for ModelError {
    fn from(err: BsonError) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for ModelError {
    fn from(err: SerdeJsonError) -> Self {
        ModelError::Serialization(err.to_string())
    }
}
