//! Core traits for records that persist as documents.
//!
//! A [`Model`] names its collection, exposes its identity and optionally describes
//! itself through a [`Schema`]. [`ModelExt`] converts models to and from the BSON
//! and JSON representations used by backends and callers.

use bson::{Bson, Document, de::deserialize_from_bson, oid::ObjectId, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ModelError, ModelResult},
    schema::Schema,
};

/// Core trait that every persisted record must implement.
///
/// The identity is a 12-byte [`ObjectId`] that stays `None` until the record is first
/// saved. Once set it is never reassigned by this crate.
///
/// Most types should use `#[derive(Model)]` from the `docmodel` crate. A manual
/// implementation looks like this:
///
/// ```ignore
/// use docmodel::{model::Model, schema::Schema, required_fields};
/// use bson::oid::ObjectId;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// pub struct User {
///     #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
///     pub id: Option<ObjectId>,
///     pub username: String,
/// }
///
/// impl Model for User {
///     fn collection_name() -> &'static str {
///         "users"
///     }
///
///     fn id(&self) -> Option<&ObjectId> {
///         self.id.as_ref()
///     }
///
///     fn id_mut(&mut self) -> Option<&mut Option<ObjectId>> {
///         Some(&mut self.id)
///     }
///
///     fn schema() -> Schema<Self> {
///         Schema::builder()
///             .required_fields(required_fields![username])
///             .build()
///     }
/// }
/// ```
pub trait Model: Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static {
    /// Returns the name of the collection this record is stored in.
    fn collection_name() -> &'static str;

    /// Returns the record's identity, or `None` if it has never been saved.
    fn id(&self) -> Option<&ObjectId>;

    /// Returns the slot holding the identity, if the type declares one.
    ///
    /// When this returns `Some`, saving a new record allocates a fresh [`ObjectId`]
    /// into the slot before inserting. Types without an identity slot are inserted
    /// as-is and the store decides the document key.
    fn id_mut(&mut self) -> Option<&mut Option<ObjectId>> {
        None
    }

    /// Describes the record's required fields, validators, defaults and indexes.
    ///
    /// The default schema declares nothing, so validation always passes and no
    /// defaults or indexes are applied.
    fn schema() -> Schema<Self> {
        Schema::new()
    }
}

/// Extension trait providing conversions between models and their stored forms.
///
/// This trait is automatically implemented for all types that implement [`Model`].
pub trait ModelExt: Model {
    /// Encodes this record as a BSON document for the store.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the record does not encode to a document.
    fn to_document(&self) -> ModelResult<Document>;

    /// Decodes a record from a stored BSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    fn from_document(document: Document) -> ModelResult<Self>;

    /// Renders this record as a JSON string, honoring its serde field annotations.
    ///
    /// # Errors
    ///
    /// Returns the encoder's error verbatim as [`ModelError::Serialization`].
    fn to_json(&self) -> ModelResult<String>;
}

impl<M: Model> ModelExt for M {
    fn to_document(&self) -> ModelResult<Document> {
        match serialize_to_bson(self)? {
            Bson::Document(document) => Ok(document),
            other => Err(ModelError::InvalidDocument(format!(
                "{} encoded as {:?} instead of a document",
                M::collection_name(),
                other.element_type()
            ))),
        }
    }

    fn from_document(document: Document) -> ModelResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(document))?)
    }

    fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
