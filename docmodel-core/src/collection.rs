//! Typed collections: the persistence side of a model.
//!
//! A [`ModelCollection`] decides between insert and update, applies defaults to new
//! records and forwards every call to the backend. Each operation issues at most one
//! backend call and never retries.
//!
//! # Lifecycle
//!
//! A record without an identity is *unsaved*. Saving it inserts a document and
//! leaves the record holding its new identity; saving again replaces the stored
//! document. Deleting removes the stored document but the record keeps its identity
//! in memory. Deleting or loading an unsaved record fails without contacting the
//! backend.

use bson::{Document, oid::ObjectId};
use tracing::debug;

use crate::{
    backend::StoreBackend,
    error::{ModelError, ModelResult},
    model::{Model, ModelExt},
    schema::Schema,
    validate::Outcome,
};

/// A collection of records of type `M`, backed by `B`.
#[derive(Debug)]
pub struct ModelCollection<'a, B: StoreBackend, M: Model> {
    backend: &'a B,
    schema: Schema<M>,
}

impl<'a, B: StoreBackend, M: Model> ModelCollection<'a, B, M> {
    pub(crate) fn new(backend: &'a B) -> Self {
        Self { backend, schema: M::schema() }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &'static str {
        M::collection_name()
    }

    /// Returns the schema built for `M`.
    pub fn schema(&self) -> &Schema<M> {
        &self.schema
    }

    /// Validates `record` against the collection's schema.
    ///
    /// Validation is separate from [`save`](Self::save); callers that want to reject
    /// invalid records do so before saving.
    pub fn validate(&self, record: &M) -> Outcome {
        self.schema.validate(record)
    }

    /// Saves `record`, inserting it if it has no identity and replacing the stored
    /// document otherwise.
    ///
    /// On the insert path a fresh [`ObjectId`] is written into the record's identity
    /// slot (when the type has one) and the schema's defaults are applied before the
    /// document is encoded. The identity stays on the record even if the insert fails.
    ///
    /// The stored document is always keyed by the record's identity: its `_id` is set
    /// from [`Model::id`] whatever name serde gives the identity field.
    ///
    /// # Errors
    ///
    /// Returns encoder errors, or the backend's error unmodified.
    pub async fn save(&self, record: &mut M) -> ModelResult<()> {
        if let Some(id) = record.id().copied() {
            debug!(collection = self.name(), %id, "updating document");

            return self
                .backend
                .update_by_id(self.name(), &id, self.encode(record)?)
                .await;
        }

        if let Some(slot) = record.id_mut() {
            *slot = Some(ObjectId::new());
        }

        if self.schema.is_defaulted() {
            self.schema.apply_defaults(record);
        }

        debug!(
            collection = self.name(),
            id = ?record.id(),
            "inserting document"
        );

        self.backend
            .insert(self.name(), self.encode(record)?)
            .await
    }

    /// Removes the stored document for `record`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Unsaved`] without contacting the backend if the record
    /// has no identity, otherwise the backend's error unmodified.
    pub async fn delete(&self, record: &M) -> ModelResult<()> {
        let id = self.require_id(record)?;

        debug!(collection = self.name(), %id, "removing document");

        self.backend.remove_by_id(self.name(), id).await
    }

    /// Replaces the contents of `record` with the stored document for its identity.
    ///
    /// The record usually starts out as a default value with only its identity set.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Unsaved`] without contacting the backend if the record
    /// has no identity, the backend's not-found error if nothing is stored under it,
    /// or a decoding error.
    pub async fn load(&self, record: &mut M) -> ModelResult<()> {
        let id = *self.require_id(record)?;

        *record = self.find(&id).await?;

        Ok(())
    }

    /// Fetches the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns the backend's not-found error if nothing is stored under `id`, or a
    /// decoding error.
    pub async fn find(&self, id: &ObjectId) -> ModelResult<M> {
        debug!(collection = self.name(), %id, "finding document");

        M::from_document(self.backend.find_by_id(self.name(), id).await?)
    }

    /// Renders `record` as JSON, honoring its serde field annotations.
    ///
    /// # Errors
    ///
    /// Returns the encoder's error as [`ModelError::Serialization`].
    pub fn serialize(&self, record: &M) -> ModelResult<String> {
        record.to_json()
    }

    /// Passes the schema's index declarations to the backend.
    ///
    /// Does nothing when the schema declares no indexes.
    ///
    /// # Errors
    ///
    /// Returns the backend's error unmodified.
    pub async fn ensure_indexes(&self) -> ModelResult<()> {
        if !self.schema.is_indexed() {
            return Ok(());
        }

        debug!(
            collection = self.name(),
            count = self.schema.indexes().len(),
            "ensuring indexes"
        );

        self.backend
            .ensure_indexes(self.name(), self.schema.indexes().to_vec())
            .await
    }

    fn encode(&self, record: &M) -> ModelResult<Document> {
        let mut document = record.to_document()?;

        if let Some(id) = record.id() {
            document.insert("_id", *id);
        }

        Ok(document)
    }

    fn require_id<'r>(&self, record: &'r M) -> ModelResult<&'r ObjectId> {
        record
            .id()
            .ok_or_else(|| ModelError::Unsaved(self.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bson::doc;
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{default_values, index::IndexSpec, store::ModelStore};

    #[derive(Debug, Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<String>>,
        stored: Mutex<Option<Document>>,
    }

    impl RecordingBackend {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    #[async_trait]
    impl StoreBackend for RecordingBackend {
        async fn insert(&self, _collection: &str, document: Document) -> ModelResult<()> {
            self.record("insert");
            *self.stored.lock().unwrap() = Some(document);
            Ok(())
        }

        async fn update_by_id(
            &self,
            _collection: &str,
            _id: &ObjectId,
            document: Document,
        ) -> ModelResult<()> {
            self.record("update_by_id");
            *self.stored.lock().unwrap() = Some(document);
            Ok(())
        }

        async fn remove_by_id(&self, _collection: &str, _id: &ObjectId) -> ModelResult<()> {
            self.record("remove_by_id");
            Ok(())
        }

        async fn find_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<Document> {
            self.record("find_by_id");
            self.stored
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ModelError::DocumentNotFound(id.to_hex(), collection.to_string()))
        }

        async fn ensure_indexes(&self, _collection: &str, indexes: Vec<IndexSpec>) -> ModelResult<()> {
            self.record(&format!("ensure_indexes:{}", indexes.len()));
            Ok(())
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Note {
        #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
        id: Option<ObjectId>,
        body: String,
        tags: Vec<String>,
    }

    impl Model for Note {
        fn collection_name() -> &'static str {
            "notes"
        }

        fn id(&self) -> Option<&ObjectId> {
            self.id.as_ref()
        }

        fn id_mut(&mut self) -> Option<&mut Option<ObjectId>> {
            Some(&mut self.id)
        }

        fn schema() -> Schema<Self> {
            Schema::builder()
                .default_values(default_values![tags => vec!["inbox".to_string()]])
                .build()
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Draft {
        id: Option<ObjectId>,
        title: String,
    }

    impl Model for Draft {
        fn collection_name() -> &'static str {
            "drafts"
        }

        fn id(&self) -> Option<&ObjectId> {
            self.id.as_ref()
        }

        fn id_mut(&mut self) -> Option<&mut Option<ObjectId>> {
            Some(&mut self.id)
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Event {
        name: String,
    }

    impl Model for Event {
        fn collection_name() -> &'static str {
            "events"
        }

        fn id(&self) -> Option<&ObjectId> {
            None
        }
    }

    #[tokio::test]
    async fn new_record_is_inserted_then_updated() {
        let store = ModelStore::new(RecordingBackend::default());
        let notes = store.collection::<Note>();
        let mut note = Note { body: "hello".into(), ..Note::default() };

        notes.save(&mut note).await.unwrap();
        let id = note.id.expect("identity assigned on insert");
        assert_eq!(note.tags, vec!["inbox".to_string()]);

        note.tags = vec!["work".into()];
        notes.save(&mut note).await.unwrap();

        assert_eq!(note.id, Some(id));
        assert_eq!(note.tags, vec!["work".to_string()]);
        assert_eq!(store.backend().calls(), vec!["insert", "update_by_id"]);

        let stored = store.backend().stored.lock().unwrap().clone().unwrap();
        assert_eq!(stored.get_object_id("_id").unwrap(), id);
    }

    #[tokio::test]
    async fn stored_key_follows_identity_field_without_rename() {
        let store = ModelStore::new(RecordingBackend::default());
        let drafts = store.collection::<Draft>();
        let mut draft = Draft { title: "plan".into(), ..Draft::default() };

        drafts.save(&mut draft).await.unwrap();
        let id = draft.id.unwrap();
        let inserted = store.backend().stored.lock().unwrap().clone().unwrap();
        assert_eq!(inserted.get_object_id("_id").unwrap(), id);
        assert_eq!(inserted.get_object_id("id").unwrap(), id);

        draft.title = "revised".into();
        drafts.save(&mut draft).await.unwrap();

        let updated = store.backend().stored.lock().unwrap().clone().unwrap();
        assert_eq!(updated.get_object_id("_id").unwrap(), id);
        assert_eq!(updated.get_str("title").unwrap(), "revised");
    }

    #[tokio::test]
    async fn unsaved_record_cannot_be_deleted_or_loaded() {
        let store = ModelStore::new(RecordingBackend::default());
        let notes = store.collection::<Note>();
        let mut note = Note::default();

        assert!(matches!(notes.delete(&note).await, Err(ModelError::Unsaved(c)) if c == "notes"));
        assert!(matches!(notes.load(&mut note).await, Err(ModelError::Unsaved(_))));
        assert!(store.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn load_replaces_record_contents() {
        let store = ModelStore::new(RecordingBackend::default());
        let notes = store.collection::<Note>();
        let mut note = Note { body: "kept".into(), ..Note::default() };
        notes.save(&mut note).await.unwrap();

        let mut loaded = Note { id: note.id, ..Note::default() };
        notes.load(&mut loaded).await.unwrap();

        assert_eq!(loaded.body, "kept");
        assert_eq!(loaded.tags, vec!["inbox".to_string()]);
    }

    #[tokio::test]
    async fn record_without_identity_slot_is_inserted_as_is() {
        let store = ModelStore::new(RecordingBackend::default());
        let events = store.collection::<Event>();
        let mut event = Event { name: "signup".into() };

        events.save(&mut event).await.unwrap();
        events.save(&mut event).await.unwrap();

        assert_eq!(store.backend().calls(), vec!["insert", "insert"]);
        assert_eq!(
            store.backend().stored.lock().unwrap().clone(),
            Some(doc! { "name": "signup" })
        );
    }

    #[tokio::test]
    async fn indexes_are_skipped_when_none_are_declared() {
        let store = ModelStore::new(RecordingBackend::default());

        store.collection::<Note>().ensure_indexes().await.unwrap();

        assert!(store.backend().calls().is_empty());
    }

    #[test]
    fn serialize_omits_missing_identity() {
        let store = ModelStore::new(RecordingBackend::default());
        let note = Note { body: "hi".into(), ..Note::default() };

        let json = store.collection::<Note>().serialize(&note).unwrap();

        assert_eq!(json, r#"{"body":"hi","tags":[]}"#);
    }
}
