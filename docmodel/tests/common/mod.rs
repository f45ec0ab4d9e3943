#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docmodel::{
    bson::{Document, oid::ObjectId},
    index::IndexSpec,
    memory::InMemoryStore,
    prelude::*,
};
use serde::{Deserialize, Serialize};

/// Wraps an [`InMemoryStore`] and counts every call made to it.
#[derive(Debug, Default)]
pub struct SpyBackend {
    pub inner: InMemoryStore,
    pub inserts: AtomicUsize,
    pub updates: AtomicUsize,
    pub removes: AtomicUsize,
    pub finds: AtomicUsize,
    pub index_calls: AtomicUsize,
}

impl SpyBackend {
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn index_calls(&self) -> usize {
        self.index_calls.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.inserts() + self.updates() + self.removes() + self.finds() + self.index_calls()
    }
}

#[async_trait]
impl StoreBackend for SpyBackend {
    async fn insert(&self, collection: &str, document: Document) -> ModelResult<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        StoreBackend::insert(&self.inner, collection, document).await
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
        document: Document,
    ) -> ModelResult<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        StoreBackend::update_by_id(&self.inner, collection, id, document).await
    }

    async fn remove_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        StoreBackend::remove_by_id(&self.inner, collection, id).await
    }

    async fn find_by_id(&self, collection: &str, id: &ObjectId) -> ModelResult<Document> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        StoreBackend::find_by_id(&self.inner, collection, id).await
    }

    async fn ensure_indexes(&self, collection: &str, indexes: Vec<IndexSpec>) -> ModelResult<()> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        StoreBackend::ensure_indexes(&self.inner, collection, indexes).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "users", validator = username_length, indexes = user_indexes)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[model(required)]
    pub username: String,
    #[model(required)]
    pub password: String,
    #[model(required)]
    pub email: String,
    #[model(default = vec!["member".to_string()])]
    pub roles: Vec<String>,
    #[serde(default)]
    pub logins: u32,
}

impl User {
    pub fn new(username: &str, password: &str, email: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            ..Self::default()
        }
    }
}

fn username_length(user: &User) -> Outcome {
    Outcome::ensure(user.username.len() >= 5, "username is less then 5 chars long")
}

fn user_indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::on(["username"]).unique(),
        IndexSpec::on(["email"]).unique().sparse(),
    ]
}

pub fn spy_store() -> ModelStore<SpyBackend> {
    ModelStore::new(SpyBackend::default())
}
