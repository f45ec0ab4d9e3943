//! Index declarations.
//!
//! An [`IndexSpec`] is handed verbatim to
//! [`StoreBackend::ensure_indexes`](crate::backend::StoreBackend::ensure_indexes);
//! this crate never interprets it.

use std::time::Duration;

use bson::Document;

/// Describes one index on a collection.
///
/// # Example
///
/// ```ignore
/// use docmodel::index::IndexSpec;
///
/// let by_email = IndexSpec::on(["email"]).unique();
/// let newest_first = IndexSpec::on(["-created_at"]).named("created_desc");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexSpec {
    /// Key document, e.g. `{ "email": 1, "created_at": -1 }`.
    pub keys: Document,
    /// Reject documents that duplicate an existing key.
    pub unique: bool,
    /// Only index documents that contain the indexed fields.
    pub sparse: bool,
    /// Explicit index name; the store picks one when `None`.
    pub name: Option<String>,
    /// Remove documents this long after the indexed time value.
    pub expire_after: Option<Duration>,
}

impl IndexSpec {
    /// Creates an index over the given fields, in order.
    ///
    /// A leading `-` marks a field as descending, so `"-created_at"` becomes
    /// `created_at: -1`.
    pub fn on<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys = Document::new();

        for field in fields {
            let field = field.as_ref();

            match field.strip_prefix('-') {
                Some(name) => keys.insert(name, -1),
                None => keys.insert(field.trim_start_matches('+'), 1),
            };
        }

        Self::with_keys(keys)
    }

    /// Creates an index from a raw key document.
    pub fn with_keys(keys: Document) -> Self {
        Self { keys, ..Self::default() }
    }

    /// Marks the index as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Marks the index as sparse.
    pub fn sparse(mut self) -> Self {
        self.sparse = true;
        self
    }

    /// Sets the index name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a time-to-live for documents covered by the index.
    pub fn expire_after(mut self, ttl: Duration) -> Self {
        self.expire_after = Some(ttl);
        self
    }
}
