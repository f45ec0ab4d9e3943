//! Per-type model descriptors.
//!
//! A [`Schema`] bundles everything optional a model can declare: required fields,
//! validators, default values and indexes. Each model builds its schema in
//! [`Model::schema`](crate::model::Model::schema); typed collections build it once
//! and reuse it for every call.

use std::fmt;

use crate::{
    field::{DefaultValue, RequiredField},
    index::IndexSpec,
    validate::Outcome,
};

/// A custom validation rule. Receives the whole record.
pub type Validator<M> = Box<dyn Fn(&M) -> Outcome + Send + Sync>;

/// The declared capabilities of a model type.
pub struct Schema<M> {
    pub(crate) required: Vec<RequiredField<M>>,
    pub(crate) validators: Vec<Validator<M>>,
    pub(crate) defaults: Vec<DefaultValue<M>>,
    pub(crate) indexes: Vec<IndexSpec>,
}

impl<M> Schema<M> {
    /// Creates a schema that declares nothing.
    pub fn new() -> Self {
        Self {
            required: Vec::new(),
            validators: Vec::new(),
            defaults: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Creates a builder for a schema.
    pub fn builder() -> SchemaBuilder<M> {
        SchemaBuilder { schema: Self::new() }
    }

    /// Returns the required fields in declared order.
    pub fn required_fields(&self) -> &[RequiredField<M>] {
        &self.required
    }

    /// Returns the number of custom validators.
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Returns the default values in declared order.
    pub fn default_values(&self) -> &[DefaultValue<M>] {
        &self.defaults
    }

    /// Returns the declared indexes.
    pub fn indexes(&self) -> &[IndexSpec] {
        &self.indexes
    }

    /// Returns `true` if the schema declares required fields or validators.
    pub fn is_validated(&self) -> bool {
        !self.required.is_empty() || !self.validators.is_empty()
    }

    /// Returns `true` if the schema declares default values.
    pub fn is_defaulted(&self) -> bool {
        !self.defaults.is_empty()
    }

    /// Returns `true` if the schema declares indexes.
    pub fn is_indexed(&self) -> bool {
        !self.indexes.is_empty()
    }
}

impl<M> Default for Schema<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for Schema<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("required", &self.required)
            .field("validators", &self.validators.len())
            .field("defaults", &self.defaults)
            .field("indexes", &self.indexes)
            .finish()
    }
}

/// Builder for [`Schema`]. Entries keep the order they are added in.
///
/// # Example
///
/// ```ignore
/// Schema::builder()
///     .required_fields(required_fields![username, password])
///     .validator(|user: &User| Outcome::ensure(user.username.len() >= 5, "username is too short"))
///     .default_values(default_values![roles => vec!["member".to_string()]])
///     .index(IndexSpec::on(["username"]).unique())
///     .build()
/// ```
pub struct SchemaBuilder<M> {
    schema: Schema<M>,
}

impl<M> SchemaBuilder<M> {
    /// Adds one required field.
    pub fn required(mut self, field: RequiredField<M>) -> Self {
        self.schema.required.push(field);
        self
    }

    /// Adds several required fields.
    pub fn required_fields(mut self, fields: impl IntoIterator<Item = RequiredField<M>>) -> Self {
        self.schema.required.extend(fields);
        self
    }

    /// Adds a validator. Validators run after the required-field checks.
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&M) -> Outcome + Send + Sync + 'static,
    {
        self.schema.validators.push(Box::new(validator));
        self
    }

    /// Adds one default value.
    pub fn default_value(mut self, default: DefaultValue<M>) -> Self {
        self.schema.defaults.push(default);
        self
    }

    /// Adds several default values.
    pub fn default_values(mut self, defaults: impl IntoIterator<Item = DefaultValue<M>>) -> Self {
        self.schema.defaults.extend(defaults);
        self
    }

    /// Adds one index.
    pub fn index(mut self, index: IndexSpec) -> Self {
        self.schema.indexes.push(index);
        self
    }

    /// Adds several indexes.
    pub fn indexes(mut self, indexes: impl IntoIterator<Item = IndexSpec>) -> Self {
        self.schema.indexes.extend(indexes);
        self
    }

    /// Finishes the schema.
    pub fn build(self) -> Schema<M> {
        self.schema
    }
}
