//! The default-value applier.
//!
//! Defaults are written only on the insert path of
//! [`ModelCollection::save`](crate::collection::ModelCollection::save). Every declared
//! default overwrites its field, whether or not the field already holds a value,
//! so applying defaults to a record that came from the store would clobber its data.
//! Applying them twice is not idempotent when a default is computed at apply time.

use tracing::trace;

use crate::{model::Model, schema::Schema};

impl<M: Model> Schema<M> {
    /// Writes every declared default onto `record`, in declared order.
    pub fn apply_defaults(&self, record: &mut M) {
        for default in &self.defaults {
            trace!(
                collection = M::collection_name(),
                field = default.name(),
                "applying default"
            );

            default.apply(record);
        }
    }
}

/// Writes the defaults declared by the record's type onto `record`.
pub fn apply_defaults<M: Model>(record: &mut M) {
    M::schema().apply_defaults(record)
}
