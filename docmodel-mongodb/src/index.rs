//! Translation of docmodel index declarations into MongoDB index models.

use mongodb::{IndexModel, options::IndexOptions};

use docmodel_core::index::IndexSpec;


/// Builds the MongoDB index model for a declared index, field for field.
pub(crate) fn index_model(spec: IndexSpec) -> IndexModel {
    let mut options = IndexOptions::default();

    if spec.unique {
        options.unique = Some(true);
    }
    if spec.sparse {
        options.sparse = Some(true);
    }
    options.name = spec.name;
    options.expire_after = spec.expire_after;

    IndexModel::builder()
        .keys(spec.keys)
        .options(options)
        .build()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bson::doc;

    use super::*;

    #[test]
    fn options_follow_the_index_declaration() {
        let model = index_model(
            IndexSpec::on(["-created_at"])
                .named("recent")
                .expire_after(Duration::from_secs(60)),
        );

        assert_eq!(model.keys, doc! { "created_at": -1 });

        let options = model.options.expect("options are always set");
        assert_eq!(options.name.as_deref(), Some("recent"));
        assert_eq!(options.expire_after, Some(Duration::from_secs(60)));
        assert_eq!(options.unique, None);
    }
}
