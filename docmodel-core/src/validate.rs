//! The validation engine.
//!
//! Validation checks required fields in declared order, then runs custom validators
//! in declared order. The first failure wins and nothing after it runs. Validation
//! only reads the record.

use tracing::debug;

use crate::{
    error::{ModelError, ModelResult},
    model::Model,
    schema::Schema,
};

/// Result of validating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every check passed.
    Valid,
    /// A check failed; the reason is for humans.
    Invalid(String),
}

impl Outcome {
    /// Creates an invalid outcome.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Outcome::Invalid(reason.into())
    }

    /// Returns `Valid` when `condition` holds, otherwise `Invalid(reason)`.
    pub fn ensure(condition: bool, reason: impl Into<String>) -> Self {
        if condition {
            Outcome::Valid
        } else {
            Outcome::invalid(reason)
        }
    }

    /// Returns `true` for [`Outcome::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid)
    }

    /// Returns the failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Valid => None,
            Outcome::Invalid(reason) => Some(reason),
        }
    }

    /// Converts the outcome into a result so it can be used with `?`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Validation`] carrying the reason of an invalid outcome.
    pub fn into_result(self) -> ModelResult<()> {
        match self {
            Outcome::Valid => Ok(()),
            Outcome::Invalid(reason) => Err(ModelError::Validation(reason)),
        }
    }
}

impl<M: Model> Schema<M> {
    /// Validates `record` against this schema.
    pub fn validate(&self, record: &M) -> Outcome {
        if let Some(field) = self.required.iter().find(|field| field.is_unset(record)) {
            debug!(
                collection = M::collection_name(),
                field = field.name(),
                "required field isn't set"
            );

            return Outcome::invalid(format!("required field isn't set: {}", field.name()));
        }

        for validator in &self.validators {
            if let Outcome::Invalid(reason) = validator(record) {
                debug!(
                    collection = M::collection_name(),
                    reason = %reason,
                    "validator rejected record"
                );

                return Outcome::Invalid(reason);
            }
        }

        Outcome::Valid
    }
}

/// Validates `record` against its type's schema.
///
/// This builds the schema on every call; hold a
/// [`ModelCollection`](crate::collection::ModelCollection) to reuse it.
pub fn validate<M: Model>(record: &M) -> Outcome {
    M::schema().validate(record)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use bson::oid::ObjectId;
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{field::RequiredField, required_fields};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct User {
        #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
        id: Option<ObjectId>,
        username: String,
        password: String,
        email: String,
        nickname: Option<String>,
        logins: u32,
    }

    impl Model for User {
        fn collection_name() -> &'static str {
            "users"
        }

        fn id(&self) -> Option<&ObjectId> {
            self.id.as_ref()
        }

        fn schema() -> Schema<Self> {
            Schema::builder()
                .required_fields(required_fields![username, password, email])
                .validator(|user: &Self| {
                    Outcome::ensure(user.username.len() >= 5, "username is less than 5 chars long")
                })
                .build()
        }
    }

    impl User {
        fn email_required() -> Vec<RequiredField<Self>> {
            required_fields![email]
        }

        fn counters_required() -> Vec<RequiredField<Self>> {
            required_fields![logins, nickname]
        }
    }

    fn user() -> User {
        User {
            username: "mattdennebaum".into(),
            password: "s0m#Pa$2wD".into(),
            email: "matt@example.com".into(),
            ..User::default()
        }
    }

    #[test]
    fn all_required_fields_set_is_valid() {
        assert_eq!(validate(&user()), Outcome::Valid);
    }

    #[test]
    fn missing_required_field_names_the_field() {
        let mut user = user();
        user.email.clear();

        let outcome = validate(&user);

        assert_eq!(outcome.reason(), Some("required field isn't set: email"));
    }

    #[test]
    fn first_missing_field_wins() {
        let user = User::default();

        assert_eq!(
            validate(&user).reason(),
            Some("required field isn't set: username")
        );
    }

    #[test]
    fn validator_reason_is_returned() {
        let mut user = user();
        user.username = "matt".into();

        let outcome = validate(&user);

        assert!(!outcome.is_valid());
        assert_eq!(outcome.reason(), Some("username is less than 5 chars long"));
        assert!(matches!(outcome.into_result(), Err(ModelError::Validation(_))));
    }

    #[test]
    fn required_failure_skips_validators() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let schema = Schema::<User>::builder()
            .required_fields(User::email_required())
            .validator(move |_: &User| {
                counter.fetch_add(1, Ordering::SeqCst);
                Outcome::Valid
            })
            .build();

        let mut user = user();
        user.email.clear();

        assert!(!schema.validate(&user).is_valid());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        user.email = "matt@example.com".into();

        assert!(schema.validate(&user).is_valid());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn validators_stop_at_first_rejection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let schema = Schema::<User>::builder()
            .validator(|_: &User| Outcome::invalid("first"))
            .validator(move |_: &User| {
                counter.fetch_add(1, Ordering::SeqCst);
                Outcome::invalid("second")
            })
            .build();

        assert_eq!(schema.validate(&user()).reason(), Some("first"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unset_option_fails_but_zero_number_passes() {
        let schema = Schema::<User>::builder()
            .required_fields(User::counters_required())
            .build();

        assert_eq!(
            schema.validate(&user()).reason(),
            Some("required field isn't set: nickname")
        );

        let mut user = user();
        user.nickname = Some(String::new());

        assert!(schema.validate(&user).is_valid());
    }

    #[test]
    fn validation_is_repeatable() {
        let mut user = user();
        user.password.clear();

        let first = validate(&user);
        let second = validate(&user);

        assert_eq!(first, second);
        assert!(user.password.is_empty());
    }
}
