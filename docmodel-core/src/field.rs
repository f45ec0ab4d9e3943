//! Named, typed field accessors used by schemas.
//!
//! A [`RequiredField`] pairs a field name with a function that reports whether the
//! field is unset; a [`DefaultValue`] pairs a field name with a function that writes
//! the default. Both are normally generated by `#[derive(Model)]` or by the
//! [`required_fields!`](crate::required_fields) and
//! [`default_values!`](crate::default_values) macros, which expand to direct field
//! accesses so a misspelled name fails to compile.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use bson::{Binary, Bson, Decimal128, Document, Timestamp, Uuid, oid::ObjectId};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Emptiness test applied to required fields.
///
/// Containers are unset when they have no elements and nilable values are unset
/// when null. Every other kind is never unset: a required integer holding `0` or a
/// required `bool` holding `false` passes validation.
///
/// Required fields whose type has no impl are accepted too and treated as never
/// unset, so a struct or a type from another crate can be marked required as is.
/// Smart pointers and `Cow` delegate to the value they hold.
pub trait FieldValue {
    /// Returns `true` if the value counts as unset for a required field.
    fn is_unset(&self) -> bool {
        false
    }
}

impl FieldValue for String {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl FieldValue for str {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T> FieldValue for [T] {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T> FieldValue for Vec<T> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T> FieldValue for VecDeque<T> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T, const N: usize> FieldValue for [T; N] {
    fn is_unset(&self) -> bool {
        N == 0
    }
}

impl<K, V, S> FieldValue for HashMap<K, V, S> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> FieldValue for BTreeMap<K, V> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T, S> FieldValue for HashSet<T, S> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T> FieldValue for BTreeSet<T> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T> FieldValue for Option<T> {
    fn is_unset(&self) -> bool {
        self.is_none()
    }
}

impl FieldValue for Document {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl FieldValue for Bson {
    fn is_unset(&self) -> bool {
        matches!(self, Bson::Null)
    }
}

impl FieldValue for Binary {
    fn is_unset(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl FieldValue for serde_json::Value {
    fn is_unset(&self) -> bool {
        self.is_null()
    }
}

macro_rules! delegate_unset {
    ($($ptr:ident),*) => {
        $(impl<T: FieldValue + ?Sized> FieldValue for $ptr<T> {
            fn is_unset(&self) -> bool {
                FieldValue::is_unset(&**self)
            }
        })*
    };
}

delegate_unset!(Box, Rc, Arc);

impl<T: FieldValue + ?Sized> FieldValue for &T {
    fn is_unset(&self) -> bool {
        FieldValue::is_unset(&**self)
    }
}

impl<B: FieldValue + ToOwned + ?Sized> FieldValue for Cow<'_, B> {
    fn is_unset(&self) -> bool {
        FieldValue::is_unset(&**self)
    }
}

impl<Tz: TimeZone> FieldValue for DateTime<Tz> {}

macro_rules! never_unset {
    ($($ty:ty),* $(,)?) => {
        $(impl FieldValue for $ty {})*
    };
}

never_unset!(
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64, bool, char,
    ObjectId, bson::DateTime, Uuid, Decimal128, Timestamp,
    NaiveDate, NaiveDateTime,
);

/// Field lookup used by generated required-field accessors.
///
/// `(&Probe(&value)).is_unset()` resolves to [`FieldValue::is_unset`] when the
/// value's type implements it, and to `false` otherwise.
#[doc(hidden)]
pub mod __private {
    use super::FieldValue;

    pub struct Probe<'a, T: ?Sized>(pub &'a T);

    pub trait ViaFieldValue {
        fn is_unset(&self) -> bool;
    }

    impl<T: FieldValue + ?Sized> ViaFieldValue for Probe<'_, T> {
        fn is_unset(&self) -> bool {
            FieldValue::is_unset(self.0)
        }
    }

    pub trait ViaNeverUnset {
        fn is_unset(&self) -> bool;
    }

    impl<T: ?Sized> ViaNeverUnset for &Probe<'_, T> {
        fn is_unset(&self) -> bool {
            false
        }
    }
}

/// A required field: its name and a function reporting whether it is unset.
pub struct RequiredField<M> {
    name: &'static str,
    is_unset: fn(&M) -> bool,
}

impl<M> RequiredField<M> {
    /// Creates a required field entry.
    pub fn new(name: &'static str, is_unset: fn(&M) -> bool) -> Self {
        Self { name, is_unset }
    }

    /// Returns the field name used in validation messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if the field is unset on `record`.
    pub fn is_unset(&self, record: &M) -> bool {
        (self.is_unset)(record)
    }
}

impl<M> fmt::Debug for RequiredField<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RequiredField").field(&self.name).finish()
    }
}

/// A default value: the field name and a function that writes the default onto a record.
///
/// The setter overwrites the field unconditionally.
pub struct DefaultValue<M> {
    name: &'static str,
    apply: fn(&mut M),
}

impl<M> DefaultValue<M> {
    /// Creates a default value entry.
    pub fn new(name: &'static str, apply: fn(&mut M)) -> Self {
        Self { name, apply }
    }

    /// Returns the name of the field this entry writes.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Writes the default onto `record`.
    pub fn apply(&self, record: &mut M) {
        (self.apply)(record)
    }
}

impl<M> fmt::Debug for DefaultValue<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DefaultValue").field(&self.name).finish()
    }
}

/// Builds a `Vec<RequiredField<Self>>` from field names, in the order given.
///
/// Must be used inside an `impl` block for the model type, since the generated
/// accessors take `&Self`.
///
/// ```ignore
/// Schema::builder()
///     .required_fields(required_fields![username, password, email])
///     .build()
/// ```
#[macro_export]
macro_rules! required_fields {
    ($($field:ident),* $(,)?) => {
        vec![$(
            $crate::field::RequiredField::new(
                stringify!($field),
                |record: &Self| {
                    #[allow(unused_imports)]
                    use $crate::field::__private::{ViaFieldValue as _, ViaNeverUnset as _};
                    (&$crate::field::__private::Probe(&record.$field)).is_unset()
                },
            )
        ),*]
    };
}

/// Builds a `Vec<DefaultValue<Self>>` from `field => expression` pairs.
///
/// Expressions are evaluated each time the default is applied, so
/// `created_at => chrono::Utc::now()` stamps the time of the insert.
///
/// ```ignore
/// Schema::builder()
///     .default_values(default_values![roles => vec!["member".to_string()]])
///     .build()
/// ```
#[macro_export]
macro_rules! default_values {
    ($($field:ident => $value:expr),* $(,)?) => {
        vec![$(
            $crate::field::DefaultValue::new(
                stringify!($field),
                |record: &mut Self| record.$field = $value,
            )
        ),*]
    };
}
