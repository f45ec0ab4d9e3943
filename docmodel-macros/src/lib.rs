//! Procedural macros for the docmodel project.
//!
//! `#[derive(Model)]` implements `docmodel::model::Model` for a struct with named
//! fields and builds its schema from `#[model(...)]` attributes. Every name in the
//! generated schema is a real field access, so a typo is a compile error.
//!
//! ```ignore
//! #[derive(Debug, Default, Serialize, Deserialize, Model)]
//! #[model(collection = "users", validator = username_length, indexes = user_indexes)]
//! pub struct User {
//!     #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
//!     pub id: Option<ObjectId>,
//!     #[model(required)]
//!     pub username: String,
//!     #[model(default = vec!["member".to_string()])]
//!     pub roles: Vec<String>,
//! }
//! ```
//!
//! Struct attributes:
//! - `collection = "name"` (required)
//! - `validator = path` (repeatable), a `fn(&Self) -> Outcome`
//! - `indexes = path`, a `fn() -> Vec<IndexSpec>`
//!
//! Field attributes:
//! - `id` marks the identity field; without it a field named `id` is used. Saves
//!   key the stored document's `_id` by this field whatever serde calls it
//! - `required` adds the field to the required list, in declaration order; any
//!   field type is accepted, types without a `FieldValue` impl are never unset
//! - `default = expr` writes `expr` into the field before the first insert

#[allow(unused_extern_crates)]
extern crate self as docmodel_macros;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Expr, Fields, Ident, LitStr, Path, parse_macro_input, spanned::Spanned};

#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_model(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct ModelAttrs {
    collection: Option<LitStr>,
    validators: Vec<Path>,
    indexes: Option<Path>,
}

#[derive(Default)]
struct FieldAttrs {
    id: bool,
    required: bool,
    default: Option<Expr>,
}

fn parse_model_attrs(input: &DeriveInput) -> syn::Result<ModelAttrs> {
    let mut attrs = ModelAttrs::default();

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                attrs.collection = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("validator") {
                attrs.validators.push(meta.value()?.parse()?);
            } else if meta.path.is_ident("indexes") {
                attrs.indexes = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("expected `collection`, `validator` or `indexes`"));
            }

            Ok(())
        })?;
    }

    Ok(attrs)
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                attrs.id = true;
            } else if meta.path.is_ident("required") {
                attrs.required = true;
            } else if meta.path.is_ident("default") {
                attrs.default = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("expected `id`, `required` or `default`"));
            }

            Ok(())
        })?;
    }

    Ok(attrs)
}

fn expand_model(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let model_attrs = parse_model_attrs(&input)?;

    let collection = model_attrs.collection.ok_or_else(|| {
        syn::Error::new(name.span(), "missing `#[model(collection = \"...\")]`")
    })?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(syn::Error::new(name.span(), "Model requires named fields")),
        },
        _ => return Err(syn::Error::new(name.span(), "Model can only be derived for structs")),
    };

    let mut id_field: Option<&Ident> = None;
    let mut id_from_attr = false;
    let mut required = Vec::new();
    let mut defaults = Vec::new();

    for field in fields {
        let attrs = parse_field_attrs(field)?;
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        if attrs.id {
            if id_from_attr {
                return Err(syn::Error::new(field.span(), "only one field can be `#[model(id)]`"));
            }
            id_field = Some(ident);
            id_from_attr = true;
        } else if ident == "id" && id_field.is_none() {
            id_field = Some(ident);
        }

        let field_name = ident.to_string();

        if attrs.required {
            required.push(quote! {
                .required(::docmodel::field::RequiredField::new(
                    #field_name,
                    |record: &Self| {
                        #[allow(unused_imports)]
                        use ::docmodel::field::__private::{ViaFieldValue as _, ViaNeverUnset as _};
                        (&::docmodel::field::__private::Probe(&record.#ident)).is_unset()
                    },
                ))
            });
        }

        if let Some(value) = attrs.default {
            defaults.push(quote! {
                .default_value(::docmodel::field::DefaultValue::new(
                    #field_name,
                    |record: &mut Self| record.#ident = #value,
                ))
            });
        }
    }

    let id_field = id_field.ok_or_else(|| {
        syn::Error::new(name.span(), "Model needs an `id` field or a field marked `#[model(id)]`")
    })?;

    let validators = model_attrs.validators.iter().map(|path| quote! { .validator(#path) });
    let indexes = model_attrs.indexes.iter().map(|path| quote! { .indexes(#path()) });

    Ok(quote! {
        impl #impl_generics ::docmodel::model::Model for #name #ty_generics #where_clause {
            fn collection_name() -> &'static str {
                #collection
            }

            fn id(&self) -> ::core::option::Option<&::docmodel::bson::oid::ObjectId> {
                self.#id_field.as_ref()
            }

            fn id_mut(&mut self) -> ::core::option::Option<&mut ::core::option::Option<::docmodel::bson::oid::ObjectId>> {
                ::core::option::Option::Some(&mut self.#id_field)
            }

            fn schema() -> ::docmodel::schema::Schema<Self> {
                ::docmodel::schema::Schema::builder()
                    #(#required)*
                    #(#validators)*
                    #(#defaults)*
                    #(#indexes)*
                    .build()
            }
        }
    })
}
