//! # Type Declarations
//!
//! Emits the struct (and, for oneof types, enum) declarations that the
//! constructors, resolvers and serializers operate on. Declarations are optional
//! output: units can instead be compiled against hand-written types with the
//! same field layout.

use crate::domain::{Domain, PropertyKind, PropertyModel, ScalarKind, TypeModel, TypeShape};
use crate::naming::{field_ident, oneof_enum_ident, type_ident, variant_ident};
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::BTreeSet;

/// Emits the declaration of `model`.
pub fn generate_declaration(domain: &Domain, model: &TypeModel) -> TokenStream {
    let ty = type_ident(&model.name);
    let doc = match model.description.as_deref() {
        Some(description) => format!(" {}", description),
        None => format!(" The `{}` type.", model.name),
    };
    let fields = match model.shape() {
        TypeShape::StringArray => quote! { pub value: Vec<String>, },
        TypeShape::ItemArray => {
            let element = domain.version.item_array_element();
            let field = field_ident(element);
            let element_ty = type_ident(element);
            quote! { pub #field: Vec<#element_ty>, }
        }
        TypeShape::Blob => quote! {
            pub value: Option<compiler::ExtensionValue>,
            pub yaml: String,
        },
        TypeShape::ScalarUnion | TypeShape::OneOf => {
            let oneof = oneof_enum_ident(&model.name);
            let mut fields = quote! { pub oneof: Option<#oneof>, };
            for property in &model.properties {
                if !domain.is_alternative(model, property) {
                    fields.extend(field(domain, property));
                }
            }
            fields
        }
        TypeShape::Object => model
            .properties
            .iter()
            .map(|property| field(domain, property))
            .collect(),
    };
    let oneof = match model.shape() {
        TypeShape::ScalarUnion => Some(scalar_union_enum(model)),
        TypeShape::OneOf => Some(oneof_enum(domain, model)),
        _ => None,
    };
    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct #ty {
            #fields
        }
        #oneof
    }
}

fn scalar_type(kind: ScalarKind) -> TokenStream {
    match kind {
        ScalarKind::String => quote! { String },
        ScalarKind::Integer => quote! { i64 },
        ScalarKind::Float => quote! { f64 },
        ScalarKind::Boolean => quote! { bool },
    }
}

fn field(domain: &Domain, property: &PropertyModel) -> TokenStream {
    let ty = match domain.property_kind(property) {
        PropertyKind::Scalar(kind) => {
            let scalar = scalar_type(kind);
            if property.repeated {
                quote! { Vec<#scalar> }
            } else {
                scalar
            }
        }
        PropertyKind::Nested(target) => {
            let target = type_ident(&target.name);
            if property.repeated {
                quote! { Vec<#target> }
            } else {
                quote! { Option<Box<#target>> }
            }
        }
        PropertyKind::Map { pair, .. } => {
            let pair = type_ident(pair);
            quote! { Vec<#pair> }
        }
        PropertyKind::Unknown => return TokenStream::new(),
    };
    let name = field_ident(&property.name);
    let doc = property
        .description
        .as_deref()
        .map(|description| format!(" {}", description));
    let doc = doc.map(|doc| quote! { #[doc = #doc] });
    quote! {
        #doc
        pub #name: #ty,
    }
}

fn scalar_union_enum(model: &TypeModel) -> TokenStream {
    let oneof = oneof_enum_ident(&model.name);
    let doc = format!(" The value held by a `{}`.", model.name);
    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, PartialEq)]
        pub enum #oneof {
            Boolean(bool),
            String(String),
            Number(f64),
        }
    }
}

fn oneof_enum(domain: &Domain, model: &TypeModel) -> TokenStream {
    let oneof = oneof_enum_ident(&model.name);
    let doc = format!(" The alternative held by a `{}`.", model.name);
    let mut seen = BTreeSet::new();
    let mut variants = TokenStream::new();
    for property in &model.properties {
        if !domain.is_alternative(model, property) {
            continue;
        }
        let Some(variant) = variant_ident(domain, property) else {
            continue;
        };
        if !seen.insert(variant.to_string()) {
            continue;
        }
        let payload = match domain.property_kind(property) {
            PropertyKind::Scalar(kind) => scalar_type(kind),
            PropertyKind::Nested(target) => {
                let target = type_ident(&target.name);
                quote! { Box<#target> }
            }
            PropertyKind::Map { .. } | PropertyKind::Unknown => continue,
        };
        variants.extend(quote! { #variant(#payload), });
    }
    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, PartialEq)]
        pub enum #oneof {
            #variants
        }
    }
}
