//! # Reference Resolver Generator
//!
//! Emits `compiler::ResolveReferences` implementations. Resolution walks the
//! nested instances of a value, reads `$ref` targets through
//! `compiler::read_info_for_ref` and, where an instance is nothing more than a
//! reference, replaces it with a freshly constructed copy of the target.

use crate::domain::{
    Domain, PropertyKind, ScalarKind, TypeModel, TypeShape, POINTER_REFERENCE_TYPE, REFERENCE_KEY,
};
use crate::naming::{field_ident, oneof_enum_ident, type_ident, variant_ident};
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use std::collections::BTreeSet;

/// Emits the reference resolver of `model`.
pub fn generate_resolver(domain: &Domain, model: &TypeModel) -> TokenStream {
    let ty = type_ident(&model.name);
    let doc = format!(" Resolves references found inside {} objects.", model.name);
    let body = match model.shape() {
        TypeShape::StringArray | TypeShape::Blob | TypeShape::ScalarUnion => TokenStream::new(),
        TypeShape::ItemArray => {
            let field = field_ident(domain.version.item_array_element());
            quote! {
                for item in self.#field.iter_mut() {
                    if let Err(err) = compiler::ResolveReferences::resolve_references(item, root) {
                        errors.push(err);
                    }
                }
            }
        }
        TypeShape::OneOf => oneof_body(domain, model),
        TypeShape::Object => object_body(domain, model),
    };
    quote! {
        impl compiler::ResolveReferences for #ty {
            #[doc = #doc]
            fn resolve_references(&mut self, root: &str) -> Result<Option<compiler::Node>, compiler::Error> {
                let mut errors: Vec<compiler::Error> = Vec::new();
                #body
                match compiler::new_error_group_or_none(errors) {
                    Some(error) => Err(error),
                    None => Ok(None),
                }
            }
        }
    }
}

/// Reconstructs `self` from the node bound to `node` and resolves the result in
/// its place. A target that does not construct leaves `self` untouched.
fn replace_if_valid(node: TokenStream) -> TokenStream {
    quote! {
        if let Ok(replacement) = Self::new(#node, &compiler::Context::new("$ref", None)) {
            *self = replacement;
            return compiler::ResolveReferences::resolve_references(self, root);
        }
    }
}

/// Reconstructs `self` from `info`, failing with the construction error.
fn replace_or_fail(info: TokenStream) -> TokenStream {
    quote! {
        let replacement = match Self::new(#info, &compiler::Context::new("$ref", None)) {
            Ok(replacement) => replacement,
            Err(rejected) => return Err(rejected.error),
        };
        *self = replacement;
        return compiler::ResolveReferences::resolve_references(self, root);
    }
}

fn oneof_body(domain: &Domain, model: &TypeModel) -> TokenStream {
    let oneof = oneof_enum_ident(&model.name);
    let mut seen = BTreeSet::new();
    let mut arms = TokenStream::new();
    for property in &model.properties {
        if !domain.is_alternative(model, property) {
            continue;
        }
        let PropertyKind::Nested(target) = domain.property_kind(property) else {
            continue;
        };
        let Some(variant) = variant_ident(domain, property) else {
            continue;
        };
        if !seen.insert(variant.to_string()) {
            continue;
        }
        let arm = if target.name == POINTER_REFERENCE_TYPE {
            let replacement = replace_or_fail(quote! { &info });
            // The wrapper stays marked while it is rebuilt from the target.
            let (reference, active) = match reference_field(domain, target) {
                Some(field) => (
                    quote! { let reference = p.#field.clone(); },
                    quote! { let _active = compiler::enter_reference(root, &reference)?; },
                ),
                None => (TokenStream::new(), TokenStream::new()),
            };
            quote! {
                Some(#oneof::#variant(p)) => {
                    #reference
                    if let Some(info) = compiler::ResolveReferences::resolve_references(&mut **p, root)? {
                        #active
                        #replacement
                    }
                }
            }
        } else {
            quote! {
                Some(#oneof::#variant(p)) => {
                    compiler::ResolveReferences::resolve_references(&mut **p, root)?;
                }
            }
        };
        arms.extend(arm);
    }
    quote! {
        match self.oneof.as_mut() {
            #arms
            _ => {}
        }
    }
}

/// The field holding a singular string `$ref`, if `model` has one.
fn reference_field(domain: &Domain, model: &TypeModel) -> Option<Ident> {
    model
        .reference_property()
        .filter(|property| {
            !property.repeated
                && matches!(
                    domain.property_kind(property),
                    PropertyKind::Scalar(ScalarKind::String)
                )
        })
        .map(|property| field_ident(&property.name))
}

fn object_body(domain: &Domain, model: &TypeModel) -> TokenStream {
    let mut body = TokenStream::new();

    if let Some(field) = reference_field(domain, model) {
        // A reference alongside other properties stands for the whole object.
        let replacement = if model.properties.len() > 1 {
            let replace = replace_if_valid(quote! { node });
            quote! {
                if let Some(node) = &info {
                    #replace
                }
            }
        } else {
            TokenStream::new()
        };
        body.extend(quote! {
            if !self.#field.is_empty() {
                let _active = compiler::enter_reference(root, &self.#field)?;
                let info = compiler::read_info_for_ref(root, &self.#field)?;
                #replacement
                return Ok(info);
            }
        });
    }

    for property in &model.properties {
        if property.name == REFERENCE_KEY {
            continue;
        }
        let field = field_ident(&property.name);
        match domain.property_kind(property) {
            PropertyKind::Nested(_) if property.repeated => body.extend(quote! {
                for item in self.#field.iter_mut() {
                    if let Err(err) = compiler::ResolveReferences::resolve_references(item, root) {
                        errors.push(err);
                    }
                }
            }),
            PropertyKind::Nested(_) => body.extend(quote! {
                if let Some(v) = self.#field.as_mut() {
                    if let Err(err) = compiler::ResolveReferences::resolve_references(&mut **v, root) {
                        errors.push(err);
                    }
                }
            }),
            PropertyKind::Map { value: Some(_), .. } => body.extend(quote! {
                for pair in self.#field.iter_mut() {
                    if let Some(v) = pair.value.as_mut() {
                        if let Err(err) = compiler::ResolveReferences::resolve_references(&mut **v, root) {
                            errors.push(err);
                        }
                    }
                }
            }),
            PropertyKind::Scalar(_) | PropertyKind::Map { value: None, .. } | PropertyKind::Unknown => {}
        }
    }
    body
}
