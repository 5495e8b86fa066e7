//! # Serializer Generator
//!
//! Emits `compiler::ToRawInfo` implementations that rebuild a generic document
//! node from a typed instance. Optional properties holding their zero value are
//! left out, so compiling the output again yields an equal instance.

use crate::domain::{Domain, PropertyKind, PropertyModel, ScalarKind, TypeModel, TypeShape};
use crate::naming::{field_ident, oneof_enum_ident, type_ident, variant_ident};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use std::collections::BTreeSet;

/// Emits the serializer of `model`.
pub fn generate_serializer(domain: &Domain, model: &TypeModel) -> TokenStream {
    let ty = type_ident(&model.name);
    let doc = format!(
        " Returns a document node representing the content of a {} object.",
        model.name
    );
    let body = match model.shape() {
        TypeShape::Blob => quote! {
            compiler::unmarshal(&self.yaml).unwrap_or_else(compiler::new_null_node)
        },
        TypeShape::StringArray => quote! {
            compiler::new_sequence_node_for_string_array(&self.value)
        },
        TypeShape::ItemArray => {
            let field = field_ident(domain.version.item_array_element());
            quote! {
                compiler::Node::Sequence(self.#field.iter().map(compiler::ToRawInfo::to_raw_info).collect())
            }
        }
        TypeShape::ScalarUnion => scalar_union_body(model),
        TypeShape::OneOf => oneof_body(domain, model),
        TypeShape::Object => object_body(domain, model),
    };
    quote! {
        impl compiler::ToRawInfo for #ty {
            #[doc = #doc]
            fn to_raw_info(&self) -> compiler::Node {
                #body
            }
        }
    }
}

fn scalar_union_body(model: &TypeModel) -> TokenStream {
    let oneof = oneof_enum_ident(&model.name);
    quote! {
        match &self.oneof {
            Some(#oneof::Boolean(v)) => compiler::new_scalar_node_for_bool(*v),
            Some(#oneof::String(v)) => compiler::new_scalar_node_for_string(v),
            Some(#oneof::Number(v)) => compiler::new_scalar_node_for_float(*v),
            None => compiler::new_null_node(),
        }
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
        let Some(variant) = variant_ident(domain, property) else {
            continue;
        };
        if !seen.insert(variant.to_string()) {
            continue;
        }
        let value = match domain.property_kind(property) {
            PropertyKind::Scalar(kind) => scalar_node(kind, quote! { *v }, quote! { v }),
            _ => quote! { compiler::ToRawInfo::to_raw_info(&**v) },
        };
        arms.extend(quote! {
            Some(#oneof::#variant(v)) => #value,
        });
    }
    quote! {
        match &self.oneof {
            #arms
            None => compiler::new_null_node(),
        }
    }
}

/// A scalar node for a value read by copy (`copied`) or by reference (`borrowed`).
fn scalar_node(kind: ScalarKind, copied: TokenStream, borrowed: TokenStream) -> TokenStream {
    match kind {
        ScalarKind::String => quote! { compiler::new_scalar_node_for_string(#borrowed) },
        ScalarKind::Integer => quote! { compiler::new_scalar_node_for_int(#copied) },
        ScalarKind::Float => quote! { compiler::new_scalar_node_for_float(#copied) },
        ScalarKind::Boolean => quote! { compiler::new_scalar_node_for_bool(#copied) },
    }
}

fn object_body(domain: &Domain, model: &TypeModel) -> TokenStream {
    let mut entries = TokenStream::new();
    for property in &model.properties {
        entries.extend(property_entry(domain, model, property));
    }
    quote! {
        let mut info: Vec<(compiler::Node, compiler::Node)> = Vec::new();
        #entries
        compiler::Node::Mapping(info)
    }
}

fn property_entry(domain: &Domain, model: &TypeModel, property: &PropertyModel) -> TokenStream {
    let name = property.name.as_str();
    let field = field_ident(name);
    let required = model.is_required(name);
    let key = quote! { compiler::new_scalar_node_for_string(#name) };
    match domain.property_kind(property) {
        PropertyKind::Scalar(kind) if property.repeated => {
            let node = match kind {
                ScalarKind::String => quote! { compiler::new_sequence_node_for_string_array(&self.#field) },
                ScalarKind::Integer => quote! { compiler::new_sequence_node_for_int_array(&self.#field) },
                ScalarKind::Float => quote! { compiler::new_sequence_node_for_float_array(&self.#field) },
                ScalarKind::Boolean => quote! { compiler::new_sequence_node_for_bool_array(&self.#field) },
            };
            guarded(required, quote! { !self.#field.is_empty() }, quote! { info.push((#key, #node)); })
        }
        PropertyKind::Scalar(kind) => {
            let node = scalar_node(kind, quote! { self.#field }, quote! { &self.#field });
            let condition = match kind {
                ScalarKind::String => quote! { !self.#field.is_empty() },
                ScalarKind::Integer => quote! { self.#field != 0 },
                ScalarKind::Float => quote! { self.#field != 0.0 },
                ScalarKind::Boolean => quote! { self.#field },
            };
            guarded(required, condition, quote! { info.push((#key, #node)); })
        }
        PropertyKind::Nested(_) if property.repeated => guarded(
            required,
            quote! { !self.#field.is_empty() },
            quote! {
                info.push((
                    #key,
                    compiler::Node::Sequence(self.#field.iter().map(compiler::ToRawInfo::to_raw_info).collect()),
                ));
            },
        ),
        // Pair values are inlined by the owning map; only raw values are kept.
        PropertyKind::Nested(target)
            if model.is_pair && name == "value" && target.shape() != TypeShape::Blob =>
        {
            TokenStream::new()
        }
        PropertyKind::Nested(target) => {
            let node = nested_node(domain, target, &format_ident!("v"));
            let absent = if target.shape() == TypeShape::Object {
                quote! { compiler::Node::Mapping(Vec::new()) }
            } else {
                quote! { compiler::new_null_node() }
            };
            if required {
                quote! {
                    info.push((
                        #key,
                        match &self.#field {
                            Some(v) => #node,
                            None => #absent,
                        },
                    ));
                }
            } else {
                quote! {
                    if let Some(v) = &self.#field {
                        info.push((#key, #node));
                    }
                }
            }
        }
        PropertyKind::Map { value, .. } => {
            let node = match value {
                None => quote! { compiler::new_scalar_node_for_string(&item.value) },
                Some(_) => quote! {
                    match &item.value {
                        Some(v) => compiler::ToRawInfo::to_raw_info(&**v),
                        None => compiler::new_null_node(),
                    }
                },
            };
            quote! {
                for item in &self.#field {
                    info.push((compiler::new_scalar_node_for_string(&item.name), #node));
                }
            }
        }
        PropertyKind::Unknown => TokenStream::new(),
    }
}

/// The node of a singular nested value bound to `v`; single-element arrays collapse.
fn nested_node(domain: &Domain, target: &TypeModel, v: &Ident) -> TokenStream {
    match target.shape() {
        TypeShape::StringArray => quote! {
            if #v.value.len() == 1 {
                compiler::new_scalar_node_for_string(&#v.value[0])
            } else {
                compiler::new_sequence_node_for_string_array(&#v.value)
            }
        },
        TypeShape::ItemArray => {
            let field = field_ident(domain.version.item_array_element());
            quote! {
                {
                    let mut items: Vec<compiler::Node> =
                        #v.#field.iter().map(compiler::ToRawInfo::to_raw_info).collect();
                    if items.len() == 1 {
                        items.remove(0)
                    } else {
                        compiler::Node::Sequence(items)
                    }
                }
            }
        }
        _ => quote! { compiler::ToRawInfo::to_raw_info(&**#v) },
    }
}

fn guarded(required: bool, condition: TokenStream, push: TokenStream) -> TokenStream {
    if required {
        push
    } else {
        quote! {
            if #condition {
                #push
            }
        }
    }
}
