//! # Constructor Generator
//!
//! Emits `T::new(node, context)` for every type: the code that turns a generic
//! document node into a typed instance while collecting located errors.
//!
//! Every constructor follows the same frame: an `errors` accumulator, a default
//! instance `x`, a body chosen by the type's shape, and `compiler::finish` at
//! the end so that a partially filled instance is returned alongside errors.

use crate::domain::{Domain, PropertyKind, PropertyModel, ScalarKind, TypeModel, TypeShape};
use crate::naming::{field_ident, oneof_enum_ident, type_ident, variant_ident};
use crate::patterns::PatternAllocator;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Emits the constructor of `model`, allocating key patterns from `patterns`.
pub fn generate_constructor(
    domain: &Domain,
    model: &TypeModel,
    patterns: &mut PatternAllocator,
) -> TokenStream {
    let ty = type_ident(&model.name);
    let doc = format!(
        " Creates an object of type {} if possible, returning an error if not.",
        model.name
    );
    let body = match model.shape() {
        TypeShape::StringArray => string_array_body(),
        TypeShape::ItemArray => item_array_body(domain),
        TypeShape::Blob => blob_body(),
        TypeShape::ScalarUnion => scalar_union_body(model),
        TypeShape::OneOf | TypeShape::Object => object_body(domain, model, patterns),
    };
    quote! {
        impl #ty {
            #[doc = #doc]
            pub fn new(node: &compiler::Node, context: &compiler::Context) -> compiler::Built<Self> {
                let mut errors: Vec<compiler::Error> = Vec::new();
                #body
                compiler::finish(x, errors)
            }
        }
    }
}

fn string_array_body() -> TokenStream {
    quote! {
        let mut x = Self::default();
        match node {
            compiler::Node::Scalar { value, .. } => x.value.push(value.clone()),
            compiler::Node::Sequence(items) => {
                for item in items {
                    match item {
                        compiler::Node::Scalar { value, .. } => x.value.push(value.clone()),
                        _ => {
                            let message = format!(
                                "has unexpected value for string array element: {}",
                                compiler::display(item)
                            );
                            errors.push(compiler::Error::new(context, message));
                        }
                    }
                }
            }
            compiler::Node::Mapping(_) => {
                let message = format!(
                    "has unexpected value for string array: {}",
                    compiler::display(node)
                );
                errors.push(compiler::Error::new(context, message));
            }
        }
    }
}

fn item_array_body(domain: &Domain) -> TokenStream {
    let element = domain.version.item_array_element();
    let element_ty = type_ident(element);
    let field = field_ident(element);
    quote! {
        let mut x = Self::default();
        match compiler::unpack_map(node) {
            Some(m) => match #element_ty::new(m, &compiler::Context::new("<array>", Some(context))) {
                Ok(y) => x.#field.push(y),
                Err(rejected) => return compiler::fatal(rejected.error),
            },
            None => {
                let message = format!(
                    "has unexpected value for item array: {}",
                    compiler::display(node)
                );
                errors.push(compiler::Error::new(context, message));
            }
        }
    }
}

fn blob_body() -> TokenStream {
    quote! {
        let mut x = Self::default();
        x.yaml = compiler::marshal(node);
    }
}

fn scalar_union_body(model: &TypeModel) -> TokenStream {
    let oneof = oneof_enum_ident(&model.name);
    quote! {
        let mut x = Self::default();
        let mut matched = false;
        match node.tag() {
            compiler::Tag::Bool => {
                if let Some(v) = compiler::bool_for_scalar_node(node) {
                    x.oneof = Some(#oneof::Boolean(v));
                    matched = true;
                }
            }
            compiler::Tag::Str => {
                if let Some(v) = compiler::string_for_scalar_node(node) {
                    x.oneof = Some(#oneof::String(v));
                    matched = true;
                }
            }
            compiler::Tag::Float => {
                if let Some(v) = compiler::float_for_scalar_node(node) {
                    x.oneof = Some(#oneof::Number(v));
                    matched = true;
                }
            }
            compiler::Tag::Int => {
                if let Some(v) = compiler::int_for_scalar_node(node) {
                    x.oneof = Some(#oneof::Number(v as f64));
                    matched = true;
                }
            }
            _ => {}
        }
        if matched {
            errors.clear();
        }
    }
}

fn object_body(domain: &Domain, model: &TypeModel, patterns: &mut PatternAllocator) -> TokenStream {
    let one_of = model.shape() == TypeShape::OneOf;
    let unpack_at_top = !one_of || !model.required.is_empty();

    let mut checks = TokenStream::new();
    if !model.required.is_empty() {
        checks.extend(required_check(model));
    }
    // Keys of a oneof wrapper belong to its alternatives.
    if !model.open && !one_of {
        checks.extend(allowed_keys_check(model, patterns));
    }

    let mut blocks = TokenStream::new();
    for (index, property) in model.properties.iter().enumerate() {
        let value = format_ident!("v{}", index + 1);
        let Some(block) = property_block(domain, model, property, &value, patterns) else {
            continue;
        };
        if block.needs_map && !unpack_at_top {
            let code = block.code;
            blocks.extend(quote! {
                if let Some(m) = compiler::unpack_map(node) {
                    #code
                }
            });
        } else {
            blocks.extend(block.code);
        }
    }

    let matched = if one_of {
        quote! { let mut matched = false; }
    } else {
        TokenStream::new()
    };
    let main = if unpack_at_top {
        quote! {
            if let Some(m) = compiler::unpack_map(node) {
                #checks
                #blocks
            } else {
                let message = format!("has unexpected value: {}", compiler::display(node));
                errors.push(compiler::Error::new(context, message));
            }
        }
    } else {
        blocks
    };
    let tail = if one_of {
        let name = &model.name;
        quote! {
            if matched {
                errors.clear();
            } else {
                let message = format!("contains an invalid {}", #name);
                errors = vec![compiler::Error::new(context, message)];
            }
        }
    } else {
        TokenStream::new()
    };
    quote! {
        let mut x = Self::default();
        #matched
        #main
        #tail
    }
}

fn required_check(model: &TypeModel) -> TokenStream {
    let required = model.required.iter().map(String::as_str);
    quote! {
        let missing_keys = compiler::missing_keys_in_map(m, &[#(#required),*]);
        if !missing_keys.is_empty() {
            let message = format!(
                "is missing required {}: {}",
                compiler::plural_properties(missing_keys.len()),
                missing_keys.join(", ")
            );
            errors.push(compiler::Error::new(context, message));
        }
    }
}

fn allowed_keys_check(model: &TypeModel, patterns: &mut PatternAllocator) -> TokenStream {
    let mut allowed: Vec<&str> = model
        .properties
        .iter()
        .filter(|p| !p.implicit)
        .map(|p| p.name.as_str())
        .collect();
    allowed.sort_unstable();
    let allowed_patterns: Vec<_> = model
        .open_patterns
        .iter()
        .map(|pattern| format_ident!("{}", patterns.identifier_for(pattern)))
        .collect();
    quote! {
        let allowed_keys: &[&str] = &[#(#allowed),*];
        let allowed_patterns: &[&compiler::Pattern] = &[#(&#allowed_patterns),*];
        let invalid_keys = compiler::invalid_keys_in_map(m, allowed_keys, allowed_patterns);
        if !invalid_keys.is_empty() {
            let message = format!(
                "has invalid {}: {}",
                compiler::plural_properties(invalid_keys.len()),
                invalid_keys.join(", ")
            );
            errors.push(compiler::Error::new(context, message));
        }
    }
}

/// Code for one property, and whether it reads the unpacked mapping `m`.
struct PropertyBlock {
    code: TokenStream,
    needs_map: bool,
}

impl PropertyBlock {
    fn keyed(code: TokenStream) -> Option<Self> {
        Some(Self {
            code,
            needs_map: true,
        })
    }
}

fn property_block(
    domain: &Domain,
    model: &TypeModel,
    property: &PropertyModel,
    value: &proc_macro2::Ident,
    patterns: &mut PatternAllocator,
) -> Option<PropertyBlock> {
    let name = property.name.as_str();
    let field = field_ident(name);
    match domain.property_kind(property) {
        PropertyKind::Unknown => {
            tracing::warn!(
                ty = %model.name,
                property = name,
                property_type = %property.ty,
                "skipping property of unknown type"
            );
            None
        }
        kind if domain.is_alternative(model, property) => {
            let oneof = oneof_enum_ident(&model.name);
            let variant = variant_ident(domain, property)?;
            alternative_block(kind, name, &oneof, &variant)
        }
        PropertyKind::Scalar(kind) => {
            PropertyBlock::keyed(scalar_block(kind, property, &field, value))
        }
        PropertyKind::Nested(target) => {
            let target = type_ident(&target.name);
            let code = if property.repeated {
                quote! {
                    if let Some(#value) = compiler::map_value_for_key(m, #name) {
                        if let Some(items) = compiler::sequence_node_for_node(#value) {
                            for item in items {
                                let (y, err) = compiler::split(#target::new(
                                    item,
                                    &compiler::Context::new(#name, Some(context)),
                                ));
                                errors.extend(err);
                                x.#field.extend(y);
                            }
                        }
                    }
                }
            } else {
                quote! {
                    if let Some(#value) = compiler::map_value_for_key(m, #name) {
                        let (y, err) = compiler::split(#target::new(
                            #value,
                            &compiler::Context::new(#name, Some(context)),
                        ));
                        x.#field = y.map(Box::new);
                        errors.extend(err);
                    }
                }
            };
            PropertyBlock::keyed(code)
        }
        PropertyKind::Map { pair, value: entry } => {
            PropertyBlock::keyed(map_block(property, &field, pair, entry, patterns))
        }
    }
}

fn alternative_block(
    kind: PropertyKind<'_>,
    name: &str,
    oneof: &proc_macro2::Ident,
    variant: &proc_macro2::Ident,
) -> Option<PropertyBlock> {
    match kind {
        PropertyKind::Nested(target) => {
            let target = type_ident(&target.name);
            PropertyBlock::keyed(quote! {
                match #target::new(m, &compiler::Context::new(#name, Some(context))) {
                    Ok(t) => {
                        x.oneof = Some(#oneof::#variant(Box::new(t)));
                        matched = true;
                    }
                    Err(rejected) => errors.push(rejected.error),
                }
            })
        }
        PropertyKind::Scalar(kind) => {
            let coerce = match kind {
                ScalarKind::String => quote! { compiler::string_for_scalar_node(node) },
                ScalarKind::Integer => quote! { compiler::int_for_scalar_node(node) },
                ScalarKind::Float => quote! { compiler::float_for_scalar_node(node) },
                ScalarKind::Boolean => quote! { compiler::bool_for_scalar_node(node) },
            };
            Some(PropertyBlock {
                code: quote! {
                    if let Some(value) = #coerce {
                        x.oneof = Some(#oneof::#variant(value));
                        matched = true;
                    }
                },
                needs_map: false,
            })
        }
        PropertyKind::Map { .. } | PropertyKind::Unknown => None,
    }
}

fn unexpected_value(name: &str, value: &proc_macro2::Ident) -> TokenStream {
    quote! {
        let message = format!(
            "has unexpected value for {}: {}",
            #name,
            compiler::display(#value)
        );
        errors.push(compiler::Error::new(context, message));
    }
}

fn scalar_block(
    kind: ScalarKind,
    property: &PropertyModel,
    field: &proc_macro2::Ident,
    value: &proc_macro2::Ident,
) -> TokenStream {
    let name = property.name.as_str();
    let unexpected = unexpected_value(name, value);
    let enum_values = property
        .string_enum_values
        .as_deref()
        .filter(|values| !values.is_empty() && kind == ScalarKind::String);
    let assign = match (kind, property.repeated) {
        (ScalarKind::String, false) => {
            let enum_check = enum_values.map(|values| {
                quote! {
                    if !compiler::string_array_contains_value(&[#(#values),*], &x.#field) {
                        #unexpected
                    }
                }
            });
            quote! {
                match compiler::string_for_scalar_node(#value) {
                    Some(value) => {
                        x.#field = value;
                        #enum_check
                    }
                    None => {
                        #unexpected
                    }
                }
            }
        }
        (ScalarKind::String, true) => {
            let enum_check = enum_values.map(|values| {
                quote! {
                    if !compiler::string_array_contains_values(&[#(#values),*], &x.#field) {
                        #unexpected
                    }
                }
            });
            quote! {
                match compiler::sequence_node_for_node(#value) {
                    Some(items) => {
                        x.#field = compiler::string_array_for_sequence_node(items);
                        #enum_check
                    }
                    None => {
                        #unexpected
                    }
                }
            }
        }
        (kind, false) => {
            let coerce = match kind {
                ScalarKind::Integer => quote! { compiler::int_for_scalar_node },
                ScalarKind::Float => quote! { compiler::float_for_scalar_node },
                _ => quote! { compiler::bool_for_scalar_node },
            };
            quote! {
                match #coerce(#value) {
                    Some(value) => x.#field = value,
                    None => {
                        #unexpected
                    }
                }
            }
        }
        (kind, true) => {
            let coerce = match kind {
                ScalarKind::Integer => quote! { compiler::int_array_for_sequence_node },
                ScalarKind::Float => quote! { compiler::float_array_for_sequence_node },
                _ => quote! { compiler::bool_array_for_sequence_node },
            };
            quote! {
                match compiler::sequence_node_for_node(#value).and_then(#coerce) {
                    Some(values) => x.#field = values,
                    None => {
                        #unexpected
                    }
                }
            }
        }
    };
    quote! {
        if let Some(#value) = compiler::map_value_for_key(m, #name) {
            #assign
        }
    }
}

fn map_block(
    property: &PropertyModel,
    field: &proc_macro2::Ident,
    pair: &str,
    entry: Option<&TypeModel>,
    patterns: &mut PatternAllocator,
) -> TokenStream {
    let key = format_ident!("k");
    let pair_ty = type_ident(pair);
    let value_code = match entry {
        None => quote! {
            pair.value = compiler::string_for_scalar_node(value).unwrap_or_default();
        },
        Some(target) => {
            let target_ty = type_ident(&target.name);
            let construct = quote! {
                let (y, err) = compiler::split(#target_ty::new(
                    value,
                    &compiler::Context::new(k.as_str(), Some(context)),
                ));
                pair.value = y.map(Box::new);
                errors.extend(err);
            };
            if target.shape() == TypeShape::Blob {
                quote! {
                    match compiler::call_extension(context, value, &k) {
                        Some(Ok(extension)) => {
                            let mut result = #target_ty::default();
                            result.value = Some(extension);
                            result.yaml = compiler::marshal(value);
                            pair.value = Some(Box::new(result));
                        }
                        Some(Err(err)) => errors.push(err),
                        None => {
                            #construct
                        }
                    }
                }
            } else {
                construct
            }
        }
    };
    let entry_code = quote! {
        let mut pair = #pair_ty::default();
        pair.name = k.clone();
        #value_code
        x.#field.push(pair);
    };
    let matching = match property.pattern.as_deref() {
        None => entry_code,
        Some(pattern) => {
            let test = match patterns.inline_expression(pattern, &key) {
                Some(test) => test,
                None => {
                    let ident = format_ident!("{}", patterns.identifier_for(pattern));
                    quote! { #ident.is_match(&#key) }
                }
            };
            quote! {
                if #test {
                    #entry_code
                }
            }
        }
    };
    quote! {
        for (key, value) in compiler::map_pairs(m) {
            if let Some(#key) = compiler::string_for_scalar_node(key) {
                #matching
            }
        }
    }
}
