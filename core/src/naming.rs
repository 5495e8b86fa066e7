//! # Identifier Naming
//!
//! Maps schema names to Rust identifiers in emitted code.

use crate::domain::{Domain, PropertyKind, PropertyModel, ScalarKind};
use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Ident, Span};
use quote::format_ident;

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "try", "type", "unsafe", "use", "where", "while", "yield",
];

fn sanitize(name: String) -> String {
    let name = if name.is_empty() {
        "_".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    };
    if KEYWORDS.contains(&name.as_str()) {
        format!("{}_", name)
    } else {
        name
    }
}

/// The struct name of a type.
pub fn type_ident(name: &str) -> Ident {
    Ident::new(&sanitize(name.to_upper_camel_case()), Span::call_site())
}

/// The field name of a property: `$ref` becomes `x_ref`, `allOf` becomes `all_of`.
pub fn field_name(property: &str) -> String {
    let snake = match property.strip_prefix('$') {
        Some(rest) => format!("x_{}", rest.to_snake_case()),
        None => property.to_snake_case(),
    };
    sanitize(snake)
}

/// The field identifier of a property.
pub fn field_ident(property: &str) -> Ident {
    Ident::new(&field_name(property), Span::call_site())
}

/// The enum holding the active alternative of a oneof type.
pub fn oneof_enum_ident(type_name: &str) -> Ident {
    format_ident!("{}Oneof", type_ident(type_name))
}

/// The variant name for a scalar alternative.
pub fn scalar_variant_ident(kind: ScalarKind) -> Ident {
    let name = match kind {
        ScalarKind::String => "String",
        ScalarKind::Integer => "Integer",
        ScalarKind::Float => "Number",
        ScalarKind::Boolean => "Boolean",
    };
    Ident::new(name, Span::call_site())
}

/// The variant name for a oneof alternative, or `None` for properties that
/// cannot be an alternative.
pub fn variant_ident(domain: &Domain, property: &PropertyModel) -> Option<Ident> {
    match domain.property_kind(property) {
        PropertyKind::Scalar(kind) => Some(scalar_variant_ident(kind)),
        PropertyKind::Nested(model) => Some(type_ident(&model.name)),
        PropertyKind::Map { .. } | PropertyKind::Unknown => None,
    }
}

/// The identifier of the `index`-th allocated key pattern.
pub fn pattern_ident(prefix: &str, index: usize) -> String {
    format!("{}{}", prefix, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_names() {
        assert_eq!(field_name("$ref"), "x_ref");
        assert_eq!(field_name("$schema"), "x_schema");
        assert_eq!(field_name("allOf"), "all_of");
        assert_eq!(field_name("type"), "type_");
        assert_eq!(field_name("in"), "in_");
        assert_eq!(field_name("200"), "_200");
        assert_eq!(field_name("x-logo"), "x_logo");
        assert_eq!(field_name("schemaOrReference"), "schema_or_reference");
    }

    #[test]
    fn test_type_idents() {
        assert_eq!(type_ident("SchemaOrReference").to_string(), "SchemaOrReference");
        assert_eq!(type_ident("ItemsItem").to_string(), "ItemsItem");
        assert_eq!(oneof_enum_ident("ParametersItem").to_string(), "ParametersItemOneof");
    }

    #[test]
    fn test_scalar_variants() {
        assert_eq!(scalar_variant_ident(ScalarKind::Float).to_string(), "Number");
        assert_eq!(scalar_variant_ident(ScalarKind::Boolean).to_string(), "Boolean");
    }
}
