#![deny(missing_docs)]

//! # CDD Compiler Runtime
//!
//! Support library for generated document compilers. Generated modules import
//! this crate as `compiler` and call into it to inspect document nodes, report
//! located errors, resolve `$ref` indirections and rebuild documents.

/// Diagnostic contexts.
pub mod context;

/// Errors and constructor outcomes.
pub mod error;

/// Extension handler hooks.
pub mod extension;

/// Node inspection and key validation.
pub mod helpers;

/// Generic document nodes.
pub mod node;

/// Lazily compiled key patterns.
pub mod pattern;

/// `$ref` reading.
pub mod reference;

pub use context::Context;
pub use error::{fatal, finish, new_error_group_or_none, split, Built, Error, Partial};
pub use extension::{call_extension, ExtensionHandler, ExtensionRegistry, ExtensionValue};
pub use helpers::{
    bool_array_for_sequence_node, bool_for_scalar_node, float_array_for_sequence_node,
    float_for_scalar_node, int_array_for_sequence_node, int_for_scalar_node, invalid_keys_in_map,
    map_pairs, map_value_for_key, missing_keys_in_map, plural_properties, sequence_node_for_node,
    string_array_contains_value, string_array_contains_values, string_array_for_sequence_node,
    string_for_scalar_node, unpack_map,
};
pub use node::{
    display, marshal, new_null_node, new_scalar_node_for_bool, new_scalar_node_for_float,
    new_scalar_node_for_int, new_scalar_node_for_string, new_sequence_node_for_bool_array,
    new_sequence_node_for_float_array, new_sequence_node_for_int_array,
    new_sequence_node_for_string_array, unmarshal, Node, Tag,
};
pub use pattern::Pattern;
pub use reference::{
    cache_document, clear_document_cache, enter_reference, read_info_for_ref, ReferenceGuard,
};

/// Rebuilds a generic document tree from a compiled value.
pub trait ToRawInfo {
    /// Returns the document form of `self`.
    fn to_raw_info(&self) -> Node;
}

/// Expands `$ref` indirections inside a compiled value.
pub trait ResolveReferences {
    /// Resolves references relative to the document at `root`.
    ///
    /// Returns the referenced node when `self` is nothing but a reference.
    fn resolve_references(&mut self, root: &str) -> Result<Option<Node>, Error>;
}

/// Parses `text` and compiles it with `build`, starting from a `$root` context.
///
/// A document that cannot be parsed is reported as an error without calling `build`.
pub fn compile<T>(
    text: &str,
    extensions: Option<&ExtensionRegistry>,
    build: impl FnOnce(&Node, &Context<'_>) -> Built<T>,
) -> Built<T> {
    let Some(node) = unmarshal(text) else {
        return fatal(Error::general("document is not valid YAML or JSON"));
    };
    let context = match extensions {
        Some(registry) => Context::with_extensions("$root", registry),
        None => Context::new("$root", None),
    };
    build(&node, &context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A hand-written compiler for `{title: string}` in the shape generated code takes.
    #[derive(Debug, Default, PartialEq)]
    struct Info {
        title: String,
    }

    impl Info {
        fn new(node: &Node, context: &Context) -> Built<Self> {
            let mut errors: Vec<Error> = Vec::new();
            let mut x = Self::default();
            if let Some(m) = unpack_map(node) {
                let missing_keys = missing_keys_in_map(m, &["title"]);
                if !missing_keys.is_empty() {
                    let message = format!(
                        "is missing required {}: {}",
                        plural_properties(missing_keys.len()),
                        missing_keys.join(", ")
                    );
                    errors.push(Error::new(context, message));
                }
                if let Some(v1) = map_value_for_key(m, "title") {
                    match string_for_scalar_node(v1) {
                        Some(v) => x.title = v,
                        None => errors.push(Error::new(
                            context,
                            format!("has unexpected value for {}: {}", "title", display(v1)),
                        )),
                    }
                }
            } else {
                errors.push(Error::new(
                    context,
                    format!("has unexpected value: {}", display(node)),
                ));
            }
            finish(x, errors)
        }
    }

    impl ToRawInfo for Info {
        fn to_raw_info(&self) -> Node {
            Node::Mapping(vec![(
                new_scalar_node_for_string("title"),
                new_scalar_node_for_string(&self.title),
            )])
        }
    }

    #[test]
    fn test_compile_round_trip() {
        let info = compile("title: Pets", None, Info::new).unwrap();
        assert_eq!(info.title, "Pets");
        let again = compile(&marshal(&info.to_raw_info()), None, Info::new).unwrap();
        assert_eq!(again, info);
    }

    #[test]
    fn test_compile_reports_partial_value() {
        let partial = compile("version: 1", None, Info::new).unwrap_err();
        assert_eq!(partial.value, Some(Info::default()));
        assert_eq!(
            partial.error.to_string(),
            "ERROR $root is missing required property: title"
        );
    }

    #[test]
    fn test_compile_rejects_unparseable_text() {
        let partial = compile("[", None, Info::new).unwrap_err();
        assert!(partial.value.is_none());
    }
}
