#![deny(missing_docs)]

//! # Node Helpers
//!
//! Inspection, coercion and key validation primitives called from generated
//! constructors.

use crate::node::{parse_float, Node, Tag};
use crate::pattern::Pattern;

/// Returns `node` if it is a mapping.
pub fn unpack_map(node: &Node) -> Option<&Node> {
    match node {
        Node::Mapping(_) => Some(node),
        _ => None,
    }
}

/// Returns the key/value pairs of a mapping, or nothing for other nodes.
pub fn map_pairs(node: &Node) -> &[(Node, Node)] {
    match node {
        Node::Mapping(pairs) => pairs,
        _ => &[],
    }
}

/// Looks up the value stored under the scalar key `key`.
pub fn map_value_for_key<'a>(node: &'a Node, key: &str) -> Option<&'a Node> {
    map_pairs(node)
        .iter()
        .find(|(k, _)| k.scalar_value() == Some(key))
        .map(|(_, v)| v)
}

/// Returns the items of a sequence node.
pub fn sequence_node_for_node(node: &Node) -> Option<&[Node]> {
    match node {
        Node::Sequence(items) => Some(items),
        _ => None,
    }
}

/// Reads a scalar as a string. Strings, numbers and null are accepted.
pub fn string_for_scalar_node(node: &Node) -> Option<String> {
    match node {
        Node::Scalar {
            tag: Tag::Str | Tag::Int | Tag::Float,
            value,
        } => Some(value.clone()),
        Node::Scalar { tag: Tag::Null, .. } => Some(String::new()),
        _ => None,
    }
}

/// Reads a `!!bool` scalar.
pub fn bool_for_scalar_node(node: &Node) -> Option<bool> {
    match node {
        Node::Scalar {
            tag: Tag::Bool,
            value,
        } => value.parse().ok(),
        _ => None,
    }
}

/// Reads an `!!int` scalar.
pub fn int_for_scalar_node(node: &Node) -> Option<i64> {
    match node {
        Node::Scalar { tag: Tag::Int, value } => value.parse().ok(),
        _ => None,
    }
}

/// Reads an `!!int` or `!!float` scalar as a float.
pub fn float_for_scalar_node(node: &Node) -> Option<f64> {
    match node {
        Node::Scalar {
            tag: Tag::Int | Tag::Float,
            value,
        } => parse_float(value),
        _ => None,
    }
}

/// Collects the scalar items of a sequence as strings, skipping anything else.
pub fn string_array_for_sequence_node(items: &[Node]) -> Vec<String> {
    items.iter().filter_map(string_for_scalar_node).collect()
}

/// Reads every item as a bool; `None` if any item is not a bool.
pub fn bool_array_for_sequence_node(items: &[Node]) -> Option<Vec<bool>> {
    items.iter().map(bool_for_scalar_node).collect()
}

/// Reads every item as an integer; `None` if any item is not an integer.
pub fn int_array_for_sequence_node(items: &[Node]) -> Option<Vec<i64>> {
    items.iter().map(int_for_scalar_node).collect()
}

/// Reads every item as a float; `None` if any item is not numeric.
pub fn float_array_for_sequence_node(items: &[Node]) -> Option<Vec<f64>> {
    items.iter().map(float_for_scalar_node).collect()
}

/// Returns `true` if `value` is one of `allowed`.
pub fn string_array_contains_value(allowed: &[&str], value: &str) -> bool {
    allowed.contains(&value)
}

/// Returns `true` if every entry of `values` is one of `allowed`.
pub fn string_array_contains_values(allowed: &[&str], values: &[String]) -> bool {
    values
        .iter()
        .all(|value| string_array_contains_value(allowed, value))
}

/// Lists the `required` keys absent from a mapping, in `required` order.
pub fn missing_keys_in_map(node: &Node, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|key| map_value_for_key(node, key).is_none())
        .map(|key| key.to_string())
        .collect()
}

/// Lists the keys of a mapping that are neither in `allowed` nor match any of
/// `patterns`, in document order.
pub fn invalid_keys_in_map(node: &Node, allowed: &[&str], patterns: &[&Pattern]) -> Vec<String> {
    map_pairs(node)
        .iter()
        .filter_map(|(key, _)| key.scalar_value())
        .filter(|key| !allowed.contains(key))
        .filter(|key| !patterns.iter().any(|pattern| pattern.is_match(key)))
        .map(str::to_string)
        .collect()
}

/// `"property"` or `"properties"`, depending on `count`.
pub fn plural_properties(count: usize) -> &'static str {
    if count == 1 {
        "property"
    } else {
        "properties"
    }
}
