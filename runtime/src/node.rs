#![deny(missing_docs)]

//! # Document Nodes
//!
//! A generic, order-preserving document tree: scalars carrying their native tag,
//! sequences, and mappings stored as ordered key/value pairs.
//!
//! Nodes are produced from YAML (or JSON, which is a YAML subset) through
//! `serde_yaml::Value` and can be written back the same way.

use serde_yaml::{Mapping, Number, Value};
use std::fmt::{self, Display};

/// The native tag of a node, as resolved by the YAML parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `!!null`
    Null,
    /// `!!bool`
    Bool,
    /// `!!str`
    Str,
    /// `!!int`
    Int,
    /// `!!float`
    Float,
    /// `!!seq`
    Seq,
    /// `!!map`
    Map,
}

impl Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Null => "null",
            Tag::Bool => "bool",
            Tag::Str => "string",
            Tag::Int => "int",
            Tag::Float => "float",
            Tag::Seq => "sequence",
            Tag::Map => "mapping",
        };
        f.write_str(name)
    }
}

/// A node of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A scalar with its textual value and resolved tag.
    Scalar {
        /// One of the scalar tags (`Null`, `Bool`, `Str`, `Int`, `Float`).
        tag: Tag,
        /// The scalar text.
        value: String,
    },
    /// An ordered sequence of nodes.
    Sequence(Vec<Node>),
    /// An ordered list of key/value pairs. Keys are usually string scalars.
    Mapping(Vec<(Node, Node)>),
}

impl Node {
    /// Creates a scalar node.
    pub fn scalar(tag: Tag, value: impl Into<String>) -> Self {
        Node::Scalar {
            tag,
            value: value.into(),
        }
    }

    /// Returns the native tag of this node.
    pub fn tag(&self) -> Tag {
        match self {
            Node::Scalar { tag, .. } => *tag,
            Node::Sequence(_) => Tag::Seq,
            Node::Mapping(_) => Tag::Map,
        }
    }

    /// Returns the scalar text, if this is a scalar.
    pub fn scalar_value(&self) -> Option<&str> {
        match self {
            Node::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns `true` for the null scalar.
    pub fn is_null(&self) -> bool {
        self.tag() == Tag::Null
    }

    /// Converts this node into a `serde_yaml::Value`.
    ///
    /// Duplicate mapping keys collapse to the last occurrence.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Scalar { tag, value } => scalar_to_value(*tag, value),
            Node::Sequence(items) => Value::Sequence(items.iter().map(Node::to_value).collect()),
            Node::Mapping(pairs) => {
                let mut mapping = Mapping::new();
                for (key, value) in pairs {
                    mapping.insert(key.to_value(), value.to_value());
                }
                Value::Mapping(mapping)
            }
        }
    }
}

fn scalar_to_value(tag: Tag, value: &str) -> Value {
    match tag {
        Tag::Null => Value::Null,
        Tag::Bool => value
            .parse::<bool>()
            .map(Value::Bool)
            .unwrap_or_else(|_| Value::String(value.to_string())),
        Tag::Int => {
            if let Ok(i) = value.parse::<i64>() {
                Value::Number(Number::from(i))
            } else if let Ok(u) = value.parse::<u64>() {
                Value::Number(Number::from(u))
            } else {
                Value::String(value.to_string())
            }
        }
        Tag::Float => parse_float(value)
            .map(|f| Value::Number(Number::from(f)))
            .unwrap_or_else(|| Value::String(value.to_string())),
        Tag::Str | Tag::Seq | Tag::Map => Value::String(value.to_string()),
    }
}

/// Parses float text, including the YAML spellings of infinity and NaN.
pub(crate) fn parse_float(value: &str) -> Option<f64> {
    match value {
        ".inf" | ".Inf" | ".INF" | "+.inf" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        _ => value.parse::<f64>().ok(),
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Node::scalar(Tag::Null, "null"),
            Value::Bool(b) => Node::scalar(Tag::Bool, b.to_string()),
            Value::Number(n) if n.is_f64() => Node::scalar(Tag::Float, n.to_string()),
            Value::Number(n) => Node::scalar(Tag::Int, n.to_string()),
            Value::String(s) => Node::scalar(Tag::Str, s.clone()),
            Value::Sequence(items) => Node::Sequence(items.iter().map(Node::from).collect()),
            Value::Mapping(mapping) => Node::Mapping(
                mapping
                    .iter()
                    .map(|(k, v)| (Node::from(k), Node::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from(&tagged.value),
        }
    }
}

/// Parses YAML (or JSON) text into a node.
///
/// Returns `None` if the text is not well-formed.
pub fn unmarshal(text: &str) -> Option<Node> {
    serde_yaml::from_str::<Value>(text)
        .ok()
        .map(|value| Node::from(&value))
}

/// Serializes a node to YAML text.
pub fn marshal(node: &Node) -> String {
    match serde_yaml::to_string(&node.to_value()) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize node");
            String::new()
        }
    }
}

/// Renders a node for use in error messages.
pub fn display(node: &Node) -> String {
    match node {
        Node::Scalar { tag, value } => format!("{} ({})", value, tag),
        Node::Sequence(items) => format!("sequence of {} items", items.len()),
        Node::Mapping(pairs) => format!("mapping with {} entries", pairs.len()),
    }
}

/// Creates a null node.
pub fn new_null_node() -> Node {
    Node::scalar(Tag::Null, "null")
}

/// Creates a string scalar node.
pub fn new_scalar_node_for_string(value: &str) -> Node {
    Node::scalar(Tag::Str, value)
}

/// Creates a boolean scalar node.
pub fn new_scalar_node_for_bool(value: bool) -> Node {
    Node::scalar(Tag::Bool, value.to_string())
}

/// Creates an integer scalar node.
pub fn new_scalar_node_for_int(value: i64) -> Node {
    Node::scalar(Tag::Int, value.to_string())
}

/// Creates a float scalar node.
pub fn new_scalar_node_for_float(value: f64) -> Node {
    Node::scalar(Tag::Float, value.to_string())
}

/// Creates a sequence of string scalars.
pub fn new_sequence_node_for_string_array(values: &[String]) -> Node {
    Node::Sequence(values.iter().map(|v| new_scalar_node_for_string(v)).collect())
}

/// Creates a sequence of boolean scalars.
pub fn new_sequence_node_for_bool_array(values: &[bool]) -> Node {
    Node::Sequence(values.iter().copied().map(new_scalar_node_for_bool).collect())
}

/// Creates a sequence of integer scalars.
pub fn new_sequence_node_for_int_array(values: &[i64]) -> Node {
    Node::Sequence(values.iter().copied().map(new_scalar_node_for_int).collect())
}

/// Creates a sequence of float scalars.
pub fn new_sequence_node_for_float_array(values: &[f64]) -> Node {
    Node::Sequence(values.iter().copied().map(new_scalar_node_for_float).collect())
}
