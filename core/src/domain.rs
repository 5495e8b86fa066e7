#![deny(missing_docs)]

//! # Domain Model
//!
//! The input of the generator: every type of a document format, with its
//! properties and constraints. A `Domain` is built once (usually loaded from a
//! JSON or YAML description) and is read-only during generation.
//!
//! Shape markers select special code shapes and are mutually exclusive:
//! - **string array**: a scalar or a sequence of strings.
//! - **item array**: a single nested schema stored as a one-element list.
//! - **blob**: any document, kept as raw text.
//! - **extensible scalar union**: the fixed `DefaultType` and
//!   `SpecificationExtension` types, a bool, string or number.
//! - **oneof wrapper**: exactly one of the property types.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Types whose values are a bare bool, string or number, chosen by node tag.
pub const SCALAR_UNION_TYPES: [&str; 2] = ["DefaultType", "SpecificationExtension"];

/// The oneof alternative whose resolution replaces the whole wrapper.
pub const POINTER_REFERENCE_TYPE: &str = "JsonReference";

/// The schema-level key holding a reference.
pub const REFERENCE_KEY: &str = "$ref";

/// The document format generation; selects the item array element type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVersion {
    /// Items are `Schema`.
    V2,
    /// Items are `SchemaOrReference`.
    #[default]
    V3,
}

impl FormatVersion {
    /// The type stored by item array types.
    pub fn item_array_element(self) -> &'static str {
        match self {
            FormatVersion::V2 => "Schema",
            FormatVersion::V3 => "SchemaOrReference",
        }
    }
}

/// All the types of a document format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Type models by name, in input order.
    #[serde(default)]
    pub type_models: IndexMap<String, TypeModel>,
    /// Format generation.
    #[serde(default)]
    pub version: FormatVersion,
}

/// One generated type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeModel {
    /// Unique type name.
    pub name: String,
    /// Properties, in declaration order.
    pub properties: Vec<PropertyModel>,
    /// Names of properties that must be present.
    pub required: BTreeSet<String>,
    /// Whether undeclared keys are accepted.
    pub open: bool,
    /// Patterns for additional keys accepted by a closed type.
    pub open_patterns: Vec<String>,
    /// Whether this type holds exactly one of its property types.
    pub one_of_wrapper: bool,
    /// A scalar or a sequence of strings.
    pub is_string_array: bool,
    /// A single schema wrapped as an array.
    pub is_item_array: bool,
    /// Raw text passthrough.
    pub is_blob: bool,
    /// A name/value entry of a map-shaped property.
    pub is_pair: bool,
    /// Documentation for the emitted type declaration.
    pub description: Option<String>,
}

/// One property of a type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyModel {
    /// Schema-level key.
    pub name: String,
    /// A scalar kind (`string`, `int`, `float`, `bool`) or a type name.
    #[serde(rename = "type")]
    pub ty: String,
    /// Sequence rather than single value.
    pub repeated: bool,
    /// Excluded from the allowed keys of a closed type.
    pub implicit: bool,
    /// Key pattern of a map-shaped property.
    pub pattern: Option<String>,
    /// Value type of a map-shaped property.
    pub map_type: Option<String>,
    /// The legal values of a string property.
    pub string_enum_values: Option<Vec<String>>,
    /// Documentation for the emitted field.
    pub description: Option<String>,
}

/// The code shape of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeShape {
    /// Scalar or sequence of strings.
    StringArray,
    /// Single nested schema wrapped as an array.
    ItemArray,
    /// Raw text passthrough.
    Blob,
    /// Bool, string or number chosen by node tag.
    ScalarUnion,
    /// Exactly one of the property types.
    OneOf,
    /// A mapping with declared properties.
    Object,
}

/// Scalar property kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// `string`
    String,
    /// `int` / `int64`
    Integer,
    /// `float` / `double`
    Float,
    /// `bool`
    Boolean,
}

impl ScalarKind {
    /// Parses a scalar property type name.
    pub fn parse(ty: &str) -> Option<Self> {
        match ty {
            "string" => Some(ScalarKind::String),
            "int" | "int64" => Some(ScalarKind::Integer),
            "float" | "double" => Some(ScalarKind::Float),
            "bool" => Some(ScalarKind::Boolean),
            _ => None,
        }
    }
}

/// How a property is compiled.
#[derive(Debug, Clone, Copy)]
pub enum PropertyKind<'a> {
    /// A scalar value.
    Scalar(ScalarKind),
    /// Another (non-pair) type of the domain.
    Nested(&'a TypeModel),
    /// A family of pattern-matched keys stored as name/value pairs.
    Map {
        /// The pair type stored in the property.
        pair: &'a str,
        /// The value type of each pair, `None` for plain strings.
        value: Option<&'a TypeModel>,
    },
    /// A type that is neither a scalar nor declared.
    Unknown,
}

impl TypeModel {
    /// Returns the code shape of this type.
    pub fn shape(&self) -> TypeShape {
        if self.is_string_array {
            TypeShape::StringArray
        } else if self.is_item_array {
            TypeShape::ItemArray
        } else if self.is_blob {
            TypeShape::Blob
        } else if SCALAR_UNION_TYPES.contains(&self.name.as_str()) {
            TypeShape::ScalarUnion
        } else if self.one_of_wrapper {
            TypeShape::OneOf
        } else {
            TypeShape::Object
        }
    }

    /// Returns `true` if `name` is a required property.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Returns the reference property, if this type has one.
    pub fn reference_property(&self) -> Option<&PropertyModel> {
        self.properties.iter().find(|p| p.name == REFERENCE_KEY)
    }

    fn shape_markers(&self) -> Vec<&'static str> {
        let mut markers = Vec::new();
        if self.is_string_array {
            markers.push("isStringArray");
        }
        if self.is_item_array {
            markers.push("isItemArray");
        }
        if self.is_blob {
            markers.push("isBlob");
        }
        if self.one_of_wrapper && !SCALAR_UNION_TYPES.contains(&self.name.as_str()) {
            markers.push("oneOfWrapper");
        }
        markers
    }
}

impl Domain {
    /// Parses a domain from YAML text.
    pub fn from_yaml_str(text: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a domain from JSON text.
    pub fn from_json_str(text: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a domain from a `.json` file, or a YAML file for any other extension.
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading domain model");
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_yaml_str(&text),
        }
    }

    /// Type names in lexicographic order.
    pub fn sorted_type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.type_models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Looks up a type by name.
    pub fn type_model(&self, name: &str) -> Option<&TypeModel> {
        self.type_models.get(name)
    }

    /// Classifies how `property` is compiled.
    pub fn property_kind<'a>(&'a self, property: &'a PropertyModel) -> PropertyKind<'a> {
        if let Some(scalar) = ScalarKind::parse(&property.ty) {
            return PropertyKind::Scalar(scalar);
        }
        let declared = self.type_model(&property.ty);
        if let Some(model) = declared {
            if !model.is_pair {
                return PropertyKind::Nested(model);
            }
        }
        match property.map_type.as_deref() {
            Some(map_type) => PropertyKind::Map {
                pair: &property.ty,
                value: self.type_model(map_type),
            },
            None => PropertyKind::Unknown,
        }
    }

    /// Returns `true` if `property` is one of the alternatives of the oneof
    /// wrapper `model`: a singular scalar or nested type.
    pub fn is_alternative(&self, model: &TypeModel, property: &PropertyModel) -> bool {
        model.shape() == TypeShape::OneOf
            && !property.repeated
            && matches!(
                self.property_kind(property),
                PropertyKind::Scalar(_) | PropertyKind::Nested(_)
            )
    }

    /// Checks the internal consistency the generators rely on.
    pub fn validate(&self) -> AppResult<()> {
        for (key, model) in &self.type_models {
            if key != &model.name {
                return Err(AppError::Model(format!(
                    "type registered as {} is named {}",
                    key, model.name
                )));
            }

            let markers = model.shape_markers();
            if markers.len() > 1 {
                return Err(AppError::Model(format!(
                    "{} has conflicting shape markers: {}",
                    model.name,
                    markers.join(", ")
                )));
            }

            for required in &model.required {
                if !model.properties.iter().any(|p| &p.name == required) {
                    return Err(AppError::Model(format!(
                        "{} requires undeclared property {}",
                        model.name, required
                    )));
                }
            }

            for property in &model.properties {
                if let Some(map_type) = property.map_type.as_deref() {
                    if map_type != "string" && self.type_model(map_type).is_none() {
                        return Err(AppError::Model(format!(
                            "{}.{} maps to undeclared type {}",
                            model.name, property.name, map_type
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
