//! Builds values with the generated constructors and checks the errors they report.

use cdd_compiler_conformance::counter::T;
use cdd_compiler_conformance::openapi_v3::{
    AdditionalPropertiesItem, AdditionalPropertiesItemOneof, Info, Parameter, SchemaOrReference,
    SchemaOrReferenceOneof,
};
use cdd_compiler_runtime as compiler;
use compiler::{ExtensionHandler, ExtensionRegistry, ExtensionValue, Node, ToRawInfo};
use pretty_assertions::assert_eq;

fn error_of<T>(built: compiler::Built<T>) -> String {
    match built {
        Ok(_) => panic!("expected an error"),
        Err(partial) => partial.error.to_string(),
    }
}

#[test]
fn test_counter_with_name_only() {
    let t = compiler::compile("name: x", None, T::new).unwrap();
    assert_eq!(
        t,
        T {
            name: "x".to_string(),
            count: 0,
        }
    );
    assert_eq!(t.to_raw_info(), compiler::unmarshal("name: x").unwrap());
}

#[test]
fn test_counter_missing_name() {
    let partial = compiler::compile("count: 3", None, T::new).unwrap_err();
    assert_eq!(
        partial.error.to_string(),
        "ERROR $root is missing required property: name"
    );
    assert_eq!(partial.value.map(|t| t.count), Some(3));
}

#[test]
fn test_counter_rejects_unknown_key() {
    assert_eq!(
        error_of(compiler::compile("name: x\nextra: y", None, T::new)),
        "ERROR $root has invalid property: extra"
    );
}

#[test]
fn test_parameter_location_is_an_enum() {
    assert_eq!(
        error_of(compiler::compile("name: limit\nin: c", None, Parameter::new)),
        "ERROR $root has unexpected value for in: c (string)"
    );
    let parameter = compiler::compile("name: limit\nin: query", None, Parameter::new).unwrap();
    assert_eq!(parameter.in_, "query");
}

#[test]
fn test_oneof_selects_by_shape() {
    let reference = compiler::compile(
        "$ref: '#/components/schemas/Pet'",
        None,
        SchemaOrReference::new,
    )
    .unwrap();
    match reference.oneof {
        Some(SchemaOrReferenceOneof::Reference(r)) => {
            assert_eq!(r.x_ref, "#/components/schemas/Pet")
        }
        other => panic!("unexpected alternative {:?}", other),
    }

    let schema = compiler::compile("type: string", None, SchemaOrReference::new).unwrap();
    match schema.oneof {
        Some(SchemaOrReferenceOneof::Schema(s)) => {
            assert_eq!(s.type_.map(|t| t.value), Some(vec!["string".to_string()]))
        }
        other => panic!("unexpected alternative {:?}", other),
    }

    let boolean = compiler::compile("true", None, AdditionalPropertiesItem::new).unwrap();
    assert_eq!(
        boolean.oneof,
        Some(AdditionalPropertiesItemOneof::Boolean(true))
    );
}

#[test]
fn test_oneof_without_match_is_invalid() {
    assert_eq!(
        error_of(compiler::compile("42", None, SchemaOrReference::new)),
        "ERROR $root contains an invalid SchemaOrReference"
    );
    // Each alternative rejects one of the keys; their errors are not reported.
    assert_eq!(
        error_of(compiler::compile(
            "$ref: '#/a'\ntype: string",
            None,
            SchemaOrReference::new
        )),
        "ERROR $root contains an invalid SchemaOrReference"
    );
}

struct Logo;

impl ExtensionHandler for Logo {
    fn handle(&self, name: &str, node: &Node) -> Option<Result<ExtensionValue, String>> {
        (name == "x-logo").then(|| {
            Ok(ExtensionValue {
                type_url: "logo".to_string(),
                value: compiler::marshal(node).into_bytes(),
            })
        })
    }
}

#[test]
fn test_extension_handler_claims_its_entries() {
    let mut registry = ExtensionRegistry::new();
    registry.register(Logo);
    let text = "title: Pets\nversion: 1.0.0\nx-logo: a.png\nx-other: 1\n";
    let info = compiler::compile(text, Some(&registry), Info::new).unwrap();

    assert_eq!(info.specification_extension.len(), 2);
    let logo = &info.specification_extension[0];
    assert_eq!(logo.name, "x-logo");
    let logo = logo.value.as_ref().unwrap();
    assert_eq!(logo.value.as_ref().map(|v| v.type_url.as_str()), Some("logo"));
    assert_eq!(logo.yaml, "a.png\n");

    let other = &info.specification_extension[1];
    assert_eq!(other.name, "x-other");
    assert_eq!(other.value.as_ref().and_then(|v| v.value.as_ref()), None);
}
