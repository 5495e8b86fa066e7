use cdd_compiler_core::{
    generate_compiler, generate_compiler_with_options, AppError, Domain, FormatVersion,
    GeneratorOptions, PropertyModel, TypeModel, DEFAULT_IMPORTS, GENERATED_MARKER,
};
use pretty_assertions::assert_eq;
use std::fs;

const FIXTURE: &str = include_str!("fixtures/petstore_v3.yaml");

fn fixture() -> Domain {
    Domain::from_yaml_str(FIXTURE).unwrap()
}

fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn has(code: &str, needle: &str) -> bool {
    squash(code).contains(&squash(needle))
}

#[test]
fn test_output_is_deterministic() {
    let domain = fixture();
    let first = generate_compiler(&domain, "openapi_v3", "", DEFAULT_IMPORTS).unwrap();
    let second = generate_compiler(&domain, "openapi_v3", "", DEFAULT_IMPORTS).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_output_parses_as_rust() {
    let options = GeneratorOptions {
        emit_type_declarations: true,
        ..Default::default()
    };
    let code =
        generate_compiler_with_options(&fixture(), "openapi_v3", "", DEFAULT_IMPORTS, &options)
            .unwrap();
    let file = syn::parse_file(&code).unwrap();
    let structs = file
        .items
        .iter()
        .filter(|item| matches!(item, syn::Item::Struct(_)))
        .count();
    assert_eq!(structs, fixture().type_models.len());
}

#[test]
fn test_unit_layout() {
    let license = "Copyright 2024 The Authors.\nLicensed under the Apache License, Version 2.0.";
    let code = generate_compiler(&fixture(), "openapi_v3", license, DEFAULT_IMPORTS).unwrap();
    let mut lines = code.lines();
    assert_eq!(lines.next(), Some("// Copyright 2024 The Authors."));
    assert_eq!(
        lines.next(),
        Some("// Licensed under the Apache License, Version 2.0.")
    );
    assert_eq!(lines.next(), Some(""));
    assert_eq!(lines.next(), Some(GENERATED_MARKER));

    let version = code.find("pub fn version()").unwrap();
    let first_constructor = code.find("impl AdditionalPropertiesItem {").unwrap();
    let first_resolver = code.find("ResolveReferences for AdditionalPropertiesItem").unwrap();
    let first_serializer = code.find("ToRawInfo for AdditionalPropertiesItem").unwrap();
    let patterns = code.find("static PATTERN0").unwrap();
    assert!(version < first_constructor);
    assert!(first_constructor < first_resolver);
    assert!(first_resolver < first_serializer);
    assert!(first_serializer < patterns);
}

#[test]
fn test_constructors_in_type_name_order() {
    let code = generate_compiler(&fixture(), "openapi_v3", "", DEFAULT_IMPORTS).unwrap();
    let any = code.find("impl Any {").unwrap();
    let document = code.find("impl Document {").unwrap();
    let tag = code.find("impl Tag {").unwrap();
    assert!(any < document);
    assert!(document < tag);
}

#[test]
fn test_required_string_and_integer_type() {
    let mut t = TypeModel {
        name: "T".into(),
        required: ["name".to_string()].into(),
        ..Default::default()
    };
    t.properties = vec![
        PropertyModel {
            name: "name".into(),
            ty: "string".into(),
            ..Default::default()
        },
        PropertyModel {
            name: "count".into(),
            ty: "int".into(),
            ..Default::default()
        },
    ];
    let domain = Domain {
        type_models: [("T".to_string(), t)].into_iter().collect(),
        version: FormatVersion::V3,
    };
    let code = generate_compiler(&domain, "unit", "", DEFAULT_IMPORTS).unwrap();
    assert!(has(&code, r#"compiler::missing_keys_in_map(m, &["name"])"#));
    assert!(has(&code, r#"let allowed_keys: &[&str] = &["count", "name"];"#));
    assert!(has(&code, "let allowed_patterns: &[&compiler::Pattern] = &[];"));
    assert!(has(&code, "compiler::int_for_scalar_node(v2)"));
    assert!(has(&code, "if self.count != 0"));
    assert!(!code.contains("static PATTERN"));
}

#[test]
fn test_patterns_are_shared_across_types() {
    let code = generate_compiler(&fixture(), "openapi_v3", "", DEFAULT_IMPORTS).unwrap();
    assert_eq!(code.matches(r#"compiler::Pattern::new("^x-")"#).count(), 1);
    assert_eq!(code.matches(r#"compiler::Pattern::new("^/")"#).count(), 1);
    assert_eq!(
        code.matches(r#"compiler::Pattern::new("^([0-9X]{3})$")"#)
            .count(),
        1
    );
    // The common prefixes are tested inline where a key is matched.
    assert!(code.contains(r#"k.starts_with("x-")"#));
    assert!(code.contains("k.starts_with('/')"));
}

#[test]
fn test_closed_type_reports_invalid_keys() {
    let code = generate_compiler(&fixture(), "openapi_v3", "", DEFAULT_IMPORTS).unwrap();
    assert!(has(&code, r#""has invalid {}: {}""#));
    assert!(has(
        &code,
        r#"&["info", "openapi", "paths", "tags"]"#
    ));
}

#[test]
fn test_enumerated_strings_are_checked() {
    let code = generate_compiler(&fixture(), "openapi_v3", "", DEFAULT_IMPORTS).unwrap();
    assert!(has(
        &code,
        r#"compiler::string_array_contains_value(&["query", "header", "path", "cookie"], &x.in_)"#
    ));
}

#[test]
fn test_oneof_discards_or_replaces_errors() {
    let code = generate_compiler(&fixture(), "openapi_v3", "", DEFAULT_IMPORTS).unwrap();
    assert!(has(&code, r#""contains an invalid {}", "ParameterOrReference""#));
    assert!(has(
        &code,
        "x.oneof = Some(ParameterOrReferenceOneof::Reference(Box::new(t)));"
    ));
}

#[test]
fn test_item_array_element_follows_version() {
    let mut domain = fixture();
    let v3 = generate_compiler(&domain, "openapi_v3", "", DEFAULT_IMPORTS).unwrap();
    assert!(has(&v3, "x.schema_or_reference.push(y)"));

    domain.version = FormatVersion::V2;
    let v2 = generate_compiler(&domain, "openapi_v2", "", DEFAULT_IMPORTS).unwrap();
    assert!(has(&v2, "x.schema.push(y)"));
    assert!(!has(&v2, "x.schema_or_reference.push(y)"));
}

#[test]
fn test_blob_maps_offer_entries_to_extensions() {
    let code = generate_compiler(&fixture(), "openapi_v3", "", DEFAULT_IMPORTS).unwrap();
    assert!(has(&code, "match compiler::call_extension(context, value, &k)"));
    assert!(has(&code, "result.yaml = compiler::marshal(value);"));
}

#[test]
fn test_custom_imports() {
    let imports = ["my_runtime as compiler", "std::fmt"];
    let code = generate_compiler(&fixture(), "openapi_v3", "", &imports).unwrap();
    assert!(code.contains("use my_runtime as compiler;"));
    assert!(code.contains("use std::fmt;"));
    assert!(!code.contains("cdd_compiler_runtime"));
}

#[test]
fn test_domain_loaded_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = dir.path().join("domain.yaml");
    fs::write(&yaml, FIXTURE).unwrap();
    let json = dir.path().join("domain.json");
    fs::write(&json, serde_json::to_string(&fixture()).unwrap()).unwrap();

    let from_yaml = Domain::from_path(&yaml).unwrap();
    let from_json = Domain::from_path(&json).unwrap();
    assert_eq!(from_yaml, from_json);
    assert_eq!(from_yaml.type_models.len(), fixture().type_models.len());
}

#[test]
fn test_missing_domain_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Domain::from_path(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(AppError::Io(_))));
}
