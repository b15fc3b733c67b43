use std::path::Path;

use serde_json::json;
use wireshape_core::{PathSegment, Value};
use wireshape_registry::{
    FieldDescriptor, RegistryError, RegistrySource, SchemaDescriptor, SchemaDocument,
    SchemaRegistry,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const AUTH_YAML: &str = r#"
version: "1.0"
definitions:
  OAuthToken:
    type: object
    fields:
      - name: accessToken
        wire: access_token
        schema: { type: string }
      - name: expiresIn
        wire: expires_in
        schema: { type: optional, schema: { type: bigint } }
      - name: suit
        schema: { type: optional, schema: { type: ref, name: Suit } }
  Suit:
    type: enum
    members:
      - { name: Hearts, value: 1 }
      - { name: Spades, value: 2 }
      - { name: Clubs, value: 3 }
      - { name: Diamonds, value: 4 }
"#;

const CATALOG_JSON: &str = r#"{
  "definitions": {
    "Category": {
      "type": "object",
      "fields": [
        {"name": "name", "schema": {"type": "string"}},
        {"name": "subCategories", "wire": "sub_categories",
         "schema": {"type": "array", "items": {"type": "ref", "name": "Category"}}}
      ]
    },
    "Settings": {
      "type": "expando_object",
      "fields": [
        {"name": "theme", "schema": {"type": "defaults", "schema": {"type": "string"}, "value": "dark"}}
      ]
    }
  }
}"#;

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn wire(value: serde_json::Value) -> Value {
    Value::from(value)
}

// ---------------------------------------------------------------------------
// Directory loading
// ---------------------------------------------------------------------------

#[test]
fn test_directory_loading() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "auth.yaml", AUTH_YAML);
    write(dir.path(), "catalog.json", CATALOG_JSON);
    write(dir.path(), "README.txt", "not a schema document");

    let registry = SchemaRegistry::from_dir(dir.path()).unwrap();
    assert_eq!(registry.len(), 4);
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["Category", "OAuthToken", "Settings", "Suit"]
    );
    assert_eq!(
        registry.source(),
        &RegistrySource::Directory(dir.path().to_path_buf())
    );
}

#[test]
fn test_cross_document_reference() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.yaml", "definitions:\n  Wrapper:\n    type: array\n    items: { type: ref, name: Name }\n");
    write(dir.path(), "b.yml", "definitions:\n  Name:\n    type: string\n");

    let registry = SchemaRegistry::from_dir(dir.path()).unwrap();
    let errors = match registry.validate_and_map("Wrapper", &wire(json!(["a", 2]))) {
        Err(RegistryError::Validation(errors)) => errors,
        other => panic!("expected validation failure, got {other:?}"),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, vec![PathSegment::Index(1)]);
}

#[test]
fn test_duplicate_definition_across_documents() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "one.yaml", "definitions:\n  Name:\n    type: string\n");
    write(dir.path(), "two.yaml", "definitions:\n  Name:\n    type: number\n");

    let err = SchemaRegistry::from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateDefinition(name) if name == "Name"));
}

#[test]
fn test_unresolved_reference_fails_load() {
    let err = SchemaRegistry::from_yaml_str(
        "definitions:\n  Holder:\n    type: optional\n    schema: { type: ref, name: Ghost }\n",
    )
    .unwrap_err();

    match err {
        RegistryError::UnresolvedReference {
            definition,
            reference,
        } => {
            assert_eq!(definition, "Holder");
            assert_eq!(reference, "Ghost");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unsupported_file_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schemas.toml");
    std::fs::write(&path, "").unwrap();

    assert!(matches!(
        SchemaRegistry::from_file(&path),
        Err(RegistryError::UnsupportedFormat(_))
    ));
}

// ---------------------------------------------------------------------------
// Mapping through loaded definitions
// ---------------------------------------------------------------------------

#[test]
fn test_token_definition_maps_and_reports() {
    let registry = SchemaRegistry::from_yaml_str(AUTH_YAML).unwrap();

    let domain = registry
        .validate_and_map(
            "OAuthToken",
            &wire(json!({"access_token": "abc", "expires_in": 3600, "suit": 2})),
        )
        .unwrap();
    assert_eq!(domain.get("accessToken"), Some(&Value::from("abc")));
    assert_eq!(domain.get("suit"), Some(&Value::from(2)));

    let err = registry
        .validate_and_map("OAuthToken", &wire(json!({"access_token": 123, "suit": 9})))
        .unwrap_err();
    let RegistryError::Validation(errors) = err else {
        panic!("expected validation failure");
    };
    let mut paths: Vec<String> = errors.iter().map(|e| e.path_string()).collect();
    paths.sort();
    assert_eq!(paths, vec!["access_token", "suit"]);
}

#[test]
fn test_recursive_category_round_trip() {
    let registry = SchemaRegistry::from_json_str(CATALOG_JSON).unwrap();
    let input = wire(json!({
        "name": "root",
        "sub_categories": [
            {"name": "a", "sub_categories": []},
            {"name": "b", "sub_categories": [{"name": "c", "sub_categories": []}]}
        ]
    }));

    let domain = registry.validate_and_map("Category", &input).unwrap();
    let children = domain.get("subCategories").and_then(Value::as_array).unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(registry.validate_and_unmap("Category", &domain).unwrap(), input);
}

#[test]
fn test_recursive_category_json_schema() {
    let registry = SchemaRegistry::from_json_str(CATALOG_JSON).unwrap();
    let document = registry.json_schema("Category").unwrap();

    assert_eq!(document["$schema"], "http://json-schema.org/draft-07/schema#");
    let first = &document["properties"]["sub_categories"]["items"];
    assert_eq!(first["additionalProperties"], false);
    assert_eq!(
        first["properties"]["sub_categories"]["items"],
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "sub_categories": {"type": "array"}
            },
            "required": ["name", "sub_categories"]
        })
    );
}

#[test]
fn test_expando_definition_with_default() {
    let registry = SchemaRegistry::from_json_str(CATALOG_JSON).unwrap();
    let domain = registry
        .validate_and_map("Settings", &wire(json!({"fontSize": 12})))
        .unwrap();
    assert_eq!(domain, wire(json!({"theme": "dark", "fontSize": 12})));
}

// ---------------------------------------------------------------------------
// Documents on disk
// ---------------------------------------------------------------------------

#[test]
fn test_document_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut document = SchemaDocument::new();
    document.definitions.insert(
        "Pair".into(),
        SchemaDescriptor::Object {
            fields: vec![
                FieldDescriptor {
                    name: "left".into(),
                    wire: Some("l".into()),
                    schema: SchemaDescriptor::Number,
                },
                FieldDescriptor {
                    name: "right".into(),
                    wire: Some("r".into()),
                    schema: SchemaDescriptor::Nullable {
                        schema: Box::new(SchemaDescriptor::Number),
                    },
                },
            ],
        },
    );

    for file in ["pair.yaml", "pair.json"] {
        let path = dir.path().join(file);
        document.save(&path).unwrap();
        assert_eq!(SchemaDocument::load(&path).unwrap(), document);

        let registry = SchemaRegistry::from_file(&path).unwrap();
        assert_eq!(registry.source(), &RegistrySource::File(path.clone()));
        assert_eq!(
            registry
                .validate_and_map("Pair", &wire(json!({"l": 1, "r": null})))
                .unwrap(),
            wire(json!({"left": 1, "right": null}))
        );
    }
}

// ---------------------------------------------------------------------------
// Builder fallback
// ---------------------------------------------------------------------------

#[test]
fn test_builder_falls_back_to_next_source() {
    let dir = tempfile::tempdir().unwrap();
    let bundled = dir.path().join("bundled.yaml");
    write(dir.path(), "bundled.yaml", AUTH_YAML);
    let missing = dir.path().join("does-not-exist");

    let registry = SchemaRegistry::builder()
        .from_dir(&missing)
        .from_file(&bundled)
        .build()
        .unwrap();

    assert!(registry.contains("OAuthToken"));
    assert_eq!(
        registry.source(),
        &RegistrySource::Multiple(vec![
            RegistrySource::Directory(missing),
            RegistrySource::File(bundled),
        ])
    );
}

#[test]
fn test_builder_all_sources_fail() {
    let dir = tempfile::tempdir().unwrap();
    let result = SchemaRegistry::builder()
        .from_dir(dir.path().join("nope"))
        .from_file(dir.path().join("nope.yaml"))
        .build();
    assert!(matches!(result, Err(RegistryError::NoSourcesAvailable)));
}
