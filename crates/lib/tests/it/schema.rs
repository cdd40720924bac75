//! Schema construction, JSON documents and identity.

use quire::{
    FieldDescriptor, FieldKind, Schema, SchemaId,
    schema::SchemaError,
};
use serde_json::json;

use crate::helpers::{doc_schema, note_schema};

#[test]
fn test_same_name_and_version_are_compatible() {
    let first = doc_schema(1);
    let second = doc_schema(1);
    let newer = doc_schema(2);

    assert!(first.is_compatible(&second));
    assert_eq!(first.id(), second.id());
    assert!(!first.is_compatible(&newer));
    assert!(!first.id().is_compatible(&newer.id()));
}

#[test]
fn test_schema_id_display() {
    assert_eq!(SchemaId::new("doc", 1).to_string(), "doc@v1");
}

#[test]
fn test_from_json_document() {
    let schema = Schema::from_json(&json!({
        "name": "doc",
        "version": 1,
        "fields": {
            "body": {"kind": "text"},
            "tags": {"kind": "list", "default": ["draft"]},
            "meta": {"kind": "map", "default": {"lang": "en"}},
            "count": {"kind": "value", "default": 0},
        }
    }))
    .unwrap();

    assert_eq!(schema.id(), SchemaId::new("doc", 1));
    assert_eq!(schema.len(), 4);
    assert_eq!(schema.field("body"), Some(&FieldDescriptor::text()));
    let tags = schema.field("tags").map(FieldDescriptor::kind);
    assert_eq!(tags, Some(FieldKind::List));
    assert_eq!(schema.field("count").unwrap().default_json(), json!(0));
    assert!(schema.field("missing").is_none());
}

#[test]
fn test_json_document_round_trip() {
    let schema = note_schema();
    let document = schema.to_json().unwrap();
    assert_eq!(Schema::from_json(&document).unwrap(), *schema);

    let deserialized: Schema = serde_json::from_value(document).unwrap();
    assert_eq!(deserialized, *schema);
}

#[test]
fn test_unknown_kind_is_configuration_error() {
    let err = Schema::from_json(&json!({
        "name": "doc",
        "version": 1,
        "fields": {"body": {"kind": "richtext"}}
    }))
    .unwrap_err();
    assert!(err.is_unknown_kind());
    assert_eq!(err.field(), Some("body"));

    let err: quire::Error = err.into();
    assert!(err.is_configuration_error());
    assert!(!err.is_range_error());
}

#[test]
fn test_negative_version_rejected() {
    let err = Schema::from_json(&json!({"name": "doc", "version": -1})).unwrap_err();
    assert!(err.is_version_error());

    let err = Schema::from_json(&json!({"name": "doc", "version": 1.5})).unwrap_err();
    assert!(err.is_version_error());
}

#[test]
fn test_malformed_default_rejected() {
    let err = Schema::from_json(&json!({
        "name": "doc",
        "version": 1,
        "fields": {"body": {"kind": "text", "default": 12}}
    }))
    .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::MalformedDefault {
            kind: FieldKind::Text,
            ..
        }
    ));
}

#[test]
fn test_builder_rejects_duplicates_and_empty_names() {
    let err = Schema::builder("doc", 1)
        .field("body", FieldDescriptor::text())
        .field("body", FieldDescriptor::list())
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::DuplicateField {
            field: "body".to_string()
        }
    );

    assert!(Schema::builder("", 1).build().is_err());
    assert!(
        Schema::builder("doc", 1)
            .field("", FieldDescriptor::text())
            .build()
            .is_err()
    );
}

#[test]
fn test_zero_field_schema_allowed() {
    let schema = Schema::builder("empty", 0).build().unwrap();
    assert!(schema.is_empty());
    assert_eq!(schema.fields().count(), 0);
}
