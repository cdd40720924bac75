//! Records: instantiation, hydration and replay across replicas.

use quire::{Change, Record, SchemaId, record::RecordError};
use serde_json::json;

use crate::helpers::{doc_schema, note_schema};

#[test]
fn test_same_schema_instances_exchange_changes() {
    let mut alice = Record::new(doc_schema(1)).unwrap();
    let mut bob = Record::new(doc_schema(1)).unwrap();
    assert!(alice.is_compatible(&bob));

    let change: Change = alice.text_mut("body").unwrap().append("hello").into();
    bob.apply(alice.schema_id(), "body", &change).unwrap();
    let change = Change::from(bob.text_mut("body").unwrap().insert(5, " world").unwrap());
    alice.apply(bob.schema_id(), "body", &change).unwrap();

    assert_eq!(alice.to_json(), bob.to_json());
    assert_eq!(alice.to_json(), json!({"body": "hello world"}));
}

#[test]
fn test_version_bump_is_not_merge_eligible() {
    let v1 = Record::new(doc_schema(1)).unwrap();
    let mut v2 = Record::new(doc_schema(2)).unwrap();
    assert!(!v1.is_compatible(&v2));

    let change = Change::from(quire::TextChange::new(0, "", "x"));
    let err = v2.apply(v1.schema_id(), "body", &change).unwrap_err();
    assert!(err.is_incompatible_schema());
    assert_eq!(v2.text("body").unwrap().to_string(), "");
    match err {
        quire::Error::Record(RecordError::IncompatibleSchema { expected, actual }) => {
            assert_eq!(expected, SchemaId::new("doc", 2));
            assert_eq!(actual, SchemaId::new("doc", 1));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_defaults_instantiated_per_kind() {
    let record = Record::new(note_schema()).unwrap();
    let expected = json!({
        "title": "untitled",
        "tags": [],
        "meta": {},
        "pinned": false
    });
    assert_eq!(record.to_json(), expected);
    assert_eq!(record.text("title").unwrap().len(), 8);
    assert!(record.list("tags").unwrap().is_empty());
    assert!(record.map("meta").unwrap().is_empty());
    assert_eq!(record.value("pinned").unwrap().get(), &json!(false));
}

#[test]
fn test_hydrate_round_trips_through_json() {
    let mut record = Record::new(note_schema()).unwrap();
    record.text_mut("title").unwrap().assign("Groceries");
    record.list_mut("tags").unwrap().push(json!("home"));
    record.map_mut("meta").unwrap().set("color", json!("red"));
    record.value_mut("pinned").unwrap().set(json!(true));

    let snapshot = record.to_json();
    let restored = Record::hydrate(note_schema(), &snapshot).unwrap();
    assert_eq!(restored.to_json(), snapshot);
    assert_eq!(restored.schema_id(), record.schema_id());
}

#[test]
fn test_hydrate_fills_missing_fields_with_defaults() {
    let snapshot = json!({"tags": ["a"]});
    let record = Record::hydrate(note_schema(), &snapshot).unwrap();
    assert_eq!(record.text("title").unwrap().to_string(), "untitled");
    assert_eq!(record.list("tags").unwrap().len(), 1);
}

#[test]
fn test_hydrate_rejects_malformed_snapshots() {
    let snapshot = json!(["not", "an", "object"]);
    let err = Record::hydrate(note_schema(), &snapshot).unwrap_err();
    assert!(err.is_configuration_error());

    let snapshot = json!({"title": 5});
    let err = Record::hydrate(note_schema(), &snapshot).unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn test_apply_errors_name_the_field() {
    let mut record = Record::new(note_schema()).unwrap();
    let id = record.schema_id().clone();

    let change = Change::from(quire::TextChange::default());
    let err = record.apply(&id, "nope", &change).unwrap_err();
    assert!(err.is_not_found());

    let change = Change::from(quire::TextChange::new(0, "", "x"));
    let err = record.apply(&id, "tags", &change).unwrap_err();
    match err {
        quire::Error::Record(err) => {
            assert!(err.is_type_error());
            assert_eq!(err.field(), Some("tags"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_list_and_map_changes_replay_between_records() {
    let mut local = Record::new(note_schema()).unwrap();
    let mut remote = Record::new(note_schema()).unwrap();
    let id = local.schema_id().clone();

    let mut changes: Vec<(&str, Change)> = Vec::new();
    let tags = local.list_mut("tags").unwrap();
    changes.push(("tags", tags.push(json!("work")).into()));
    changes.push(("tags", tags.insert(0, json!("urgent")).unwrap().into()));
    let meta = local.map_mut("meta").unwrap();
    changes.push(("meta", meta.set("owner", json!("sam")).into()));
    changes.push(("meta", meta.set("owner", json!("kim")).into()));
    let pinned = local.value_mut("pinned").unwrap();
    changes.push(("pinned", pinned.set(json!(true)).into()));
    for (field, change) in &changes {
        remote.apply(&id, field, change).unwrap();
    }
    assert_eq!(remote.to_json(), local.to_json());
}
