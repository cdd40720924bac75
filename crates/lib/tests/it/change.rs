//! Change record replay and parsing.

use std::collections::BTreeMap;

use quire::{Change, FieldKind, ListChange, MapChange, TextChange, ValueChange, field::ListField};
use serde_json::json;

#[test]
fn test_change_json_is_tagged_by_kind() {
    let change = Change::from(TextChange::new(5, "", " world"));
    let encoded = serde_json::to_value(&change).unwrap();
    let expected = json!({
        "kind": "text",
        "index": 5,
        "removed_text": "",
        "inserted_text": " world"
    });
    assert_eq!(encoded, expected);
    assert_eq!(change.kind(), FieldKind::Text);

    let decoded: Change = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, change);
}

#[test]
fn test_text_change_from_json() {
    let json = json!({"index": 2, "inserted_text": "ok"});
    let change = TextChange::from_json(&json).unwrap();
    assert_eq!(change, TextChange::new(2, "", "ok"));

    let json = json!({"index": 2.5, "inserted_text": "x"});
    let err = TextChange::from_json(&json).unwrap_err();
    assert!(err.is_invalid_argument());

    let err = TextChange::from_json(&json!({"index": -1})).unwrap_err();
    assert!(err.is_invalid_argument());

    let json = json!({"index": 0, "removed_text": 7});
    let err = TextChange::from_json(&json).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_deserialized_fractional_index_is_invalid_argument() {
    let json = json!({"kind": "text", "index": 1.5, "inserted_text": "x"});
    let err = quire::Error::from(serde_json::from_value::<Change>(json).unwrap_err());
    assert!(err.is_invalid_argument());
    assert!(!err.is_configuration_error());

    let json = json!({"kind": "text", "index": -2});
    let err = quire::Error::from(serde_json::from_value::<Change>(json).unwrap_err());
    assert!(err.is_invalid_argument());
}

#[test]
fn test_malformed_change_json_is_configuration_error() {
    let err = quire::Error::from(serde_json::from_str::<Change>("{\"kind\":").unwrap_err());
    assert!(err.is_configuration_error());
    assert!(!err.is_invalid_argument());
}

#[test]
fn test_text_change_apply_to_multibyte() {
    let change = TextChange::new(1, "é", "e");
    assert!(change.apply_to("café!").unwrap_err().is_range_error());
    assert!(change.apply_to("c").unwrap_err().is_range_error());
    let accented = TextChange::new(3, "é", "e");
    assert_eq!(accented.apply_to("café!").unwrap(), "cafe!");
}

#[test]
fn test_list_changes_replay_in_order() {
    let mut list = ListField::new(vec![json!(1), json!(2), json!(3)]);
    let initial = list.items().to_vec();

    let changes = vec![
        list.insert(-1, json!("x")).unwrap(),
        list.remove(0, 2).unwrap(),
        list.push(json!(true)),
        list.splice(1, 1, vec![json!(null), json!(null)]).unwrap(),
    ];
    let replayed = changes
        .iter()
        .try_fold(initial, |items, change| change.apply_to(&items))
        .unwrap();
    assert_eq!(replayed, list.items());
    let expected = [json!("x"), json!(null), json!(null), json!(true)];
    assert_eq!(list.items(), &expected);
}

#[test]
fn test_list_change_detects_divergence() {
    let change = ListChange {
        index: 0,
        removed_values: vec![json!("a")],
        inserted_values: vec![],
    };
    let err = change.apply_to(&[json!("b")]).unwrap_err();
    assert!(err.is_range_error());
    assert!(change.apply_to(&[]).unwrap_err().is_range_error());
}

#[test]
fn test_map_change_overwrite_and_missing_key() {
    let items = BTreeMap::from([("lang".to_string(), json!("en"))]);
    let change = MapChange {
        removed_items: BTreeMap::from([("lang".to_string(), json!("en"))]),
        added_items: BTreeMap::from([("lang".to_string(), json!("sv"))]),
    };
    let next = change.apply_to(&items).unwrap();
    assert_eq!(next.get("lang"), Some(&json!("sv")));

    assert!(change.apply_to(&next).unwrap_err().is_range_error());
    let err = change.apply_to(&BTreeMap::new()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_value_change_requires_previous() {
    let change = ValueChange {
        previous: json!(1),
        current: json!(2),
    };
    assert_eq!(change.apply_to(&json!(1)).unwrap(), json!(2));
    assert!(change.apply_to(&json!(3)).is_err());
}
