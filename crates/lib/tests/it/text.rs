//! Text field runtime and the change records it emits.

use quire::{SequenceConfig, TextChange, TextField};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::helpers::{random_text, replay};

#[test]
fn test_assign_then_insert() {
    let mut text = TextField::new();
    text.assign("hello");
    let change = text.insert(5, " world").unwrap();

    assert_eq!(text.to_string(), "hello world");
    assert_eq!(change, TextChange::new(5, "", " world"));
}

#[test]
fn test_splice_replaces_prefix() {
    let mut text = TextField::from("hello world");
    let change = text.splice(0, 5, "HI").unwrap();

    assert_eq!(text.to_string(), "HI world");
    assert_eq!(change, TextChange::new(0, "hello", "HI"));
}

#[test]
fn test_char_at_negative() {
    let text = TextField::from("abc");
    assert_eq!(text.char_at(-1).unwrap(), 'c');
}

#[test]
fn test_slice_negative_start() {
    let text = TextField::from("abcdef");
    assert_eq!(text.slice(Some(-3), None), "def");
}

#[test]
fn test_remove_from_empty_is_range_error() {
    let mut text = TextField::new();
    let err = text.remove(0, 1).unwrap_err();

    assert!(err.is_range_error());
    assert!(!err.is_configuration_error());
    assert_eq!(text.to_string(), "");
    assert!(text.is_empty());
}

#[test]
fn test_replayed_changes_reproduce_content() {
    let config = SequenceConfig {
        max_leaf_chars: 4,
        ..SequenceConfig::default()
    };
    for seed in 0..6u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let initial = random_text(&mut rng, 30);
        let mut text = TextField::with_config(&initial, config).unwrap();
        let mut changes = Vec::new();

        for _ in 0..200 {
            let len = text.len();
            let change = match rng.gen_range(0..3) {
                0 => {
                    let at = rng.gen_range(0..=len) as isize;
                    text.insert(at, &random_text(&mut rng, 5)).unwrap()
                }
                1 if len > 0 => {
                    let at = rng.gen_range(0..len);
                    let count = rng.gen_range(1..=(len - at).min(4));
                    // Address from the end half of the time.
                    let index = if rng.gen_bool(0.5) {
                        at as isize - len as isize
                    } else {
                        at as isize
                    };
                    text.remove(index, count).unwrap()
                }
                _ => {
                    let at = rng.gen_range(0..=len);
                    let count = rng.gen_range(0..=(len - at).min(3));
                    let inserted = random_text(&mut rng, 3);
                    text.splice(at as isize, count, &inserted).unwrap()
                }
            };
            // Length invariant
            let full = text.slice(Some(0), Some(text.len() as isize));
            assert_eq!(text.len(), full.chars().count());
            changes.push(change);
        }

        assert_eq!(replay(&initial, &changes), text.to_string());
    }
}

#[test]
fn test_peer_converges_by_applying_changes() {
    let mut local = TextField::from("shared draft");
    let mut remote = TextField::from("shared draft");

    let edits = vec![
        local.insert(0, "A ").unwrap(),
        local.splice(-5, 5, "text").unwrap(),
        local.append("!"),
        local.remove(2, 7).unwrap(),
    ];
    for change in &edits {
        remote.apply(change).unwrap();
    }
    assert_eq!(remote.to_string(), local.to_string());
    assert_eq!(local.to_string(), "A text!");
}

#[test]
fn test_apply_rejects_stale_change() {
    let mut text = TextField::from("abc");
    let stale = TextChange::new(1, "x", "y");
    let err = text.apply(&stale).unwrap_err();
    assert!(err.is_range_error());
    assert_eq!(text.to_string(), "abc");

    let past_end = TextChange::new(3, "d", "");
    assert!(text.apply(&past_end).is_err());
}

#[test]
fn test_inverse_undoes_edit() {
    let mut text = TextField::from("undo me");
    let change = text.splice(0, 4, "redo").unwrap();
    text.apply(&change.inverse()).unwrap();
    assert_eq!(text.to_string(), "undo me");
}

#[test]
fn test_clear_is_idempotent() {
    let mut text = TextField::from("something");
    let first = text.clear();
    assert_eq!(first, TextChange::new(0, "something", ""));

    let second = text.clear();
    assert!(text.is_empty());
    assert_eq!(second.removed_text, "");
    assert_eq!(second.inserted_text, "");
    assert!(second.is_noop());
}

#[test]
fn test_multibyte_indices_count_chars() {
    let mut text = TextField::from("🦀 crab");
    assert_eq!(text.len(), 6);
    let change = text.insert(1, "🦀").unwrap();
    assert_eq!(change.index, 1);
    assert_eq!(text.slice(Some(0), Some(2)), "🦀🦀");
}
