//! Change records emitted by field runtimes.
//!
//! Every mutating call on a field produces exactly one change record
//! describing its net effect. Records are plain values with no link back to
//! the field that produced them, so they can be queued, sent to other
//! threads, or handed to a merge layer. Applying a record to the content it
//! was produced from yields the content after the mutation; each record type
//! has an `apply_to` that does this against a plain value and checks that the
//! removed part matches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;
use crate::field::FieldError;
use crate::schema::FieldKind;
use crate::sequence::{SequenceError, count_from_json};

/// Net effect of one text mutation: at `index`, `removed_text` was replaced
/// by `inserted_text`. Indices count characters.
///
/// Deserializing goes through [`TextChange::from_json`], so a fractional or
/// negative `index` fails the same way on both paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "Value")]
pub struct TextChange {
    pub index: usize,
    pub removed_text: String,
    pub inserted_text: String,
}

impl TextChange {
    pub fn new(
        index: usize,
        removed_text: impl Into<String>,
        inserted_text: impl Into<String>,
    ) -> Self {
        Self {
            index,
            removed_text: removed_text.into(),
            inserted_text: inserted_text.into(),
        }
    }

    /// Whether applying this change leaves content untouched.
    pub fn is_noop(&self) -> bool {
        self.removed_text == self.inserted_text
    }

    /// The change that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            index: self.index,
            removed_text: self.inserted_text.clone(),
            inserted_text: self.removed_text.clone(),
        }
    }

    /// Replay this change onto `content`.
    ///
    /// # Errors
    /// Returns a range error if the removed span runs past the end of
    /// `content` or does not match `removed_text`.
    pub fn apply_to(&self, content: &str) -> Result<String> {
        let len = content.chars().count();
        let count = self.removed_text.chars().count();
        if self.index.checked_add(count).is_none_or(|end| end > len) {
            return Err(SequenceError::RangeOutOfBounds {
                index: self.index,
                count,
                len,
            }
            .into());
        }
        let from = char_to_byte(content, self.index);
        let to = char_to_byte(content, self.index + count);
        if content[from..to] != self.removed_text {
            return Err(FieldError::ChangeMismatch {
                reason: format!(
                    "expected {:?} at {}, found {:?}",
                    self.removed_text,
                    self.index,
                    &content[from..to]
                ),
            }
            .into());
        }
        let capacity = content.len() - (to - from) + self.inserted_text.len();
        let mut out = String::with_capacity(capacity);
        out.push_str(&content[..from]);
        out.push_str(&self.inserted_text);
        out.push_str(&content[to..]);
        Ok(out)
    }

    /// Parse a change received from outside the process.
    ///
    /// Missing text fields are treated as empty.
    ///
    /// # Errors
    /// Returns an invalid-argument error when `index` is not a non-negative
    /// integer, and [`FieldError::MalformedChange`] for non-string text.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| FieldError::MalformedChange {
                reason: format!("expected an object, found {value}"),
            })?;
        let index = object.get("index").unwrap_or(&Value::Null);
        let index = count_from_json(index, "index")?;
        Ok(Self {
            index,
            removed_text: text_member(object, "removed_text")?,
            inserted_text: text_member(object, "inserted_text")?,
        })
    }
}

impl TryFrom<Value> for TextChange {
    type Error = crate::Error;

    fn try_from(value: Value) -> Result<Self> {
        TextChange::from_json(&value)
    }
}

fn text_member(object: &serde_json::Map<String, Value>, key: &str) -> Result<String> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(FieldError::MalformedChange {
            reason: format!("'{key}' must be a string, found {other}"),
        }
        .into()),
    }
}

fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Net effect of one list mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ListChange {
    pub index: usize,
    pub removed_values: Vec<Value>,
    pub inserted_values: Vec<Value>,
}

impl ListChange {
    pub fn apply_to(&self, items: &[Value]) -> Result<Vec<Value>> {
        let count = self.removed_values.len();
        let end = self
            .index
            .checked_add(count)
            .filter(|&end| end <= items.len())
            .ok_or(SequenceError::RangeOutOfBounds {
                index: self.index,
                count,
                len: items.len(),
            })?;
        if items[self.index..end] != self.removed_values[..] {
            return Err(FieldError::ChangeMismatch {
                reason: format!(
                    "list items at {} differ from the removed values",
                    self.index
                ),
            }
            .into());
        }
        let capacity = items.len() - count + self.inserted_values.len();
        let mut next = Vec::with_capacity(capacity);
        next.extend_from_slice(&items[..self.index]);
        next.extend(self.inserted_values.iter().cloned());
        next.extend_from_slice(&items[end..]);
        Ok(next)
    }
}

/// Net effect of one map mutation. A key present in both maps was
/// overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MapChange {
    pub removed_items: BTreeMap<String, Value>,
    pub added_items: BTreeMap<String, Value>,
}

impl MapChange {
    pub fn apply_to(&self, items: &BTreeMap<String, Value>) -> Result<BTreeMap<String, Value>> {
        let mut next = items.clone();
        for (key, value) in &self.removed_items {
            match next.remove(key) {
                Some(current) if current == *value => {}
                Some(current) => {
                    return Err(FieldError::ChangeMismatch {
                        reason: format!("key '{key}' holds {current}, expected {value}"),
                    }
                    .into());
                }
                None => return Err(FieldError::KeyNotFound { key: key.clone() }.into()),
            }
        }
        for (key, value) in &self.added_items {
            next.insert(key.clone(), value.clone());
        }
        Ok(next)
    }
}

/// Net effect of replacing a value field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ValueChange {
    pub previous: Value,
    pub current: Value,
}

impl ValueChange {
    pub fn apply_to(&self, value: &Value) -> Result<Value> {
        if *value != self.previous {
            return Err(FieldError::ChangeMismatch {
                reason: format!("value is {value}, expected {}", self.previous),
            }
            .into());
        }
        Ok(self.current.clone())
    }
}

/// A change record of any field kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Change {
    Value(ValueChange),
    List(ListChange),
    Map(MapChange),
    Text(TextChange),
}

impl Change {
    pub fn kind(&self) -> FieldKind {
        match self {
            Change::Value(_) => FieldKind::Value,
            Change::List(_) => FieldKind::List,
            Change::Map(_) => FieldKind::Map,
            Change::Text(_) => FieldKind::Text,
        }
    }
}

impl From<ValueChange> for Change {
    fn from(change: ValueChange) -> Self {
        Change::Value(change)
    }
}

impl From<ListChange> for Change {
    fn from(change: ListChange) -> Self {
        Change::List(change)
    }
}

impl From<MapChange> for Change {
    fn from(change: MapChange) -> Self {
        Change::Map(change)
    }
}

impl From<TextChange> for Change {
    fn from(change: TextChange) -> Self {
        Change::Text(change)
    }
}
