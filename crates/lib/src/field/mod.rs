//! Field runtimes: the mutable per-record state behind each schema field.
//!
//! Each [`FieldKind`] has one runtime type. [`FieldRuntime`] is the tagged
//! union a [`Record`](crate::record::Record) holds per field, created from a
//! [`FieldDescriptor`]'s default or from a hydrated JSON value.
//!
//! All runtimes follow the same pattern: reads borrow, and every mutation
//! returns the change record describing it.

use serde_json::Value;

use crate::Result;
use crate::change::Change;
use crate::schema::{FieldDescriptor, FieldKind};
use crate::sequence::SequenceConfig;

mod errors;
mod list;
mod map;
mod text;
mod value;

pub use errors::FieldError;
pub use list::ListField;
pub use map::MapField;
pub use text::TextField;
pub use value::ValueField;

/// The runtime state of one field, by kind.
#[derive(Debug, Clone)]
pub enum FieldRuntime {
    Value(ValueField),
    List(ListField),
    Map(MapField),
    Text(TextField),
}

impl FieldRuntime {
    /// Instantiate a field at its declared default.
    pub fn from_descriptor(descriptor: &FieldDescriptor, config: SequenceConfig) -> Result<Self> {
        Ok(match descriptor {
            FieldDescriptor::Value(value) => FieldRuntime::Value(ValueField::new(value.clone())),
            FieldDescriptor::List(items) => FieldRuntime::List(ListField::new(items.clone())),
            FieldDescriptor::Map(items) => FieldRuntime::Map(MapField::new(items.clone())),
            FieldDescriptor::Text(text) => {
                FieldRuntime::Text(TextField::with_config(text, config)?)
            }
        })
    }

    /// Instantiate a field of `kind` from a stored JSON value.
    ///
    /// # Errors
    /// Returns [`FieldError::KindMismatch`] when `value` is not legal for
    /// `kind`.
    pub fn from_json(kind: FieldKind, value: Value, config: SequenceConfig) -> Result<Self> {
        Ok(match (kind, value) {
            (FieldKind::Value, value) => FieldRuntime::Value(ValueField::new(value)),
            (FieldKind::List, Value::Array(items)) => FieldRuntime::List(ListField::new(items)),
            (FieldKind::Map, Value::Object(items)) => {
                FieldRuntime::Map(MapField::new(items.into_iter().collect()))
            }
            (FieldKind::Text, Value::String(text)) => {
                FieldRuntime::Text(TextField::with_config(&text, config)?)
            }
            (expected, value) => {
                return Err(FieldError::KindMismatch {
                    expected,
                    actual: json_kind(&value),
                }
                .into());
            }
        })
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldRuntime::Value(_) => FieldKind::Value,
            FieldRuntime::List(_) => FieldKind::List,
            FieldRuntime::Map(_) => FieldKind::Map,
            FieldRuntime::Text(_) => FieldKind::Text,
        }
    }

    /// Current content as plain JSON.
    pub fn to_json(&self) -> Value {
        match self {
            FieldRuntime::Value(field) => field.get().clone(),
            FieldRuntime::List(field) => Value::Array(field.items().to_vec()),
            FieldRuntime::Map(field) => Value::Object(
                field
                    .items()
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
            FieldRuntime::Text(field) => Value::String(field.to_string()),
        }
    }

    /// Replay a change of the matching kind.
    pub fn apply(&mut self, change: &Change) -> Result<Change> {
        match (self, change) {
            (FieldRuntime::Value(field), Change::Value(change)) => Ok(field.apply(change)?.into()),
            (FieldRuntime::List(field), Change::List(change)) => Ok(field.apply(change)?.into()),
            (FieldRuntime::Map(field), Change::Map(change)) => Ok(field.apply(change)?.into()),
            (FieldRuntime::Text(field), Change::Text(change)) => Ok(field.apply(change)?.into()),
            (field, change) => Err(FieldError::KindMismatch {
                expected: field.kind(),
                actual: change.kind(),
            }
            .into()),
        }
    }
}

/// The field kind a JSON value would naturally hydrate into.
fn json_kind(value: &Value) -> FieldKind {
    match value {
        Value::Array(_) => FieldKind::List,
        Value::Object(_) => FieldKind::Map,
        Value::String(_) => FieldKind::Text,
        _ => FieldKind::Value,
    }
}
