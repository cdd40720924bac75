//! Field kinds and their immutable descriptors.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SchemaError;

/// The closed set of field kinds a schema can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A single scalar or opaque JSON value, replaced wholesale
    Value,
    /// An ordered sequence of values
    List,
    /// String-keyed values
    Map,
    /// Collaboratively edited text
    Text,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Value => "value",
            FieldKind::List => "list",
            FieldKind::Map => "map",
            FieldKind::Text => "text",
        }
    }

    /// Whether `value` is a legal JSON representation for this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Value => true,
            FieldKind::List => value.is_array(),
            FieldKind::Map => value.is_object(),
            FieldKind::Text => value.is_string(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "value" => Ok(FieldKind::Value),
            "list" => Ok(FieldKind::List),
            "map" => Ok(FieldKind::Map),
            "text" => Ok(FieldKind::Text),
            other => Err(other.to_string()),
        }
    }
}

/// Immutable declaration of one field: its kind and its default value.
///
/// The kind is the enum discriminant, so it cannot change after
/// construction, and each variant's payload type only admits defaults that
/// are legal for that kind.
///
/// ```
/// use quire::schema::{FieldDescriptor, FieldKind};
///
/// let body = FieldDescriptor::text();
/// assert_eq!(body.kind(), FieldKind::Text);
/// assert_eq!(body.default_json(), serde_json::json!(""));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "default", rename_all = "lowercase")]
pub enum FieldDescriptor {
    Value(Value),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Text(String),
}

impl FieldDescriptor {
    /// A value field defaulting to `null`.
    pub fn value() -> Self {
        FieldDescriptor::Value(Value::Null)
    }

    pub fn value_with(default: impl Into<Value>) -> Self {
        FieldDescriptor::Value(default.into())
    }

    /// A list field defaulting to the empty list.
    pub fn list() -> Self {
        FieldDescriptor::List(Vec::new())
    }

    pub fn list_with(default: Vec<Value>) -> Self {
        FieldDescriptor::List(default)
    }

    /// A map field defaulting to the empty map.
    pub fn map() -> Self {
        FieldDescriptor::Map(BTreeMap::new())
    }

    pub fn map_with(default: BTreeMap<String, Value>) -> Self {
        FieldDescriptor::Map(default)
    }

    /// A text field defaulting to the empty string.
    pub fn text() -> Self {
        FieldDescriptor::Text(String::new())
    }

    pub fn text_with(default: impl Into<String>) -> Self {
        FieldDescriptor::Text(default.into())
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldDescriptor::Value(_) => FieldKind::Value,
            FieldDescriptor::List(_) => FieldKind::List,
            FieldDescriptor::Map(_) => FieldKind::Map,
            FieldDescriptor::Text(_) => FieldKind::Text,
        }
    }

    /// The default value as plain JSON.
    pub fn default_json(&self) -> Value {
        match self {
            FieldDescriptor::Value(value) => value.clone(),
            FieldDescriptor::List(items) => Value::Array(items.clone()),
            FieldDescriptor::Map(items) => Value::Object(
                items
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
            FieldDescriptor::Text(text) => Value::String(text.clone()),
        }
    }

    /// Parse a descriptor from `{"kind": ..., "default": ...}`.
    ///
    /// A missing or `null` default falls back to the kind's empty value.
    ///
    /// # Errors
    /// Returns [`SchemaError::UnknownKind`] for an unrecognised kind and
    /// [`SchemaError::MalformedDefault`] when the default has the wrong
    /// shape for the kind.
    pub fn from_json(field: &str, declaration: &Value) -> Result<Self, SchemaError> {
        let object = declaration
            .as_object()
            .ok_or_else(|| SchemaError::MalformedSchema {
                reason: format!("field '{field}' must be an object, found {declaration}"),
            })?;
        let kind = object
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::MalformedSchema {
                reason: format!("field '{field}' is missing a string 'kind'"),
            })?;
        let kind = kind
            .parse::<FieldKind>()
            .map_err(|kind| SchemaError::UnknownKind {
                field: field.to_string(),
                kind,
            })?;

        let default = match object.get("default") {
            None | Some(Value::Null) if kind != FieldKind::Value => None,
            other => other.cloned(),
        };
        let Some(default) = default else {
            return Ok(Self::empty(kind));
        };
        if !kind.accepts(&default) {
            return Err(SchemaError::MalformedDefault {
                field: field.to_string(),
                kind,
                reason: format!("{default} is not a legal {kind} value"),
            });
        }
        Ok(match (kind, default) {
            (FieldKind::List, Value::Array(items)) => FieldDescriptor::List(items),
            (FieldKind::Map, Value::Object(items)) => {
                FieldDescriptor::Map(items.into_iter().collect())
            }
            (FieldKind::Text, Value::String(text)) => FieldDescriptor::Text(text),
            (_, value) => FieldDescriptor::Value(value),
        })
    }

    fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Value => Self::value(),
            FieldKind::List => Self::list(),
            FieldKind::Map => Self::map(),
            FieldKind::Text => Self::text(),
        }
    }
}
