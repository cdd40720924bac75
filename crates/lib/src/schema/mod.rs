//! Schemas: named, versioned collections of field descriptors.
//!
//! A [`Schema`] fixes the shape of a record before any record exists. Its
//! `(name, version)` pair, exposed as a [`SchemaId`], is the only thing peers
//! compare when deciding whether two records can exchange changes. Any change
//! to the field set must come with a new version, and records whose ids differ
//! are never merged.
//!
//! Schemas are immutable once built. Share one between records with
//! [`std::sync::Arc`].
//!
//! # Examples
//!
//! ```
//! use quire::schema::{FieldDescriptor, Schema};
//!
//! let v1 = Schema::builder("doc", 1)
//!     .field("title", FieldDescriptor::text_with("Untitled"))
//!     .field("body", FieldDescriptor::text())
//!     .build()
//!     .unwrap();
//!
//! let loaded: Schema = serde_json::from_value(serde_json::json!({
//!     "name": "doc",
//!     "version": 2,
//!     "fields": {"body": {"kind": "text"}},
//! }))
//! .unwrap();
//!
//! assert!(!v1.is_compatible(&loaded));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

mod errors;
mod field;

pub use errors::SchemaError;
pub use field::{FieldDescriptor, FieldKind};

/// The compatibility key of a schema.
///
/// Two records may exchange changes only when their ids are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaId {
    pub name: String,
    pub version: u64,
}

impl SchemaId {
    pub fn new(name: impl Into<String>, version: u64) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Whether records under `self` and `other` may be merged.
    pub fn is_compatible(&self, other: &SchemaId) -> bool {
        self == other
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@v{}", self.name, self.version)
    }
}

/// An immutable, named and versioned set of field descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Schema {
    name: String,
    version: u64,
    fields: BTreeMap<String, FieldDescriptor>,
}

impl Schema {
    /// Start declaring a schema.
    pub fn builder(name: impl Into<String>, version: u64) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            version,
            fields: Vec::new(),
        }
    }

    /// Load a schema from its JSON document form.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] if the document is not an object, the name
    /// is missing or empty, the version is not a non-negative integer, or any
    /// field descriptor is invalid.
    pub fn from_json(document: &Value) -> Result<Self, SchemaError> {
        let object = document
            .as_object()
            .ok_or_else(|| SchemaError::MalformedSchema {
                reason: format!("expected an object, found {document}"),
            })?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::MalformedSchema {
                reason: "missing string 'name'".to_string(),
            })?;
        let version = match object.get("version") {
            Some(version) => version
                .as_u64()
                .ok_or_else(|| SchemaError::InvalidVersion {
                    version: version.to_string(),
                })?,
            None => {
                return Err(SchemaError::InvalidVersion {
                    version: "missing".to_string(),
                });
            }
        };

        let mut builder = Schema::builder(name, version);
        match object.get("fields") {
            Some(Value::Object(fields)) => {
                for (field, declaration) in fields {
                    let descriptor = FieldDescriptor::from_json(field, declaration)?;
                    builder = builder.field(field.clone(), descriptor);
                }
            }
            None => {}
            Some(other) => {
                return Err(SchemaError::MalformedSchema {
                    reason: format!("'fields' must be an object, found {other}"),
                });
            }
        }
        builder.build()
    }

    /// The JSON document form accepted by [`Schema::from_json`].
    pub fn to_json(&self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn id(&self) -> SchemaId {
        SchemaId::new(self.name.clone(), self.version)
    }

    /// Whether records of `self` and `other` may exchange changes.
    pub fn is_compatible(&self, other: &Schema) -> bool {
        self.name == other.name && self.version == other.version
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Iterate over fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Value> for Schema {
    type Error = SchemaError;

    fn try_from(document: Value) -> Result<Self, Self::Error> {
        Schema::from_json(&document)
    }
}

/// Collects fields for a [`Schema`] and validates them on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    version: u64,
    fields: Vec<(String, FieldDescriptor)>,
}

impl SchemaBuilder {
    pub fn field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.push((name.into(), descriptor));
        self
    }

    /// Validate the declaration and freeze it.
    ///
    /// # Errors
    /// Returns [`SchemaError::InvalidName`] for an empty schema or field name
    /// and [`SchemaError::DuplicateField`] when a name is declared twice.
    pub fn build(self) -> Result<Schema, SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::InvalidName {
                reason: "schema name is empty".to_string(),
            });
        }
        let mut fields = BTreeMap::new();
        for (name, descriptor) in self.fields {
            if name.is_empty() {
                return Err(SchemaError::InvalidName {
                    reason: format!("empty field name in schema '{}'", self.name),
                });
            }
            if fields.contains_key(&name) {
                return Err(SchemaError::DuplicateField { field: name });
            }
            fields.insert(name, descriptor);
        }

        let schema = Schema {
            name: self.name,
            version: self.version,
            fields,
        };
        tracing::debug!(
            schema = %schema.id(),
            fields = schema.len(),
            "Schema created"
        );
        Ok(schema)
    }
}
