//! Records: schema-typed instances holding one runtime per field.
//!
//! A [`Record`] is created from a shared [`Schema`], either at every field's
//! declared default ([`Record::new`]) or from a stored JSON snapshot
//! ([`Record::hydrate`]). Mutations go through the typed field accessors and
//! return change records; changes from another replica are replayed with
//! [`Record::apply`], which refuses changes whose origin schema id differs
//! from the record's own.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use quire::change::Change;
//! use quire::record::Record;
//! use quire::schema::{FieldDescriptor, Schema};
//!
//! let schema = Arc::new(
//!     Schema::builder("doc", 1)
//!         .field("body", FieldDescriptor::text())
//!         .build()
//!         .unwrap(),
//! );
//!
//! let mut local = Record::new(schema.clone()).unwrap();
//! let mut remote = Record::new(schema).unwrap();
//!
//! let change: Change = local.text_mut("body").unwrap().append("hello").into();
//! remote.apply(local.schema_id(), "body", &change).unwrap();
//! assert_eq!(remote.text("body").unwrap().to_string(), "hello");
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::Result;
use crate::change::Change;
use crate::field::{FieldError, FieldRuntime, ListField, MapField, TextField, ValueField};
use crate::schema::{FieldKind, Schema, SchemaId};
use crate::sequence::SequenceConfig;

mod errors;

pub use errors::RecordError;

/// One instance of a schema.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    id: SchemaId,
    fields: BTreeMap<String, FieldRuntime>,
}

impl Record {
    /// Create a record with every field at its declared default.
    pub fn new(schema: Arc<Schema>) -> Result<Self> {
        Self::with_config(schema, SequenceConfig::default())
    }

    /// Create a record at its defaults with a custom sequence config for its
    /// text fields.
    pub fn with_config(schema: Arc<Schema>, config: SequenceConfig) -> Result<Self> {
        config.validate()?;
        let mut fields = BTreeMap::new();
        for (name, descriptor) in schema.fields() {
            let field = FieldRuntime::from_descriptor(descriptor, config)?;
            fields.insert(name.to_string(), field);
        }
        Ok(Self {
            id: schema.id(),
            schema,
            fields,
        })
    }

    /// Create a record from a stored JSON object.
    ///
    /// Fields missing from `snapshot` start at their defaults.
    ///
    /// # Errors
    /// Returns [`RecordError::MalformedSnapshot`] if `snapshot` is not an
    /// object or names a field the schema does not declare, and
    /// [`RecordError::KindMismatch`] if a value is not legal for its field.
    pub fn hydrate(schema: Arc<Schema>, snapshot: &Value) -> Result<Self> {
        Self::hydrate_with_config(schema, snapshot, SequenceConfig::default())
    }

    pub fn hydrate_with_config(
        schema: Arc<Schema>,
        snapshot: &Value,
        config: SequenceConfig,
    ) -> Result<Self> {
        config.validate()?;
        let id = schema.id();
        let object = snapshot
            .as_object()
            .ok_or_else(|| RecordError::MalformedSnapshot {
                schema: id.clone(),
                reason: format!("expected an object, found {snapshot}"),
            })?;
        if let Some(unknown) = object.keys().find(|name| schema.field(name).is_none()) {
            return Err(RecordError::MalformedSnapshot {
                schema: id,
                reason: format!("unknown field '{unknown}'"),
            }
            .into());
        }

        let mut fields = BTreeMap::new();
        for (name, descriptor) in schema.fields() {
            let field = match object.get(name) {
                Some(value) => {
                    let kind = descriptor.kind();
                    FieldRuntime::from_json(kind, value.clone(), config)
                        .map_err(|err| with_field_name(err, name))?
                }
                None => FieldRuntime::from_descriptor(descriptor, config)?,
            };
            fields.insert(name.to_string(), field);
        }
        tracing::debug!(schema = %id, fields = fields.len(), "Record hydrated");
        Ok(Self { schema, id, fields })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn schema_id(&self) -> &SchemaId {
        &self.id
    }

    /// Whether this record may exchange changes with `other`.
    pub fn is_compatible(&self, other: &Record) -> bool {
        self.id.is_compatible(&other.id)
    }

    pub fn field(&self, name: &str) -> Result<&FieldRuntime> {
        self.fields
            .get(name)
            .ok_or_else(|| not_found(&self.id, name))
    }

    pub fn field_mut(&mut self, name: &str) -> Result<&mut FieldRuntime> {
        let schema = &self.id;
        self.fields
            .get_mut(name)
            .ok_or_else(|| not_found(schema, name))
    }

    pub fn text(&self, name: &str) -> Result<&TextField> {
        match self.field(name)? {
            FieldRuntime::Text(field) => Ok(field),
            other => Err(mismatch(name, FieldKind::Text, other.kind())),
        }
    }

    pub fn text_mut(&mut self, name: &str) -> Result<&mut TextField> {
        match self.field_mut(name)? {
            FieldRuntime::Text(field) => Ok(field),
            other => Err(mismatch(name, FieldKind::Text, other.kind())),
        }
    }

    pub fn list(&self, name: &str) -> Result<&ListField> {
        match self.field(name)? {
            FieldRuntime::List(field) => Ok(field),
            other => Err(mismatch(name, FieldKind::List, other.kind())),
        }
    }

    pub fn list_mut(&mut self, name: &str) -> Result<&mut ListField> {
        match self.field_mut(name)? {
            FieldRuntime::List(field) => Ok(field),
            other => Err(mismatch(name, FieldKind::List, other.kind())),
        }
    }

    pub fn map(&self, name: &str) -> Result<&MapField> {
        match self.field(name)? {
            FieldRuntime::Map(field) => Ok(field),
            other => Err(mismatch(name, FieldKind::Map, other.kind())),
        }
    }

    pub fn map_mut(&mut self, name: &str) -> Result<&mut MapField> {
        match self.field_mut(name)? {
            FieldRuntime::Map(field) => Ok(field),
            other => Err(mismatch(name, FieldKind::Map, other.kind())),
        }
    }

    pub fn value(&self, name: &str) -> Result<&ValueField> {
        match self.field(name)? {
            FieldRuntime::Value(field) => Ok(field),
            other => Err(mismatch(name, FieldKind::Value, other.kind())),
        }
    }

    pub fn value_mut(&mut self, name: &str) -> Result<&mut ValueField> {
        match self.field_mut(name)? {
            FieldRuntime::Value(field) => Ok(field),
            other => Err(mismatch(name, FieldKind::Value, other.kind())),
        }
    }

    /// Replay a change produced by a record of schema `origin`.
    ///
    /// # Errors
    /// Returns [`RecordError::IncompatibleSchema`] when `origin` differs from
    /// this record's schema id, and the field's own errors when the change
    /// does not fit its current content.
    pub fn apply(&mut self, origin: &SchemaId, field: &str, change: &Change) -> Result<Change> {
        if !self.id.is_compatible(origin) {
            tracing::warn!(
                record = %self.id,
                origin = %origin,
                field,
                "Refusing change from incompatible schema"
            );
            return Err(RecordError::IncompatibleSchema {
                expected: self.id.clone(),
                actual: origin.clone(),
            }
            .into());
        }
        self.field_mut(field)?
            .apply(change)
            .map_err(|err| with_field_name(err, field))
    }

    /// The record's full content as a JSON object keyed by field name.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, field)| (name.clone(), field.to_json()))
                .collect(),
        )
    }
}

fn not_found(schema: &SchemaId, field: &str) -> crate::Error {
    RecordError::FieldNotFound {
        schema: schema.clone(),
        field: field.to_string(),
    }
    .into()
}

fn mismatch(field: &str, expected: FieldKind, actual: FieldKind) -> crate::Error {
    RecordError::KindMismatch {
        field: field.to_string(),
        expected,
        actual,
    }
    .into()
}

/// Attach the field name to a kind mismatch raised by a field runtime.
fn with_field_name(err: crate::Error, field: &str) -> crate::Error {
    match err {
        crate::Error::Field(FieldError::KindMismatch { expected, actual }) => {
            mismatch(field, expected, actual)
        }
        other => other,
    }
}
