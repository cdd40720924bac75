//!
//! Quire: typed, schema-described records with change-emitting field runtimes.
//!
//! ## Core Concepts
//!
//! * **Schemas (`schema::Schema`)**: A named, versioned set of typed field
//!   descriptors. Two records may exchange changes only when their schema
//!   name and version both match.
//! * **Sequences (`sequence::Sequence`)**: A weight-balanced tree of text
//!   chunks giving logarithmic positional access, insertion and removal.
//! * **Field runtimes (`field`)**: The mutable per-record state behind each
//!   field kind. Text fields are backed by a sequence.
//! * **Changes (`change::Change`)**: Every mutation returns a record of what
//!   was removed and what was inserted, enough to replay the edit on another
//!   replica holding the same content.
//! * **Records (`record::Record`)**: One instance of a schema, holding a
//!   runtime per declared field.

pub mod change;
pub mod field;
pub mod record;
pub mod schema;
pub mod sequence;

pub use change::{Change, ListChange, MapChange, TextChange, ValueChange};
pub use field::{FieldRuntime, TextField};
pub use record::Record;
pub use schema::{FieldDescriptor, FieldKind, Schema, SchemaId};
pub use sequence::{Sequence, SequenceConfig};

/// Result type used throughout the Quire library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Quire library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured schema errors from the schema module
    #[error(transparent)]
    Schema(schema::SchemaError),

    /// Structured sequence errors from the sequence module
    #[error(transparent)]
    Sequence(sequence::SequenceError),

    /// Structured field runtime errors from the field module
    #[error(transparent)]
    Field(field::FieldError),

    /// Structured record errors from the record module
    #[error(transparent)]
    Record(record::RecordError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Schema(_) => "schema",
            Error::Sequence(_) => "sequence",
            Error::Field(_) => "field",
            Error::Record(_) => "record",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error is an index or range outside the current content.
    pub fn is_range_error(&self) -> bool {
        match self {
            Error::Sequence(sequence_err) => sequence_err.is_range_error(),
            Error::Field(field_err) => field_err.is_range_error(),
            _ => false,
        }
    }

    /// Check if this error is a malformed argument, such as a fractional offset.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Sequence(sequence_err) => sequence_err.is_invalid_argument(),
            Error::Field(field_err) => field_err.is_invalid_argument(),
            Error::Serialize(serde_err) => serde_err.is_data(),
            _ => false,
        }
    }

    /// Check if this error was raised while building a schema, config or record.
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Error::Schema(schema_err) => schema_err.is_configuration_error(),
            Error::Sequence(sequence_err) => sequence_err.is_configuration_error(),
            Error::Record(record_err) => record_err.is_configuration_error(),
            Error::Serialize(serde_err) => !serde_err.is_data(),
            _ => false,
        }
    }

    /// Check if this error is a missing field or key.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Field(field_err) => field_err.is_not_found(),
            Error::Record(record_err) => record_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is a field kind mismatch.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Field(field_err) => field_err.is_type_error(),
            Error::Record(record_err) => record_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error is a change refused for its origin schema.
    pub fn is_incompatible_schema(&self) -> bool {
        matches!(
            self,
            Error::Record(record_err) if record_err.is_incompatible()
        )
    }
}
