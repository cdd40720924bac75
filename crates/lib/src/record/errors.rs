//! Error types for record operations.

use thiserror::Error;

use crate::schema::{FieldKind, SchemaId};

/// Structured error types for [`Record`](super::Record) operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The schema declares no field with this name
    #[error("Field not found in schema '{schema}': {field}")]
    FieldNotFound { schema: SchemaId, field: String },

    /// The field exists but has a different kind than requested
    #[error("Field '{field}' is a {actual} field, not {expected}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },

    /// A change originates from a record of another schema identity
    #[error("Incompatible schema: record is {expected}, change is from {actual}")]
    IncompatibleSchema {
        expected: SchemaId,
        actual: SchemaId,
    },

    /// A hydration snapshot does not have the expected shape
    #[error("Malformed snapshot for schema '{schema}': {reason}")]
    MalformedSnapshot { schema: SchemaId, reason: String },
}

impl RecordError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::FieldNotFound { .. })
    }

    pub fn is_type_error(&self) -> bool {
        matches!(self, RecordError::KindMismatch { .. })
    }

    pub fn is_incompatible(&self) -> bool {
        matches!(self, RecordError::IncompatibleSchema { .. })
    }

    /// A malformed snapshot is a configuration error at hydration time.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, RecordError::MalformedSnapshot { .. })
    }

    /// Get the field name associated with this error, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            RecordError::FieldNotFound { field, .. } | RecordError::KindMismatch { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }
}

// Conversion from RecordError to the main Error type
impl From<RecordError> for crate::Error {
    fn from(err: RecordError) -> Self {
        crate::Error::Record(err)
    }
}
