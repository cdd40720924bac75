//! Error types for schema and field descriptor construction.
//!
//! Every variant is a configuration error: it is raised while a schema is
//! being declared or loaded, before any record exists.

use thiserror::Error;

use super::FieldKind;

/// Structured error types for schema construction.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field declares a kind outside the known set
    #[error("Unknown kind '{kind}' for field '{field}'")]
    UnknownKind { field: String, kind: String },

    /// The schema version is not a non-negative integer
    #[error("Invalid schema version: {version}")]
    InvalidVersion { version: String },

    /// A default value is not legal for the field's kind
    #[error("Malformed default for {kind} field '{field}': {reason}")]
    MalformedDefault {
        field: String,
        kind: FieldKind,
        reason: String,
    },

    /// The same field name was declared twice
    #[error("Duplicate field '{field}'")]
    DuplicateField { field: String },

    /// A schema or field name is unusable
    #[error("Invalid name: {reason}")]
    InvalidName { reason: String },

    /// The schema document does not have the expected shape
    #[error("Malformed schema: {reason}")]
    MalformedSchema { reason: String },
}

impl SchemaError {
    /// Schema errors are always configuration errors.
    pub fn is_configuration_error(&self) -> bool {
        true
    }

    /// Check if this error names an unknown field kind
    pub fn is_unknown_kind(&self) -> bool {
        matches!(self, SchemaError::UnknownKind { .. })
    }

    /// Check if this error is about the schema version
    pub fn is_version_error(&self) -> bool {
        matches!(self, SchemaError::InvalidVersion { .. })
    }

    /// Get the field name associated with this error, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaError::UnknownKind { field, .. }
            | SchemaError::MalformedDefault { field, .. }
            | SchemaError::DuplicateField { field } => Some(field),
            _ => None,
        }
    }
}

// Conversion from SchemaError to the main Error type
impl From<SchemaError> for crate::Error {
    fn from(err: SchemaError) -> Self {
        crate::Error::Schema(err)
    }
}
