//! Error types for field runtime operations.

use thiserror::Error;

use crate::schema::FieldKind;

/// Structured error types for field runtimes and change replay.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A change or value of one kind was offered to a field of another
    #[error("Field kind mismatch: expected {expected}, found {actual}")]
    KindMismatch {
        expected: FieldKind,
        actual: FieldKind,
    },

    /// A change does not describe the field's current content
    #[error("Change does not match current content: {reason}")]
    ChangeMismatch { reason: String },

    /// A change record received from outside is malformed
    #[error("Malformed change record: {reason}")]
    MalformedChange { reason: String },

    /// A map key was not present
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },
}

impl FieldError {
    /// Mismatched changes count as range errors
    pub fn is_range_error(&self) -> bool {
        matches!(self, FieldError::ChangeMismatch { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, FieldError::MalformedChange { .. })
    }

    pub fn is_type_error(&self) -> bool {
        matches!(self, FieldError::KindMismatch { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FieldError::KeyNotFound { .. })
    }
}

// Conversion from FieldError to the main Error type
impl From<FieldError> for crate::Error {
    fn from(err: FieldError) -> Self {
        crate::Error::Field(err)
    }
}
