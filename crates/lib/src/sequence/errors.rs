//! Error types for sequence operations.
//!
//! Sequence errors fall into three groups: range errors (an offset or count
//! outside the valid domain), invalid arguments (offsets that are not
//! integers), and configuration errors for a malformed [`SequenceConfig`].
//!
//! [`SequenceConfig`]: super::SequenceConfig

use thiserror::Error;

/// Structured error types for [`Sequence`](super::Sequence) operations.
///
/// Every failing operation leaves the sequence exactly as it was before the
/// call.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// A single index resolved outside the valid domain
    #[error("Index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    /// A range `[index, index + count)` extends past the end of the sequence
    #[error("Range at {index} with count {count} out of range for sequence of length {len}")]
    RangeOutOfBounds {
        index: usize,
        count: usize,
        len: usize,
    },

    /// An externally supplied offset or count is not an integer
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// The sequence configuration is malformed
    #[error("Invalid sequence configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl SequenceError {
    /// Check if this error is a range error
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            SequenceError::IndexOutOfRange { .. } | SequenceError::RangeOutOfBounds { .. }
        )
    }

    /// Check if this error is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SequenceError::InvalidArgument { .. })
    }

    /// Check if this error comes from a malformed configuration
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, SequenceError::InvalidConfig { .. })
    }

    /// Get the argument name if this is an invalid-argument error
    pub fn argument(&self) -> Option<&str> {
        match self {
            SequenceError::InvalidArgument { argument, .. } => Some(argument),
            _ => None,
        }
    }
}

// Conversion from SequenceError to the main Error type
impl From<SequenceError> for crate::Error {
    fn from(err: SequenceError) -> Self {
        crate::Error::Sequence(err)
    }
}
