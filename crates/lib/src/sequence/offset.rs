//! Logical offsets and their resolution against a sequence length.
//!
//! Offsets may be negative, in which case they count back from the end:
//! `-1` is the last character. Offsets received from outside the process
//! (JSON change records, scripting hosts) arrive as numbers that might not be
//! integers; [`Offset`] and [`count_from_json`] reject those with an
//! invalid-argument error instead of truncating them.

use std::fmt;

use serde_json::Value;

use super::SequenceError;

/// A possibly negative logical offset into a sequence.
///
/// ```
/// use quire::sequence::Offset;
///
/// assert_eq!(Offset::new(-1).resolve(3), Some(2));
/// assert_eq!(Offset::new(-4).resolve(3), None);
/// assert!(Offset::try_from(1.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset(isize);

impl Offset {
    pub fn new(offset: isize) -> Self {
        Self(offset)
    }

    /// The raw signed offset.
    pub fn get(self) -> isize {
        self.0
    }

    /// Resolve against `len`, returning `None` when a negative offset reaches
    /// before the start. The upper bound is left to the caller.
    pub fn resolve(self, len: usize) -> Option<usize> {
        resolve(self.0, len)
    }

    /// Parse an offset from a JSON number.
    pub fn from_json(value: &Value, argument: &str) -> Result<Self, SequenceError> {
        if let Some(i) = value.as_i64() {
            return match isize::try_from(i) {
                Ok(offset) => Ok(Self(offset)),
                Err(_) => Err(too_large(argument, i)),
            };
        }
        match value.as_f64() {
            Some(f) => Self::from_f64(f, argument),
            None => {
                let reason = format!("expected a number, found {value}");
                Err(invalid(argument, reason))
            }
        }
    }

    fn from_f64(value: f64, argument: &str) -> Result<Self, SequenceError> {
        if !value.is_finite() || value.fract() != 0.0 {
            let reason = format!("{value} is not an integer");
            return Err(invalid(argument, reason));
        }
        // `isize::MIN` is a power of two, so both bounds are exact as f64.
        let bound = -(isize::MIN as f64);
        if value < -bound || value >= bound {
            return Err(too_large(argument, value));
        }
        Ok(Self(value as isize))
    }
}

impl From<isize> for Offset {
    fn from(offset: isize) -> Self {
        Self(offset)
    }
}

impl TryFrom<f64> for Offset {
    type Error = SequenceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value, "offset")
    }
}

/// Parse a non-negative count from a JSON number.
pub fn count_from_json(value: &Value, argument: &str) -> Result<usize, SequenceError> {
    let offset = Offset::from_json(value, argument)?.get();
    match usize::try_from(offset) {
        Ok(count) => Ok(count),
        Err(_) => Err(invalid(argument, format!("{offset} is negative"))),
    }
}

/// `offset < 0 ? len + offset : offset`, or `None` if that is negative.
pub(crate) fn resolve(offset: isize, len: usize) -> Option<usize> {
    if offset < 0 {
        len.checked_sub(offset.unsigned_abs())
    } else {
        Some(offset as usize)
    }
}

/// Resolve a writable range `[index, index + count)` against `len`.
pub(crate) fn resolve_range(
    index: isize,
    count: usize,
    len: usize,
) -> Result<usize, SequenceError> {
    let at = resolve(index, len)
        .filter(|&at| at <= len)
        .ok_or(SequenceError::IndexOutOfRange { index, len })?;
    match at.checked_add(count) {
        Some(end) if end <= len => Ok(at),
        _ => Err(SequenceError::RangeOutOfBounds {
            index: at,
            count,
            len,
        }),
    }
}

fn invalid(argument: &str, reason: String) -> SequenceError {
    SequenceError::InvalidArgument {
        argument: argument.to_string(),
        reason,
    }
}

fn too_large(argument: &str, value: impl fmt::Display) -> SequenceError {
    invalid(argument, format!("{value} does not fit in an offset"))
}
