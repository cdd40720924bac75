//! The text field runtime.

use std::fmt;

use crate::Result;
use crate::change::TextChange;
use crate::field::FieldError;
use crate::sequence::{Sequence, SequenceConfig, SequenceError};

/// Mutable state for one text-typed field of one record.
///
/// `TextField` owns a [`Sequence`] and mirrors its read contract. Every
/// mutating method goes through [`splice`](Self::splice) and returns the
/// [`TextChange`] describing its net effect; a call that fails returns an
/// error, leaves the content untouched and produces no change.
///
/// # Examples
///
/// ```
/// use quire::field::TextField;
/// use quire::change::TextChange;
///
/// let mut text = TextField::from("hello");
/// let change = text.insert(5, " world").unwrap();
/// assert_eq!(change, TextChange::new(5, "", " world"));
///
/// let change = text.splice(0, 5, "HI").unwrap();
/// assert_eq!(change, TextChange::new(0, "hello", "HI"));
/// assert_eq!(text.to_string(), "HI world");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextField {
    sequence: Sequence,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a text field holding `initial` with a custom sequence config.
    pub fn with_config(initial: &str, config: SequenceConfig) -> Result<Self> {
        Ok(Self {
            sequence: Sequence::from_text(initial, config)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Number of characters. Constant time.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn char_at(&self, index: isize) -> Result<char> {
        Ok(self.sequence.char_at(index)?)
    }

    /// See [`Sequence::slice`].
    pub fn slice(&self, start: Option<isize>, stop: Option<isize>) -> String {
        self.sequence.slice(start, stop)
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Replace `count` characters at `index` with `value`.
    ///
    /// # Errors
    /// Returns a range error if `index` resolves outside `[0, len]` or the
    /// removed range runs past the end.
    pub fn splice(&mut self, index: isize, count: usize, value: &str) -> Result<TextChange> {
        let at = self.sequence.resolve_range(index, count)?;
        Ok(self.splice_resolved(at, count, value))
    }

    pub fn insert(&mut self, index: isize, value: &str) -> Result<TextChange> {
        self.splice(index, 0, value)
    }

    pub fn remove(&mut self, index: isize, count: usize) -> Result<TextChange> {
        self.splice(index, count, "")
    }

    pub fn append(&mut self, value: &str) -> TextChange {
        let at = self.len();
        self.splice_resolved(at, 0, value)
    }

    /// Replace the whole content.
    pub fn assign(&mut self, value: &str) -> TextChange {
        let len = self.len();
        self.splice_resolved(0, len, value)
    }

    pub fn clear(&mut self) -> TextChange {
        self.assign("")
    }

    /// Replay a change produced against this field's current content, such
    /// as one received from a peer.
    ///
    /// # Errors
    /// Returns a range error if the change's removed span runs past the end
    /// or does not match the current content.
    pub fn apply(&mut self, change: &TextChange) -> Result<TextChange> {
        let count = change.removed_text.chars().count();
        let at = change.index;
        if at.checked_add(count).is_none_or(|end| end > self.len()) {
            return Err(SequenceError::RangeOutOfBounds {
                index: at,
                count,
                len: self.len(),
            }
            .into());
        }
        let current = self
            .sequence
            .slice(Some(at as isize), Some((at + count) as isize));
        if current != change.removed_text {
            return Err(FieldError::ChangeMismatch {
                reason: format!(
                    "expected {:?} at {at}, found {current:?}",
                    change.removed_text
                ),
            }
            .into());
        }
        Ok(self.splice_resolved(at, count, &change.inserted_text))
    }

    fn splice_resolved(&mut self, at: usize, count: usize, value: &str) -> TextChange {
        let removed_text = self.sequence.splice_at(at, count, value);
        tracing::trace!(
            index = at,
            removed = count,
            inserted = value.chars().count(),
            "Text splice"
        );
        TextChange {
            index: at,
            removed_text,
            inserted_text: value.to_string(),
        }
    }
}

impl From<&str> for TextField {
    fn from(value: &str) -> Self {
        Self {
            sequence: Sequence::from(value),
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.sequence, f)
    }
}
