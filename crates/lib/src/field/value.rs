//! The value field runtime.

use serde_json::Value;

use crate::Result;
use crate::change::ValueChange;

/// Mutable state for one value-typed field. The value is replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueField {
    value: Value,
}

impl ValueField {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &Value {
        &self.value
    }

    pub fn set(&mut self, value: Value) -> ValueChange {
        let previous = std::mem::replace(&mut self.value, value.clone());
        ValueChange {
            previous,
            current: value,
        }
    }

    /// Replay a change produced against this field's current value.
    pub fn apply(&mut self, change: &ValueChange) -> Result<ValueChange> {
        self.value = change.apply_to(&self.value)?;
        Ok(change.clone())
    }
}
