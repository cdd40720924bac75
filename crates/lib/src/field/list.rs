//! The list field runtime.

use serde_json::Value;

use crate::Result;
use crate::change::ListChange;
use crate::sequence::{resolve, resolve_range};

/// Mutable state for one list-typed field.
///
/// Offsets follow the same rules as text: negative offsets count from the
/// end and writes outside the list are rejected.
///
/// ```
/// use quire::field::ListField;
/// use serde_json::json;
///
/// let mut tags = ListField::new(vec![json!("a"), json!("c")]);
/// let change = tags.insert(1, json!("b")).unwrap();
/// assert_eq!(change.index, 1);
/// assert_eq!(tags.items(), &[json!("a"), json!("b"), json!("c")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListField {
    items: Vec<Value>,
}

impl ListField {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: isize) -> Option<&Value> {
        resolve(index, self.items.len())
            .and_then(|at| self.items.get(at))
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Replace `count` items at `index` with `values`.
    pub fn splice(&mut self, index: isize, count: usize, values: Vec<Value>) -> Result<ListChange> {
        let at = resolve_range(index, count, self.items.len())?;
        Ok(self.splice_resolved(at, count, values))
    }

    pub fn insert(&mut self, index: isize, value: Value) -> Result<ListChange> {
        self.splice(index, 0, vec![value])
    }

    pub fn push(&mut self, value: Value) -> ListChange {
        let at = self.items.len();
        self.splice_resolved(at, 0, vec![value])
    }

    pub fn remove(&mut self, index: isize, count: usize) -> Result<ListChange> {
        self.splice(index, count, Vec::new())
    }

    pub fn assign(&mut self, values: Vec<Value>) -> ListChange {
        let len = self.items.len();
        self.splice_resolved(0, len, values)
    }

    pub fn clear(&mut self) -> ListChange {
        self.assign(Vec::new())
    }

    /// Replay a change produced against this list's current items.
    pub fn apply(&mut self, change: &ListChange) -> Result<ListChange> {
        self.items = change.apply_to(&self.items)?;
        Ok(change.clone())
    }

    fn splice_resolved(&mut self, at: usize, count: usize, values: Vec<Value>) -> ListChange {
        let inserted_values = values.clone();
        let removed_values: Vec<Value> = self.items.splice(at..at + count, values).collect();
        ListChange {
            index: at,
            removed_values,
            inserted_values,
        }
    }
}
