//! The map field runtime.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::Result;
use crate::change::MapChange;
use crate::field::FieldError;

/// Mutable state for one map-typed field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapField {
    items: BTreeMap<String, Value>,
}

impl MapField {
    pub fn new(items: BTreeMap<String, Value>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }

    pub fn items(&self) -> &BTreeMap<String, Value> {
        &self.items
    }

    /// Set `key`, reporting any previous value as removed.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> MapChange {
        let key = key.into();
        let mut change = MapChange::default();
        if let Some(previous) = self.items.insert(key.clone(), value.clone()) {
            change.removed_items.insert(key.clone(), previous);
        }
        change.added_items.insert(key, value);
        change
    }

    /// # Errors
    /// Returns [`FieldError::KeyNotFound`] if `key` is absent.
    pub fn remove(&mut self, key: &str) -> Result<MapChange> {
        let previous = self
            .items
            .remove(key)
            .ok_or_else(|| FieldError::KeyNotFound {
                key: key.to_string(),
            })?;
        Ok(MapChange {
            removed_items: BTreeMap::from([(key.to_string(), previous)]),
            added_items: BTreeMap::new(),
        })
    }

    /// Replace every item.
    pub fn assign(&mut self, items: BTreeMap<String, Value>) -> MapChange {
        let removed_items = std::mem::replace(&mut self.items, items.clone());
        MapChange {
            removed_items,
            added_items: items,
        }
    }

    pub fn clear(&mut self) -> MapChange {
        self.assign(BTreeMap::new())
    }

    /// Replay a change produced against this map's current items.
    pub fn apply(&mut self, change: &MapChange) -> Result<MapChange> {
        self.items = change.apply_to(&self.items)?;
        Ok(change.clone())
    }
}
