//! Tuning parameters for the weighted sequence tree.

use serde::{Deserialize, Serialize};

use super::SequenceError;

/// Configuration for a [`Sequence`](super::Sequence).
///
/// Missing fields fall back to their defaults when deserialized, so an empty
/// JSON object `{}` is a valid configuration.
///
/// ```
/// use quire::sequence::SequenceConfig;
///
/// let config: SequenceConfig = serde_json::from_str(r#"{"max_leaf_chars": 16}"#).unwrap();
/// assert_eq!(config.max_leaf_chars, 16);
/// assert_eq!(config.rebalance_slack, SequenceConfig::default().rebalance_slack);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Maximum number of characters held by a single leaf.
    pub max_leaf_chars: usize,

    /// Number of levels the tree may exceed the AVL height bound before the
    /// whole tree is rebuilt from its leaves.
    pub rebalance_slack: u32,
}

impl SequenceConfig {
    /// Smallest accepted value for `max_leaf_chars`.
    pub const MIN_LEAF_CHARS: usize = 2;

    /// Check that this configuration can back a sequence.
    pub fn validate(&self) -> Result<(), SequenceError> {
        if self.max_leaf_chars < Self::MIN_LEAF_CHARS {
            return Err(SequenceError::InvalidConfig {
                reason: format!(
                    "max_leaf_chars must be at least {}, got {}",
                    Self::MIN_LEAF_CHARS,
                    self.max_leaf_chars
                ),
            });
        }
        Ok(())
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            max_leaf_chars: 64,
            rebalance_slack: 2,
        }
    }
}
