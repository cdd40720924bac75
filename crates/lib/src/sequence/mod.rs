//! Indexed character sequences backed by a weighted balanced tree.
//!
//! [`Sequence`] stores text as a tree of leaves, each holding a short run of
//! characters, with every branch caching the character count of its subtree.
//! Lookups and edits descend by cumulative weight, so indexed access,
//! insertion and removal cost `O(log n)` regardless of where in the text they
//! land, and extracting a range costs time proportional to the range.
//!
//! Offsets are counted in Unicode scalar values (`char`s), not bytes. A
//! negative offset counts back from the end of the sequence.
//!
//! # Examples
//!
//! ```
//! use quire::sequence::Sequence;
//!
//! let mut seq = Sequence::from("hello");
//! seq.insert(5, " world").unwrap();
//! assert_eq!(seq.char_at(-1).unwrap(), 'd');
//! assert_eq!(seq.slice(Some(-5), None), "world");
//!
//! let removed = seq.splice(0, 5, "HI").unwrap();
//! assert_eq!(removed, "hello");
//! assert_eq!(seq.to_string(), "HI world");
//! ```

use std::fmt;

mod config;
mod errors;
mod node;
mod offset;

pub use config::SequenceConfig;
pub use errors::SequenceError;
pub use node::Chunks;
pub use offset::{Offset, count_from_json};

pub(crate) use offset::{resolve, resolve_range};

use node::{Meter, Node, Splicer, build_balanced};

/// An ordered, indexable sequence of characters.
///
/// A `Sequence` is owned by exactly one writer. It performs no internal
/// locking; callers that share one across threads must serialize mutations
/// themselves.
#[derive(Debug)]
pub struct Sequence {
    root: Box<Node>,
    config: SequenceConfig,
    meter: Meter,
}

impl Sequence {
    /// Create an empty sequence with the default configuration.
    pub fn new() -> Self {
        Self {
            root: Node::empty(),
            config: SequenceConfig::default(),
            meter: Meter::default(),
        }
    }

    /// Create an empty sequence with a custom configuration.
    pub fn with_config(config: SequenceConfig) -> Result<Self, SequenceError> {
        config.validate()?;
        Ok(Self {
            root: Node::empty(),
            config,
            meter: Meter::default(),
        })
    }

    /// Create a sequence holding `value` with a custom configuration.
    pub fn from_text(value: &str, config: SequenceConfig) -> Result<Self, SequenceError> {
        let mut seq = Self::with_config(config)?;
        seq.assign(value);
        Ok(seq)
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Number of characters. Constant time.
    pub fn len(&self) -> usize {
        self.root.weight()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Height of the underlying tree; zero for a single leaf.
    pub fn height(&self) -> u32 {
        self.root.height()
    }

    /// Character at `index`.
    ///
    /// # Errors
    /// Returns [`SequenceError::IndexOutOfRange`] when the resolved index is
    /// outside `[0, len)`.
    pub fn char_at(&self, index: isize) -> Result<char, SequenceError> {
        let len = self.len();
        let out_of_range = SequenceError::IndexOutOfRange { index, len };
        let resolved = resolve(index, len)
            .filter(|&at| at < len)
            .ok_or_else(|| out_of_range.clone())?;
        self.root
            .char_at(resolved, &self.meter)
            .ok_or(out_of_range)
    }

    /// Characters in the half-open range `[start, stop)`.
    ///
    /// Both bounds are resolved and then clamped into `[0, len]`; `None`
    /// means the start or end of the sequence. An empty string is returned
    /// when `start >= stop`.
    pub fn slice(&self, start: Option<isize>, stop: Option<isize>) -> String {
        let len = self.len();
        let start = start.map_or(0, |offset| clamp(offset, len));
        let stop = stop.map_or(len, |offset| clamp(offset, len));
        let mut out = String::new();
        if start < stop {
            self.root.collect(start, stop, &mut out, &self.meter);
        }
        out
    }

    /// Resolve a writable range `[index, index + count)`, returning the
    /// non-negative start.
    ///
    /// # Errors
    /// Returns [`SequenceError::IndexOutOfRange`] if `index` resolves outside
    /// `[0, len]`, and [`SequenceError::RangeOutOfBounds`] if the range runs
    /// past the end.
    pub fn resolve_range(&self, index: isize, count: usize) -> Result<usize, SequenceError> {
        resolve_range(index, count, self.len())
    }

    /// Insert `value` before the character at `index`.
    pub fn insert(&mut self, index: isize, value: &str) -> Result<(), SequenceError> {
        self.splice(index, 0, value).map(|_| ())
    }

    /// Remove `count` characters starting at `index`, returning them.
    pub fn remove(&mut self, index: isize, count: usize) -> Result<String, SequenceError> {
        self.splice(index, count, "")
    }

    pub fn append(&mut self, value: &str) {
        let at = self.len();
        self.splice_at(at, 0, value);
    }

    /// Replace `count` characters at `index` with `value`, returning the
    /// removed characters. The edit is applied in full or not at all.
    pub fn splice(
        &mut self,
        index: isize,
        count: usize,
        value: &str,
    ) -> Result<String, SequenceError> {
        let at = self.resolve_range(index, count)?;
        Ok(self.splice_at(at, count, value))
    }

    /// Replace the whole content with `value`, dropping every prior node.
    pub fn assign(&mut self, value: &str) {
        let root = self.splicer().build(value);
        self.root = root;
    }

    pub fn clear(&mut self) {
        self.root = Node::empty();
    }

    /// Iterate over the leaf payloads in order.
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks::new(&self.root)
    }

    /// Number of tree nodes visited since creation or the last reset.
    #[cfg(any(test, feature = "testing"))]
    pub fn node_visits(&self) -> u64 {
        self.meter.visits()
    }

    #[cfg(any(test, feature = "testing"))]
    pub fn reset_node_visits(&self) {
        self.meter.reset();
    }

    fn splicer(&self) -> Splicer<'_> {
        Splicer {
            max_leaf: self.config.max_leaf_chars,
            meter: &self.meter,
        }
    }

    /// `at + count <= len` must already hold.
    pub(crate) fn splice_at(&mut self, at: usize, count: usize, value: &str) -> String {
        let value_chars = value.chars().count();
        let max_leaf = self.config.max_leaf_chars;
        if count == 0 {
            if value_chars == 0 {
                return String::new();
            }
            if self
                .root
                .try_insert(at, value, value_chars, max_leaf, &self.meter)
            {
                return String::new();
            }
        } else if value_chars == 0 {
            if let Some(removed) = self.root.try_remove(at, count, &self.meter) {
                return removed;
            }
        }

        let root = std::mem::replace(&mut self.root, Node::empty());
        let splicer = Splicer {
            max_leaf,
            meter: &self.meter,
        };
        let (head, rest) = splicer.split(root, at);
        let (middle, tail) = splicer.split(rest, count);
        let mut removed = String::new();
        if count > 0 {
            middle.collect(0, count, &mut removed, &self.meter);
        }
        let inserted = splicer.build(value);
        self.root = splicer.join(splicer.join(head, inserted), tail);
        self.rebalance_if_needed();
        removed
    }

    /// Rebuild the tree from its leaves if its height has drifted past the
    /// AVL bound plus the configured slack.
    fn rebalance_if_needed(&mut self) {
        let leaves = self.root.leaves();
        let bound = avl_height_bound(leaves) + self.config.rebalance_slack;
        let height = self.root.height();
        if height <= bound {
            return;
        }
        tracing::debug!(height, leaves, bound, "Rebuilding unbalanced sequence tree");
        let root = std::mem::replace(&mut self.root, Node::empty());
        let mut collected = Vec::with_capacity(leaves);
        root.into_leaves(&mut collected);
        self.root = build_balanced(collected);
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Sequence {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            config: self.config,
            meter: Meter::default(),
        }
    }
}

impl From<&str> for Sequence {
    fn from(value: &str) -> Self {
        let mut seq = Self::new();
        seq.assign(value);
        seq
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

fn clamp(offset: isize, len: usize) -> usize {
    resolve(offset, len).map_or(0, |at| at.min(len))
}

/// An AVL tree holding `leaves` leaves is never taller than
/// `1.4405 * log2(leaves + 2)`.
fn avl_height_bound(leaves: usize) -> u32 {
    (1.4405 * ((leaves + 2) as f64).log2()).ceil() as u32
}
