//! Weighted balanced tree backing [`Sequence`](super::Sequence).
//!
//! Leaves hold runs of characters. Branches cache the character count
//! (weight), leaf count and height of their subtree, and own their children
//! exclusively. Structural edits consume subtrees by value: [`Splicer::split`]
//! and [`Splicer::join`] rebuild only the nodes along the edited path and keep
//! the heights of every pair of siblings within one of each other.
//!
//! The tree never contains an empty leaf except as the root of an empty
//! sequence.

#[cfg(any(test, feature = "testing"))]
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts tree nodes visited by lookups and structural edits.
#[derive(Debug, Default)]
pub(super) struct Meter {
    #[cfg(any(test, feature = "testing"))]
    visits: AtomicU64,
}

impl Meter {
    #[inline]
    pub(super) fn tick(&self) {
        #[cfg(any(test, feature = "testing"))]
        self.visits.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(any(test, feature = "testing"))]
    pub(super) fn visits(&self) -> u64 {
        self.visits.load(Ordering::Relaxed)
    }

    #[cfg(any(test, feature = "testing"))]
    pub(super) fn reset(&self) {
        self.visits.store(0, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone)]
pub(super) enum Node {
    Leaf {
        text: String,
        chars: usize,
    },
    Branch {
        left: Box<Node>,
        right: Box<Node>,
        weight: usize,
        leaves: usize,
        height: u32,
    },
}

impl Node {
    pub(super) fn empty() -> Box<Node> {
        Self::leaf(String::new(), 0)
    }

    fn leaf(text: String, chars: usize) -> Box<Node> {
        Box::new(Node::Leaf { text, chars })
    }

    pub(super) fn branch(left: Box<Node>, right: Box<Node>) -> Box<Node> {
        Box::new(Node::Branch {
            weight: left.weight() + right.weight(),
            leaves: left.leaves() + right.leaves(),
            height: 1 + left.height().max(right.height()),
            left,
            right,
        })
    }

    /// Total number of characters in this subtree.
    pub(super) fn weight(&self) -> usize {
        match self {
            Node::Leaf { chars, .. } => *chars,
            Node::Branch { weight, .. } => *weight,
        }
    }

    pub(super) fn leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Branch { leaves, .. } => *leaves,
        }
    }

    pub(super) fn height(&self) -> u32 {
        match self {
            Node::Leaf { .. } => 0,
            Node::Branch { height, .. } => *height,
        }
    }

    /// Character at `index`, descending by cumulative weight.
    pub(super) fn char_at(&self, mut index: usize, meter: &Meter) -> Option<char> {
        let mut node = self;
        loop {
            meter.tick();
            match node {
                Node::Leaf { text, .. } => return text.chars().nth(index),
                Node::Branch { left, right, .. } => {
                    let left_weight = left.weight();
                    if index < left_weight {
                        node = left;
                    } else {
                        index -= left_weight;
                        node = right;
                    }
                }
            }
        }
    }

    /// Append the characters in `[start, end)` of this subtree to `out`.
    ///
    /// Subtrees entirely outside the range are never entered.
    pub(super) fn collect(&self, start: usize, end: usize, out: &mut String, meter: &Meter) {
        meter.tick();
        match self {
            Node::Leaf { text, chars } => {
                if start == 0 && end >= *chars {
                    out.push_str(text);
                } else {
                    let from = byte_offset(text, start);
                    let to = byte_offset(text, end);
                    out.push_str(&text[from..to]);
                }
            }
            Node::Branch { left, right, .. } => {
                let left_weight = left.weight();
                if start < left_weight {
                    left.collect(start, end.min(left_weight), out, meter);
                }
                if end > left_weight {
                    let from = start.saturating_sub(left_weight);
                    right.collect(from, end - left_weight, out, meter);
                }
            }
        }
    }

    /// Insert `value` into the leaf covering `at` if it has room, updating
    /// weights on the way back up. Returns `false` without touching the tree
    /// otherwise.
    pub(super) fn try_insert(
        &mut self,
        at: usize,
        value: &str,
        value_chars: usize,
        max_leaf: usize,
        meter: &Meter,
    ) -> bool {
        meter.tick();
        match self {
            Node::Leaf { text, chars } => {
                if *chars + value_chars > max_leaf {
                    return false;
                }
                let byte = byte_offset(text, at);
                text.insert_str(byte, value);
                *chars += value_chars;
                true
            }
            Node::Branch {
                left,
                right,
                weight,
                ..
            } => {
                let left_weight = left.weight();
                let inserted = if at <= left_weight {
                    left.try_insert(at, value, value_chars, max_leaf, meter)
                } else {
                    right.try_insert(at - left_weight, value, value_chars, max_leaf, meter)
                };
                if inserted {
                    *weight += value_chars;
                }
                inserted
            }
        }
    }

    /// Remove `[at, at + count)` when it lies inside a single leaf that keeps
    /// at least one character. Returns `None` without touching the tree
    /// otherwise.
    pub(super) fn try_remove(&mut self, at: usize, count: usize, meter: &Meter) -> Option<String> {
        meter.tick();
        match self {
            Node::Leaf { text, chars } => {
                if count >= *chars {
                    return None;
                }
                let from = byte_offset(text, at);
                let to = byte_offset(text, at + count);
                let removed: String = text.drain(from..to).collect();
                *chars -= count;
                Some(removed)
            }
            Node::Branch {
                left,
                right,
                weight,
                ..
            } => {
                let left_weight = left.weight();
                let removed = if at + count <= left_weight {
                    left.try_remove(at, count, meter)
                } else if at >= left_weight {
                    right.try_remove(at - left_weight, count, meter)
                } else {
                    None
                }?;
                *weight -= count;
                Some(removed)
            }
        }
    }

    /// Move every non-empty leaf of this subtree, in order, into `out`.
    pub(super) fn into_leaves(self: Box<Self>, out: &mut Vec<Box<Node>>) {
        match *self {
            Node::Branch { left, right, .. } => {
                left.into_leaves(out);
                right.into_leaves(out);
            }
            leaf if leaf.weight() > 0 => out.push(Box::new(leaf)),
            _ => {}
        }
    }

    /// Verify cached weights, leaf counts, heights and the AVL balance of the
    /// whole subtree. Returns the offending description on failure.
    #[cfg(test)]
    pub(super) fn check(&self) -> Result<(), String> {
        match self {
            Node::Leaf { text, chars } => {
                if text.chars().count() != *chars {
                    return Err(format!("leaf {text:?} caches {chars} chars"));
                }
                Ok(())
            }
            Node::Branch {
                left,
                right,
                weight,
                leaves,
                height,
            } => {
                left.check()?;
                right.check()?;
                if left.weight() == 0 || right.weight() == 0 {
                    return Err("branch holds an empty child".to_string());
                }
                if *weight != left.weight() + right.weight() {
                    return Err(format!("branch weight {weight} is stale"));
                }
                if *leaves != left.leaves() + right.leaves() {
                    return Err(format!("branch leaf count {leaves} is stale"));
                }
                if *height != 1 + left.height().max(right.height()) {
                    return Err(format!("branch height {height} is stale"));
                }
                if left.height().abs_diff(right.height()) > 1 {
                    return Err(format!(
                        "unbalanced branch: left {} right {}",
                        left.height(),
                        right.height()
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Structural editing over owned subtrees.
pub(super) struct Splicer<'a> {
    pub(super) max_leaf: usize,
    pub(super) meter: &'a Meter,
}

impl Splicer<'_> {
    /// Build a perfectly balanced tree over `text` in linear time.
    pub(super) fn build(&self, text: &str) -> Box<Node> {
        let mut leaves = Vec::new();
        let mut start = 0;
        let mut chars = 0;
        for (byte, _) in text.char_indices() {
            if chars == self.max_leaf {
                leaves.push(Node::leaf(text[start..byte].to_string(), chars));
                start = byte;
                chars = 0;
            }
            chars += 1;
        }
        if chars > 0 {
            leaves.push(Node::leaf(text[start..].to_string(), chars));
        }
        build_balanced(leaves)
    }

    /// Split a subtree into the characters before `at` and those from `at` on.
    pub(super) fn split(&self, node: Box<Node>, at: usize) -> (Box<Node>, Box<Node>) {
        self.meter.tick();
        if at == 0 {
            return (Node::empty(), node);
        }
        if at >= node.weight() {
            return (node, Node::empty());
        }
        match *node {
            Node::Leaf { mut text, chars } => {
                let byte = byte_offset(&text, at);
                let tail = text.split_off(byte);
                (Node::leaf(text, at), Node::leaf(tail, chars - at))
            }
            Node::Branch { left, right, .. } => {
                let left_weight = left.weight();
                if at < left_weight {
                    let (head, rest) = self.split(left, at);
                    (head, self.join(rest, right))
                } else if at > left_weight {
                    let (rest, tail) = self.split(right, at - left_weight);
                    (self.join(left, rest), tail)
                } else {
                    (left, right)
                }
            }
        }
    }

    /// Concatenate two subtrees, descending the spine of the taller one until
    /// the heights meet and rotating on the way back up.
    pub(super) fn join(&self, left: Box<Node>, right: Box<Node>) -> Box<Node> {
        self.meter.tick();
        if left.weight() == 0 {
            return right;
        }
        if right.weight() == 0 {
            return left;
        }
        let (left_height, right_height) = (left.height(), right.height());
        if left_height > right_height + 1 {
            match *left {
                Node::Branch {
                    left: outer,
                    right: inner,
                    ..
                } => {
                    let merged = self.join(inner, right);
                    self.balance(outer, merged)
                }
                leaf => Node::branch(Box::new(leaf), right),
            }
        } else if right_height > left_height + 1 {
            match *right {
                Node::Branch {
                    left: inner,
                    right: outer,
                    ..
                } => {
                    let merged = self.join(left, inner);
                    self.balance(merged, outer)
                }
                leaf => Node::branch(left, Box::new(leaf)),
            }
        } else {
            match (*left, *right) {
                (
                    Node::Leaf {
                        text: mut head,
                        chars: head_chars,
                    },
                    Node::Leaf {
                        text: tail,
                        chars: tail_chars,
                    },
                ) if head_chars + tail_chars <= self.max_leaf => {
                    head.push_str(&tail);
                    Node::leaf(head, head_chars + tail_chars)
                }
                (left, right) => Node::branch(Box::new(left), Box::new(right)),
            }
        }
    }

    /// Pair two AVL subtrees whose heights differ by at most two.
    fn balance(&self, left: Box<Node>, right: Box<Node>) -> Box<Node> {
        self.meter.tick();
        let (left_height, right_height) = (left.height(), right.height());
        if left_height > right_height + 1 {
            match *left {
                Node::Branch {
                    left: ll,
                    right: lr,
                    ..
                } => {
                    if ll.height() >= lr.height() {
                        Node::branch(ll, Node::branch(lr, right))
                    } else {
                        match *lr {
                            Node::Branch {
                                left: lrl,
                                right: lrr,
                                ..
                            } => Node::branch(Node::branch(ll, lrl), Node::branch(lrr, right)),
                            leaf => Node::branch(ll, Node::branch(Box::new(leaf), right)),
                        }
                    }
                }
                leaf => Node::branch(Box::new(leaf), right),
            }
        } else if right_height > left_height + 1 {
            match *right {
                Node::Branch {
                    left: rl,
                    right: rr,
                    ..
                } => {
                    if rr.height() >= rl.height() {
                        Node::branch(Node::branch(left, rl), rr)
                    } else {
                        match *rl {
                            Node::Branch {
                                left: rll,
                                right: rlr,
                                ..
                            } => Node::branch(Node::branch(left, rll), Node::branch(rlr, rr)),
                            leaf => Node::branch(Node::branch(left, Box::new(leaf)), rr),
                        }
                    }
                }
                leaf => Node::branch(left, Box::new(leaf)),
            }
        } else {
            Node::branch(left, right)
        }
    }
}

/// Rebuild a balanced tree over leaves already in order.
pub(super) fn build_balanced(leaves: Vec<Box<Node>>) -> Box<Node> {
    let count = leaves.len();
    if count == 0 {
        return Node::empty();
    }
    build_from(&mut leaves.into_iter(), count)
}

fn build_from(leaves: &mut impl Iterator<Item = Box<Node>>, count: usize) -> Box<Node> {
    if count == 1 {
        return leaves.next().unwrap_or_else(Node::empty);
    }
    let half = count / 2;
    let left = build_from(leaves, half);
    let right = build_from(leaves, count - half);
    Node::branch(left, right)
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(byte, _)| byte)
}

/// In-order iterator over leaf payloads.
pub struct Chunks<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Chunks<'a> {
    pub(super) fn new(root: &'a Node) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Leaf { text, .. } if !text.is_empty() => return Some(text),
                Node::Leaf { .. } => {}
                Node::Branch { left, right, .. } => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }
        None
    }
}
