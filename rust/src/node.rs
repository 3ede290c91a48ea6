//! Node implementations for the binary and multiway node types.
//!
//! These are local operations on a single node: child slot access, entry
//! lookup and sorted insertion. Anything that touches more than one node
//! lives with the tree that owns the arena.

use std::cmp::Ordering;

use crate::compact_arena::NodeId;
use crate::types::{BinaryNode, Entry, MultiwayNode, NodeMeta, Side};

// ============================================================================
// BINARY NODE IMPLEMENTATION
// ============================================================================

impl<K, V, M: NodeMeta> BinaryNode<K, V, M> {
    /// Creates a detached leaf with fresh metadata.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            meta: M::default(),
        }
    }
}

impl<K, V, M> BinaryNode<K, V, M> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the child on the given side.
    #[inline]
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn child_slot(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Returns true if both children are present.
    pub fn is_full(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// The only child of a node with at most one child.
    pub fn sole_child(&self) -> Option<NodeId> {
        self.left.or(self.right)
    }
}

// ============================================================================
// MULTIWAY NODE IMPLEMENTATION
// ============================================================================

impl<K, V> MultiwayNode<K, V> {
    /// Creates a leaf holding a single entry.
    pub fn leaf(entry: Entry<K, V>, parent: Option<NodeId>) -> Self {
        Self {
            entries: vec![entry],
            children: Vec::new(),
            parent,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Position of `child` among this node's children.
    pub(crate) fn child_position(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }
}

impl<K: Ord, V> MultiwayNode<K, V> {
    /// Binary search over the entries of this node.
    ///
    /// `Ok(i)` is the index of the matching entry. `Err(i)` is both the
    /// insertion position and the index of the child to descend into.
    #[inline]
    pub fn search_entries(&self, key: &K) -> Result<usize, usize> {
        self.entries.binary_search_by(|entry| entry.key.cmp(key))
    }

    /// Inserts an entry at its sorted position.
    ///
    /// Returns the entry back if its key is already present.
    pub(crate) fn insert_entry(&mut self, entry: Entry<K, V>) -> Result<usize, Entry<K, V>> {
        match self.search_entries(&entry.key) {
            Ok(_) => Err(entry),
            Err(index) => {
                self.entries.insert(index, entry);
                Ok(index)
            }
        }
    }

    /// Checks that entries are strictly ascending and inside `(lower, upper)`.
    pub(crate) fn entries_within(&self, lower: Option<&K>, upper: Option<&K>) -> bool {
        let sorted = self
            .entries
            .windows(2)
            .all(|pair| pair[0].key.cmp(&pair[1].key) == Ordering::Less);
        let above = match (lower, self.entries.first()) {
            (Some(lower), Some(first)) => first.key > *lower,
            _ => true,
        };
        let below = match (upper, self.entries.last()) {
            (Some(upper), Some(last)) => last.key < *upper,
            _ => true,
        };
        sorted && above && below
    }
}
