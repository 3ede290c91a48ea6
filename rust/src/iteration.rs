//! Iterator implementations for the tree variants.
//!
//! Every traversal is lazy and keeps its own explicit stack or queue of node
//! handles, so starting one never touches the tree and dropping one midway
//! costs nothing.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::compact_arena::{CompactArena, NodeId};
use crate::types::{
    AvlTree, BinaryNode, BsTree, MultiwayNode, RawBinaryTree, RbTree, TwoThreeTree,
};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// In-order iterator over a binary tree.
pub struct InOrderIter<'a, K, V, M> {
    arena: &'a CompactArena<BinaryNode<K, V, M>>,
    /// Nodes whose left subtree is done but which are not yet yielded.
    stack: Vec<NodeId>,
    remaining: usize,
}

/// Breadth-first iterator over a binary tree: root first, then each level
/// from left to right.
pub struct LevelOrderIter<'a, K, V, M> {
    arena: &'a CompactArena<BinaryNode<K, V, M>>,
    queue: VecDeque<NodeId>,
}

/// In-order iterator over a 2-3 tree.
pub struct MultiwayIter<'a, K, V> {
    arena: &'a CompactArena<MultiwayNode<K, V>>,
    /// `(node, i)`: children `0..=i` of `node` are done, entry `i` is next.
    stack: Vec<(NodeId, usize)>,
    remaining: usize,
}

/// Breadth-first iterator over a 2-3 tree. All entries of a node are
/// yielded before moving on to the next node.
pub struct MultiwayLevelOrderIter<'a, K, V> {
    arena: &'a CompactArena<MultiwayNode<K, V>>,
    queue: VecDeque<NodeId>,
    current: Option<(NodeId, usize)>,
}

/// Iterator over the keys of a tree, in key order.
pub struct Keys<I> {
    items: I,
}

/// Iterator over the values of a tree, in key order.
pub struct Values<I> {
    items: I,
}

// ============================================================================
// TREE ITERATOR METHODS
// ============================================================================

impl<K, V, M> RawBinaryTree<K, V, M> {
    pub(crate) fn in_order(&self) -> InOrderIter<'_, K, V, M> {
        InOrderIter::new(&self.arena, self.root, self.len)
    }

    pub(crate) fn level_order(&self) -> LevelOrderIter<'_, K, V, M> {
        LevelOrderIter {
            arena: &self.arena,
            queue: self.root.into_iter().collect(),
        }
    }
}

impl<K, V> BsTree<K, V> {
    /// Returns a breadth-first iterator, root first.
    pub fn level_order(&self) -> LevelOrderIter<'_, K, V, ()> {
        self.raw.level_order()
    }
}

impl<K, V> AvlTree<K, V> {
    /// Returns a breadth-first iterator, root first.
    pub fn level_order(&self) -> LevelOrderIter<'_, K, V, crate::types::AvlMeta> {
        self.raw.level_order()
    }
}

impl<K, V> RbTree<K, V> {
    /// Returns a breadth-first iterator, root first.
    pub fn level_order(&self) -> LevelOrderIter<'_, K, V, crate::types::RbMeta> {
        self.raw.level_order()
    }
}

impl<K, V> TwoThreeTree<K, V> {
    pub(crate) fn in_order(&self) -> MultiwayIter<'_, K, V> {
        let mut iter = MultiwayIter {
            arena: &self.arena,
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.descend(self.root);
        iter
    }

    /// Returns a breadth-first iterator, root first.
    pub fn level_order(&self) -> MultiwayLevelOrderIter<'_, K, V> {
        MultiwayLevelOrderIter {
            arena: &self.arena,
            queue: self.root.into_iter().collect(),
            current: None,
        }
    }
}

// ============================================================================
// IN-ORDER (BINARY)
// ============================================================================

impl<'a, K, V, M> InOrderIter<'a, K, V, M> {
    fn new(
        arena: &'a CompactArena<BinaryNode<K, V, M>>,
        root: Option<NodeId>,
        len: usize,
    ) -> Self {
        let mut iter = Self {
            arena,
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<NodeId>) {
        while let Some(id) = current {
            self.stack.push(id);
            current = self.arena[id].left;
        }
    }
}

impl<'a, K, V, M> Iterator for InOrderIter<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let arena = self.arena;
        let node = &arena[id];
        self.push_left_spine(node.right);
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, M> ExactSizeIterator for InOrderIter<'_, K, V, M> {}

impl<K, V, M> FusedIterator for InOrderIter<'_, K, V, M> {}

// ============================================================================
// LEVEL ORDER (BINARY)
// ============================================================================

impl<'a, K, V, M> Iterator for LevelOrderIter<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.queue.pop_front()?;
        let arena = self.arena;
        let node = &arena[id];
        self.queue.extend(node.left);
        self.queue.extend(node.right);
        Some((&node.key, &node.value))
    }
}

impl<K, V, M> FusedIterator for LevelOrderIter<'_, K, V, M> {}

// ============================================================================
// IN-ORDER (MULTIWAY)
// ============================================================================

impl<K, V> MultiwayIter<'_, K, V> {
    /// Pushes `current` and the chain of first children below it.
    fn descend(&mut self, mut current: Option<NodeId>) {
        while let Some(id) = current {
            self.stack.push((id, 0));
            current = self.arena[id].children.first().copied();
        }
    }
}

impl<'a, K, V> Iterator for MultiwayIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        loop {
            let (id, index) = self.stack.pop()?;
            let node = &arena[id];
            let Some(entry) = node.entries.get(index) else {
                continue;
            };
            self.stack.push((id, index + 1));
            self.descend(node.children.get(index + 1).copied());
            self.remaining = self.remaining.saturating_sub(1);
            return Some((&entry.key, &entry.value));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for MultiwayIter<'_, K, V> {}

impl<K, V> FusedIterator for MultiwayIter<'_, K, V> {}

// ============================================================================
// LEVEL ORDER (MULTIWAY)
// ============================================================================

impl<'a, K, V> Iterator for MultiwayLevelOrderIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        loop {
            if let Some((id, index)) = self.current {
                let node = &arena[id];
                if let Some(entry) = node.entries.get(index) {
                    self.current = Some((id, index + 1));
                    return Some((&entry.key, &entry.value));
                }
            }
            let id = self.queue.pop_front()?;
            self.queue.extend(arena[id].children.iter().copied());
            self.current = Some((id, 0));
        }
    }
}

impl<K, V> FusedIterator for MultiwayLevelOrderIter<'_, K, V> {}

// ============================================================================
// KEY AND VALUE ADAPTERS
// ============================================================================

impl<I> Keys<I> {
    pub(crate) fn new(items: I) -> Self {
        Self { items }
    }
}

impl<I> Values<I> {
    pub(crate) fn new(items: I) -> Self {
        Self { items }
    }
}

impl<'a, K: 'a, V: 'a, I> Iterator for Keys<I>
where
    I: Iterator<Item = (&'a K, &'a V)>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<'a, K: 'a, V: 'a, I> Iterator for Values<I>
where
    I: Iterator<Item = (&'a K, &'a V)>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

// ============================================================================
// INTOITERATOR FOR REFERENCES
// ============================================================================

impl<'a, K: Ord, V> IntoIterator for &'a BsTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = InOrderIter<'a, K, V, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.raw.in_order()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a AvlTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = InOrderIter<'a, K, V, crate::types::AvlMeta>;

    fn into_iter(self) -> Self::IntoIter {
        self.raw.in_order()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a RbTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = InOrderIter<'a, K, V, crate::types::RbMeta>;

    fn into_iter(self) -> Self::IntoIter {
        self.raw.in_order()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a TwoThreeTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = MultiwayIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}
