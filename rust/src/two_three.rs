//! 2-3 tree balancing.
//!
//! Insert always lands in a leaf. A node that ends up with three entries is
//! split: its middle entry moves into the parent and the node's right third
//! becomes a new sibling. Splits propagate upward; splitting the root adds a
//! level.
//!
//! Delete always removes from a leaf, after swapping an internal entry with
//! its in-order predecessor. A node left without entries borrows through the
//! parent from a sibling with two entries, or else merges with a sibling and
//! pulls one entry down from the parent, which may in turn underflow.
//! Emptying the root removes a level.

use crate::compact_arena::{CompactArena, NodeId};
use crate::error::{KeyResult, ModifyResult, TreeError};
use crate::types::{Entry, MultiwayNode, TwoThreeTree};

/// Entries a node may hold before it has to split.
const MAX_ENTRIES: usize = 2;

impl<K, V> TwoThreeTree<K, V> {
    pub fn new() -> Self {
        Self {
            arena: CompactArena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates an empty tree whose node storage is pre-sized for `capacity`
    /// entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: CompactArena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the node behind a handle, if it is live.
    pub fn node(&self, id: NodeId) -> Option<&MultiwayNode<K, V>> {
        self.arena.get(id)
    }

    /// Number of levels; every leaf sits on the last one.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(id) = current {
            height += 1;
            current = self.arena[id].children.first().copied();
        }
        height
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    /// First entry of the root node.
    pub(crate) fn root_entry(&self) -> Option<(&K, &V)> {
        let root = &self.arena[self.root?];
        root.entries.first().map(|entry| (&entry.key, &entry.value))
    }

    fn set_parent(&mut self, children: &[NodeId], parent: NodeId) {
        for &child in children {
            self.arena[child].parent = Some(parent);
        }
    }

    /// Splits a node holding three entries.
    ///
    /// The node keeps its left entry (and left two children), a new right
    /// sibling takes the right entry (and right two children), and the
    /// middle entry goes up. Returns the parent that received it, or `None`
    /// when a new root had to be created.
    fn split(&mut self, id: NodeId) -> Option<NodeId> {
        let node = &mut self.arena[id];
        let (right_entry, middle) = match (node.entries.pop(), node.entries.pop()) {
            (Some(right), Some(middle)) => (right, middle),
            _ => panic!("split of node {} without overflow", id),
        };
        let right_children = if node.children.is_empty() {
            Vec::new()
        } else {
            node.children.split_off(2)
        };
        let parent = node.parent;

        let right = self.arena.allocate(MultiwayNode {
            entries: vec![right_entry],
            children: right_children,
            parent,
        });
        let moved = std::mem::take(&mut self.arena[right].children);
        self.set_parent(&moved, right);
        self.arena[right].children = moved;

        match parent {
            Some(parent) => {
                let node = &mut self.arena[parent];
                let position = match node.child_position(id) {
                    Some(position) => position,
                    None => panic!("node {} missing from parent {}", id, parent),
                };
                node.entries.insert(position, middle);
                node.children.insert(position + 1, right);
                tracing::trace!(node = id, right, parent, "split");
                Some(parent)
            }
            None => {
                let root = self.arena.allocate(MultiwayNode {
                    entries: vec![middle],
                    children: vec![id, right],
                    parent: None,
                });
                self.set_parent(&[id, right], root);
                self.root = Some(root);
                tracing::debug!(root, height = self.height(), "2-3 tree grew a level");
                None
            }
        }
    }

    /// Rightmost leaf below `id`.
    fn rightmost_leaf(&self, mut id: NodeId) -> NodeId {
        while let Some(&last) = self.arena[id].children.last() {
            id = last;
        }
        id
    }

    /// Repairs an entry-less node by borrowing or merging, walking up while
    /// merges empty the parent.
    fn fix_underflow(&mut self, mut id: NodeId) {
        loop {
            if !self.arena[id].entries.is_empty() {
                return;
            }
            let Some(parent) = self.arena[id].parent else {
                self.shrink_root(id);
                return;
            };

            let siblings = &self.arena[parent].children;
            let index = match siblings.iter().position(|&c| c == id) {
                Some(index) => index,
                None => panic!("node {} missing from parent {}", id, parent),
            };
            let left = index.checked_sub(1).map(|i| siblings[i]);
            let right = siblings.get(index + 1).copied();

            if let Some(left) = left.filter(|&l| self.arena[l].entries.len() == MAX_ENTRIES) {
                self.borrow_from_left(id, left, parent, index);
                return;
            }
            if let Some(right) = right.filter(|&r| self.arena[r].entries.len() == MAX_ENTRIES) {
                self.borrow_from_right(id, right, parent, index);
                return;
            }
            match (left, right) {
                (Some(left), _) => self.merge_nodes(left, id, parent, index - 1),
                (None, Some(right)) => self.merge_nodes(id, right, parent, index),
                (None, None) => panic!("node {} has no siblings below {}", id, parent),
            }
            id = parent;
        }
    }

    /// An entry-less root is replaced by its only child, or removed when it
    /// is a leaf.
    fn shrink_root(&mut self, id: NodeId) {
        let root = self.arena.deallocate(id);
        let child = root.and_then(|node| node.children.first().copied());
        if let Some(child) = child {
            self.arena[child].parent = None;
        }
        self.root = child;
        tracing::debug!(old_root = id, new_root = ?child, "2-3 tree lost a level");
    }

    /// Rotates one entry from `left` through the parent into `id`.
    fn borrow_from_left(&mut self, id: NodeId, left: NodeId, parent: NodeId, index: usize) {
        let sibling = &mut self.arena[left];
        let (entry, child) = match sibling.entries.pop() {
            Some(entry) => (entry, sibling.children.pop()),
            None => panic!("borrow from empty sibling {}", left),
        };
        let separator = std::mem::replace(&mut self.arena[parent].entries[index - 1], entry);

        let node = &mut self.arena[id];
        node.entries.insert(0, separator);
        if let Some(child) = child {
            node.children.insert(0, child);
            self.arena[child].parent = Some(id);
        }
        tracing::trace!(node = id, sibling = left, parent, "borrow from left");
    }

    /// Rotates one entry from `right` through the parent into `id`.
    fn borrow_from_right(&mut self, id: NodeId, right: NodeId, parent: NodeId, index: usize) {
        let sibling = &mut self.arena[right];
        if sibling.entries.is_empty() {
            panic!("borrow from empty sibling {}", right);
        }
        let entry = sibling.entries.remove(0);
        let child = if sibling.children.is_empty() {
            None
        } else {
            Some(sibling.children.remove(0))
        };
        let separator = std::mem::replace(&mut self.arena[parent].entries[index], entry);

        let node = &mut self.arena[id];
        node.entries.push(separator);
        if let Some(child) = child {
            node.children.push(child);
            self.arena[child].parent = Some(id);
        }
        tracing::trace!(node = id, sibling = right, parent, "borrow from right");
    }

    /// Folds `right`, and the parent entry at `separator` between the two,
    /// into `left`. `right` is released and one of `left`/`right` is the
    /// entry-less node being repaired.
    fn merge_nodes(&mut self, left: NodeId, right: NodeId, parent: NodeId, separator: usize) {
        let parent_node = &mut self.arena[parent];
        let entry = parent_node.entries.remove(separator);
        parent_node.children.remove(separator + 1);

        let absorbed = match self.arena.deallocate(right) {
            Some(node) => node,
            None => panic!("merge with released node {}", right),
        };
        let target = &mut self.arena[left];
        target.entries.push(entry);
        target.entries.extend(absorbed.entries);
        target.children.extend_from_slice(&absorbed.children);
        self.set_parent(&absorbed.children, left);
        tracing::trace!(left, right, parent, "merge");
    }
}

impl<K, V> Default for TwoThreeTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> TwoThreeTree<K, V> {
    /// Finds the node and entry index holding `key`.
    fn locate(&self, key: &K) -> Option<(NodeId, usize)> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            match node.search_entries(key) {
                Ok(index) => return Some((id, index)),
                Err(index) => current = node.children.get(index).copied(),
            }
        }
        None
    }

    pub(crate) fn search_entry(&self, key: &K) -> KeyResult<&V> {
        self.locate(key)
            .map(|(id, index)| &self.arena[id].entries[index].value)
            .ok_or(TreeError::NotFound)
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    pub(crate) fn insert_entry(&mut self, key: K, value: V) -> ModifyResult<()> {
        let Some(mut id) = self.root else {
            let root = self
                .arena
                .allocate(MultiwayNode::leaf(Entry::new(key, value), None));
            self.root = Some(root);
            self.len = 1;
            return Ok(());
        };

        loop {
            let node = &self.arena[id];
            match node.search_entries(&key) {
                Ok(_) => return Err(TreeError::Conflict),
                Err(index) => match node.children.get(index) {
                    Some(&child) => id = child,
                    None => break,
                },
            }
        }

        // The descent above already ruled the key out of this leaf.
        if self.arena[id].insert_entry(Entry::new(key, value)).is_err() {
            panic!("leaf {} already holds the key it was chosen for", id);
        }
        self.len += 1;

        let mut current = Some(id);
        while let Some(node) = current {
            if self.arena[node].entries.len() <= MAX_ENTRIES {
                break;
            }
            current = self.split(node);
        }
        Ok(())
    }

    pub(crate) fn delete_entry(&mut self, key: &K) -> ModifyResult<V> {
        let (id, index) = self.locate(key).ok_or(TreeError::NotFound)?;

        let (leaf, removed) = if self.arena[id].is_leaf() {
            (id, self.arena[id].entries.remove(index))
        } else {
            // Swap with the in-order predecessor, which always sits at the
            // end of a leaf, then take it out of that leaf.
            let leaf = self.rightmost_leaf(self.arena[id].children[index]);
            let (holder, source) = self.arena.pair_mut(id, leaf);
            let predecessor = match source.entries.pop() {
                Some(entry) => entry,
                None => panic!("leaf {} without entries", leaf),
            };
            (
                leaf,
                std::mem::replace(&mut holder.entries[index], predecessor),
            )
        };

        self.len -= 1;
        self.fix_underflow(leaf);
        Ok(removed.value)
    }
}
