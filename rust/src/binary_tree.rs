//! Ordered-map core shared by the binary variants.
//!
//! `RawBinaryTree` owns the node arena and the root handle. It knows how to
//! walk keys down the tree, hang a new leaf, splice a node out, swap entries
//! and rotate, but never decides when to do any of it. The BST, AVL and
//! red-black trees drive these primitives from their own insert and delete.

use std::cmp::Ordering;

use crate::compact_arena::{CompactArena, NodeId};
use crate::error::{KeyResult, TreeError, TreeResult};
use crate::types::{BinaryNode, NodeMeta, RawBinaryTree, Side};

/// Outcome of walking a key down from the root.
///
/// The path lists every visited node, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Descent {
    /// The last node on the path holds the key.
    Found(Vec<NodeId>),
    /// The key belongs on `side` of the last node on the path.
    /// An empty path means the tree is empty.
    Vacant(Vec<NodeId>, Side),
}

// ============================================================================
// CONSTRUCTION AND ACCESS
// ============================================================================

impl<K, V, M> RawBinaryTree<K, V, M> {
    pub fn new() -> Self {
        Self {
            arena: CompactArena::new(),
            root: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: CompactArena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &BinaryNode<K, V, M> {
        &self.arena[id]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut BinaryNode<K, V, M> {
        &mut self.arena[id]
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.arena[id].child(side)
    }

    /// Which side of `parent` holds `child`.
    pub(crate) fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
        let node = &self.arena[parent];
        if node.left == Some(child) {
            Side::Left
        } else if node.right == Some(child) {
            Side::Right
        } else {
            panic!("node {} is not a child of {}", child, parent)
        }
    }

    /// Key and value of the root node.
    pub fn root_summary(&self) -> Option<(&K, &V)> {
        self.root.map(|id| {
            let node = &self.arena[id];
            (&node.key, &node.value)
        })
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<NodeId> = self.root.into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|&id| {
                    let node = &self.arena[id];
                    node.left.into_iter().chain(node.right)
                })
                .collect();
        }
        height
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    /// Descends along one side as far as possible.
    ///
    /// Returns the path from `start` to the extreme node, `start` included.
    pub(crate) fn extreme_path(&self, start: NodeId, side: Side) -> Vec<NodeId> {
        let mut path = vec![start];
        let mut current = start;
        while let Some(next) = self.child(current, side) {
            path.push(next);
            current = next;
        }
        path
    }

    /// Exchanges key and value between two nodes, leaving links and metadata
    /// in place.
    pub(crate) fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        let (x, y) = self.arena.pair_mut(a, b);
        std::mem::swap(&mut x.key, &mut y.key);
        std::mem::swap(&mut x.value, &mut y.value);
    }
}

impl<K, V, M> Default for RawBinaryTree<K, V, M> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// LINK MAINTENANCE
// ============================================================================

impl<K, V, M: NodeMeta> RawBinaryTree<K, V, M> {
    /// Allocates a detached node with fresh metadata.
    pub(crate) fn allocate(&mut self, key: K, value: V) -> NodeId {
        self.arena.allocate(BinaryNode::new(key, value))
    }

    /// Releases a node that is no longer linked into the tree.
    pub(crate) fn release(&mut self, id: NodeId) -> BinaryNode<K, V, M> {
        match self.arena.deallocate(id) {
            Some(node) => node,
            None => panic!("released node {} twice", id),
        }
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].meta.parent()
    }

    /// Sets a child edge and keeps the child's parent link in step.
    pub(crate) fn set_child(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        *self.arena[parent].child_slot(side) = child;
        if let Some(child) = child {
            self.arena[child].meta.set_parent(Some(parent));
        }
    }

    /// Makes `new` take the place of `old` below `parent`, or at the root
    /// when `parent` is `None`.
    pub(crate) fn replace_subtree(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        new: Option<NodeId>,
    ) {
        match parent {
            Some(parent) => {
                let side = self.side_of(parent, old);
                self.set_child(parent, side, new);
            }
            None => {
                self.root = new;
                if let Some(new) = new {
                    self.arena[new].meta.set_parent(None);
                }
            }
        }
    }

    /// Rotates the subtree rooted at `id` in direction `direction`.
    ///
    /// A left rotation lifts the right child, a right rotation the left one.
    /// The lifted child is returned as the new subtree root; the caller is
    /// responsible for hanging it where `id` used to hang. Parent links of
    /// every node whose parent changed are updated.
    pub(crate) fn rotate(&mut self, id: NodeId, direction: Side) -> NodeId {
        let rising_side = direction.opposite();
        let successor = match self.child(id, rising_side) {
            Some(successor) => successor,
            None => panic!("rotation at {} without a {:?} child", id, rising_side),
        };
        let old_parent = self.parent(id);

        let inner = self.child(successor, direction);
        self.set_child(id, rising_side, inner);
        self.set_child(successor, direction, Some(id));
        self.arena[successor].meta.set_parent(old_parent);

        tracing::trace!(node = id, successor, ?direction, "rotate");
        successor
    }
}

// ============================================================================
// KEY-ORDERED WALK
// ============================================================================

impl<K: Ord, V, M> RawBinaryTree<K, V, M> {
    /// Walks `key` down from the root, recording the path.
    pub(crate) fn descend(&self, key: &K) -> Descent {
        let mut path = Vec::new();
        let mut current = self.root;
        while let Some(id) = current {
            path.push(id);
            let node = &self.arena[id];
            let side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Descent::Found(path),
            };
            match node.child(side) {
                Some(next) => current = Some(next),
                None => return Descent::Vacant(path, side),
            }
        }
        Descent::Vacant(path, Side::Left)
    }

    /// Iterative lookup of the node holding `key`.
    pub(crate) fn find(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Returns the value stored under `key`.
    pub fn search(&self, key: &K) -> KeyResult<&V> {
        self.find(key)
            .map(|id| &self.arena[id].value)
            .ok_or(TreeError::NotFound)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }
}

impl<K: Ord, V, M: NodeMeta> RawBinaryTree<K, V, M> {
    /// Hangs a new leaf at the position `key` belongs to.
    ///
    /// Returns the new node and the path of its ancestors, root first.
    /// The tree is unchanged when the key is already present.
    pub(crate) fn insert_leaf(&mut self, key: K, value: V) -> TreeResult<(NodeId, Vec<NodeId>)> {
        let (path, side) = match self.descend(&key) {
            Descent::Found(_) => return Err(TreeError::Conflict),
            Descent::Vacant(path, side) => (path, side),
        };

        let id = self.allocate(key, value);
        match path.last() {
            Some(&parent) => self.set_child(parent, side, Some(id)),
            None => self.root = Some(id),
        }
        self.len += 1;
        Ok((id, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RbMeta;

    fn tree_from(keys: &[i32]) -> RawBinaryTree<i32, i32, RbMeta> {
        let mut tree = RawBinaryTree::new();
        for &key in keys {
            tree.insert_leaf(key, key * 10).unwrap();
        }
        tree
    }

    #[test]
    fn test_insert_leaf_builds_search_tree() {
        let tree = tree_from(&[5, 3, 8, 1, 4]);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.root_summary(), Some((&5, &50)));
        assert_eq!(tree.search(&4), Ok(&40));
        assert_eq!(tree.search(&7), Err(TreeError::NotFound));
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn test_insert_leaf_rejects_duplicate() {
        let mut tree = tree_from(&[5, 3]);
        assert_eq!(tree.insert_leaf(3, 0), Err(TreeError::Conflict));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.search(&3), Ok(&30));
    }

    #[test]
    fn test_descend_reports_path_and_side() {
        let tree = tree_from(&[5, 3, 8]);
        let root = tree.root.unwrap();
        let left = tree.child(root, Side::Left).unwrap();

        assert_eq!(tree.descend(&3), Descent::Found(vec![root, left]));
        assert_eq!(
            tree.descend(&4),
            Descent::Vacant(vec![root, left], Side::Right)
        );
        assert_eq!(
            RawBinaryTree::<i32, i32, ()>::new().descend(&1),
            Descent::Vacant(vec![], Side::Left)
        );
    }

    #[test]
    fn test_rotate_keeps_parent_links() {
        let mut tree = tree_from(&[2, 1, 4, 3, 5]);
        let root = tree.root.unwrap();

        let top = tree.rotate(root, Side::Left);
        tree.replace_subtree(None, root, Some(top));

        assert_eq!(tree.root_summary(), Some((&4, &40)));
        assert_eq!(tree.parent(top), None);
        assert_eq!(tree.parent(root), Some(top));
        let inner = tree.child(root, Side::Right).unwrap();
        assert_eq!(tree.node(inner).key, 3);
        assert_eq!(tree.parent(inner), Some(root));
    }

    #[test]
    fn test_swap_entries_keeps_links() {
        let mut tree = tree_from(&[2, 1]);
        let root = tree.root.unwrap();
        let left = tree.child(root, Side::Left).unwrap();

        tree.swap_entries(root, left);
        assert_eq!(tree.node(root).key, 1);
        assert_eq!(tree.node(left).value, 20);
        assert_eq!(tree.child(root, Side::Left), Some(left));
    }

    #[test]
    fn test_extreme_path() {
        let tree = tree_from(&[5, 3, 8, 1, 9]);
        let root = tree.root.unwrap();
        let keys: Vec<i32> = tree
            .extreme_path(root, Side::Left)
            .into_iter()
            .map(|id| tree.node(id).key)
            .collect();
        assert_eq!(keys, vec![5, 3, 1]);
    }
}
