//! Red-black balancing.
//!
//! New nodes go in red and the insert fix-up removes red-red pairs by
//! recoloring (red uncle) or by one or two rotations (black uncle).
//! Deleting a black node leaves one path a black short; the delete fix-up
//! walks that deficit upward until a red node absorbs it or a rotation
//! restores the count. Parent links live in `RbMeta` and are kept current by
//! the shared rotation code.

use crate::compact_arena::NodeId;
use crate::error::{ModifyResult, TreeError};
use crate::types::{Color, RawBinaryTree, RbTree, Side};

impl<K, V> RbTree<K, V> {
    pub fn new() -> Self {
        Self {
            raw: RawBinaryTree::new(),
        }
    }

    /// Creates an empty tree whose node storage is pre-sized for `capacity`
    /// entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawBinaryTree::with_capacity(capacity),
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Color at a tree position. Empty positions count as black.
    pub fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.raw.node(id).meta.color)
    }

    #[inline]
    fn is_red(&self, id: Option<NodeId>) -> bool {
        self.color_of(id) == Color::Red
    }

    #[inline]
    fn paint(&mut self, id: NodeId, color: Color) {
        self.raw.node_mut(id).meta.color = color;
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.raw.parent(id)
    }

    /// Rotates at `id` and hangs the lifted child where `id` used to be.
    fn rotate_in_place(&mut self, id: NodeId, direction: Side) -> NodeId {
        let parent = self.parent_of(id);
        let top = self.raw.rotate(id, direction);
        match parent {
            Some(parent) => {
                let side = self.raw.side_of(parent, id);
                self.raw.set_child(parent, side, Some(top));
            }
            None => {
                tracing::debug!(old_root = id, new_root = top, "red-black root replaced");
                self.raw.root = Some(top);
            }
        }
        top
    }

    fn blacken_root(&mut self) {
        if let Some(root) = self.raw.root {
            self.paint(root, Color::Black);
        }
    }

    /// Removes red-red violations starting at the freshly inserted `node`.
    fn insert_fixup(&mut self, mut node: NodeId) {
        while let Some(parent) = self.parent_of(node) {
            if !self.is_red(Some(parent)) {
                break;
            }
            let grandparent = match self.parent_of(parent) {
                Some(grandparent) => grandparent,
                None => panic!("red node {} sits at the root", parent),
            };
            let parent_side = self.raw.side_of(grandparent, parent);
            let uncle = self.raw.child(grandparent, parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.is_red(Some(u))) {
                tracing::trace!(node, parent, uncle, grandparent, "recolor");
                self.paint(parent, Color::Black);
                self.paint(uncle, Color::Black);
                self.paint(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            // Black uncle. Straighten a zig-zag first so the red pair lines
            // up on the outer side of the grandparent.
            let mut parent = parent;
            if self.raw.side_of(parent, node) != parent_side {
                self.rotate_in_place(parent, parent_side);
                parent = node;
            }
            self.rotate_in_place(grandparent, parent_side.opposite());
            self.paint(parent, Color::Black);
            self.paint(grandparent, Color::Red);
            break;
        }
        self.blacken_root();
    }

    /// Repairs a black-height deficit at `side` of `parent`.
    ///
    /// The deficient position may be empty, which is why it is addressed
    /// through its parent rather than by handle.
    fn delete_fixup(&mut self, mut parent: Option<NodeId>, mut side: Side) {
        let mut deficient: Option<NodeId> = None;
        loop {
            if self.is_red(deficient) {
                if let Some(id) = deficient {
                    self.paint(id, Color::Black);
                }
                break;
            }
            let Some(p) = parent else {
                break;
            };
            let sibling_side = side.opposite();
            let mut sibling = self.sibling(p, sibling_side);

            if self.is_red(Some(sibling)) {
                tracing::trace!(parent = p, sibling, "delete case: red sibling");
                self.paint(sibling, Color::Black);
                self.paint(p, Color::Red);
                self.rotate_in_place(p, side);
                sibling = self.sibling(p, sibling_side);
            }

            let near = self.raw.child(sibling, side);
            let far = self.raw.child(sibling, sibling_side);

            if !self.is_red(near) && !self.is_red(far) {
                tracing::trace!(parent = p, sibling, "delete case: black nephews");
                self.paint(sibling, Color::Red);
                deficient = Some(p);
                parent = self.parent_of(p);
                if let Some(above) = parent {
                    side = self.raw.side_of(above, p);
                }
                continue;
            }

            if !self.is_red(far) {
                tracing::trace!(parent = p, sibling, "delete case: red near nephew");
                if let Some(near) = near {
                    self.paint(near, Color::Black);
                }
                self.paint(sibling, Color::Red);
                self.rotate_in_place(sibling, sibling_side);
                sibling = self.sibling(p, sibling_side);
            }

            tracing::trace!(parent = p, sibling, "delete case: red far nephew");
            let parent_color = self.color_of(Some(p));
            self.paint(sibling, parent_color);
            self.paint(p, Color::Black);
            if let Some(far) = self.raw.child(sibling, sibling_side) {
                self.paint(far, Color::Black);
            }
            self.rotate_in_place(p, side);
            break;
        }
    }

    /// A position one black short always has a sibling: the other side of
    /// the parent still carries at least one black node.
    fn sibling(&self, parent: NodeId, side: Side) -> NodeId {
        match self.raw.child(parent, side) {
            Some(sibling) => sibling,
            None => panic!("black-height deficit below {} without a sibling", parent),
        }
    }
}

impl<K, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> RbTree<K, V> {
    pub(crate) fn insert_entry(&mut self, key: K, value: V) -> ModifyResult<()> {
        let (node, _) = self.raw.insert_leaf(key, value)?;
        self.insert_fixup(node);
        Ok(())
    }

    pub(crate) fn delete_entry(&mut self, key: &K) -> ModifyResult<V> {
        let target = self.raw.find(key).ok_or(TreeError::NotFound)?;

        // A node with two children takes over its in-order predecessor's
        // entry; the predecessor node is the one that gets unlinked.
        let victim = match self.raw.child(target, Side::Left) {
            Some(left) if self.raw.node(target).is_full() => {
                let predecessor = *self
                    .raw
                    .extreme_path(left, Side::Right)
                    .last()
                    .unwrap_or(&left);
                self.raw.swap_entries(target, predecessor);
                predecessor
            }
            _ => target,
        };

        let child = self.raw.node(victim).sole_child();
        let parent = self.parent_of(victim);
        let side = parent.map(|p| self.raw.side_of(p, victim));
        self.raw.replace_subtree(parent, victim, child);

        let removed = self.raw.release(victim);
        self.raw.len -= 1;

        if removed.meta.color == Color::Black {
            match (child, side) {
                (Some(child), _) if self.is_red(Some(child)) => self.paint(child, Color::Black),
                (_, Some(side)) => self.delete_fixup(parent, side),
                _ => {}
            }
        }
        self.blacken_root();
        Ok(removed.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderedMap;

    fn tree_from(keys: &[i32]) -> RbTree<i32, i32> {
        let mut tree = RbTree::new();
        for &key in keys {
            tree.insert(key, key).unwrap();
            tree.validate().unwrap();
        }
        tree
    }

    fn root_key(tree: &RbTree<i32, i32>) -> Option<i32> {
        tree.root_summary().map(|(k, _)| *k)
    }

    #[test]
    fn test_root_is_black() {
        let tree = tree_from(&[1]);
        assert_eq!(tree.color_of(tree.raw.root), Color::Black);
    }

    #[test]
    fn test_straight_line_rotation() {
        let tree = tree_from(&[1, 2, 3]);
        assert_eq!(root_key(&tree), Some(2));
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_zig_zag_rotation() {
        let tree = tree_from(&[3, 1, 2]);
        assert_eq!(root_key(&tree), Some(2));
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_red_uncle_recolors() {
        let tree = tree_from(&[2, 1, 3, 4]);
        assert_eq!(root_key(&tree), Some(2));
        assert_eq!(tree.color_of(tree.raw.root), Color::Black);
        assert_eq!(tree.color_of(tree.raw.find(&1)), Color::Black);
        assert_eq!(tree.color_of(tree.raw.find(&3)), Color::Black);
        assert_eq!(tree.color_of(tree.raw.find(&4)), Color::Red);
    }

    #[test]
    fn test_delete_leaf_cases() {
        let keys: Vec<i32> = (1..=15).collect();
        for victim in &keys {
            let mut tree = tree_from(&keys);
            assert_eq!(tree.delete(victim), Ok(*victim));
            tree.validate().unwrap();
            assert_eq!(tree.len(), keys.len() - 1);
        }
    }

    #[test]
    fn test_delete_two_children_uses_predecessor() {
        let mut tree = tree_from(&[10, 5, 15, 3, 7]);
        let root_before = tree.raw.root;
        assert_eq!(tree.delete(&10), Ok(10));
        tree.validate().unwrap();
        assert_eq!(tree.raw.root, root_before);
        assert_eq!(root_key(&tree), Some(7));
    }

    #[test]
    fn test_delete_everything_in_mixed_order() {
        let keys: Vec<i32> = (0..300).map(|i| (i * 113) % 300).collect();
        let mut tree = tree_from(&keys);
        for (n, key) in keys.iter().enumerate() {
            if n % 2 == 0 {
                assert_eq!(tree.delete(key), Ok(*key));
                tree.validate().unwrap();
            }
        }
        for (n, key) in keys.iter().enumerate() {
            if n % 2 == 1 {
                assert_eq!(tree.delete(key), Ok(*key));
                tree.validate().unwrap();
            }
        }
        assert!(tree.is_empty());
        assert_eq!(tree.raw.root, None);
    }

    #[test]
    fn test_delete_missing_key() {
        let mut tree = tree_from(&[1, 2]);
        assert_eq!(tree.delete(&3), Err(TreeError::NotFound));
        assert_eq!(tree.len(), 2);
    }
}
