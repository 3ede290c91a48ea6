//! AVL balancing.
//!
//! Every node caches its height. After an insert or delete the nodes on the
//! descent path are revisited bottom-up: each one gets its height
//! recomputed and, if its balance factor reached +2 or -2, is rotated
//! (twice for the zig-zag shapes). The subtree root that comes out of each
//! step is hung back into the node above it.

use crate::binary_tree::Descent;
use crate::compact_arena::NodeId;
use crate::error::{ModifyResult, TreeError};
use crate::types::{AvlMeta, AvlTree, RawBinaryTree, Side};

const RIGHT_HEAVY: i64 = 2;
const LEFT_HEAVY: i64 = -2;

impl<K, V> AvlTree<K, V> {
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

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> usize {
        self.height_of(self.raw.root) as usize
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    #[inline]
    fn height_of(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |id| self.raw.node(id).meta.height)
    }

    /// height(right) - height(left)
    pub(crate) fn balance_factor(&self, id: NodeId) -> i64 {
        let node = self.raw.node(id);
        i64::from(self.height_of(node.right)) - i64::from(self.height_of(node.left))
    }

    fn update_height(&mut self, id: NodeId) {
        let node = self.raw.node(id);
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.raw.node_mut(id).meta = AvlMeta { height };
    }

    /// Rotates and refreshes the heights of the two nodes that moved, lower
    /// one first.
    fn rotated(&mut self, id: NodeId, direction: Side) -> NodeId {
        let successor = self.raw.rotate(id, direction);
        self.update_height(id);
        self.update_height(successor);
        successor
    }

    /// Restores the AVL condition at `id` and returns the subtree's new root.
    ///
    /// Both children must already be balanced with correct heights.
    fn rebalanced(&mut self, id: NodeId) -> NodeId {
        self.update_height(id);
        match self.balance_factor(id) {
            RIGHT_HEAVY => {
                if let Some(right) = self.raw.child(id, Side::Right) {
                    if self.balance_factor(right) < 0 {
                        let lifted = self.rotated(right, Side::Right);
                        self.raw.set_child(id, Side::Right, Some(lifted));
                    }
                }
                self.rotated(id, Side::Left)
            }
            LEFT_HEAVY => {
                if let Some(left) = self.raw.child(id, Side::Left) {
                    if self.balance_factor(left) > 0 {
                        let lifted = self.rotated(left, Side::Left);
                        self.raw.set_child(id, Side::Left, Some(lifted));
                    }
                }
                self.rotated(id, Side::Right)
            }
            factor if (-1..=1).contains(&factor) => id,
            factor => panic!("AVL node {} reached balance factor {}", id, factor),
        }
    }

    /// Rebalances every node of `path` from the bottom up, rewiring each
    /// resulting subtree root into its parent or the tree root.
    fn rebalance_path(&mut self, path: &[NodeId]) {
        for (depth, &id) in path.iter().enumerate().rev() {
            let top = self.rebalanced(id);
            if top == id {
                continue;
            }
            match depth.checked_sub(1).map(|above| path[above]) {
                Some(parent) => {
                    let side = self.raw.side_of(parent, id);
                    self.raw.set_child(parent, side, Some(top));
                }
                None => {
                    tracing::debug!(old_root = id, new_root = top, "AVL root replaced");
                    self.raw.root = Some(top);
                }
            }
        }
    }

    /// Detaches the minimum node of the subtree at `id`.
    ///
    /// Returns the rebalanced remainder of the subtree and the detached node.
    fn remove_min(&mut self, id: NodeId) -> (Option<NodeId>, NodeId) {
        match self.raw.child(id, Side::Left) {
            Some(left) => {
                let (rest, min) = self.remove_min(left);
                self.raw.set_child(id, Side::Left, rest);
                (Some(self.rebalanced(id)), min)
            }
            None => (self.raw.child(id, Side::Right), id),
        }
    }
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> AvlTree<K, V> {
    pub(crate) fn insert_entry(&mut self, key: K, value: V) -> ModifyResult<()> {
        let (_, path) = self.raw.insert_leaf(key, value)?;
        self.rebalance_path(&path);
        Ok(())
    }

    pub(crate) fn delete_entry(&mut self, key: &K) -> ModifyResult<V> {
        let mut path = match self.raw.descend(key) {
            Descent::Found(path) => path,
            Descent::Vacant(..) => return Err(TreeError::NotFound),
        };
        let target = path.pop().ok_or(TreeError::NotFound)?;
        let parent = path.last().copied();

        let (replacement, victim) = match self.raw.child(target, Side::Right) {
            None => (self.raw.child(target, Side::Left), target),
            Some(right) if self.raw.child(target, Side::Left).is_none() => (Some(right), target),
            Some(right) => {
                // The in-order successor gives up its entry and its node.
                let (rest, successor) = self.remove_min(right);
                self.raw.swap_entries(target, successor);
                self.raw.set_child(target, Side::Right, rest);
                (Some(self.rebalanced(target)), successor)
            }
        };

        self.raw.replace_subtree(parent, target, replacement);
        self.rebalance_path(&path);
        self.raw.len -= 1;
        Ok(self.raw.release(victim).value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderedMap;

    fn tree_from(keys: &[i32]) -> AvlTree<i32, i32> {
        let mut tree = AvlTree::new();
        for &key in keys {
            tree.insert(key, key).unwrap();
            tree.validate().unwrap();
        }
        tree
    }

    fn root_key(tree: &AvlTree<i32, i32>) -> Option<i32> {
        tree.root_summary().map(|(k, _)| *k)
    }

    #[test]
    fn test_single_left_rotation() {
        let tree = tree_from(&[50, 100, 150]);
        assert_eq!(root_key(&tree), Some(100));
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_single_right_rotation() {
        let tree = tree_from(&[50, 0, -50]);
        assert_eq!(root_key(&tree), Some(0));
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_right_left_double_rotation() {
        let tree = tree_from(&[10, 30, 20]);
        assert_eq!(root_key(&tree), Some(20));
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_left_right_double_rotation() {
        let tree = tree_from(&[30, 10, 20]);
        assert_eq!(root_key(&tree), Some(20));
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_sorted_input_stays_logarithmic() {
        let keys: Vec<i32> = (0..1023).collect();
        let tree = tree_from(&keys);
        assert_eq!(tree.height(), 10);
    }

    #[test]
    fn test_delete_rebalances() {
        let mut tree = tree_from(&[20, 10, 30, 40]);
        assert_eq!(tree.delete(&10), Ok(10));
        tree.validate().unwrap();
        assert_eq!(root_key(&tree), Some(30));
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_delete_node_with_two_children_uses_successor() {
        let mut tree = tree_from(&[20, 10, 30, 5, 15, 25, 35, 27]);
        assert_eq!(tree.delete(&20), Ok(20));
        tree.validate().unwrap();
        assert_eq!(root_key(&tree), Some(25));
        let keys: Vec<i32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![5, 10, 15, 25, 27, 30, 35]);
    }

    #[test]
    fn test_delete_everything() {
        let keys: Vec<i32> = (0..200).map(|i| (i * 37) % 200).collect();
        let mut tree = tree_from(&keys);
        for key in keys.iter().rev() {
            assert_eq!(tree.delete(key), Ok(*key));
            tree.validate().unwrap();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.raw.arena.len(), 0);
    }

    #[test]
    fn test_delete_missing_key_leaves_tree_alone() {
        let mut tree = tree_from(&[1, 2, 3]);
        assert_eq!(tree.delete(&4), Err(TreeError::NotFound));
        assert_eq!(tree.len(), 3);
        tree.validate().unwrap();
    }
}
