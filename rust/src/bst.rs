//! Unbalanced binary search tree.
//!
//! Insert hangs a leaf where the search for the key falls off the tree.
//! Delete splices out nodes with at most one child; a node with two children
//! takes over the entry of its predecessor or successor (per
//! `DeleteReplacement`) and that neighbour is spliced out instead.

use crate::binary_tree::Descent;
use crate::compact_arena::NodeId;
use crate::error::{ModifyResult, TreeError};
use crate::types::{BsTree, DeleteReplacement, RawBinaryTree, Side};

impl<K, V> BsTree<K, V> {
    /// Creates an empty tree using predecessor replacement on delete.
    pub fn new() -> Self {
        Self::with_replacement(DeleteReplacement::default())
    }

    /// Creates an empty tree with the given delete replacement rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::{BsTree, DeleteReplacement, OrderedMap};
    ///
    /// let mut tree = BsTree::with_replacement(DeleteReplacement::Successor);
    /// for key in [1, 2, -1] {
    ///     tree.insert(key, key).unwrap();
    /// }
    /// tree.delete(&1).unwrap();
    /// assert_eq!(tree.root_summary(), Some((&2, &2)));
    /// ```
    pub fn with_replacement(replacement: DeleteReplacement) -> Self {
        Self {
            raw: RawBinaryTree::new(),
            replacement,
        }
    }

    /// Creates an empty tree whose node storage is pre-sized for `capacity`
    /// entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawBinaryTree::with_capacity(capacity),
            replacement: DeleteReplacement::default(),
        }
    }

    pub fn replacement(&self) -> DeleteReplacement {
        self.replacement
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K, V> Default for BsTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> BsTree<K, V> {
    pub(crate) fn insert_entry(&mut self, key: K, value: V) -> ModifyResult<()> {
        self.raw.insert_leaf(key, value).map(|_| ())
    }

    pub(crate) fn delete_entry(&mut self, key: &K) -> ModifyResult<V> {
        let mut path = match self.raw.descend(key) {
            Descent::Found(path) => path,
            Descent::Vacant(..) => return Err(TreeError::NotFound),
        };
        let target = path.pop().ok_or(TreeError::NotFound)?;
        let mut parent = path.last().copied();

        let victim = if self.raw.node(target).is_full() {
            let (neighbour, neighbour_parent) = self.replacement_for(target);
            self.raw.swap_entries(target, neighbour);
            parent = Some(neighbour_parent);
            neighbour
        } else {
            target
        };

        let child = self.raw.node(victim).sole_child();
        self.raw.replace_subtree(parent, victim, child);
        self.raw.len -= 1;
        Ok(self.raw.release(victim).value)
    }

    /// Finds the node that replaces `target` and that node's parent.
    fn replacement_for(&self, target: NodeId) -> (NodeId, NodeId) {
        let (first_step, walk) = match self.replacement {
            DeleteReplacement::Predecessor => (Side::Left, Side::Right),
            DeleteReplacement::Successor => (Side::Right, Side::Left),
        };
        let start = match self.raw.child(target, first_step) {
            Some(start) => start,
            None => panic!("node {} lost its {:?} child", target, first_step),
        };

        let path = self.raw.extreme_path(start, walk);
        let neighbour = path[path.len() - 1];
        let parent = if path.len() >= 2 {
            path[path.len() - 2]
        } else {
            target
        };
        (neighbour, parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderedMap;

    fn tree_with(replacement: DeleteReplacement, keys: &[i32]) -> BsTree<i32, String> {
        let mut tree = BsTree::with_replacement(replacement);
        for &key in keys {
            tree.insert(key, format!("v{}", key)).unwrap();
        }
        tree
    }

    fn keys(tree: &BsTree<i32, String>) -> Vec<i32> {
        tree.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_delete_leaf_and_single_child() {
        let mut tree = tree_with(DeleteReplacement::Predecessor, &[5, 3, 8, 9]);

        assert_eq!(tree.delete(&3), Ok("v3".to_string()));
        assert_eq!(tree.delete(&8), Ok("v8".to_string()));
        assert_eq!(keys(&tree), vec![5, 9]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_delete_two_children_with_predecessor() {
        let mut tree = tree_with(DeleteReplacement::Predecessor, &[1, 2, -1]);

        assert_eq!(tree.delete(&1), Ok("v1".to_string()));
        assert_eq!(tree.root_summary(), Some((&-1, &"v-1".to_string())));
        assert_eq!(keys(&tree), vec![-1, 2]);
        assert_eq!(tree.search(&1), Err(TreeError::NotFound));
    }

    #[test]
    fn test_delete_two_children_with_successor() {
        let mut tree = tree_with(DeleteReplacement::Successor, &[1, 2, -1]);

        assert_eq!(tree.delete(&1), Ok("v1".to_string()));
        assert_eq!(tree.root_summary(), Some((&2, &"v2".to_string())));
        assert_eq!(keys(&tree), vec![-1, 2]);
    }

    #[test]
    fn test_delete_with_deep_predecessor() {
        // predecessor of 50 is 40, which has a left child 35
        let mut tree = tree_with(DeleteReplacement::Predecessor, &[50, 30, 70, 20, 40, 35]);

        assert_eq!(tree.delete(&50), Ok("v50".to_string()));
        assert_eq!(tree.root_summary(), Some((&40, &"v40".to_string())));
        assert_eq!(keys(&tree), vec![20, 30, 35, 40, 70]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_delete_missing_key() {
        let mut tree = tree_with(DeleteReplacement::Predecessor, &[1]);
        assert_eq!(tree.delete(&7), Err(TreeError::NotFound));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_delete_root_until_empty() {
        let mut tree = tree_with(DeleteReplacement::Predecessor, &[4, 2, 6, 1, 3, 5, 7]);
        while let Some((&key, _)) = tree.root_summary() {
            tree.delete(&key).unwrap();
            assert!(tree.validate().is_ok());
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn test_sorted_input_degrades_to_list() {
        let tree = tree_with(DeleteReplacement::Predecessor, &[1, 2, 3, 4, 5]);
        assert_eq!(tree.height(), 5);
    }
}
