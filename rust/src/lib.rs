//! Ordered key-value maps built on four search-tree variants.
//!
//! All variants share the [`OrderedMap`] interface: unique keys, `insert`
//! rejects duplicates, `delete` and `search` report missing keys, and `iter`
//! yields entries in ascending key order.
//!
//! - [`BsTree`]: plain binary search tree, no rebalancing.
//! - [`AvlTree`]: height-balanced binary tree.
//! - [`RbTree`]: red-black tree.
//! - [`TwoThreeTree`]: multiway tree whose leaves all sit at the same depth.
//!
//! Nodes live in a per-tree slot arena and refer to each other by
//! [`NodeId`] handles, so cloning a tree gives a fully independent copy.
//!
//! ```
//! use balanced_trees::{OrderedMap, RbTree, TreeError};
//!
//! let mut tree = RbTree::new();
//! tree.insert(2, "two").unwrap();
//! tree.insert(1, "one").unwrap();
//! assert_eq!(tree.insert(2, "again"), Err(TreeError::Conflict));
//!
//! let keys: Vec<_> = tree.keys().copied().collect();
//! assert_eq!(keys, vec![1, 2]);
//! assert_eq!(tree.delete(&1), Ok("one"));
//! assert_eq!(tree.search(&1), Err(TreeError::NotFound));
//! ```

mod avl;
mod binary_tree;
mod bst;
mod compact_arena;
mod error;
mod iteration;
mod node;
mod ordered_map;
mod red_black;
mod two_three;
mod types;
mod validation;

pub use compact_arena::NodeId;
pub use error::{KeyResult, ModifyResult, TreeError, TreeResult};
pub use iteration::{
    InOrderIter, Keys, LevelOrderIter, MultiwayIter, MultiwayLevelOrderIter, Values,
};
pub use ordered_map::OrderedMap;
pub use types::{
    AvlMeta, AvlTree, BinaryNode, BsTree, Color, DeleteReplacement, Entry, MultiwayNode, NodeMeta,
    RbMeta, RbTree, Side, TwoThreeTree,
};

#[cfg(test)]
mod clone_tests {
    use super::*;

    #[test]
    fn test_clone_is_independent() {
        let mut original = TwoThreeTree::new();
        for key in 0..20 {
            original.insert(key, key.to_string()).unwrap();
        }

        let mut copy = original.clone();
        copy.delete(&3).unwrap();
        copy.insert(100, "hundred".to_string()).unwrap();

        assert_eq!(original.len(), 20);
        assert_eq!(original.get(&3), Ok(&"3".to_string()));
        assert_eq!(original.get(&100), Err(TreeError::NotFound));
        assert_eq!(copy.len(), 20);
        original.validate().unwrap();
        copy.validate().unwrap();
    }

    #[test]
    fn test_clone_preserves_shape() {
        let mut original = AvlTree::new();
        for key in [40, 20, 60, 10, 30, 50, 70] {
            original.insert(key, ()).unwrap();
        }
        let copy = original.clone();

        let a: Vec<_> = original.level_order().map(|(k, _)| *k).collect();
        let b: Vec<_> = copy.level_order().map(|(k, _)| *k).collect();
        assert_eq!(a, b);
        assert_eq!(original.height(), copy.height());
    }
}
