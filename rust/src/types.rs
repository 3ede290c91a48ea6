//! Core types and data structures shared by the tree variants.
//!
//! This module contains the node model, the per-variant node metadata and the
//! tree structs themselves. Behavior lives in the variant modules.

use crate::compact_arena::{CompactArena, NodeId};

// ============================================================================
// NODE MODEL
// ============================================================================

/// A key with its associated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

/// Node of the binary variants (BST, AVL, red-black).
///
/// `left` and `right` are the owning edges of the tree. Whatever extra shape
/// information a variant needs is carried in `meta`.
#[derive(Debug, Clone)]
pub struct BinaryNode<K, V, M> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) meta: M,
}

/// Height bookkeeping for AVL nodes. A fresh leaf has height 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvlMeta {
    pub(crate) height: u32,
}

impl Default for AvlMeta {
    fn default() -> Self {
        Self { height: 1 }
    }
}

/// Node color of a red-black tree. Absent children count as black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Color plus non-owning parent link for red-black nodes.
///
/// The parent handle is only read while rebalancing; it never decides which
/// node owns which.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RbMeta {
    pub(crate) color: Color,
    pub(crate) parent: Option<NodeId>,
}

impl Default for RbMeta {
    fn default() -> Self {
        Self {
            color: Color::Red,
            parent: None,
        }
    }
}

/// Access to the parent back-reference of a binary node.
///
/// Only the red-black metadata stores one. For the other variants the setter
/// is a no-op, which lets the shared rotation code keep parent links current
/// without knowing which variant it serves.
pub trait NodeMeta: Default {
    fn parent(&self) -> Option<NodeId> {
        None
    }

    fn set_parent(&mut self, _parent: Option<NodeId>) {}
}

impl NodeMeta for () {}

impl NodeMeta for AvlMeta {}

impl NodeMeta for RbMeta {
    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }
}

/// Node of a 2-3 tree.
///
/// Holds one or two sorted entries. Internal nodes have exactly
/// `entries.len() + 1` children; leaves have none. Transiently (inside a
/// single insert or delete) a node may hold 0 or 3 entries.
#[derive(Debug, Clone)]
pub struct MultiwayNode<K, V> {
    pub(crate) entries: Vec<Entry<K, V>>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

/// Which side of a binary node a child hangs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Which neighbour takes the place of a deleted BST node with two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteReplacement {
    /// Maximum of the left subtree.
    #[default]
    Predecessor,
    /// Minimum of the right subtree.
    Successor,
}

// ============================================================================
// TREE STRUCTURES
// ============================================================================

/// Arena-backed binary search tree shared by the binary variants.
///
/// Owns the node storage and the root handle, and provides the key-ordered
/// walk, rotations and traversal. It does no balancing on its own.
#[derive(Debug, Clone)]
pub struct RawBinaryTree<K, V, M> {
    pub(crate) arena: CompactArena<BinaryNode<K, V, M>>,
    pub(crate) root: Option<NodeId>,
    pub(crate) len: usize,
}

/// Unbalanced binary search tree.
///
/// Depth follows insertion order: sorted input degrades it to a list.
///
/// # Examples
///
/// ```
/// use balanced_trees::{BsTree, OrderedMap};
///
/// let mut tree = BsTree::new();
/// tree.insert(2, "two").unwrap();
/// tree.insert(1, "one").unwrap();
///
/// assert_eq!(tree.search(&1), Ok(&"one"));
/// assert!(tree.insert(2, "again").unwrap_err().is_conflict());
/// ```
#[derive(Debug, Clone)]
pub struct BsTree<K, V> {
    pub(crate) raw: RawBinaryTree<K, V, ()>,
    pub(crate) replacement: DeleteReplacement,
}

/// Height-balanced (AVL) search tree.
///
/// Sibling subtrees differ in height by at most one, so depth stays within
/// about 1.44 log2(n).
///
/// # Examples
///
/// ```
/// use balanced_trees::{AvlTree, OrderedMap};
///
/// let mut tree = AvlTree::new();
/// for key in [50, 100, 150] {
///     tree.insert(key, key * 10).unwrap();
/// }
///
/// assert_eq!(tree.root_summary(), Some((&100, &1000)));
/// assert_eq!(tree.height(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AvlTree<K, V> {
    pub(crate) raw: RawBinaryTree<K, V, AvlMeta>,
}

/// Red-black search tree.
///
/// # Examples
///
/// ```
/// use balanced_trees::{OrderedMap, RbTree};
///
/// let mut tree = RbTree::new();
/// for key in 0..64 {
///     tree.insert(key, ()).unwrap();
/// }
/// assert_eq!(tree.delete(&10), Ok(()));
/// assert!(tree.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RbTree<K, V> {
    pub(crate) raw: RawBinaryTree<K, V, RbMeta>,
}

/// 2-3 tree: every node holds one or two entries and all leaves sit at the
/// same depth.
///
/// # Examples
///
/// ```
/// use balanced_trees::{OrderedMap, TwoThreeTree};
///
/// let mut tree = TwoThreeTree::new();
/// for key in 1..=3 {
///     tree.insert(key, key.to_string()).unwrap();
/// }
///
/// assert_eq!(tree.height(), 2);
/// assert_eq!(tree.root_summary(), Some((&2, &"2".to_string())));
/// ```
#[derive(Debug, Clone)]
pub struct TwoThreeTree<K, V> {
    pub(crate) arena: CompactArena<MultiwayNode<K, V>>,
    pub(crate) root: Option<NodeId>,
    pub(crate) len: usize,
}
