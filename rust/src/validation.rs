//! Invariant checking for every tree variant.
//!
//! The checkers walk the whole tree and report the first violation as a
//! `TreeError::CorruptedTree`. They never modify the tree, so they can be
//! called between any two operations.

use crate::compact_arena::NodeId;
use crate::error::{TreeError, TreeResult};
use crate::types::{
    AvlMeta, AvlTree, BsTree, Color, NodeMeta, RawBinaryTree, RbMeta, RbTree, TwoThreeTree,
};

/// Pending node, its expected parent and the exclusive key bounds of its subtree.
type BinaryFrame<'a, K> = (NodeId, Option<NodeId>, Option<&'a K>, Option<&'a K>);

/// Same as `BinaryFrame`, plus the depth of the node.
type MultiwayFrame<'a, K> = (NodeId, Option<NodeId>, usize, Option<&'a K>, Option<&'a K>);

// ============================================================================
// SHARED BINARY CHECKS
// ============================================================================

impl<K: Ord, V, M: NodeMeta> RawBinaryTree<K, V, M> {
    /// Checks the search-tree ordering, the entry count and, when
    /// `track_parents` is set, every parent back-reference.
    ///
    /// Iterative, so a degenerate unbalanced tree cannot overflow the stack.
    fn check_search_order(&self, component: &str, track_parents: bool) -> TreeResult<()> {
        let mut visited = 0usize;
        let mut stack: Vec<BinaryFrame<'_, K>> = Vec::new();

        if let Some(root) = self.root {
            stack.push((root, None, None, None));
        }

        while let Some((id, parent, lower, upper)) = stack.pop() {
            let node = self.arena.get(id).ok_or_else(|| {
                TreeError::corrupted_tree(component, &format!("dangling node handle {}", id))
            })?;
            visited += 1;

            if visited > self.arena.len() {
                return Err(TreeError::corrupted_tree(
                    component,
                    "node reachable more than once",
                ));
            }
            if lower.is_some_and(|lower| node.key <= *lower)
                || upper.is_some_and(|upper| node.key >= *upper)
            {
                return Err(TreeError::corrupted_tree(
                    component,
                    &format!("node {} is out of key order", id),
                ));
            }
            if track_parents && node.meta.parent() != parent {
                return Err(TreeError::corrupted_tree(
                    component,
                    &format!(
                        "node {} records parent {:?}, expected {:?}",
                        id,
                        node.meta.parent(),
                        parent
                    ),
                ));
            }

            if let Some(left) = node.left {
                stack.push((left, Some(id), lower, Some(&node.key)));
            }
            if let Some(right) = node.right {
                stack.push((right, Some(id), Some(&node.key), upper));
            }
        }

        if visited != self.len {
            return Err(TreeError::corrupted_tree(
                component,
                &format!("{} reachable entries vs len {}", visited, self.len),
            ));
        }
        if visited != self.arena.len() {
            return Err(TreeError::corrupted_tree(
                component,
                &format!(
                    "{} reachable nodes vs {} allocated",
                    visited,
                    self.arena.len()
                ),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// VARIANT CHECKS
// ============================================================================

impl<K: Ord, V> BsTree<K, V> {
    pub(crate) fn check_invariants(&self) -> TreeResult<()> {
        self.raw.check_search_order("BST", false)
    }
}

impl<K: Ord, V> AvlTree<K, V> {
    /// Ordering plus correct cached heights and |balance| <= 1 everywhere.
    pub(crate) fn check_invariants(&self) -> TreeResult<()> {
        self.raw.check_search_order("AVL", false)?;
        self.checked_height(self.raw.root)?;
        Ok(())
    }

    fn checked_height(&self, id: Option<NodeId>) -> TreeResult<u32> {
        let Some(id) = id else {
            return Ok(0);
        };
        let node = self.raw.node(id);
        let left = self.checked_height(node.left)?;
        let right = self.checked_height(node.right)?;

        let actual = 1 + left.max(right);
        let AvlMeta { height } = node.meta;
        if height != actual {
            return Err(TreeError::corrupted_tree(
                "AVL",
                &format!("node {} caches height {} but has {}", id, height, actual),
            ));
        }
        if left.abs_diff(right) > 1 {
            return Err(TreeError::corrupted_tree(
                "AVL",
                &format!("node {} has subtree heights {} and {}", id, left, right),
            ));
        }
        Ok(actual)
    }
}

impl<K: Ord, V> RbTree<K, V> {
    /// Ordering, parent links, black root, no red node with a red child and
    /// the same number of black nodes on every root-to-leaf path.
    pub(crate) fn check_invariants(&self) -> TreeResult<()> {
        self.raw.check_search_order("Red-black", true)?;
        if self.is_red_at(self.raw.root) {
            return Err(TreeError::corrupted_tree("Red-black", "root is red"));
        }
        self.black_height(self.raw.root)?;
        Ok(())
    }

    fn is_red_at(&self, id: Option<NodeId>) -> bool {
        self.color_of(id) == Color::Red
    }

    fn black_height(&self, id: Option<NodeId>) -> TreeResult<usize> {
        let Some(id) = id else {
            return Ok(1);
        };
        let node = self.raw.node(id);
        let RbMeta { color, .. } = node.meta;

        if color == Color::Red && (self.is_red_at(node.left) || self.is_red_at(node.right)) {
            return Err(TreeError::corrupted_tree(
                "Red-black",
                &format!("red node {} has a red child", id),
            ));
        }

        let left = self.black_height(node.left)?;
        let right = self.black_height(node.right)?;
        if left != right {
            return Err(TreeError::corrupted_tree(
                "Red-black",
                &format!("node {} has black heights {} and {}", id, left, right),
            ));
        }
        Ok(left + usize::from(color == Color::Black))
    }
}

impl<K: Ord, V> TwoThreeTree<K, V> {
    /// Node sizes, child counts, key ranges, parent links, uniform leaf
    /// depth and the entry and node counts.
    pub(crate) fn check_invariants(&self) -> TreeResult<()> {
        let Some(root) = self.root else {
            if self.len != 0 || !self.arena.is_empty() {
                return Err(TreeError::corrupted_tree(
                    "2-3",
                    &format!(
                        "empty tree with len {} and {} allocated nodes",
                        self.len,
                        self.arena.len()
                    ),
                ));
            }
            return Ok(());
        };

        let mut entries = 0usize;
        let mut nodes = 0usize;
        let mut leaf_depth: Option<usize> = None;
        let mut stack: Vec<MultiwayFrame<'_, K>> = vec![(root, None, 1, None, None)];

        while let Some((id, parent, depth, lower, upper)) = stack.pop() {
            let node = self.arena.get(id).ok_or_else(|| {
                TreeError::corrupted_tree("2-3", &format!("dangling node handle {}", id))
            })?;
            nodes += 1;
            entries += node.entries.len();

            if nodes > self.arena.len() {
                return Err(TreeError::corrupted_tree(
                    "2-3",
                    "node reachable more than once",
                ));
            }
            if !(1..=2).contains(&node.entries.len()) {
                return Err(TreeError::corrupted_tree(
                    "2-3",
                    &format!("node {} holds {} entries", id, node.entries.len()),
                ));
            }
            if !node.entries_within(lower, upper) {
                return Err(TreeError::corrupted_tree(
                    "2-3",
                    &format!("node {} is out of key order", id),
                ));
            }
            if node.parent != parent {
                return Err(TreeError::corrupted_tree(
                    "2-3",
                    &format!(
                        "node {} records parent {:?}, expected {:?}",
                        id, node.parent, parent
                    ),
                ));
            }

            if node.is_leaf() {
                match leaf_depth {
                    None => leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(TreeError::corrupted_tree(
                            "2-3",
                            &format!("leaf {} at depth {}, expected {}", id, depth, expected),
                        ));
                    }
                    Some(_) => {}
                }
                continue;
            }

            if node.children.len() != node.entries.len() + 1 {
                return Err(TreeError::corrupted_tree(
                    "2-3",
                    &format!(
                        "node {} has {} entries and {} children",
                        id,
                        node.entries.len(),
                        node.children.len()
                    ),
                ));
            }
            for (index, &child) in node.children.iter().enumerate() {
                let child_lower = index.checked_sub(1).map(|i| &node.entries[i].key).or(lower);
                let child_upper = node.entries.get(index).map(|e| &e.key).or(upper);
                stack.push((child, Some(id), depth + 1, child_lower, child_upper));
            }
        }

        if entries != self.len {
            return Err(TreeError::corrupted_tree(
                "2-3",
                &format!("{} reachable entries vs len {}", entries, self.len),
            ));
        }
        if nodes != self.arena.len() {
            return Err(TreeError::corrupted_tree(
                "2-3",
                &format!(
                    "{} reachable nodes vs {} allocated",
                    nodes,
                    self.arena.len()
                ),
            ));
        }
        Ok(())
    }
}
