//! Slot arena used as node storage by every tree variant.
//!
//! Nodes are addressed by `NodeId` handles instead of pointers, so parent
//! back-references are plain copies of a handle and never own anything.
//! Freed slots are recycled through a free list.

use std::convert::TryFrom;
use std::ops::{Index, IndexMut};

/// Handle to a node stored in a `CompactArena`.
pub type NodeId = u32;

/// Arena allocator holding tree nodes in a single `Vec`.
///
/// Cloning the arena clones every live node, which is what gives the trees
/// their deep-copy semantics: handles stay valid in the clone because slot
/// positions are preserved.
#[derive(Debug, Clone)]
pub struct CompactArena<T> {
    /// Slot storage; `None` marks a free slot.
    storage: Vec<Option<T>>,
    /// Free slot indices for reuse
    free_list: Vec<usize>,
    /// Number of occupied slots
    allocated: usize,
}

impl<T> CompactArena<T> {
    /// Create a new empty compact arena
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated: 0,
        }
    }

    /// Create a new compact arena with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            allocated: 0,
        }
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = if let Some(free_index) = self.free_list.pop() {
            self.storage[free_index] = Some(item);
            free_index
        } else {
            let index = self.storage.len();
            self.storage.push(Some(item));
            index
        };
        self.allocated += 1;

        NodeId::try_from(index).expect("arena exceeded NodeId range")
    }

    /// Deallocate an item from the arena and return it
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T> {
        let index = usize::try_from(id).ok()?;
        let item = self.storage.get_mut(index)?.take()?;
        self.free_list.push(index);
        self.allocated -= 1;
        Some(item)
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        let index = usize::try_from(id).ok()?;
        self.storage.get(index)?.as_ref()
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let index = usize::try_from(id).ok()?;
        self.storage.get_mut(index)?.as_mut()
    }

    /// Get mutable references to two distinct items at once.
    ///
    /// Panics if the handles are equal or either one is not allocated.
    pub fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut T, &mut T) {
        assert_ne!(a, b, "pair_mut needs two distinct handles");
        let (low, high, swapped) = if a < b { (a, b, false) } else { (b, a, true) };
        let (head, tail) = self.storage.split_at_mut(high as usize);
        let first = head.get_mut(low as usize).and_then(Option::as_mut);
        let second = tail.first_mut().and_then(Option::as_mut);
        match (first, second) {
            (Some(x), Some(y)) if swapped => (y, x),
            (Some(x), Some(y)) => (x, y),
            _ => panic!("dangling node handle in pair {} / {}", a, b),
        }
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.allocated
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }

    /// Clear all items from the arena
    pub fn clear(&mut self) {
        self.storage.clear();
        self.free_list.clear();
        self.allocated = 0;
    }
}

impl<T> Default for CompactArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Indexing a freed or unknown handle means a balancer lost track of a node.
// That is a defect in the tree, so fail immediately instead of limping on.
impl<T> Index<NodeId> for CompactArena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(item) => item,
            None => panic!("dangling node handle {}", id),
        }
    }
}

impl<T> IndexMut<NodeId> for CompactArena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.get_mut(id) {
            Some(item) => item,
            None => panic!("dangling node handle {}", id),
        }
    }
}
