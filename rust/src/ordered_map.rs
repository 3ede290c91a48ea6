//! The interface shared by every tree variant.
//!
//! Besides single-key operations the trait provides the bulk "tree
//! arithmetic" operations, `merge` and `subtract`, which replay another
//! tree's traversal through `insert` and `delete`.

use crate::error::{KeyResult, ModifyResult, TreeResult};
use crate::iteration::{InOrderIter, Keys, MultiwayIter, Values};
use crate::types::{AvlMeta, AvlTree, BsTree, RbMeta, RbTree, TwoThreeTree};

/// Key-ordered map operations.
///
/// Duplicate keys are rejected with `TreeError::Conflict`; missing keys are
/// reported with `TreeError::NotFound`. Neither outcome changes the tree.
pub trait OrderedMap<K: Ord, V> {
    /// In-order iterator over the entries.
    type Iter<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Adds a new entry. Fails with `Conflict` if `key` is present.
    fn insert(&mut self, key: K, value: V) -> ModifyResult<()>;

    /// Removes `key` and returns its value. Fails with `NotFound` if absent.
    fn delete(&mut self, key: &K) -> ModifyResult<V>;

    /// Looks up the value stored under `key`.
    fn search(&self, key: &K) -> KeyResult<&V>;

    /// Same as `search`.
    fn get(&self, key: &K) -> KeyResult<&V> {
        self.search(key)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }

    /// Returns the number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in ascending key order.
    ///
    /// Every call starts a fresh traversal. The iterator borrows the tree, so
    /// the tree cannot be mutated until the iterator is dropped.
    fn iter(&self) -> Self::Iter<'_>;

    /// Keys in ascending order.
    fn keys(&self) -> Keys<Self::Iter<'_>> {
        Keys::new(self.iter())
    }

    /// Values in ascending key order.
    fn values(&self) -> Values<Self::Iter<'_>> {
        Values::new(self.iter())
    }

    /// Key and value stored at the root, for diagnostics.
    fn root_summary(&self) -> Option<(&K, &V)>;

    /// Checks every ordering and shape invariant of the variant.
    fn validate(&self) -> TreeResult<()>;

    /// Inserts every entry of `other`, stopping at the first `Conflict`.
    ///
    /// Entries inserted before the conflict stay in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::{AvlTree, OrderedMap};
    ///
    /// let mut evens = AvlTree::new();
    /// let mut odds = AvlTree::new();
    /// for key in 0..10 {
    ///     let tree = if key % 2 == 0 { &mut evens } else { &mut odds };
    ///     tree.insert(key, key * key).unwrap();
    /// }
    ///
    /// evens.merge(&odds).unwrap();
    /// assert_eq!(evens.len(), 10);
    /// assert_eq!(evens.get(&7), Ok(&49));
    /// ```
    fn merge(&mut self, other: &Self) -> ModifyResult<&mut Self>
    where
        Self: Sized,
        K: Clone,
        V: Clone,
    {
        for (key, value) in other.iter() {
            self.insert(key.clone(), value.clone())?;
        }
        Ok(self)
    }

    /// Deletes every key of `other`, stopping at the first `NotFound`.
    ///
    /// Keys deleted before the failure stay deleted.
    fn subtract(&mut self, other: &Self) -> ModifyResult<&mut Self>
    where
        Self: Sized,
    {
        for (key, _) in other.iter() {
            self.delete(key)?;
        }
        Ok(self)
    }
}

// ============================================================================
// BINARY VARIANTS
// ============================================================================

impl<K: Ord, V> OrderedMap<K, V> for BsTree<K, V> {
    type Iter<'a>
        = InOrderIter<'a, K, V, ()>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> ModifyResult<()> {
        self.insert_entry(key, value)
    }

    fn delete(&mut self, key: &K) -> ModifyResult<V> {
        self.delete_entry(key)
    }

    fn search(&self, key: &K) -> KeyResult<&V> {
        self.raw.search(key)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.raw.contains_key(key)
    }

    fn len(&self) -> usize {
        self.raw.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.raw.in_order()
    }

    fn root_summary(&self) -> Option<(&K, &V)> {
        self.raw.root_summary()
    }

    fn validate(&self) -> TreeResult<()> {
        self.check_invariants()
    }
}

impl<K: Ord, V> OrderedMap<K, V> for AvlTree<K, V> {
    type Iter<'a>
        = InOrderIter<'a, K, V, AvlMeta>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> ModifyResult<()> {
        self.insert_entry(key, value)
    }

    fn delete(&mut self, key: &K) -> ModifyResult<V> {
        self.delete_entry(key)
    }

    fn search(&self, key: &K) -> KeyResult<&V> {
        self.raw.search(key)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.raw.contains_key(key)
    }

    fn len(&self) -> usize {
        self.raw.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.raw.in_order()
    }

    fn root_summary(&self) -> Option<(&K, &V)> {
        self.raw.root_summary()
    }

    fn validate(&self) -> TreeResult<()> {
        self.check_invariants()
    }
}

impl<K: Ord, V> OrderedMap<K, V> for RbTree<K, V> {
    type Iter<'a>
        = InOrderIter<'a, K, V, RbMeta>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> ModifyResult<()> {
        self.insert_entry(key, value)
    }

    fn delete(&mut self, key: &K) -> ModifyResult<V> {
        self.delete_entry(key)
    }

    fn search(&self, key: &K) -> KeyResult<&V> {
        self.raw.search(key)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.raw.contains_key(key)
    }

    fn len(&self) -> usize {
        self.raw.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.raw.in_order()
    }

    fn root_summary(&self) -> Option<(&K, &V)> {
        self.raw.root_summary()
    }

    fn validate(&self) -> TreeResult<()> {
        self.check_invariants()
    }
}

// ============================================================================
// MULTIWAY VARIANT
// ============================================================================

impl<K: Ord, V> OrderedMap<K, V> for TwoThreeTree<K, V> {
    type Iter<'a>
        = MultiwayIter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> ModifyResult<()> {
        self.insert_entry(key, value)
    }

    fn delete(&mut self, key: &K) -> ModifyResult<V> {
        self.delete_entry(key)
    }

    fn search(&self, key: &K) -> KeyResult<&V> {
        self.search_entry(key)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.contains(key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.in_order()
    }

    fn root_summary(&self) -> Option<(&K, &V)> {
        self.root_entry()
    }

    fn validate(&self) -> TreeResult<()> {
        self.check_invariants()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;

    fn filled<T: OrderedMap<i32, String> + Default>(keys: &[i32]) -> T {
        let mut tree = T::default();
        for &key in keys {
            tree.insert(key, key.to_string()).unwrap();
        }
        tree
    }

    fn keys<T: OrderedMap<i32, String>>(tree: &T) -> Vec<i32> {
        tree.iter().map(|(k, _)| *k).collect()
    }

    fn check_merge_and_subtract<T: OrderedMap<i32, String> + Default>() {
        let mut left: T = filled(&[1, 3, 5]);
        let right: T = filled(&[2, 4]);

        left.merge(&right).unwrap();
        assert_eq!(keys(&left), vec![1, 2, 3, 4, 5]);
        assert_eq!(left.get(&4), Ok(&"4".to_string()));

        left.subtract(&right).unwrap();
        assert_eq!(keys(&left), vec![1, 3, 5]);
        left.validate().unwrap();
    }

    fn check_merge_stops_at_conflict<T: OrderedMap<i32, String> + Default>() {
        let mut left: T = filled(&[5]);
        let right: T = filled(&[1, 5, 9]);

        assert_eq!(left.merge(&right).err(), Some(TreeError::Conflict));
        assert_eq!(keys(&left), vec![1, 5]);
        assert_eq!(left.get(&5), Ok(&"5".to_string()));
    }

    fn check_subtract_stops_at_missing<T: OrderedMap<i32, String> + Default>() {
        let mut left: T = filled(&[1, 2, 3]);
        let right: T = filled(&[2, 7, 9]);

        assert_eq!(left.subtract(&right).err(), Some(TreeError::NotFound));
        assert_eq!(keys(&left), vec![1, 3]);
    }

    #[test]
    fn test_arithmetic_on_every_variant() {
        check_merge_and_subtract::<BsTree<i32, String>>();
        check_merge_and_subtract::<AvlTree<i32, String>>();
        check_merge_and_subtract::<RbTree<i32, String>>();
        check_merge_and_subtract::<TwoThreeTree<i32, String>>();
    }

    #[test]
    fn test_merge_conflict_on_every_variant() {
        check_merge_stops_at_conflict::<BsTree<i32, String>>();
        check_merge_stops_at_conflict::<AvlTree<i32, String>>();
        check_merge_stops_at_conflict::<RbTree<i32, String>>();
        check_merge_stops_at_conflict::<TwoThreeTree<i32, String>>();
    }

    #[test]
    fn test_subtract_missing_on_every_variant() {
        check_subtract_stops_at_missing::<BsTree<i32, String>>();
        check_subtract_stops_at_missing::<AvlTree<i32, String>>();
        check_subtract_stops_at_missing::<RbTree<i32, String>>();
        check_subtract_stops_at_missing::<TwoThreeTree<i32, String>>();
    }
}
