//! Property tests: every variant keeps its invariants after every operation.

use balanced_trees::{AvlTree, BsTree, DeleteReplacement, OrderedMap, RbTree, TwoThreeTree};
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Op {
    Insert(u16),
    Delete(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u16..256).prop_map(Op::Insert),
        2 => (0u16..256).prop_map(Op::Delete),
    ]
}

fn apply_checked<T: OrderedMap<u16, u32>>(mut tree: T, ops: &[Op]) -> Result<(), TestCaseError> {
    let mut model = BTreeMap::new();
    for op in ops {
        match *op {
            Op::Insert(key) => {
                let result = tree.insert(key, u32::from(key) * 3);
                prop_assert_eq!(result.is_ok(), !model.contains_key(&key));
                model.entry(key).or_insert(u32::from(key) * 3);
            }
            Op::Delete(key) => {
                let result = tree.delete(&key);
                prop_assert_eq!(result.ok(), model.remove(&key));
            }
        }
        prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
        prop_assert_eq!(tree.len(), model.len());
    }

    let keys: Vec<u16> = tree.keys().copied().collect();
    let expected: Vec<u16> = model.keys().copied().collect();
    prop_assert_eq!(keys, expected);
    Ok(())
}

proptest! {
    #[test]
    fn bst_keeps_invariants(ops in prop::collection::vec(op_strategy(), 0..200)) {
        apply_checked(BsTree::new(), &ops)?;
    }

    #[test]
    fn bst_successor_keeps_invariants(ops in prop::collection::vec(op_strategy(), 0..200)) {
        apply_checked(BsTree::with_replacement(DeleteReplacement::Successor), &ops)?;
    }

    #[test]
    fn avl_keeps_invariants(ops in prop::collection::vec(op_strategy(), 0..200)) {
        apply_checked(AvlTree::new(), &ops)?;
    }

    #[test]
    fn red_black_keeps_invariants(ops in prop::collection::vec(op_strategy(), 0..200)) {
        apply_checked(RbTree::new(), &ops)?;
    }

    #[test]
    fn two_three_keeps_invariants(ops in prop::collection::vec(op_strategy(), 0..200)) {
        apply_checked(TwoThreeTree::new(), &ops)?;
    }

    #[test]
    fn merge_is_union_of_disjoint_trees(keys in prop::collection::btree_set(0u16..1000, 0..100)) {
        let mut left: RbTree<u16, u32> = RbTree::new();
        let mut right: RbTree<u16, u32> = RbTree::new();
        for (n, &key) in keys.iter().enumerate() {
            let tree = if n % 3 == 0 { &mut left } else { &mut right };
            tree.insert(key, u32::from(key)).unwrap();
        }
        left.merge(&right).unwrap();
        prop_assert!(left.validate().is_ok());
        let expected: Vec<u16> = keys.into_iter().collect();
        prop_assert_eq!(left.keys().copied().collect::<Vec<_>>(), expected);
    }
}
