//! Worked examples of the balancing behavior of each variant.

use balanced_trees::{AvlTree, BsTree, DeleteReplacement, OrderedMap, TwoThreeTree};

fn root_key<T: OrderedMap<i32, i32>>(tree: &T) -> Option<i32> {
    tree.root_summary().map(|(k, _)| *k)
}

fn in_order<T: OrderedMap<i32, i32>>(tree: &T) -> Vec<i32> {
    tree.keys().copied().collect()
}

#[test]
fn test_avl_single_left_rotation() {
    let mut tree = AvlTree::new();
    tree.insert(50, 500).unwrap();
    tree.insert(100, 1000).unwrap();
    assert_eq!(root_key(&tree), Some(50));
    assert_eq!(tree.height(), 2);

    tree.insert(150, 1500).unwrap();
    assert_eq!(tree.root_summary(), Some((&100, &1000)));
    assert_eq!(tree.height(), 2);
    tree.validate().unwrap();
}

#[test]
fn test_avl_single_right_rotation() {
    let mut tree = AvlTree::new();
    for key in [50, 0, -50] {
        tree.insert(key, key).unwrap();
    }
    assert_eq!(root_key(&tree), Some(0));
    assert_eq!(tree.height(), 2);
    assert_eq!(in_order(&tree), vec![-50, 0, 50]);
}

#[test]
fn test_two_three_split_on_third_insert() {
    let mut tree = TwoThreeTree::new();
    tree.insert(1, 1).unwrap();
    tree.insert(2, 2).unwrap();
    assert_eq!(tree.height(), 1);

    tree.insert(3, 3).unwrap();
    assert_eq!(tree.height(), 2);
    let root = tree.node(tree.root().unwrap()).unwrap();
    assert_eq!(root.entries().len(), 1);
    assert_eq!(root.entries()[0].key, 2);
    assert_eq!(root.children().len(), 2);

    tree.insert(4, 4).unwrap();
    assert_eq!(tree.height(), 2);
    let root = tree.node(tree.root().unwrap()).unwrap();
    let right = tree.node(root.children()[1]).unwrap();
    let right_keys: Vec<i32> = right.entries().iter().map(|e| e.key).collect();
    assert_eq!(right_keys, vec![3, 4]);
    tree.validate().unwrap();
}

fn scenario_d(replacement: DeleteReplacement) -> BsTree<i32, i32> {
    let mut tree = BsTree::with_replacement(replacement);
    for key in [1, 2, -1] {
        tree.insert(key, key * 10).unwrap();
    }
    assert_eq!(tree.delete(&1), Ok(10));
    tree.validate().unwrap();
    tree
}

#[test]
fn test_bst_delete_with_predecessor() {
    let tree = scenario_d(DeleteReplacement::default());
    assert_eq!(tree.root_summary(), Some((&-1, &-10)));
    assert_eq!(in_order(&tree), vec![-1, 2]);
}

#[test]
fn test_bst_delete_with_successor() {
    let tree = scenario_d(DeleteReplacement::Successor);
    assert_eq!(tree.root_summary(), Some((&2, &20)));
    assert_eq!(in_order(&tree), vec![-1, 2]);
}
