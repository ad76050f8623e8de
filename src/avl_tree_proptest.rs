#![cfg(test)]

// Property tests for AvlTree kept inside the crate so they can inspect node
// shape through `NodeRef` alongside the public operations.

use crate::avl_tree::{AvlTree, NodeRef};
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16),
    Remove(u16),
    Get(u16),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    // Narrow key range so removals and duplicates hit existing keys often.
    let key = 0u16..64;
    let op = prop_oneof![
        3 => key.clone().prop_map(Op::Insert),
        2 => key.clone().prop_map(Op::Remove),
        1 => key.prop_map(Op::Get),
    ];
    proptest::collection::vec(op, 1..200)
}

// Recompute height and check balance/cache from the outside.
fn audit(node: Option<NodeRef<'_, u16>>) -> usize {
    let Some(node) = node else { return 0 };
    let l = audit(node.left());
    let r = audit(node.right());
    assert_eq!(node.height(), 1 + l.max(r), "height cache");
    assert_eq!(node.balance_factor(), r as isize - l as isize);
    assert!((-1..=1).contains(&node.balance_factor()), "balance");
    1 + l.max(r)
}

// Property: state-machine equivalence against BTreeSet.
// - insert/remove report the same outcome as the model;
// - in-order iteration equals the model's sorted keys;
// - every node keeps a correct height cache and |bf| <= 1.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_btreeset(ops in arb_ops()) {
        let mut sut: AvlTree<u16> = AvlTree::new();
        let mut model: BTreeSet<u16> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => prop_assert_eq!(sut.insert(k), model.insert(k)),
                Op::Remove(k) => {
                    let expected = model.take(&k);
                    prop_assert_eq!(sut.remove(&k), expected);
                }
                Op::Get(k) => prop_assert_eq!(sut.get(&k), model.get(&k)),
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert!(sut.validate().is_ok());
            let h = audit(sut.root());
            prop_assert_eq!(h, sut.height());
        }

        let seen: Vec<u16> = sut.iter().copied().collect();
        let expected: Vec<u16> = model.iter().copied().collect();
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(sut.min(), model.first());
        prop_assert_eq!(sut.max(), model.last());
    }

    // Property: inserting a key twice leaves the same key set as once.
    #[test]
    fn prop_duplicate_insert_idempotent(keys in proptest::collection::vec(any::<u16>(), 0..100)) {
        let once: AvlTree<u16> = keys.iter().copied().collect();
        let twice: AvlTree<u16> = keys.iter().chain(keys.iter()).copied().collect();
        prop_assert!(once.iter().eq(twice.iter()));
        prop_assert_eq!(once.len(), twice.len());
        prop_assert!(twice.validate().is_ok());
    }

    // Property: pre-order and post-order visit every key exactly once.
    #[test]
    fn prop_traversals_cover_all_keys(keys in proptest::collection::btree_set(any::<u16>(), 0..100)) {
        let tree: AvlTree<u16> = keys.iter().copied().collect();
        let pre: BTreeSet<u16> = tree.preorder().copied().collect();
        let post: BTreeSet<u16> = tree.postorder().copied().collect();
        prop_assert_eq!(&pre, &keys);
        prop_assert_eq!(&post, &keys);
        prop_assert_eq!(tree.preorder().count(), keys.len());
        prop_assert_eq!(tree.postorder().count(), keys.len());
        prop_assert_eq!(tree.preorder().next(), tree.root().map(|n| n.key()));
        prop_assert_eq!(tree.postorder().last(), tree.root().map(|n| n.key()));
    }
}
