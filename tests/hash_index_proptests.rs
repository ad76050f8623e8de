use avl_hashindex::{AvlTree, HashIndex, IndexConfig};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug)]
enum Op {
    Insert(usize),
    Remove(usize),
    Search(String),
}

// Pool-indexed operations: indices shrink toward earlier keys, so failing
// cases minimize well.
fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<Op>)> {
    let capacity = prop_oneof![Just(1usize), Just(2), Just(7), Just(151)];
    (capacity, proptest::collection::vec("[A-Za-z]{1,8}", 1..=24)).prop_flat_map(
        |(capacity, pool)| {
            let idx = 0..pool.len();
            let op = prop_oneof![
                3 => idx.clone().prop_map(Op::Insert),
                2 => idx.prop_map(Op::Remove),
                1 => "[A-Za-z]{0,8}".prop_map(Op::Search),
            ];
            proptest::collection::vec(op, 1..120)
                .prop_map(move |ops| (capacity, pool.clone(), ops))
        },
    )
}

// Property: state-machine equivalence against BTreeSet.
// Invariants exercised across random operation sequences:
// - insert returns true iff the key was new; remove returns the key iff present.
// - search parity with the model, for pool keys and arbitrary strings.
// - every bucket tree validates after each step; len matches the model.
// - height_of is Some(bucket tree height) for present keys, None otherwise.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_index_matches_model((capacity, pool, ops) in arb_scenario()) {
        let cfg = IndexConfig::new().with_capacity(capacity);
        let mut sut: HashIndex<String> = HashIndex::with_config(cfg).unwrap();
        let mut model: BTreeSet<String> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(i) => {
                    let k = pool[i].clone();
                    prop_assert_eq!(sut.insert(k.clone()), model.insert(k));
                }
                Op::Remove(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.remove(k.as_str()), model.take(k));
                }
                Op::Search(s) => {
                    prop_assert_eq!(sut.search(s.as_str()), model.contains(&s));
                }
            }
            prop_assert!(sut.validate().is_ok());
            prop_assert_eq!(sut.len(), model.len());
        }

        for k in &pool {
            let expected = if model.contains(k) {
                sut.bucket(sut.bucket_of(k.as_str())).map(AvlTree::height)
            } else {
                None
            };
            prop_assert_eq!(sut.height_of(k.as_str()), expected);
        }

        let seen: BTreeSet<String> = sut.iter().cloned().collect();
        prop_assert_eq!(seen, model);
    }

    // Property: all present keys in one bucket report one height.
    #[test]
    fn prop_bucket_height_consistency(keys in proptest::collection::vec("[a-z]{1,6}", 1..200)) {
        let idx: HashIndex<String> = keys.iter().cloned().collect();
        let mut per_bucket: HashMap<usize, usize> = HashMap::new();
        for k in &keys {
            let h = idx.height_of(k.as_str());
            prop_assert!(h.is_some());
            let h = h.unwrap();
            prop_assert!(h >= 1);
            let prev = *per_bucket.entry(idx.bucket_of(k.as_str())).or_insert(h);
            prop_assert_eq!(prev, h);
        }
    }
}
