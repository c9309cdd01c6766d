// Property-based tests: arbitrary operation sequences against BTreeSet

use std::collections::BTreeSet;
use std::ops::Bound;

use multiway_tree::{BPlusTree, BTree, TreeConfig};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(i16),
    Delete(i16),
}

mod strategies {
    use super::*;

    pub fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (-200i16..200).prop_map(Op::Insert),
            2 => (-200i16..200).prop_map(Op::Delete),
        ]
    }

    pub fn config_strategy() -> impl Strategy<Value = TreeConfig> {
        (3usize..=9, any::<bool>()).prop_map(|(order, two_thirds)| {
            if two_thirds {
                TreeConfig::bstar(order)
            } else {
                TreeConfig::bplus(order)
            }
        })
    }

    pub fn bound_strategy() -> impl Strategy<Value = Bound<i16>> {
        prop_oneof![
            (-220i16..220).prop_map(Bound::Included),
            (-220i16..220).prop_map(Bound::Excluded),
            Just(Bound::Unbounded),
        ]
    }
}

use strategies::*;

/// std's `range` panics on inverted or empty-excluded bounds; the trees
/// yield nothing instead.
fn reference_range(set: &BTreeSet<i16>, start: Bound<i16>, end: Bound<i16>) -> Vec<i16> {
    set.iter()
        .copied()
        .filter(|key| match start {
            Bound::Included(s) => *key >= s,
            Bound::Excluded(s) => *key > s,
            Bound::Unbounded => true,
        })
        .filter(|key| match end {
            Bound::Included(e) => *key <= e,
            Bound::Excluded(e) => *key < e,
            Bound::Unbounded => true,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn leaf_linked_tree_matches_btreeset(
        config in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..400),
    ) {
        let mut tree = BPlusTree::with_config(config).unwrap();
        let mut reference = BTreeSet::new();
        for op in ops {
            match op {
                Op::Insert(key) => {
                    prop_assert_eq!(tree.insert(key), reference.insert(key));
                }
                Op::Delete(key) => {
                    prop_assert_eq!(tree.delete(&key), reference.remove(&key));
                }
            }
        }
        prop_assert!(tree.check_invariants());
        prop_assert_eq!(tree.len(), reference.len());
        prop_assert!(tree.iter().eq(reference.iter()));
    }

    #[test]
    fn classic_tree_matches_btreeset(
        order in 3usize..=9,
        ops in prop::collection::vec(op_strategy(), 0..400),
    ) {
        let mut tree = BTree::new(order).unwrap();
        let mut reference = BTreeSet::new();
        for op in ops {
            match op {
                Op::Insert(key) => {
                    prop_assert_eq!(tree.insert(key), reference.insert(key));
                }
                Op::Delete(key) => {
                    prop_assert_eq!(tree.delete(&key), reference.remove(&key));
                }
            }
        }
        prop_assert!(tree.check_invariants());
        prop_assert!(tree.iter().eq(reference.iter()));
    }

    #[test]
    fn range_matches_filtered_reference(
        config in config_strategy(),
        keys in prop::collection::btree_set(-200i16..200, 0..200),
        start in bound_strategy(),
        end in bound_strategy(),
    ) {
        let tree = BPlusTree::from_keys(config, keys.iter().copied()).unwrap();
        let classic = BTree::from_keys(config.order, keys.iter().copied()).unwrap();
        let expected = reference_range(&keys, start, end);

        let got: Vec<i16> = tree.range((start, end)).copied().collect();
        prop_assert_eq!(&got, &expected);
        let got_classic: Vec<i16> = classic.range((start, end)).copied().collect();
        prop_assert_eq!(&got_classic, &expected);
    }

    #[test]
    fn traverse_visits_every_node_once(
        config in config_strategy(),
        keys in prop::collection::vec(any::<i16>(), 0..300),
    ) {
        let tree = BPlusTree::from_keys(config, keys).unwrap();
        let (leaves, branches) = tree.count_nodes_in_tree();
        let (leaf_stats, branch_stats) = tree.arena_stats();
        prop_assert_eq!(tree.traverse().len(), leaves + branches);
        prop_assert_eq!(leaves + branches, leaf_stats.allocated_count + branch_stats.allocated_count);
        let total: usize = tree
            .traverse()
            .iter()
            .filter(|(depth, _)| depth + 1 == tree.height())
            .map(|(_, keys)| keys.len())
            .sum();
        prop_assert_eq!(total, tree.len());
    }

    #[test]
    fn insert_is_idempotent(
        config in config_strategy(),
        keys in prop::collection::vec(-100i16..100, 1..150),
    ) {
        let mut tree = BPlusTree::from_keys(config, keys.iter().copied()).unwrap();
        let snapshot = tree.traverse();
        for key in &keys {
            prop_assert!(!tree.insert(*key));
        }
        prop_assert_eq!(tree.traverse(), snapshot);
    }
}
