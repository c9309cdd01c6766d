use multiway_tree::{BPlusTree, BTree, FillPolicy, TreeConfig, TreeError};

const SCENARIO_KEYS: [i32; 8] = [10, 20, 5, 6, 12, 30, 7, 17];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn search_and_delete_on_order_three_bplus_tree() {
    init_tracing();
    let mut tree = BPlusTree::new(3).unwrap();
    for key in SCENARIO_KEYS {
        assert!(tree.insert(key));
        tree.validate().unwrap();
    }
    tree.log_structure();

    assert!(tree.search(&6));
    assert!(!tree.search(&15));

    assert!(tree.delete(&6));
    assert!(!tree.search(&6));
    for key in SCENARIO_KEYS.iter().filter(|key| **key != 6) {
        assert!(tree.search(key), "lost key {}", key);
    }
    tree.validate().unwrap();
}

#[test]
fn search_and_delete_on_order_three_classic_tree() {
    let mut tree = BTree::new(3).unwrap();
    tree.extend(SCENARIO_KEYS);
    assert!(tree.search(&6));
    assert!(!tree.search(&15));

    assert!(tree.delete(&6));
    assert!(!tree.search(&6));
    for key in SCENARIO_KEYS.iter().filter(|key| **key != 6) {
        assert!(tree.search(key), "lost key {}", key);
    }
    tree.validate().unwrap();
}

#[test]
fn range_query_follows_leaf_chain() {
    let mut tree = BPlusTree::new(3).unwrap();
    tree.extend([10, 20, 5, 6, 12, 30, 7, 17, 25, 35, 40, 45]);
    assert!(tree.leaf_count() > 3);

    let keys: Vec<i32> = tree.range_query(&10, &30).copied().collect();
    assert_eq!(keys, vec![10, 12, 17, 20, 25, 30]);

    // restartable: a clone taken mid-scan replays the rest
    let mut scan = tree.range_query(&10, &30);
    scan.next();
    let replay: Vec<i32> = scan.clone().copied().collect();
    assert_eq!(replay, scan.copied().collect::<Vec<_>>());
}

#[test]
fn bstar_tree_keeps_two_thirds_fill() {
    let mut tree = BPlusTree::new_bstar(4).unwrap();
    assert_eq!(tree.policy(), FillPolicy::TwoThirds);
    for key in 1..=15 {
        tree.insert(key);
        tree.validate().unwrap();
    }

    let nodes = tree.traverse();
    for (depth, keys) in nodes.iter().skip(1) {
        assert!(keys.len() >= 2, "node {:?} at depth {} is under-filled", keys, depth);
    }

    let mut bplus = BPlusTree::new(4).unwrap();
    bplus.extend(1..=15);
    let (bstar_nodes, bplus_nodes) = (tree.count_nodes_in_tree(), bplus.count_nodes_in_tree());
    assert!(bstar_nodes.0 <= bplus_nodes.0);
}

#[test]
fn deleting_everything_leaves_a_single_empty_leaf() {
    let keys = [45, 3, 27, 8, 19, 33, 1, 40, 12, 22, 6, 38, 15, 29, 10, 50, 2, 31];
    let delete_order = [19, 1, 50, 27, 8, 45, 3, 12, 38, 6, 22, 40, 2, 15, 31, 33, 10, 29];

    for config in [TreeConfig::bplus(3), TreeConfig::bplus(4), TreeConfig::bstar(4), TreeConfig::bstar(5)] {
        let mut tree = BPlusTree::from_keys(config, keys).unwrap();
        for key in delete_order {
            assert!(tree.delete(&key));
            tree.validate().unwrap();
        }
        assert!(tree.is_empty());
        assert!(tree.is_leaf_root());
        assert_eq!(tree.traverse(), vec![(0, vec![])]);
        assert!(keys.iter().all(|key| !tree.search(key)));
        assert_eq!(tree.try_delete(&1), Err(TreeError::KeyNotFound));
    }

    let mut classic = BTree::from_keys(3, keys).unwrap();
    for key in delete_order {
        assert!(classic.delete(&key));
        classic.validate().unwrap();
    }
    assert!(classic.is_empty());
    assert_eq!(classic.traverse(), vec![(0, vec![])]);
}

#[test]
fn invalid_orders_are_rejected_everywhere() {
    for order in [0, 1, 2] {
        assert!(matches!(BPlusTree::<i32>::new(order), Err(TreeError::InvalidOrder(_))));
        assert!(matches!(BPlusTree::<i32>::new_bstar(order), Err(TreeError::InvalidOrder(_))));
        assert!(matches!(BTree::<i32>::new(order), Err(TreeError::InvalidOrder(_))));
    }
}

#[test]
fn duplicate_inserts_are_noops() {
    let mut tree = BPlusTree::new_bstar(5).unwrap();
    tree.extend(0..50);
    let before = tree.traverse();
    for key in 0..50 {
        assert!(!tree.insert(key));
    }
    assert_eq!(tree.traverse(), before);
    assert_eq!(tree.try_insert(7), Err(TreeError::DuplicateKey));
}
