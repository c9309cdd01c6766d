//! INSERT operations for BPlusTree.
//!
//! Insertion descends once, recording the path, places the key in its leaf
//! and then repairs overflow bottom-up along the recorded path. Nothing is
//! split preemptively on the way down.

use tracing::{debug, trace};

use crate::config::FillPolicy;
use crate::error::{ModifyResult, TreeError};
use crate::types::{BPlusTree, BranchNode, NodeId, NodeRef, PathStep};

impl<K: Ord + Clone> BPlusTree<K> {
    /// Insert `key`. Returns false, leaving the tree untouched, if the key is
    /// already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiway_tree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// assert!(tree.insert(10));
    /// assert!(!tree.insert(10));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        let (leaf_id, path) = self.find_leaf_with_path(&key);
        if !self.leaf_arena[leaf_id].insert_sorted(key) {
            return false;
        }
        self.len += 1;
        self.rebalance_after_insert(NodeRef::Leaf(leaf_id), path);
        true
    }

    /// Insert `key`, reporting a duplicate as [`TreeError::DuplicateKey`].
    pub fn try_insert(&mut self, key: K) -> ModifyResult<()> {
        if self.insert(key) {
            Ok(())
        } else {
            Err(TreeError::DuplicateKey)
        }
    }

    /// Walk back up the path while the current node overflows.
    fn rebalance_after_insert(&mut self, mut node: NodeRef, mut path: Vec<PathStep>) {
        loop {
            let is_root = path.is_empty();
            if self.node_len(node) <= self.max_keys(is_root) {
                return;
            }

            let Some((parent_id, child_index)) = path.pop() else {
                self.split_root();
                return;
            };

            match self.policy {
                FillPolicy::Balanced => self.split_child(parent_id, child_index),
                FillPolicy::TwoThirds => {
                    if self.spill_to_sibling(parent_id, child_index) {
                        return;
                    }
                    self.split_two_into_three(parent_id, child_index);
                }
            }
            node = NodeRef::Branch(parent_id);
        }
    }

    /// Split `node` in two, returning the separator and the new right node.
    fn split_node(&mut self, node: NodeRef) -> (K, NodeRef) {
        match node {
            NodeRef::Leaf(id) => {
                let new_right = self.leaf_arena[id].split();
                let separator = new_right.keys[0].clone();
                let right_id = self.leaf_arena.allocate(new_right);
                self.leaf_arena[id].next = right_id;
                trace!(leaf = id, right = right_id, "split leaf");
                (separator, NodeRef::Leaf(right_id))
            }
            NodeRef::Branch(id) => {
                let (new_right, promoted) = self.branch_arena[id].split();
                let right_id = self.branch_arena.allocate(new_right);
                trace!(branch = id, right = right_id, "split branch");
                (promoted, NodeRef::Branch(right_id))
            }
        }
    }

    /// Split child `child_index` of `parent_id` and hook the new right node
    /// into the parent.
    fn split_child(&mut self, parent_id: NodeId, child_index: usize) {
        let child = self.branch_arena[parent_id].children[child_index];
        let (separator, new_right) = self.split_node(child);
        self.branch_arena[parent_id].insert_child(child_index, separator, new_right);
    }

    /// Grow the tree by one level: split the root and put a new branch with
    /// exactly two children above the halves.
    fn split_root(&mut self) {
        let old_root = self.root;
        let (separator, new_right) = self.split_node(old_root);
        let new_root = self
            .branch_arena
            .allocate(BranchNode::with_children(separator, old_root, new_right));
        self.root = NodeRef::Branch(new_root);
        debug!(root = new_root, height = self.height(), "root split");
    }

    /// B* overflow relief: move one entry into an adjacent sibling that has
    /// room. Returns false when both neighbours are full.
    fn spill_to_sibling(&mut self, parent_id: NodeId, child_index: usize) -> bool {
        let max_keys = self.order.max_keys();
        let children = &self.branch_arena[parent_id].children;
        let left = child_index.checked_sub(1).map(|i| children[i]);
        let right = children.get(child_index + 1).copied();

        if left.is_some_and(|sibling| self.node_len(sibling) < max_keys) {
            self.rotate_left(parent_id, child_index - 1);
            return true;
        }
        if right.is_some_and(|sibling| self.node_len(sibling) < max_keys) {
            self.rotate_right(parent_id, child_index);
            return true;
        }
        false
    }

    /// B* split: the overflowing node and a full neighbour (the right one when
    /// it exists) are dealt out over three nodes.
    fn split_two_into_three(&mut self, parent_id: NodeId, child_index: usize) {
        let child_count = self.branch_arena[parent_id].children.len();
        let first = if child_index + 1 < child_count {
            child_index
        } else {
            child_index - 1
        };
        self.regroup(parent_id, first, 2, 3);
        debug!(parent = parent_id, first, "split two nodes into three");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_into_empty_root_leaf() {
        let mut tree = BPlusTree::new(3).unwrap();
        assert!(tree.insert(5));
        assert!(tree.insert(1));
        assert!(tree.is_leaf_root());
        assert_eq!(tree.traverse(), vec![(0, vec![1, 5])]);
    }

    #[test]
    fn test_root_split_copies_first_right_key_up() {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in [10, 20, 5] {
            tree.insert(key);
        }
        assert_eq!(
            tree.traverse(),
            vec![(0, vec![10]), (1, vec![5]), (1, vec![10, 20])]
        );
        tree.validate().unwrap();
    }

    #[test]
    fn test_branch_split_promotes_median() {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in 1..=7 {
            tree.insert(key);
        }
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.traverse()[0], (0, vec![3, 5]));
        tree.validate().unwrap();
    }

    #[test]
    fn test_duplicate_insert_is_reported() {
        let mut tree = BPlusTree::new(4).unwrap();
        assert_eq!(tree.try_insert(1), Ok(()));
        assert_eq!(tree.try_insert(1), Err(TreeError::DuplicateKey));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_bstar_spills_before_splitting() {
        let mut tree = BPlusTree::new_bstar(4).unwrap();
        // the root leaf holds up to four keys before it splits into 2 + 3
        for key in [10, 20, 30, 40, 50] {
            tree.insert(key);
        }
        assert_eq!(tree.leaf_sizes(), vec![2, 3]);

        // overflowing the right leaf spills its smallest key into the left one
        tree.insert(60);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.leaf_sizes(), vec![3, 3]);
        assert_eq!(tree.traverse()[0], (0, vec![40]));
        tree.validate().unwrap();
    }

    #[test]
    fn test_bstar_two_into_three_split() {
        let mut tree = BPlusTree::new_bstar(4).unwrap();
        for key in [10, 20, 30, 40, 50, 60] {
            tree.insert(key);
        }
        // both leaves full: the next overflow regroups 3 + 4 keys into three leaves
        tree.insert(70);
        assert_eq!(tree.leaf_sizes(), vec![3, 2, 2]);
        assert_eq!(tree.traverse()[0], (0, vec![40, 60]));
        tree.validate().unwrap();
    }
}
