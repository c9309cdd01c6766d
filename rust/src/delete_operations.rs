//! DELETE operations for BPlusTree.
//!
//! A key is removed from its leaf, then underflow is repaired bottom-up along
//! the descent path: borrow from an adjacent sibling when one can spare an
//! entry, otherwise merge. Finally an empty branch root is collapsed so the
//! tree shrinks by a level.

use tracing::debug;

use crate::config::FillPolicy;
use crate::error::{ModifyResult, TreeError};
use crate::types::{BPlusTree, NodeId, NodeRef, PathStep};

impl<K: Ord + Clone> BPlusTree<K> {
    /// Remove `key`. Returns false if it was not present.
    ///
    /// ```
    /// use multiway_tree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// tree.extend([1, 2, 3, 4]);
    /// assert!(tree.delete(&3));
    /// assert!(!tree.delete(&3));
    /// assert_eq!(tree.len(), 3);
    /// ```
    pub fn delete(&mut self, key: &K) -> bool {
        let (leaf_id, path) = self.find_leaf_with_path(key);
        if !self.leaf_arena[leaf_id].remove_key(key) {
            return false;
        }
        self.len -= 1;
        self.rebalance_after_delete(NodeRef::Leaf(leaf_id), path);
        true
    }

    /// Remove `key`, reporting an absent key as [`TreeError::KeyNotFound`].
    pub fn try_delete(&mut self, key: &K) -> ModifyResult<()> {
        if self.delete(key) {
            Ok(())
        } else {
            Err(TreeError::KeyNotFound)
        }
    }

    /// Alias of [`delete`](Self::delete) matching the std collections.
    pub fn remove(&mut self, key: &K) -> bool {
        self.delete(key)
    }

    fn rebalance_after_delete(&mut self, mut node: NodeRef, mut path: Vec<PathStep>) {
        while let Some((parent_id, child_index)) = path.pop() {
            if self.node_len(node) >= self.min_keys() {
                return;
            }
            self.repair_underflow(parent_id, child_index);
            node = NodeRef::Branch(parent_id);
        }
        self.collapse_root_if_needed();
    }

    /// Bring child `child_index` of `parent_id` back to the minimum fill.
    fn repair_underflow(&mut self, parent_id: NodeId, child_index: usize) {
        let children = &self.branch_arena[parent_id].children;
        let child_count = children.len();
        let left = child_index.checked_sub(1).map(|i| children[i]);
        let right = children.get(child_index + 1).copied();

        if left.is_some_and(|sibling| self.can_donate(sibling)) {
            self.rotate_right(parent_id, child_index - 1);
            return;
        }
        if right.is_some_and(|sibling| self.can_donate(sibling)) {
            self.rotate_left(parent_id, child_index);
            return;
        }

        match self.policy {
            FillPolicy::Balanced => {
                let first = if left.is_some() { child_index - 1 } else { child_index };
                self.regroup(parent_id, first, 2, 1);
            }
            FillPolicy::TwoThirds if child_count >= 3 => {
                let first = child_index.saturating_sub(1).min(child_count - 3);
                let count_out = if self.group_fits(parent_id, first, 3, 2) { 2 } else { 3 };
                self.regroup(parent_id, first, 3, count_out);
            }
            // a two-child parent: both siblings sit at or below the minimum, so one node holds them
            FillPolicy::TwoThirds => self.regroup(parent_id, 0, 2, 1),
        }
    }

    /// Replace a key-less branch root by its only child, repeatedly.
    fn collapse_root_if_needed(&mut self) {
        while let NodeRef::Branch(root_id) = self.root {
            let root = &self.branch_arena[root_id];
            if !root.keys.is_empty() {
                return;
            }
            let Some(&only_child) = root.children.first() else {
                return;
            };
            self.root = only_child;
            self.branch_arena.deallocate(root_id);
            debug!(old_root = root_id, height = self.height(), "root collapsed");
        }
    }
}
