//! DELETE operations for BTree.
//!
//! A key held by a branch is swapped for its in-order predecessor, the
//! rightmost key of the subtree to its left, so the physical removal always
//! happens in a leaf. Underflow is then repaired bottom-up by rotation
//! through the parent or by merging with the separator pulled down.

use tracing::{debug, trace};

use super::{BTree, Descent};
use crate::error::{ModifyResult, TreeError};
use crate::types::{NodeId, NodeRef};

impl<K: Ord + Clone> BTree<K> {
    /// Remove `key`. Returns false if it was not present.
    pub fn delete(&mut self, key: &K) -> bool {
        let mut path = Vec::new();
        let leaf_id = match self.descend(key, &mut path) {
            Descent::Leaf(id) => {
                let leaf = &mut self.leaf_arena[id];
                match leaf.binary_search(key) {
                    Ok(index) => leaf.remove(index),
                    Err(_) => return false,
                };
                id
            }
            Descent::InBranch(branch_id, index) => {
                path.push((branch_id, index));
                let left_child = self.branch_arena[branch_id].children[index];
                let leaf_id = self.rightmost_leaf(left_child, &mut path);
                let Some(predecessor) = self.leaf_arena[leaf_id].pop() else {
                    return false;
                };
                self.branch_arena[branch_id].keys[index] = predecessor;
                leaf_id
            }
        };
        self.len -= 1;

        let mut node = NodeRef::Leaf(leaf_id);
        while let Some((parent_id, child_index)) = path.pop() {
            if self.node_len(node) >= self.min_keys() {
                break;
            }
            self.repair_underflow(parent_id, child_index);
            node = NodeRef::Branch(parent_id);
        }
        self.collapse_root_if_needed();
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

    /// Follow last children from `node` down to a leaf, extending `path`.
    fn rightmost_leaf(&self, mut node: NodeRef, path: &mut Vec<(NodeId, usize)>) -> NodeId {
        loop {
            match node {
                NodeRef::Leaf(id) => return id,
                NodeRef::Branch(id) => {
                    let children = &self.branch_arena[id].children;
                    let last = children.len() - 1;
                    path.push((id, last));
                    node = children[last];
                }
            }
        }
    }

    fn repair_underflow(&mut self, parent_id: NodeId, child_index: usize) {
        let children = &self.branch_arena[parent_id].children;
        let left = child_index.checked_sub(1).map(|i| children[i]);
        let right = children.get(child_index + 1).copied();

        if left.is_some_and(|sibling| self.node_len(sibling) > self.min_keys()) {
            self.rotate_right(parent_id, child_index - 1);
        } else if right.is_some_and(|sibling| self.node_len(sibling) > self.min_keys()) {
            self.rotate_left(parent_id, child_index);
        } else if left.is_some() {
            self.merge_children(parent_id, child_index - 1);
        } else {
            self.merge_children(parent_id, child_index);
        }
    }

    /// Separator `index` moves down to the end of child `index`; the first
    /// key of child `index + 1` replaces it.
    fn rotate_left(&mut self, parent_id: NodeId, index: usize) {
        let children = &self.branch_arena[parent_id].children;
        match (children[index], children[index + 1]) {
            (NodeRef::Leaf(left_id), NodeRef::Leaf(right_id)) => {
                let moved = self.leaf_arena[right_id].remove(0);
                let separator =
                    std::mem::replace(&mut self.branch_arena[parent_id].keys[index], moved);
                self.leaf_arena[left_id].push(separator);
            }
            (NodeRef::Branch(left_id), NodeRef::Branch(right_id)) => {
                if let Some((moved, child)) = self.branch_arena[right_id].take_first() {
                    let separator =
                        std::mem::replace(&mut self.branch_arena[parent_id].keys[index], moved);
                    self.branch_arena[left_id].accept_from_right(separator, child);
                }
            }
            _ => return,
        }
        trace!(parent = parent_id, index, "rotated key to left sibling");
    }

    /// Separator `index` moves down to the front of child `index + 1`; the
    /// last key of child `index` replaces it.
    fn rotate_right(&mut self, parent_id: NodeId, index: usize) {
        let children = &self.branch_arena[parent_id].children;
        match (children[index], children[index + 1]) {
            (NodeRef::Leaf(left_id), NodeRef::Leaf(right_id)) => {
                if let Some(moved) = self.leaf_arena[left_id].pop() {
                    let separator =
                        std::mem::replace(&mut self.branch_arena[parent_id].keys[index], moved);
                    self.leaf_arena[right_id].insert(0, separator);
                }
            }
            (NodeRef::Branch(left_id), NodeRef::Branch(right_id)) => {
                if let Some((moved, child)) = self.branch_arena[left_id].take_last() {
                    let separator =
                        std::mem::replace(&mut self.branch_arena[parent_id].keys[index], moved);
                    self.branch_arena[right_id].accept_from_left(separator, child);
                }
            }
            _ => return,
        }
        trace!(parent = parent_id, index, "rotated key to right sibling");
    }

    /// Merge child `index + 1` into child `index`, pulling the separator
    /// between them down.
    fn merge_children(&mut self, parent_id: NodeId, index: usize) {
        let parent = &mut self.branch_arena[parent_id];
        let separator = parent.keys.remove(index);
        let right = parent.children.remove(index + 1);
        let left = parent.children[index];

        match (left, right) {
            (NodeRef::Leaf(left_id), NodeRef::Leaf(right_id)) => {
                let mut right_keys = self.leaf_arena.deallocate(right_id).unwrap_or_default();
                let left_keys = &mut self.leaf_arena[left_id];
                left_keys.push(separator);
                left_keys.append(&mut right_keys);
            }
            (NodeRef::Branch(left_id), NodeRef::Branch(right_id)) => {
                if let Some(mut right_branch) = self.branch_arena.deallocate(right_id) {
                    self.branch_arena[left_id].merge_from(separator, &mut right_branch);
                }
            }
            _ => return,
        }
        trace!(parent = parent_id, index, "merged siblings");
    }

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_internal_key_uses_predecessor() {
        let mut tree = BTree::from_keys(3, [10, 20, 30, 5, 15]).unwrap();
        assert_eq!(tree.traverse()[0], (0, vec![10, 20]));

        // 10 is replaced by 5, whose leaf then merges with [15]
        assert!(tree.delete(&10));
        assert_eq!(
            tree.traverse(),
            vec![(0, vec![20]), (1, vec![5, 15]), (1, vec![30])]
        );
        tree.validate().unwrap();
        for key in [5, 15, 20, 30] {
            assert!(tree.search(&key));
        }
    }

    #[test]
    fn test_rotation_pulls_separator_down() {
        // order 3: root [20], leaves [10] and [30, 40]
        let mut tree = BTree::from_keys(3, [10, 20, 30, 40]).unwrap();
        assert_eq!(tree.traverse()[0], (0, vec![20]));
        assert!(tree.delete(&10));
        assert_eq!(
            tree.traverse(),
            vec![(0, vec![30]), (1, vec![20]), (1, vec![40])]
        );
    }

    #[test]
    fn test_merge_collapses_root() {
        let mut tree = BTree::from_keys(3, [10, 20, 30]).unwrap();
        assert!(tree.delete(&30));
        assert_eq!(tree.traverse(), vec![(0, vec![10, 20])]);
        assert_eq!(tree.arena_stats().1.allocated_count, 0);
        tree.validate().unwrap();
    }

    #[test]
    fn test_delete_missing_key() {
        let mut tree = BTree::from_keys(4, 0..20).unwrap();
        assert!(!tree.delete(&99));
        assert_eq!(tree.try_delete(&99), Err(TreeError::KeyNotFound));
        assert_eq!(tree.len(), 20);
    }

    #[test]
    fn test_delete_all_in_mixed_order() {
        for order in 3..=6 {
            let keys: Vec<i32> = (0..80).map(|i| (i * 29) % 80).collect();
            let mut tree = BTree::from_keys(order, keys.iter().copied()).unwrap();
            for (removed, key) in keys.iter().enumerate() {
                assert!(tree.delete(key));
                tree.validate().unwrap();
                assert_eq!(tree.len(), keys.len() - removed - 1);
            }
            assert!(tree.is_leaf_root());
            assert!(!tree.search(&0));
        }
    }
}
