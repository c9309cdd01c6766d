//! Tree structure management operations for BPlusTree.
//!
//! Size queries, clearing, node counting, level-order traversal and arena
//! statistics.

use std::collections::VecDeque;
use std::fmt::Debug;

use tracing::debug;

use crate::compact_arena::CompactArenaStats;
use crate::config::{FillPolicy, TreeConfig};
use crate::types::{BPlusTree, LeafNode, NodeRef, NULL_NODE};

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<K> BPlusTree<K> {
    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the root is a leaf node.
    pub fn is_leaf_root(&self) -> bool {
        self.root.is_leaf()
    }

    /// The order `m`: maximum number of children of a branch.
    pub fn order(&self) -> usize {
        self.order.get()
    }

    pub fn policy(&self) -> FillPolicy {
        self.policy
    }

    pub fn config(&self) -> TreeConfig {
        TreeConfig::new(self.order.get(), self.policy)
    }

    /// Number of levels; a lone leaf root has height 1. All leaves sit at the
    /// same depth, so following the first children is enough.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let NodeRef::Branch(id) = current {
            match self.branch_arena[id].children.first() {
                Some(child) => current = *child,
                None => break,
            }
            height += 1;
        }
        height
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.count_nodes_in_tree().0
    }

    /// Clear all keys, leaving a single empty leaf root.
    pub fn clear(&mut self) {
        self.leaf_arena.clear();
        self.branch_arena.clear();

        let root_id = self.leaf_arena.allocate(LeafNode::new());
        self.root = NodeRef::Leaf(root_id);
        self.first_leaf = root_id;
        self.len = 0;
        debug!("tree cleared");
    }

    /// Count the leaf and branch nodes reachable from the root.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        let mut leaves = 0;
        let mut branches = 0;
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            match node {
                NodeRef::Leaf(_) => leaves += 1,
                NodeRef::Branch(id) => {
                    branches += 1;
                    stack.extend(self.branch_arena[id].children.iter().copied());
                }
            }
        }
        (leaves, branches)
    }

    /// Key counts of the leaves, left to right along the leaf chain.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut current = self.first_leaf;
        while current != NULL_NODE {
            let Some(leaf) = self.leaf_arena.get(current) else {
                break;
            };
            sizes.push(leaf.keys.len());
            current = leaf.next;
        }
        sizes
    }

    // ============================================================================
    // ARENA STATISTICS
    // ============================================================================

    /// Statistics for the leaf and branch arenas, in that order.
    pub fn arena_stats(&self) -> (CompactArenaStats, CompactArenaStats) {
        (self.leaf_arena.stats(), self.branch_arena.stats())
    }

    pub fn leaf_arena_stats(&self) -> CompactArenaStats {
        self.leaf_arena.stats()
    }

    pub fn branch_arena_stats(&self) -> CompactArenaStats {
        self.branch_arena.stats()
    }
}

// ============================================================================
// TRAVERSAL
// ============================================================================

impl<K: Clone> BPlusTree<K> {
    /// Level-order walk of the tree: each node's keys tagged with its depth,
    /// root first (depth 0) and left to right within a level.
    ///
    /// ```
    /// use multiway_tree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// tree.extend([1, 2, 3]);
    /// assert_eq!(tree.traverse(), vec![(0, vec![2]), (1, vec![1]), (1, vec![2, 3])]);
    /// ```
    pub fn traverse(&self) -> Vec<(usize, Vec<K>)> {
        let mut levels = Vec::new();
        let mut queue = VecDeque::from([(0, self.root)]);
        while let Some((depth, node)) = queue.pop_front() {
            match node {
                NodeRef::Leaf(id) => levels.push((depth, self.leaf_arena[id].keys.clone())),
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    levels.push((depth, branch.keys.clone()));
                    queue.extend(branch.children.iter().map(|child| (depth + 1, *child)));
                }
            }
        }
        levels
    }
}

impl<K: Clone + Debug> BPlusTree<K> {
    /// Emit the level-order structure at debug level, one event per level.
    pub fn log_structure(&self) {
        let mut current_depth = None;
        let mut line = Vec::new();
        for (depth, keys) in self.traverse() {
            if current_depth != Some(depth) {
                if let Some(done) = current_depth {
                    debug!(level = done, nodes = ?line, "tree level");
                }
                current_depth = Some(depth);
                line.clear();
            }
            line.push(keys);
        }
        if let Some(done) = current_depth {
            debug!(level = done, nodes = ?line, "tree level");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree_structure() {
        let tree = BPlusTree::<i32>::new(3).unwrap();
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.count_nodes_in_tree(), (1, 0));
        assert_eq!(tree.leaf_sizes(), vec![0]);
        assert_eq!(tree.traverse(), vec![(0, vec![])]);
    }

    #[test]
    fn test_counts_match_arenas() {
        let mut tree = BPlusTree::new(3).unwrap();
        tree.extend(0..100);
        let (leaves, branches) = tree.count_nodes_in_tree();
        let (leaf_stats, branch_stats) = tree.arena_stats();
        assert_eq!(leaves, leaf_stats.allocated_count);
        assert_eq!(branches, branch_stats.allocated_count);
        assert_eq!(tree.leaf_sizes().len(), leaves);
        assert_eq!(tree.leaf_sizes().iter().sum::<usize>(), 100);
    }

    #[test]
    fn test_traverse_depths_are_level_ordered() {
        let mut tree = BPlusTree::new_bstar(4).unwrap();
        tree.extend(0..50);
        let levels = tree.traverse();
        assert!(levels.windows(2).all(|pair| pair[0].0 <= pair[1].0));
        assert_eq!(levels.last().map(|(depth, _)| depth + 1), Some(tree.height()));
        tree.log_structure();
    }

    #[test]
    fn test_clear_resets_tree() {
        let mut tree = BPlusTree::new(4).unwrap();
        tree.extend(0..64);
        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.is_leaf_root());
        assert_eq!(tree.arena_stats().1.allocated_count, 0);
        tree.insert(7);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![7]);
    }
}
