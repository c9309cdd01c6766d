//! Validation and debugging utilities for BPlusTree.
//!
//! The checks walk the whole tree, so they are meant for tests and debugging
//! rather than for use after every operation in production code.

use crate::error::{TreeError, TreeResult, TreeResultExt};
use crate::types::{BPlusTree, BranchNode, LeafNode, NodeId, NodeRef, NULL_NODE};

/// Key range a subtree must respect: `lower <= key < upper`.
struct KeyBounds<'a, K> {
    lower: Option<&'a K>,
    upper: Option<&'a K>,
}

impl<K: Ord> KeyBounds<'_, K> {
    fn admits(&self, key: &K) -> bool {
        self.lower.map_or(true, |lower| key >= lower) && self.upper.map_or(true, |upper| key < upper)
    }
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord> BPlusTree<K> {
    /// Returns true if every structural invariant holds.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check every structural invariant, reporting the first violation.
    ///
    /// Covered: node fill bounds for the tree's policy, sorted keys,
    /// separator ranges, uniform leaf depth, the leaf chain, the stored
    /// length and agreement between the arenas and the reachable nodes.
    pub fn check_invariants_detailed(&self) -> TreeResult<()> {
        let mut leaves_in_order = Vec::new();
        let mut leaf_depth = None;
        let bounds = KeyBounds {
            lower: None,
            upper: None,
        };
        self.check_node(self.root, bounds, 0, &mut leaf_depth, &mut leaves_in_order)?;
        self.check_leaf_chain(&leaves_in_order)?;
        self.check_arena_tree_consistency(leaves_in_order.len())
    }

    /// Same as [`check_invariants_detailed`](Self::check_invariants_detailed).
    pub fn validate(&self) -> TreeResult<()> {
        self.check_invariants_detailed()
    }

    /// Validate, tagging any error with the operation that was running.
    pub fn validate_for_operation(&self, operation: &str) -> TreeResult<()> {
        self.check_invariants_detailed().with_operation(operation)
    }

    fn check_node(
        &self,
        node: NodeRef,
        bounds: KeyBounds<'_, K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        leaves_in_order: &mut Vec<NodeId>,
    ) -> TreeResult<()> {
        let is_root = node == self.root;
        let keys = match node {
            NodeRef::Leaf(id) => &self.leaf(id)?.keys,
            NodeRef::Branch(id) => &self.branch(id)?.keys,
        };

        let max = self.max_keys(is_root);
        if keys.len() > max {
            return Err(TreeError::corrupted_tree(
                "Node",
                &format!("node {:?} has {} keys, maximum is {}", node, keys.len(), max),
            ));
        }
        if !is_root && keys.len() < self.min_keys() {
            return Err(TreeError::corrupted_tree(
                "Node",
                &format!(
                    "node {:?} has {} keys, minimum is {}",
                    node,
                    keys.len(),
                    self.min_keys()
                ),
            ));
        }
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(TreeError::corrupted_tree(
                "Node",
                &format!("keys of node {:?} are not strictly ascending", node),
            ));
        }
        if !keys.iter().all(|key| bounds.admits(key)) {
            return Err(TreeError::corrupted_tree(
                "Separator",
                &format!("node {:?} holds a key outside its parent's range", node),
            ));
        }

        match node {
            NodeRef::Leaf(id) => {
                if *leaf_depth.get_or_insert(depth) != depth {
                    return Err(TreeError::corrupted_tree(
                        "Leaf depth",
                        &format!("leaf {} at depth {}, expected {:?}", id, depth, leaf_depth),
                    ));
                }
                leaves_in_order.push(id);
                Ok(())
            }
            NodeRef::Branch(id) => {
                let branch = self.branch(id)?;
                if branch.keys.is_empty() {
                    return Err(TreeError::corrupted_tree(
                        "Branch",
                        &format!("branch {} has no separators", id),
                    ));
                }
                if branch.children.len() != branch.keys.len() + 1 {
                    return Err(TreeError::corrupted_tree(
                        "Branch",
                        &format!(
                            "branch {} has {} keys but {} children",
                            id,
                            branch.keys.len(),
                            branch.children.len()
                        ),
                    ));
                }
                for (index, child) in branch.children.iter().enumerate() {
                    let child_bounds = KeyBounds {
                        lower: index.checked_sub(1).map(|i| &branch.keys[i]).or(bounds.lower),
                        upper: branch.keys.get(index).or(bounds.upper),
                    };
                    self.check_node(*child, child_bounds, depth + 1, leaf_depth, leaves_in_order)?;
                }
                Ok(())
            }
        }
    }

    /// The chain from `first_leaf` must visit exactly the reachable leaves, in
    /// left-to-right order, with ascending keys, and end in `NULL_NODE`.
    fn check_leaf_chain(&self, leaves_in_order: &[NodeId]) -> TreeResult<()> {
        let mut current = self.first_leaf;
        let mut previous_key: Option<&K> = None;
        let mut key_count = 0;
        for (position, expected) in leaves_in_order.iter().enumerate() {
            if current != *expected {
                return Err(TreeError::corrupted_tree(
                    "Linked list",
                    &format!(
                        "position {} links to leaf {}, tree order has leaf {}",
                        position, current, expected
                    ),
                ));
            }
            let leaf = self.leaf(current)?;
            if let (Some(previous), Some(first)) = (previous_key, leaf.keys.first()) {
                if previous >= first {
                    return Err(TreeError::corrupted_tree(
                        "Linked list",
                        &format!("keys descend across the link into leaf {}", current),
                    ));
                }
            }
            previous_key = leaf.keys.last().or(previous_key);
            key_count += leaf.keys.len();
            current = leaf.next;
        }
        if current != NULL_NODE {
            return Err(TreeError::corrupted_tree(
                "Linked list",
                &format!("last leaf links on to {}", current),
            ));
        }
        if key_count != self.len {
            return Err(TreeError::data_integrity(
                "Length",
                &format!("leaves hold {} keys, tree reports {}", key_count, self.len),
            ));
        }
        Ok(())
    }

    /// Every allocated node must be reachable, and nothing reachable freed.
    fn check_arena_tree_consistency(&self, reachable_leaves: usize) -> TreeResult<()> {
        let (tree_leaf_count, tree_branch_count) = self.count_nodes_in_tree();
        let leaf_stats = self.leaf_arena.stats();
        let branch_stats = self.branch_arena.stats();

        if tree_leaf_count != reachable_leaves || tree_leaf_count != leaf_stats.allocated_count {
            return Err(TreeError::data_integrity(
                "Leaf consistency check",
                &format!(
                    "{} in tree vs {} in arena",
                    tree_leaf_count, leaf_stats.allocated_count
                ),
            ));
        }
        if tree_branch_count != branch_stats.allocated_count {
            return Err(TreeError::data_integrity(
                "Branch consistency check",
                &format!(
                    "{} in tree vs {} in arena",
                    tree_branch_count, branch_stats.allocated_count
                ),
            ));
        }
        Ok(())
    }

    fn leaf(&self, id: NodeId) -> TreeResult<&LeafNode<K>> {
        self.leaf_arena
            .get(id)
            .ok_or_else(|| TreeError::corrupted_tree("Arena", &format!("leaf {} is not allocated", id)))
    }

    fn branch(&self, id: NodeId) -> TreeResult<&BranchNode<K>> {
        self.branch_arena
            .get(id)
            .ok_or_else(|| TreeError::corrupted_tree("Arena", &format!("branch {} is not allocated", id)))
    }
}
