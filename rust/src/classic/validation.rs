//! Validation for BTree.

use super::BTree;
use crate::error::{TreeError, TreeResult};
use crate::types::NodeRef;

impl<K: Ord> BTree<K> {
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check fill bounds, key order and open separator intervals (keys are
    /// unique across the whole tree), uniform leaf depth, the stored length
    /// and arena consistency.
    pub fn check_invariants_detailed(&self) -> TreeResult<()> {
        let mut leaf_depth = None;
        let key_count = self.check_node(self.root, None, None, 0, &mut leaf_depth)?;
        if key_count != self.len {
            return Err(TreeError::data_integrity(
                "Length",
                &format!("nodes hold {} keys, tree reports {}", key_count, self.len),
            ));
        }

        let (leaves, branches) = self.count_nodes_in_tree();
        let (leaf_stats, branch_stats) = self.arena_stats();
        if leaves != leaf_stats.allocated_count || branches != branch_stats.allocated_count {
            return Err(TreeError::data_integrity(
                "Arena consistency check",
                &format!(
                    "tree has {} leaves and {} branches, arenas hold {} and {}",
                    leaves, branches, leaf_stats.allocated_count, branch_stats.allocated_count
                ),
            ));
        }
        Ok(())
    }

    pub fn validate(&self) -> TreeResult<()> {
        self.check_invariants_detailed()
    }

    /// Returns the number of keys in the subtree.
    fn check_node(
        &self,
        node: NodeRef,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> TreeResult<usize> {
        let keys: &[K] = match node {
            NodeRef::Leaf(id) => self.leaf_arena.get(id).map(Vec::as_slice),
            NodeRef::Branch(id) => self.branch_arena.get(id).map(|branch| branch.keys()),
        }
        .ok_or_else(|| TreeError::corrupted_tree("Arena", &format!("{:?} is not allocated", node)))?;

        let is_root = node == self.root;
        if keys.len() > self.max_keys() || (!is_root && keys.len() < self.min_keys()) {
            return Err(TreeError::corrupted_tree(
                "Node",
                &format!("{:?} holds {} keys", node, keys.len()),
            ));
        }
        let ordered = keys.windows(2).all(|pair| pair[0] < pair[1]);
        let in_range = keys.iter().all(|key| {
            lower.map_or(true, |lower| key > lower) && upper.map_or(true, |upper| key < upper)
        });
        if !ordered || !in_range {
            return Err(TreeError::corrupted_tree(
                "Separator",
                &format!("{:?} has keys out of order or outside its parent's range", node),
            ));
        }

        match node {
            NodeRef::Leaf(_) => {
                if *leaf_depth.get_or_insert(depth) != depth {
                    return Err(TreeError::corrupted_tree(
                        "Leaf depth",
                        &format!("{:?} at depth {}", node, depth),
                    ));
                }
                Ok(keys.len())
            }
            NodeRef::Branch(id) => {
                let children = &self.branch_arena[id].children;
                if keys.is_empty() || children.len() != keys.len() + 1 {
                    return Err(TreeError::corrupted_tree(
                        "Branch",
                        &format!("{:?} has {} keys and {} children", node, keys.len(), children.len()),
                    ));
                }
                let mut total = keys.len();
                for (index, child) in children.iter().enumerate() {
                    let child_lower = index.checked_sub(1).map(|i| &keys[i]).or(lower);
                    let child_upper = keys.get(index).or(upper);
                    total += self.check_node(*child, child_lower, child_upper, depth + 1, leaf_depth)?;
                }
                Ok(total)
            }
        }
    }
}
