//! Classic B-tree: every key is stored exactly once, in a leaf or in a
//! branch, and leaves are not linked.
//!
//! Nodes live in the same kind of arenas as [`BPlusTree`](crate::BPlusTree)
//! uses. Leaves are bare key vectors; branches reuse [`BranchNode`], whose
//! keys here are real keys rather than routing copies.

mod delete;
mod insert;
mod iteration;
mod validation;

use std::collections::VecDeque;
use std::fmt::Debug;

use tracing::debug;

use crate::compact_arena::{CompactArena, CompactArenaStats};
use crate::config::{FillPolicy, Order, TreeConfig};
use crate::error::InitResult;
use crate::types::{BranchNode, NodeId, NodeRef, PathStep};

pub use iteration::{Iter, Range};

/// Order-`m` B-tree with keys in every node.
///
/// ```
/// use multiway_tree::BTree;
///
/// let mut tree = BTree::new(3).unwrap();
/// tree.extend([10, 20, 5, 6, 12, 30, 7, 17]);
/// assert!(tree.delete(&10));
/// assert!(!tree.search(&10));
/// assert_eq!(tree.len(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct BTree<K> {
    pub(crate) order: Order,
    pub(crate) root: NodeRef,
    pub(crate) leaf_arena: CompactArena<Vec<K>>,
    pub(crate) branch_arena: CompactArena<BranchNode<K>>,
    pub(crate) len: usize,
}

impl<K> BTree<K> {
    /// Create a B-tree of order `order`; fails for orders below 3.
    pub fn new(order: usize) -> InitResult<Self> {
        let order = TreeConfig::bplus(order).validate()?;
        Ok(Self::with_validated(order))
    }

    fn with_validated(order: Order) -> Self {
        let mut leaf_arena = CompactArena::new();
        let root_id = leaf_arena.allocate(Vec::new());
        Self {
            order,
            root: NodeRef::Leaf(root_id),
            leaf_arena,
            branch_arena: CompactArena::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn order(&self) -> usize {
        self.order.get()
    }

    pub fn is_leaf_root(&self) -> bool {
        self.root.is_leaf()
    }

    /// Number of levels; a lone leaf root has height 1.
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

    /// Statistics for the leaf and branch arenas, in that order.
    pub fn arena_stats(&self) -> (CompactArenaStats, CompactArenaStats) {
        (self.leaf_arena.stats(), self.branch_arena.stats())
    }

    /// Clear all keys, leaving a single empty leaf root.
    pub fn clear(&mut self) {
        self.leaf_arena.clear();
        self.branch_arena.clear();
        let root_id = self.leaf_arena.allocate(Vec::new());
        self.root = NodeRef::Leaf(root_id);
        self.len = 0;
        debug!("tree cleared");
    }

    pub(crate) fn node_len(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Leaf(id) => self.leaf_arena[id].len(),
            NodeRef::Branch(id) => self.branch_arena[id].keys.len(),
        }
    }

    pub(crate) fn max_keys(&self) -> usize {
        self.order.max_keys()
    }

    pub(crate) fn min_keys(&self) -> usize {
        FillPolicy::Balanced.min_keys(self.order)
    }
}

impl<K: Ord> BTree<K> {
    /// Returns true if `key` is stored in the tree. The descent stops early
    /// when a branch holds the key.
    pub fn search(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.search(key)
    }

    /// Returns the stored key equal to `key`, if any.
    pub fn get(&self, key: &K) -> Option<&K> {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => {
                    let keys = &self.leaf_arena[id];
                    return keys.binary_search(key).ok().map(|index| &keys[index]);
                }
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    match branch.keys.binary_search(key) {
                        Ok(index) => return Some(&branch.keys[index]),
                        Err(index) => current = branch.children[index],
                    }
                }
            }
        }
    }

    /// Descend towards `key`, recording the path. Returns the branch holding
    /// the key, or the leaf where the descent ended.
    pub(crate) fn descend(&self, key: &K, path: &mut Vec<PathStep>) -> Descent {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return Descent::Leaf(id),
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    match branch.keys.binary_search(key) {
                        Ok(index) => return Descent::InBranch(id, index),
                        Err(index) => {
                            path.push((id, index));
                            current = branch.children[index];
                        }
                    }
                }
            }
        }
    }
}

/// Where a keyed descent of a [`BTree`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Descent {
    Leaf(NodeId),
    InBranch(NodeId, usize),
}

impl<K: Clone> BTree<K> {
    /// Level-order walk: each node's keys tagged with its depth.
    pub fn traverse(&self) -> Vec<(usize, Vec<K>)> {
        let mut levels = Vec::new();
        let mut queue = VecDeque::from([(0, self.root)]);
        while let Some((depth, node)) = queue.pop_front() {
            match node {
                NodeRef::Leaf(id) => levels.push((depth, self.leaf_arena[id].clone())),
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

impl<K: Clone + Debug> BTree<K> {
    /// Emit the level-order structure at debug level.
    pub fn log_structure(&self) {
        for (depth, keys) in self.traverse() {
            debug!(level = depth, keys = ?keys, "tree node");
        }
    }
}

impl<K: Ord + Clone> BTree<K> {
    pub fn from_keys<I>(order: usize, keys: I) -> InitResult<Self>
    where
        I: IntoIterator<Item = K>,
    {
        let mut tree = Self::new(order)?;
        tree.extend(keys);
        Ok(tree)
    }
}

impl<K: Ord + Clone> Default for BTree<K> {
    fn default() -> Self {
        Self::with_validated(Order::default())
    }
}

impl<K: Ord + Clone> Extend<K> for BTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
