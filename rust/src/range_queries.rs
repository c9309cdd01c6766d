//! Range query operations for BPlusTree.
//!
//! A range query descends once to the leaf holding the start bound and then
//! follows the leaf chain until the end bound is passed.

use std::ops::{Bound, RangeBounds};

use crate::iteration::RangeIter;
use crate::types::{BPlusTree, NodeId, NodeRef};

// ============================================================================
// RANGE QUERY OPERATIONS
// ============================================================================

impl<K: Ord + Clone> BPlusTree<K> {
    /// Returns an iterator over the keys in `range` using Rust's range syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiway_tree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// tree.extend(0..10);
    ///
    /// let half_open: Vec<_> = tree.range(3..7).copied().collect();
    /// assert_eq!(half_open, vec![3, 4, 5, 6]);
    ///
    /// let closed: Vec<_> = tree.range(3..=7).copied().collect();
    /// assert_eq!(closed, vec![3, 4, 5, 6, 7]);
    ///
    /// let tail: Vec<_> = tree.range(8..).copied().collect();
    /// assert_eq!(tail, vec![8, 9]);
    /// ```
    pub fn range<R>(&self, range: R) -> RangeIter<'_, K>
    where
        R: RangeBounds<K>,
    {
        let (leaf_id, index) = self.resolve_range_start(range.start_bound());
        RangeIter::new(self, leaf_id, index, range.end_bound().cloned())
    }

    /// Lazily yields every key `k` with `start <= k <= end`, ascending. A
    /// reversed range (`start > end`) yields nothing.
    ///
    /// ```
    /// use multiway_tree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// tree.extend([10, 20, 5, 6, 12, 30, 7, 17]);
    /// let keys: Vec<_> = tree.range_query(&6, &12).copied().collect();
    /// assert_eq!(keys, vec![6, 7, 10, 12]);
    /// assert_eq!(tree.range_query(&12, &6).next(), None);
    /// ```
    pub fn range_query(&self, start: &K, end: &K) -> RangeIter<'_, K> {
        self.range((Bound::Included(start), Bound::Included(end)))
    }

    /// Number of keys in `range`.
    pub fn range_count<R>(&self, range: R) -> usize
    where
        R: RangeBounds<K>,
    {
        self.range(range).count()
    }
}

impl<K: Ord> BPlusTree<K> {
    /// Smallest key in the tree.
    pub fn first(&self) -> Option<&K> {
        self.iter().next()
    }

    /// Largest key in the tree, found by following the rightmost children.
    pub fn last(&self) -> Option<&K> {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return self.leaf_arena[id].keys.last(),
                NodeRef::Branch(id) => current = *self.branch_arena[id].children.last()?,
            }
        }
    }

    // ============================================================================
    // RANGE QUERY HELPERS
    // ============================================================================

    /// Leaf and in-leaf position of the first key satisfying `start`. The
    /// position may equal the leaf length, in which case iteration continues
    /// with the next leaf.
    fn resolve_range_start(&self, start: Bound<&K>) -> (NodeId, usize) {
        match start {
            Bound::Included(key) => {
                let leaf_id = self.find_leaf(key);
                let keys = &self.leaf_arena[leaf_id].keys;
                (leaf_id, keys.binary_search(key).unwrap_or_else(|index| index))
            }
            Bound::Excluded(key) => {
                let leaf_id = self.find_leaf(key);
                let index = match self.leaf_arena[leaf_id].keys.binary_search(key) {
                    Ok(index) => index + 1,
                    Err(index) => index,
                };
                (leaf_id, index)
            }
            Bound::Unbounded => (self.first_leaf, 0),
        }
    }
}
