//! Iterator implementations for BPlusTree.
//!
//! Both iterators walk the leaf chain: after the first leaf is located they
//! never touch a branch again. Each holds only a cached leaf reference and a
//! position, so cloning one gives an independent cursor that restarts from
//! the same place.

use std::iter::FusedIterator;
use std::ops::Bound;

use crate::types::{BPlusTree, LeafNode, NodeId, NULL_NODE};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Iterator over all keys in ascending order.
#[derive(Debug)]
pub struct Iter<'a, K> {
    tree: &'a BPlusTree<K>,
    current_leaf_ref: Option<&'a LeafNode<K>>,
    current_leaf_index: usize,
    remaining: usize,
}

/// Iterator over the keys inside a range, in ascending order.
#[derive(Debug)]
pub struct RangeIter<'a, K> {
    tree: &'a BPlusTree<K>,
    current_leaf_ref: Option<&'a LeafNode<K>>,
    current_leaf_index: usize,
    end: Bound<K>,
    finished: bool,
}

// ============================================================================
// BPLUSTREE ITERATOR METHODS
// ============================================================================

impl<K> BPlusTree<K> {
    /// Returns an iterator over all keys in sorted order.
    ///
    /// ```
    /// use multiway_tree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// tree.extend([3, 1, 2]);
    /// let keys: Vec<_> = tree.iter().copied().collect();
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            tree: self,
            current_leaf_ref: self.leaf_arena.get(self.first_leaf),
            current_leaf_index: 0,
            remaining: self.len,
        }
    }
}

impl<'a, K> IntoIterator for &'a BPlusTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Next leaf in the chain after `leaf`, if any.
fn next_leaf<'a, K>(tree: &'a BPlusTree<K>, leaf: &LeafNode<K>) -> Option<&'a LeafNode<K>> {
    (leaf.next != NULL_NODE)
        .then_some(leaf.next)
        .and_then(|id| tree.leaf_arena.get(id))
}

/// True if `key` lies past the `end` bound of a range.
pub(crate) fn beyond_end<K: Ord>(key: &K, end: &Bound<K>) -> bool {
    match end {
        Bound::Included(end) => key > end,
        Bound::Excluded(end) => key >= end,
        Bound::Unbounded => false,
    }
}

// ============================================================================
// ITER IMPLEMENTATION
// ============================================================================

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.current_leaf_ref?;
            if let Some(key) = leaf.keys.get(self.current_leaf_index) {
                self.current_leaf_index += 1;
                self.remaining = self.remaining.saturating_sub(1);
                return Some(key);
            }
            self.current_leaf_ref = next_leaf(self.tree, leaf);
            self.current_leaf_index = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            current_leaf_ref: self.current_leaf_ref,
            current_leaf_index: self.current_leaf_index,
            remaining: self.remaining,
        }
    }
}

// ============================================================================
// RANGEITER IMPLEMENTATION
// ============================================================================

impl<'a, K: Ord> RangeIter<'a, K> {
    /// Cursor positioned at `index` within leaf `leaf_id`, stopping at `end`.
    pub(crate) fn new(tree: &'a BPlusTree<K>, leaf_id: NodeId, index: usize, end: Bound<K>) -> Self {
        Self {
            tree,
            current_leaf_ref: tree.leaf_arena.get(leaf_id),
            current_leaf_index: index,
            end,
            finished: false,
        }
    }
}

impl<'a, K: Ord> Iterator for RangeIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let Some(leaf) = self.current_leaf_ref else {
                self.finished = true;
                return None;
            };
            if let Some(key) = leaf.keys.get(self.current_leaf_index) {
                if beyond_end(key, &self.end) {
                    self.finished = true;
                    return None;
                }
                self.current_leaf_index += 1;
                return Some(key);
            }
            self.current_leaf_ref = next_leaf(self.tree, leaf);
            self.current_leaf_index = 0;
        }
    }
}

impl<K: Ord> FusedIterator for RangeIter<'_, K> {}

impl<K: Clone> Clone for RangeIter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            current_leaf_ref: self.current_leaf_ref,
            current_leaf_index: self.current_leaf_index,
            end: self.end.clone(),
            finished: self.finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_empty_tree() {
        let tree = BPlusTree::<i32>::new(3).unwrap();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().len(), 0);
    }

    #[test]
    fn test_iter_crosses_leaves_in_order() {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in (0..40).rev() {
            tree.insert(key);
        }
        assert!(tree.leaf_count() > 1);
        let keys: Vec<i32> = (&tree).into_iter().copied().collect();
        assert_eq!(keys, (0..40).collect::<Vec<_>>());
        assert_eq!(tree.iter().len(), 40);
    }

    #[test]
    fn test_cloned_iterator_restarts_independently() {
        let mut tree = BPlusTree::new(4).unwrap();
        tree.extend(0..20);
        let mut iter = tree.iter();
        iter.by_ref().take(5).for_each(drop);
        let copy = iter.clone();
        assert_eq!(iter.copied().collect::<Vec<_>>(), (5..20).collect::<Vec<_>>());
        assert_eq!(copy.copied().collect::<Vec<_>>(), (5..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_beyond_end() {
        assert!(beyond_end(&5, &Bound::Excluded(5)));
        assert!(!beyond_end(&5, &Bound::Included(5)));
        assert!(beyond_end(&6, &Bound::Included(5)));
        assert!(!beyond_end(&i32::MAX, &Bound::Unbounded));
    }
}
