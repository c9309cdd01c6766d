//! In-order iteration for BTree.
//!
//! Without a leaf chain, iteration keeps an explicit stack of
//! `(node, next key index)` frames. A branch frame at index `i` means child
//! `i` is being walked and `keys[i]` comes next once it is exhausted.

use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use super::BTree;
use crate::iteration::beyond_end;
use crate::types::NodeRef;

#[derive(Debug)]
struct Cursor<'a, K> {
    tree: &'a BTree<K>,
    stack: Vec<(NodeRef, usize)>,
}

impl<K> Clone for Cursor<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
        }
    }
}

impl<'a, K> Cursor<'a, K> {
    /// Cursor positioned before the smallest key of the tree.
    fn leftmost(tree: &'a BTree<K>) -> Self {
        let mut cursor = Self {
            tree,
            stack: Vec::new(),
        };
        cursor.push_leftmost(tree.root);
        cursor
    }

    fn push_leftmost(&mut self, mut node: NodeRef) {
        loop {
            self.stack.push((node, 0));
            match node {
                NodeRef::Leaf(_) => return,
                NodeRef::Branch(id) => node = self.tree.branch_arena[id].children[0],
            }
        }
    }

    fn keys(&self, node: NodeRef) -> &'a [K] {
        match node {
            NodeRef::Leaf(id) => self.tree.leaf_arena[id].as_slice(),
            NodeRef::Branch(id) => &self.tree.branch_arena[id].keys,
        }
    }

    fn next_key(&mut self) -> Option<&'a K> {
        loop {
            let (node, index) = *self.stack.last()?;
            let keys = self.keys(node);
            if index >= keys.len() {
                self.stack.pop();
                continue;
            }
            if let Some(top) = self.stack.last_mut() {
                top.1 += 1;
            }
            if let NodeRef::Branch(id) = node {
                self.push_leftmost(self.tree.branch_arena[id].children[index + 1]);
            }
            return Some(&keys[index]);
        }
    }
}

impl<'a, K: Ord> Cursor<'a, K> {
    /// Cursor positioned before the first key satisfying `start`.
    fn seek(tree: &'a BTree<K>, start: Bound<&K>) -> Self {
        let mut cursor = Self {
            tree,
            stack: Vec::new(),
        };
        let mut node = tree.root;
        loop {
            let keys = cursor.keys(node);
            let index = match start {
                Bound::Included(key) => keys.partition_point(|k| k < key),
                Bound::Excluded(key) => keys.partition_point(|k| k <= key),
                Bound::Unbounded => 0,
            };
            cursor.stack.push((node, index));
            match node {
                NodeRef::Leaf(_) => return cursor,
                NodeRef::Branch(id) => node = tree.branch_arena[id].children[index],
            }
        }
    }
}

/// Iterator over all keys of a [`BTree`] in ascending order.
#[derive(Debug)]
pub struct Iter<'a, K> {
    cursor: Cursor<'a, K>,
    remaining: usize,
}

/// Iterator over the keys of a [`BTree`] inside a range.
#[derive(Debug)]
pub struct Range<'a, K> {
    cursor: Cursor<'a, K>,
    end: Bound<K>,
}

impl<K> BTree<K> {
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            cursor: Cursor::leftmost(self),
            remaining: self.len,
        }
    }
}

impl<K: Ord + Clone> BTree<K> {
    pub fn range<R>(&self, range: R) -> Range<'_, K>
    where
        R: RangeBounds<K>,
    {
        Range {
            cursor: Cursor::seek(self, range.start_bound()),
            end: range.end_bound().cloned(),
        }
    }

    /// Lazily yields every key `k` with `start <= k <= end`.
    pub fn range_query(&self, start: &K, end: &K) -> Range<'_, K> {
        self.range((Bound::Included(start), Bound::Included(end)))
    }
}

impl<K: Ord> BTree<K> {
    pub fn first(&self) -> Option<&K> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<&K> {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return self.leaf_arena[id].last(),
                NodeRef::Branch(id) => current = *self.branch_arena[id].children.last()?,
            }
        }
    }
}

impl<'a, K> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor.next_key()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(key)
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
            cursor: self.cursor.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K: Ord> Iterator for Range<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor.next_key()?;
        if beyond_end(key, &self.end) {
            self.cursor.stack.clear();
            return None;
        }
        Some(key)
    }
}

impl<K: Ord> FusedIterator for Range<'_, K> {}

impl<K: Clone> Clone for Range<'_, K> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
            end: self.end.clone(),
        }
    }
}
