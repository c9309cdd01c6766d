//! Node-level operations for LeafNode and BranchNode, plus the capacity checks
//! the tree applies to them.
//!
//! Nodes do not know their own limits; the tree derives them from its order
//! and fill policy, so a node can be moved between positions (root or not)
//! without being rewritten.

use crate::types::{BPlusTree, BranchNode, LeafNode, NodeRef, NULL_NODE};

// ============================================================================
// LEAF NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord> LeafNode<K> {
    /// Returns the number of keys in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.binary_search(key).is_ok()
    }

    /// Insert `key` in sorted position; false if it is already present.
    pub(crate) fn insert_sorted(&mut self, key: K) -> bool {
        match self.keys.binary_search(&key) {
            Ok(_) => false,
            Err(index) => {
                self.keys.insert(index, key);
                true
            }
        }
    }

    /// Remove `key`; false if it is absent.
    pub(crate) fn remove_key(&mut self, key: &K) -> bool {
        match self.keys.binary_search(key) {
            Ok(index) => {
                self.keys.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Split this leaf at `len / 2`, returning the new right node.
    ///
    /// The right node takes over the `next` link; this node is left unlinked
    /// until the caller knows the right node's id.
    pub(crate) fn split(&mut self) -> LeafNode<K> {
        let mid = self.keys.len() / 2;
        let new_right = LeafNode {
            keys: self.keys.split_off(mid),
            next: self.next,
        };
        self.next = NULL_NODE;
        new_right
    }
}

// ============================================================================
// BRANCH NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord> BranchNode<K> {
    /// Returns the number of keys in this branch node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Index of the child that should contain `key`: the first `i` with
    /// `key < keys[i]`, or `keys.len()`.
    pub fn find_child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Split this branch at `len / 2`, returning the new right node and the
    /// median key, which is removed from both halves and promoted.
    pub(crate) fn split(&mut self) -> (BranchNode<K>, K) {
        let mid = self.keys.len() / 2;
        let mut right_keys = self.keys.split_off(mid);
        let promoted = right_keys.remove(0);
        let right_children = self.children.split_off(mid + 1);

        let new_right = BranchNode {
            keys: right_keys,
            children: right_children,
        };
        (new_right, promoted)
    }

    /// Insert a separator and the child to its right.
    pub(crate) fn insert_child(&mut self, child_index: usize, separator: K, new_child: NodeRef) {
        self.keys.insert(child_index, separator);
        self.children.insert(child_index + 1, new_child);
    }

    // ============================================================================
    // BORROWING AND MERGING HELPERS
    // ============================================================================

    /// Remove the last key and child (this node is the left sibling).
    pub(crate) fn take_last(&mut self) -> Option<(K, NodeRef)> {
        let key = self.keys.pop()?;
        let child = self.children.pop()?;
        Some((key, child))
    }

    /// Remove the first key and child (this node is the right sibling).
    pub(crate) fn take_first(&mut self) -> Option<(K, NodeRef)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.children.remove(0)))
    }

    /// Accept a separator pulled down from the parent together with a child
    /// moved over from the left sibling.
    pub(crate) fn accept_from_left(&mut self, separator: K, moved_child: NodeRef) {
        self.keys.insert(0, separator);
        self.children.insert(0, moved_child);
    }

    /// Accept a separator pulled down from the parent together with a child
    /// moved over from the right sibling.
    pub(crate) fn accept_from_right(&mut self, separator: K, moved_child: NodeRef) {
        self.keys.push(separator);
        self.children.push(moved_child);
    }

    /// Merge all content from another branch into this one, with separator
    /// from the parent.
    pub(crate) fn merge_from(&mut self, separator: K, other: &mut BranchNode<K>) {
        self.keys.push(separator);
        self.keys.append(&mut other.keys);
        self.children.append(&mut other.children);
    }
}

// ============================================================================
// CAPACITY CHECKS
// ============================================================================

impl<K: Ord> BPlusTree<K> {
    /// Number of keys held by `node`.
    pub(crate) fn node_len(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Leaf(id) => self.leaf_arena[id].len(),
            NodeRef::Branch(id) => self.branch_arena[id].len(),
        }
    }

    /// Maximum number of keys for a node in the given position.
    pub(crate) fn max_keys(&self, is_root: bool) -> usize {
        if is_root {
            self.policy.root_max_keys(self.order)
        } else {
            self.order.max_keys()
        }
    }

    /// Minimum number of keys for a non-root node.
    pub(crate) fn min_keys(&self) -> usize {
        self.policy.min_keys(self.order)
    }

    /// True if `node` cannot take another key without overflowing.
    pub fn is_full(&self, node: NodeRef) -> bool {
        self.node_len(node) >= self.max_keys(node == self.root)
    }

    /// True if `node` is a non-root node below the minimum fill.
    pub fn is_underflow(&self, node: NodeRef) -> bool {
        node != self.root && self.node_len(node) < self.min_keys()
    }

    /// True if `node` can give a key to a sibling and stay at the minimum.
    pub(crate) fn can_donate(&self, node: NodeRef) -> bool {
        self.node_len(node) > self.min_keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(keys: &[i32]) -> LeafNode<i32> {
        LeafNode {
            keys: keys.to_vec(),
            next: 7,
        }
    }

    fn branch(keys: &[i32]) -> BranchNode<i32> {
        BranchNode {
            keys: keys.to_vec(),
            children: (0..=keys.len() as u32).map(NodeRef::Leaf).collect(),
        }
    }

    #[test]
    fn test_find_child_index() {
        let node = branch(&[10, 20]);
        assert_eq!(node.find_child_index(&5), 0);
        assert_eq!(node.find_child_index(&10), 1);
        assert_eq!(node.find_child_index(&15), 1);
        assert_eq!(node.find_child_index(&20), 2);
        assert_eq!(node.find_child_index(&99), 2);
    }

    #[test]
    fn test_leaf_split_at_floor_half() {
        let mut left = leaf(&[1, 2, 3]);
        let right = left.split();
        assert_eq!(left.keys, vec![1]);
        assert_eq!(right.keys, vec![2, 3]);
        assert_eq!(right.next, 7);
        assert_eq!(left.next, NULL_NODE);
    }

    #[test]
    fn test_branch_split_promotes_median() {
        let mut left = branch(&[10, 20, 30, 40]);
        let (right, promoted) = left.split();
        assert_eq!(promoted, 30);
        assert_eq!(left.keys, vec![10, 20]);
        assert_eq!(left.children.len(), 3);
        assert_eq!(right.keys, vec![40]);
        assert_eq!(right.children, vec![NodeRef::Leaf(3), NodeRef::Leaf(4)]);
    }

    #[test]
    fn test_leaf_insert_and_remove() {
        let mut node = leaf(&[1, 3]);
        assert!(node.insert_sorted(2));
        assert!(!node.insert_sorted(2));
        assert_eq!(node.keys(), &[1, 2, 3]);
        assert!(node.remove_key(&1));
        assert!(!node.remove_key(&1));
        assert!(node.contains(&3));
    }

    #[test]
    fn test_branch_borrow_helpers() {
        let mut left = branch(&[10, 20]);
        let mut right = branch(&[40]);

        let (key, child) = left.take_last().unwrap();
        assert_eq!((key, child), (20, NodeRef::Leaf(2)));
        right.accept_from_left(30, child);
        assert_eq!(right.keys, vec![30, 40]);
        assert_eq!(right.children[0], NodeRef::Leaf(2));

        let (key, child) = right.take_first().unwrap();
        left.accept_from_right(key, child);
        assert_eq!(left.keys, vec![10, 30]);

        left.merge_from(35, &mut right);
        assert_eq!(left.keys, vec![10, 30, 35, 40]);
        assert_eq!(left.children.len(), 5);
        assert!(right.children.is_empty());
    }

    #[test]
    fn test_capacity_checks_follow_position() {
        let mut tree = BPlusTree::new(4).unwrap();
        tree.extend([1, 2, 3]);
        assert!(tree.is_full(tree.root));
        assert!(!tree.is_underflow(tree.root));

        tree.insert(4);
        let NodeRef::Branch(root) = tree.root else {
            panic!("root should have split");
        };
        let left = tree.branch_arena[root].children[0];
        assert_eq!(tree.node_len(left), 2);
        assert!(!tree.is_full(left));
        assert!(tree.can_donate(left));
        assert!(!tree.is_underflow(left));
    }
}
