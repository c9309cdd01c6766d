//! Lookup operations for BPlusTree: search and the top-down descents shared
//! by the mutating operations.

use crate::types::{BPlusTree, BranchNode, LeafNode, NodeId, NodeRef, PathStep};

impl<K: Ord> BPlusTree<K> {
    /// Returns true if `key` is stored in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiway_tree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// tree.insert(1);
    /// assert!(tree.search(&1));
    /// assert!(!tree.search(&2));
    /// ```
    pub fn search(&self, key: &K) -> bool {
        let leaf_id = self.find_leaf(key);
        self.leaf_arena[leaf_id].contains(key)
    }

    /// Alias of [`search`](Self::search) matching the std collections.
    pub fn contains(&self, key: &K) -> bool {
        self.search(key)
    }

    /// Returns the stored key equal to `key`, if any.
    pub fn get(&self, key: &K) -> Option<&K> {
        let leaf = &self.leaf_arena[self.find_leaf(key)];
        leaf.keys.binary_search(key).ok().map(|index| &leaf.keys[index])
    }

    // ============================================================================
    // ARENA ACCESS
    // ============================================================================

    pub fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K>> {
        self.leaf_arena.get(id)
    }

    pub fn get_branch(&self, id: NodeId) -> Option<&BranchNode<K>> {
        self.branch_arena.get(id)
    }

    // ============================================================================
    // DESCENT HELPERS
    // ============================================================================

    /// Leaf that would contain `key`.
    pub(crate) fn find_leaf(&self, key: &K) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return id,
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    current = branch.children[branch.find_child_index(key)];
                }
            }
        }
    }

    /// Leaf that would contain `key`, together with the branches visited on
    /// the way down.
    pub(crate) fn find_leaf_with_path(&self, key: &K) -> (NodeId, Vec<PathStep>) {
        let mut path = Vec::new();
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return (id, path),
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    let child_index = branch.find_child_index(key);
                    path.push((id, child_index));
                    current = branch.children[child_index];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::types::BPlusTree;

    #[test]
    fn test_search_empty_tree() {
        let tree = BPlusTree::<i32>::new(3).unwrap();
        assert!(!tree.search(&0));
        assert_eq!(tree.get(&0), None);
    }

    #[test]
    fn test_search_across_levels() {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in 0..50 {
            tree.insert(key * 2);
        }
        for key in 0..50 {
            assert!(tree.search(&(key * 2)));
            assert!(!tree.contains(&(key * 2 + 1)));
        }
        assert_eq!(tree.get(&40), Some(&40));
    }

    #[test]
    fn test_path_depth_matches_height() {
        let mut tree = BPlusTree::new(4).unwrap();
        for key in 0..200 {
            tree.insert(key);
        }
        let (leaf_id, path) = tree.find_leaf_with_path(&123);
        assert_eq!(path.len() + 1, tree.height());
        assert!(tree.get_leaf(leaf_id).unwrap().contains(&123));
        for (branch_id, child_index) in path {
            let branch = tree.get_branch(branch_id).unwrap();
            assert!(child_index < branch.children().len());
        }
    }
}
