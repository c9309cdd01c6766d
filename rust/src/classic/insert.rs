//! INSERT operations for BTree.

use tracing::{debug, trace};

use super::{BTree, Descent};
use crate::error::{ModifyResult, TreeError};
use crate::types::{BranchNode, NodeRef};

impl<K: Ord + Clone> BTree<K> {
    /// Insert `key`. Returns false if it is already present, whether in a
    /// leaf or in a branch.
    pub fn insert(&mut self, key: K) -> bool {
        let mut path = Vec::new();
        let leaf_id = match self.descend(&key, &mut path) {
            Descent::InBranch(..) => return false,
            Descent::Leaf(id) => id,
        };
        let leaf = &mut self.leaf_arena[leaf_id];
        match leaf.binary_search(&key) {
            Ok(_) => return false,
            Err(index) => leaf.insert(index, key),
        }
        self.len += 1;

        let mut node = NodeRef::Leaf(leaf_id);
        while self.node_len(node) > self.max_keys() {
            let (promoted, right) = self.split_node(node);
            match path.pop() {
                Some((parent_id, child_index)) => {
                    self.branch_arena[parent_id].insert_child(child_index, promoted, right);
                    node = NodeRef::Branch(parent_id);
                }
                None => {
                    let new_root = self
                        .branch_arena
                        .allocate(BranchNode::with_children(promoted, node, right));
                    self.root = NodeRef::Branch(new_root);
                    debug!(root = new_root, height = self.height(), "root split");
                }
            }
        }
        true
    }

    /// Insert `key`, reporting a duplicate as [`TreeError::DuplicateKey`].
    pub fn try_insert(&mut self, key: K) -> ModifyResult<()> {
        if self.insert(key) {
            Ok(())
        } else {
            Err(TreeError::DuplicateKey)
        }
    }

    /// Split an overflowing node around its median, which moves up and is
    /// kept in neither half.
    fn split_node(&mut self, node: NodeRef) -> (K, NodeRef) {
        match node {
            NodeRef::Leaf(id) => {
                let keys = &mut self.leaf_arena[id];
                let mid = keys.len() / 2;
                let right_keys = keys.split_off(mid + 1);
                let promoted = keys.remove(mid);
                let right_id = self.leaf_arena.allocate(right_keys);
                trace!(leaf = id, right = right_id, "split leaf");
                (promoted, NodeRef::Leaf(right_id))
            }
            NodeRef::Branch(id) => {
                let (new_right, promoted) = self.branch_arena[id].split();
                let right_id = self.branch_arena.allocate(new_right);
                trace!(branch = id, right = right_id, "split branch");
                (promoted, NodeRef::Branch(right_id))
            }
        }
    }
}
