//! Construction and initialization logic for BPlusTree and its nodes.

use crate::compact_arena::CompactArena;
use crate::config::{FillPolicy, Order, TreeConfig};
use crate::error::InitResult;
use crate::types::{BPlusTree, BranchNode, LeafNode, NodeRef, NULL_NODE};

impl<K> BPlusTree<K> {
    /// Create a B+-tree of order `order` (maximum children per branch).
    ///
    /// # Examples
    ///
    /// ```
    /// use multiway_tree::BPlusTree;
    ///
    /// let tree = BPlusTree::<i32>::new(4).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BPlusTree::<i32>::new(2).is_err());
    /// ```
    pub fn new(order: usize) -> InitResult<Self> {
        Self::with_config(TreeConfig::bplus(order))
    }

    /// Create a B*-tree of order `order`.
    ///
    /// ```
    /// use multiway_tree::{BPlusTree, FillPolicy};
    ///
    /// let tree = BPlusTree::<u64>::new_bstar(4).unwrap();
    /// assert_eq!(tree.policy(), FillPolicy::TwoThirds);
    /// ```
    pub fn new_bstar(order: usize) -> InitResult<Self> {
        Self::with_config(TreeConfig::bstar(order))
    }

    /// Create a tree from a full configuration.
    pub fn with_config(config: TreeConfig) -> InitResult<Self> {
        let order = config.validate()?;
        Ok(Self::with_validated(order, config.policy))
    }

    pub(crate) fn with_validated(order: Order, policy: FillPolicy) -> Self {
        let mut leaf_arena = CompactArena::new();
        let root_id = leaf_arena.allocate(LeafNode::new());

        Self {
            order,
            policy,
            root: NodeRef::Leaf(root_id),
            first_leaf: root_id,
            leaf_arena,
            branch_arena: CompactArena::new(),
            len: 0,
        }
    }
}

impl<K: Ord + Clone> BPlusTree<K> {
    /// Build a tree from an iterator of keys; duplicates are ignored.
    ///
    /// ```
    /// use multiway_tree::{BPlusTree, TreeConfig};
    ///
    /// let tree = BPlusTree::from_keys(TreeConfig::bplus(3), [3, 1, 2, 3]).unwrap();
    /// assert_eq!(tree.len(), 3);
    /// ```
    pub fn from_keys<I>(config: TreeConfig, keys: I) -> InitResult<Self>
    where
        I: IntoIterator<Item = K>,
    {
        let mut tree = Self::with_config(config)?;
        tree.extend(keys);
        Ok(tree)
    }
}

impl<K: Ord + Clone> Default for BPlusTree<K> {
    /// B+-tree with [`DEFAULT_ORDER`](crate::DEFAULT_ORDER).
    fn default() -> Self {
        Self::with_validated(Order::default(), FillPolicy::Balanced)
    }
}

impl<K: Ord + Clone> Extend<K> for BPlusTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K> LeafNode<K> {
    /// Creates an empty, unlinked leaf.
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            next: NULL_NODE,
        }
    }
}

impl<K> BranchNode<K> {
    /// Creates an empty branch node.
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a branch with one separator and two children, as produced by a
    /// root split.
    pub(crate) fn with_children(separator: K, left: NodeRef, right: NodeRef) -> Self {
        Self {
            keys: vec![separator],
            children: vec![left, right],
        }
    }
}

impl<K> Default for LeafNode<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Default for BranchNode<K> {
    fn default() -> Self {
        Self::new()
    }
}
