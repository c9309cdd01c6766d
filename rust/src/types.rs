//! Core types and data structures for the leaf-linked trees.
//!
//! Nodes live in two arenas, one per node kind, and are addressed through a
//! tagged [`NodeRef`]. Upward navigation never uses stored parent pointers:
//! operations record the path they descended and walk it backwards.

use crate::compact_arena::CompactArena;
pub use crate::compact_arena::{NodeId, NULL_NODE};
use crate::config::{FillPolicy, Order};

/// Reference to a node: the tag says which arena the id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Leaf(NodeId),
    Branch(NodeId),
}

impl NodeRef {
    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id) => id,
            NodeRef::Branch(id) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_))
    }
}

/// Leaf node: sorted keys plus the link to the next leaf in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode<K> {
    pub(crate) keys: Vec<K>,
    /// Next leaf in the chain, `NULL_NODE` for the rightmost leaf.
    pub(crate) next: NodeId,
}

/// Internal (branch) node containing separator keys and child references.
///
/// `children[i]` covers keys `< keys[i]`, `children[i + 1]` covers keys
/// `>= keys[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchNode<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<NodeRef>,
}

/// One step of a root-to-leaf descent: the branch visited and the index of
/// the child that was followed.
pub(crate) type PathStep = (NodeId, usize);

/// Leaf-linked multiway search tree (B+-tree or B*-tree depending on the
/// [`FillPolicy`]).
///
/// All keys live in the leaves; branch keys are routing copies. Leaves form a
/// singly linked chain in ascending key order, which range queries follow
/// without re-descending the tree.
///
/// # Examples
///
/// ```
/// use multiway_tree::BPlusTree;
///
/// let mut tree = BPlusTree::new(3).unwrap();
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key);
/// }
///
/// assert!(tree.search(&6));
/// assert!(!tree.search(&15));
///
/// let hits: Vec<_> = tree.range_query(&6, &12).copied().collect();
/// assert_eq!(hits, [6, 7, 10, 12]);
/// ```
///
/// # Performance Characteristics
///
/// - **Insertion / deletion / search**: O(log_m n) node visits
/// - **Range queries**: O(log_m n + k) where k is the number of keys emitted
#[derive(Debug, Clone)]
pub struct BPlusTree<K> {
    pub(crate) order: Order,
    pub(crate) policy: FillPolicy,
    pub(crate) root: NodeRef,
    /// Leftmost leaf. Splits keep the left half in place and merges keep the
    /// leftmost node of a group, so this id is stable for the tree's life.
    pub(crate) first_leaf: NodeId,
    pub(crate) leaf_arena: CompactArena<LeafNode<K>>,
    pub(crate) branch_arena: CompactArena<BranchNode<K>>,
    pub(crate) len: usize,
}
