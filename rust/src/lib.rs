//! Order-m multiway search trees in Rust.
//!
//! Three members of the B-tree family share one arena-backed node layout:
//!
//! * [`BPlusTree`] with [`FillPolicy::Balanced`]: a B+-tree. Keys live in
//!   leaves, branches hold routing copies, and leaves are chained for range
//!   scans.
//! * [`BPlusTree`] with [`FillPolicy::TwoThirds`]: a B*-tree. Same layout, but
//!   overflow first spills into a sibling and splits two full nodes into three,
//!   keeping every non-root node at least two-thirds full.
//! * [`BTree`]: the classic B-tree, storing each key exactly once in whichever
//!   node it settles in.
//!
//! ```
//! use multiway_tree::{BPlusTree, BTree};
//!
//! let mut bplus = BPlusTree::new(3).unwrap();
//! let mut classic = BTree::new(3).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     bplus.insert(key);
//!     classic.insert(key);
//! }
//! assert!(bplus.delete(&6));
//! assert!(classic.delete(&6));
//! assert_eq!(bplus.iter().collect::<Vec<_>>(), classic.iter().collect::<Vec<_>>());
//! ```

mod classic;
mod compact_arena;
mod config;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod range_queries;
mod redistribution;
mod tree_structure;
mod types;
mod validation;

pub use classic::{BTree, Iter as BTreeIter, Range as BTreeRange};
pub use compact_arena::{CompactArena, CompactArenaStats};
pub use config::{FillPolicy, Order, TreeConfig, DEFAULT_ORDER, MIN_ORDER};
pub use error::{InitResult, ModifyResult, TreeError, TreeResult, TreeResultExt};
pub use iteration::{Iter, RangeIter};
pub use types::{BPlusTree, BranchNode, LeafNode, NodeId, NodeRef, NULL_NODE};
