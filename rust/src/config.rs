//! Construction-time configuration: the tree order and the fill policy.
//!
//! Every capacity bound used by the tree is derived here, so one convention
//! is applied consistently:
//!
//! | quantity              | `Balanced` (B+ / B-tree) | `TwoThirds` (B*)     |
//! |-----------------------|--------------------------|----------------------|
//! | max keys, non-root    | m - 1                    | m - 1                |
//! | max keys, root        | m - 1                    | 2 * floor((2m-2)/3)  |
//! | min keys, non-root    | ceil(m/2) - 1            | ceil((2m-1)/3) - 1   |

use crate::error::{InitResult, TreeError};

/// Smallest order accepted by any tree variant.
pub const MIN_ORDER: usize = 3;

/// Order used by `Default` implementations.
pub const DEFAULT_ORDER: usize = 16;

/// Validated tree order `m`: the maximum number of children of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Order(usize);

impl Order {
    /// Validate `m`, failing fast with `InvalidOrder` below [`MIN_ORDER`].
    pub fn new(m: usize) -> InitResult<Self> {
        if m < MIN_ORDER {
            return Err(TreeError::invalid_order(m, MIN_ORDER));
        }
        Ok(Self(m))
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn max_children(self) -> usize {
        self.0
    }

    /// Maximum number of keys in a non-root node.
    pub fn max_keys(self) -> usize {
        self.0 - 1
    }
}

impl Default for Order {
    fn default() -> Self {
        Self(DEFAULT_ORDER)
    }
}

/// How full nodes are kept, and therefore how overflow and underflow are
/// repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillPolicy {
    /// B+-tree: split 1-into-2 at the midpoint, merge 2-into-1.
    #[default]
    Balanced,
    /// B*-tree: shift into a sibling before splitting, split 2-into-3 and
    /// merge 3-into-2 so that non-root nodes stay about two-thirds full.
    TwoThirds,
}

impl FillPolicy {
    /// Minimum number of keys in a non-root node.
    pub fn min_keys(self, order: Order) -> usize {
        let m = order.get();
        match self {
            FillPolicy::Balanced => m.div_ceil(2) - 1,
            FillPolicy::TwoThirds => (2 * m - 1).div_ceil(3) - 1,
        }
    }

    /// Maximum number of keys in the root.
    ///
    /// The B* root has no siblings to share with, so it is allowed to grow
    /// until a 1-into-2 split yields two nodes that each meet the minimum.
    pub fn root_max_keys(self, order: Order) -> usize {
        match self {
            FillPolicy::Balanced => order.max_keys(),
            FillPolicy::TwoThirds => 2 * ((2 * order.get() - 2) / 3),
        }
    }
}

/// Complete construction parameters for a leaf-linked tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeConfig {
    /// Maximum number of children per branch.
    pub order: usize,
    pub policy: FillPolicy,
}

impl TreeConfig {
    pub fn new(order: usize, policy: FillPolicy) -> Self {
        Self { order, policy }
    }

    /// B+-tree configuration.
    pub fn bplus(order: usize) -> Self {
        Self::new(order, FillPolicy::Balanced)
    }

    /// B*-tree configuration.
    pub fn bstar(order: usize) -> Self {
        Self::new(order, FillPolicy::TwoThirds)
    }

    pub fn validate(&self) -> InitResult<Order> {
        Order::new(self.order)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::bplus(DEFAULT_ORDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_validation() {
        assert!(Order::new(0).is_err());
        assert!(Order::new(2).unwrap_err().is_order_error());
        assert_eq!(Order::new(3).unwrap().max_keys(), 2);
        assert_eq!(Order::default().get(), DEFAULT_ORDER);
    }

    #[test]
    fn test_balanced_bounds() {
        let expected = [(3, 1, 2), (4, 1, 3), (5, 2, 4), (6, 2, 5), (16, 7, 15)];
        for (m, min, root_max) in expected {
            let order = Order::new(m).unwrap();
            assert_eq!(FillPolicy::Balanced.min_keys(order), min, "order {}", m);
            assert_eq!(FillPolicy::Balanced.root_max_keys(order), root_max);
        }
    }

    #[test]
    fn test_two_thirds_bounds() {
        let expected = [(3, 1, 2), (4, 2, 4), (5, 2, 4), (6, 3, 6), (7, 4, 8), (9, 5, 10)];
        for (m, min, root_max) in expected {
            let order = Order::new(m).unwrap();
            assert_eq!(FillPolicy::TwoThirds.min_keys(order), min, "order {}", m);
            assert_eq!(FillPolicy::TwoThirds.root_max_keys(order), root_max);
        }
    }

    #[test]
    fn test_two_thirds_root_split_meets_minimum() {
        for m in MIN_ORDER..64 {
            let order = Order::new(m).unwrap();
            let min = FillPolicy::TwoThirds.min_keys(order);
            let overflow = FillPolicy::TwoThirds.root_max_keys(order) + 1;
            // branch split promotes one key, leaf split keeps all of them
            assert!((overflow - 1) / 2 >= min, "order {}", m);
            assert!(overflow / 2 >= min, "order {}", m);
            assert!(overflow.div_ceil(2) <= order.max_keys(), "order {}", m);
        }
    }

    #[test]
    fn test_tree_config_presets() {
        assert_eq!(TreeConfig::default().policy, FillPolicy::Balanced);
        assert_eq!(TreeConfig::bstar(4).policy, FillPolicy::TwoThirds);
        assert!(TreeConfig::bplus(1).validate().is_err());
    }
}
