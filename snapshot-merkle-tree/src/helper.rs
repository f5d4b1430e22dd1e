//! Node index arithmetic for the level-order layout.
//!
//! The root is node `1`; node `i` has children `2i` and `2i + 1`. A tree of
//! depth `d` has leaves at `[2^(d-1), 2^d)`. All callers pass a depth that
//! was validated against [`MAX_DEPTH`](crate::MAX_DEPTH), so every shift
//! below stays within `u64`.

use crate::{Result, SnapshotTreeError};

/// Maximum number of leaves of a tree of the given depth.
#[inline]
pub(crate) fn capacity_for_depth(depth: u8) -> u64 {
    1u64 << (depth - 1)
}

/// Exclusive upper bound of node indices of a tree of the given depth.
#[inline]
pub(crate) fn node_index_bound(depth: u8) -> u64 {
    1u64 << depth
}

/// Node index of a leaf. `leaf_index` must be below the capacity.
#[inline]
pub(crate) fn leaf_node(depth: u8, leaf_index: u64) -> u64 {
    capacity_for_depth(depth) + leaf_index
}

#[inline]
pub(crate) fn sibling(node_index: u64) -> u64 {
    node_index ^ 1
}

#[inline]
pub(crate) fn parent(node_index: u64) -> u64 {
    node_index >> 1
}

#[inline]
pub(crate) fn is_left_child(node_index: u64) -> bool {
    node_index & 1 == 0
}

/// Height of a node above the leaf level: leaves are 0, the root is
/// `depth - 1`. `node_index` must be in `[1, 2^depth)`.
#[inline]
pub(crate) fn height_of(depth: u8, node_index: u64) -> u8 {
    (depth - 1) - node_index.ilog2() as u8
}

/// Node index of the leaf at `leaf_index` in a tree of the given depth.
pub fn leaf_node_index(depth: u8, leaf_index: u64) -> Result<u64> {
    crate::hash::validate_depth(depth)?;
    let capacity = capacity_for_depth(depth);
    if leaf_index >= capacity {
        return Err(SnapshotTreeError::IndexOutOfRange {
            index: leaf_index,
            bound: capacity,
        });
    }
    Ok(leaf_node(depth, leaf_index))
}

/// Height of `node_index` in a tree of the given depth.
pub fn node_height(depth: u8, node_index: u64) -> Result<u8> {
    crate::hash::validate_depth(depth)?;
    let bound = node_index_bound(depth);
    if node_index == 0 || node_index >= bound {
        return Err(SnapshotTreeError::IndexOutOfRange {
            index: node_index,
            bound,
        });
    }
    Ok(height_of(depth, node_index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_depth_3() {
        assert_eq!(capacity_for_depth(3), 4);
        assert_eq!(node_index_bound(3), 8);
        assert_eq!((0..4).map(|i| leaf_node(3, i)).collect::<Vec<_>>(), vec![4u64, 5, 6, 7]);
        assert_eq!(height_of(3, 1), 2);
        assert_eq!(height_of(3, 2), 1);
        assert_eq!(height_of(3, 3), 1);
        assert_eq!(height_of(3, 7), 0);
        assert_eq!(sibling(4), 5);
        assert_eq!(sibling(5), 4);
        assert_eq!(parent(7), 3);
        assert!(is_left_child(6));
        assert!(!is_left_child(7));
    }

    #[test]
    fn test_depth_one_is_a_single_leaf_root() {
        assert_eq!(capacity_for_depth(1), 1);
        assert_eq!(leaf_node(1, 0), 1);
        assert_eq!(height_of(1, 1), 0);
    }

    #[test]
    fn test_max_depth_stays_in_u64() {
        assert_eq!(capacity_for_depth(63), 1u64 << 62);
        assert_eq!(node_index_bound(63), 1u64 << 63);
        let last_leaf = leaf_node(63, (1u64 << 62) - 1);
        assert_eq!(last_leaf, (1u64 << 63) - 1);
        assert_eq!(height_of(63, last_leaf), 0);
        assert_eq!(sibling(last_leaf), last_leaf - 1);
    }

    #[test]
    fn test_public_checked_helpers() {
        assert_eq!(leaf_node_index(3, 2), Ok(6));
        assert_eq!(
            leaf_node_index(3, 4),
            Err(SnapshotTreeError::IndexOutOfRange { index: 4, bound: 4 })
        );
        assert_eq!(
            leaf_node_index(64, 0),
            Err(SnapshotTreeError::InvalidDepth { depth: 64 })
        );
        assert_eq!(node_height(4, 1), Ok(3));
        assert_eq!(
            node_height(4, 0),
            Err(SnapshotTreeError::IndexOutOfRange { index: 0, bound: 16 })
        );
        assert_eq!(
            node_height(4, 16),
            Err(SnapshotTreeError::IndexOutOfRange {
                index: 16,
                bound: 16
            })
        );
    }
}
