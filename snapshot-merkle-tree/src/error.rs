use thiserror::Error;

use crate::MAX_DEPTH;

/// Alias for `core::result::Result<T, SnapshotTreeError>`.
pub type Result<T> = core::result::Result<T, SnapshotTreeError>;

/// Errors from snapshot Merkle tree operations.
///
/// Every variant is a precondition violation detected before any state is
/// touched, so an error never leaves a tree partially mutated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotTreeError {
    /// Depth outside `1..=63`.
    #[error("invalid depth {depth}: must be between 1 and {max}", max = MAX_DEPTH)]
    InvalidDepth {
        /// The rejected depth.
        depth: u8,
    },
    /// A node or leaf index beyond what the tree can address or has seen.
    #[error("index {index} is out of range (bound {bound})")]
    IndexOutOfRange {
        /// The rejected index.
        index: u64,
        /// Exclusive upper bound that applied.
        bound: u64,
    },
    /// Every leaf position is already filled.
    #[error("tree is full (capacity {capacity})")]
    TreeFull {
        /// Maximum number of leaves, `2^(depth-1)`.
        capacity: u64,
    },
    /// Leaves must be inserted at exactly the current leaf count.
    #[error("out of order insertion: expected leaf index {expected}, got {got}")]
    OutOfOrderInsertion {
        /// The only index that would have been accepted.
        expected: u64,
        /// The index the caller passed.
        got: u64,
    },
    /// A leaf cannot be proven against a snapshot taken before it existed.
    #[error("prove leaf index {prove} is after target leaf index {target}")]
    ProveIndexAfterTarget {
        /// Leaf being proven.
        prove: u64,
        /// Leaf whose snapshot root the proof targets.
        target: u64,
    },
    /// The target snapshot does not exist yet.
    #[error("target leaf index {target} has not been inserted (count {count})")]
    TargetIndexUnseen {
        /// Requested target leaf.
        target: u64,
        /// Current number of leaves.
        count: u64,
    },
    /// A proof must hold exactly `depth` digests.
    #[error("invalid proof length: expected {expected}, got {got}")]
    InvalidProofLength {
        /// The tree depth.
        expected: usize,
        /// Number of digests supplied.
        got: usize,
    },
    /// A serialized proof could not be decoded or is malformed.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}
