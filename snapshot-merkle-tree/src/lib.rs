//! Append-only sparse Merkle tree with proofs against historical roots.
//!
//! A [`SnapshotMerkleTree`] has a fixed depth and fills its leaves strictly
//! left to right. Untouched subtrees are never materialized: any node
//! without a stored digest stands for an empty subtree and resolves to the
//! precomputed zero hash of its height ([`ZeroHashes`]).
//!
//! Every insertion records the resulting root. A leaf can then be proven
//! against any of those historical roots, not only the current one:
//! [`generate_proof`] rebuilds the relevant part of the tree as it stood
//! right after the target insertion, and [`is_valid_proof`] checks such a
//! proof. [`SnapshotProof`] carries a proof together with its coordinates
//! so it can be encoded and checked without the tree.
//!
//! The two-to-one hash is pluggable through [`MergeHash`]; with the default
//! `blake3` feature, [`Blake3Merge`] provides a domain-separated Blake3
//! combinator.
//!
//! Operations that hash return a [`CostResult`] reporting combinator calls
//! and node-store traffic.

#![warn(missing_docs)]

mod error;
pub(crate) mod hash;
pub(crate) mod helper;
pub(crate) mod proof;
mod reader;
pub(crate) mod store;
pub(crate) mod tree;
mod verify;
mod visualize;
mod zero;

#[cfg(all(test, feature = "blake3"))]
pub(crate) mod test_utils;

pub use error::{Result, SnapshotTreeError};
#[cfg(feature = "blake3")]
pub use hash::{Blake3Merge, blake3_merge};
pub use hash::{EMPTY_LEAF_HASH, MAX_DEPTH, MergeHash, NodeHash};
pub use helper::{leaf_node_index, node_height};
pub use proof::{SnapshotProof, generate_proof};
pub use reader::TreeReader;
pub use snapshot_merkle_costs::{CostContext, CostResult, CostsExt, OperationCost};
pub use tree::SnapshotMerkleTree;
pub use verify::{compute_root, is_valid_proof};
pub use zero::ZeroHashes;
