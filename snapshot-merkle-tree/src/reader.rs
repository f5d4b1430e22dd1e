use crate::{MergeHash, NodeHash, Result, ZeroHashes};

/// Read-only view of a snapshot Merkle tree.
///
/// Proof generation and verification only go through this trait, so they
/// never observe an insertion in progress and can run from any number of
/// readers at once.
pub trait TreeReader {
    /// The hash combinator the tree was built with.
    type Merge: MergeHash;

    /// Number of levels, root level included.
    fn depth(&self) -> u8;

    /// Number of leaves inserted so far.
    fn leaf_count(&self) -> u64;

    /// Zero-hash table of the tree.
    fn zero_hashes(&self) -> &ZeroHashes;

    /// The combinator itself.
    fn merger(&self) -> &Self::Merge;

    /// Current digest of `node_index`, falling back to the zero hash of its
    /// height for nodes never written.
    fn node_hash(&self, node_index: u64) -> Result<NodeHash>;

    /// Root digest recorded right after `leaf_index` was inserted.
    fn root_hash_after(&self, leaf_index: u64) -> Result<NodeHash>;
}
