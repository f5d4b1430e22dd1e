//! Digest type, the pluggable hash combinator and depth validation.

use crate::SnapshotTreeError;

/// A 32-byte node digest.
pub type NodeHash = [u8; 32];

/// Digest of an empty leaf, the base of the zero-hash table.
pub const EMPTY_LEAF_HASH: NodeHash = [0u8; 32];

/// Deepest supported tree. Node indices go up to `2^depth - 1` and must fit
/// in a `u64`.
pub const MAX_DEPTH: u8 = 63;

/// Two-to-one hash combinator producing a parent digest from its children.
///
/// Must be deterministic. Any `Fn(&NodeHash, &NodeHash) -> NodeHash` is a
/// combinator, so closures and plain functions can be passed directly.
pub trait MergeHash {
    /// Combine a left and a right child digest into their parent digest.
    fn merge(&self, left: &NodeHash, right: &NodeHash) -> NodeHash;
}

impl<F> MergeHash for F
where
    F: Fn(&NodeHash, &NodeHash) -> NodeHash,
{
    fn merge(&self, left: &NodeHash, right: &NodeHash) -> NodeHash {
        self(left, right)
    }
}

/// Domain tag prepended to internal merge inputs.
#[cfg(feature = "blake3")]
const INTERNAL_TAG: u8 = 0x01;

/// Blake3 combinator: `blake3(0x01 || left || right)`.
#[cfg(feature = "blake3")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Merge;

#[cfg(feature = "blake3")]
impl MergeHash for Blake3Merge {
    fn merge(&self, left: &NodeHash, right: &NodeHash) -> NodeHash {
        blake3_merge(left, right)
    }
}

/// Merge two child digests: `blake3(0x01 || left || right)`.
#[cfg(feature = "blake3")]
pub fn blake3_merge(left: &NodeHash, right: &NodeHash) -> NodeHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[INTERNAL_TAG]);
    hasher.update(left);
    hasher.update(right);
    *hasher.finalize().as_bytes()
}

/// Validate that depth is in the allowed range `[1, 63]`.
pub(crate) fn validate_depth(depth: u8) -> Result<(), SnapshotTreeError> {
    if !(1..=MAX_DEPTH).contains(&depth) {
        return Err(SnapshotTreeError::InvalidDepth { depth });
    }
    Ok(())
}
