use crate::{
    EMPTY_LEAF_HASH, MergeHash, NodeHash, Result,
    hash::validate_depth,
};

/// Digests of entirely empty subtrees, indexed by height.
///
/// `zero[0]` is [`EMPTY_LEAF_HASH`] and `zero[h] = merge(zero[h-1],
/// zero[h-1])`. Built once per tree and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroHashes {
    hashes: Vec<NodeHash>,
}

impl ZeroHashes {
    /// Build the table for a tree of the given depth.
    ///
    /// Fails with `InvalidDepth` unless `depth` is in `[1, 63]`.
    pub fn build<M: MergeHash + ?Sized>(depth: u8, merge: &M) -> Result<Self> {
        validate_depth(depth)?;
        let mut hashes = Vec::with_capacity(depth as usize);
        hashes.push(EMPTY_LEAF_HASH);
        for height in 1..depth as usize {
            let below = hashes[height - 1];
            hashes.push(merge.merge(&below, &below));
        }
        Ok(ZeroHashes { hashes })
    }

    /// Depth the table was built for.
    pub fn depth(&self) -> u8 {
        self.hashes.len() as u8
    }

    /// Zero digest at `height`, or `None` past the root.
    pub fn get(&self, height: u8) -> Option<NodeHash> {
        self.hashes.get(height as usize).copied()
    }

    /// Zero digest at a height known to be below the depth.
    #[inline]
    pub(crate) fn at(&self, height: u8) -> NodeHash {
        self.hashes[height as usize]
    }

    /// Root digest of a completely empty tree.
    pub fn root(&self) -> NodeHash {
        self.hashes[self.hashes.len() - 1]
    }

    /// The whole table, leaf height first.
    pub fn as_slice(&self) -> &[NodeHash] {
        &self.hashes
    }
}
