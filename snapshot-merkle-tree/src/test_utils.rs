//! Shared helpers for building trees in tests.

use crate::{Blake3Merge, NodeHash, SnapshotMerkleTree};

/// Leaf digest derived from an integer: `blake3(0x00 || i as BE bytes)`.
pub(crate) fn leaf_hash_from_u64(i: u64) -> NodeHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[0x00]);
    hasher.update(&i.to_be_bytes());
    *hasher.finalize().as_bytes()
}

pub(crate) fn payload_for(i: u64) -> Vec<u8> {
    format!("payload-{i}").into_bytes()
}

/// Tree of the given depth with leaves `0..count` inserted.
pub(crate) fn make_tree(depth: u8, count: u64) -> SnapshotMerkleTree<Blake3Merge> {
    let mut tree = SnapshotMerkleTree::new(depth, Blake3Merge).expect("valid depth");
    for i in 0..count {
        tree.insert_leaf(i, leaf_hash_from_u64(i), payload_for(i))
            .unwrap()
            .expect("insert should succeed");
    }
    tree
}

/// Flip one bit of a digest.
pub(crate) fn tampered(hash: &NodeHash) -> NodeHash {
    let mut out = *hash;
    out[31] ^= 0x01;
    out
}
