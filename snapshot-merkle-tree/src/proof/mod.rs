//! Inclusion proofs against historical roots.
//!
//! A proof for leaf `i` against the snapshot taken after leaf `j` (`i <= j`)
//! is `depth` digests: the leaf digest of `i` followed by one sibling digest
//! per height on the way to the root, each as it was in snapshot `j`.
//!
//! Insertion is strictly left to right, so a subtree lying entirely left of
//! the target leaf's ancestor chain was already complete at snapshot `j` and
//! its current digest is the snapshot digest. Everything right of leaf `j`
//! was empty at snapshot `j` and is taken from the zero-hash table. The only
//! nodes whose digest may have moved on since snapshot `j` are the
//! ancestors of leaf `j` itself; those are recomputed bottom-up from the
//! target leaf with zero padding on their right.

use std::fmt;

use bincode::{Decode, Encode};
use snapshot_merkle_costs::{
    CostResult, CostsExt, OperationCost, cost_return_on_error, cost_return_on_error_no_add,
};
use snapshot_merkle_visualize::DebugDigests;

use crate::{
    MAX_DEPTH, MergeHash, NodeHash, Result, SnapshotTreeError, TreeReader,
    helper::{is_left_child, leaf_node, parent, sibling},
    verify::{compute_root, is_valid_proof},
};


/// Decode limit for serialized proofs: 63 digests plus framing fits easily.
const MAX_ENCODED_PROOF_BYTES: usize = 4 * 1024;

/// Build the proof that `prove_leaf_index` is included under the root
/// recorded right after `target_leaf_index` was inserted.
///
/// Returns exactly `depth` digests. Fails with `ProveIndexAfterTarget` if
/// `prove_leaf_index > target_leaf_index` and with `TargetIndexUnseen` if
/// the target has not been inserted.
///
/// The cost counts the `depth - 1` combinator calls needed to rebuild the
/// target's ancestors as of its snapshot.
pub fn generate_proof<R: TreeReader + ?Sized>(
    reader: &R,
    prove_leaf_index: u64,
    target_leaf_index: u64,
) -> CostResult<Vec<NodeHash>, SnapshotTreeError> {
    let mut cost = OperationCost::default();

    if prove_leaf_index > target_leaf_index {
        return Err(SnapshotTreeError::ProveIndexAfterTarget {
            prove: prove_leaf_index,
            target: target_leaf_index,
        })
        .wrap_with_cost(cost);
    }
    let count = reader.leaf_count();
    if target_leaf_index >= count {
        return Err(SnapshotTreeError::TargetIndexUnseen {
            target: target_leaf_index,
            count,
        })
        .wrap_with_cost(cost);
    }

    let depth = reader.depth();
    let zero_hashes = reader.zero_hashes();
    let merge = reader.merger();

    let mut prove_node = leaf_node(depth, prove_leaf_index);
    let mut target_node = leaf_node(depth, target_leaf_index);

    let mut proof = Vec::with_capacity(depth as usize);
    proof.push(cost_return_on_error_no_add!(&cost, reader.node_hash(prove_node)));
    // Leaf digests never change, so the target leaf is its own snapshot value.
    let mut target_hash = cost_return_on_error_no_add!(&cost, reader.node_hash(target_node));
    cost.node_reads += 2;

    for height in 1..depth {
        let empty_below = zero_hashes.at(height - 1);

        let sibling_hash = if !is_left_child(prove_node) {
            // Left sibling: complete before the prove leaf was inserted.
            cost.node_reads += 1;
            cost_return_on_error_no_add!(&cost, reader.node_hash(sibling(prove_node)))
        } else if prove_node == target_node {
            // Paths merged; the right sibling was empty at the snapshot.
            empty_below
        } else if sibling(prove_node) == target_node {
            target_hash
        } else {
            // Strictly left of the target's branch, hence complete.
            cost.node_reads += 1;
            cost_return_on_error_no_add!(&cost, reader.node_hash(sibling(prove_node)))
        };
        proof.push(sibling_hash);

        target_hash = if is_left_child(target_node) {
            merge.merge(&target_hash, &empty_below)
        } else {
            cost.node_reads += 1;
            let left =
                cost_return_on_error_no_add!(&cost, reader.node_hash(sibling(target_node)));
            merge.merge(&left, &target_hash)
        };
        cost.hash_node_calls += 1;

        prove_node = parent(prove_node);
        target_node = parent(target_node);
    }

    Ok(proof).wrap_with_cost(cost)
}

/// A proof bundled with the coordinates it was generated for.
///
/// Unlike the bare digest list returned by [`generate_proof`], this can be
/// encoded, shipped and checked against a root obtained out of band, with
/// no access to the tree.
#[derive(Clone, PartialEq, Eq, Encode, Decode)]
pub struct SnapshotProof {
    /// Depth of the tree the proof was generated from.
    pub depth: u8,
    /// Leaf being proven.
    pub prove_leaf_index: u64,
    /// Leaf whose post-insertion root the proof targets.
    pub target_leaf_index: u64,
    /// Leaf digest followed by one sibling digest per height.
    pub hashes: Vec<NodeHash>,
}

impl fmt::Debug for SnapshotProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotProof")
            .field("depth", &self.depth)
            .field("prove_leaf_index", &self.prove_leaf_index)
            .field("target_leaf_index", &self.target_leaf_index)
            .field("hashes", &DebugDigests(self.hashes.clone()))
            .finish()
    }
}

impl SnapshotProof {
    /// Generate a proof from any tree reader.
    pub fn generate<R: TreeReader + ?Sized>(
        reader: &R,
        prove_leaf_index: u64,
        target_leaf_index: u64,
    ) -> CostResult<Self, SnapshotTreeError> {
        let depth = reader.depth();
        generate_proof(reader, prove_leaf_index, target_leaf_index).map_ok(|hashes| {
            SnapshotProof {
                depth,
                prove_leaf_index,
                target_leaf_index,
                hashes,
            }
        })
    }

    /// Digest of the proven leaf.
    pub fn leaf_hash(&self) -> Option<&NodeHash> {
        self.hashes.first()
    }

    /// Replay the proof and return the root it commits to.
    pub fn compute_root<M: MergeHash + ?Sized>(
        &self,
        merge: &M,
    ) -> CostResult<NodeHash, SnapshotTreeError> {
        compute_root(merge, self.depth, self.prove_leaf_index, &self.hashes)
    }

    /// Check the proof against a root known out of band, such as one the
    /// tree owner published after inserting `target_leaf_index`.
    pub fn verify_against_root<M: MergeHash + ?Sized>(
        &self,
        merge: &M,
        expected_root: &NodeHash,
    ) -> CostResult<bool, SnapshotTreeError> {
        let mut cost = OperationCost::default();
        let root = cost_return_on_error!(&mut cost, self.compute_root(merge));
        Ok(&root == expected_root).wrap_with_cost(cost)
    }

    /// Check the proof against the tree it claims to come from.
    ///
    /// Equivalent to [`is_valid_proof`] once the depths agree.
    pub fn verify<R: TreeReader + ?Sized>(&self, reader: &R) -> CostResult<bool, SnapshotTreeError> {
        if self.depth != reader.depth() {
            return Err(SnapshotTreeError::InvalidProof(format!(
                "proof depth {} does not match tree depth {}",
                self.depth,
                reader.depth()
            )))
            .wrap_with_cost(OperationCost::default());
        }
        is_valid_proof(
            reader,
            self.prove_leaf_index,
            self.target_leaf_index,
            &self.hashes,
        )
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| SnapshotTreeError::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    ///
    /// Rejects a depth outside `[1, 63]`, a hash count different from the
    /// depth, a prove index after the target and trailing bytes.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<MAX_ENCODED_PROOF_BYTES>();
        let (proof, read): (Self, usize) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| SnapshotTreeError::InvalidProof(format!("decode error: {}", e)))?;
        if read != bytes.len() {
            return Err(SnapshotTreeError::InvalidProof(format!(
                "{} trailing bytes after proof",
                bytes.len() - read
            )));
        }
        if !(1..=MAX_DEPTH).contains(&proof.depth) {
            return Err(SnapshotTreeError::InvalidProof(format!(
                "invalid depth {} in proof (must be 1..={})",
                proof.depth, MAX_DEPTH
            )));
        }
        if proof.hashes.len() != proof.depth as usize {
            return Err(SnapshotTreeError::InvalidProof(format!(
                "proof holds {} hashes for depth {}",
                proof.hashes.len(),
                proof.depth
            )));
        }
        if proof.prove_leaf_index > proof.target_leaf_index {
            return Err(SnapshotTreeError::InvalidProof(format!(
                "prove leaf {} is after target leaf {}",
                proof.prove_leaf_index, proof.target_leaf_index
            )));
        }
        Ok(proof)
    }
}
