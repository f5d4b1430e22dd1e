//! Proof verification.
//!
//! Replays the insertion combination rule over a proof: at each height the
//! running digest goes on the left if the proven leaf's ancestor is a left
//! child, on the right otherwise.

use snapshot_merkle_costs::{CostResult, CostsExt, OperationCost, cost_return_on_error_no_add};

use crate::{
    MergeHash, NodeHash, SnapshotTreeError, TreeReader,
    hash::validate_depth,
    helper::{capacity_for_depth, is_left_child, leaf_node, parent},
};

/// Recompute the root a proof commits to, without a tree.
///
/// Fails with `InvalidDepth` for a depth outside `[1, 63]`,
/// `InvalidProofLength` unless `proof` holds exactly `depth` digests, and
/// `IndexOutOfRange` if `prove_leaf_index` is not a leaf position.
pub fn compute_root<M: MergeHash + ?Sized>(
    merge: &M,
    depth: u8,
    prove_leaf_index: u64,
    proof: &[NodeHash],
) -> CostResult<NodeHash, SnapshotTreeError> {
    let mut cost = OperationCost::default();
    cost_return_on_error_no_add!(&cost, validate_depth(depth));
    if proof.len() != depth as usize {
        return Err(SnapshotTreeError::InvalidProofLength {
            expected: depth as usize,
            got: proof.len(),
        })
        .wrap_with_cost(cost);
    }
    let capacity = capacity_for_depth(depth);
    if prove_leaf_index >= capacity {
        return Err(SnapshotTreeError::IndexOutOfRange {
            index: prove_leaf_index,
            bound: capacity,
        })
        .wrap_with_cost(cost);
    }

    let mut node = leaf_node(depth, prove_leaf_index);
    let mut current = proof[0];
    for sibling_hash in &proof[1..] {
        current = if is_left_child(node) {
            merge.merge(&current, sibling_hash)
        } else {
            merge.merge(sibling_hash, &current)
        };
        node = parent(node);
    }
    cost += OperationCost::with_hash_node_calls(u32::from(depth) - 1);

    Ok(current).wrap_with_cost(cost)
}

/// Check `proof` for `prove_leaf_index` against the root the tree recorded
/// right after `target_leaf_index` was inserted.
///
/// A proof of the wrong length is a structural error
/// (`InvalidProofLength`), and so is a prove leaf after the target
/// (`ProveIndexAfterTarget`): no snapshot root can cover a leaf inserted
/// later. A proof whose digests do not add up, including one whose first
/// digest is not the leaf's, is merely invalid: `Ok(false)`. Out-of-range
/// leaf indices surface as `IndexOutOfRange`.
pub fn is_valid_proof<R: TreeReader + ?Sized>(
    reader: &R,
    prove_leaf_index: u64,
    target_leaf_index: u64,
    proof: &[NodeHash],
) -> CostResult<bool, SnapshotTreeError> {
    let mut cost = OperationCost::default();
    let depth = reader.depth();
    if proof.len() != depth as usize {
        return Err(SnapshotTreeError::InvalidProofLength {
            expected: depth as usize,
            got: proof.len(),
        })
        .wrap_with_cost(cost);
    }
    if prove_leaf_index > target_leaf_index {
        return Err(SnapshotTreeError::ProveIndexAfterTarget {
            prove: prove_leaf_index,
            target: target_leaf_index,
        })
        .wrap_with_cost(cost);
    }

    let capacity = capacity_for_depth(depth);
    if prove_leaf_index >= capacity {
        return Err(SnapshotTreeError::IndexOutOfRange {
            index: prove_leaf_index,
            bound: capacity,
        })
        .wrap_with_cost(cost);
    }
    let leaf_hash = cost_return_on_error_no_add!(
        &cost,
        reader.node_hash(leaf_node(depth, prove_leaf_index))
    );
    cost += OperationCost::with_node_reads(1);
    if proof[0] != leaf_hash {
        return Ok(false).wrap_with_cost(cost);
    }

    reader
        .root_hash_after(target_leaf_index)
        .wrap_with_cost(cost)
        .flat_map_ok(|expected_root| {
            compute_root(reader.merger(), depth, prove_leaf_index, proof)
                .map_ok(|computed_root| computed_root == expected_root)
        })
}
