use std::collections::HashMap;

use snapshot_merkle_costs::{CostContext, CostResult, CostsExt, OperationCost};

use crate::{
    MergeHash, NodeHash, Result, SnapshotProof, SnapshotTreeError, TreeReader, ZeroHashes,
    helper::{capacity_for_depth, is_left_child, leaf_node, node_index_bound, parent, sibling},
    proof::generate_proof,
    store::{NodeBatch, SparseNodeStore},
    verify::is_valid_proof,
};

/// An append-only binary Merkle tree that remembers every root it had.
///
/// Leaves are filled strictly left to right. Only nodes on the root path of
/// some inserted leaf are materialized; everything else resolves to the
/// zero hash of its height. After each insertion the new root is recorded,
/// so a leaf can later be proven against the root as it stood right after
/// any earlier insertion.
///
/// Node indices follow the level-order layout (root = 1, children of `i`
/// are `2i` and `2i + 1`).
#[derive(Debug, Clone)]
pub struct SnapshotMerkleTree<M> {
    depth: u8,
    merge: M,
    zero_hashes: ZeroHashes,
    nodes: SparseNodeStore,
    leaves: Vec<(NodeHash, Vec<u8>)>,
    roots_after: Vec<NodeHash>,
    root_index: HashMap<NodeHash, u64>,
}

impl<M: MergeHash> SnapshotMerkleTree<M> {
    /// Create an empty tree with `depth` levels (root level included),
    /// holding up to `2^(depth-1)` leaves.
    ///
    /// Depth must be between 1 and 63 inclusive.
    pub fn new(depth: u8, merge: M) -> Result<Self> {
        let zero_hashes = ZeroHashes::build(depth, &merge)?;
        Ok(SnapshotMerkleTree {
            depth,
            merge,
            zero_hashes,
            nodes: SparseNodeStore::new(),
            leaves: Vec::new(),
            roots_after: Vec::new(),
            root_index: HashMap::new(),
        })
    }

    /// Number of levels, root level included.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Maximum number of leaves.
    pub fn capacity(&self) -> u64 {
        capacity_for_depth(self.depth)
    }

    /// Number of leaves inserted so far.
    pub fn leaf_count(&self) -> u64 {
        self.leaves.len() as u64
    }

    /// `true` before the first insertion.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// `true` once every leaf position is taken.
    pub fn is_full(&self) -> bool {
        self.leaf_count() >= self.capacity()
    }

    /// Zero-hash table, indexed by height.
    pub fn zero_hashes(&self) -> &ZeroHashes {
        &self.zero_hashes
    }

    /// The hash combinator.
    pub fn merger(&self) -> &M {
        &self.merge
    }

    /// How many nodes are explicitly stored. Grows by at most `depth` per
    /// insertion.
    pub fn stored_node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every recorded root, indexed by the leaf whose insertion produced it.
    pub fn historical_roots(&self) -> &[NodeHash] {
        &self.roots_after
    }

    /// Stored nodes as `(node_index, digest)`, in no particular order.
    pub(crate) fn stored_nodes(&self) -> impl Iterator<Item = (u64, &NodeHash)> {
        self.nodes.iter()
    }

    /// Digest of `node_index`: the stored value, or the zero hash of the
    /// node's height if it was never written.
    pub fn node_hash(&self, node_index: u64) -> Result<NodeHash> {
        let bound = node_index_bound(self.depth);
        if node_index == 0 || node_index >= bound {
            return Err(SnapshotTreeError::IndexOutOfRange {
                index: node_index,
                bound,
            });
        }
        Ok(self.nodes.resolve(node_index, &self.zero_hashes))
    }

    /// The current root. Equals the zero root until the first insertion.
    pub fn current_root_hash(&self) -> NodeHash {
        self.nodes.resolve(1, &self.zero_hashes)
    }

    /// Root as it stood immediately after `leaf_index` was inserted.
    pub fn root_hash_after(&self, leaf_index: u64) -> Result<NodeHash> {
        usize::try_from(leaf_index)
            .ok()
            .and_then(|i| self.roots_after.get(i))
            .copied()
            .ok_or(SnapshotTreeError::IndexOutOfRange {
                index: leaf_index,
                bound: self.leaf_count(),
            })
    }

    /// Leaf index whose insertion produced `root`, if any.
    ///
    /// If the same root was recorded more than once (only possible when an
    /// inserted leaf hash equals the empty leaf hash) the earliest index is
    /// returned.
    pub fn root_index_of(&self, root: &NodeHash) -> Option<u64> {
        self.root_index.get(root).copied()
    }

    /// Hash and payload of the leaf at `leaf_index`.
    pub fn leaf(&self, leaf_index: u64) -> Result<(&NodeHash, &[u8])> {
        usize::try_from(leaf_index)
            .ok()
            .and_then(|i| self.leaves.get(i))
            .map(|(hash, payload)| (hash, payload.as_slice()))
            .ok_or(SnapshotTreeError::IndexOutOfRange {
                index: leaf_index,
                bound: self.leaf_count(),
            })
    }

    /// All leaves in insertion order.
    pub fn leaves(&self) -> impl Iterator<Item = (&NodeHash, &[u8])> {
        self.leaves
            .iter()
            .map(|(hash, payload)| (hash, payload.as_slice()))
    }

    /// Insert a leaf at `leaf_index`, which must equal the current leaf count.
    ///
    /// Updates every node on the leaf's root path and records the new root
    /// as the snapshot for `leaf_index`. Returns the new root. The cost
    /// counts `depth - 1` combinator calls and `depth` node writes.
    ///
    /// Fails with `TreeFull` when every position is taken and with
    /// `OutOfOrderInsertion` for any other index; the tree is untouched in
    /// both cases.
    pub fn insert_leaf(
        &mut self,
        leaf_index: u64,
        leaf_hash: NodeHash,
        payload: Vec<u8>,
    ) -> CostResult<NodeHash, SnapshotTreeError> {
        let mut cost = OperationCost::default();
        let count = self.leaf_count();
        if count >= self.capacity() {
            return Err(SnapshotTreeError::TreeFull {
                capacity: self.capacity(),
            })
            .wrap_with_cost(cost);
        }
        if leaf_index != count {
            return Err(SnapshotTreeError::OutOfOrderInsertion {
                expected: count,
                got: leaf_index,
            })
            .wrap_with_cost(cost);
        }

        let batch = self
            .root_path_batch(leaf_index, leaf_hash)
            .unwrap_add_cost(&mut cost);
        let root = batch.last_hash().unwrap_or(leaf_hash);

        cost += OperationCost::with_node_writes(batch.len() as u32);
        self.nodes.commit(batch);
        self.leaves.push((leaf_hash, payload));
        self.roots_after.push(root);
        self.root_index.entry(root).or_insert(leaf_index);

        Ok(root).wrap_with_cost(cost)
    }

    /// Insert a leaf at the next free position and return its index.
    pub fn append(
        &mut self,
        leaf_hash: NodeHash,
        payload: Vec<u8>,
    ) -> CostResult<u64, SnapshotTreeError> {
        let leaf_index = self.leaf_count();
        self.insert_leaf(leaf_index, leaf_hash, payload)
            .map_ok(|_| leaf_index)
    }

    // Compute the new digests of every node from the leaf up to the root
    // without touching the store. Siblings are off the path, so reading them
    // from the committed store is exact.
    fn root_path_batch(&self, leaf_index: u64, leaf_hash: NodeHash) -> CostContext<NodeBatch> {
        let mut cost = OperationCost::default();
        let mut batch = NodeBatch::with_capacity(self.depth as usize);
        let mut node = leaf_node(self.depth, leaf_index);
        let mut running = leaf_hash;
        batch.push(node, running);

        for _ in 1..self.depth {
            let sibling_hash = self.nodes.resolve(sibling(node), &self.zero_hashes);
            cost.node_reads += 1;
            running = if is_left_child(node) {
                self.merge.merge(&running, &sibling_hash)
            } else {
                self.merge.merge(&sibling_hash, &running)
            };
            cost.hash_node_calls += 1;
            node = parent(node);
            batch.push(node, running);
        }
        debug_assert_eq!(node, 1);

        batch.wrap_with_cost(cost)
    }

    /// Proof that the leaf at `prove_leaf_index` is included under the root
    /// recorded after `target_leaf_index` was inserted.
    ///
    /// See [`generate_proof`].
    pub fn get_proof(
        &self,
        prove_leaf_index: u64,
        target_leaf_index: u64,
    ) -> CostResult<Vec<NodeHash>, SnapshotTreeError> {
        generate_proof(self, prove_leaf_index, target_leaf_index)
    }

    /// Same as [`get_proof`](Self::get_proof) but bundled with its
    /// coordinates, ready to be encoded or verified without the tree.
    pub fn prove(
        &self,
        prove_leaf_index: u64,
        target_leaf_index: u64,
    ) -> CostResult<SnapshotProof, SnapshotTreeError> {
        SnapshotProof::generate(self, prove_leaf_index, target_leaf_index)
    }

    /// Check `proof` for `prove_leaf_index` against the root recorded after
    /// `target_leaf_index`.
    ///
    /// See [`is_valid_proof`].
    pub fn is_valid_proof(
        &self,
        prove_leaf_index: u64,
        target_leaf_index: u64,
        proof: &[NodeHash],
    ) -> CostResult<bool, SnapshotTreeError> {
        is_valid_proof(self, prove_leaf_index, target_leaf_index, proof)
    }
}

impl<M: MergeHash> TreeReader for SnapshotMerkleTree<M> {
    type Merge = M;

    fn depth(&self) -> u8 {
        self.depth
    }

    fn leaf_count(&self) -> u64 {
        SnapshotMerkleTree::leaf_count(self)
    }

    fn zero_hashes(&self) -> &ZeroHashes {
        &self.zero_hashes
    }

    fn merger(&self) -> &M {
        &self.merge
    }

    fn node_hash(&self, node_index: u64) -> Result<NodeHash> {
        SnapshotMerkleTree::node_hash(self, node_index)
    }

    fn root_hash_after(&self, leaf_index: u64) -> Result<NodeHash> {
        SnapshotMerkleTree::root_hash_after(self, leaf_index)
    }
}
