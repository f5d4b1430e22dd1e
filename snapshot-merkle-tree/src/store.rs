use std::{collections::HashMap, fmt};

use snapshot_merkle_visualize::DebugDigest;

use crate::{NodeHash, ZeroHashes, helper::height_of};

/// Node index to digest map holding only explicitly computed nodes.
///
/// A node without an entry is, by definition, the root of an empty subtree
/// and resolves to the zero hash for its height. Nothing is allocated for
/// untouched subtrees.
#[derive(Clone, Default)]
pub(crate) struct SparseNodeStore {
    nodes: HashMap<u64, NodeHash>,
}

impl fmt::Debug for SparseNodeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.nodes.iter().collect();
        entries.sort_unstable_by_key(|(index, _)| **index);
        f.debug_map()
            .entries(entries.into_iter().map(|(index, hash)| (index, DebugDigest(*hash))))
            .finish()
    }
}

impl SparseNodeStore {
    pub(crate) fn new() -> Self {
        SparseNodeStore {
            nodes: HashMap::new(),
        }
    }

    /// Stored digest of `node_index`, or the zero hash for its height.
    /// `node_index` must be in `[1, 2^depth)`.
    pub(crate) fn resolve(&self, node_index: u64, zero_hashes: &ZeroHashes) -> NodeHash {
        match self.nodes.get(&node_index) {
            Some(hash) => *hash,
            None => zero_hashes.at(height_of(zero_hashes.depth(), node_index)),
        }
    }

    /// Apply every write of `batch`, overwriting open nodes.
    pub(crate) fn commit(&mut self, batch: NodeBatch) {
        self.nodes.extend(batch.writes);
    }

    /// Number of materialized nodes.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (u64, &NodeHash)> {
        self.nodes.iter().map(|(index, hash)| (*index, hash))
    }
}

/// Pending node writes of one insertion, committed as a unit once the
/// whole root path is known.
#[derive(Debug, Default)]
pub(crate) struct NodeBatch {
    writes: Vec<(u64, NodeHash)>,
}

impl NodeBatch {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        NodeBatch {
            writes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, node_index: u64, hash: NodeHash) {
        self.writes.push((node_index, hash));
    }

    pub(crate) fn len(&self) -> usize {
        self.writes.len()
    }

    /// Digest of the last buffered node; the root once a full path is in.
    pub(crate) fn last_hash(&self) -> Option<NodeHash> {
        self.writes.last().map(|(_, hash)| *hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat_first_halves(left: &NodeHash, right: &NodeHash) -> NodeHash {
        let mut out = [0u8; 32];
        out[..16].copy_from_slice(&left[..16]);
        out[16..].copy_from_slice(&right[..16]);
        out[0] ^= 0x5a;
        out
    }

    #[test]
    fn test_missing_nodes_resolve_to_zero_by_height() {
        let zeros = ZeroHashes::build(4, &concat_first_halves).expect("depth 4");
        let store = SparseNodeStore::new();
        assert_eq!(store.resolve(1, &zeros), zeros.at(3));
        assert_eq!(store.resolve(3, &zeros), zeros.at(2));
        assert_eq!(store.resolve(6, &zeros), zeros.at(1));
        assert_eq!(store.resolve(15, &zeros), zeros.at(0));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_commit_overwrites_and_counts() {
        let zeros = ZeroHashes::build(3, &concat_first_halves).expect("depth 3");
        let mut store = SparseNodeStore::new();

        let mut batch = NodeBatch::with_capacity(3);
        batch.push(4, [1; 32]);
        batch.push(2, [2; 32]);
        batch.push(1, [3; 32]);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.last_hash(), Some([3; 32]));
        store.commit(batch);

        let mut batch = NodeBatch::with_capacity(3);
        batch.push(5, [4; 32]);
        batch.push(2, [5; 32]);
        batch.push(1, [6; 32]);
        store.commit(batch);

        assert_eq!(store.len(), 4);
        assert_eq!(store.resolve(4, &zeros), [1; 32]);
        assert_eq!(store.resolve(2, &zeros), [5; 32]);
        assert_eq!(store.resolve(1, &zeros), [6; 32]);
        assert_eq!(store.resolve(3, &zeros), zeros.at(1));

        let mut indices: Vec<u64> = store.iter().map(|(index, _)| index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![1, 2, 4, 5]);

        assert_eq!(
            format!("{store:?}"),
            "{1: 06060606..06060606, 2: 05050505..05050505, \
             4: 01010101..01010101, 5: 04040404..04040404}"
        );
    }
}
