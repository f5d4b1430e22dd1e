use std::io::{Result, Write};

use snapshot_merkle_visualize::{Drawer, Visualize};

use crate::{MergeHash, SnapshotMerkleTree, SnapshotProof, helper::height_of};

impl<M: MergeHash> Visualize for SnapshotMerkleTree<M> {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        drawer.write(
            format!(
                "snapshot_merkle_tree depth: {}, leaves: {}/{}",
                self.depth(),
                self.leaf_count(),
                self.capacity()
            )
            .as_bytes(),
        )?;
        drawer.down();

        drawer.write(b"\nroot: ")?;
        drawer = self.current_root_hash().visualize(drawer)?;

        drawer.write(b"\nhistorical roots:")?;
        drawer.down();
        for (leaf_index, root) in self.historical_roots().iter().enumerate() {
            drawer.write(format!("\n{leaf_index}: ").as_bytes())?;
            drawer = root.visualize(drawer)?;
        }
        drawer.up();

        let mut nodes: Vec<_> = self.stored_nodes().collect();
        nodes.sort_unstable_by_key(|(index, _)| *index);
        drawer.write(b"\nnodes:")?;
        drawer.down();
        for (index, hash) in nodes {
            let height = height_of(self.depth(), index);
            drawer.write(format!("\n{index} (height {height}): ").as_bytes())?;
            drawer = hash.visualize(drawer)?;
        }
        drawer.up();

        drawer.up();
        Ok(drawer)
    }
}

impl Visualize for SnapshotProof {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        drawer.write(
            format!(
                "snapshot_proof leaf {} at snapshot {} (depth {})",
                self.prove_leaf_index, self.target_leaf_index, self.depth
            )
            .as_bytes(),
        )?;
        drawer.down();
        for (height, hash) in self.hashes.iter().enumerate() {
            let label = if height == 0 { "leaf" } else { "sibling" };
            drawer.write(format!("\n{label} {height}: ").as_bytes())?;
            drawer = hash.visualize(drawer)?;
        }
        drawer.up();
        Ok(drawer)
    }
}
