//! Keccak-256 hash capability.
//!
//! Also the fixed digest the engine uses for `SplitRollUp::merged_leaves`
//! (see `merkle_rollup_engine::splitrollup`) — using it here too, as the
//! pluggable tree hash, is a coincidence of choice, not a merging of the two
//! roles; a tree built with [`Poseidon2Hasher`](crate::Poseidon2Hasher)
//! keeps its `mergedLeaves` digest on Keccak-256 regardless.

use merkle_rollup_engine::{Hasher, Node, Result};
use sha3::{Digest, Keccak256};

/// `parent_of(L, R) = Keccak256(L || R)`, with a pre-hashed zero table
/// computed once at construction: `Z[0] = 0`, `Z[i+1] = parent_of(Z[i], Z[i])`.
#[derive(Debug, Clone)]
pub struct Keccak256Hasher {
    zeros: Vec<Node>,
}

impl Keccak256Hasher {
    /// Build a hasher with a zero table covering tree depth `depth`
    /// (`depth + 1` entries, `Z[0]..=Z[depth]`).
    pub fn new(depth: u32) -> Self {
        let mut zeros = Vec::with_capacity(depth as usize + 1);
        zeros.push([0u8; 32]);
        for i in 0..depth as usize {
            let z = zeros[i];
            zeros.push(hash_pair(&z, &z));
        }
        Self { zeros }
    }
}

fn hash_pair(left: &Node, right: &Node) -> Node {
    let mut hasher = Keccak256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

impl Hasher for Keccak256Hasher {
    fn parent_of(&self, left: &Node, right: &Node) -> Result<Node> {
        Ok(hash_pair(left, right))
    }

    fn pre_hashed_zero(&self) -> &[Node] {
        &self.zeros
    }
}
