//! Merkle primitives: folding a leaf to a root, and the starting-leaf proof
//! that binds a sibling vector to "index is the next empty slot".

use crate::hasher::Hasher;
use crate::error::Result;
use crate::Node;

/// Fold `leaf` up the tree through `siblings`, starting at `index`.
///
/// At level `i`, bit `i` of `index` selects which side `leaf` sits on:
/// `0` means `leaf` is the left child, `1` means it is the right child.
/// The caller is responsible for supplying exactly as many siblings as the
/// depth being verified — no length check beyond what `siblings` itself
/// provides is performed.
pub fn compute_root(
    hasher: &impl Hasher,
    leaf: &Node,
    index: u64,
    siblings: &[Node],
) -> Result<Node> {
    let mut node = *leaf;
    let mut p = index;
    for sibling in siblings {
        node = if p & 1 == 0 {
            hasher.parent_of(&node, sibling)?
        } else {
            hasher.parent_of(sibling, &node)?
        };
        p >>= 1;
    }
    Ok(node)
}

/// `compute_root` under the name used at the engine's external interface
/// boundary (`merkleRoot` in the spec's operation list) — a host calling
/// into this crate from outside the `merkle` module reaches for this name
/// first; it has no behavior of its own beyond [`compute_root`].
pub fn merkle_root(
    hasher: &impl Hasher,
    leaf: &Node,
    index: u64,
    siblings: &[Node],
) -> Result<Node> {
    compute_root(hasher, leaf, index, siblings)
}

/// `compute_root(...) == root`.
pub fn merkle_proof(
    hasher: &impl Hasher,
    root: &Node,
    leaf: &Node,
    index: u64,
    siblings: &[Node],
) -> Result<bool> {
    Ok(compute_root(hasher, leaf, index, siblings)? == *root)
}

/// The central correctness check for every append operation: does
/// `siblings` describe the frontier such that `index` is the next empty
/// slot under `root`?
///
/// Two conditions must both hold:
///   (a) for each level `i`, bit `i` of `index` is `0` iff
///       `siblings[i] == Z[i]` (an untouched right sibling);
///   (b) `merkle_proof(root, Z[0], index, siblings)` holds, i.e. `siblings`
///       is consistent with `root` as if slot `index` currently held the
///       empty leaf.
///
/// Condition (a) alone does not rule out a sibling vector lifted from a
/// different root; condition (b) alone does not rule out a vector whose
/// "empty" slots were filled in from a stale frontier. Together they pin
/// down `index` as *this* root's next empty slot.
#[tracing::instrument(level = "trace", skip(hasher, siblings))]
pub fn starting_leaf_proof(
    hasher: &impl Hasher,
    root: &Node,
    index: u64,
    siblings: &[Node],
) -> Result<bool> {
    let zero_leaf = hasher.zero_at(0)?;
    for (level, sibling) in siblings.iter().enumerate() {
        let bit_is_zero = (index >> level) & 1 == 0;
        let zero = hasher.zero_at(level)?;
        let sibling_is_zero = *sibling == zero;
        if bit_is_zero != sibling_is_zero {
            tracing::trace!(level, index, "starting-leaf proof bit-pattern mismatch");
            return Ok(false);
        }
    }
    let ok = merkle_proof(hasher, root, &zero_leaf, index, siblings)?;
    if !ok {
        tracing::trace!(index, "starting-leaf proof failed merkle binding");
    }
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::test_support::TestKeccakHasher;

    #[test]
    fn empty_siblings_returns_leaf() {
        let hasher = TestKeccakHasher::new(1);
        let leaf = [7u8; 32];
        let root = compute_root(&hasher, &leaf, 0, &[]).unwrap();
        assert_eq!(root, leaf);
    }

    #[test]
    fn merkle_root_matches_compute_root() {
        let hasher = TestKeccakHasher::new(4);
        let leaf = [3u8; 32];
        let siblings: Vec<Node> = (0..4).map(|i| [i as u8 + 20; 32]).collect();
        assert_eq!(
            merkle_root(&hasher, &leaf, 2, &siblings).unwrap(),
            compute_root(&hasher, &leaf, 2, &siblings).unwrap()
        );
    }

    #[test]
    fn round_trips_through_merkle_proof() {
        let hasher = TestKeccakHasher::new(4);
        let leaf = [1u8; 32];
        let siblings: Vec<Node> = (0..4).map(|i| [i as u8 + 10; 32]).collect();
        let root = compute_root(&hasher, &leaf, 5, &siblings).unwrap();
        assert!(merkle_proof(&hasher, &root, &leaf, 5, &siblings).unwrap());
    }

    #[test]
    fn starting_leaf_proof_accepts_fresh_zero_frontier() {
        let hasher = TestKeccakHasher::new(8);
        let zeros = hasher.pre_hashed_zero().to_vec();
        let root = zeros[8];
        let siblings = zeros[0..8].to_vec();
        assert!(starting_leaf_proof(&hasher, &root, 0, &siblings).unwrap());
    }

    #[test]
    fn starting_leaf_proof_rejects_wrong_index() {
        let hasher = TestKeccakHasher::new(8);
        let zeros = hasher.pre_hashed_zero().to_vec();
        let root = zeros[8];
        let siblings = zeros[0..8].to_vec();
        // index 1 requires siblings[0] to be non-zero (a left sibling).
        assert!(!starting_leaf_proof(&hasher, &root, 1, &siblings).unwrap());
    }

    #[test]
    fn starting_leaf_proof_rejects_tampered_sibling() {
        let hasher = TestKeccakHasher::new(8);
        let zeros = hasher.pre_hashed_zero().to_vec();
        let root = zeros[8];
        let mut siblings = zeros[0..8].to_vec();
        siblings[3][0] ^= 0xFF;
        assert!(!starting_leaf_proof(&hasher, &root, 0, &siblings).unwrap());
    }
}
