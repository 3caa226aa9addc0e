//! Single-leaf append and the batch roll-up built on top of it.

use crate::config::TreeParams;
use crate::error::{Result, RollUpError};
use crate::hasher::Hasher;
use crate::merkle::starting_leaf_proof;
use crate::Node;

/// The state of an append-only tree: its current root and next write index.
///
/// `index` counts leaves already written; the next `append`/`roll_up`
/// occupies slot `index`. Invariant I3: `index` is monotonically
/// non-decreasing and increases by exactly the number of leaves appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Tree {
    pub root: Node,
    pub index: u64,
}

/// A perfectly empty tree: root `Z[D]`, index `0`.
pub fn new_tree(hasher: &impl Hasher, params: &TreeParams) -> Result<Tree> {
    let root = hasher.zero_at(params.depth() as usize)?;
    Ok(Tree { root, index: 0 })
}

/// Insert one leaf at `index`, given the current frontier `siblings`
/// (length `D`), returning the updated root, the next index, and the
/// updated frontier (also length `D`).
///
/// At each level, bit `level` of `index` decides which entry becomes the
/// new frontier node: `0` promotes the current running hash (this leaf just
/// became the rightmost filled node at this level); `1` keeps the existing
/// sibling (it was already the rightmost filled node, and stays so until
/// the next carry reaches this level). This mirrors incrementing a binary
/// counter: only the levels under a trailing run of `1` bits in `index`
/// change.
#[tracing::instrument(level = "trace", skip(hasher, leaf, siblings))]
pub fn append(
    hasher: &impl Hasher,
    params: &TreeParams,
    index: u64,
    leaf: &Node,
    siblings: &[Node],
) -> Result<(Node, u64, Vec<Node>)> {
    let depth = params.depth() as usize;
    if siblings.len() != depth {
        return Err(RollUpError::SiblingLengthMismatch {
            expected: depth,
            actual: siblings.len(),
        });
    }
    if index >= params.capacity() {
        tracing::warn!(index, depth, "append rejected: tree is full");
        return Err(RollUpError::TreeFull {
            index,
            depth: params.depth(),
        });
    }

    let mut node = *leaf;
    let mut new_siblings = Vec::with_capacity(depth);
    for (level, sibling) in siblings.iter().enumerate() {
        let bit = (index >> level) & 1;
        if bit == 0 {
            new_siblings.push(node);
            let zero = hasher.zero_at(level)?;
            node = hasher.parent_of(&node, &zero)?;
        } else {
            new_siblings.push(*sibling);
            node = hasher.parent_of(sibling, &node)?;
        }
    }

    Ok((node, index + 1, new_siblings))
}

/// Verify the starting-leaf proof once, then fold [`append`] over `leaves`,
/// threading the returned frontier from one append to the next.
///
/// Returns the final root and the index just past the last leaf written.
/// Fails fast on an invalid starting proof or if `leaves` would overflow the
/// tree's `2^D` capacity.
#[tracing::instrument(level = "debug", skip(hasher, leaves, initial_siblings), fields(count = leaves.len()))]
pub fn roll_up(
    hasher: &impl Hasher,
    params: &TreeParams,
    prev_root: &Node,
    index: u64,
    leaves: &[Node],
    initial_siblings: &[Node],
) -> Result<(Node, u64)> {
    if !starting_leaf_proof(hasher, prev_root, index, initial_siblings)? {
        tracing::warn!(index, "roll_up rejected: invalid starting-leaf proof");
        return Err(RollUpError::InvalidStartingProof { index });
    }

    let mut root = *prev_root;
    let mut cur_index = index;
    let mut siblings = initial_siblings.to_vec();
    for leaf in leaves {
        let (new_root, new_index, new_siblings) =
            append(hasher, params, cur_index, leaf, &siblings)?;
        root = new_root;
        cur_index = new_index;
        siblings = new_siblings;
    }
    Ok((root, cur_index))
}
