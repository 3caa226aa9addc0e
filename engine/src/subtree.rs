//! Sub-tree roll-up: batching leaves into groups of `2^d` so only one
//! `D - d`-deep path is hashed per group, amortising the cost of an
//! expensive `parent_of`.

use crate::config::TreeParams;
use crate::error::{Result, RollUpError};
use crate::hasher::Hasher;
use crate::merkle::merkle_proof;
use crate::Node;

/// Group `leaves` into chunks of `2^sub_tree_depth`, left to right,
/// right-padding the final chunk with the caller-visible empty leaf
/// (the all-zero node, `Z[0]` by invariant I1 — no hashing required to
/// produce it).
pub fn split_to_sub_trees(leaves: &[Node], sub_tree_depth: u32) -> Vec<Vec<Node>> {
    let size = 1usize << sub_tree_depth;
    leaves
        .chunks(size)
        .map(|chunk| {
            let mut group = chunk.to_vec();
            group.resize(size, [0u8; 32]);
            group
        })
        .collect()
}

/// Compute a depth-`d` Merkle root over `leaves` (length at most `2^d`),
/// using the pre-hashed zero at each level whenever an entire sub-subtree
/// is empty.
///
/// Leaves conceptually occupy a `2^d`-slot bottom level, right-padded with
/// zeros; `parent_of` is never called on a node whose whole subtree is
/// empty — at each level only `ceil(filled / 2)` nodes carry a real
/// descendant, and those are exactly the ones this sweep hashes. The
/// remainder resolve to `Z[level]` for free. This is the O(`leaves.len()`)
/// equivalent of the heap-indexed `2 * 2^d` buffer described for the
/// reference implementation: the buffer shrinks by half each level instead
/// of being pre-allocated at full width, since the trailing half is always
/// `Z[level]` once `filled <= level_len / 2`.
pub fn sub_tree_root(hasher: &impl Hasher, sub_tree_depth: u32, leaves: &[Node]) -> Result<Node> {
    let capacity = 1usize << sub_tree_depth;
    if leaves.len() > capacity {
        return Err(RollUpError::SubTreeOverflow {
            sub_tree_depth,
            capacity,
            actual: leaves.len(),
        });
    }

    let mut nodes = leaves.to_vec();
    let mut filled = leaves.len();

    for level in 0..sub_tree_depth {
        if filled == 0 {
            break;
        }
        let zero = hasher.zero_at(level as usize)?;
        let next_filled = filled.div_ceil(2);
        let mut next_nodes = Vec::with_capacity(next_filled);
        for i in 0..next_filled {
            let left = nodes[2 * i];
            let right = if 2 * i + 1 < filled { nodes[2 * i + 1] } else { zero };
            next_nodes.push(hasher.parent_of(&left, &right)?);
        }
        nodes = next_nodes;
        filled = next_filled;
    }

    if filled == 0 {
        hasher.zero_at(sub_tree_depth as usize).map_err(Into::into)
    } else {
        Ok(nodes[0])
    }
}

/// The sub-tree analogue of [`crate::merkle::starting_leaf_proof`]: is
/// `siblings` (length `D - d`) consistent with `index` being the next empty
/// `2^d`-aligned slot under `root`?
pub fn starting_sub_tree_proof(
    hasher: &impl Hasher,
    root: &Node,
    index: u64,
    sub_tree_depth: u32,
    siblings: &[Node],
) -> Result<bool> {
    let d = sub_tree_depth;
    let shifted_index = index >> d;
    for (level, sibling) in siblings.iter().enumerate() {
        let bit_is_zero = (shifted_index >> level) & 1 == 0;
        let zero = hasher.zero_at(level + d as usize)?;
        if bit_is_zero != (*sibling == zero) {
            return Err(RollUpError::EmptySubTreeSiblingMismatch { level });
        }
    }
    let zero_d = hasher.zero_at(d as usize)?;
    merkle_proof(hasher, root, &zero_d, shifted_index, siblings)
}

/// Splice a sub-tree of depth `d`, built from `sub_tree_leaves` (at most
/// `2^d` entries), into the main tree at `index`. `index` MUST be a
/// multiple of `2^d`; `siblings` MUST have length `D - d`.
///
/// Runs the single-leaf [`crate::rollup::append`] algorithm starting from
/// `sub_tree_root(d, sub_tree_leaves)`, over levels `0..D-d`, substituting
/// `Z[level + d]` for `Z[level]` at each step.
pub fn append_sub_tree(
    hasher: &impl Hasher,
    params: &TreeParams,
    index: u64,
    sub_tree_depth: u32,
    sub_tree_leaves: &[Node],
    siblings: &[Node],
) -> Result<(Node, u64, Vec<Node>)> {
    let d = sub_tree_depth;
    let step = 1u64 << d;
    if index % step != 0 {
        return Err(RollUpError::SubTreeMisaligned {
            index,
            sub_tree_depth: d,
        });
    }
    let expected = params.depth().saturating_sub(d) as usize;
    if siblings.len() != expected {
        return Err(RollUpError::SiblingLengthMismatch {
            expected,
            actual: siblings.len(),
        });
    }
    if index >= params.capacity() {
        return Err(RollUpError::TreeFull {
            index,
            depth: params.depth(),
        });
    }

    let mut node = sub_tree_root(hasher, d, sub_tree_leaves)?;
    let shifted_index = index >> d;
    let mut new_siblings = Vec::with_capacity(expected);
    for (level, sibling) in siblings.iter().enumerate() {
        let bit = (shifted_index >> level) & 1;
        if bit == 0 {
            new_siblings.push(node);
            let zero = hasher.zero_at(level + d as usize)?;
            node = hasher.parent_of(&node, &zero)?;
        } else {
            new_siblings.push(*sibling);
            node = hasher.parent_of(sibling, &node)?;
        }
    }

    Ok((node, index + step, new_siblings))
}

/// Verify the empty-sub-tree starting proof once, then fold
/// [`append_sub_tree`] over `split_to_sub_trees(leaves, d)`.
#[tracing::instrument(level = "debug", skip(hasher, leaves, initial_siblings), fields(count = leaves.len()))]
pub fn roll_up_sub_tree(
    hasher: &impl Hasher,
    params: &TreeParams,
    prev_root: &Node,
    index: u64,
    sub_tree_depth: u32,
    leaves: &[Node],
    initial_siblings: &[Node],
) -> Result<(Node, u64)> {
    if index % (1u64 << sub_tree_depth) != 0 {
        tracing::warn!(index, sub_tree_depth, "roll_up_sub_tree rejected: misaligned index");
        return Err(RollUpError::SubTreeMisaligned {
            index,
            sub_tree_depth,
        });
    }
    if !starting_sub_tree_proof(hasher, prev_root, index, sub_tree_depth, initial_siblings)? {
        return Err(RollUpError::InvalidStartingProof { index });
    }

    let mut root = *prev_root;
    let mut cur_index = index;
    let mut siblings = initial_siblings.to_vec();
    for group in split_to_sub_trees(leaves, sub_tree_depth) {
        let (new_root, new_index, new_siblings) =
            append_sub_tree(hasher, params, cur_index, sub_tree_depth, &group, &siblings)?;
        root = new_root;
        cur_index = new_index;
        siblings = new_siblings;
    }
    Ok((root, cur_index))
}
