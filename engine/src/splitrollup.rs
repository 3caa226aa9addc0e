//! The split roll-up accumulator: lets a single logical roll-up span many
//! calls, with an unforgeable digest binding the exact sequence of leaves
//! appended, and a cheap comparison against an off-chain OPRU claim.

use sha3::{Digest as _, Keccak256};

use crate::config::TreeParams;
use crate::error::{Result, RollUpError};
use crate::hasher::Hasher;
use crate::merkle::starting_leaf_proof;
use crate::rollup::{append, roll_up, Tree};
use crate::subtree::{append_sub_tree, roll_up_sub_tree, split_to_sub_trees};
use crate::Node;

/// Keccak-based rolling digest. Hard-wired regardless of the pluggable
/// `Hasher` passed to the rest of this module — see `spec.md` §6 and §9:
/// `mergedLeaves` must stay on Keccak-256 even when `parent_of` is
/// Poseidon or MiMC, so it must never be "unified" with the tree hash.
pub type Digest = Node;

/// An off-chain prover's claim about one logical roll-up: where it started,
/// where it ended, and a digest of exactly the leaves appended in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Opru {
    pub start: Tree,
    pub result: Tree,
    pub merged_leaves: Digest,
}

/// The on-chain (or host-persisted) accumulator `verify`-ed against an
/// [`Opru`]. `siblings` is `Some` only in the sibling-cached variant
/// (variant B); a freshly `init`-ed split roll-up in the calldata variant
/// (variant A) never populates it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SplitRollUp {
    pub start: Tree,
    pub result: Tree,
    pub merged_leaves: Digest,
    pub siblings: Option<Vec<Node>>,
}

/// Both interpretations of a batch's contribution to `mergedLeaves`: as a
/// sequence of individual leaves, and as a sequence of sub-tree hashes. The
/// two digests differ by design — "appended as N leaves" and "appended as
/// one depth-`d` sub-tree" must not be confusable downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeResult {
    pub per_leaf: Digest,
    pub per_sub_tree: Digest,
}

fn rolling_merge(base: Digest, leaves: &[Node]) -> Digest {
    let mut acc = base;
    for leaf in leaves {
        let mut hasher = Keccak256::new();
        hasher.update(acc);
        hasher.update(leaf);
        acc = hasher.finalize().into();
    }
    acc
}

fn sub_tree_hash(sub_tree: &[Node]) -> Digest {
    let mut hasher = Keccak256::new();
    for node in sub_tree {
        hasher.update(node);
    }
    hasher.finalize().into()
}

/// Fold `leaves` into `base` both ways: one Keccak step per leaf, and one
/// Keccak step per `2^sub_tree_depth`-sized group (each group hashed first
/// as a single flat byte run).
pub fn merge_result(base: Digest, leaves: &[Node], sub_tree_depth: u32) -> MergeResult {
    let per_leaf = rolling_merge(base, leaves);
    let groups = split_to_sub_trees(leaves, sub_tree_depth);
    let sub_tree_hashes: Vec<Node> = groups.iter().map(|g| sub_tree_hash(g)).collect();
    let per_sub_tree = rolling_merge(base, &sub_tree_hashes);
    MergeResult {
        per_leaf,
        per_sub_tree,
    }
}

/// Build an [`Opru`] claim from its three fields, matching the `newOPRU`
/// operation named at the engine's external interface boundary. An
/// off-chain prover constructs one of these to hand to [`verify`].
pub fn new_opru(start: Tree, result: Tree, merged_leaves: Digest) -> Opru {
    Opru {
        start,
        result,
        merged_leaves,
    }
}

/// Rebuild a [`SplitRollUp`] from its persisted fields (`newSplitRollUp` at
/// the engine's external interface boundary): a host reads back its four
/// scalars, the digest, and the optional cached frontier from storage and
/// hands them here rather than poking the private struct layout directly.
pub fn new_split_roll_up(
    start: Tree,
    result: Tree,
    merged_leaves: Digest,
    siblings: Option<Vec<Node>>,
) -> SplitRollUp {
    SplitRollUp {
        start,
        result,
        merged_leaves,
        siblings,
    }
}

/// Variant A / B shared constructor: start and result both at `(root,
/// index)`, an empty digest, no cached frontier.
pub fn init(root: Node, index: u64) -> SplitRollUp {
    let tree = Tree { root, index };
    SplitRollUp {
        start: tree,
        result: tree,
        merged_leaves: [0u8; 32],
        siblings: None,
    }
}

/// Variant B constructor: verify the starting-leaf proof once, then persist
/// `initial_siblings` as the cached frontier every later `update_cached`
/// call will trust.
pub fn init_with_siblings(
    hasher: &impl Hasher,
    root: Node,
    index: u64,
    initial_siblings: &[Node],
) -> Result<SplitRollUp> {
    if !starting_leaf_proof(hasher, &root, index, initial_siblings)? {
        return Err(RollUpError::InvalidStartingProof { index });
    }
    let mut split = init(root, index);
    split.siblings = Some(initial_siblings.to_vec());
    Ok(split)
}

/// Variant A, single-leaf mode: a fresh [`roll_up`], re-verifying the
/// starting-leaf proof against `split.result` on every call.
pub fn update(
    hasher: &impl Hasher,
    params: &TreeParams,
    split: &mut SplitRollUp,
    initial_siblings: &[Node],
    leaves: &[Node],
) -> Result<()> {
    let (new_root, new_index) = roll_up(
        hasher,
        params,
        &split.result.root,
        split.result.index,
        leaves,
        initial_siblings,
    )?;
    split.result.root = new_root;
    split.result.index = new_index;
    split.merged_leaves = rolling_merge(split.merged_leaves, leaves);
    Ok(())
}

/// Variant A, sub-tree mode: as [`update`], but batching `leaves` into
/// `2^sub_tree_depth`-sized groups and folding `mergedLeaves` over the
/// per-sub-tree digest rather than the per-leaf one.
pub fn update_sub_tree(
    hasher: &impl Hasher,
    params: &TreeParams,
    split: &mut SplitRollUp,
    sub_tree_depth: u32,
    initial_siblings: &[Node],
    leaves: &[Node],
) -> Result<()> {
    let (new_root, new_index) = roll_up_sub_tree(
        hasher,
        params,
        &split.result.root,
        split.result.index,
        sub_tree_depth,
        leaves,
        initial_siblings,
    )?;
    split.result.root = new_root;
    split.result.index = new_index;
    split.merged_leaves =
        merge_result(split.merged_leaves, leaves, sub_tree_depth).per_sub_tree;
    Ok(())
}

/// Variant B, single-leaf mode: trust the cached frontier, fold
/// single-leaf [`append`] over `leaves`, and write the updated frontier
/// back.
///
/// Deliberately does **not** re-verify the cached `siblings` against
/// `split.result.root` on entry (open question Q1 in `spec.md` §9,
/// resolved in `DESIGN.md`): that check was already paid for once, in
/// [`init_with_siblings`], and variant B's entire reason to exist is
/// skipping it on every subsequent call.
pub fn update_cached(
    hasher: &impl Hasher,
    params: &TreeParams,
    split: &mut SplitRollUp,
    leaves: &[Node],
) -> Result<()> {
    let mut siblings = split.siblings.clone().ok_or_else(|| {
        tracing::warn!("update_cached called before init_with_siblings");
        RollUpError::SiblingsNotInitialized
    })?;
    let mut root = split.result.root;
    let mut index = split.result.index;
    for leaf in leaves {
        let (new_root, new_index, new_siblings) = append(hasher, params, index, leaf, &siblings)?;
        root = new_root;
        index = new_index;
        siblings = new_siblings;
    }
    split.result.root = root;
    split.result.index = index;
    split.siblings = Some(siblings);
    split.merged_leaves = rolling_merge(split.merged_leaves, leaves);
    Ok(())
}

/// Variant B, sub-tree mode: as [`update_cached`], but via
/// [`append_sub_tree`] over `split_to_sub_trees(leaves, d)`, with the
/// frontier length `D - d` persisted in `split.siblings`.
pub fn update_cached_sub_tree(
    hasher: &impl Hasher,
    params: &TreeParams,
    split: &mut SplitRollUp,
    sub_tree_depth: u32,
    leaves: &[Node],
) -> Result<()> {
    let mut siblings = split
        .siblings
        .clone()
        .ok_or(RollUpError::SiblingsNotInitialized)?;
    let mut root = split.result.root;
    let mut index = split.result.index;
    for group in split_to_sub_trees(leaves, sub_tree_depth) {
        let (new_root, new_index, new_siblings) =
            append_sub_tree(hasher, params, index, sub_tree_depth, &group, &siblings)?;
        root = new_root;
        index = new_index;
        siblings = new_siblings;
    }
    split.result.root = root;
    split.result.index = index;
    split.siblings = Some(siblings);
    split.merged_leaves =
        merge_result(split.merged_leaves, leaves, sub_tree_depth).per_sub_tree;
    Ok(())
}

impl SplitRollUp {
    /// Leaves appended so far but not yet reflected in `start` — useful to
    /// a host deciding whether to flush a batch.
    pub fn pending_leaves(&self) -> u64 {
        self.result.index - self.start.index
    }
}

/// Compare a `SplitRollUp` against an off-chain [`Opru`] claim.
///
/// `start`, `mergedLeaves`, and `result.index` equality are hard
/// pre-checks: any mismatch is a caller/prover error, reported as a typed
/// [`RollUpError::VerifyMismatch`] rather than folded into the boolean
/// outcome. Only `result.root` equality is reported as the `bool`.
pub fn verify(split: &SplitRollUp, opru: &Opru) -> Result<bool> {
    if split.start != opru.start {
        return Err(RollUpError::VerifyMismatch { field: "start" });
    }
    if split.merged_leaves != opru.merged_leaves {
        return Err(RollUpError::VerifyMismatch {
            field: "mergedLeaves",
        });
    }
    if split.result.index != opru.result.index {
        return Err(RollUpError::VerifyMismatch {
            field: "result.index",
        });
    }
    Ok(split.result.root == opru.result.root)
}
