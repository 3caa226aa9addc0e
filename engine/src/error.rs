//! Error types for the roll-up engine.
//!
//! One enum per failure class, a crate-local `Result` alias, and constructor
//! helpers where a caller benefits from one — the same shape the rest of
//! this codebase uses for its error types.

use thiserror::Error;

/// Errors raised while constructing a [`crate::config::TreeParams`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `spec.md` Q3: the pre-hashed zero table must have exactly `depth + 1`
    /// entries (`Z[0]..=Z[depth]`).
    #[error("pre-hashed zero table has {actual} entries, expected {expected} for depth {depth}")]
    ZeroTableLengthMismatch {
        depth: u32,
        expected: usize,
        actual: usize,
    },

    /// Tree depth of zero or larger than the engine supports.
    #[error("tree depth {depth} is out of the supported range 1..={max}")]
    DepthOutOfRange { depth: u32, max: u32 },
}

/// Errors a `Hasher` implementation can surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HasherError {
    /// `zero_at` was asked for a level past the end of the table.
    #[error("zero-hash table has {len} entries, requested level {requested}")]
    ZeroTableTooShort { requested: usize, len: usize },

    /// A capability-specific failure (e.g. a field-arithmetic error from a
    /// Poseidon or MiMC implementation) that doesn't warrant its own
    /// variant here. Concrete `Hasher` implementations convert their own
    /// error types into this one at the boundary.
    #[error("{0}")]
    Other(String),
}

/// Root error type for the roll-up engine.
#[derive(Debug, Error)]
pub enum RollUpError {
    /// The starting-leaf proof in `spec.md` §4.1 failed: `siblings` is not
    /// consistent with `index` being the next empty slot under `root`.
    #[error("starting-leaf proof failed for index {index}")]
    InvalidStartingProof { index: u64 },

    /// Sub-tree append requires `index mod 2^sub_tree_depth == 0`.
    #[error("index {index} is not aligned to sub-tree depth {sub_tree_depth}")]
    SubTreeMisaligned { index: u64, sub_tree_depth: u32 },

    /// `sub_tree_root` was given more leaves than a depth-`d` sub-tree holds.
    #[error("sub-tree of depth {sub_tree_depth} holds at most {capacity} leaves, got {actual}")]
    SubTreeOverflow {
        sub_tree_depth: u32,
        capacity: usize,
        actual: usize,
    },

    /// The empty-sub-tree sibling check (§4.3's analogue of §4.1(a)) failed.
    #[error("empty-sub-tree sibling check failed at level {level}")]
    EmptySubTreeSiblingMismatch { level: usize },

    /// Variant-B `update` was called before `init_with_siblings`.
    #[error("on-chain siblings not initialised")]
    SiblingsNotInitialized,

    /// One of `verify`'s three hard pre-checks did not hold.
    #[error("split roll-up and OPRU disagree on {field}")]
    VerifyMismatch { field: &'static str },

    /// Appending would exceed the tree's `2^depth` capacity.
    #[error("tree of depth {depth} is full at index {index}")]
    TreeFull { index: u64, depth: u32 },

    /// A caller-supplied sibling vector has the wrong length for the
    /// operation being performed.
    #[error("expected {expected} siblings, got {actual}")]
    SiblingLengthMismatch { expected: usize, actual: usize },

    /// Propagated from the pluggable `Hasher`.
    #[error("hasher error: {0}")]
    Hasher(#[from] HasherError),

    /// Propagated from `TreeParams` construction.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RollUpError {
    /// Whether this error reflects a caller mistake that a fresh
    /// `starting_leaf_proof` / alignment check in the next call would not
    /// need to repeat — i.e. an assert-level mismatch rather than a rejected
    /// proof. Mirrors the "Invalid proof" vs. "Verify mismatch" split in
    /// `spec.md` §7.
    pub fn is_verify_mismatch(&self) -> bool {
        matches!(self, RollUpError::VerifyMismatch { .. })
    }
}

/// Crate-local `Result` alias.
pub type Result<T> = std::result::Result<T, RollUpError>;
