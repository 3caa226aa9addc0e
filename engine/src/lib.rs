//! An append-only Merkle tree roll-up engine.
//!
//! This crate lets a verifier cheaply fold a batch of new leaves into the
//! root of a large, mostly-empty, fixed-depth binary Merkle tree, given only
//! the current root, the next insertion index, and the sibling path from
//! the root down to the first empty leaf. The underlying two-to-one hash
//! function is pluggable — see [`hasher::Hasher`] — and concrete
//! implementations (Keccak, Poseidon) live in the sibling
//! `merkle-rollup-hashers` crate.
//!
//! ```text
//!            D: Split roll-up accumulator (splitrollup)
//!                          |
//!            C: Roll-up engine (rollup, subtree)
//!                          |
//!            B: Merkle primitives (merkle)
//!                          |
//!            A: Hasher capability (hasher)  <- implemented by the host
//! ```
//!
//! Every public operation is a pure, total function: no I/O, no shared
//! mutable state, no suspension points. A single [`splitrollup::SplitRollUp`]
//! is meant to be owned by exactly one logical actor; concurrent writers are
//! a caller-side violation this crate does not attempt to detect.

pub mod config;
pub mod error;
pub mod hasher;
pub mod merkle;
pub mod rollup;
pub mod splitrollup;
pub mod subtree;
pub mod telemetry;

/// A tree or hash-output node: 32 bytes, interpreted by the [`hasher::Hasher`]
/// implementation in whatever field or byte convention it chooses. The
/// engine itself never inspects a `Node`'s contents beyond equality.
pub type Node = [u8; 32];

pub use config::TreeParams;
pub use error::{ConfigError, HasherError, Result, RollUpError};
pub use hasher::Hasher;
pub use merkle::{compute_root, merkle_proof, merkle_root, starting_leaf_proof};
pub use rollup::{append, new_tree, roll_up, Tree};
pub use splitrollup::{
    init, init_with_siblings, merge_result, new_opru, new_split_roll_up, update, update_cached,
    update_cached_sub_tree, update_sub_tree, verify, Digest, MergeResult, Opru, SplitRollUp,
};
pub use subtree::{append_sub_tree, roll_up_sub_tree, split_to_sub_trees, sub_tree_root};
