//! The pluggable two-to-one hash capability.
//!
//! Everything above this module is generic over `Hasher`: the engine never
//! assumes Keccak, Poseidon, or MiMC — it only ever calls `parent_of` and
//! reads `pre_hashed_zero`. Concrete implementations live in the sibling
//! `merkle-rollup-hashers` crate.

use crate::error::{HasherError, Result};
use crate::Node;

/// A binary, two-to-one hash capability plus its pre-hashed-zero table.
///
/// Implementations MUST be deterministic, pure, and total: the same pair of
/// inputs always produces the same output, for every reachable input.
/// `pre_hashed_zero()[0]` MUST be the all-zero node (the caller-visible empty
/// leaf), and `pre_hashed_zero()[i + 1]` MUST equal
/// `parent_of(pre_hashed_zero()[i], pre_hashed_zero()[i])` (invariant I1).
pub trait Hasher {
    /// Hash a left and right child into their parent node.
    fn parent_of(&self, left: &Node, right: &Node) -> Result<Node>;

    /// The pre-hashed-zero table `Z[0..=depth]`, one entry per tree level
    /// plus the root of a fully empty tree at `Z[depth]`.
    ///
    /// Implementations typically return a `&'static` table computed once at
    /// build time; the engine never mutates or recomputes it.
    fn pre_hashed_zero(&self) -> &[Node];

    /// Convenience accessor mirroring `pre_hashed_zero()[level]`, returning a
    /// typed error instead of panicking when `level` is out of range.
    fn zero_at(&self, level: usize) -> Result<Node> {
        self.pre_hashed_zero()
            .get(level)
            .copied()
            .ok_or(HasherError::ZeroTableTooShort {
                requested: level,
                len: self.pre_hashed_zero().len(),
            })
            .map_err(Into::into)
    }
}
