//! Concrete two-to-one hash capabilities for `merkle-rollup-engine`.
//!
//! The engine is generic over [`merkle_rollup_engine::Hasher`]; this crate
//! supplies the two external collaborators named at the engine's interface
//! boundary in its specification — Keccak-256 and a circom-compatible BN254
//! Poseidon — as data-less value types an engine caller passes by reference.

pub mod keccak;
pub mod poseidon;

pub use keccak::Keccak256Hasher;
pub use poseidon::Poseidon2Hasher;
