//! BN254-scalar-field Poseidon hash capability, circom/`light-poseidon`
//! compatible — the "Poseidon" external capability named alongside Keccak
//! and MiMC at the engine's interface boundary.
//!
//! Matches the parameterization used by Solana's native `sol_poseidon`
//! syscall and Noir's `std::hash::poseidon::bn254`: 2-to-1, BN254 `Fr`.
//! Inputs are reduced modulo the BN254 scalar field automatically by
//! `light-poseidon`'s byte-oriented API, the same reduction behavior a
//! syscall-backed implementation performs before hashing.

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonBytesHasher, PoseidonError};
use merkle_rollup_engine::{Hasher, HasherError, Node, Result};

/// Pre-computed zero hashes for levels 0 through 20 (`Z[0] = 0`,
/// `Z[i] = poseidon(Z[i-1], Z[i-1])`), precomputed for the BN254 scalar
/// field with Poseidon parameters matching Solana's `sol_poseidon` syscall
/// and Noir's `std::hash::poseidon::bn254`.
pub const ZERO_HASHES_20: [[u8; 32]; 21] = [
    [0u8; 32],
    hex_literal::hex!("2098f5fb9e239eab3ceac3f27b81e481dc3124d55ffed523a839ee8446b64864"),
    hex_literal::hex!("1069673dcdb12263df301a6ff584a7ec261a44cb9dc68df067a4774460b1f1e1"),
    hex_literal::hex!("18f43331537ee2af2e3d758d50f72106467c6eea50371dd528d57eb2b856d238"),
    hex_literal::hex!("07f9d837cb17b0d36320ffe93ba52345f1b728571a568265caac97559dbc952a"),
    hex_literal::hex!("2b94cf5e8746b3f5c9631f4c5df32907a699c58c94b2ad4d7b5cec1639183f55"),
    hex_literal::hex!("2dee93c5a666459646ea7d22cca9e1bcfed71e6951b953611d11dda32ea09d78"),
    hex_literal::hex!("078295e5a22b84e982cf601eb639597b8b0515a88cb5ac7fa8a4aabe3c87349d"),
    hex_literal::hex!("2fa5e5f18f6027a6501bec864564472a616b2e274a41211a444cbe3a99f3cc61"),
    hex_literal::hex!("0e884376d0d8fd21ecb780389e941f66e45e7acce3e228ab3e2156a614fcd747"),
    hex_literal::hex!("1b7201da72494f1e28717ad1a52eb469f95892f957713533de6175e5da190af2"),
    hex_literal::hex!("1f8d8822725e36385200c0b201249819a6e6e1e4650808b5bebc6bface7d7636"),
    hex_literal::hex!("2c5d82f66c914bafb9701589ba8cfcfb6162b0a12acf88a8d0879a0471b5f85a"),
    hex_literal::hex!("14c54148a0940bb820957f5adf3fa1134ef5c4aaa113f4646458f270e0bfbfd0"),
    hex_literal::hex!("190d33b12f986f961e10c0ee44d8b9af11be25588cad89d416118e4bf4ebe80c"),
    hex_literal::hex!("22f98aa9ce704152ac17354914ad73ed1167ae6596af510aa5b3649325e06c92"),
    hex_literal::hex!("2a7c7c9b6ce5880b9f6f228d72bf6a575a526f29c66ecceef8b753d38bba7323"),
    hex_literal::hex!("2e8186e558698ec1c67af9c14d463ffc470043c9c2988b954d75dd643f36b992"),
    hex_literal::hex!("0f57c5571e9a4eab49e2c8cf050dae948aef6ead647392273546249d1c1ff10f"),
    hex_literal::hex!("1830ee67b5fb554ad5f63d4388800e1cfe78e310697d46e43c9ce36134f72cca"),
    hex_literal::hex!("2134e76ac5d21aab186c2be1dd8f84ee880a1e46eaf712f9d371b6df22191f3e"),
];

/// A two-to-one BN254 Poseidon hasher, with a pre-hashed zero table built
/// from [`ZERO_HASHES_20`] and extended by live hashing for any depth past
/// 20.
#[derive(Debug, Clone)]
pub struct Poseidon2Hasher {
    zeros: Vec<Node>,
}

impl Poseidon2Hasher {
    /// Build a hasher with a zero table covering tree depth `depth`.
    /// Depths up to 20 reuse the constants in [`ZERO_HASHES_20`]; deeper
    /// trees extend the table by hashing live.
    pub fn new(depth: u32) -> std::result::Result<Self, PoseidonError> {
        let known = (depth as usize + 1).min(ZERO_HASHES_20.len());
        let mut zeros: Vec<Node> = ZERO_HASHES_20[..known].to_vec();
        for i in (known - 1)..depth as usize {
            let z = zeros[i];
            zeros.push(poseidon_pair(&z, &z)?);
        }
        Ok(Self { zeros })
    }
}

fn poseidon_pair(left: &Node, right: &Node) -> std::result::Result<Node, PoseidonError> {
    let mut poseidon = Poseidon::<Fr>::new_circom(2)?;
    poseidon.hash_bytes_be(&[left, right])
}

impl Hasher for Poseidon2Hasher {
    fn parent_of(&self, left: &Node, right: &Node) -> Result<Node> {
        poseidon_pair(left, right).map_err(|e| HasherError::Other(e.to_string()).into())
    }

    fn pre_hashed_zero(&self) -> &[Node] {
        &self.zeros
    }
}
