//! Property tests over the engine's universal invariants, run against the
//! in-crate test hasher's public equivalent — `Keccak256Hasher` from the
//! sibling `hashers` crate, so these exercise the same code path a caller
//! would use.

use proptest::prelude::*;

use merkle_rollup_engine::{
    append, compute_root, merkle_proof, new_tree, roll_up, roll_up_sub_tree, split_to_sub_trees,
    starting_leaf_proof, sub_tree_root, Hasher, Node, TreeParams,
};
use merkle_rollup_hashers::Keccak256Hasher;

const DEPTH: u32 = 8;

fn hasher() -> Keccak256Hasher {
    Keccak256Hasher::new(DEPTH as usize)
}

fn params() -> TreeParams {
    TreeParams::new(DEPTH, DEPTH as usize + 1).unwrap()
}

fn arb_leaf() -> impl Strategy<Value = Node> {
    any::<[u8; 32]>()
}

fn arb_leaves(max_len: usize) -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(arb_leaf(), 0..=max_len)
}

proptest! {
    /// Sequential single-leaf appends match one batched `roll_up`.
    #[test]
    fn sequential_appends_match_batch_rollup(leaves in arb_leaves(40)) {
        let hasher = hasher();
        let p = params();
        let tree = new_tree(&hasher, &p).unwrap();
        let zeros = hasher.pre_hashed_zero().to_vec();

        let mut root = tree.root;
        let mut index = tree.index;
        let mut siblings = zeros[0..DEPTH as usize].to_vec();
        for leaf in &leaves {
            let (r, i, s) = append(&hasher, &p, index, leaf, &siblings).unwrap();
            root = r;
            index = i;
            siblings = s;
        }

        let (batch_root, batch_index) = roll_up(
            &hasher,
            &p,
            &tree.root,
            tree.index,
            &leaves,
            &zeros[0..DEPTH as usize],
        ).unwrap();

        prop_assert_eq!(root, batch_root);
        prop_assert_eq!(index, batch_index);
    }

    /// A sub-tree roll-up over a `2^d`-aligned batch matches the
    /// single-leaf roll-up of the same leaves.
    #[test]
    fn sub_tree_rollup_matches_single_leaf_rollup(sub_depth in 0u32..=3, groups in 0usize..=6) {
        let d = sub_depth;
        let hasher = hasher();
        let p = params();
        let tree = new_tree(&hasher, &p).unwrap();
        let zeros = hasher.pre_hashed_zero().to_vec();

        let group_size = 1usize << d;
        let leaves: Vec<Node> = (0..groups * group_size)
            .map(|i| {
                let mut n = [0u8; 32];
                n[31] = (i % 256) as u8;
                n
            })
            .collect();

        let (sub_root, sub_index) = roll_up_sub_tree(
            &hasher,
            &p,
            &tree.root,
            0,
            d,
            &leaves,
            &zeros[d as usize..DEPTH as usize],
        ).unwrap();

        let (single_root, single_index) = roll_up(
            &hasher,
            &p,
            &tree.root,
            0,
            &leaves,
            &zeros[0..DEPTH as usize],
        ).unwrap();

        prop_assert_eq!(sub_root, single_root);
        prop_assert_eq!(sub_index, single_index);
    }

    /// `sub_tree_root(d, leaves)` matches a direct depth-`d` Merkle
    /// root over `leaves` zero-padded to `2^d`.
    #[test]
    fn sub_tree_root_matches_zero_padded_merkle_root(
        sub_depth in 0u32..=4,
        len in 0usize..=16,
    ) {
        let d = sub_depth;
        let capacity = 1usize << d;
        prop_assume!(len <= capacity);

        let hasher = hasher();
        let leaves: Vec<Node> = (0..len)
            .map(|i| {
                let mut n = [0u8; 32];
                n[31] = (i % 256) as u8;
                n
            })
            .collect();
        let mut padded = leaves.clone();
        padded.resize(capacity, [0u8; 32]);

        let via_sub_tree_root = sub_tree_root(&hasher, d, &leaves).unwrap();

        // Direct pairwise reduction over the padded row, bottom-up.
        let mut row = padded;
        for _ in 0..d {
            let mut next = Vec::with_capacity(row.len() / 2);
            for pair in row.chunks(2) {
                next.push(hasher.parent_of(&pair[0], &pair[1]).unwrap());
            }
            row = next;
        }
        prop_assert_eq!(via_sub_tree_root, row[0]);
    }

    /// `starting_leaf_proof` accepts exactly the siblings a reference
    /// sequential simulation of `index` appends would produce.
    #[test]
    fn starting_leaf_proof_matches_reference_frontier(index in 0u64..200) {
        let hasher = hasher();
        let p = params();
        let tree = new_tree(&hasher, &p).unwrap();
        let zeros = hasher.pre_hashed_zero().to_vec();

        let mut root = tree.root;
        let mut siblings = zeros[0..DEPTH as usize].to_vec();
        for i in 0..index {
            let mut leaf = [0u8; 32];
            leaf[31] = (i % 256) as u8;
            let (r, _, s) = append(&hasher, &p, i, &leaf, &siblings).unwrap();
            root = r;
            siblings = s;
        }

        prop_assert!(starting_leaf_proof(&hasher, &root, index, &siblings).unwrap());
    }

    /// `merkle_proof(compute_root(leaf, i, S), leaf, i, S)` round-trips.
    #[test]
    fn compute_root_round_trips_through_merkle_proof(
        leaf in arb_leaf(),
        index in 0u64..256,
        siblings in prop::collection::vec(arb_leaf(), 8),
    ) {
        let hasher = hasher();
        let root = compute_root(&hasher, &leaf, index, &siblings).unwrap();
        prop_assert!(merkle_proof(&hasher, &root, &leaf, index, &siblings).unwrap());
    }

    /// Invariant I1: the pre-hashed zero table satisfies `Z[i+1] = parent_of(Z[i], Z[i])`.
    #[test]
    fn zero_table_satisfies_parent_invariant(depth in 1u32..16) {
        let hasher = Keccak256Hasher::new(depth as usize);
        let zeros = hasher.pre_hashed_zero();
        for i in 0..depth as usize {
            prop_assert_eq!(zeros[i + 1], hasher.parent_of(&zeros[i], &zeros[i]).unwrap());
        }
    }
}

#[test]
fn split_to_sub_trees_group_count_matches_ceiling_division() {
    let leaves: Vec<Node> = (0..10u8).map(|b| [b; 32]).collect();
    let groups = split_to_sub_trees(&leaves, 2);
    assert_eq!(groups.len(), 3);
    assert_eq!(groups.last().unwrap(), &vec![[8u8; 32], [9u8; 32], [0u8; 32], [0u8; 32]]);
}
