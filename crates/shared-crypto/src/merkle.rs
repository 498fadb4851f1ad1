//! # Transaction Merkle Root
//!
//! Binary hash tree where each non-leaf node is `SHA3(left || right)`.
//!
//! - Leaves are padded to the next power of two with [`SENTINEL_HASH`]
//!   (a single leaf is padded to two).
//! - An empty leaf set has root [`SENTINEL_HASH`].
//! - Same leaves in the same order always produce the same root.

use crate::hashing::Sha3Hasher;
use shared_types::Hash;

/// Sentinel hash used for padding leaves (all zeros).
pub const SENTINEL_HASH: Hash = [0u8; 32];

/// Compute the merkle root over an ordered list of leaf hashes.
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return SENTINEL_HASH;
    }

    let padded = if leaves.len() == 1 {
        2
    } else {
        leaves.len().next_power_of_two()
    };

    let mut level: Vec<Hash> = Vec::with_capacity(padded);
    level.extend_from_slice(leaves);
    level.resize(padded, SENTINEL_HASH);

    while level.len() > 1 {
        level = level
            .chunks_exact(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
    }

    level[0]
}

/// Hash two sibling nodes.
fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha3Hasher::new();
    hasher.update(left).update(right);
    hasher.finalize()
}
