//! # Core Domain Entities
//!
//! Fixed-width primitives used across the bloom and consensus crates.

pub use num_bigint::BigUint;

/// Length in bytes of every block, kernel and transaction hash.
pub const HASH_SIZE: usize = 32;

/// Length in bytes of a public-key hash (delegate / signer identity).
pub const PUBLIC_KEY_HASH_SIZE: usize = 20;

/// Length in bytes of a recoverable secp256k1 signature (`r || s || v`).
pub const SIGNATURE_SIZE: usize = 65;

/// A 32-byte SHA3 hash.
pub type Hash = [u8; HASH_SIZE];

/// The all-zero hash. Used as the parent of a genesis block.
pub const ZERO_HASH: Hash = [0u8; HASH_SIZE];

/// A 20-byte hash of a compressed public key.
pub type PublicKeyHash = [u8; PUBLIC_KEY_HASH_SIZE];

/// A 65-byte recoverable ECDSA signature.
pub type Signature = [u8; SIGNATURE_SIZE];

/// Running total of per-block difficulty along a chain.
///
/// Used as the fork-choice weight. Grows monotonically for the life of the
/// chain, so it is never truncated to a machine word.
pub type CumulativeDifficulty = BigUint;

/// Convert a wire byte string into a [`Hash`].
///
/// Returns `None` when the slice is not exactly [`HASH_SIZE`] bytes long.
pub fn hash_from_slice(bytes: &[u8]) -> Option<Hash> {
    bytes.try_into().ok()
}

/// Abbreviated hex of a hash for log fields (first 8 bytes).
pub fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..8])
}
