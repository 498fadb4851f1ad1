//! # SHA3 Hashing
//!
//! SHA3-256 for content, kernel and merkle hashes; Keccak-256 for public-key
//! hashes.

use sha3::{Digest, Keccak256, Sha3_256};
use shared_types::Hash;

/// Stateful SHA3-256 hasher for building hash preimages field by field.
pub struct Sha3Hasher {
    inner: Sha3_256,
}

impl Sha3Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha3_256::new(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        self.inner.update(data.as_ref());
        self
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> Hash {
        self.inner.finalize().into()
    }
}

impl Default for Sha3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash data with SHA3-256 (one-shot).
pub fn sha3_256(data: &[u8]) -> Hash {
    Sha3_256::digest(data).into()
}

/// Hash data with Keccak-256 (one-shot).
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}
