//! # Shared Crypto - Cryptographic Primitives
//!
//! Pure functions consumed by the validity caches. Nothing in this crate
//! caches or holds state.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA3-256, Keccak-256 | Content / kernel hashes, key hashes |
//! | `ecdsa` | secp256k1 (recoverable) | Delegate and transaction signatures |
//! | `merkle` | Binary SHA3 tree | Transaction merkle root |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, low-S normalization on
//!   signing, high-S rejected on verification
//! - **Recovery**: the signer is recovered from `r || s || v`, so blocks and
//!   transactions never carry a public key

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod merkle;

// Re-exports
pub use ecdsa::{
    recover_public_key, verify_signature, RecoverableSignature, Secp256k1KeyPair,
    Secp256k1PublicKey,
};
pub use errors::CryptoError;
pub use hashing::{keccak256, sha3_256, Sha3Hasher};
pub use merkle::{merkle_root, SENTINEL_HASH};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
