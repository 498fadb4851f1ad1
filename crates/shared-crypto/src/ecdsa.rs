//! # ECDSA Signatures (secp256k1, recoverable)
//!
//! Blocks and transactions carry a 65-byte `r || s || v` signature and no
//! public key. The signer is recovered from the signature and then the
//! signature is verified against the recovered key.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization on signing; high-S signatures fail verification
//! - Exported secret key bytes are zeroized when dropped

use crate::hashing::keccak256;
use crate::CryptoError;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use shared_types::{Hash, PublicKeyHash, PUBLIC_KEY_HASH_SIZE, SIGNATURE_SIZE};
use zeroize::Zeroizing;

/// Compressed secp256k1 public key (33 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1PublicKey([u8; 33]);

impl Secp256k1PublicKey {
    /// Create from compressed bytes (33 bytes, starting with 0x02 or 0x03).
    pub fn from_bytes(bytes: [u8; 33]) -> Result<Self, CryptoError> {
        VerifyingKey::from_sec1_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    fn from_verifying_key(key: &VerifyingKey) -> Result<Self, CryptoError> {
        let encoded = key.to_encoded_point(true);
        let bytes: [u8; 33] = encoded
            .as_bytes()
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Get raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Verify a signature over a 32-byte digest.
    pub fn verify_prehash(
        &self,
        digest: &Hash,
        signature: &RecoverableSignature,
    ) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;
        let (sig, _) = signature.split()?;

        verifying_key
            .verify_prehash(digest, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }

    /// Derive the 20-byte public-key hash (last 20 bytes of Keccak-256).
    pub fn to_public_key_hash(&self) -> PublicKeyHash {
        let hash = keccak256(&self.0);
        let mut out = [0u8; PUBLIC_KEY_HASH_SIZE];
        out.copy_from_slice(&hash[hash.len() - PUBLIC_KEY_HASH_SIZE..]);
        out
    }
}

/// Recoverable ECDSA signature (65 bytes, `r || s || v`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature([u8; SIGNATURE_SIZE]);

impl RecoverableSignature {
    /// Create from bytes (65 bytes).
    pub fn from_bytes(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    /// Split into the k256 signature and recovery id.
    ///
    /// Accepts `v` as `0..=3` or in the Ethereum-style `27..=30` range.
    fn split(&self) -> Result<(Signature, RecoveryId), CryptoError> {
        let sig =
            Signature::from_slice(&self.0[..64]).map_err(|_| CryptoError::InvalidSignatureFormat)?;
        let v = self.0[64];
        let normalized = if v >= 27 { v - 27 } else { v };
        let recovery_id =
            RecoveryId::from_byte(normalized).ok_or(CryptoError::InvalidRecoveryId(v))?;
        Ok((sig, recovery_id))
    }
}

/// Recover the signer's public key from a signature over `digest`.
pub fn recover_public_key(
    digest: &Hash,
    signature: &RecoverableSignature,
) -> Result<Secp256k1PublicKey, CryptoError> {
    let (sig, recovery_id) = signature.split()?;
    let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Secp256k1PublicKey::from_verifying_key(&key)
}

/// Verify `signature` over `digest` against `public_key`.
pub fn verify_signature(
    public_key: &Secp256k1PublicKey,
    digest: &Hash,
    signature: &RecoverableSignature,
) -> bool {
    public_key.verify_prehash(digest, signature).is_ok()
}

/// secp256k1 ECDSA keypair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Get public key (compressed, 33 bytes).
    pub fn public_key(&self) -> Result<Secp256k1PublicKey, CryptoError> {
        Secp256k1PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte digest, producing `r || s || v`.
    pub fn sign_prehash(&self, digest: &Hash) -> Result<RecoverableSignature, CryptoError> {
        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[..64].copy_from_slice(&sig.to_bytes());
        bytes[64] = recovery_id.to_byte();
        Ok(RecoverableSignature(bytes))
    }

    /// Secret key bytes, wiped when the returned buffer is dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes().into())
    }
}
