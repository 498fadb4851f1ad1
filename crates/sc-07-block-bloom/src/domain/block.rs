//! Block entity and its validity cache

use super::validity::ValidityCell;
use crate::error::ValidationError;
use crate::metrics;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_crypto::{
    recover_public_key, verify_signature, CryptoError, RecoverableSignature, Secp256k1KeyPair,
    Sha3Hasher,
};
use shared_types::{short_hex, Hash, PublicKeyHash, Signature};

/// Signed block header fields.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u16,
    pub height: u64,
    pub prev_hash: Hash,
    pub prev_kernel_hash: Hash,
    pub timestamp: u64,
    /// Merkle root over the block's transaction hashes
    pub merkle_hash: Hash,
    pub staking_amount: u64,
}

impl BlockHeader {
    fn write_fields(&self, hasher: &mut Sha3Hasher) {
        hasher
            .update(self.version.to_le_bytes())
            .update(self.height.to_le_bytes())
            .update(self.prev_hash)
            .update(self.prev_kernel_hash)
            .update(self.timestamp.to_le_bytes())
            .update(self.merkle_hash)
            .update(self.staking_amount.to_le_bytes());
    }

    /// Digest the delegate signs.
    pub fn signing_digest(&self) -> Hash {
        let mut hasher = Sha3Hasher::new();
        self.write_fields(&mut hasher);
        hasher.finalize()
    }

    /// Kernel hash used for stake eligibility.
    ///
    /// Covers only `height || prev_kernel_hash || timestamp || staking_amount`
    /// so it cannot be ground by reordering transactions.
    pub fn kernel_hash(&self) -> Hash {
        let mut hasher = Sha3Hasher::new();
        hasher
            .update(self.height.to_le_bytes())
            .update(self.prev_kernel_hash)
            .update(self.timestamp.to_le_bytes())
            .update(self.staking_amount.to_le_bytes());
        hasher.finalize()
    }

    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }
}

/// Facts memoized by [`Block::validate`].
///
/// A record only exists once the delegate signature verified, so
/// `delegate_signature_verified` is always `true` on a stored record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockValidity {
    pub hash: Hash,
    pub kernel_hash: Hash,
    pub delegate_public_key_hash: PublicKeyHash,
    pub delegate_signature_verified: bool,
}

/// A signed block header.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    header: BlockHeader,
    #[serde_as(as = "Bytes")]
    signature: Signature,
    #[serde(skip)]
    validity: ValidityCell<BlockValidity>,
}

impl Block {
    pub fn new(header: BlockHeader, signature: Signature) -> Self {
        Self {
            header,
            signature,
            validity: ValidityCell::new(),
        }
    }

    /// Sign `header` as the delegate holding `keypair`.
    pub fn sign(header: BlockHeader, keypair: &Secp256k1KeyPair) -> Result<Self, CryptoError> {
        let signature = keypair.sign_prehash(&header.signing_digest())?;
        Ok(Self::new(header, *signature.as_bytes()))
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Replace the signature. Any cached record is dropped with it.
    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = signature;
        self.validity = ValidityCell::new();
    }

    fn compute_hash(&self) -> Hash {
        let mut hasher = Sha3Hasher::new();
        self.header.write_fields(&mut hasher);
        hasher.update(self.signature);
        hasher.finalize()
    }

    /// Content hash (header followed by signature). Served from the cache
    /// when the block has been validated.
    pub fn hash(&self) -> Hash {
        match self.validity.get() {
            Some(validity) => validity.hash,
            None => self.compute_hash(),
        }
    }

    /// Cached record, present only after a successful [`Block::validate`].
    pub fn validity(&self) -> Option<&BlockValidity> {
        self.validity.get()
    }

    /// Compute and cache hash, kernel hash and delegate identity.
    ///
    /// Returns the cached record immediately if one exists. Otherwise
    /// recovers the delegate key from the signature and verifies it; on
    /// failure nothing is cached and a later call starts over.
    pub fn validate(&self) -> Result<&BlockValidity, ValidationError> {
        self.validity.get_or_try_init(|| {
            let digest = self.header.signing_digest();
            let signature = RecoverableSignature::from_bytes(self.signature);

            let delegate = recover_public_key(&digest, &signature).map_err(|e| {
                tracing::debug!(
                    height = self.header.height,
                    error = %e,
                    "delegate recovery failed"
                );
                metrics::record_validation_failed("block", "signature_invalid");
                ValidationError::SignatureInvalid(e)
            })?;

            if !verify_signature(&delegate, &digest, &signature) {
                tracing::debug!(height = self.header.height, "delegate signature rejected");
                metrics::record_validation_failed("block", "signature_invalid");
                return Err(ValidationError::SignatureInvalid(
                    CryptoError::SignatureVerificationFailed,
                ));
            }

            let hash = self.compute_hash();
            tracing::trace!(
                block = %short_hex(&hash),
                height = self.header.height,
                "block validated"
            );
            metrics::record_validated("block");

            Ok(BlockValidity {
                hash,
                kernel_hash: self.header.kernel_hash(),
                delegate_public_key_hash: delegate.to_public_key_hash(),
                delegate_signature_verified: true,
            })
        })
    }
}
