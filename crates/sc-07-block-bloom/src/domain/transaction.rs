//! Transaction entity and its validity cache

use super::validity::ValidityCell;
use crate::error::ValidationError;
use crate::metrics;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_crypto::{
    recover_public_key, verify_signature, CryptoError, RecoverableSignature, Secp256k1KeyPair,
    Sha3Hasher,
};
use shared_types::{Hash, PublicKeyHash, Signature};

/// Facts memoized by [`Transaction::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionValidity {
    pub hash: Hash,
    pub signer_public_key_hash: PublicKeyHash,
}

/// A signed transaction carried in a complete block.
///
/// The signer is not stored; it is recovered from `signature`.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    nonce: u64,
    fee: u64,
    payload: Vec<u8>,
    #[serde_as(as = "Bytes")]
    signature: Signature,
    #[serde(skip)]
    validity: ValidityCell<TransactionValidity>,
}

impl Transaction {
    pub fn new(nonce: u64, fee: u64, payload: Vec<u8>, signature: Signature) -> Self {
        Self {
            nonce,
            fee,
            payload,
            signature,
            validity: ValidityCell::new(),
        }
    }

    /// Build and sign a transaction with `keypair`.
    pub fn sign(
        nonce: u64,
        fee: u64,
        payload: Vec<u8>,
        keypair: &Secp256k1KeyPair,
    ) -> Result<Self, CryptoError> {
        let mut tx = Self::new(nonce, fee, payload, [0u8; 65]);
        tx.signature = *keypair.sign_prehash(&tx.signing_digest())?.as_bytes();
        Ok(tx)
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    fn write_fields(&self, hasher: &mut Sha3Hasher) {
        hasher
            .update(self.nonce.to_le_bytes())
            .update(self.fee.to_le_bytes())
            .update((self.payload.len() as u64).to_le_bytes())
            .update(&self.payload);
    }

    /// Digest the signer signs.
    pub fn signing_digest(&self) -> Hash {
        let mut hasher = Sha3Hasher::new();
        self.write_fields(&mut hasher);
        hasher.finalize()
    }

    fn compute_hash(&self) -> Hash {
        let mut hasher = Sha3Hasher::new();
        self.write_fields(&mut hasher);
        hasher.update(self.signature);
        hasher.finalize()
    }

    /// Content hash (fields followed by signature). Served from the cache
    /// when the transaction has been validated.
    pub fn hash(&self) -> Hash {
        match self.validity.get() {
            Some(validity) => validity.hash,
            None => self.compute_hash(),
        }
    }

    pub fn validity(&self) -> Option<&TransactionValidity> {
        self.validity.get()
    }

    /// Recover the signer and verify the signature, caching the result.
    ///
    /// Fails with [`ValidationError::SignatureInvalid`] and caches nothing
    /// when recovery or verification fails.
    pub fn validate(&self) -> Result<&TransactionValidity, ValidationError> {
        self.validity.get_or_try_init(|| {
            let digest = self.signing_digest();
            let signature = RecoverableSignature::from_bytes(self.signature);

            let signer = recover_public_key(&digest, &signature).map_err(|e| {
                metrics::record_validation_failed("transaction", "signature_invalid");
                ValidationError::SignatureInvalid(e)
            })?;

            if !verify_signature(&signer, &digest, &signature) {
                metrics::record_validation_failed("transaction", "signature_invalid");
                return Err(ValidationError::SignatureInvalid(
                    CryptoError::SignatureVerificationFailed,
                ));
            }

            metrics::record_validated("transaction");
            Ok(TransactionValidity {
                hash: self.compute_hash(),
                signer_public_key_hash: signer.to_public_key_hash(),
            })
        })
    }
}
