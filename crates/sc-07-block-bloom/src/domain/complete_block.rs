//! Complete block (header + transactions) and its two-phase validity cache
//!
//! ## Phases
//!
//! 1. **Size**: canonical bincode bytes of the whole block, plus their length.
//! 2. **Merkle**: merkle root over transaction hashes, compared byte-for-byte
//!    with `header.merkle_hash`.
//!
//! Each phase has its own `*_computed` flag. A phase whose flag is set is
//! never re-run. The size phase only sets its flag once bytes are stored, so
//! a serialization failure is retried. The merkle phase sets its flag even
//! on mismatch: a block with a bad root stays bad and must be re-fetched.

use super::block::Block;
use super::config::BloomConfig;
use super::transaction::Transaction;
use bincode::Options;
use crate::error::ValidationError;
use crate::metrics;
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shared_crypto::merkle_root;
use shared_types::{short_hex, Hash};

/// Phase state of a complete block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompleteBlockValidity {
    pub serialized: Vec<u8>,
    pub size: usize,
    pub size_computed: bool,
    pub computed_merkle_root: Option<Hash>,
    pub merkle_verified: bool,
    pub merkle_computed: bool,
}

/// A block together with its ordered transactions.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteBlock {
    block: Block,
    transactions: Vec<Transaction>,
    #[serde(skip)]
    validity: Mutex<CompleteBlockValidity>,
}

impl Clone for CompleteBlock {
    fn clone(&self) -> Self {
        Self {
            block: self.block.clone(),
            transactions: self.transactions.clone(),
            validity: Mutex::new(self.validity.lock().clone()),
        }
    }
}

impl CompleteBlock {
    pub fn new(block: Block, transactions: Vec<Transaction>) -> Self {
        Self {
            block,
            transactions,
            validity: Mutex::new(CompleteBlockValidity::default()),
        }
    }

    /// Decode a complete block received from a peer.
    ///
    /// Decoding accepts only the canonical form: fixed-width integers, no
    /// trailing bytes, at most `max_block_size` bytes. The received bytes
    /// then seed the size phase, so they are never re-serialized. The
    /// merkle phase still has to run.
    pub fn from_serialized(bytes: &[u8], config: &BloomConfig) -> Result<Self, ValidationError> {
        let complete: CompleteBlock = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .reject_trailing_bytes()
            .with_limit(config.max_block_size)
            .deserialize(bytes)?;
        complete.check_structure(config)?;

        {
            let mut validity = complete.validity.lock();
            validity.serialized = bytes.to_vec();
            validity.size = bytes.len();
            validity.size_computed = true;
        }

        Ok(complete)
    }

    /// Canonical byte form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ValidationError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Block hash (header content hash).
    pub fn hash(&self) -> Hash {
        self.block.hash()
    }

    pub fn height(&self) -> u64 {
        self.block.header().height
    }

    pub fn prev_hash(&self) -> Hash {
        self.block.header().prev_hash
    }

    /// Swap the transaction at `index`. Phase state is reset.
    pub fn replace_transaction(&mut self, index: usize, tx: Transaction) -> Option<Transaction> {
        let slot = self.transactions.get_mut(index)?;
        let old = std::mem::replace(slot, tx);
        *self.validity.get_mut() = CompleteBlockValidity::default();
        Some(old)
    }

    /// Merkle root over the current transaction hashes.
    pub fn merkle_root(&self) -> Hash {
        let leaves: Vec<Hash> = self.transactions.iter().map(Transaction::hash).collect();
        merkle_root(&leaves)
    }

    /// Snapshot of the phase state.
    pub fn validity(&self) -> CompleteBlockValidity {
        self.validity.lock().clone()
    }

    fn check_structure(&self, config: &BloomConfig) -> Result<(), ValidationError> {
        if self.transactions.is_empty() {
            return Err(ValidationError::StructurallyInvalid(
                "block carries no transactions".to_string(),
            ));
        }

        if self.transactions.len() > config.max_transactions {
            return Err(ValidationError::StructurallyInvalid(format!(
                "{} transactions exceeds limit {}",
                self.transactions.len(),
                config.max_transactions
            )));
        }

        Ok(())
    }

    /// Run whichever phases have not completed yet.
    ///
    /// Concurrent callers are serialized on the phase lock, so each phase
    /// runs at most once to completion.
    pub fn validate_complete(&self, config: &BloomConfig) -> Result<(), ValidationError> {
        if let Err(e) = self.check_structure(config) {
            metrics::record_validation_failed("complete_block", e.reason());
            return Err(e);
        }

        let mut validity = self.validity.lock();

        if !validity.size_computed {
            let serialized = bincode::serialize(self).map_err(|e| {
                metrics::record_validation_failed("complete_block", "serialization");
                ValidationError::from(e)
            })?;
            validity.size = serialized.len();
            validity.serialized = serialized;
            validity.size_computed = true;
        }

        if !validity.merkle_computed {
            let computed = self.merkle_root();
            validity.computed_merkle_root = Some(computed);
            validity.merkle_verified = computed == self.block.header().merkle_hash;
            validity.merkle_computed = true;

            if !validity.merkle_verified {
                tracing::warn!(
                    height = self.height(),
                    expected = %short_hex(&self.block.header().merkle_hash),
                    computed = %short_hex(&computed),
                    "merkle root mismatch"
                );
                metrics::record_validation_failed("complete_block", "merkle_mismatch");
            } else {
                metrics::record_validated("complete_block");
            }
        }

        if !validity.merkle_verified {
            return Err(ValidationError::MerkleMismatch {
                expected: hex::encode(self.block.header().merkle_hash),
                computed: validity
                    .computed_merkle_root
                    .map(hex::encode)
                    .unwrap_or_default(),
            });
        }

        Ok(())
    }

    /// Validate every transaction, then the header, then this block.
    ///
    /// Transactions are checked in parallel. The first failure is returned.
    pub fn validate_all(&self, config: &BloomConfig) -> Result<(), ValidationError> {
        self.check_structure(config)?;

        self.transactions
            .par_iter()
            .try_for_each(|tx| tx.validate().map(|_| ()))?;

        self.block.validate()?;
        self.validate_complete(config)
    }

    /// Gate used before a block enters a fork buffer.
    pub fn verify_is_valid(&self) -> Result<(), ValidationError> {
        if self.block.validity().is_none() {
            return Err(ValidationError::NotValidated("header not validated"));
        }

        let validity = self.validity.lock();
        if !validity.size_computed || !validity.merkle_computed {
            return Err(ValidationError::NotValidated("phases not run"));
        }
        if validity.serialized.is_empty() || validity.size == 0 {
            return Err(ValidationError::NotValidated("serialized bytes missing"));
        }
        if !validity.merkle_verified {
            return Err(ValidationError::NotValidated("merkle root mismatch"));
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.verify_is_valid().is_ok()
    }
}
