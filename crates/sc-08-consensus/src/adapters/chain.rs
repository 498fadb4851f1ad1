//! In-memory chain adapter
//!
//! Implements the ChainProvider port without a storage engine. Used by
//! tests and embedders that keep the canonical chain elsewhere.

use crate::domain::Fork;
use crate::ports::ChainProvider;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{ChainTip, Hash, StorageError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub struct InMemoryChain {
    tip: RwLock<ChainTip>,
    blocks: RwLock<HashSet<Hash>>,
    failing: AtomicBool,
    tip_reads: AtomicU64,
}

impl InMemoryChain {
    pub fn new(tip: ChainTip) -> Self {
        let mut blocks = HashSet::new();
        blocks.insert(tip.hash);
        Self {
            tip: RwLock::new(tip),
            blocks: RwLock::new(blocks),
            failing: AtomicBool::new(false),
            tip_reads: AtomicU64::new(0),
        }
    }

    /// Replace the tip. The tip hash becomes a known block.
    pub fn set_tip(&self, tip: ChainTip) {
        self.blocks.write().insert(tip.hash);
        *self.tip.write() = tip;
    }

    pub fn insert_block(&self, hash: Hash) {
        self.blocks.write().insert(hash);
    }

    /// Make every read fail with `StorageError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `tip()` reads.
    pub fn tip_reads(&self) -> u64 {
        self.tip_reads.load(Ordering::SeqCst)
    }

    pub fn current_tip(&self) -> ChainTip {
        self.tip.read().clone()
    }

    /// Adopt a promoted fork: record its blocks and move the tip to it.
    pub fn adopt(&self, fork: &Fork) {
        {
            let mut blocks = self.blocks.write();
            for block in fork.blocks_ascending() {
                blocks.insert(block.hash());
            }
        }
        self.set_tip(ChainTip {
            hash: fork.hash(),
            prev_hash: fork.prev_hash(),
            cumulative_difficulty: fork.cumulative_difficulty().clone(),
            height: fork.height(),
        });
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "in-memory chain set to fail".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainProvider for InMemoryChain {
    async fn tip(&self) -> Result<ChainTip, StorageError> {
        self.check_available()?;
        self.tip_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.tip.read().clone())
    }

    async fn contains_block(&self, hash: &Hash) -> Result<bool, StorageError> {
        self.check_available()?;
        Ok(self.blocks.read().contains(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::BigUint;

    fn tip(byte: u8, difficulty: u32) -> ChainTip {
        ChainTip {
            hash: [byte; 32],
            prev_hash: [0u8; 32],
            cumulative_difficulty: BigUint::from(difficulty),
            height: byte as u64,
        }
    }

    #[tokio::test]
    async fn test_tip_and_contains() {
        let chain = InMemoryChain::new(tip(1, 100));

        assert_eq!(chain.tip().await.unwrap(), tip(1, 100));
        assert!(chain.contains_block(&[1u8; 32]).await.unwrap());
        assert!(!chain.contains_block(&[2u8; 32]).await.unwrap());

        chain.set_tip(tip(2, 200));
        assert_eq!(chain.tip().await.unwrap().hash, [2u8; 32]);
        assert!(chain.contains_block(&[1u8; 32]).await.unwrap());
        assert_eq!(chain.tip_reads(), 2);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let chain = InMemoryChain::new(tip(1, 100));
        chain.set_failing(true);

        assert!(matches!(chain.tip().await, Err(StorageError::Unavailable(_))));
        assert!(chain.contains_block(&[1u8; 32]).await.is_err());

        chain.set_failing(false);
        assert!(chain.tip().await.is_ok());
    }
}
