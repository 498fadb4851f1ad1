//! Fixtures shared by unit tests.

use crate::domain::Announcement;
use sc_07_block_bloom::{Block, BlockHeader, BloomConfig, CompleteBlock, Transaction};
use shared_crypto::{merkle_root, Secp256k1KeyPair};
use shared_types::{BigUint, ChainTip, ChainUpdateNotification, Hash};
use std::sync::Arc;

/// Parent of the oldest block built by [`fork_chain`].
pub const FORK_ANCESTOR: Hash = [0xAA; 32];

pub fn tip(hash: Hash, difficulty: u64) -> ChainTip {
    ChainTip {
        hash,
        prev_hash: [0u8; 32],
        cumulative_difficulty: BigUint::from(difficulty),
        height: 100,
    }
}

pub fn notification(hash: Hash, difficulty: u64) -> ChainUpdateNotification {
    ChainUpdateNotification {
        hash: hash.to_vec(),
        prev_hash: vec![0u8; 32],
        height: 101,
        cumulative_difficulty: BigUint::from(difficulty),
    }
}

pub fn announcement_for(hash: Hash, difficulty: u64) -> Announcement {
    Announcement {
        hash,
        prev_hash: [0u8; 32],
        height: 101,
        cumulative_difficulty: BigUint::from(difficulty),
    }
}

fn build_chain(len: u64, validate: bool) -> Vec<Arc<CompleteBlock>> {
    let delegate = Secp256k1KeyPair::from_bytes([0x31u8; 32]).unwrap();
    let mut prev_hash = FORK_ANCESTOR;
    let mut blocks = Vec::new();

    for n in 0..len {
        let tx = Transaction::sign(n, 1, vec![n as u8; 8], &delegate).unwrap();
        let header = BlockHeader {
            version: 1,
            height: 100 + n,
            prev_hash,
            prev_kernel_hash: [0u8; 32],
            timestamp: 1_700_000_000 + n,
            merkle_hash: merkle_root(&[tx.hash()]),
            staking_amount: 1_000,
        };
        let complete = CompleteBlock::new(Block::sign(header, &delegate).unwrap(), vec![tx]);
        if validate {
            complete.validate_all(&BloomConfig::default()).unwrap();
        }
        prev_hash = complete.hash();
        blocks.push(Arc::new(complete));
    }

    blocks.reverse();
    blocks
}

/// Validated blocks of one fork, newest first.
pub fn fork_chain(len: u64) -> Vec<Arc<CompleteBlock>> {
    build_chain(len, true)
}

/// Same shape as [`fork_chain`] but never validated.
pub fn unvalidated_chain(len: u64) -> Vec<Arc<CompleteBlock>> {
    build_chain(len, false)
}
