//! # Shared Fixtures
//!
//! Deterministically signed chains used by the integration flows and the
//! benchmarks.

use sc_07_block_bloom::{Block, BlockHeader, CompleteBlock, Transaction};
use shared_crypto::{merkle_root, Secp256k1KeyPair};
use shared_types::{BigUint, ChainTip, ChainUpdateNotification, Hash};

/// Delegate key that signs every fixture block.
pub fn delegate() -> Secp256k1KeyPair {
    Secp256k1KeyPair::from_bytes([0x5Au8; 32]).expect("fixed key is on the curve")
}

/// A complete block at `height` on top of `prev_hash` holding `tx_count`
/// signed transactions. Nothing is validated yet.
pub fn signed_block(
    delegate: &Secp256k1KeyPair,
    prev_hash: Hash,
    height: u64,
    tx_count: usize,
) -> CompleteBlock {
    let transactions: Vec<Transaction> = (0..tx_count)
        .map(|i| {
            let nonce = height * 1_000 + i as u64;
            Transaction::sign(nonce, 10, nonce.to_le_bytes().to_vec(), delegate)
                .expect("fixture transaction signs")
        })
        .collect();
    let leaves: Vec<Hash> = transactions.iter().map(Transaction::hash).collect();

    let header = BlockHeader {
        version: 1,
        height,
        prev_hash,
        prev_kernel_hash: [0u8; 32],
        timestamp: 1_700_000_000 + height,
        merkle_hash: merkle_root(&leaves),
        staking_amount: 50_000,
    };
    let block = Block::sign(header, delegate).expect("fixture header signs");
    CompleteBlock::new(block, transactions)
}

/// `len` linked blocks above `ancestor`, newest first.
pub fn signed_chain(
    delegate: &Secp256k1KeyPair,
    ancestor: Hash,
    first_height: u64,
    len: usize,
    tx_count: usize,
) -> Vec<CompleteBlock> {
    let mut prev_hash = ancestor;
    let mut blocks = Vec::with_capacity(len);
    for n in 0..len as u64 {
        let block = signed_block(delegate, prev_hash, first_height + n, tx_count);
        prev_hash = block.hash();
        blocks.push(block);
    }
    blocks.reverse();
    blocks
}

pub fn tip(hash: Hash, height: u64, difficulty: u64) -> ChainTip {
    ChainTip {
        hash,
        prev_hash: [0u8; 32],
        cumulative_difficulty: BigUint::from(difficulty),
        height,
    }
}

pub fn announce(block: &CompleteBlock, difficulty: u64) -> ChainUpdateNotification {
    ChainUpdateNotification {
        hash: block.hash().to_vec(),
        prev_hash: block.prev_hash().to_vec(),
        height: block.height(),
        cumulative_difficulty: BigUint::from(difficulty),
    }
}
