//! # Chain Tip and Chain-Update Notification
//!
//! [`ChainTip`] is the read-only snapshot the canonical Chain hands out.
//! [`ChainUpdateNotification`] is the gossip message a node sends to announce
//! its best-known tip, and receives from peers announcing theirs.

use crate::entities::{CumulativeDifficulty, Hash};
use serde::{Deserialize, Serialize};

/// Topic name chain-update notifications are sent under.
pub const CHAIN_UPDATE_TOPIC: &str = "chain-update";

/// Point-in-time snapshot of the canonical chain tip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainTip {
    pub hash: Hash,
    pub prev_hash: Hash,
    pub cumulative_difficulty: CumulativeDifficulty,
    pub height: u64,
}

impl ChainTip {
    /// Build the notification announcing this tip to a peer.
    pub fn to_notification(&self) -> ChainUpdateNotification {
        ChainUpdateNotification {
            hash: self.hash.to_vec(),
            prev_hash: self.prev_hash.to_vec(),
            height: self.height,
            cumulative_difficulty: self.cumulative_difficulty.clone(),
        }
    }
}

/// Wire message announcing a chain tip.
///
/// Hash fields are variable length on the wire; the receiver is responsible
/// for rejecting anything that is not exactly `HASH_SIZE` bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainUpdateNotification {
    #[serde(with = "crate::serde_helpers::hex_bytes")]
    pub hash: Vec<u8>,
    #[serde(with = "crate::serde_helpers::hex_bytes")]
    pub prev_hash: Vec<u8>,
    pub height: u64,
    #[serde(with = "crate::serde_helpers::decimal")]
    pub cumulative_difficulty: CumulativeDifficulty,
}
