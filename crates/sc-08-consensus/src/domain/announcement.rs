//! Validated chain-update announcement

use super::error::ProtocolError;
use shared_types::{hash_from_slice, ChainUpdateNotification, CumulativeDifficulty, Hash, HASH_SIZE};

/// A chain-update notification whose hashes have the fixed width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    pub hash: Hash,
    pub prev_hash: Hash,
    pub height: u64,
    pub cumulative_difficulty: CumulativeDifficulty,
}

impl TryFrom<ChainUpdateNotification> for Announcement {
    type Error = ProtocolError;

    fn try_from(notification: ChainUpdateNotification) -> Result<Self, Self::Error> {
        let hash =
            hash_from_slice(&notification.hash).ok_or(ProtocolError::InvalidHashLength {
                expected: HASH_SIZE,
                actual: notification.hash.len(),
            })?;

        let prev_hash = hash_from_slice(&notification.prev_hash).ok_or(
            ProtocolError::InvalidPrevHashLength {
                expected: HASH_SIZE,
                actual: notification.prev_hash.len(),
            },
        )?;

        Ok(Self {
            hash,
            prev_hash,
            height: notification.height,
            cumulative_difficulty: notification.cumulative_difficulty,
        })
    }
}
