//! Fork entity
//!
//! A candidate chain tip that is heavier than ours but not yet adopted.
//!
//! ## Lifecycle
//!
//! ```text
//! Announced ──append_block──→ Downloading ──mark_initialized──→ Validated
//!     │                            │                               │
//!     └──── evicted (Expired) ─────┘                    promoted / rejected
//! ```
//!
//! ## Block buffer
//!
//! Blocks arrive newest first, walking back from the fork tip. Slot 0 must
//! hash to the fork hash and every later slot must hash to the previous
//! slot's `prev_hash`. The buffer reaches a known ancestor once the Chain
//! holds the last slot's `prev_hash`.
//!
//! Connections are held weakly: a fork never keeps a peer connection alive,
//! and a dropped connection silently leaves the set.

use super::announcement::Announcement;
use super::config::ForkChoiceConfig;
use super::error::ForkError;
use crate::ports::{ConnectionId, PeerConnection};
use parking_lot::RwLock;
use sc_07_block_bloom::CompleteBlock;
use shared_types::{short_hex, CumulativeDifficulty, Hash};
use std::sync::{Arc, Weak};
use tokio::time::Instant;

/// Where a fork is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ForkState {
    Announced,
    Downloading,
    Validated,
}

impl ForkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForkState::Announced => "announced",
            ForkState::Downloading => "downloading",
            ForkState::Validated => "validated",
        }
    }
}

struct ForkInner {
    initialized: bool,
    blocks: Vec<Arc<CompleteBlock>>,
    connections: Vec<(ConnectionId, Weak<dyn PeerConnection>)>,
    last_announced_at: Instant,
    last_progress_at: Instant,
}

/// A candidate chain tip and the evidence gathered for it.
///
/// Claimed metadata is fixed at creation; later announcements of the same
/// hash only add connections.
pub struct Fork {
    hash: Hash,
    prev_hash: Hash,
    height: u64,
    cumulative_difficulty: CumulativeDifficulty,
    created_at: Instant,
    inner: RwLock<ForkInner>,
}

impl Fork {
    /// New fork in the `Announced` state, vouched for by `origin`.
    pub fn new(announcement: Announcement, origin: &Arc<dyn PeerConnection>) -> Self {
        let now = Instant::now();
        Self {
            hash: announcement.hash,
            prev_hash: announcement.prev_hash,
            height: announcement.height,
            cumulative_difficulty: announcement.cumulative_difficulty,
            created_at: now,
            inner: RwLock::new(ForkInner {
                initialized: false,
                blocks: Vec::new(),
                connections: vec![(origin.id(), Arc::downgrade(origin))],
                last_announced_at: now,
                last_progress_at: now,
            }),
        }
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn prev_hash(&self) -> Hash {
        self.prev_hash
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn cumulative_difficulty(&self) -> &CumulativeDifficulty {
        &self.cumulative_difficulty
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn last_announced_at(&self) -> Instant {
        self.inner.read().last_announced_at
    }

    pub fn last_progress_at(&self) -> Instant {
        self.inner.read().last_progress_at
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.read().initialized
    }

    pub fn state(&self) -> ForkState {
        let inner = self.inner.read();
        if inner.initialized {
            ForkState::Validated
        } else if inner.blocks.is_empty() {
            ForkState::Announced
        } else {
            ForkState::Downloading
        }
    }

    /// Add `conn` to the vouching set. Duplicate ids are ignored.
    ///
    /// `already_known` marks a re-announcement of a registered fork and
    /// refreshes the idle timer. Returns `true` if `conn` was new.
    pub fn add_connection(&self, conn: &Arc<dyn PeerConnection>, already_known: bool) -> bool {
        let id = conn.id();
        let mut inner = self.inner.write();

        if already_known {
            inner.last_announced_at = Instant::now();
        }

        inner.connections.retain(|(_, weak)| weak.strong_count() > 0);
        if inner.connections.iter().any(|(existing, _)| *existing == id) {
            return false;
        }

        inner.connections.push((id, Arc::downgrade(conn)));
        tracing::debug!(fork = %short_hex(&self.hash), conn = %id, "connection attached to fork");
        true
    }

    /// Live connections vouching for this fork.
    pub fn connections(&self) -> Vec<Arc<dyn PeerConnection>> {
        self.inner
            .read()
            .connections
            .iter()
            .filter_map(|(_, weak)| weak.upgrade())
            .collect()
    }

    /// Ids of live vouching connections, in attach order.
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.inner
            .read()
            .connections
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connection_ids().len()
    }

    pub fn block_count(&self) -> usize {
        self.inner.read().blocks.len()
    }

    /// Hash the next block appended must have. Once the buffer is complete
    /// this is the ancestor the Chain must already hold.
    pub fn pending_ancestor(&self) -> Hash {
        match self.inner.read().blocks.last() {
            Some(block) => block.prev_hash(),
            None => self.hash,
        }
    }

    /// Append the next-older block of this fork.
    ///
    /// The block must already have passed complete validation and must
    /// hash to [`Fork::pending_ancestor`]. Returns the new buffer length.
    pub fn append_block(&self, block: Arc<CompleteBlock>) -> Result<usize, ForkError> {
        block.verify_is_valid().map_err(ForkError::BlockNotValidated)?;

        let mut inner = self.inner.write();
        if inner.initialized {
            return Err(ForkError::AlreadyInitialized);
        }

        let expected = inner
            .blocks
            .last()
            .map(|last| last.prev_hash())
            .unwrap_or(self.hash);
        let actual = block.hash();
        if actual != expected {
            return Err(ForkError::LinkMismatch {
                expected: short_hex(&expected),
                actual: short_hex(&actual),
            });
        }

        inner.blocks.push(block);
        inner.last_progress_at = Instant::now();

        tracing::debug!(
            fork = %short_hex(&self.hash),
            buffered = inner.blocks.len(),
            "block appended to fork"
        );
        Ok(inner.blocks.len())
    }

    /// Mark the buffer as linked to a known ancestor.
    pub fn mark_initialized(&self) -> Result<(), ForkError> {
        let mut inner = self.inner.write();
        if inner.initialized {
            return Err(ForkError::AlreadyInitialized);
        }
        if inner.blocks.is_empty() {
            return Err(ForkError::EmptyBuffer);
        }

        inner.initialized = true;
        Ok(())
    }

    /// Buffered blocks, oldest first.
    pub fn blocks_ascending(&self) -> Vec<Arc<CompleteBlock>> {
        self.inner.read().blocks.iter().rev().cloned().collect()
    }

    /// Reason this fork should be swept at `now`, if any.
    pub fn stale_reason(&self, now: Instant, config: &ForkChoiceConfig) -> Option<&'static str> {
        let inner = self.inner.read();

        if inner.initialized {
            return None;
        }

        if inner.blocks.is_empty() {
            if now.saturating_duration_since(self.created_at) > config.announced_fork_ttl {
                return Some("announced_ttl");
            }
            if now.saturating_duration_since(inner.last_announced_at)
                > config.announce_idle_timeout
            {
                return Some("announce_idle");
            }
            return None;
        }

        if now.saturating_duration_since(inner.last_progress_at) > config.download_stall_timeout {
            return Some("download_stalled");
        }

        None
    }
}

impl std::fmt::Debug for Fork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fork")
            .field("hash", &short_hex(&self.hash))
            .field("height", &self.height)
            .field("cumulative_difficulty", &self.cumulative_difficulty)
            .field("state", &self.state())
            .finish()
    }
}
