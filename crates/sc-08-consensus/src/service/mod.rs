//! Consensus Registry - fork map and chain-update protocol
//!
//! # Chain-update handling
//!
//! 1. Reject hashes that are not exactly 32 bytes (nothing is mutated).
//! 2. Read the local tip. Our own tip hash is a no-op.
//! 3. A registered fork with the hash gains the sender as a connection.
//!    Its first-seen difficulty and height are kept.
//! 4. Otherwise compare cumulative difficulty with the local tip:
//!    equal is a no-op, ours heavier pushes our tip back to the sender,
//!    theirs heavier registers a new fork.
//!
//! Registration is a single check-then-insert on the fork map entry, so
//! concurrent announcements of one hash produce exactly one fork. The only
//! await is the tip read, which happens before any mutation.

mod sweeper;

pub use sweeper::spawn_fork_sweeper;

use crate::domain::{
    Announcement, ChainUpdateOutcome, ConsensusError, Fork, ForkChoiceConfig, ForkError,
    ForkState, ProtocolError,
};
use crate::metrics;
use crate::ports::{ChainProvider, ForkChoiceApi, PeerConnection};
use crate::protocol::{decode_notification, encode_notification, CHAIN_UPDATE_TOPIC};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::{short_hex, ChainTip, ChainUpdateNotification, CumulativeDifficulty, Hash};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::time::Instant;

/// Owns every known fork and runs the chain-update protocol.
pub struct ConsensusRegistry<C: ChainProvider> {
    chain: Arc<C>,
    forks: DashMap<Hash, Arc<Fork>>,
    config: ForkChoiceConfig,
}

impl<C: ChainProvider> ConsensusRegistry<C> {
    pub fn new(chain: Arc<C>, config: ForkChoiceConfig) -> Self {
        Self {
            chain,
            forks: DashMap::new(),
            config,
        }
    }

    pub fn chain(&self) -> &Arc<C> {
        &self.chain
    }

    pub fn config(&self) -> &ForkChoiceConfig {
        &self.config
    }

    pub fn get_fork(&self, hash: &Hash) -> Option<Arc<Fork>> {
        self.forks.get(hash).map(|entry| Arc::clone(entry.value()))
    }

    pub fn fork_count(&self) -> usize {
        self.forks.len()
    }

    pub fn fork_hashes(&self) -> Vec<Hash> {
        self.forks.iter().map(|entry| *entry.key()).collect()
    }

    fn forks_snapshot(&self) -> Vec<Arc<Fork>> {
        self.forks
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    fn drop_malformed(&self, conn: &Arc<dyn PeerConnection>, err: ProtocolError) -> ConsensusError {
        tracing::warn!(conn = %conn.id(), error = %err, "dropping malformed chain-update");
        metrics::record_protocol_error(err.reason());
        ConsensusError::Protocol(err)
    }

    async fn process(
        &self,
        conn: &Arc<dyn PeerConnection>,
        announcement: Announcement,
    ) -> Result<ChainUpdateOutcome, ConsensusError> {
        let tip = self.chain.tip().await.map_err(|e| {
            tracing::warn!(
                conn = %conn.id(),
                error = %e,
                "tip read failed, chain-update not consumed"
            );
            ConsensusError::Storage(e)
        })?;

        if announcement.hash == tip.hash {
            return Ok(ChainUpdateOutcome::AlreadySynced);
        }

        if let Some(fork) = self.get_fork(&announcement.hash) {
            fork.add_connection(conn, true);
            return Ok(ChainUpdateOutcome::AttachedToExisting);
        }

        let outcome = match tip
            .cumulative_difficulty
            .cmp(&announcement.cumulative_difficulty)
        {
            Ordering::Equal => ChainUpdateOutcome::EqualDifficulty,
            Ordering::Greater => {
                self.push_local_tip(conn, &tip);
                ChainUpdateOutcome::PushedLocalTip
            }
            Ordering::Less => self.insert_fork(announcement, conn),
        };

        Ok(outcome)
    }

    fn push_local_tip(&self, conn: &Arc<dyn PeerConnection>, tip: &ChainTip) {
        let payload = match encode_notification(&tip.to_notification()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode local tip");
                return;
            }
        };

        if let Err(e) = conn.send(CHAIN_UPDATE_TOPIC, payload) {
            tracing::warn!(conn = %conn.id(), error = %e, "failed to push local tip");
        }
    }

    fn insert_fork(
        &self,
        announcement: Announcement,
        conn: &Arc<dyn PeerConnection>,
    ) -> ChainUpdateOutcome {
        let hash = announcement.hash;

        if self.forks.len() >= self.config.max_forks
            && !self.forks.contains_key(&hash)
            && !self.evict_for(&announcement.cumulative_difficulty)
        {
            tracing::warn!(
                fork = %short_hex(&hash),
                max_forks = self.config.max_forks,
                "fork registry full, announcement dropped"
            );
            return ChainUpdateOutcome::RegistryFull;
        }

        let outcome = match self.forks.entry(hash) {
            Entry::Occupied(entry) => {
                let fork = Arc::clone(entry.get());
                drop(entry);
                fork.add_connection(conn, true);
                ChainUpdateOutcome::AttachedAfterRace
            }
            Entry::Vacant(entry) => {
                tracing::info!(
                    fork = %short_hex(&hash),
                    height = announcement.height,
                    difficulty = %announcement.cumulative_difficulty,
                    conn = %conn.id(),
                    "fork registered"
                );
                entry.insert(Arc::new(Fork::new(announcement, conn)));
                metrics::record_fork_created();
                ChainUpdateOutcome::ForkCreated
            }
        };

        metrics::set_active_forks(self.forks.len());
        outcome
    }

    /// Make room for a newcomer claiming `difficulty`.
    ///
    /// Only `Announced` forks are candidates, and only if they are already
    /// stale or claim less than the newcomer. Stale forks go first, then the
    /// lightest, then the oldest.
    fn evict_for(&self, difficulty: &CumulativeDifficulty) -> bool {
        let now = Instant::now();
        let evictable = |fork: &Fork| {
            fork.state() == ForkState::Announced
                && (fork.stale_reason(now, &self.config).is_some()
                    || fork.cumulative_difficulty() < difficulty)
        };

        let victim = self
            .forks_snapshot()
            .into_iter()
            .filter(|fork| evictable(&**fork))
            .min_by(|a, b| {
                let a_fresh = a.stale_reason(now, &self.config).is_none();
                let b_fresh = b.stale_reason(now, &self.config).is_none();
                a_fresh
                    .cmp(&b_fresh)
                    .then_with(|| a.cumulative_difficulty().cmp(b.cumulative_difficulty()))
                    .then_with(|| a.created_at().cmp(&b.created_at()))
            });

        let Some(victim) = victim else {
            return false;
        };

        let hash = victim.hash();
        let removed = self.forks.remove_if(&hash, |_, fork| evictable(&**fork)).is_some();

        if removed {
            tracing::info!(fork = %short_hex(&hash), "fork evicted to make room");
            metrics::record_fork_evicted("capacity");
        }
        removed
    }

    /// Remove forks that made no progress in time. Validated forks stay.
    ///
    /// Returns the evicted hashes.
    pub fn evict_stale(&self, now: Instant) -> Vec<Hash> {
        let candidates: Vec<Hash> = self
            .forks
            .iter()
            .filter(|entry| entry.value().stale_reason(now, &self.config).is_some())
            .map(|entry| *entry.key())
            .collect();

        let mut evicted = Vec::with_capacity(candidates.len());
        for hash in candidates {
            let mut reason = None;
            let removed = self.forks.remove_if(&hash, |_, fork| {
                reason = fork.stale_reason(now, &self.config);
                reason.is_some()
            });

            if removed.is_some() {
                let reason = reason.unwrap_or("stale");
                tracing::info!(fork = %short_hex(&hash), reason, "stale fork evicted");
                metrics::record_fork_evicted(reason);
                evicted.push(hash);
            }
        }

        if !evicted.is_empty() {
            metrics::set_active_forks(self.forks.len());
        }
        evicted
    }
}

#[async_trait]
impl<C: ChainProvider + 'static> ForkChoiceApi for ConsensusRegistry<C> {
    async fn handle_chain_update(
        &self,
        conn: &Arc<dyn PeerConnection>,
        notification: ChainUpdateNotification,
    ) -> Result<ChainUpdateOutcome, ConsensusError> {
        let announcement =
            Announcement::try_from(notification).map_err(|e| self.drop_malformed(conn, e))?;
        let hash = announcement.hash;

        let outcome = self.process(conn, announcement).await?;

        tracing::debug!(
            conn = %conn.id(),
            fork = %short_hex(&hash),
            outcome = outcome.as_str(),
            "chain-update handled"
        );
        metrics::record_chain_update(outcome.as_str());
        Ok(outcome)
    }

    async fn handle_chain_update_bytes(
        &self,
        conn: &Arc<dyn PeerConnection>,
        payload: &[u8],
    ) -> Result<ChainUpdateOutcome, ConsensusError> {
        let notification = decode_notification(payload).map_err(|e| self.drop_malformed(conn, e))?;
        self.handle_chain_update(conn, notification).await
    }

    async fn local_notification(&self) -> Result<ChainUpdateNotification, ConsensusError> {
        Ok(self.chain.tip().await?.to_notification())
    }

    async fn try_initialize_fork(&self, hash: &Hash) -> Result<bool, ForkError> {
        let fork = self
            .get_fork(hash)
            .ok_or_else(|| ForkError::UnknownFork(short_hex(hash)))?;

        if fork.is_initialized() {
            return Ok(true);
        }
        if fork.block_count() == 0 {
            return Ok(false);
        }

        let ancestor = fork.pending_ancestor();
        if !self.chain.contains_block(&ancestor).await? {
            return Ok(false);
        }

        match fork.mark_initialized() {
            Ok(()) => {
                tracing::info!(
                    fork = %short_hex(hash),
                    ancestor = %short_hex(&ancestor),
                    blocks = fork.block_count(),
                    "fork linked to known ancestor"
                );
                Ok(true)
            }
            Err(ForkError::AlreadyInitialized) => Ok(true),
            Err(e) => Err(e),
        }
    }

    fn best_fork(&self) -> Option<Arc<Fork>> {
        self.forks_snapshot().into_iter().max_by(|a, b| {
            a.cumulative_difficulty()
                .cmp(b.cumulative_difficulty())
                .then_with(|| b.created_at().cmp(&a.created_at()))
        })
    }

    fn promote_fork(&self, hash: &Hash) -> Result<Arc<Fork>, ForkError> {
        match self.forks.remove_if(hash, |_, fork| fork.is_initialized()) {
            Some((_, fork)) => {
                tracing::info!(
                    fork = %short_hex(hash),
                    height = fork.height(),
                    difficulty = %fork.cumulative_difficulty(),
                    "fork promoted"
                );
                metrics::record_fork_promoted();
                metrics::set_active_forks(self.forks.len());
                Ok(fork)
            }
            None if self.forks.contains_key(hash) => {
                Err(ForkError::ForkNotValidated(short_hex(hash)))
            }
            None => Err(ForkError::UnknownFork(short_hex(hash))),
        }
    }

    fn reject_fork(&self, hash: &Hash) -> Option<Arc<Fork>> {
        let (_, fork) = self.forks.remove(hash)?;
        tracing::info!(fork = %short_hex(hash), "fork rejected");
        metrics::record_fork_rejected();
        metrics::set_active_forks(self.forks.len());
        Some(fork)
    }
}
