//! Driving ports (Inbound API)

use super::PeerConnection;
use crate::domain::{ChainUpdateOutcome, ConsensusError, Fork, ForkError};
use async_trait::async_trait;
use shared_types::{ChainUpdateNotification, Hash};
use std::sync::Arc;

/// Fork-choice API used by the connection layer and the block downloader.
#[async_trait]
pub trait ForkChoiceApi: Send + Sync {
    /// Handle a decoded chain-update notification received on `conn`.
    ///
    /// Malformed notifications fail with `ConsensusError::Protocol` and
    /// mutate nothing. A failed tip read fails with
    /// `ConsensusError::Storage`; the notification may be re-delivered.
    async fn handle_chain_update(
        &self,
        conn: &Arc<dyn PeerConnection>,
        notification: ChainUpdateNotification,
    ) -> Result<ChainUpdateOutcome, ConsensusError>;

    /// Handle a raw JSON chain-update payload received on `conn`.
    async fn handle_chain_update_bytes(
        &self,
        conn: &Arc<dyn PeerConnection>,
        payload: &[u8],
    ) -> Result<ChainUpdateOutcome, ConsensusError>;

    /// This node's own tip as a chain-update notification.
    async fn local_notification(&self) -> Result<ChainUpdateNotification, ConsensusError>;

    /// Mark a fork initialized if the Chain knows its pending ancestor.
    ///
    /// Returns whether the fork is initialized after the call.
    async fn try_initialize_fork(&self, hash: &Hash) -> Result<bool, ForkError>;

    /// Heaviest registered fork (earliest created wins ties).
    fn best_fork(&self) -> Option<Arc<Fork>>;

    /// Remove a validated fork and hand it over for adoption.
    fn promote_fork(&self, hash: &Hash) -> Result<Arc<Fork>, ForkError>;

    /// Remove a fork that failed validation.
    fn reject_fork(&self, hash: &Hash) -> Option<Arc<Fork>>;
}
