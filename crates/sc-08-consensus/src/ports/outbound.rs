//! Driven ports (Outbound dependencies)

use crate::domain::ConnectionError;
use async_trait::async_trait;
use shared_types::{ChainTip, Hash, StorageError};
use std::fmt;

/// Stable identity of a peer connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A live connection to a peer.
///
/// `send` only enqueues; it never waits on the network, so it is safe to
/// call from the chain-update handler.
pub trait PeerConnection: Send + Sync {
    fn id(&self) -> ConnectionId;

    fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), ConnectionError>;
}

/// Read access to the canonical chain.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Consistent snapshot of the current tip.
    async fn tip(&self) -> Result<ChainTip, StorageError>;

    /// Whether the chain holds a block with this hash.
    async fn contains_block(&self, hash: &Hash) -> Result<bool, StorageError>;
}
