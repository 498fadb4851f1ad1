//! # sc-08-consensus
//!
//! Fork registry and chain-update protocol for Stakechain.
//!
//! ## Architecture
//!
//! Peers announce their best tip with a `chain-update` notification. The
//! registry compares it with the canonical Chain by cumulative difficulty
//! (heaviest chain wins, height is informational) and tracks heavier
//! candidates as forks until a separate synchronization task has downloaded
//! and validated them.
//!
//! ```text
//! PeerConnection ──chain-update──→ ConsensusRegistry ──tip()──→ ChainProvider
//!                                        │
//!                                  DashMap<Hash, Fork>
//!                                        │
//!                      block downloader: append_block / try_initialize_fork
//!                                        │
//!                              promote_fork / reject_fork
//! ```
//!
//! - **Domain** (`domain/`): `Fork`, `Announcement`, `ChainUpdateOutcome`,
//!   `ForkChoiceConfig`, error enums
//! - **Ports** (`ports/`): `ForkChoiceApi` (driving), `ChainProvider` and
//!   `PeerConnection` (driven)
//! - **Service** (`service/`): `ConsensusRegistry`, `spawn_fork_sweeper`
//! - **Adapters** (`adapters/`): `InMemoryChain`, `ChannelConnection`
//! - **Protocol** (`protocol/`): JSON codec for the wire message
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sc_08_consensus::{ConsensusRegistry, ForkChoiceApi, ForkChoiceConfig};
//!
//! let registry = Arc::new(ConsensusRegistry::new(chain, ForkChoiceConfig::from_env()));
//! let sweeper = spawn_fork_sweeper(Arc::clone(&registry), interval, shutdown_rx);
//!
//! // For every inbound chain-update message:
//! let outcome = registry.handle_chain_update_bytes(&conn, &payload).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod protocol;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types
pub use adapters::{ChannelConnection, InMemoryChain, OutboundMessage};
pub use domain::{
    Announcement, ChainUpdateOutcome, ConnectionError, ConsensusError, Fork, ForkChoiceConfig,
    ForkError, ForkState, ProtocolError,
};
pub use ports::{ChainProvider, ConnectionId, ForkChoiceApi, PeerConnection};
pub use service::{spawn_fork_sweeper, ConsensusRegistry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fork_choice_config_default() {
        let config = ForkChoiceConfig::default();
        assert_eq!(config.max_forks, 256);
        assert_eq!(config.sweep_interval.as_secs(), 10);
    }
}
