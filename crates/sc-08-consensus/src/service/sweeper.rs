//! Periodic stale-fork eviction

use super::ConsensusRegistry;
use crate::ports::ChainProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Run [`ConsensusRegistry::evict_stale`] every `interval` until `shutdown`
/// flips to `true` or its sender is dropped.
pub fn spawn_fork_sweeper<C>(
    registry: Arc<ConsensusRegistry<C>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    C: ChainProvider + 'static,
{
    let period = interval.max(Duration::from_millis(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let evicted = registry.evict_stale(Instant::now());
                    if !evicted.is_empty() {
                        tracing::debug!(
                            evicted = evicted.len(),
                            remaining = registry.fork_count(),
                            "fork sweep finished"
                        );
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Fork sweeper shutdown signal received");
                        break;
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ChannelConnection, InMemoryChain};
    use crate::domain::{ChainUpdateOutcome, ForkChoiceConfig};
    use crate::ports::{ConnectionId, ForkChoiceApi, PeerConnection};
    use crate::test_support::{notification, tip};

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_idle_fork_and_stops() {
        let config = ForkChoiceConfig::default()
            .with_announce_idle_timeout(Duration::from_secs(5))
            .with_sweep_interval(Duration::from_secs(1));
        let chain = Arc::new(InMemoryChain::new(tip([1u8; 32], 100)));
        let registry = Arc::new(ConsensusRegistry::new(chain, config.clone()));

        let (conn, _rx) = ChannelConnection::new(ConnectionId(1), 8);
        let conn: Arc<dyn PeerConnection> = conn;
        let outcome = registry
            .handle_chain_update(&conn, notification([2u8; 32], 200))
            .await
            .unwrap();
        assert_eq!(outcome, ChainUpdateOutcome::ForkCreated);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn_fork_sweeper(Arc::clone(&registry), config.sweep_interval, shutdown_rx);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(registry.fork_count(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(registry.fork_count(), 0);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_when_sender_dropped() {
        let chain = Arc::new(InMemoryChain::new(tip([1u8; 32], 100)));
        let registry = Arc::new(ConsensusRegistry::new(chain, ForkChoiceConfig::default()));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn_fork_sweeper(registry, Duration::from_secs(1), shutdown_rx);

        drop(shutdown_tx);
        handle.await.unwrap();
    }
}
