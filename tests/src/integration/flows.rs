//! # Integration Flows
//!
//! A heavier fork travels the whole path:
//!
//! 1. **chain-update**: a peer announces its tip and the registry tracks a fork
//! 2. **download**: serialized blocks pass `BlockBloomService::accept_serialized`
//!    and are appended to the fork buffer newest first
//! 3. **initialize**: the oldest block's parent is found in the local chain
//! 4. **promote**: the fork leaves the registry and the chain adopts it

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::fixtures::{announce, delegate, signed_block, signed_chain, tip};
    use sc_07_block_bloom::{Block, BlockBloomService, BloomConfig, CompleteBlock, ValidationError};
    use sc_08_consensus::{
        protocol::{decode_notification, encode_notification, CHAIN_UPDATE_TOPIC},
        ChainUpdateOutcome, ChannelConnection, ConnectionId, ConsensusRegistry, ForkChoiceApi,
        ForkChoiceConfig, ForkError, ForkState, InMemoryChain, PeerConnection,
    };
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::{BigUint, Hash};

    const GENESIS: Hash = [0x01; 32];

    fn peer(id: u64) -> Arc<dyn PeerConnection> {
        let (conn, _rx) = ChannelConnection::new(ConnectionId(id), 8);
        conn
    }

    fn local_chain() -> Arc<InMemoryChain> {
        let chain = InMemoryChain::new(tip(GENESIS, 1, 1_000));
        chain.insert_block(GENESIS);
        Arc::new(chain)
    }

    /// Serialize on the sending side, accept on the receiving side.
    fn over_the_wire(service: &BlockBloomService, blocks: &[CompleteBlock]) -> Vec<CompleteBlock> {
        blocks
            .iter()
            .map(|block| {
                let bytes = block.to_bytes().unwrap();
                service.accept_serialized(&bytes).unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_heavier_fork_is_downloaded_and_adopted() {
        let chain = local_chain();
        let registry = ConsensusRegistry::new(Arc::clone(&chain), ForkChoiceConfig::default());
        let service = BlockBloomService::new();
        let delegate = delegate();

        let remote = signed_chain(&delegate, GENESIS, 2, 4, 3);
        let fork_hash = remote[0].hash();

        let outcome = registry
            .handle_chain_update(&peer(1), announce(&remote[0], 5_000))
            .await
            .unwrap();
        assert_eq!(outcome, ChainUpdateOutcome::ForkCreated);

        let fork = registry.get_fork(&fork_hash).unwrap();
        for block in over_the_wire(&service, &remote) {
            assert!(block.is_valid());
            fork.append_block(Arc::new(block)).unwrap();
        }
        assert_eq!(fork.pending_ancestor(), GENESIS);

        assert!(registry.try_initialize_fork(&fork_hash).await.unwrap());
        assert_eq!(registry.best_fork().unwrap().hash(), fork_hash);

        let promoted = registry.promote_fork(&fork_hash).unwrap();
        let heights: Vec<u64> = promoted.blocks_ascending().iter().map(|b| b.height()).collect();
        assert_eq!(heights, vec![2, 3, 4, 5]);

        chain.adopt(&promoted);
        assert_eq!(chain.current_tip().hash, fork_hash);
        assert_eq!(chain.current_tip().cumulative_difficulty, BigUint::from(5_000u32));
        assert_eq!(registry.fork_count(), 0);

        // The same announcement is now our own tip.
        let outcome = registry
            .handle_chain_update(&peer(2), announce(&remote[0], 5_000))
            .await
            .unwrap();
        assert_eq!(outcome, ChainUpdateOutcome::AlreadySynced);
    }

    #[tokio::test]
    async fn test_tampered_block_never_enters_fork() {
        let chain = local_chain();
        let registry = ConsensusRegistry::new(chain, ForkChoiceConfig::default());
        let service = BlockBloomService::new();
        let delegate = delegate();

        let remote = signed_chain(&delegate, GENESIS, 2, 1, 2);
        let fork_hash = remote[0].hash();
        registry
            .handle_chain_update(&peer(1), announce(&remote[0], 5_000))
            .await
            .unwrap();

        // Swap a transaction for one the merkle root does not commit to.
        let mut tampered = remote[0].clone();
        let intruder = signed_block(&delegate, GENESIS, 99, 1).transactions()[0].clone();
        tampered.replace_transaction(0, intruder);

        let result = service.accept_serialized(&tampered.to_bytes().unwrap());
        assert!(matches!(result, Err(ValidationError::MerkleMismatch { .. })));

        // An unvalidated copy is refused by the buffer too.
        let fork = registry.get_fork(&fork_hash).unwrap();
        let unchecked = CompleteBlock::from_serialized(
            &tampered.to_bytes().unwrap(),
            &BloomConfig::default(),
        )
        .unwrap();
        assert!(matches!(
            fork.append_block(Arc::new(unchecked)),
            Err(ForkError::BlockNotValidated(_))
        ));
        assert_eq!(fork.state(), ForkState::Announced);
    }

    #[test]
    fn test_recovered_delegate_identifies_signer() {
        let service = BlockBloomService::new();
        let delegate = delegate();
        let stranger = Secp256k1KeyPair::from_bytes([0x77u8; 32]).unwrap();

        let honest = signed_block(&delegate, GENESIS, 2, 1);
        let resigned = CompleteBlock::new(
            Block::sign(honest.block().header().clone(), &stranger).unwrap(),
            honest.transactions().to_vec(),
        );

        let accepted = service.accept_serialized(&resigned.to_bytes().unwrap()).unwrap();
        let signer = accepted.block().validity().unwrap().delegate_public_key_hash;
        assert_eq!(signer, stranger.public_key().unwrap().to_public_key_hash());
        assert_ne!(signer, delegate.public_key().unwrap().to_public_key_hash());
        assert_ne!(accepted.hash(), honest.hash());
    }

    #[tokio::test]
    async fn test_link_mismatch_stops_download() {
        let chain = local_chain();
        let registry = ConsensusRegistry::new(chain, ForkChoiceConfig::default());
        let service = BlockBloomService::new();
        let delegate = delegate();

        let remote = signed_chain(&delegate, GENESIS, 2, 2, 1);
        let fork_hash = remote[0].hash();
        registry
            .handle_chain_update(&peer(1), announce(&remote[0], 9_000))
            .await
            .unwrap();
        let fork = registry.get_fork(&fork_hash).unwrap();

        let unrelated = over_the_wire(&service, &[signed_block(&delegate, GENESIS, 7, 1)]);
        let unrelated = unrelated.into_iter().next().unwrap();
        assert!(matches!(
            fork.append_block(Arc::new(unrelated)),
            Err(ForkError::LinkMismatch { .. })
        ));

        let rejected = registry.reject_fork(&fork_hash).unwrap();
        assert_eq!(rejected.block_count(), 0);
        assert!(registry.best_fork().is_none());
    }

    #[tokio::test]
    async fn test_lighter_peer_is_told_about_our_tip() {
        let chain = local_chain();
        let registry = ConsensusRegistry::new(chain, ForkChoiceConfig::default());
        let (conn, mut rx) = ChannelConnection::new(ConnectionId(9), 8);
        let conn: Arc<dyn PeerConnection> = conn;

        let stale = signed_block(&delegate(), GENESIS, 2, 1);
        let payload = encode_notification(&announce(&stale, 10)).unwrap();

        let outcome = registry
            .handle_chain_update_bytes(&conn, &payload)
            .await
            .unwrap();
        assert_eq!(outcome, ChainUpdateOutcome::PushedLocalTip);

        let message = rx.recv().await.unwrap();
        assert_eq!(message.topic, CHAIN_UPDATE_TOPIC);
        let reply = decode_notification(&message.payload).unwrap();
        assert_eq!(reply.hash, GENESIS.to_vec());
        assert_eq!(reply.cumulative_difficulty, BigUint::from(1_000u32));
    }
}
