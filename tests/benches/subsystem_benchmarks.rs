//! # Stakechain Subsystem Benchmarks
//!
//! | Crate | Operation | Notes |
//! |-------|-----------|-------|
//! | sc-07 Block Bloom | `validate_all` on a fresh block | parallel tx signature checks |
//! | sc-07 Block Bloom | `validate_all` on a cached block | must be a lookup |
//! | sc-08 Consensus | `handle_chain_update` attach | hot path for re-announcements |
//! | sc-08 Consensus | `handle_chain_update` lighter peer | encodes and pushes our tip |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use sc_07_block_bloom::{BloomConfig, CompleteBlock};
use sc_08_consensus::{
    ChannelConnection, ConnectionId, ConsensusRegistry, ForkChoiceApi, ForkChoiceConfig,
    InMemoryChain, PeerConnection,
};
use sc_tests::fixtures::{delegate, signed_block, tip};
use shared_types::{BigUint, ChainUpdateNotification};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// SC-07: Block Bloom Benchmarks
// ============================================================================

fn bench_complete_block_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("sc-07-block-bloom");
    group.measurement_time(Duration::from_secs(10));

    let delegate = delegate();
    let config = BloomConfig::default();

    for tx_count in [1usize, 16, 128, 512] {
        let template = signed_block(&delegate, [0x01; 32], 2, tx_count);
        let bytes = template.to_bytes().expect("fixture serializes");

        group.throughput(Throughput::Elements(tx_count as u64));
        group.bench_with_input(
            BenchmarkId::new("validate_all_fresh", tx_count),
            &bytes,
            |b, bytes| {
                b.iter(|| {
                    let complete =
                        CompleteBlock::from_serialized(bytes, &config).expect("decodes");
                    black_box(complete.validate_all(&config).is_ok())
                })
            },
        );

        template.validate_all(&config).expect("fixture is valid");
        group.bench_with_input(
            BenchmarkId::new("validate_all_cached", tx_count),
            &template,
            |b, complete| b.iter(|| black_box(complete.validate_all(&config).is_ok())),
        );
    }

    group.finish();
}

// ============================================================================
// SC-08: Consensus Benchmarks
// ============================================================================

fn random_notification(difficulty: u64) -> ChainUpdateNotification {
    let mut rng = rand::thread_rng();
    let mut hash = [0u8; 32];
    rng.fill(&mut hash);
    ChainUpdateNotification {
        hash: hash.to_vec(),
        prev_hash: vec![0u8; 32],
        height: 2,
        cumulative_difficulty: BigUint::from(difficulty),
    }
}

fn bench_chain_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("sc-08-consensus");
    let rt = tokio::runtime::Runtime::new().expect("runtime builds");

    let chain = Arc::new(InMemoryChain::new(tip([0x01; 32], 1, 1_000)));
    let registry = Arc::new(ConsensusRegistry::new(chain, ForkChoiceConfig::default()));
    let (conn, mut rx) = ChannelConnection::new(ConnectionId(1), 1_024);
    let conn: Arc<dyn PeerConnection> = conn;
    rt.spawn(async move { while rx.recv().await.is_some() {} });

    let known = random_notification(5_000);
    rt.block_on(registry.handle_chain_update(&conn, known.clone()))
        .expect("fork registers");

    let mut malformed = random_notification(5_000);
    malformed.hash.truncate(20);

    let (registry, conn, known, malformed) = (&registry, &conn, &known, &malformed);

    group.bench_function("attach_to_existing_fork", |b| {
        b.to_async(&rt).iter(|| async move {
            black_box(registry.handle_chain_update(conn, known.clone()).await.is_ok())
        })
    });

    group.bench_function("push_local_tip", |b| {
        b.to_async(&rt).iter(|| async move {
            black_box(
                registry
                    .handle_chain_update(conn, random_notification(10))
                    .await
                    .is_ok(),
            )
        })
    });

    group.bench_function("reject_malformed_hash", |b| {
        b.to_async(&rt).iter(|| async move {
            black_box(registry.handle_chain_update(conn, malformed.clone()).await.is_err())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_complete_block_validation,
    bench_chain_update
);
criterion_main!(benches);
