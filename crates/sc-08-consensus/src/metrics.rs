//! # Consensus Metrics
//!
//! Prometheus metrics for monitoring the fork registry.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! sc-08-consensus = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `consensus_chain_updates_total{outcome}` - handled notifications by outcome
//! - `consensus_protocol_errors_total{reason}` - dropped malformed notifications
//! - `consensus_forks_created_total` - forks registered
//! - `consensus_forks_evicted_total{reason}` - forks removed by the sweeper or count bound
//! - `consensus_forks_promoted_total` - forks handed over for adoption
//! - `consensus_forks_rejected_total` - forks removed after failed validation
//! - `consensus_active_forks` - forks currently registered

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Handled chain-update notifications, labeled by outcome
    pub static ref CHAIN_UPDATES: IntCounterVec = register_int_counter_vec!(
        "consensus_chain_updates_total",
        "Total number of chain-update notifications handled",
        &["outcome"]
    )
    .expect("Failed to create CHAIN_UPDATES metric");

    /// Malformed notifications, labeled by reason
    pub static ref PROTOCOL_ERRORS: IntCounterVec = register_int_counter_vec!(
        "consensus_protocol_errors_total",
        "Total number of malformed chain-update notifications",
        &["reason"]
    )
    .expect("Failed to create PROTOCOL_ERRORS metric");

    /// Forks registered
    pub static ref FORKS_CREATED: IntCounter = register_int_counter!(
        "consensus_forks_created_total",
        "Total number of forks registered"
    )
    .expect("Failed to create FORKS_CREATED metric");

    /// Forks evicted, labeled by reason
    pub static ref FORKS_EVICTED: IntCounterVec = register_int_counter_vec!(
        "consensus_forks_evicted_total",
        "Total number of forks evicted",
        &["reason"]
    )
    .expect("Failed to create FORKS_EVICTED metric");

    /// Forks promoted
    pub static ref FORKS_PROMOTED: IntCounter = register_int_counter!(
        "consensus_forks_promoted_total",
        "Total number of forks promoted"
    )
    .expect("Failed to create FORKS_PROMOTED metric");

    /// Forks rejected
    pub static ref FORKS_REJECTED: IntCounter = register_int_counter!(
        "consensus_forks_rejected_total",
        "Total number of forks rejected"
    )
    .expect("Failed to create FORKS_REJECTED metric");

    /// Forks currently registered
    pub static ref ACTIVE_FORKS: IntGauge = register_int_gauge!(
        "consensus_active_forks",
        "Number of forks currently registered"
    )
    .expect("Failed to create ACTIVE_FORKS metric");
}

/// Record a handled notification
#[cfg(feature = "metrics")]
pub fn record_chain_update(outcome: &str) {
    CHAIN_UPDATES.with_label_values(&[outcome]).inc();
}

/// Record a dropped malformed notification
#[cfg(feature = "metrics")]
pub fn record_protocol_error(reason: &str) {
    PROTOCOL_ERRORS.with_label_values(&[reason]).inc();
}

/// Record a fork registration
#[cfg(feature = "metrics")]
pub fn record_fork_created() {
    FORKS_CREATED.inc();
}

/// Record a fork eviction with reason
#[cfg(feature = "metrics")]
pub fn record_fork_evicted(reason: &str) {
    FORKS_EVICTED.with_label_values(&[reason]).inc();
}

/// Record a fork promotion
#[cfg(feature = "metrics")]
pub fn record_fork_promoted() {
    FORKS_PROMOTED.inc();
}

/// Record a fork rejection
#[cfg(feature = "metrics")]
pub fn record_fork_rejected() {
    FORKS_REJECTED.inc();
}

/// Set the registered fork count
#[cfg(feature = "metrics")]
pub fn set_active_forks(count: usize) {
    ACTIVE_FORKS.set(count as i64);
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_chain_update(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_protocol_error(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_fork_created() {}

#[cfg(not(feature = "metrics"))]
pub fn record_fork_evicted(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_fork_promoted() {}

#[cfg(not(feature = "metrics"))]
pub fn record_fork_rejected() {}

#[cfg(not(feature = "metrics"))]
pub fn set_active_forks(_count: usize) {}
