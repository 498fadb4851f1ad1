//! # Block Bloom Metrics
//!
//! Prometheus counters for validity-cache fills.
//!
//! Enable with the `metrics` feature:
//! ```toml
//! sc-07-block-bloom = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `bloom_validations_total{kind}` - successful cache fills
//! - `bloom_validation_failures_total{kind,reason}` - rejected fills
//!
//! `kind` is one of `transaction`, `block`, `complete_block`.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Successful validity-cache fills, labeled by entity kind
    pub static ref VALIDATIONS: IntCounterVec = register_int_counter_vec!(
        "bloom_validations_total",
        "Total number of successful validity cache fills",
        &["kind"]
    )
    .expect("Failed to create VALIDATIONS metric");

    /// Failed validations, labeled by entity kind and reason
    pub static ref VALIDATION_FAILURES: IntCounterVec = register_int_counter_vec!(
        "bloom_validation_failures_total",
        "Total number of failed validations",
        &["kind", "reason"]
    )
    .expect("Failed to create VALIDATION_FAILURES metric");
}

/// Record a successful cache fill
#[cfg(feature = "metrics")]
pub fn record_validated(kind: &str) {
    VALIDATIONS.with_label_values(&[kind]).inc();
}

/// Record a failed validation with reason
#[cfg(feature = "metrics")]
pub fn record_validation_failed(kind: &str, reason: &str) {
    VALIDATION_FAILURES.with_label_values(&[kind, reason]).inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_validated(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_validation_failed(_kind: &str, _reason: &str) {}
