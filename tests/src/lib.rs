//! # Stakechain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Signed chains shared by tests and benches
//! └── integration/      # Cross-crate flows (bloom → fork → chain)
//! benches/
//! └── subsystem_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sc-tests
//! cargo test -p sc-tests integration::
//!
//! # Benchmarks
//! cargo bench -p sc-tests
//! ```

pub mod fixtures;
pub mod integration;
