//! # Shared Types Crate
//!
//! This crate contains the domain primitives shared by the block bloom
//! (`sc-07`) and consensus (`sc-08`) crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Hash widths, the difficulty type and the
//!   chain-update wire message are defined once, here.
//! - **Arbitrary Precision**: Cumulative difficulty is always a `BigUint`,
//!   never a fixed-width integer.
//! - **Wire Stability**: Hashes travel as lowercase hex and difficulty as a
//!   decimal string, so any JSON consumer round-trips them losslessly.

pub mod chain;
pub mod entities;
pub mod errors;
pub mod serde_helpers;

pub use chain::*;
pub use entities::*;
pub use errors::*;
