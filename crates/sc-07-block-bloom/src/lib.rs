//! # SC-07 Block Bloom
//!
//! Write-once validity caches ("blooms") for blocks, transactions and
//! complete blocks.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): entities and their caches
//!   - `Transaction` / `TransactionValidity`: hash and recovered signer
//!   - `Block` / `BlockValidity`: hash, kernel hash, recovered delegate
//!   - `CompleteBlock` / `CompleteBlockValidity`: size and merkle phases
//!   - `ValidityCell`: single-assignment cell with a compute gate
//! - **Service Layer** (`service/`): `BlockBloomService` runs the composite
//!   checks with configured limits
//!
//! ## Invariants
//!
//! - A cache record is only installed after every check it covers passed.
//!   A failed validation leaves nothing behind and may be retried.
//! - Once installed, a record is never recomputed or replaced.
//! - A merkle mismatch is final for the object that produced it.
//!
//! ## Usage Example
//!
//! ```ignore
//! use sc_07_block_bloom::{BlockBloomService, CompleteBlock};
//!
//! let service = BlockBloomService::new();
//! let complete = service.accept_serialized(&bytes_from_peer)?;
//! assert!(complete.is_valid());
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod service;

pub use domain::{
    Block, BlockHeader, BlockValidity, BloomConfig, CompleteBlock, CompleteBlockValidity,
    Transaction, TransactionValidity, ValidityCell,
};
pub use error::ValidationError;
pub use service::BlockBloomService;
