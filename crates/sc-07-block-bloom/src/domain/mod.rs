//! Domain layer: entities and their validity caches
//!
//! Pure logic. The only state is the per-object cache.

pub mod block;
pub mod complete_block;
pub mod config;
pub mod transaction;
pub mod validity;

pub use block::{Block, BlockHeader, BlockValidity};
pub use complete_block::{CompleteBlock, CompleteBlockValidity};
pub use config::BloomConfig;
pub use transaction::{Transaction, TransactionValidity};
pub use validity::ValidityCell;
