//! # Error Types
//!
//! Errors shared across crates.

use thiserror::Error;

/// Errors raised by the storage engine behind the Chain collaborator.
///
/// Every variant is retryable from the point of view of the consensus
/// crate: a notification whose tip read failed is not consumed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Data corruption detected during read.
    #[error("Data corruption: checksum mismatch for block {block_hash}")]
    DataCorruption { block_hash: String },

    /// The read transaction could not be opened.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),
}
