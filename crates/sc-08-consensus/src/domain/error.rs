//! Error types for the consensus subsystem

use sc_07_block_bloom::ValidationError;
use shared_types::StorageError;
use thiserror::Error;

/// Malformed chain-update message. The message is dropped and the sending
/// connection is not penalized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Undecodable chain-update payload: {0}")]
    Decode(String),

    #[error("Unencodable chain-update payload: {0}")]
    Encode(String),

    #[error("Invalid hash length: expected {expected}, got {actual}")]
    InvalidHashLength { expected: usize, actual: usize },

    #[error("Invalid previous hash length: expected {expected}, got {actual}")]
    InvalidPrevHashLength { expected: usize, actual: usize },
}

/// Errors surfaced by the chain-update handler.
///
/// `Storage` means the notification was not consumed and may be
/// re-delivered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors returned to the synchronization task driving a fork.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForkError {
    #[error("Unknown fork: {0}")]
    UnknownFork(String),

    #[error("Block not validated: {0}")]
    BlockNotValidated(#[source] ValidationError),

    #[error("Block does not link: expected {expected}, got {actual}")]
    LinkMismatch { expected: String, actual: String },

    #[error("Fork already initialized")]
    AlreadyInitialized,

    #[error("Fork has no buffered blocks")]
    EmptyBuffer,

    #[error("Fork not validated: {0}")]
    ForkNotValidated(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Failure to enqueue a message on a peer connection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Connection closed")]
    Closed,

    #[error("Send queue full")]
    QueueFull,
}

impl ProtocolError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            ProtocolError::Decode(_) => "decode",
            ProtocolError::Encode(_) => "encode",
            ProtocolError::InvalidHashLength { .. } => "hash_length",
            ProtocolError::InvalidPrevHashLength { .. } => "prev_hash_length",
        }
    }
}
