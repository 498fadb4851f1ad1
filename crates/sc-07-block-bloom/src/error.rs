//! Error types for the block bloom subsystem

use shared_crypto::CryptoError;
use thiserror::Error;

/// Validation failures raised while filling a validity cache.
///
/// None of these leave a partially installed cache record behind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Signer recovery or signature verification failed
    #[error("Invalid signature: {0}")]
    SignatureInvalid(#[source] CryptoError),

    /// Recomputed transaction merkle root differs from the header
    #[error("Merkle root mismatch: header {expected}, computed {computed}")]
    MerkleMismatch { expected: String, computed: String },

    /// Complete block violates its structural precondition
    #[error("Structurally invalid block: {0}")]
    StructurallyInvalid(String),

    /// Canonical encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Complete block has not been fully validated yet
    #[error("Complete block not validated: {0}")]
    NotValidated(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<bincode::Error> for ValidationError {
    fn from(err: bincode::Error) -> Self {
        ValidationError::Serialization(err.to_string())
    }
}

impl ValidationError {
    /// Short label used for metrics and log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::SignatureInvalid(_) => "signature_invalid",
            ValidationError::MerkleMismatch { .. } => "merkle_mismatch",
            ValidationError::StructurallyInvalid(_) => "structurally_invalid",
            ValidationError::Serialization(_) => "serialization",
            ValidationError::NotValidated(_) => "not_validated",
            ValidationError::InvalidConfig(_) => "invalid_config",
        }
    }
}
