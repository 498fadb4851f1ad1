//! Block Bloom Service
//!
//! Holds the validation limits and runs the composite checks on blocks
//! handed over by the block downloader.

use crate::domain::{BloomConfig, CompleteBlock};
use crate::error::ValidationError;
use shared_types::short_hex;

pub struct BlockBloomService {
    config: BloomConfig,
}

impl BlockBloomService {
    pub fn new() -> Self {
        Self {
            config: BloomConfig::default(),
        }
    }

    /// Create with custom limits, rejecting invalid ones.
    pub fn with_config(config: BloomConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BloomConfig {
        &self.config
    }

    /// Fully validate a complete block already in memory.
    pub fn validate(&self, complete: &CompleteBlock) -> Result<(), ValidationError> {
        complete.validate_all(&self.config).inspect_err(|e| {
            tracing::debug!(
                height = complete.height(),
                reason = e.reason(),
                "complete block rejected"
            );
        })
    }

    /// Decode bytes received from a peer and fully validate them.
    pub fn accept_serialized(&self, bytes: &[u8]) -> Result<CompleteBlock, ValidationError> {
        let complete = CompleteBlock::from_serialized(bytes, &self.config)?;
        self.validate(&complete)?;

        tracing::debug!(
            block = %short_hex(&complete.hash()),
            height = complete.height(),
            size = bytes.len(),
            "complete block accepted"
        );
        Ok(complete)
    }
}

impl Default for BlockBloomService {
    fn default() -> Self {
        Self::new()
    }
}
