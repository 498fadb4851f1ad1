//! Validation limits

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Hard ceiling on `max_transactions`, whatever the configuration says.
pub const MAX_TRANSACTIONS_CEILING: usize = 100_000;

/// Default cap on the encoded size of one complete block (32 MiB).
pub const DEFAULT_MAX_BLOCK_SIZE: u64 = 32 * 1024 * 1024;

/// Limits applied to complete blocks before any phase runs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BloomConfig {
    /// Maximum transactions carried by one complete block
    pub max_transactions: usize,
    /// Maximum bytes decoded for one complete block received from a peer
    pub max_block_size: u64,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            max_transactions: 10_000,
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
        }
    }
}

impl BloomConfig {
    /// Create a new configuration with validation
    pub fn new(max_transactions: usize) -> Result<Self, ValidationError> {
        let config = Self {
            max_transactions,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration bounds
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_transactions == 0 {
            return Err(ValidationError::InvalidConfig(
                "max_transactions cannot be 0".to_string(),
            ));
        }

        if self.max_transactions > MAX_TRANSACTIONS_CEILING {
            return Err(ValidationError::InvalidConfig(format!(
                "max_transactions {} exceeds ceiling {}",
                self.max_transactions, MAX_TRANSACTIONS_CEILING
            )));
        }

        if self.max_block_size == 0 {
            return Err(ValidationError::InvalidConfig(
                "max_block_size cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style method to set max transactions
    pub fn with_max_transactions(mut self, max: usize) -> Self {
        self.max_transactions = max;
        self
    }

    pub fn with_max_block_size(mut self, bytes: u64) -> Self {
        self.max_block_size = bytes;
        self
    }
}
