//! Chain-update wire codec
//!
//! Notifications travel as JSON under the `chain-update` topic: hashes as
//! lowercase hex, cumulative difficulty as a decimal string.
//!
//! ```json
//! {"hash":"ab..","prevHash":"cd..","height":42,"cumulativeDifficulty":"1500"}
//! ```

use crate::domain::{Announcement, ProtocolError};
use shared_types::ChainUpdateNotification;

pub use shared_types::CHAIN_UPDATE_TOPIC;

/// Decode a JSON payload without checking hash widths.
pub fn decode_notification(payload: &[u8]) -> Result<ChainUpdateNotification, ProtocolError> {
    serde_json::from_slice(payload).map_err(|e| ProtocolError::Decode(e.to_string()))
}

/// Encode a notification as JSON.
pub fn encode_notification(
    notification: &ChainUpdateNotification,
) -> Result<Vec<u8>, ProtocolError> {
    serde_json::to_vec(notification).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Decode and width-check a payload in one step.
pub fn parse_announcement(payload: &[u8]) -> Result<Announcement, ProtocolError> {
    Announcement::try_from(decode_notification(payload)?)
}
