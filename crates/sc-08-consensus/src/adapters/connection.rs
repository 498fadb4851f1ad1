//! Channel-backed peer connection
//!
//! Each `send` is a non-blocking enqueue on a bounded tokio mpsc channel.
//! The receiving half stands in for the transport's writer task.

use crate::domain::ConnectionError;
use crate::ports::{ConnectionId, PeerConnection};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// A message queued for a peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

pub struct ChannelConnection {
    id: ConnectionId,
    sender: mpsc::Sender<OutboundMessage>,
}

impl ChannelConnection {
    /// Create a connection and the receiver draining its queue.
    pub fn new(id: ConnectionId, capacity: usize) -> (Arc<Self>, mpsc::Receiver<OutboundMessage>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Arc::new(Self { id, sender }), receiver)
    }
}

impl PeerConnection for ChannelConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), ConnectionError> {
        let message = OutboundMessage {
            topic: topic.to_string(),
            payload,
        };

        self.sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => ConnectionError::QueueFull,
            TrySendError::Closed(_) => ConnectionError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_enqueues() {
        let (conn, mut rx) = ChannelConnection::new(ConnectionId(7), 4);

        conn.send("chain-update", b"{}".to_vec()).unwrap();
        let message = rx.recv().await.unwrap();
        assert_eq!(message.topic, "chain-update");
        assert_eq!(message.payload, b"{}".to_vec());
        assert_eq!(conn.id(), ConnectionId(7));
    }

    #[test]
    fn test_full_and_closed() {
        let (conn, rx) = ChannelConnection::new(ConnectionId(1), 1);

        conn.send("t", vec![1]).unwrap();
        assert_eq!(conn.send("t", vec![2]), Err(ConnectionError::QueueFull));

        drop(rx);
        assert_eq!(conn.send("t", vec![3]), Err(ConnectionError::Closed));
    }
}
