//! Outbound event delivery abstraction.
//!
//! The domain defines the interface it needs for pushing events to live
//! connections; the infrastructure layer provides the WebSocket-backed
//! implementation. Use cases depend on this trait only, which keeps the
//! matchmaking logic testable without sockets.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::ConnectionId;

/// Per-connection outbound channel. The UI layer creates it when a socket is
/// accepted and pumps the receiving end into the socket.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Failure to deliver to one connection.
///
/// Both variants are expected during normal operation (disconnect ordering is
/// racy by nature); callers tolerate them and drop the event.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),
    #[error("outbound channel for connection '{0}' is closed")]
    ChannelClosed(String),
}

/// Fire-and-forget event delivery to live connections.
///
/// Delivery is at-most-once with no acknowledgment or redelivery; nothing
/// built on top of this trait may assume an event arrived. Events are passed
/// pre-serialized so implementations stay payload-agnostic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// Track a newly established connection. Always succeeds.
    async fn register(&self, id: ConnectionId, sender: PusherChannel);

    /// Forget a connection. Idempotent; unknown ids are a no-op.
    async fn unregister(&self, id: &ConnectionId);

    /// Deliver one event to one connection.
    async fn send_to(&self, id: &ConnectionId, event_json: &str) -> Result<(), PushError>;

    /// Deliver one event to each target, tolerating per-target failures.
    async fn broadcast(&self, targets: Vec<ConnectionId>, event_json: &str);
}
