//! Connection registry: the WebSocket-backed `EventPusher` implementation.
//!
//! Tracks the outbound channel of every live connection. The UI layer creates
//! the channel when a socket is accepted and pumps its receiving end into the
//! socket; this registry only ever writes to the sending end, so delivery
//! never blocks and never runs inside the matchmaking critical section.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, PushError, PusherChannel};

/// Map from connection id to its outbound channel.
#[derive(Default)]
pub struct ConnectionRegistry {
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventPusher for ConnectionRegistry {
    async fn register(&self, id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(id.clone(), sender);
        tracing::debug!("connection '{}' registered", id);
    }

    async fn unregister(&self, id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(id).is_some() {
            tracing::debug!("connection '{}' unregistered", id);
        }
    }

    async fn send_to(&self, id: &ConnectionId, event_json: &str) -> Result<(), PushError> {
        let clients = self.clients.lock().await;
        match clients.get(id) {
            Some(sender) => sender
                .send(event_json.to_string())
                .map_err(|_| PushError::ChannelClosed(id.as_str().to_string())),
            None => Err(PushError::ConnectionNotFound(id.as_str().to_string())),
        }
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, event_json: &str) {
        let clients = self.clients.lock().await;
        for target in targets {
            match clients.get(&target) {
                Some(sender) => {
                    if sender.send(event_json.to_string()).is_err() {
                        tracing::warn!("dropping event for '{}': channel closed", target);
                    }
                }
                None => {
                    tracing::warn!("dropping event for '{}': not registered", target);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn conn(name: &str) -> ConnectionId {
        ConnectionId::new(name.to_string())
    }

    #[tokio::test]
    async fn test_send_to_delivers_to_the_registered_connection() {
        // given:
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(conn("alice"), tx).await;

        // when:
        let result = registry.send_to(&conn("alice"), "{\"type\":\"endChat\"}").await;

        // then:
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("{\"type\":\"endChat\"}".to_string()));
    }

    #[tokio::test]
    async fn test_send_to_unknown_connection_fails_without_panicking() {
        // given:
        let registry = ConnectionRegistry::new();

        // when:
        let result = registry.send_to(&conn("ghost"), "{}").await;

        // then:
        assert!(matches!(result, Err(PushError::ConnectionNotFound(_))));
    }

    #[tokio::test]
    async fn test_send_to_closed_channel_reports_the_drop() {
        // given: a connection whose socket pump already exited
        let registry = ConnectionRegistry::new();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        registry.register(conn("alice"), tx).await;

        // when:
        let result = registry.send_to(&conn("alice"), "{}").await;

        // then:
        assert!(matches!(result, Err(PushError::ChannelClosed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_missing_targets() {
        // given:
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(conn("alice"), tx).await;

        // when: one live target, one unknown target
        registry
            .broadcast(vec![conn("alice"), conn("ghost")], "{\"type\":\"endChat\"}")
            .await;

        // then: the live target still receives the event
        assert_eq!(rx.recv().await, Some("{\"type\":\"endChat\"}".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        // given:
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        registry.register(conn("alice"), tx).await;

        // when:
        registry.unregister(&conn("alice")).await;
        registry.unregister(&conn("alice")).await;

        // then:
        assert!(registry.send_to(&conn("alice"), "{}").await.is_err());
    }
}
