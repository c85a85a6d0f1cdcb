//! Use case: a connection terminates.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, DisconnectOutcome, EventPusher, Matchmaker};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::push;

/// Handles connection teardown from any state: a waiting connection vacates
/// the slot, a room member's room is torn down exactly as an explicit leave
/// would with the remaining member notified once, and the connection is
/// removed from the delivery registry.
pub struct DisconnectUseCase {
    matchmaker: Arc<Mutex<Matchmaker>>,
    pusher: Arc<dyn EventPusher>,
}

impl DisconnectUseCase {
    pub fn new(matchmaker: Arc<Mutex<Matchmaker>>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { matchmaker, pusher }
    }

    pub async fn execute(&self, id: &ConnectionId) {
        let outcome = {
            let mut matchmaker = self.matchmaker.lock().await;
            matchmaker.disconnect(id)
        };

        match outcome {
            DisconnectOutcome::WasWaiting => {
                tracing::info!("waiting connection '{}' disconnected, slot cleared", id);
            }
            DisconnectOutcome::WasInRoom { room_id, partner } => {
                tracing::info!(
                    "connection '{}' disconnected, room '{}' closed",
                    id,
                    room_id
                );
                push(self.pusher.as_ref(), &partner, &ServerEvent::EndChat).await;
            }
            DisconnectOutcome::WasIdle | DisconnectOutcome::UnknownConnection => {}
        }

        self.pusher.unregister(id).await;
        tracing::info!("connection '{}' removed", id);
    }
}
