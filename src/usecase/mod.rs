//! Use case layer: one orchestrator per inbound client event.
//!
//! Each use case holds the shared matchmaking aggregate behind one mutex and
//! an [`EventPusher`] for outbound delivery. The pattern is uniform: take the
//! lock, apply one pure state transition, release the lock, then dispatch the
//! notifications derived from the outcome. Pairing and teardown are therefore
//! atomic with respect to each other, and no send ever runs inside the
//! critical section.

mod connect;
mod disconnect;
mod get_stats;
mod join_queue;
mod leave_room;
mod relay_signal;
mod send_message;

pub use connect::ConnectUseCase;
pub use disconnect::DisconnectUseCase;
pub use get_stats::GetStatsUseCase;
pub use join_queue::JoinQueueUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use relay_signal::RelaySignalUseCase;
pub use send_message::SendMessageUseCase;

use crate::domain::{ConnectionId, EventPusher};
use crate::infrastructure::dto::websocket::ServerEvent;

/// Serialize a server event, logging and dropping it on the (practically
/// unreachable) serialization failure.
pub(crate) fn encode(event: &ServerEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("failed to serialize server event: {}", e);
            None
        }
    }
}

/// Push one event to one connection, tolerating delivery failures.
///
/// Delivery is at-most-once; a peer that vanished mid-relay is an expected
/// race, not an error worth surfacing.
pub(crate) async fn push(pusher: &dyn EventPusher, target: &ConnectionId, event: &ServerEvent) {
    let Some(json) = encode(event) else {
        return;
    };
    if let Err(e) = pusher.send_to(target, &json).await {
        tracing::debug!("dropping event for '{}': {}", target, e);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared test doubles for use case tests.

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::domain::{ConnectionId, EventPusher, PushError, PusherChannel};

    /// An `EventPusher` that records every delivered event for assertions.
    #[derive(Default)]
    pub struct RecordingPusher {
        pub pushes: Mutex<Vec<(ConnectionId, String)>>,
    }

    impl RecordingPusher {
        pub async fn pushes(&self) -> Vec<(ConnectionId, String)> {
            self.pushes.lock().await.clone()
        }
    }

    #[async_trait]
    impl EventPusher for RecordingPusher {
        async fn register(&self, _id: ConnectionId, _sender: PusherChannel) {}

        async fn unregister(&self, _id: &ConnectionId) {}

        async fn send_to(&self, id: &ConnectionId, event_json: &str) -> Result<(), PushError> {
            let mut pushes = self.pushes.lock().await;
            pushes.push((id.clone(), event_json.to_string()));
            Ok(())
        }

        async fn broadcast(&self, targets: Vec<ConnectionId>, event_json: &str) {
            let mut pushes = self.pushes.lock().await;
            for target in targets {
                pushes.push((target, event_json.to_string()));
            }
        }
    }
}
