//! Use case: relay an opaque signaling payload to the room partner.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, Matchmaker, RoomId};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::push;

/// Relays a signaling blob verbatim to the other room member, annotated with
/// the sender's id. The payload is never interpreted: offer/answer/candidate
/// semantics belong to the peers' own negotiation, and media never touches
/// the server. Membership rules match chat relay; nothing is recorded.
pub struct RelaySignalUseCase {
    matchmaker: Arc<Mutex<Matchmaker>>,
    pusher: Arc<dyn EventPusher>,
}

impl RelaySignalUseCase {
    pub fn new(matchmaker: Arc<Mutex<Matchmaker>>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { matchmaker, pusher }
    }

    pub async fn execute(&self, sender: &ConnectionId, room_id: String, signal: Value) {
        let room_id = RoomId::new(room_id);
        let target = {
            let matchmaker = self.matchmaker.lock().await;
            matchmaker.signal_target(&room_id, sender)
        };

        match target {
            Some(partner) => {
                let event = ServerEvent::VideoSignal {
                    sender: sender.as_str().to_string(),
                    signal,
                };
                push(self.pusher.as_ref(), &partner, &event).await;
            }
            None => {
                tracing::debug!(
                    "dropping signal from '{}' for stale or foreign room '{}'",
                    sender,
                    room_id
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JoinOutcome, MockEventPusher};
    use mockall::predicate;
    use serde_json::json;

    fn conn(name: &str) -> ConnectionId {
        ConnectionId::new(name.to_string())
    }

    fn paired_matchmaker() -> (Matchmaker, RoomId) {
        let mut mm = Matchmaker::new();
        for name in ["x", "y"] {
            mm.register(conn(name));
        }
        mm.join_queue(&conn("x"), 0);
        let JoinOutcome::Paired { room_id, .. } = mm.join_queue(&conn("y"), 0) else {
            panic!("pairing failed");
        };
        (mm, room_id)
    }

    #[tokio::test]
    async fn test_signal_is_relayed_verbatim_to_the_partner() {
        // given:
        let (mm, room_id) = paired_matchmaker();
        let mut pusher = MockEventPusher::new();
        pusher
            .expect_send_to()
            .with(
                predicate::eq(conn("y")),
                predicate::function(|json: &str| {
                    let event: serde_json::Value = serde_json::from_str(json).unwrap();
                    event["type"] == "videoSignal"
                        && event["sender"] == "x"
                        && event["signal"] == json!({"sdp": "v=0"})
                }),
            )
            .once()
            .returning(|_, _| Ok(()));
        let usecase = RelaySignalUseCase::new(Arc::new(Mutex::new(mm)), Arc::new(pusher));

        // when:
        usecase
            .execute(&conn("x"), room_id.as_str().to_string(), json!({"sdp": "v=0"}))
            .await;
    }

    #[tokio::test]
    async fn test_signal_for_stale_room_is_dropped() {
        // given: no expectations; any push would fail the test
        let (mm, _room_id) = paired_matchmaker();
        let pusher = MockEventPusher::new();
        let usecase = RelaySignalUseCase::new(Arc::new(Mutex::new(mm)), Arc::new(pusher));

        // when:
        usecase
            .execute(&conn("x"), "room-gone".to_string(), json!({}))
            .await;
    }
}
