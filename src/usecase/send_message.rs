//! Use case: relay chat text to the room partner.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::common::time::now_millis;
use crate::domain::{ConnectionId, EventPusher, Matchmaker, RoomId};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::push;

/// Validates room membership, appends the message to the room history and
/// relays it to the other member. The sender's own echo is a client concern;
/// the server delivers to the partner only. Stale room ids and non-members
/// are dropped silently.
pub struct SendMessageUseCase {
    matchmaker: Arc<Mutex<Matchmaker>>,
    pusher: Arc<dyn EventPusher>,
}

impl SendMessageUseCase {
    pub fn new(matchmaker: Arc<Mutex<Matchmaker>>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { matchmaker, pusher }
    }

    pub async fn execute(&self, sender: &ConnectionId, room_id: String, message: String) {
        let room_id = RoomId::new(room_id);
        let target = {
            let mut matchmaker = self.matchmaker.lock().await;
            matchmaker.append_message(&room_id, sender, &message, now_millis())
        };

        match target {
            Some(partner) => {
                tracing::debug!("relaying message in '{}' from '{}'", room_id, sender);
                let event = ServerEvent::ReceiveMessage {
                    sender: sender.as_str().to_string(),
                    message,
                };
                push(self.pusher.as_ref(), &partner, &event).await;
            }
            None => {
                tracing::debug!(
                    "dropping message from '{}' for stale or foreign room '{}'",
                    sender,
                    room_id
                );
            }
        }
    }
}
