//! Use case: a member ends its session.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, Matchmaker, RoomId};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::encode;

/// Tears the room down at a member's request: both members are notified of
/// session end, the room is removed and its history discarded, and both
/// connections return to idle. Requests naming a room the caller is not a
/// member of, or one that no longer exists, are no-ops.
pub struct LeaveRoomUseCase {
    matchmaker: Arc<Mutex<Matchmaker>>,
    pusher: Arc<dyn EventPusher>,
}

impl LeaveRoomUseCase {
    pub fn new(matchmaker: Arc<Mutex<Matchmaker>>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { matchmaker, pusher }
    }

    pub async fn execute(&self, caller: &ConnectionId, room_id: String) {
        let room_id = RoomId::new(room_id);
        let members = {
            let mut matchmaker = self.matchmaker.lock().await;
            matchmaker.leave_room(&room_id, caller)
        };

        match members {
            Some(members) => {
                tracing::info!("room '{}' closed by '{}'", room_id, caller);
                if let Some(json) = encode(&ServerEvent::EndChat) {
                    self.pusher.broadcast(members.to_vec(), &json).await;
                }
            }
            None => {
                tracing::debug!(
                    "ignoring leaveRoom from '{}' for stale or foreign room '{}'",
                    caller,
                    room_id
                );
            }
        }
    }
}
