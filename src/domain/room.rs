//! Room entity: one active two-party session.

use serde::Serialize;

use super::{ConnectionId, RoomId};

/// One chat record in a room's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRecord {
    pub sender: ConnectionId,
    pub message: String,
    /// Unix timestamp in milliseconds (UTC).
    pub sent_at: i64,
}

/// An active two-party session.
///
/// A room is created atomically when two connections are paired and always
/// has exactly two members for its entire lifetime; it is destroyed whole
/// when either member leaves or disconnects, and its history is discarded
/// with it. Room ids are never reused.
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub members: [ConnectionId; 2],
    pub history: Vec<ChatRecord>,
    /// Unix timestamp in milliseconds (UTC).
    pub created_at: i64,
}

impl Room {
    pub fn new(id: RoomId, members: [ConnectionId; 2], created_at: i64) -> Self {
        Self {
            id,
            members,
            history: Vec::new(),
            created_at,
        }
    }

    pub fn is_member(&self, id: &ConnectionId) -> bool {
        self.members.iter().any(|m| m == id)
    }

    /// The other member of the room, or `None` if `id` is not a member.
    pub fn partner_of(&self, id: &ConnectionId) -> Option<&ConnectionId> {
        match &self.members {
            [a, b] if a == id => Some(b),
            [a, b] if b == id => Some(a),
            _ => None,
        }
    }

    /// Append a chat record to the room history.
    pub fn append(&mut self, record: ChatRecord) {
        self.history.push(record);
    }
}
