//! WebSocket event protocol.
//!
//! One JSON object per text frame, discriminated by a `type` field. Signaling
//! payloads are opaque JSON passed through verbatim; the server routes them
//! without interpreting offer/answer/candidate semantics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Enter matchmaking.
    JoinQueue,
    /// Send chat text to the room partner.
    #[serde(rename_all = "camelCase")]
    SendMessage { room_id: String, message: String },
    /// End the session.
    #[serde(rename_all = "camelCase")]
    LeaveRoom { room_id: String },
    /// Relay an opaque signaling payload to the room partner.
    #[serde(rename_all = "camelCase")]
    VideoSignal { room_id: String, signal: Value },
}

/// Events the server pushes to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// No partner yet; the connection occupies the waiting slot.
    Waiting { status: String },
    /// Paired; the session begins.
    #[serde(rename_all = "camelCase")]
    StartChat { room_id: String },
    /// The partner sent a chat message.
    ReceiveMessage { sender: String, message: String },
    /// The partner left or disconnected; the session is over.
    EndChat,
    /// The partner's signaling payload.
    VideoSignal { sender: String, signal: Value },
}

impl ServerEvent {
    pub fn waiting() -> Self {
        Self::Waiting {
            status: "Searching for a partner...".to_string(),
        }
    }
}
