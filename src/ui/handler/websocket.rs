//! WebSocket connection handler.
//!
//! Each accepted socket gets a server-assigned connection id and an unbounded
//! outbound channel. Two tasks pump the socket: one reads inbound frames and
//! dispatches them to the use cases, the other forwards pushed events from
//! the channel into the socket. When either side ends, the connection is
//! disconnected, which also tears down any room it was in.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, ConnectionIdFactory};
use crate::infrastructure::dto::websocket::ClientEvent;

use super::super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionIdFactory::generate();

    // Channel the registry pushes outbound events through
    let (tx, mut rx) = mpsc::unbounded_channel();
    state
        .connect_usecase
        .execute(connection_id.clone(), tx)
        .await;

    let (mut sender, mut receiver) = socket.split();

    let recv_state = state.clone();
    let recv_connection_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!(
                        "websocket error on '{}': {}",
                        recv_connection_id,
                        e
                    );
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch(&recv_state, &recv_connection_id, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::debug!("connection '{}' requested close", recv_connection_id);
                    break;
                }
                // Ping/pong is handled by the protocol layer; binary frames
                // are not part of the event protocol.
                _ => {}
            }
        }
    });

    let mut send_task = tokio::spawn(async move {
        while let Some(event_json) = rx.recv().await {
            if sender.send(Message::Text(event_json.into())).await.is_err() {
                break;
            }
        }
    });

    // If either task completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.disconnect_usecase.execute(&connection_id).await;
}

/// Parse one inbound frame and route it to its use case. Malformed frames
/// are logged and ignored; no client input is ever fatal.
async fn dispatch(state: &AppState, connection_id: &ConnectionId, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::JoinQueue) => {
            state.join_queue_usecase.execute(connection_id).await;
        }
        Ok(ClientEvent::SendMessage { room_id, message }) => {
            state
                .send_message_usecase
                .execute(connection_id, room_id, message)
                .await;
        }
        Ok(ClientEvent::LeaveRoom { room_id }) => {
            state
                .leave_room_usecase
                .execute(connection_id, room_id)
                .await;
        }
        Ok(ClientEvent::VideoSignal { room_id, signal }) => {
            state
                .relay_signal_usecase
                .execute(connection_id, room_id, signal)
                .await;
        }
        Err(e) => {
            tracing::warn!(
                "ignoring malformed frame from '{}': {}",
                connection_id,
                e
            );
        }
    }
}
