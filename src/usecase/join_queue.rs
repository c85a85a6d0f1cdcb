//! Use case: a connection enters matchmaking.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::common::time::now_millis;
use crate::domain::{ConnectionId, EventPusher, JoinOutcome, Matchmaker};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::{encode, push};

/// Runs the pairing transition and notifies the affected connections.
///
/// The first idle caller occupies the waiting slot and is told to wait; the
/// next one is paired with it, and both receive `startChat` carrying the
/// shared room id. Duplicate requests are idempotent no-ops.
pub struct JoinQueueUseCase {
    matchmaker: Arc<Mutex<Matchmaker>>,
    pusher: Arc<dyn EventPusher>,
}

impl JoinQueueUseCase {
    pub fn new(matchmaker: Arc<Mutex<Matchmaker>>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { matchmaker, pusher }
    }

    pub async fn execute(&self, id: &ConnectionId) {
        let outcome = {
            let mut matchmaker = self.matchmaker.lock().await;
            matchmaker.join_queue(id, now_millis())
        };

        match outcome {
            JoinOutcome::Waiting => {
                tracing::info!("connection '{}' is waiting for a partner", id);
                push(self.pusher.as_ref(), id, &ServerEvent::waiting()).await;
            }
            JoinOutcome::Paired { room_id, partner } => {
                tracing::info!(
                    "room '{}' created for '{}' and '{}'",
                    room_id,
                    partner,
                    id
                );
                let event = ServerEvent::StartChat {
                    room_id: room_id.as_str().to_string(),
                };
                if let Some(json) = encode(&event) {
                    self.pusher
                        .broadcast(vec![partner, id.clone()], &json)
                        .await;
                }
            }
            JoinOutcome::AlreadyWaiting | JoinOutcome::AlreadyInRoom => {
                tracing::debug!("duplicate joinQueue from '{}' ignored", id);
            }
            JoinOutcome::UnknownConnection => {
                tracing::warn!("joinQueue from unregistered connection '{}' ignored", id);
            }
        }
    }
}
