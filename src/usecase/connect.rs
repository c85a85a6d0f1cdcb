//! Use case: a new connection is established.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, Matchmaker, PusherChannel};

/// Registers a freshly accepted connection with the delivery registry and the
/// matchmaking aggregate. The connection starts idle: it is not queued and
/// belongs to no room until it asks to join.
pub struct ConnectUseCase {
    matchmaker: Arc<Mutex<Matchmaker>>,
    pusher: Arc<dyn EventPusher>,
}

impl ConnectUseCase {
    pub fn new(matchmaker: Arc<Mutex<Matchmaker>>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { matchmaker, pusher }
    }

    pub async fn execute(&self, id: ConnectionId, sender: PusherChannel) {
        self.pusher.register(id.clone(), sender).await;
        {
            let mut matchmaker = self.matchmaker.lock().await;
            matchmaker.register(id.clone());
        }
        tracing::info!("connection '{}' established", id);
    }
}
