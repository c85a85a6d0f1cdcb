//! Use case: read live matchmaking counts for the health endpoint.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{MatchStats, Matchmaker};

pub struct GetStatsUseCase {
    matchmaker: Arc<Mutex<Matchmaker>>,
}

impl GetStatsUseCase {
    pub fn new(matchmaker: Arc<Mutex<Matchmaker>>) -> Self {
        Self { matchmaker }
    }

    pub async fn execute(&self) -> MatchStats {
        let matchmaker = self.matchmaker.lock().await;
        matchmaker.stats()
    }
}
