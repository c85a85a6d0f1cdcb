//! DTOs for the read-only monitoring endpoints.

use serde::Serialize;

use crate::domain::MatchStats;

/// Response body for `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: String,
    pub connections: usize,
    pub rooms: usize,
    pub waiting: bool,
}

impl From<MatchStats> for HealthDto {
    fn from(stats: MatchStats) -> Self {
        Self {
            status: "ok".to_string(),
            connections: stats.connections,
            rooms: stats.rooms,
            waiting: stats.waiting,
        }
    }
}
