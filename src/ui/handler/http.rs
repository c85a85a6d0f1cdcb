//! Read-only HTTP endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::infrastructure::dto::http::HealthDto;

use super::super::state::AppState;

/// Health check endpoint with live matchmaking counts.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let stats = state.get_stats_usecase.execute().await;
    Json(stats.into())
}
