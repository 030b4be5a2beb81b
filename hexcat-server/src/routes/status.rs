//! Liveness endpoint with a count of stored games

use std::sync::Arc;

use axum::{extract::State, Json};
use hexcat_core::RepositoryStats;
use serde::Serialize;

use crate::state::ServerState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub games: RepositoryStats,
}

pub async fn status_handler(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        games: state.games.repository().repository_stats(),
    })
}
