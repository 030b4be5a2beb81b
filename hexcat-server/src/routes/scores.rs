//! Saved score endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use hexcat_core::ScoreEntry;
use serde::Deserialize;

use super::error::ApiResult;
use super::game::LimitQuery;
use crate::state::ServerState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveScoreQuery {
    pub game_id: String,
    pub player_name: String,
}

/// Record a score for an existing game under a player name
pub async fn save_score(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SaveScoreQuery>,
) -> ApiResult<Json<ScoreEntry>> {
    let game = state.games.game_state(&query.game_id)?;
    let entry = ScoreEntry::from_game(&game, query.player_name.trim());
    state.scores.record(entry.clone());

    tracing::info!(game = %entry.game_id, player = %entry.player_name, "score saved");
    Ok(Json(entry))
}

pub async fn high_scores(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<ScoreEntry>> {
    Json(state.scores.high_scores(query.limit_or_default()))
}

pub async fn winning_scores(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<ScoreEntry>> {
    Json(state.scores.winning_scores(query.limit_or_default()))
}

pub async fn recent_scores(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<ScoreEntry>> {
    Json(state.scores.recent_scores(query.limit_or_default()))
}
