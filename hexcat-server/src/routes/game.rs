//! Game API routes: start, block, inspect

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use hexcat_core::{
    Difficulty, GameRecord, GameState, GameStatistics, Hex, LeaderboardEntry, PlayerStatistics,
};
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use crate::state::ServerState;

const DEFAULT_PAGE_SIZE: usize = 20;
const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Game snapshot as sent to clients; `score` appears once the game is over
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    #[serde(flatten)]
    pub record: GameRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

impl From<&GameState> for GameResponse {
    fn from(game: &GameState) -> Self {
        Self {
            record: GameRecord::from(game),
            score: game.is_finished().then(|| game.score()),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartQuery {
    pub board_size: Option<i32>,
    /// Level number or named tier
    pub difficulty: Option<String>,
}

/// Start a new game
pub async fn start_game(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<StartQuery>,
) -> ApiResult<Json<GameResponse>> {
    let board_size = query.board_size.unwrap_or(state.default_board_size);
    let difficulty = match query.difficulty.as_deref() {
        Some(raw) => raw.parse::<Difficulty>()?,
        None => Difficulty::default(),
    };
    let game = state.games.create_game(board_size, difficulty)?;
    Ok(Json(GameResponse::from(&game)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockQuery {
    pub game_id: String,
    pub q: i32,
    pub r: i32,
}

/// Block a cell; the response carries the cat's reply
pub async fn block_cell(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<BlockQuery>,
) -> ApiResult<Json<GameResponse>> {
    let game = state
        .games
        .execute_player_move(&query.game_id, Hex::new(query.q, query.r))?;
    Ok(Json(GameResponse::from(&game)))
}

pub async fn get_game_state(
    State(state): State<Arc<ServerState>>,
    Path(game_id): Path<String>,
) -> ApiResult<Json<GameResponse>> {
    let game = state.games.game_state(&game_id)?;
    Ok(Json(GameResponse::from(&game)))
}

pub async fn get_statistics(
    State(state): State<Arc<ServerState>>,
    Path(game_id): Path<String>,
) -> ApiResult<Json<GameStatistics>> {
    Ok(Json(state.games.statistics(&game_id)?))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub game_id: String,
    pub suggestion: Option<Hex>,
}

/// Cell worth blocking next, `null` once the game is over
pub async fn get_suggestion(
    State(state): State<Arc<ServerState>>,
    Path(game_id): Path<String>,
) -> ApiResult<Json<SuggestionResponse>> {
    let suggestion = state.games.suggested_move(&game_id)?;
    Ok(Json(SuggestionResponse { game_id, suggestion }))
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
}

pub async fn list_games(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PageQuery>,
) -> Json<Vec<GameResponse>> {
    let games = state
        .games
        .list_games(query.page.unwrap_or(0), query.size.unwrap_or(DEFAULT_PAGE_SIZE));
    Json(games.iter().map(GameResponse::from).collect())
}

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

impl LimitQuery {
    pub fn limit_or_default(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
    }
}

pub async fn get_leaderboard(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<LeaderboardEntry>> {
    Json(state.games.leaderboard(query.limit_or_default()))
}

pub async fn get_player_stats(State(state): State<Arc<ServerState>>) -> Json<PlayerStatistics> {
    Json(state.games.player_statistics())
}
