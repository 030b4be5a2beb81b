//! Board geometry endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use hexcat_core::{Board, Hex, DIRECTIONS};
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use crate::state::ServerState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardQuery {
    pub board_size: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardInfo {
    pub board_size: i32,
    pub cells: Vec<Hex>,
    pub border_cells: Vec<Hex>,
    /// Neighbour offsets in the order the cat breaks ties
    pub directions: Vec<[i32; 2]>,
}

/// Get the cells of an empty board of the requested radius
pub async fn get_board(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Json<BoardInfo>> {
    let board_size = query.board_size.unwrap_or(state.default_board_size);
    state.games.check_board_size(board_size)?;

    let board = Board::new(board_size);
    Ok(Json(BoardInfo {
        board_size,
        cells: board.cells(),
        border_cells: board.border_cells(),
        directions: DIRECTIONS.iter().map(|&(dq, dr)| [dq, dr]).collect(),
    }))
}
