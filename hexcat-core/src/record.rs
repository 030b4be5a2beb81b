//! Serializable snapshot of a game, for storage and transport

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Hex};
use crate::difficulty::Difficulty;
use crate::error::GameError;
use crate::game::{GameState, GameStatus};

/// Flat game snapshot.
///
/// Restoring one reproduces the board, cat position and status exactly.
/// Status is stored rather than recomputed because it records how the game
/// ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_id: String,
    pub cat_position: Hex,
    pub blocked_cells: Vec<Hex>,
    pub status: GameStatus,
    pub move_count: u32,
    pub board_size: i32,
    pub difficulty: Difficulty,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl From<&GameState> for GameRecord {
    fn from(state: &GameState) -> Self {
        Self {
            game_id: state.id().to_string(),
            cat_position: state.cat_position(),
            blocked_cells: state.board().blocked_cells(),
            status: state.status(),
            move_count: state.move_count(),
            board_size: state.board_size(),
            difficulty: state.difficulty(),
            created_at: state.created_at(),
        }
    }
}

impl TryFrom<GameRecord> for GameState {
    type Error = GameError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        if record.board_size <= 0 {
            return Err(GameError::InvalidRecord(format!(
                "board size must be positive, got {}",
                record.board_size
            )));
        }
        let mut board = Board::new(record.board_size);
        if !board.is_in_bounds(record.cat_position) {
            return Err(GameError::InvalidRecord(format!(
                "cat position {} is off the board",
                record.cat_position
            )));
        }
        for cell in record.blocked_cells {
            if !board.is_in_bounds(cell) {
                return Err(GameError::InvalidRecord(format!("blocked cell {cell} is off the board")));
            }
            board.restore_blocked(cell);
        }
        if board.is_blocked(record.cat_position) {
            return Err(GameError::InvalidRecord(format!(
                "cat position {} is a blocked cell",
                record.cat_position
            )));
        }

        Ok(GameState::from_parts(
            record.game_id,
            board,
            record.cat_position,
            record.move_count,
            record.status,
            record.difficulty,
            record.created_at,
        ))
    }
}

impl GameRecord {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
