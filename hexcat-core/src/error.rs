//! Engine error types

use crate::board::Hex;
use crate::game::GameStatus;

/// Why a block request was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidMoveReason {
    CatCell,
    OutOfBounds,
    Border,
    AlreadyBlocked,
}

impl std::fmt::Display for InvalidMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            InvalidMoveReason::CatCell => "cell is occupied by the cat",
            InvalidMoveReason::OutOfBounds => "cell is outside the board",
            InvalidMoveReason::Border => "border cells cannot be blocked",
            InvalidMoveReason::AlreadyBlocked => "cell is already blocked",
        };
        f.write_str(text)
    }
}

/// Errors raised by the engine and the game service.
///
/// All of them are deterministic in the request and the current state, so
/// none are retried.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Invalid move at {pos}: {reason}")]
    InvalidMove { pos: Hex, reason: InvalidMoveReason },

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("Game is already over ({0})")]
    GameTerminal(GameStatus),

    #[error("Invalid board size: {0}")]
    InvalidBoardSize(i32),

    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),

    #[error("Invalid game record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
