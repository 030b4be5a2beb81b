//! Difficulty tiers and the strategy each one drives

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Hex};
use crate::error::GameError;
use crate::strategy::Strategy;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;

/// Difficulty level, 1 (easiest) to 10
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const EASY: Difficulty = Difficulty(2);
    pub const MEDIUM: Difficulty = Difficulty(5);
    pub const HARD: Difficulty = Difficulty(9);

    pub fn new(level: u8) -> Result<Self, GameError> {
        if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&level) {
            Ok(Self(level))
        } else {
            Err(GameError::InvalidDifficulty(level.to_string()))
        }
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Strategy that moves the cat at this tier
    pub fn strategy(&self) -> Strategy {
        match self.0 {
            0..=4 => Strategy::Random,
            5..=7 => Strategy::Bfs,
            _ => Strategy::AStar,
        }
    }

    /// Explicit escape target for tiers that search toward one
    pub fn target(&self, board: &Board) -> Option<Hex> {
        match self.strategy() {
            Strategy::AStar => Some(Hex::new(board.radius(), 0)),
            Strategy::Random | Strategy::Bfs => None,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::MEDIUM
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = GameError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Difficulty::new(level)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    /// Accepts a level number or one of `easy`, `medium`, `hard`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::EASY),
            "medium" => Ok(Difficulty::MEDIUM),
            "hard" => Ok(Difficulty::HARD),
            other => other
                .parse::<u8>()
                .map_err(|_| GameError::InvalidDifficulty(trimmed.to_string()))
                .and_then(Difficulty::new),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
