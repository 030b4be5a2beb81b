//! Saved player scores

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::GameState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub game_id: String,
    pub player_name: String,
    pub moves_count: u32,
    pub board_size: i32,
    pub timestamp: DateTime<Utc>,
    pub player_won: bool,
}

impl ScoreEntry {
    pub fn from_game(game: &GameState, player_name: impl Into<String>) -> Self {
        Self {
            game_id: game.id().to_string(),
            player_name: player_name.into(),
            moves_count: game.move_count(),
            board_size: game.board_size(),
            timestamp: Utc::now(),
            player_won: game.has_player_won(),
        }
    }
}

/// Append-only list of saved scores
#[derive(Default)]
pub struct ScoreBoard {
    entries: RwLock<Vec<ScoreEntry>>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: ScoreEntry) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Fewest moves first
    pub fn high_scores(&self, limit: usize) -> Vec<ScoreEntry> {
        let mut entries = self.snapshot();
        entries.sort_by_key(|e| e.moves_count);
        entries.truncate(limit);
        entries
    }

    /// Won games only, fewest moves first
    pub fn winning_scores(&self, limit: usize) -> Vec<ScoreEntry> {
        let mut entries: Vec<ScoreEntry> = self.snapshot().into_iter().filter(|e| e.player_won).collect();
        entries.sort_by_key(|e| e.moves_count);
        entries.truncate(limit);
        entries
    }

    /// Newest first
    pub fn recent_scores(&self, limit: usize) -> Vec<ScoreEntry> {
        let mut entries = self.snapshot();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<ScoreEntry> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
