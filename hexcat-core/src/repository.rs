//! Game storage seam and the in-memory implementation

use std::sync::{PoisonError, RwLock};

use chrono::{Duration, Utc};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::game::GameState;

/// Storage for game states, keyed by game id.
///
/// Implementations must be safe to share between threads; the service only
/// needs `find_by_id`, `save` and `find_where`.
pub trait GameRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> Option<GameState>;

    /// Insert or replace by id
    fn save(&self, state: GameState);

    fn find_where(&self, predicate: &dyn Fn(&GameState) -> bool) -> Vec<GameState>;

    fn delete_by_id(&self, id: &str) -> bool;

    fn delete_where(&self, predicate: &dyn Fn(&GameState) -> bool) -> usize;

    fn find_all(&self) -> Vec<GameState> {
        self.find_where(&|_| true)
    }

    fn count_where(&self, predicate: &dyn Fn(&GameState) -> bool) -> usize {
        self.find_where(predicate).len()
    }

    fn exists(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }
}

/// Aggregate counts over stored games
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStats {
    pub total_games: usize,
    pub finished_games: usize,
    pub won_games: usize,
    pub in_progress_games: usize,
    /// Percentage of all stored games the player won
    pub win_rate: f64,
}

#[derive(Default)]
pub struct InMemoryGameRepository {
    games: RwLock<FxHashMap<String, GameState>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// One page of games, oldest first. Pages are zero-based.
    pub fn find_page(&self, page: usize, size: usize) -> Vec<GameState> {
        if size == 0 {
            return Vec::new();
        }
        let mut all = self.find_all();
        all.sort_by(|a, b| a.created_at().cmp(&b.created_at()).then_with(|| a.id().cmp(b.id())));
        all.into_iter().skip(page.saturating_mul(size)).take(size).collect()
    }

    pub fn repository_stats(&self) -> RepositoryStats {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        let total = games.len();
        let finished = games.values().filter(|g| g.is_finished()).count();
        let won = games.values().filter(|g| g.has_player_won()).count();
        RepositoryStats {
            total_games: total,
            finished_games: finished,
            won_games: won,
            in_progress_games: total - finished,
            win_rate: win_rate(won, total),
        }
    }

    /// Drop games created more than `max_age` ago
    pub fn cleanup_older_than(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        self.delete_where(&|g| g.created_at() < cutoff)
    }

    pub fn len(&self) -> usize {
        self.games.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GameRepository for InMemoryGameRepository {
    fn find_by_id(&self, id: &str) -> Option<GameState> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games.get(id).cloned()
    }

    fn save(&self, state: GameState) {
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        games.insert(state.id().to_string(), state);
    }

    fn find_where(&self, predicate: &dyn Fn(&GameState) -> bool) -> Vec<GameState> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games.values().filter(|g| predicate(g)).cloned().collect()
    }

    fn delete_by_id(&self, id: &str) -> bool {
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        games.remove(id).is_some()
    }

    fn delete_where(&self, predicate: &dyn Fn(&GameState) -> bool) -> usize {
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        let before = games.len();
        games.retain(|_, g| !predicate(g));
        before - games.len()
    }
}

pub(crate) fn win_rate(won: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        won as f64 / total as f64 * 100.0
    }
}
