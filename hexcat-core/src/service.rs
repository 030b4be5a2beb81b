//! Game orchestration: create, move, query
//!
//! Moves on one game id are serialized through a per-game mutex held across
//! load, apply and save. Different games never contend beyond the brief
//! lock-table lookup.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::board::Hex;
use crate::difficulty::Difficulty;
use crate::error::{GameError, Result};
use crate::game::{GameState, GameStatistics};
use crate::repository::{win_rate, GameRepository, InMemoryGameRepository};

/// Smallest playable radius: radius 1 has no interior cell to block
pub const MIN_BOARD_SIZE: i32 = 2;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Largest accepted board radius; bounds pathfinding cost
    pub max_board_size: i32,
    /// Seed for the cat's random moves (None = from entropy)
    pub seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_board_size: 15,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatistics {
    pub total_games: usize,
    pub won_games: usize,
    pub win_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub game_id: String,
    pub score: i64,
    pub date: chrono::DateTime<chrono::Utc>,
}

pub struct GameService<R: GameRepository = InMemoryGameRepository> {
    repository: R,
    config: ServiceConfig,
    locks: Mutex<FxHashMap<String, Arc<Mutex<()>>>>,
    rng: Mutex<ChaCha8Rng>,
}

impl GameService<InMemoryGameRepository> {
    pub fn in_memory(config: ServiceConfig) -> Self {
        Self::new(InMemoryGameRepository::new(), config)
    }

    pub fn list_games(&self, page: usize, size: usize) -> Vec<GameState> {
        self.repository.find_page(page, size)
    }
}

impl<R: GameRepository> GameService<R> {
    pub fn new(repository: R, config: ServiceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            repository,
            config,
            locks: Mutex::new(FxHashMap::default()),
            rng: Mutex::new(rng),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Drop stored games older than `max_age`, returning how many went.
    ///
    /// Each delete holds that game's lock, so a move in flight finishes
    /// before its game goes and a later move sees it as not found.
    pub fn cleanup_older_than(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let expired = self.repository.find_where(&|g| g.created_at() < cutoff);

        let mut removed = 0;
        for game in &expired {
            let lock = self.game_lock(game.id());
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            if self.repository.delete_by_id(game.id()) {
                removed += 1;
            }
        }

        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|id, _| self.repository.exists(id));
        removed
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    pub fn create_game(&self, board_size: i32, difficulty: Difficulty) -> Result<GameState> {
        self.check_board_size(board_size)?;
        let id = uuid::Uuid::new_v4().to_string();
        let state = GameState::new(id, board_size, difficulty);
        self.repository.save(state.clone());

        tracing::info!(
            game = %state.id(),
            board_size,
            difficulty = %difficulty,
            strategy = difficulty.strategy().name(),
            "game created"
        );
        Ok(state)
    }

    /// Block `pos` in game `id` and let the cat reply
    pub fn execute_player_move(&self, id: &str, pos: Hex) -> Result<GameState> {
        if !self.repository.exists(id) {
            return Err(GameError::GameNotFound(id.to_string()));
        }
        let lock = self.game_lock(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut state = self.load(id)?;
        let mut rng = self.turn_rng();
        if let Err(err) = state.apply_player_move(pos, &mut rng) {
            tracing::warn!(game = %id, %pos, "move rejected: {}", err);
            return Err(err);
        }
        if state.is_finished() {
            tracing::info!(
                game = %id,
                status = %state.status(),
                moves = state.move_count(),
                score = state.score(),
                "game over"
            );
        }
        self.repository.save(state.clone());
        Ok(state)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn game_state(&self, id: &str) -> Result<GameState> {
        self.load(id)
    }

    pub fn statistics(&self, id: &str) -> Result<GameStatistics> {
        self.load(id).map(|state| state.statistics())
    }

    pub fn is_valid_move(&self, id: &str, pos: Hex) -> bool {
        self.repository
            .find_by_id(id)
            .map_or(false, |state| state.is_valid_player_move(pos))
    }

    pub fn suggested_move(&self, id: &str) -> Result<Option<Hex>> {
        let state = self.load(id)?;
        Ok(state.suggested_block(&mut self.turn_rng()))
    }

    pub fn player_statistics(&self) -> PlayerStatistics {
        let total = self.repository.count_where(&|_| true);
        let won = self.repository.count_where(&|g| g.has_player_won());
        PlayerStatistics {
            total_games: total,
            won_games: won,
            win_rate: win_rate(won, total),
        }
    }

    /// Best scores first
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut games = self.repository.find_all();
        games.sort_by(|a, b| b.score().cmp(&a.score()).then_with(|| a.created_at().cmp(&b.created_at())));
        games
            .into_iter()
            .take(limit)
            .map(|g| LeaderboardEntry {
                game_id: g.id().to_string(),
                score: g.score(),
                date: g.created_at(),
            })
            .collect()
    }

    pub fn check_board_size(&self, board_size: i32) -> Result<()> {
        if (MIN_BOARD_SIZE..=self.config.max_board_size).contains(&board_size) {
            Ok(())
        } else {
            Err(GameError::InvalidBoardSize(board_size))
        }
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn load(&self, id: &str) -> Result<GameState> {
        self.repository
            .find_by_id(id)
            .ok_or_else(|| GameError::GameNotFound(id.to_string()))
    }

    fn game_lock(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(id.to_string()).or_default().clone()
    }

    /// Fresh generator for one turn, split off the service generator
    fn turn_rng(&self) -> ChaCha8Rng {
        let seed = self.rng.lock().unwrap_or_else(PoisonError::into_inner).gen::<u64>();
        ChaCha8Rng::seed_from_u64(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;
    use std::thread;

    fn service() -> GameService {
        GameService::in_memory(ServiceConfig {
            seed: Some(11),
            ..Default::default()
        })
    }

    #[test]
    fn test_create_game() {
        let svc = service();
        let game = svc.create_game(5, Difficulty::MEDIUM).unwrap();
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.cat_position(), Hex::ORIGIN);
        assert_eq!(svc.game_state(game.id()).unwrap().board_size(), 5);
    }

    #[test]
    fn test_create_rejects_bad_size() {
        let svc = service();
        assert!(matches!(svc.create_game(1, Difficulty::MEDIUM), Err(GameError::InvalidBoardSize(1))));
        assert!(matches!(svc.create_game(99, Difficulty::MEDIUM), Err(GameError::InvalidBoardSize(99))));
    }

    #[test]
    fn test_unknown_game() {
        let svc = service();
        let err = svc.execute_player_move("nope", Hex::new(1, 0)).unwrap_err();
        assert!(matches!(err, GameError::GameNotFound(id) if id == "nope"));
        assert!(svc.statistics("nope").is_err());
        assert!(!svc.is_valid_move("nope", Hex::new(1, 0)));
    }

    #[test]
    fn test_move_is_persisted() {
        let svc = service();
        let game = svc.create_game(5, Difficulty::MEDIUM).unwrap();
        let after = svc.execute_player_move(game.id(), Hex::new(-2, 1)).unwrap();
        let stored = svc.game_state(game.id()).unwrap();
        assert_eq!(stored.move_count(), 1);
        assert_eq!(stored.cat_position(), after.cat_position());
        assert!(stored.board().is_blocked(Hex::new(-2, 1)));
    }

    #[test]
    fn test_rejected_move_leaves_state() {
        let svc = service();
        let game = svc.create_game(5, Difficulty::MEDIUM).unwrap();
        svc.execute_player_move(game.id(), Hex::new(-2, 1)).unwrap();
        let err = svc.execute_player_move(game.id(), Hex::new(-2, 1)).unwrap_err();
        assert!(matches!(err, GameError::InvalidMove { .. }));
        assert_eq!(svc.game_state(game.id()).unwrap().move_count(), 1);
    }

    #[test]
    fn test_suggestion_is_valid() {
        let svc = service();
        let game = svc.create_game(5, Difficulty::HARD).unwrap();
        let suggestion = svc.suggested_move(game.id()).unwrap().unwrap();
        assert_eq!(suggestion, Hex::new(1, 0));
        assert!(svc.is_valid_move(game.id(), suggestion));
    }

    #[test]
    fn test_player_statistics_and_leaderboard() {
        let svc = service();
        let a = svc.create_game(3, Difficulty::MEDIUM).unwrap();
        svc.create_game(4, Difficulty::MEDIUM).unwrap();
        svc.execute_player_move(a.id(), Hex::new(-1, 0)).unwrap();

        let stats = svc.player_statistics();
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.won_games, 0);
        assert_eq!(stats.win_rate, 0.0);

        let board = svc.leaderboard(10);
        assert_eq!(board.len(), 2);
        assert!(board[0].score >= board[1].score);
        assert_eq!(svc.leaderboard(1).len(), 1);
    }

    #[test]
    fn test_concurrent_moves_on_one_game_are_serialized() {
        let svc = Arc::new(service());
        let game = svc.create_game(8, Difficulty::EASY).unwrap();
        let id = game.id().to_string();

        // Every thread tries distinct rim-adjacent cells far from the cat
        let cells: Vec<Hex> = game
            .board()
            .interior_cells()
            .into_iter()
            .filter(|c| c.distance_to(Hex::ORIGIN) == 6)
            .collect();

        let handles: Vec<_> = cells
            .chunks(cells.len() / 4)
            .map(|chunk| {
                let svc = Arc::clone(&svc);
                let id = id.clone();
                let chunk = chunk.to_vec();
                thread::spawn(move || {
                    chunk
                        .into_iter()
                        .filter(|&c| svc.execute_player_move(&id, c).is_ok())
                        .count()
                })
            })
            .collect();
        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        let stored = svc.game_state(&id).unwrap();
        assert_eq!(stored.move_count() as usize, accepted);
        assert_eq!(stored.board().blocked_count(), accepted);
    }

    #[test]
    fn test_cleanup_waits_for_move_in_flight() {
        let svc = Arc::new(service());
        let game = svc.create_game(3, Difficulty::MEDIUM).unwrap();
        let id = game.id().to_string();

        // Stand in for a move holding the game's lock
        let lock = svc.game_lock(&id);
        let guard = lock.lock().unwrap();

        let cleaner = {
            let svc = Arc::clone(&svc);
            thread::spawn(move || svc.cleanup_older_than(Duration::seconds(-1)))
        };
        thread::sleep(std::time::Duration::from_millis(50));
        assert!(svc.repository().exists(&id));

        drop(guard);
        assert_eq!(cleaner.join().unwrap(), 1);
        assert!(!svc.repository().exists(&id));

        // The purged game is gone for good
        let err = svc.execute_player_move(&id, Hex::new(-1, 0)).unwrap_err();
        assert!(matches!(err, GameError::GameNotFound(_)));
        assert!(!svc.repository().exists(&id));
    }

    #[test]
    fn test_cleanup() {
        let svc = service();
        svc.create_game(3, Difficulty::MEDIUM).unwrap();
        assert_eq!(svc.cleanup_older_than(Duration::hours(1)), 0);
        assert_eq!(svc.cleanup_older_than(Duration::seconds(-1)), 1);
        assert!(svc.list_games(0, 10).is_empty());
    }
}
