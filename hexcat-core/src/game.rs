//! Game state and turn processing

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Hex};
use crate::difficulty::Difficulty;
use crate::error::{GameError, InvalidMoveReason, Result};
use crate::strategy::bfs;

// ============================================================================
// CONSTANTS
// ============================================================================

const WIN_BASE: i64 = 1000;
const WIN_MOVE_PENALTY: i64 = 10;
const WIN_RADIUS_BONUS: i64 = 50;
const LOSS_BASE: i64 = 100;
const LOSS_MOVE_PENALTY: i64 = 5;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game status from the human player's point of view.
///
/// The player wins by trapping the cat. The cat reaching the rim is a loss
/// for the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    InProgress,
    PlayerWon,
    PlayerLost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::InProgress => "IN_PROGRESS",
            GameStatus::PlayerWon => "PLAYER_WON",
            GameStatus::PlayerLost => "PLAYER_LOST",
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one accepted player move led to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    pub blocked: Hex,
    pub cat_move: Option<Hex>,
    pub status: GameStatus,
}

/// Read-only summary of a game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatistics {
    pub game_id: String,
    pub board_size: i32,
    pub moves: u32,
    pub status: GameStatus,
    pub blocked_cells: usize,
    pub score: i64,
    pub cat_position: Hex,
    /// Steps from the cat to the nearest reachable rim cell
    pub escape_distance: Option<u32>,
    pub difficulty: Difficulty,
    pub strategy: String,
}

// ============================================================================
// GAME STATE
// ============================================================================

#[derive(Clone, Debug)]
pub struct GameState {
    id: String,
    board: Board,
    cat: Hex,
    move_count: u32,
    status: GameStatus,
    difficulty: Difficulty,
    created_at: DateTime<Utc>,
}

impl GameState {
    /// Fresh game: empty board, cat at the origin
    pub fn new(id: impl Into<String>, radius: i32, difficulty: Difficulty) -> Self {
        Self {
            id: id.into(),
            board: Board::new(radius),
            cat: Hex::ORIGIN,
            move_count: 0,
            status: GameStatus::InProgress,
            difficulty,
            created_at: Utc::now(),
        }
    }

    /// Rebuild from stored parts. Status is taken as given, not recomputed.
    pub(crate) fn from_parts(
        id: String,
        board: Board,
        cat: Hex,
        move_count: u32,
        status: GameStatus,
        difficulty: Difficulty,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            board,
            cat,
            move_count,
            status,
            difficulty,
            created_at,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cat_position(&self) -> Hex {
        self.cat
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn board_size(&self) -> i32 {
        self.board.radius()
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn has_player_won(&self) -> bool {
        self.status == GameStatus::PlayerWon
    }

    // ========================================================================
    // MOVE VALIDATION
    // ========================================================================

    /// Check a block request without applying it
    pub fn can_execute_move(&self, pos: Hex) -> Result<()> {
        if self.is_finished() {
            return Err(GameError::GameTerminal(self.status));
        }
        if pos == self.cat {
            return Err(GameError::InvalidMove {
                pos,
                reason: InvalidMoveReason::CatCell,
            });
        }
        match self.board.reject_reason(pos) {
            Some(reason) => Err(GameError::InvalidMove { pos, reason }),
            None => Ok(()),
        }
    }

    pub fn is_valid_player_move(&self, pos: Hex) -> bool {
        self.can_execute_move(pos).is_ok()
    }

    // ========================================================================
    // TURN PROCESSING
    // ========================================================================

    /// Block `pos`, then let the cat reply.
    ///
    /// On error nothing changes.
    pub fn apply_player_move<R: Rng + ?Sized>(&mut self, pos: Hex, rng: &mut R) -> Result<TurnOutcome> {
        self.can_execute_move(pos)?;

        self.board.block(pos)?;
        self.move_count += 1;
        self.update_status();

        let mut cat_move = None;
        if !self.is_finished() {
            cat_move = self.predicted_cat_move(rng);
            if let Some(step) = cat_move {
                self.cat = step;
                self.update_status();
            }
        }

        tracing::debug!(
            game = %self.id,
            blocked = %pos,
            cat = %self.cat,
            status = %self.status,
            "turn applied"
        );

        Ok(TurnOutcome {
            blocked: pos,
            cat_move,
            status: self.status,
        })
    }

    /// The step the cat would take right now, without taking it
    pub fn predicted_cat_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Hex> {
        let strategy = self.difficulty.strategy();
        let target = self.difficulty.target(&self.board);
        strategy.select_move(&self.board, self.cat, target, rng)
    }

    /// A cell worth blocking: where the cat would step next, or failing
    /// that the first open neighbour of the cat. None once the game is over.
    pub fn suggested_block<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Hex> {
        if self.is_finished() {
            return None;
        }
        self.predicted_cat_move(rng)
            .filter(|&pos| self.board.is_valid_move(pos))
            .or_else(|| {
                self.board
                    .adjacent_positions(self.cat)
                    .into_iter()
                    .find(|&pos| self.board.is_valid_move(pos))
            })
    }

    /// Escaped beats trapped: a cat on the rim has already won.
    fn update_status(&mut self) {
        self.status = if self.is_cat_at_border() {
            GameStatus::PlayerLost
        } else if self.is_cat_trapped() {
            GameStatus::PlayerWon
        } else {
            GameStatus::InProgress
        };
    }

    fn is_cat_at_border(&self) -> bool {
        self.board.is_at_border(self.cat)
    }

    /// Every neighbour is blocked or off the board
    fn is_cat_trapped(&self) -> bool {
        self.board.adjacent_positions(self.cat).is_empty()
    }

    // ========================================================================
    // SCORING
    // ========================================================================

    pub fn score(&self) -> i64 {
        let moves = i64::from(self.move_count);
        if self.has_player_won() {
            (WIN_BASE - WIN_MOVE_PENALTY * moves + WIN_RADIUS_BONUS * i64::from(self.board_size())).max(0)
        } else {
            (LOSS_BASE - LOSS_MOVE_PENALTY * moves).max(0)
        }
    }

    pub fn statistics(&self) -> GameStatistics {
        GameStatistics {
            game_id: self.id.clone(),
            board_size: self.board_size(),
            moves: self.move_count,
            status: self.status,
            blocked_cells: self.board.blocked_count(),
            score: self.score(),
            cat_position: self.cat,
            escape_distance: bfs::escape_distance(&self.board, self.cat),
            difficulty: self.difficulty,
            strategy: self.difficulty.strategy().name().to_string(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    /// Game on a board where all but `open` neighbours of the origin are blocked
    fn walled_game(radius: i32, difficulty: Difficulty, open: &[Hex], moves: u32) -> GameState {
        let mut board = Board::new(radius);
        for cell in Hex::ORIGIN.neighbors() {
            if !open.contains(&cell) {
                board.block(cell).unwrap();
            }
        }
        GameState::from_parts(
            "walled".to_string(),
            board,
            Hex::ORIGIN,
            moves,
            GameStatus::InProgress,
            difficulty,
            Utc::now(),
        )
    }

    #[test]
    fn test_game_creation() {
        let game = GameState::new("g1", 5, Difficulty::MEDIUM);
        assert_eq!(game.cat_position(), Hex::ORIGIN);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.board().blocked_count(), 0);
        assert_eq!(game.board_size(), 5);
    }

    #[test]
    fn test_reject_cat_cell() {
        let mut game = GameState::new("g", 3, Difficulty::MEDIUM);
        let err = game.apply_player_move(Hex::ORIGIN, &mut rng()).unwrap_err();
        assert!(matches!(err, GameError::InvalidMove { reason: InvalidMoveReason::CatCell, .. }));
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn test_reject_border_and_out_of_bounds() {
        let mut game = GameState::new("g", 3, Difficulty::MEDIUM);
        assert!(game.apply_player_move(Hex::new(3, 0), &mut rng()).is_err());
        assert!(game.apply_player_move(Hex::new(7, 0), &mut rng()).is_err());
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.board().blocked_count(), 0);
    }

    #[test]
    fn test_reject_already_blocked() {
        let mut game = GameState::new("g", 5, Difficulty::MEDIUM);
        game.apply_player_move(Hex::new(-2, 0), &mut rng()).unwrap();
        let cat = game.cat_position();
        let err = game.apply_player_move(Hex::new(-2, 0), &mut rng()).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidMove { reason: InvalidMoveReason::AlreadyBlocked, .. }
        ));
        assert_eq!(game.move_count(), 1);
        assert_eq!(game.cat_position(), cat);
    }

    #[test]
    fn test_turn_moves_cat_one_step() {
        let mut game = GameState::new("g", 5, Difficulty::MEDIUM);
        let outcome = game.apply_player_move(Hex::new(0, 2), &mut rng()).unwrap();
        assert_eq!(outcome.blocked, Hex::new(0, 2));
        let step = outcome.cat_move.unwrap();
        assert_eq!(step.distance_to(Hex::ORIGIN), 1);
        assert_eq!(game.cat_position(), step);
        assert_eq!(game.move_count(), 1);
        assert_eq!(outcome.status, GameStatus::InProgress);
    }

    #[test]
    fn test_trap_wins() {
        // Five neighbours already walled, the sixth closes the cage
        let last = Hex::new(0, 1);
        let mut game = walled_game(2, Difficulty::MEDIUM, &[last], 5);
        let outcome = game.apply_player_move(last, &mut rng()).unwrap();
        assert_eq!(outcome.status, GameStatus::PlayerWon);
        assert_eq!(outcome.cat_move, None);
        assert_eq!(game.move_count(), 6);
        assert_eq!(game.score(), 1000 - 60 + 100);
        assert!(game.has_player_won());
    }

    #[test]
    fn test_cat_steps_onto_rim() {
        let mut game = GameState::new("g", 2, Difficulty::MEDIUM);
        // First reply takes the cat to ring 1, the second to the rim
        game.apply_player_move(Hex::new(-1, 0), &mut rng()).unwrap();
        assert_eq!(game.cat_position(), Hex::new(1, 0));
        let outcome = game.apply_player_move(Hex::new(0, 1), &mut rng()).unwrap();
        assert_eq!(outcome.status, GameStatus::PlayerLost);
        assert!(game.board().is_at_border(game.cat_position()));
        assert_eq!(game.score(), 100 - 10);
    }

    #[test]
    fn test_terminal_is_absorbing() {
        let mut game = GameState::new("g", 2, Difficulty::MEDIUM);
        game.apply_player_move(Hex::new(-1, 0), &mut rng()).unwrap();
        game.apply_player_move(Hex::new(0, 1), &mut rng()).unwrap();
        assert_eq!(game.status(), GameStatus::PlayerLost);

        let blocked = game.board().blocked_cells();
        let cat = game.cat_position();
        for cell in game.board().interior_cells() {
            let err = game.apply_player_move(cell, &mut rng()).unwrap_err();
            assert!(matches!(err, GameError::GameTerminal(GameStatus::PlayerLost)));
        }
        assert_eq!(game.board().blocked_cells(), blocked);
        assert_eq!(game.cat_position(), cat);
        assert_eq!(game.status(), GameStatus::PlayerLost);
        assert_eq!(game.move_count(), 2);
    }

    #[test]
    fn test_pocketed_cat_stays_in_progress() {
        let mut board = Board::new(3);
        for cell in board.cells() {
            if cell.distance_to(Hex::ORIGIN) == 2 && cell != Hex::new(2, 0) {
                board.block(cell).unwrap();
            }
        }
        let mut game = GameState::from_parts(
            "pocket".into(),
            board,
            Hex::ORIGIN,
            0,
            GameStatus::InProgress,
            Difficulty::MEDIUM,
            Utc::now(),
        );
        // Closing the gap seals the pocket: BFS has nowhere to go
        let outcome = game.apply_player_move(Hex::new(2, 0), &mut rng()).unwrap();
        assert_eq!(outcome.cat_move, None);
        assert_eq!(outcome.status, GameStatus::InProgress);
        assert_eq!(game.cat_position(), Hex::ORIGIN);

        // No escape route, so the suggestion falls back to a free neighbour
        assert_eq!(game.suggested_block(&mut rng()), Some(Hex::new(1, 0)));
    }

    #[test]
    fn test_score_formulas() {
        let mut game = walled_game(5, Difficulty::MEDIUM, &[], 0);
        game.status = GameStatus::PlayerWon;
        game.move_count = 12;
        assert_eq!(game.score(), 1000 - 120 + 250);
        game.move_count = 200;
        assert_eq!(game.score(), 0);

        game.status = GameStatus::PlayerLost;
        game.move_count = 4;
        assert_eq!(game.score(), 80);
        game.move_count = 40;
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_statistics() {
        let mut game = GameState::new("stats", 4, Difficulty::HARD);
        game.apply_player_move(Hex::new(-1, -1), &mut rng()).unwrap();
        let stats = game.statistics();
        assert_eq!(stats.game_id, "stats");
        assert_eq!(stats.board_size, 4);
        assert_eq!(stats.moves, 1);
        assert_eq!(stats.blocked_cells, 1);
        assert_eq!(stats.strategy, "astar");
        assert_eq!(stats.cat_position, game.cat_position());
        assert_eq!(stats.escape_distance, Some(3));
    }

    #[test]
    fn test_prediction_does_not_mutate() {
        let game = GameState::new("g", 4, Difficulty::HARD);
        let predicted = game.predicted_cat_move(&mut rng());
        assert_eq!(predicted, Some(Hex::new(1, 0)));
        assert_eq!(game.cat_position(), Hex::ORIGIN);
    }

    #[test]
    fn test_no_suggestion_after_game_over() {
        let mut game = GameState::new("done", 2, Difficulty::MEDIUM);
        game.apply_player_move(Hex::new(-1, 0), &mut rng()).unwrap();
        game.apply_player_move(Hex::new(0, 1), &mut rng()).unwrap();
        assert_eq!(game.status(), GameStatus::PlayerLost);
        assert_eq!(game.suggested_block(&mut rng()), None);
    }
}
