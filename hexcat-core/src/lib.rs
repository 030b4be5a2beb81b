//! HEXCAT Core - Game engine and cat AI
//!
//! This crate provides the core game logic for HEXCAT:
//! - Board geometry (hex grid with axial coordinates)
//! - Cat movement strategies (random, BFS, A*)
//! - Game state machine, scoring and serialization
//! - Game repository and orchestration service

pub mod board;
pub mod difficulty;
pub mod error;
pub mod game;
pub mod leaderboard;
pub mod record;
pub mod repository;
pub mod service;
pub mod strategy;

// Re-exports for convenient access
pub use board::{Board, Hex, DIRECTIONS};
pub use difficulty::Difficulty;
pub use error::{GameError, InvalidMoveReason, Result};
pub use game::{GameState, GameStatistics, GameStatus, TurnOutcome};
pub use leaderboard::{ScoreBoard, ScoreEntry};
pub use record::GameRecord;
pub use repository::{GameRepository, InMemoryGameRepository, RepositoryStats};
pub use service::{GameService, LeaderboardEntry, PlayerStatistics, ServiceConfig};
pub use strategy::Strategy;
