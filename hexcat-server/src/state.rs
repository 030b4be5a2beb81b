//! Server state management
//!
//! Shared game service and saved scores.

use hexcat_core::{GameService, ScoreBoard, ServiceConfig};

use crate::ServerConfig;

/// Server-wide shared state
pub struct ServerState {
    pub games: GameService,
    pub scores: ScoreBoard,
    pub default_board_size: i32,
}

impl ServerState {
    pub fn new(config: &ServerConfig) -> Self {
        let service_config = ServiceConfig {
            max_board_size: config.max_board_size,
            seed: config.seed,
        };
        Self {
            games: GameService::in_memory(service_config),
            scores: ScoreBoard::new(),
            default_board_size: config.default_board_size,
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(&ServerConfig::default())
    }
}
