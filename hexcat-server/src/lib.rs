//! HEXCAT Server - HTTP API for the trap-the-cat game
//!
//! This crate provides the web backend:
//! - REST API for game operations
//! - Saved scores and leaderboards
//! - Static file serving for the browser client
//! - Periodic cleanup of stale games

mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    /// Radius used when a request names none
    pub default_board_size: i32,
    pub max_board_size: i32,
    /// Games older than this are purged; 0 disables cleanup
    pub game_ttl_minutes: u64,
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            static_dir: "static".to_string(),
            default_board_size: 5,
            max_board_size: 15,
            game_ttl_minutes: 60,
            seed: None,
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Board geometry
        .route("/api/board", get(routes::board::get_board))
        // Game API
        .route("/api/game/start", get(routes::game::start_game))
        .route("/api/game/block", post(routes::game::block_cell))
        .route("/api/game/state/:game_id", get(routes::game::get_game_state))
        .route(
            "/api/game/statistics/:game_id",
            get(routes::game::get_statistics),
        )
        .route(
            "/api/game/suggestion/:game_id",
            get(routes::game::get_suggestion),
        )
        .route("/api/games", get(routes::game::list_games))
        .route("/api/game/leaderboard", get(routes::game::get_leaderboard))
        .route("/api/game/player-stats", get(routes::game::get_player_stats))
        // Scores API
        .route("/api/game/save-score", post(routes::scores::save_score))
        .route("/api/game/high-scores", get(routes::scores::high_scores))
        .route(
            "/api/game/winning-scores",
            get(routes::scores::winning_scores),
        )
        .route("/api/game/recent-scores", get(routes::scores::recent_scores))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Purge stale games every minute until the runtime shuts down
fn spawn_cleanup_task(state: Arc<ServerState>, ttl_minutes: u64) {
    let Ok(minutes) = i64::try_from(ttl_minutes) else {
        tracing::warn!("game TTL of {} minutes is too large, cleanup disabled", ttl_minutes);
        return;
    };
    let max_age = chrono::Duration::minutes(minutes);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let removed = state.games.cleanup_older_than(max_age);
            if removed > 0 {
                tracing::info!("Removed {} games older than {} minutes", removed, ttl_minutes);
            }
        }
    });
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new(&config));
    if config.game_ttl_minutes > 0 {
        spawn_cleanup_task(Arc::clone(&state), config.game_ttl_minutes);
    }
    let router = create_router(&config, state);

    tracing::info!("HEXCAT Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
