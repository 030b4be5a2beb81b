//! Serve command - host the trap-the-cat HTTP API
//!
//! Turns command-line flags and the global seed into a `ServerConfig`,
//! checks them, then runs `hexcat_server::run_server` on a tokio runtime
//! until the process is stopped. Stale games are purged by the server
//! itself according to `--game-ttl-minutes`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use hexcat_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Directory containing static files for the browser client
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Largest board radius a client may request
    #[arg(long, default_value = "15")]
    pub max_board_size: i32,

    /// Minutes before a stored game is purged (0 keeps games forever)
    #[arg(long, default_value = "60")]
    pub game_ttl_minutes: u64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Validate the flags and serve games until interrupted
pub fn run(args: ServerArgs, seed: Option<u64>) -> Result<()> {
    let config = configure_server(&args, seed)?;

    tracing::info!(
        "Starting HEXCAT server on port {} (boards up to radius {}, games kept {} min)",
        config.port,
        config.max_board_size,
        config.game_ttl_minutes
    );

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build the server config. The default board shrinks to fit a small
/// `--max-board-size` so `/api/game/start` without parameters still works.
fn configure_server(args: &ServerArgs, seed: Option<u64>) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;
    validate_board_limit(args.max_board_size)?;

    let defaults = ServerConfig::default();
    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
        default_board_size: defaults.default_board_size.min(args.max_board_size),
        max_board_size: args.max_board_size,
        game_ttl_minutes: args.game_ttl_minutes,
        seed,
    })
}

/// Block the calling thread on the server future
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// A missing client directory only disables static files; a file in its
/// place is a configuration mistake.
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory {} not found; serving the API only",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!(
            "Static path exists but is not a directory: {}",
            path.display()
        );
    }

    Ok(())
}

/// Radius 1 has no blockable cell, so no game could be created
fn validate_board_limit(max_board_size: i32) -> Result<()> {
    if max_board_size < hexcat_core::service::MIN_BOARD_SIZE {
        anyhow::bail!(
            "--max-board-size must be at least {}, got {}",
            hexcat_core::service::MIN_BOARD_SIZE,
            max_board_size
        );
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(static_dir: &str) -> ServerArgs {
        ServerArgs {
            port: 8080,
            static_dir: PathBuf::from(static_dir),
            max_board_size: 15,
            game_ttl_minutes: 60,
        }
    }

    #[test]
    fn test_configure_server_defaults() {
        let config = configure_server(&args("test_static"), Some(3)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, "test_static");
        assert_eq!(config.max_board_size, 15);
        assert_eq!(config.default_board_size, 5);
        assert_eq!(config.game_ttl_minutes, 60);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_small_board_limit_caps_default() {
        let mut small = args("test_static");
        small.max_board_size = 3;
        let config = configure_server(&small, None).unwrap();
        assert_eq!(config.default_board_size, 3);

        small.max_board_size = 1;
        assert!(configure_server(&small, None).is_err());
    }

    #[test]
    fn test_validate_static_dir_nonexistent() {
        let result = validate_static_dir(Path::new("/nonexistent/path"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_static_dir_rejects_file() {
        let file = std::env::temp_dir().join("hexcat-static-file-test");
        std::fs::write(&file, b"x").unwrap();
        assert!(validate_static_dir(&file).is_err());
        std::fs::remove_file(&file).ok();
    }
}
