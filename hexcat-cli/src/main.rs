//! HEXCAT CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the HTTP game server
//! - play: Play a game in the terminal
//! - simulate: Play many games with suggested blocks and report results

mod play;
mod server;
mod simulate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexcat")]
#[command(about = "Trap the cat on a hex board")]
struct Cli {
    /// Seed for the cat's random choices
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve(server::ServerArgs),
    /// Play a single game in the terminal
    Play(play::PlayArgs),
    /// Simulate games where the player follows the suggestion
    Simulate(simulate::SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => server::run(args, cli.seed),
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Simulate(args) => simulate::run(args, cli.seed),
    }
}
