//! Simulate command - play many games where the player follows the suggestion
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_games(), summarize(), report_results()
//! - Level 3: play_single_game(), next_block()
//! - Level 4: formatting utilities

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use hexcat_core::service::MIN_BOARD_SIZE;
use hexcat_core::{Difficulty, GameState, GameStatus, Hex, ServiceConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Board radius
    #[arg(long, default_value = "5")]
    pub board_size: i32,

    /// Difficulty level 1-10 or easy/medium/hard
    #[arg(long, default_value = "5")]
    pub difficulty: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// How one simulated game ended
#[derive(Clone, Debug)]
struct GameOutcome {
    status: GameStatus,
    moves: u32,
    score: i64,
}

/// Aggregate over all simulated games
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationSummary {
    games: usize,
    board_size: i32,
    difficulty: Difficulty,
    strategy: &'static str,
    wins: usize,
    losses: usize,
    unfinished: usize,
    /// Percentage of games the player won
    win_rate: f64,
    mean_moves: f64,
    mean_score: f64,
    elapsed_ms: u64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Play `--games` games against the chosen cat and print how the player fared.
/// Game `i` is seeded with `seed + i`, so a fixed seed repeats the whole run.
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let difficulty: Difficulty = args.difficulty.parse()?;
    validate_board_size(args.board_size)?;

    tracing::info!(
        "Simulating {} games on radius {} at difficulty {}",
        args.games,
        args.board_size,
        difficulty
    );

    let start = Instant::now();
    let outcomes = play_games(&args, difficulty, seed.unwrap_or(42));
    let summary = summarize(&args, difficulty, &outcomes, start.elapsed());

    report_results(&summary, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play every game on the rayon pool, one derived seed per game
fn play_games(args: &SimulateArgs, difficulty: Difficulty, base_seed: u64) -> Vec<GameOutcome> {
    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        create_progress_bar(args.games as u64)
    };

    let outcomes: Vec<GameOutcome> = (0..args.games)
        .into_par_iter()
        .map(|index| {
            let seed = base_seed.wrapping_add(index as u64);
            let outcome = play_single_game(args.board_size, difficulty, seed);
            progress.inc(1);
            outcome
        })
        .collect();

    progress.finish_and_clear();
    outcomes
}

fn summarize(
    args: &SimulateArgs,
    difficulty: Difficulty,
    outcomes: &[GameOutcome],
    elapsed: Duration,
) -> SimulationSummary {
    let count = |status: GameStatus| outcomes.iter().filter(|o| o.status == status).count();
    let wins = count(GameStatus::PlayerWon);
    let losses = count(GameStatus::PlayerLost);

    SimulationSummary {
        games: outcomes.len(),
        board_size: args.board_size,
        difficulty,
        strategy: difficulty.strategy().name(),
        wins,
        losses,
        unfinished: outcomes.len() - wins - losses,
        win_rate: percentage(wins, outcomes.len()),
        mean_moves: mean(outcomes.iter().map(|o| f64::from(o.moves))),
        mean_score: mean(outcomes.iter().map(|o| o.score as f64)),
        elapsed_ms: elapsed.as_millis() as u64,
    }
}

fn report_results(summary: &SimulationSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print_text_results(summary);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Block the suggested cell every turn until the game ends
fn play_single_game(board_size: i32, difficulty: Difficulty, seed: u64) -> GameOutcome {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut game = GameState::new(format!("sim-{seed}"), board_size, difficulty);

    while !game.is_finished() {
        let Some(pos) = next_block(&game, &mut rng) else {
            break;
        };
        if game.apply_player_move(pos, &mut rng).is_err() {
            break;
        }
    }

    GameOutcome {
        status: game.status(),
        moves: game.move_count(),
        score: game.score(),
    }
}

/// The suggestion, or any legal cell when every neighbour of the cat is rim
fn next_block(game: &GameState, rng: &mut ChaCha8Rng) -> Option<Hex> {
    game.suggested_block(rng).or_else(|| {
        game.board()
            .interior_cells()
            .into_iter()
            .find(|&cell| game.is_valid_player_move(cell))
    })
}

fn validate_board_size(board_size: i32) -> Result<()> {
    let max = ServiceConfig::default().max_board_size;
    if !(MIN_BOARD_SIZE..=max).contains(&board_size) {
        anyhow::bail!(
            "--board-size must be between {} and {}, got {}",
            MIN_BOARD_SIZE,
            max,
            board_size
        );
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn create_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} games ({elapsed})") {
        bar.set_style(style);
    }
    bar
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Print results as text table
fn print_text_results(summary: &SimulationSummary) {
    println!("\n=== HEXCAT Simulation Results ===");
    println!(
        "Radius {}, difficulty {} ({})\n",
        summary.board_size, summary.difficulty, summary.strategy
    );
    println!("{:<14} {:>10}", "Games", summary.games);
    println!("{:<14} {:>10}", "Cat trapped", summary.wins);
    println!("{:<14} {:>10}", "Cat escaped", summary.losses);
    if summary.unfinished > 0 {
        println!("{:<14} {:>10}", "Unfinished", summary.unfinished);
    }
    println!("{}", "-".repeat(25));
    println!("{:<14} {:>9.1}%", "Win rate", summary.win_rate);
    println!("{:<14} {:>10.1}", "Mean moves", summary.mean_moves);
    println!("{:<14} {:>10.1}", "Mean score", summary.mean_score);
    println!("{:<14} {:>8}ms", "Elapsed", summary.elapsed_ms);
}

// ============================================================================
// TESTS
// ============================================================================
