//! Play command - a game of trap-the-cat in the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: start_game(), play_loop(), report_result()
//! - Level 3: read_command(), print_board()
//! - Level 4: command parsing

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;

use hexcat_core::{Difficulty, GameError, GameService, GameState, Hex, ServiceConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board radius
    #[arg(long, default_value = "5")]
    pub board_size: i32,

    /// Difficulty level 1-10 or easy/medium/hard
    #[arg(long, default_value = "5")]
    pub difficulty: String,
}

/// One line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Block(Hex),
    Hint,
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Create the game
/// 2. Alternate board display and player input until the game ends
/// 3. Print the result
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let service = GameService::in_memory(ServiceConfig {
        seed,
        ..ServiceConfig::default()
    });
    let game = start_game(&service, &args)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let last = play_loop(&service, game.id(), stdin.lock(), &mut stdout)?;

    report_result(&last, &mut stdout)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn start_game(service: &GameService, args: &PlayArgs) -> Result<GameState> {
    let difficulty: Difficulty = args.difficulty.parse()?;
    let game = service
        .create_game(args.board_size, difficulty)
        .context("Cannot start game")?;
    Ok(game)
}

/// Read commands until the game is over, input runs out or the player quits
fn play_loop<R: BufRead, W: Write>(
    service: &GameService,
    game_id: &str,
    mut input: R,
    out: &mut W,
) -> Result<GameState> {
    writeln!(out, "Block cells with \"q r\". Type \"hint\" for a suggestion, \"quit\" to stop.")?;

    let mut game = service.game_state(game_id)?;
    while !game.is_finished() {
        print_board(&game, out)?;

        let Some(line) = read_command(&mut input, out)? else {
            break;
        };
        match parse_command(&line) {
            Some(Command::Block(pos)) => match service.execute_player_move(game_id, pos) {
                Ok(next) => game = next,
                Err(err @ GameError::InvalidMove { .. }) => writeln!(out, "{err}")?,
                Err(err) => return Err(err.into()),
            },
            Some(Command::Hint) => match service.suggested_move(game_id)? {
                Some(pos) => writeln!(out, "Try blocking {} {}", pos.q, pos.r)?,
                None => writeln!(out, "No suggestion")?,
            },
            Some(Command::Quit) => break,
            None => writeln!(out, "Expected \"q r\", \"hint\" or \"quit\"")?,
        }
    }

    Ok(game)
}

fn report_result<W: Write>(game: &GameState, out: &mut W) -> Result<()> {
    print_board(game, out)?;
    if game.has_player_won() {
        writeln!(out, "The cat is trapped! You win.")?;
    } else if game.is_finished() {
        writeln!(out, "The cat escaped.")?;
    } else {
        writeln!(out, "Game abandoned.")?;
    }
    writeln!(out, "Moves: {}  Score: {}", game.move_count(), game.score())?;
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn read_command<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<String>> {
    write!(out, "> ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn print_board<W: Write>(game: &GameState, out: &mut W) -> Result<()> {
    writeln!(out)?;
    write!(out, "{}", game.board().render(game.cat_position()))?;
    writeln!(
        out,
        "cat at {}  moves {}  difficulty {}",
        game.cat_position(),
        game.move_count(),
        game.difficulty()
    )?;
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "hint" | "h" => return Some(Command::Hint),
        "quit" | "q" | "exit" => return Some(Command::Quit),
        _ => {}
    }

    let mut parts = line.split(|c: char| c.is_whitespace() || c == ',').filter(|p| !p.is_empty());
    let q = parts.next()?.parse().ok()?;
    let r = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Command::Block(Hex::new(q, r)))
}

// ============================================================================
// TESTS
// ============================================================================
