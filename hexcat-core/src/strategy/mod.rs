//! Cat movement strategies
//!
//! Every strategy borrows the board read-only and proposes at most one
//! single-step move toward the rim:
//! - `Random`: uniform over open neighbours
//! - `Bfs`: shortest path to any rim cell
//! - `AStar`: cheapest path to an explicit target, guided by hex distance

pub mod astar;
pub mod bfs;
pub mod random;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Hex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Random,
    Bfs,
    AStar,
}

impl Strategy {
    /// Next cat step from `current`, or `None` when no step leads anywhere.
    ///
    /// `target` is only consulted by `AStar`; without one it aims for any
    /// rim cell.
    pub fn select_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        current: Hex,
        target: Option<Hex>,
        rng: &mut R,
    ) -> Option<Hex> {
        match self {
            Strategy::Random => random::select_move(board, current, rng),
            Strategy::Bfs => bfs::select_move(board, current),
            Strategy::AStar => astar::select_move(board, current, target),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Random => "random",
            Strategy::Bfs => "bfs",
            Strategy::AStar => "astar",
        }
    }
}
