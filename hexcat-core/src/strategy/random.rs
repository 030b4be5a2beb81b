//! Uniform random step, used by the easy tiers

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Hex};

pub fn select_move<R: Rng + ?Sized>(board: &Board, current: Hex, rng: &mut R) -> Option<Hex> {
    board.adjacent_positions(current).choose(rng).copied()
}
