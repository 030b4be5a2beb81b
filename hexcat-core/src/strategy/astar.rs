//! A* search toward an explicit target cell

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::{Board, Hex};
use crate::strategy::bfs::reconstruct_path;

/// What the search is trying to reach
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Goal {
    /// One specific cell, guided by hex distance
    Target(Hex),
    /// Any rim cell, with a zero heuristic
    Border,
}

impl Goal {
    fn is_reached(&self, board: &Board, pos: Hex) -> bool {
        match self {
            Goal::Target(target) => pos == *target,
            Goal::Border => board.is_at_border(pos),
        }
    }

    fn heuristic(&self, pos: Hex) -> u32 {
        match self {
            Goal::Target(target) => pos.distance_to(*target) as u32,
            Goal::Border => 0,
        }
    }
}

/// All steps cost the same
const STEP_COST: u32 = 1;

/// A path found by A*, `start` and goal included
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundPath {
    pub cells: Vec<Hex>,
    pub cost: u32,
}

/// Lowest-cost path from `start` to `goal`.
///
/// The frontier is ordered by `g + h`, with insertion order breaking ties.
/// Stale frontier entries are skipped through the closed set.
pub fn find_path(board: &Board, start: Hex, goal: Goal) -> Option<FoundPath> {
    let mut open: BinaryHeap<Reverse<(u32, u64, Hex)>> = BinaryHeap::new();
    let mut g_score: FxHashMap<Hex, u32> = FxHashMap::default();
    let mut parent: FxHashMap<Hex, Option<Hex>> = FxHashMap::default();
    let mut closed: FxHashSet<Hex> = FxHashSet::default();
    let mut seq = 0u64;

    g_score.insert(start, 0);
    parent.insert(start, None);
    open.push(Reverse((goal.heuristic(start), seq, start)));

    while let Some(Reverse((_, _, current))) = open.pop() {
        if !closed.insert(current) {
            continue;
        }
        let g = g_score[&current];
        if goal.is_reached(board, current) {
            return Some(FoundPath {
                cells: reconstruct_path(&parent, current),
                cost: g,
            });
        }

        for next in board.adjacent_positions(current) {
            if closed.contains(&next) {
                continue;
            }
            let tentative = g + STEP_COST;
            if g_score.get(&next).map_or(true, |&known| tentative < known) {
                g_score.insert(next, tentative);
                parent.insert(next, Some(current));
                seq += 1;
                open.push(Reverse((tentative + goal.heuristic(next), seq, next)));
            }
        }
    }

    None
}

/// Choose the first step lying on the cheapest reconstructed path to `goal`.
///
/// Ties go to the shorter path, then to the earlier direction.
pub fn select_move_toward(board: &Board, current: Hex, goal: Goal) -> Option<Hex> {
    board
        .adjacent_positions(current)
        .into_iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            find_path(board, candidate, goal).map(|path| (path.cost, path.cells.len(), index, candidate))
        })
        .min_by_key(|&(cost, len, index, _)| (cost, len, index))
        .map(|(_, _, _, step)| step)
}

/// Head for `target`, or for the nearest rim cell when there is none.
///
/// The rim can never be blocked and forms one ring, so a rim target is
/// reachable exactly when any exit is.
pub fn select_move(board: &Board, current: Hex, target: Option<Hex>) -> Option<Hex> {
    let goal = target.map_or(Goal::Border, Goal::Target);
    select_move_toward(board, current, goal)
}
