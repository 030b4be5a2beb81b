//! Breadth-first search toward the nearest rim cell

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::board::{Board, Hex};

/// Shortest path from `start` to any border cell, `start` and goal included.
///
/// Returns `None` when every border cell is walled off.
pub fn shortest_path_to_border(board: &Board, start: Hex) -> Option<Vec<Hex>> {
    let mut parent: FxHashMap<Hex, Option<Hex>> = FxHashMap::default();
    let mut queue = VecDeque::new();

    parent.insert(start, None);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if board.is_at_border(current) {
            return Some(reconstruct_path(&parent, current));
        }
        for next in board.adjacent_positions(current) {
            if !parent.contains_key(&next) {
                parent.insert(next, Some(current));
                queue.push_back(next);
            }
        }
    }

    None
}

/// Whether the cat at `start` can still reach the rim
pub fn has_path_to_border(board: &Board, start: Hex) -> bool {
    shortest_path_to_border(board, start).is_some()
}

/// Number of steps to the nearest reachable rim cell
pub fn escape_distance(board: &Board, start: Hex) -> Option<u32> {
    shortest_path_to_border(board, start).map(|path| (path.len() - 1) as u32)
}

/// Pick the first step whose remaining shortest path is strictly the
/// shortest. Earlier directions win ties.
pub fn select_move(board: &Board, current: Hex) -> Option<Hex> {
    let mut best: Option<(usize, Hex)> = None;
    for candidate in board.adjacent_positions(current) {
        let Some(path) = shortest_path_to_border(board, candidate) else {
            continue;
        };
        if best.map_or(true, |(len, _)| path.len() < len) {
            best = Some((path.len(), candidate));
        }
    }
    best.map(|(_, step)| step)
}

/// Walk the parent map back from `goal` and reverse
pub(crate) fn reconstruct_path(parent: &FxHashMap<Hex, Option<Hex>>, goal: Hex) -> Vec<Hex> {
    let mut path = vec![goal];
    let mut cur = goal;
    while let Some(&Some(prev)) = parent.get(&cur) {
        path.push(prev);
        cur = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exhaustive depth-limited search, used as ground truth on tiny boards
    fn brute_force_distance(board: &Board, start: Hex) -> Option<usize> {
        fn dfs(board: &Board, cur: Hex, depth: usize, limit: usize, seen: &mut Vec<Hex>) -> bool {
            if board.is_at_border(cur) {
                return true;
            }
            if depth == limit {
                return false;
            }
            for next in board.adjacent_positions(cur) {
                if seen.contains(&next) {
                    continue;
                }
                seen.push(next);
                let found = dfs(board, next, depth + 1, limit, seen);
                seen.pop();
                if found {
                    return true;
                }
            }
            false
        }
        let cells = board.cells().len();
        (0..=cells).find(|&limit| dfs(board, start, 0, limit, &mut vec![start]))
    }

    #[test]
    fn test_path_from_center() {
        let board = Board::new(3);
        let path = shortest_path_to_border(&board, Hex::ORIGIN).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], Hex::ORIGIN);
        assert!(board.is_at_border(*path.last().unwrap()));
        for pair in path.windows(2) {
            assert_eq!(pair[0].distance_to(pair[1]), 1);
        }
    }

    #[test]
    fn test_start_on_border() {
        let board = Board::new(2);
        let path = shortest_path_to_border(&board, Hex::new(2, 0)).unwrap();
        assert_eq!(path, vec![Hex::new(2, 0)]);
        assert_eq!(escape_distance(&board, Hex::new(2, 0)), Some(0));
    }

    #[test]
    fn test_matches_brute_force_on_small_boards() {
        for radius in 1..=3 {
            let mut board = Board::new(radius);
            // A partial wall makes the shortest route non-trivial
            if radius == 3 {
                for cell in [Hex::new(1, 0), Hex::new(1, -1), Hex::new(0, -1), Hex::new(-1, 0)] {
                    board.block(cell).unwrap();
                }
            }
            for cell in board.cells() {
                if board.is_blocked(cell) {
                    continue;
                }
                let bfs = shortest_path_to_border(&board, cell).map(|p| p.len() - 1);
                assert_eq!(bfs, brute_force_distance(&board, cell), "radius {radius}, start {cell}");
            }
        }
    }

    #[test]
    fn test_enclosed_has_no_path() {
        let mut board = Board::new(3);
        for cell in Hex::ORIGIN.neighbors() {
            board.block(cell).unwrap();
        }
        assert!(!has_path_to_border(&board, Hex::ORIGIN));
        assert_eq!(select_move(&board, Hex::ORIGIN), None);
    }

    #[test]
    fn test_pocket_has_moves_but_no_path() {
        let mut board = Board::new(3);
        // Wall off the ring at distance 2 so the cat can wander but never escape
        for cell in board.cells() {
            if cell.distance_to(Hex::ORIGIN) == 2 {
                board.block(cell).unwrap();
            }
        }
        assert!(!board.adjacent_positions(Hex::ORIGIN).is_empty());
        assert_eq!(select_move(&board, Hex::ORIGIN), None);
    }

    #[test]
    fn test_select_prefers_open_side() {
        let mut board = Board::new(3);
        // Block the whole east half of ring 1 except (0, 1)
        for cell in [Hex::new(1, 0), Hex::new(1, -1), Hex::new(0, -1), Hex::new(-1, 0), Hex::new(-1, 1)] {
            board.block(cell).unwrap();
        }
        assert_eq!(select_move(&board, Hex::ORIGIN), Some(Hex::new(0, 1)));
    }

    #[test]
    fn test_select_tie_breaks_by_direction_order() {
        let board = Board::new(3);
        // All six first steps are two steps from the rim; east comes first
        assert_eq!(select_move(&board, Hex::ORIGIN), Some(Hex::new(1, 0)));
    }

    #[test]
    fn test_select_steps_onto_adjacent_border() {
        let board = Board::new(3);
        assert_eq!(select_move(&board, Hex::new(-2, 2)), Some(Hex::new(-3, 2)));
    }
}
