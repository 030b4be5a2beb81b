//! Hex board geometry with axial coordinates

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, InvalidMoveReason, Result};

/// Axial hex coordinates. The cube component is derived as `s = -q - r`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Build from all three cube components.
    ///
    /// Panics if `q + r + s != 0`: such a triple does not name a cell and
    /// can only come from a construction bug.
    pub fn from_cube(q: i32, r: i32, s: i32) -> Self {
        assert_eq!(q + r + s, 0, "cube coordinate ({q}, {r}, {s}) violates q + r + s = 0");
        Self { q, r }
    }

    #[inline]
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        dq.max(dr).max(ds)
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        let (dq, dr) = DIRECTIONS[direction % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    /// All six neighbors, in `DIRECTIONS` order
    pub fn neighbors(self) -> impl Iterator<Item = Hex> {
        (0..DIRECTIONS.len()).map(move |d| self.neighbor(d))
    }
}

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Direction vectors in axial coordinates (dq, dr).
///
/// Strategies break ties by this order, so it must not change.
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

/// Distance from the origin, widened so any `i32` pair is safe
fn ring(pos: Hex) -> i64 {
    let (q, r) = (i64::from(pos.q), i64::from(pos.r));
    q.abs().max(r.abs()).max((q + r).abs())
}

/// A hexagonal board of fixed radius with an append-only set of blocked cells
#[derive(Clone, Debug)]
pub struct Board {
    radius: i32,
    blocked: FxHashSet<Hex>,
}

impl Board {
    pub fn new(radius: i32) -> Self {
        Self {
            radius,
            blocked: FxHashSet::default(),
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Check if this hex is on the board
    pub fn is_in_bounds(&self, pos: Hex) -> bool {
        ring(pos) <= i64::from(self.radius)
    }

    /// Cells on the outer rim. Reaching one lets the cat escape.
    pub fn is_at_border(&self, pos: Hex) -> bool {
        ring(pos) == i64::from(self.radius)
    }

    pub fn is_blocked(&self, pos: Hex) -> bool {
        self.blocked.contains(&pos)
    }

    /// In-bounds, unblocked neighbors of `pos` in `DIRECTIONS` order
    pub fn adjacent_positions(&self, pos: Hex) -> Vec<Hex> {
        pos.neighbors()
            .filter(|&n| self.is_in_bounds(n) && !self.is_blocked(n))
            .collect()
    }

    /// A cell the player may block: in bounds, off the rim, not yet blocked
    pub fn is_valid_move(&self, pos: Hex) -> bool {
        self.is_in_bounds(pos) && !self.is_at_border(pos) && !self.is_blocked(pos)
    }

    /// Explain why `pos` cannot be blocked, if it cannot
    pub fn reject_reason(&self, pos: Hex) -> Option<InvalidMoveReason> {
        if !self.is_in_bounds(pos) {
            Some(InvalidMoveReason::OutOfBounds)
        } else if self.is_at_border(pos) {
            Some(InvalidMoveReason::Border)
        } else if self.is_blocked(pos) {
            Some(InvalidMoveReason::AlreadyBlocked)
        } else {
            None
        }
    }

    /// Permanently block a cell
    pub fn block(&mut self, pos: Hex) -> Result<()> {
        if let Some(reason) = self.reject_reason(pos) {
            return Err(GameError::InvalidMove { pos, reason });
        }
        self.blocked.insert(pos);
        Ok(())
    }

    /// Insert without the player-move checks. Used when restoring a record.
    pub(crate) fn restore_blocked(&mut self, pos: Hex) {
        self.blocked.insert(pos);
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }

    /// Blocked cells sorted by (q, r)
    pub fn blocked_cells(&self) -> Vec<Hex> {
        let mut cells: Vec<Hex> = self.blocked.iter().copied().collect();
        cells.sort_unstable();
        cells
    }

    /// Every in-bounds cell, sorted by (q, r)
    pub fn cells(&self) -> Vec<Hex> {
        let n = self.radius;
        let mut cells = Vec::new();
        for q in -n..=n {
            for r in (-n).max(-q - n)..=n.min(-q + n) {
                cells.push(Hex::new(q, r));
            }
        }
        cells
    }

    pub fn interior_cells(&self) -> Vec<Hex> {
        self.cells().into_iter().filter(|&c| !self.is_at_border(c)).collect()
    }

    pub fn border_cells(&self) -> Vec<Hex> {
        self.cells().into_iter().filter(|&c| self.is_at_border(c)).collect()
    }

    /// Render the board as text, one row per `r`, offset to look hexagonal.
    /// `C` is the cat, `#` a blocked cell, `o` a rim cell, `.` an open cell.
    pub fn render(&self, cat: Hex) -> String {
        let n = self.radius;
        let mut out = String::new();
        for r in -n..=n {
            out.push_str(&" ".repeat(r.unsigned_abs() as usize));
            for q in -n..=n {
                let pos = Hex::new(q, r);
                if !self.is_in_bounds(pos) {
                    continue;
                }
                let glyph = if pos == cat {
                    'C'
                } else if self.is_blocked(pos) {
                    '#'
                } else if self.is_at_border(pos) {
                    'o'
                } else {
                    '.'
                };
                out.push(glyph);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}
