use std::fmt;

use crate::error::{PuzzleError, Result};

pub const MIN_GRID: usize = 2;
pub const MAX_GRID: usize = 6;

/// Side length of a square puzzle, always within `MIN_GRID..=MAX_GRID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize(usize);

impl GridSize {
    pub fn new(n: usize) -> Result<Self> {
        if (MIN_GRID..=MAX_GRID).contains(&n) {
            Ok(Self(n))
        } else {
            Err(PuzzleError::InvalidGridSize(n))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Number of board positions, blank included.
    pub fn cells(self) -> usize {
        self.0 * self.0
    }

    /// Origin index reserved for the blank tile.
    pub fn blank_index(self) -> usize {
        self.cells() - 1
    }

    pub fn row(self, position: usize) -> usize {
        position / self.0
    }

    pub fn col(self, position: usize) -> usize {
        position % self.0
    }

    pub fn position(self, row: usize, col: usize) -> usize {
        row * self.0 + col
    }

    /// Same row and neighbouring column, or same column and neighbouring row.
    pub fn adjacent(self, a: usize, b: usize) -> bool {
        let (ra, ca) = (self.row(a), self.col(a));
        let (rb, cb) = (self.row(b), self.col(b));
        (ra.abs_diff(rb) == 1 && ca == cb) || (ca.abs_diff(cb) == 1 && ra == rb)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}
