use log::debug;
use rand::{seq::SliceRandom, thread_rng, Rng};
use std::fmt;

use crate::error::{PuzzleError, Result};
use crate::grid::GridSize;

/// Direction in which a tile slides into the blank.
///
/// `Up` moves the tile below the blank upwards, so the blank itself goes down one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    Up,
    Left,
    Down,
    Right,
}

impl Slide {
    pub const ALL: [Slide; 4] = [Slide::Up, Slide::Down, Slide::Left, Slide::Right];

    /// Row and column offset of the tile that slides, relative to the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Slide::Up => (1, 0),
            Slide::Left => (0, 1),
            Slide::Down => (-1, 0),
            Slide::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Slide::Up => Slide::Down,
            Slide::Down => Slide::Up,
            Slide::Left => Slide::Right,
            Slide::Right => Slide::Left,
        }
    }
}

impl fmt::Display for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Slide::Up => "Up",
            Slide::Left => "Left",
            Slide::Down => "Down",
            Slide::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Result of a move request. An illegal move is an ordinary outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { solved: bool },
    Illegal,
}

impl MoveOutcome {
    pub fn is_legal(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Arrangement of tiles over the board.
///
/// `board[position]` is the origin index of the tile sitting at `position`. The blank is the
/// origin index `N² - 1`; its position is cached and only changes through `swap_with_blank`
/// and `install`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    grid: GridSize,
    board: Vec<usize>,
    blank: usize,
}

impl Puzzle {
    /// Solved puzzle: every tile at its origin, blank in the bottom-right corner.
    pub fn new(grid: GridSize) -> Self {
        Self {
            grid,
            board: (0..grid.cells()).collect(),
            blank: grid.blank_index(),
        }
    }

    /// Build a puzzle from an explicit arrangement, which must be a permutation of `0..N²`.
    pub fn from_board(board: Vec<usize>, grid: GridSize) -> Result<Self> {
        let cells = grid.cells();
        if board.len() != cells {
            return Err(PuzzleError::InvalidBoard(format!(
                "expected {cells} positions, got {}",
                board.len()
            )));
        }
        let mut seen = vec![false; cells];
        for &origin in &board {
            match seen.get_mut(origin) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(PuzzleError::InvalidBoard(format!(
                        "origin index {origin} appears twice"
                    )))
                }
                None => {
                    return Err(PuzzleError::InvalidBoard(format!(
                        "origin index {origin} is out of range"
                    )))
                }
            }
        }

        let mut puzzle = Self::new(grid);
        puzzle.install(board);
        Ok(puzzle)
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn board(&self) -> &[usize] {
        &self.board
    }

    pub fn blank_position(&self) -> usize {
        self.blank
    }

    pub fn is_solved(&self) -> bool {
        self.board.iter().enumerate().all(|(i, &origin)| i == origin)
    }

    /// Restore the solved arrangement.
    pub fn reset(&mut self) {
        self.install((0..self.grid.cells()).collect());
    }

    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut thread_rng());
    }

    /// Replace the board with a uniformly drawn solvable arrangement other than the solved one.
    ///
    /// Draws random permutations until one passes [`is_solvable`]. Half of all permutations
    /// are solvable, so this takes two draws on average.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut flattened: Vec<usize> = (0..self.grid.cells()).collect();
        let mut trials = 0;

        loop {
            trials += 1;
            flattened.shuffle(rng);

            let solved = flattened.iter().enumerate().all(|(i, &v)| i == v);
            if !solved && is_solvable(&flattened, self.grid) {
                break;
            }
        }

        debug!("Shuffled {} puzzle after {trials} draw(s)", self.grid);
        self.install(flattened);
    }

    /// Slide the tile at `position` into the blank if the two are orthogonal neighbours.
    pub fn move_tile(&mut self, position: usize) -> MoveOutcome {
        if position >= self.board.len() || !self.grid.adjacent(position, self.blank) {
            return MoveOutcome::Illegal;
        }
        self.swap_with_blank(position);
        MoveOutcome::Moved {
            solved: self.is_solved(),
        }
    }

    /// Slide the neighbour of the blank in the given direction, as arrow keys would.
    pub fn slide(&mut self, slide: Slide) -> MoveOutcome {
        match self.slide_source(slide) {
            Some(position) => self.move_tile(position),
            None => MoveOutcome::Illegal,
        }
    }

    /// Board position of the tile that `slide` would move, if there is one.
    pub fn slide_source(&self, slide: Slide) -> Option<usize> {
        let size = self.grid.get() as isize;
        let (dr, dc) = slide.as_offset();
        let row = self.grid.row(self.blank) as isize + dr;
        let col = self.grid.col(self.blank) as isize + dc;

        if row >= 0 && row < size && col >= 0 && col < size {
            Some(self.grid.position(row as usize, col as usize))
        } else {
            None
        }
    }

    /// Board positions whose tile may currently be moved.
    pub fn legal_moves(&self) -> Vec<usize> {
        Slide::ALL
            .iter()
            .filter_map(|&slide| self.slide_source(slide))
            .collect()
    }

    fn swap_with_blank(&mut self, position: usize) {
        self.board.swap(self.blank, position);
        self.blank = position;
    }

    fn install(&mut self, board: Vec<usize>) {
        let blank_index = self.grid.blank_index();
        self.blank = board
            .iter()
            .position(|&origin| origin == blank_index)
            .unwrap_or(blank_index);
        self.board = board;
    }
}

/// Whether `board` can be reached from the solved arrangement with legal slides.
///
/// Odd grids are solvable when the number of inversions is even. Even grids also depend on
/// the blank row: counting rows from the bottom starting at 1, the sum of inversions and that
/// row must be odd (the solved board has no inversion and its blank on row 1).
pub fn is_solvable(board: &[usize], grid: GridSize) -> bool {
    let blank_index = grid.blank_index();
    let inversions = count_inversions(board, blank_index);
    let size = grid.get();

    if size % 2 == 1 {
        inversions % 2 == 0
    } else {
        let blank_position = board
            .iter()
            .position(|&origin| origin == blank_index)
            .unwrap_or(blank_index);
        let row_from_bottom = size - grid.row(blank_position);
        (inversions + row_from_bottom) % 2 == 1
    }
}

/// Number of pairs that appear in the wrong relative order, ignoring the blank.
pub fn count_inversions(board: &[usize], blank_index: usize) -> usize {
    board
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != blank_index)
        .map(|(i, &val)| {
            board[i + 1..]
                .iter()
                .filter(|&&next| next != blank_index && next < val)
                .count()
        })
        .sum()
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blank_index = self.grid.blank_index();
        for row in self.board.chunks(self.grid.get()) {
            for &origin in row {
                if origin == blank_index {
                    write!(f, " . ")?;
                } else {
                    write!(f, "{:2} ", origin + 1)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
