//! Sliding picture puzzles.
//!
//! A square picture is cut into an N×N grid of tiles ([`tiles::partition`]), the last tile
//! becoming the blank. [`Puzzle`] owns the arrangement of the tiles: it shuffles into
//! solvable positions only, accepts single-tile moves next to the blank and reports when the
//! picture is whole again. [`Game`] ties both together for a front end.

pub mod error;
pub mod game;
pub mod grid;
pub mod puzzle;
pub mod solver;
pub mod source;
pub mod terminal;
pub mod tiles;

pub use error::{PuzzleError, Result};
pub use game::{BoardView, Game};
pub use grid::GridSize;
pub use puzzle::{count_inversions, is_solvable, MoveOutcome, Puzzle, Slide};
pub use tiles::{partition, Tile, TileSet};
