//! Error types for the puzzle engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("grid size {0} is outside the supported range 2..=6")]
    InvalidGridSize(usize),

    #[error("image of {width}x{height} cannot be split into square tiles")]
    InvalidImage { width: u32, height: u32 },

    #[error("invalid board: {0}")]
    InvalidBoard(String),
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
