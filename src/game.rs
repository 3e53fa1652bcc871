//! A single play session: the tiles of one picture and the arrangement being played.
//!
//! Each session owns its state. Front ends keep one [`Game`] per player and feed it the
//! positions that were clicked.

use image::RgbImage;
use log::{debug, info};
use rand::Rng;

use crate::error::Result;
use crate::grid::GridSize;
use crate::puzzle::{MoveOutcome, Puzzle, Slide};
use crate::solver::{self, SolveError};
use crate::tiles::{self, Tile, TileSet};

/// What a front end needs to draw the board.
#[derive(Debug)]
pub struct BoardView<'a> {
    pub grid: GridSize,

    /// Tiles in board order: `tiles[position]` is drawn at `position`.
    pub tiles: Vec<&'a Tile>,

    pub blank_position: usize,

    pub solved: bool,

    /// Legal moves played since the last shuffle or reset.
    pub moves: usize,
}

#[derive(Debug, Clone)]
pub struct Game {
    tiles: TileSet,
    puzzle: Puzzle,
    moves: usize,
}

impl Game {
    /// Split `image` and start from the solved arrangement.
    pub fn new(image: &RgbImage, grid: GridSize) -> Result<Self> {
        let tiles = tiles::partition(image, grid)?;
        info!("New {grid} game with {}px tiles", tiles.tile_side());
        Ok(Self {
            tiles,
            puzzle: Puzzle::new(grid),
            moves: 0,
        })
    }

    pub fn grid(&self) -> GridSize {
        self.puzzle.grid()
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn is_solved(&self) -> bool {
        self.puzzle.is_solved()
    }

    pub fn shuffle(&mut self) {
        self.puzzle.shuffle();
        self.moves = 0;
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.puzzle.shuffle_with(rng);
        self.moves = 0;
    }

    pub fn reset(&mut self) {
        self.puzzle.reset();
        self.moves = 0;
    }

    pub fn move_tile(&mut self, position: usize) -> MoveOutcome {
        let outcome = self.puzzle.move_tile(position);
        self.record(outcome);
        outcome
    }

    pub fn slide(&mut self, slide: Slide) -> MoveOutcome {
        let outcome = self.puzzle.slide(slide);
        self.record(outcome);
        outcome
    }

    pub fn hint(&self) -> std::result::Result<Option<Slide>, SolveError> {
        solver::hint(&self.puzzle)
    }

    pub fn view(&self) -> BoardView<'_> {
        let tiles = self
            .puzzle
            .board()
            .iter()
            .filter_map(|&origin| self.tiles.get(origin))
            .collect();
        BoardView {
            grid: self.grid(),
            tiles,
            blank_position: self.puzzle.blank_position(),
            solved: self.puzzle.is_solved(),
            moves: self.moves,
        }
    }

    fn record(&mut self, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Moved { solved } => {
                self.moves += 1;
                if solved {
                    info!("Puzzle solved in {} moves", self.moves);
                }
            }
            MoveOutcome::Illegal => debug!("Ignored illegal move"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PuzzleError;
    use image::Rgb;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn picture() -> RgbImage {
        RgbImage::from_fn(60, 60, |x, y| Rgb([x as u8 * 4, y as u8 * 4, 0]))
    }

    #[test]
    fn starts_solved_with_tiles_in_origin_order() {
        let game = Game::new(&picture(), GridSize::new(3).unwrap()).unwrap();
        let view = game.view();
        assert!(view.solved);
        assert_eq!(view.blank_position, 8);
        assert_eq!(view.moves, 0);
        let origins: Vec<usize> = view.tiles.iter().map(|t| t.origin()).collect();
        assert_eq!(origins, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn rejects_non_square_picture() {
        let image = RgbImage::new(60, 40);
        assert!(matches!(
            Game::new(&image, GridSize::new(3).unwrap()),
            Err(PuzzleError::InvalidImage { .. })
        ));
    }

    #[test]
    fn view_follows_the_board() {
        let mut game = Game::new(&picture(), GridSize::new(3).unwrap()).unwrap();
        game.shuffle_with(&mut ChaCha8Rng::seed_from_u64(2));

        let view = game.view();
        assert!(!view.solved);
        for (position, tile) in view.tiles.iter().enumerate() {
            assert_eq!(tile.origin(), game.puzzle().board()[position]);
        }
        assert_eq!(view.tiles[view.blank_position].origin(), 8);
    }

    #[test]
    fn counts_only_legal_moves() {
        let mut game = Game::new(&picture(), GridSize::new(3).unwrap()).unwrap();
        assert_eq!(game.move_tile(0), MoveOutcome::Illegal);
        assert_eq!(game.moves(), 0);
        assert!(game.move_tile(7).is_legal());
        assert!(game.slide(Slide::Left).is_legal());
        assert_eq!(game.moves(), 2);
        assert!(game.is_solved());

        game.shuffle_with(&mut ChaCha8Rng::seed_from_u64(4));
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn following_hints_solves_the_game() {
        let mut game = Game::new(&picture(), GridSize::new(3).unwrap()).unwrap();
        game.shuffle_with(&mut ChaCha8Rng::seed_from_u64(8));

        while let Some(slide) = game.hint().unwrap() {
            assert!(game.slide(slide).is_legal());
        }
        assert!(game.is_solved());

        game.reset();
        assert_eq!(game.moves(), 0);
        assert_eq!(game.hint(), Ok(None));
    }
}
