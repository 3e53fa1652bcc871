//! Split a square picture into the tiles of a sliding puzzle.
//!
//! Tiles are `floor(S / N)` pixels wide. When the side `S` is not a multiple of `N`, the
//! leftover pixels along the right and bottom edges are dropped: the partition is lossy on
//! purpose so that every tile has exactly the same size.

use image::{imageops, Rgb, RgbImage};
use log::debug;

use crate::error::{PuzzleError, Result};
use crate::grid::GridSize;

/// Fill color of the synthesized blank tile.
pub const BLANK_FILL: Rgb<u8> = Rgb([200, 200, 200]);

/// One square piece of the picture, identified by its place in the solved layout.
#[derive(Debug, Clone)]
pub struct Tile {
    origin: usize,
    image: RgbImage,
}

impl Tile {
    /// Row-major index of the tile in the solved layout.
    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Average color of the tile, used by low resolution front ends.
    pub fn mean_color(&self) -> Rgb<u8> {
        let count = u64::from(self.image.width()) * u64::from(self.image.height());
        if count == 0 {
            return BLANK_FILL;
        }
        let mut sum = [0u64; 3];
        for pixel in self.image.pixels() {
            for (acc, channel) in sum.iter_mut().zip(pixel.0) {
                *acc += u64::from(channel);
            }
        }
        Rgb(sum.map(|s| (s / count) as u8))
    }
}

/// The `N²` tiles of a picture, in origin order.
#[derive(Debug, Clone)]
pub struct TileSet {
    grid: GridSize,
    tile_side: u32,
    tiles: Vec<Tile>,
}

impl TileSet {
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn tile_side(&self) -> u32 {
        self.tile_side
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile with the given origin index.
    pub fn get(&self, origin: usize) -> Option<&Tile> {
        self.tiles.get(origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn blank(&self) -> &Tile {
        &self.tiles[self.grid.blank_index()]
    }
}

/// Crop `image` into `N²` equally sized tiles in row-major order.
///
/// The last tile is replaced by a flat [`BLANK_FILL`] tile. The image must already be square;
/// no padding or letterboxing is done here.
pub fn partition(image: &RgbImage, grid: GridSize) -> Result<TileSet> {
    let (width, height) = image.dimensions();
    let invalid = PuzzleError::InvalidImage { width, height };
    if width == 0 || width != height {
        return Err(invalid);
    }

    let n = grid.get() as u32;
    let tile_side = width / n;
    if tile_side == 0 {
        return Err(invalid);
    }
    if width % n != 0 {
        debug!(
            "Partition of {width}px into {grid} drops {} px on the right and bottom edges",
            width % n
        );
    }

    let blank = grid.blank_index();
    let tiles = (0..grid.cells())
        .map(|origin| {
            let image = if origin == blank {
                RgbImage::from_pixel(tile_side, tile_side, BLANK_FILL)
            } else {
                let x = grid.col(origin) as u32 * tile_side;
                let y = grid.row(origin) as u32 * tile_side;
                imageops::crop_imm(image, x, y, tile_side, tile_side).to_image()
            };
            Tile { origin, image }
        })
        .collect();

    debug!("Partitioned {width}px image into {grid} tiles of {tile_side}px");
    Ok(TileSet {
        grid,
        tile_side,
        tiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Each pixel encodes its own coordinates so crops can be checked.
    fn coordinate_image(side: u32) -> RgbImage {
        RgbImage::from_fn(side, side, |x, y| Rgb([x as u8, y as u8, 7]))
    }

    #[test]
    fn yields_n_squared_equal_tiles() {
        for n in 2..=6 {
            let grid = GridSize::new(n).unwrap();
            let set = partition(&coordinate_image(120), grid).unwrap();
            assert_eq!(set.len(), n * n);
            assert_eq!(set.tile_side(), 120 / n as u32);
            for (i, tile) in set.iter().enumerate() {
                assert_eq!(tile.origin(), i);
                assert_eq!(tile.image().dimensions(), (set.tile_side(), set.tile_side()));
            }
        }
    }

    #[test]
    fn remainder_pixels_are_dropped() {
        let grid = GridSize::new(4).unwrap();
        let set = partition(&coordinate_image(103), grid).unwrap();
        assert_eq!(set.tile_side(), 25);
        // tile 14 is row 3, col 2; its top-left pixel comes from (50, 75)
        let tile = set.get(14).unwrap();
        assert_eq!(tile.image().get_pixel(0, 0), &Rgb([50, 75, 7]));
        assert_eq!(tile.image().get_pixel(24, 24), &Rgb([74, 99, 7]));
    }

    #[test]
    fn crops_follow_row_major_order() {
        let grid = GridSize::new(3).unwrap();
        let set = partition(&coordinate_image(90), grid).unwrap();
        assert_eq!(set.get(1).unwrap().image().get_pixel(0, 0), &Rgb([30, 0, 7]));
        assert_eq!(set.get(3).unwrap().image().get_pixel(0, 0), &Rgb([0, 30, 7]));
        assert_eq!(set.get(7).unwrap().image().get_pixel(0, 0), &Rgb([30, 60, 7]));
    }

    #[test]
    fn last_tile_is_blank_fill() {
        let grid = GridSize::new(3).unwrap();
        let set = partition(&coordinate_image(90), grid).unwrap();
        assert_eq!(set.blank().origin(), 8);
        assert!(set.blank().image().pixels().all(|p| *p == BLANK_FILL));
        assert_eq!(set.blank().mean_color(), BLANK_FILL);
    }

    #[test]
    fn rejects_non_square_and_empty_images() {
        let grid = GridSize::new(3).unwrap();
        assert_eq!(
            partition(&RgbImage::new(90, 60), grid).unwrap_err(),
            PuzzleError::InvalidImage {
                width: 90,
                height: 60
            }
        );
        assert!(partition(&RgbImage::new(0, 0), grid).is_err());
        assert!(partition(&RgbImage::new(2, 2), grid).is_err());
    }

    #[test]
    fn mean_color_averages_pixels() {
        let grid = GridSize::new(2).unwrap();
        let mut image = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        image.put_pixel(0, 0, Rgb([40, 80, 120]));
        image.put_pixel(1, 0, Rgb([40, 80, 120]));
        let set = partition(&image, grid).unwrap();
        assert_eq!(set.get(0).unwrap().mean_color(), Rgb([20, 40, 60]));
    }
}
