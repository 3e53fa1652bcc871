//! Where puzzle pictures come from.
//!
//! Sources are tried in priority order and the first picture produced wins. The engine only
//! needs a square image, so [`prepare_square`] crops and scales whatever a source returns.

use std::path::PathBuf;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use log::{debug, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use thiserror::Error;

use crate::grid::GridSize;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot read image: {0}")]
    Image(#[from] image::ImageError),

    #[error("image is empty")]
    Empty,

    #[error("no image source succeeded")]
    Exhausted,
}

pub trait ImageSource {
    fn name(&self) -> &str;

    fn produce(&self) -> Result<RgbImage, SourceError>;
}

/// Picture loaded from disk in any format the `image` crate decodes.
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file {}", path.display());
        Self { path, name }
    }
}

impl ImageSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn produce(&self) -> Result<RgbImage, SourceError> {
        Ok(image::open(&self.path)?.to_rgb8())
    }
}

/// Synthetic picture: a soft gradient with a handful of colored discs.
///
/// The same seed always gives the same picture.
pub struct GradientSource {
    side: u32,
    seed: u64,
}

impl GradientSource {
    pub fn new(side: u32, seed: u64) -> Self {
        Self { side, seed }
    }
}

impl ImageSource for GradientSource {
    fn name(&self) -> &str {
        "gradient"
    }

    fn produce(&self) -> Result<RgbImage, SourceError> {
        if self.side == 0 {
            return Err(SourceError::Empty);
        }
        let side = self.side;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let scale = |v: u32| (v * 255 / side) as u8;
        let mut image = RgbImage::from_fn(side, side, |x, y| {
            Rgb([240 - scale(y) / 4, 245 - scale(x) / 4, 255 - scale((x + y) / 2) / 8])
        });

        for _ in 0..12 {
            let cx = rng.gen_range(0..side) as i64;
            let cy = rng.gen_range(0..side) as i64;
            let radius = rng.gen_range(side / 16..=side / 5).max(1) as i64;
            let color = Rgb([
                rng.gen_range(100..=220),
                rng.gen_range(100..=220),
                rng.gen_range(100..=220),
            ]);
            for (x, y, pixel) in image.enumerate_pixels_mut() {
                let (dx, dy) = (x as i64 - cx, y as i64 - cy);
                if dx * dx + dy * dy <= radius * radius {
                    *pixel = color;
                }
            }
        }

        Ok(image)
    }
}

/// Run each source in turn and return the first picture, with the name of its source.
pub fn first_available(
    sources: &[Box<dyn ImageSource>],
) -> Result<(String, RgbImage), SourceError> {
    for source in sources {
        match source.produce() {
            Ok(image) => {
                debug!("Picture from {}", source.name());
                return Ok((source.name().to_string(), image));
            }
            Err(e) => warn!("Image source {} failed: {e}", source.name()),
        }
    }
    Err(SourceError::Exhausted)
}

/// Center-crop `image` to a square and scale it to `N * tile_side` pixels.
pub fn prepare_square(
    image: &RgbImage,
    grid: GridSize,
    tile_side: u32,
) -> Result<RgbImage, SourceError> {
    let (width, height) = image.dimensions();
    let side = width.min(height);
    if side == 0 || tile_side == 0 {
        return Err(SourceError::Empty);
    }

    let square = imageops::crop_imm(image, (width - side) / 2, (height - side) / 2, side, side)
        .to_image();
    let target = grid.get() as u32 * tile_side;
    if target == side {
        return Ok(square);
    }
    Ok(imageops::resize(&square, target, target, FilterType::Triangle))
}
