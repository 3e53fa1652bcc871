use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use rand::{rngs::StdRng, thread_rng, Rng, SeedableRng};

use picture_slider::source::{self, FileSource, GradientSource, ImageSource};
use picture_slider::{solver, terminal, Game, GridSize};

/// Slide the tiles of a picture back into place.
#[derive(Parser)]
#[command(about, long_about = None, version)]
struct Args {
    /// Number of tiles per side (2 to 6)
    #[arg(short = 'n', long, default_value_t = 3)]
    size: usize,

    /// Picture to cut into tiles; a generated picture is used if missing or unreadable
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Side of one tile in pixels
    #[arg(long, default_value_t = 128)]
    tile_px: u32,

    /// Seed for the generated picture and the shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Start from the solved picture
    #[arg(long, default_value_t = false)]
    no_shuffle: bool,

    /// Print a shortest solution instead of playing
    #[arg(long, default_value_t = false)]
    solve: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let grid = GridSize::new(args.size)?;
    let seed = args.seed.unwrap_or_else(|| thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);

    let mut sources: Vec<Box<dyn ImageSource>> = Vec::new();
    if let Some(path) = &args.image {
        sources.push(Box::new(FileSource::new(path)));
    }
    sources.push(Box::new(GradientSource::new(512, seed)));

    let (name, picture) = source::first_available(&sources)?;
    let picture = source::prepare_square(&picture, grid, args.tile_px)
        .with_context(|| format!("cannot prepare picture from {name}"))?;
    info!("Using picture from {name}, seed {seed}");

    let mut game = Game::new(&picture, grid)?;
    if !args.no_shuffle {
        game.shuffle_with(&mut rng);
    }

    if args.solve {
        let mut replay = game.puzzle().clone();
        println!("Shuffled puzzle:\n{}", replay);

        let path = solver::solve(&replay)?;
        println!("Found optimal solution with: {} moves", path.len());
        for slide in path {
            replay.slide(slide);
            println!("{}\n{}", slide, replay);
        }
        return Ok(());
    }

    terminal::run(&mut game)?;
    if game.is_solved() {
        println!("Solved in {} moves.", game.moves());
    }
    Ok(())
}
