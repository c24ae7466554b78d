#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded random grid generation.
//!
//! Every room is sampled independently: with the configured probability it
//! receives a mirror whose orientation is chosen uniformly, otherwise it stays
//! empty. A fixed seed reproduces the same sequence of grids.

use log::debug;
use mirror_maze_core::{Cell, Command, Grid, GridError, Mirror};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Default grid width used when none is configured.
pub const DEFAULT_WIDTH: u32 = 3;
/// Default grid height used when none is configured.
pub const DEFAULT_HEIGHT: u32 = 3;
/// Default chance that a room holds a mirror.
pub const DEFAULT_MIRROR_PROBABILITY: f64 = 0.3;

/// Failures raised while configuring or running the generator.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GenerationError {
    /// The mirror probability lies outside `0.0..=1.0` or is not a number.
    #[error("mirror probability must lie between 0.0 and 1.0, got {0}")]
    InvalidProbability(f64),
    /// The requested dimensions do not form a valid grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Parameters controlling generated grids.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Chance in `0.0..=1.0` that a room receives a mirror.
    pub mirror_probability: f64,
    /// Seed for reproducible output; `None` draws one from the operating system.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mirror_probability: DEFAULT_MIRROR_PROBABILITY,
            seed: None,
        }
    }
}

/// Random grid source that keeps its RNG between grids.
#[derive(Debug)]
pub struct GridGenerator {
    config: Config,
    rng: ChaCha8Rng,
    generated: u64,
}

impl GridGenerator {
    /// Validates the configuration and seeds the generator.
    pub fn new(config: Config) -> Result<Self, GenerationError> {
        if !(0.0..=1.0).contains(&config.mirror_probability) {
            return Err(GenerationError::InvalidProbability(
                config.mirror_probability,
            ));
        }
        // Surface dimension errors before the first grid is requested.
        let _ = Grid::new(config.width, config.height)?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            generated: 0,
        })
    }

    /// Samples a fresh grid.
    pub fn generate(&mut self) -> Result<Grid, GenerationError> {
        let Config {
            width,
            height,
            mirror_probability,
            ..
        } = self.config;
        let rooms = width as usize * height as usize;
        let cells = (0..rooms)
            .map(|_| self.sample_cell(mirror_probability))
            .collect();
        let grid = Grid::from_cells(width, height, cells)?;

        self.generated += 1;
        debug!(
            "generated grid {} ({}x{}, {} mirrors)",
            self.generated,
            width,
            height,
            grid.mirror_count()
        );
        Ok(grid)
    }

    /// Samples a fresh grid and wraps it in the command that installs it.
    pub fn next_command(&mut self) -> Result<Command, GenerationError> {
        self.generate().map(|grid| Command::ConfigureGrid { grid })
    }

    fn sample_cell(&mut self, mirror_probability: f64) -> Cell {
        if self.rng.gen::<f64>() < mirror_probability {
            if self.rng.gen_bool(0.5) {
                Cell::Mirror(Mirror::Forward)
            } else {
                Cell::Mirror(Mirror::Backward)
            }
        } else {
            Cell::Empty
        }
    }
}
