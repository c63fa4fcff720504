//! # Level Generation
//!
//! Random single-room levels: a solid wall border around an interior where
//! each cell is independently a wall or a floor.

use crate::{CellKind, CryptError, CryptResult, GenerationConfig, Generator, Grid};
use log::debug;
use rand::{rngs::StdRng, Rng};

/// Generates bordered levels with randomly scattered interior walls.
#[derive(Debug, Clone, Default)]
pub struct LevelGenerator {
    /// Minimum number of floor tiles a level must have to be accepted
    pub min_floor_tiles: usize,
}

impl LevelGenerator {
    /// Creates a generator that accepts any level with at least one floor tile.
    pub fn new() -> Self {
        Self { min_floor_tiles: 1 }
    }

    fn cell_at(&self, x: u32, y: u32, config: &GenerationConfig, rng: &mut StdRng) -> CellKind {
        let border = x == 0 || y == 0 || x + 1 == config.width || y + 1 == config.height;
        if border || rng.gen::<f64>() < config.wall_chance {
            CellKind::Wall
        } else {
            CellKind::Floor
        }
    }
}

impl Generator<Grid> for LevelGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CryptResult<Grid> {
        if config.width < 3 || config.height < 3 {
            return Err(CryptError::GenerationFailed(format!(
                "level {}x{} has no interior",
                config.width, config.height
            )));
        }

        let mut cells = Vec::with_capacity(config.width as usize * config.height as usize);
        for y in 0..config.height {
            for x in 0..config.width {
                cells.push(self.cell_at(x, y, config, rng));
            }
        }
        let grid = Grid::new(config.width, config.height, cells)?;

        debug!(
            "{} produced {} floor tiles",
            self.generator_type(),
            grid.floor_positions().len()
        );
        Ok(grid)
    }

    fn validate(&self, grid: &Grid, config: &GenerationConfig) -> CryptResult<()> {
        if grid.width() != config.width || grid.height() != config.height {
            return Err(CryptError::GenerationFailed(format!(
                "expected {}x{} level, got {}x{}",
                config.width,
                config.height,
                grid.width(),
                grid.height()
            )));
        }
        let floor = grid.floor_positions().len();
        if floor < self.min_floor_tiles.max(1) {
            return Err(CryptError::GenerationFailed(format!(
                "level has only {} floor tiles",
                floor
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "LevelGenerator"
    }
}
