//! # Generation Module
//!
//! Procedural level layout and encounter placement.
//!
//! Generators are seeded from a [`GenerationConfig`], so the same seed always
//! produces the same level and the same spawns.

pub mod dungeon;
pub mod encounters;

pub use dungeon::*;
pub use encounters::*;

use crate::{CryptResult, EntityKind, GameState, Settings};
use log::info;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Level width in tiles, border included
    pub width: u32,
    /// Level height in tiles, border included
    pub height: u32,
    /// Probability that an interior cell is a wall
    pub wall_chance: f64,
    /// Number of skeletons to place
    pub skeleton_count: usize,
}

impl GenerationConfig {
    /// Creates a configuration with default level parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use crypt::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(12345);
    /// assert_eq!(config.seed, 12345);
    /// assert_eq!((config.width, config.height), (10, 10));
    /// ```
    pub fn new(seed: u64) -> Self {
        Self::from_settings(&Settings::default(), seed)
    }

    /// Takes the level parameters from `settings`.
    pub fn from_settings(settings: &Settings, seed: u64) -> Self {
        Self {
            seed,
            width: settings.level_width,
            height: settings.level_height,
            wall_chance: settings.wall_chance,
            skeleton_count: settings.skeleton_count,
        }
    }

    /// Creates a small, wall-free configuration for tests.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 8,
            height: 8,
            wall_chance: 0.0,
            skeleton_count: 2,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generation systems.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CryptResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> CryptResult<()>;

    /// Gets the generator type name for logging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation.
pub mod utils {
    use super::GenerationConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}

/// Generates a level and its spawns and assembles a ready-to-play state.
///
/// # Examples
///
/// ```
/// use crypt::{build_game_state, Settings};
///
/// let state = build_game_state(Settings::default(), 7).unwrap();
/// assert!(state.player().is_some());
/// assert_eq!(state.enemies_in_order().len(), 3);
/// ```
pub fn build_game_state(settings: Settings, seed: u64) -> CryptResult<GameState> {
    settings.validate()?;
    let config = GenerationConfig::from_settings(&settings, seed);
    let mut rng = utils::create_rng(&config);

    let level = LevelGenerator::new();
    let grid = level.generate(&config, &mut rng)?;
    level.validate(&grid, &config)?;

    let encounters = EncounterGenerator::new(grid.clone());
    let spawns = encounters.generate(&config, &mut rng)?;
    encounters.validate(&spawns, &config)?;

    let mut state = GameState::new(settings, grid)?;
    state.spawn(EntityKind::Player, spawns.player)?;
    for tile in &spawns.skeletons {
        state.spawn(EntityKind::Skeleton, *tile)?;
    }

    info!(
        "Built {}x{} level with seed {} and {} skeletons",
        config.width,
        config.height,
        seed,
        spawns.skeletons.len()
    );
    Ok(state)
}
