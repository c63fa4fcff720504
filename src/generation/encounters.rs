//! # Encounter Generation
//!
//! Chooses where the player and the skeletons start on a generated level.

use crate::{CryptError, CryptResult, GenerationConfig, Generator, Grid, Position};
use rand::{rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Starting tiles for a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawns {
    pub player: Position,
    pub skeletons: Vec<Position>,
}

/// Places the player and `skeleton_count` skeletons on distinct floor tiles.
#[derive(Debug, Clone)]
pub struct EncounterGenerator {
    grid: Grid,
}

impl EncounterGenerator {
    /// Creates a generator for spawns on `grid`.
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }
}

impl Generator<Spawns> for EncounterGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CryptResult<Spawns> {
        let floor = self.grid.floor_positions();
        let needed = config.skeleton_count + 1;
        if floor.len() < needed {
            return Err(CryptError::GenerationFailed(format!(
                "need {} floor tiles for spawns, level has {}",
                needed,
                floor.len()
            )));
        }

        let mut chosen = floor.choose_multiple(rng, needed).copied();
        let player = chosen.next().ok_or_else(|| {
            CryptError::GenerationFailed("no floor tile for the player".to_string())
        })?;
        Ok(Spawns {
            player,
            skeletons: chosen.collect(),
        })
    }

    fn validate(&self, spawns: &Spawns, config: &GenerationConfig) -> CryptResult<()> {
        if spawns.skeletons.len() != config.skeleton_count {
            return Err(CryptError::GenerationFailed(format!(
                "expected {} skeletons, placed {}",
                config.skeleton_count,
                spawns.skeletons.len()
            )));
        }
        let mut seen = HashSet::new();
        for tile in std::iter::once(&spawns.player).chain(&spawns.skeletons) {
            if !self.grid.is_walkable(*tile) {
                return Err(CryptError::GenerationFailed(format!(
                    "spawn ({}, {}) is not a floor tile",
                    tile.x, tile.y
                )));
            }
            if !seen.insert(*tile) {
                return Err(CryptError::GenerationFailed(format!(
                    "two spawns share tile ({}, {})",
                    tile.x, tile.y
                )));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "EncounterGenerator"
    }
}
