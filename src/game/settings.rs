//! # Settings
//!
//! Explicit game configuration, loaded once by the driver and passed into setup.

use crate::config::*;
use crate::{CryptError, CryptResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable game settings.
///
/// Missing fields in a settings file fall back to the defaults.
///
/// # Examples
///
/// ```
/// use crypt::Settings;
///
/// let settings = Settings::from_json_str(r#"{ "skeleton_count": 5 }"#).unwrap();
/// assert_eq!(settings.skeleton_count, 5);
/// assert_eq!(settings.tile_size, 32.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Edge length of one tile in pixels
    pub tile_size: f32,
    /// Seconds a tile-to-tile move animation lasts
    pub move_duration: f32,
    /// Seconds within which two direction keys combine into a diagonal
    pub diagonal_tolerance: f64,
    /// Level width in tiles
    pub level_width: u32,
    /// Level height in tiles
    pub level_height: u32,
    /// Probability that an interior cell is a wall
    pub wall_chance: f64,
    /// Number of skeletons placed on a new level
    pub skeleton_count: usize,
    /// Fixed seed for level generation; random when absent
    pub seed: Option<u64>,
    /// Window title for the binary
    pub window_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            move_duration: DEFAULT_MOVE_DURATION,
            diagonal_tolerance: DEFAULT_DIAGONAL_TOLERANCE,
            level_width: DEFAULT_LEVEL_WIDTH,
            level_height: DEFAULT_LEVEL_HEIGHT,
            wall_chance: DEFAULT_WALL_CHANCE,
            skeleton_count: DEFAULT_SKELETON_COUNT,
            seed: None,
            window_title: "Crypt".to_string(),
        }
    }
}

impl Settings {
    /// Parses settings from JSON and validates them.
    pub fn from_json_str(json: &str) -> CryptResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> CryptResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&text)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Serializes the settings to pretty JSON.
    pub fn to_json(&self) -> CryptResult<String> {
        serde_json::to_string_pretty(self).map_err(CryptError::from)
    }

    /// Checks that the values describe a playable game.
    pub fn validate(&self) -> CryptResult<()> {
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(CryptError::InvalidState(format!(
                "tile_size must be positive, got {}",
                self.tile_size
            )));
        }
        let durations_ok = [self.move_duration as f64, self.diagonal_tolerance]
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0);
        if !durations_ok {
            return Err(CryptError::InvalidState(format!(
                "durations must be finite and not negative, got move_duration {} and diagonal_tolerance {}",
                self.move_duration, self.diagonal_tolerance
            )));
        }
        let sides = 3..=MAX_LEVEL_SIDE;
        if !sides.contains(&self.level_width) || !sides.contains(&self.level_height) {
            return Err(CryptError::InvalidState(format!(
                "level must be between 3x3 and {MAX_LEVEL_SIDE}x{MAX_LEVEL_SIDE}, got {}x{}",
                self.level_width, self.level_height
            )));
        }
        if !(0.0..1.0).contains(&self.wall_chance) {
            return Err(CryptError::InvalidState(format!(
                "wall_chance must be in [0, 1), got {}",
                self.wall_chance
            )));
        }
        Ok(())
    }
}
