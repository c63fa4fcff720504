//! # Game Module
//!
//! Core game rules: the tile world, entities, movement, combat and turn order.
//!
//! This module contains the fundamental building blocks of Crypt:
//! - World grid and walkability
//! - Entity records and per-kind profiles
//! - Move validation and the shared movement policy
//! - Tile reservation and combat on the game state
//! - Animated pixel interpolation
//! - The player/enemy turn scheduler

pub mod collision;
pub mod entities;
pub mod motion;
pub mod settings;
pub mod state;
pub mod turns;
pub mod world;

pub use collision::*;
pub use entities::*;
pub use motion::*;
pub use settings::*;
pub use state::*;
pub use turns::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a tile coordinate in the game world.
///
/// # Examples
///
/// ```
/// use crypt::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// assert_eq!(pos.offset(1, -1), Position::new(11, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by the given delta.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Calculates the Chebyshev distance to another position.
    ///
    /// Diagonal neighbours are at distance 1, which makes this the melee
    /// adjacency test.
    ///
    /// # Examples
    ///
    /// ```
    /// use crypt::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// assert_eq!(pos1.chebyshev_distance(Position::new(1, 1)), 1);
    /// assert_eq!(pos1.chebyshev_distance(Position::new(3, -4)), 4);
    /// ```
    pub fn chebyshev_distance(self, other: Position) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }

    /// Calculates the Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Returns all 8 adjacent positions (including diagonals).
    pub fn adjacent_positions(self) -> Vec<Position> {
        Direction::all()
            .into_iter()
            .map(|direction| {
                let (dx, dy) = direction.to_delta();
                self.offset(dx, dy)
            })
            .collect()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Directions for movement and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    /// Converts a direction to a `(dx, dy)` step. North is `-y`.
    ///
    /// # Examples
    ///
    /// ```
    /// use crypt::Direction;
    ///
    /// assert_eq!(Direction::North.to_delta(), (0, -1));
    /// assert_eq!(Direction::Southeast.to_delta(), (1, 1));
    /// ```
    pub fn to_delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Northeast => (1, -1),
            Direction::Northwest => (-1, -1),
            Direction::Southeast => (1, 1),
            Direction::Southwest => (-1, 1),
        }
    }

    /// Converts a step to a direction.
    ///
    /// Returns None if the delta doesn't correspond to a single-tile step.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            (1, -1) => Some(Direction::Northeast),
            (-1, -1) => Some(Direction::Northwest),
            (1, 1) => Some(Direction::Southeast),
            (-1, 1) => Some(Direction::Southwest),
            _ => None,
        }
    }

    /// Whether both axes change.
    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.to_delta();
        dx != 0 && dy != 0
    }

    /// The horizontal component, if any.
    pub fn horizontal(self) -> Option<Direction> {
        let (dx, _) = self.to_delta();
        Direction::from_delta(dx, 0)
    }

    /// The vertical component, if any.
    pub fn vertical(self) -> Option<Direction> {
        let (_, dy) = self.to_delta();
        Direction::from_delta(0, dy)
    }

    /// Returns all 8 directions.
    pub fn all() -> Vec<Direction> {
        vec![
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::Northeast,
            Direction::Northwest,
            Direction::Southeast,
            Direction::Southwest,
        ]
    }
}

/// A continuous screen-space position, used only for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPosition {
    pub x: f32,
    pub y: f32,
}

impl PixelPosition {
    /// Creates a new pixel position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: PixelPosition, t: f32) -> PixelPosition {
        PixelPosition::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Unique identifier for game entities.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}
