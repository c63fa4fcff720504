//! # Crypt
//!
//! A small turn-based dungeon crawler played on a fixed tile grid.
//!
//! ## Architecture Overview
//!
//! The crate separates the authoritative, tile-based game rules from everything
//! the player merely sees:
//!
//! - **World**: a static grid of wall and floor cells
//! - **Collision**: a pure move validator plus the movement policy shared by the
//!   player and every enemy
//! - **Game State**: entities, tile reservation and combat
//! - **Motion**: per-entity eased interpolation between tile centres
//! - **Turns**: the scheduler that alternates the player phase with the
//!   sequential enemy phase, waiting on animations between actors
//! - **Generation**: random bordered levels and encounter placement
//! - **Input / Rendering**: thin macroquad adapters used by the binary
//!
//! Logical tile coordinates change the instant a move is accepted; pixel
//! positions catch up over the following frames. Two entities can therefore
//! never animate into the same tile.

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;

// Explicit re-exports for commonly used types
pub use game::{
    // From collision
    plan_step,
    validate_move,
    MoveCheck,
    MoveOutcome,
    Occupancy,
    // From entities
    AiPolicy,
    Entity,
    EntityKind,
    KindProfile,
    // From motion
    Motion,
    MotionStep,
    // From settings
    Settings,
    // From state
    AttackOutcome,
    GameCompletionState,
    GameState,
    GameStatistics,
    // From turns
    EnemyIntent,
    GameEvent,
    PlayerCommand,
    TurnPhase,
    TurnReport,
    TurnScheduler,
    // From world
    CellKind,
    Grid,
};

pub use generation::{EncounterGenerator, GenerationConfig, Generator, LevelGenerator, Spawns};

pub use rendering::MacroquadDisplay;

/// Core error type for the Crypt game engine.
#[derive(thiserror::Error, Debug)]
pub enum CryptError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Grid data is not a usable rectangle
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// No entity with this ID is in play
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Crypt codebase.
pub type CryptResult<T> = Result<T, CryptError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration defaults.
pub mod config {
    /// Edge length of one tile in pixels
    pub const DEFAULT_TILE_SIZE: f32 = 32.0;

    /// Seconds a tile-to-tile move animation lasts
    pub const DEFAULT_MOVE_DURATION: f32 = 0.18;

    /// Seconds two direction keys may be apart and still form a diagonal
    pub const DEFAULT_DIAGONAL_TOLERANCE: f64 = 0.010;

    /// Default level width in tiles
    pub const DEFAULT_LEVEL_WIDTH: u32 = 10;

    /// Default level height in tiles
    pub const DEFAULT_LEVEL_HEIGHT: u32 = 10;

    /// Largest level edge a settings file may ask for
    pub const MAX_LEVEL_SIDE: u32 = 1024;

    /// Probability that an interior cell is generated as a wall
    pub const DEFAULT_WALL_CHANCE: f64 = 0.2;

    /// Number of skeletons placed on a fresh level
    pub const DEFAULT_SKELETON_COUNT: usize = 3;

    /// Damage dealt by an attack when the caller does not specify one
    pub const DEFAULT_ATTACK_DAMAGE: u32 = 1;
}
