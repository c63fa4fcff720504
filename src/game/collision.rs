//! # Collision
//!
//! Move validation and the movement policy shared by every mover.
//!
//! Nothing here mutates state. [`validate_move`] answers "what would happen
//! if this entity stepped by (dx, dy)?" and [`plan_step`] layers the
//! diagonal wall-fallback on top of it. Committing a move is the job of
//! [`crate::GameState::try_move`].

use crate::{CryptError, CryptResult, Direction, EntityId, Grid, Position};
use serde::{Deserialize, Serialize};

/// Result of validating a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The target tile is free.
    Moved,
    /// The target tile is a wall or outside the grid.
    BlockedWall,
    /// Another blocking entity stands on the target tile.
    BlockedEntity(EntityId),
}

impl MoveOutcome {
    pub fn is_moved(self) -> bool {
        matches!(self, MoveOutcome::Moved)
    }

    /// The blocking entity, if the move was blocked by one.
    pub fn blocker(self) -> Option<EntityId> {
        match self {
            MoveOutcome::BlockedEntity(id) => Some(id),
            _ => None,
        }
    }
}

/// A validated step: the outcome together with the tile it was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCheck {
    pub outcome: MoveOutcome,
    pub target: Position,
}

/// Read-only view of which tiles are held by blocking entities.
pub trait Occupancy {
    /// Returns a blocking entity on `tile` other than `ignore`.
    fn blocking_entity_at(&self, tile: Position, ignore: Option<EntityId>) -> Option<EntityId>;
}

impl Occupancy for [(EntityId, Position)] {
    fn blocking_entity_at(&self, tile: Position, ignore: Option<EntityId>) -> Option<EntityId> {
        self.iter()
            .find(|(id, pos)| *pos == tile && Some(*id) != ignore)
            .map(|(id, _)| *id)
    }
}

fn check_delta(dx: i32, dy: i32) -> CryptResult<Direction> {
    if dx == 0 && dy == 0 {
        return Err(CryptError::InvalidAction(
            "zero step; use wait to stay in place".to_string(),
        ));
    }
    Direction::from_delta(dx, dy).ok_or_else(|| {
        CryptError::InvalidAction(format!("step ({}, {}) is longer than one tile", dx, dy))
    })
}

/// Validates one step without changing anything.
///
/// Walls and out-of-bounds tiles win over entities: a wall tile is always
/// reported as [`MoveOutcome::BlockedWall`]. An occupied floor tile is
/// always [`MoveOutcome::BlockedEntity`], even across a wall corner, so a
/// bump there is an attack. An empty diagonal target may not be reached by
/// cutting a wall corner: the step is wall-blocked when either of the two
/// orthogonal tiles it passes between is unwalkable.
///
/// # Examples
///
/// ```
/// use crypt::{validate_move, Grid, MoveOutcome, Position};
///
/// let grid = Grid::from_ascii("
///     #####
///     #..#
///     #####
/// ").unwrap();
/// let occupants: Vec<(crypt::EntityId, Position)> = Vec::new();
///
/// let check = validate_move(&grid, occupants.as_slice(), None, Position::new(1, 1), (1, 0)).unwrap();
/// assert_eq!(check.outcome, MoveOutcome::Moved);
///
/// let check = validate_move(&grid, occupants.as_slice(), None, Position::new(1, 1), (0, 1)).unwrap();
/// assert_eq!(check.outcome, MoveOutcome::BlockedWall);
/// ```
pub fn validate_move<O: Occupancy + ?Sized>(
    grid: &Grid,
    occupants: &O,
    mover: Option<EntityId>,
    from: Position,
    (dx, dy): (i32, i32),
) -> CryptResult<MoveCheck> {
    let direction = check_delta(dx, dy)?;
    let target = from.offset(dx, dy);

    let cuts_corner = direction.is_diagonal()
        && (!grid.is_walkable(from.offset(dx, 0)) || !grid.is_walkable(from.offset(0, dy)));

    let outcome = if !grid.is_walkable(target) {
        MoveOutcome::BlockedWall
    } else if let Some(blocker) = occupants.blocking_entity_at(target, mover) {
        MoveOutcome::BlockedEntity(blocker)
    } else if cuts_corner {
        MoveOutcome::BlockedWall
    } else {
        MoveOutcome::Moved
    };

    Ok(MoveCheck { outcome, target })
}

/// Chooses the step a mover actually takes for a requested delta.
///
/// A diagonal that hits a wall is retried horizontally, then vertically; the
/// first free axis wins. If neither axis is free, the original diagonal
/// result is returned. A diagonal blocked by an entity is not retried, so
/// the caller can turn it into an attack.
pub fn plan_step<O: Occupancy + ?Sized>(
    grid: &Grid,
    occupants: &O,
    mover: Option<EntityId>,
    from: Position,
    (dx, dy): (i32, i32),
) -> CryptResult<MoveCheck> {
    let direction = check_delta(dx, dy)?;
    let check = validate_move(grid, occupants, mover, from, (dx, dy))?;
    if !direction.is_diagonal() || check.outcome != MoveOutcome::BlockedWall {
        return Ok(check);
    }

    for axis in [direction.horizontal(), direction.vertical()].into_iter().flatten() {
        let fallback = validate_move(grid, occupants, mover, from, axis.to_delta())?;
        if fallback.outcome.is_moved() {
            return Ok(fallback);
        }
    }

    Ok(check)
}
