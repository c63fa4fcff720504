//! # Game State Module
//!
//! The authoritative world: grid, entities, tile reservation and combat.
//!
//! All tile coordinates change here and nowhere else. A move is validated,
//! the destination tile is reserved immediately, and only then does the
//! entity's pixel position start animating toward it.

use crate::game::world::tile_to_pixel;
use crate::{
    plan_step, CryptError, CryptResult, Entity, EntityId, EntityKind, GameEvent, Grid, Motion,
    MoveCheck, MoveOutcome, Occupancy, Position, Settings,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Game completion state for handling endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// The player's hit points reached zero
    PlayerDied,
    /// Every enemy on the level has been destroyed
    Cleared,
}

/// Result of a successful attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// The target survived.
    Hit { damage: u32, remaining_hp: i32 },
    /// The target died and was removed from play.
    Killed { damage: u32 },
}

impl AttackOutcome {
    pub fn damage(self) -> u32 {
        match self {
            AttackOutcome::Hit { damage, .. } | AttackOutcome::Killed { damage } => damage,
        }
    }

    pub fn is_kill(self) -> bool {
        matches!(self, AttackOutcome::Killed { .. })
    }
}

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Number of enemies destroyed
    pub enemies_defeated: u32,
    /// Total damage dealt by the player
    pub damage_dealt: u64,
    /// Total damage taken by the player
    pub damage_taken: u64,
    /// Tiles moved by the player
    pub steps_taken: u64,
    /// Completed rounds (player action plus enemy phase)
    pub turns_completed: u64,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent, player_id: Option<EntityId>) {
        match event {
            GameEvent::EntityMoved { entity_id, .. } if Some(*entity_id) == player_id => {
                self.steps_taken += 1;
            }
            GameEvent::Attacked {
                attacker,
                target,
                damage,
            } => {
                if Some(*attacker) == player_id {
                    self.damage_dealt += u64::from(*damage);
                }
                if Some(*target) == player_id {
                    self.damage_taken += u64::from(*damage);
                }
            }
            GameEvent::EntityDied { entity_id, .. } if Some(*entity_id) != player_id => {
                self.enemies_defeated += 1;
            }
            GameEvent::TurnCompleted { .. } => {
                self.turns_completed += 1;
            }
            _ => {}
        }
    }
}

/// Central game state containing the level and everything standing on it.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Settings the game was set up with
    pub settings: Settings,
    /// The static level grid
    pub(crate) grid: Grid,
    /// All entities in play, indexed by ID
    entities: HashMap<EntityId, Entity>,
    /// Entity IDs in spawn order; enemies act in this order
    order: Vec<EntityId>,
    /// The player entity ID
    pub player_id: Option<EntityId>,
    /// Statistics for the current game
    pub statistics: GameStatistics,
    /// Whether the game is still running
    pub completion: GameCompletionState,
}

impl GameState {
    /// Creates an empty game state on the given grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use crypt::{GameState, Grid, Settings};
    ///
    /// let grid = Grid::from_ascii("###\n#.#\n###").unwrap();
    /// let state = GameState::new(Settings::default(), grid).unwrap();
    /// assert!(state.player_id.is_none());
    /// ```
    pub fn new(settings: Settings, grid: Grid) -> CryptResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            grid,
            entities: HashMap::new(),
            order: Vec::new(),
            player_id: None,
            statistics: GameStatistics::new(),
            completion: GameCompletionState::Playing,
        })
    }

    /// Adds an entity to the game state.
    ///
    /// The entity must stand on a floor tile and, if blocking, on a tile no
    /// other blocking entity holds. Adding a player sets `player_id`.
    pub fn add_entity(&mut self, entity: Entity) -> CryptResult<EntityId> {
        let tile = entity.tile();
        if !self.grid.is_walkable(tile) {
            return Err(CryptError::InvalidState(format!(
                "cannot place {} on unwalkable tile ({}, {})",
                entity.profile().name,
                tile.x,
                tile.y
            )));
        }
        if entity.blocking {
            if let Some(other) = self.blocking_entity_at(tile, None) {
                return Err(CryptError::InvalidState(format!(
                    "tile ({}, {}) is already held by {}",
                    tile.x, tile.y, other
                )));
            }
        }
        if entity.kind == EntityKind::Player {
            if self.player_id.is_some() {
                return Err(CryptError::InvalidState(
                    "a player is already in play".to_string(),
                ));
            }
            self.player_id = Some(entity.id);
        }

        let id = entity.id;
        debug!("Spawned {} {} at ({}, {})", entity.profile().name, id, tile.x, tile.y);
        self.order.push(id);
        self.entities.insert(id, entity);
        Ok(id)
    }

    /// Creates an entity of `kind` on `tile` and adds it.
    pub fn spawn(&mut self, kind: EntityKind, tile: Position) -> CryptResult<EntityId> {
        let entity = Entity::spawn(kind, tile, self.settings.tile_size);
        self.add_entity(entity)
    }

    /// The level grid. Fixed once the game starts.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Gets an entity by ID.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Gets the player entity if it is still in play.
    pub fn player(&self) -> Option<&Entity> {
        self.player_id.and_then(|id| self.entities.get(&id))
    }

    /// Iterates over entities in spawn order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Number of entities in play.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Living enemies in spawn order.
    pub fn enemies_in_order(&self) -> Vec<EntityId> {
        self.entities()
            .filter(|entity| entity.kind.is_enemy() && entity.is_alive())
            .map(|entity| entity.id)
            .collect()
    }

    /// Gets an entity's logical tile.
    pub fn entity_tile(&self, id: EntityId) -> Option<Position> {
        self.entities.get(&id).map(Entity::tile)
    }

    /// Whether the entity is currently animating a move.
    pub fn is_animating(&self, id: EntityId) -> bool {
        self.entities
            .get(&id)
            .map(Entity::is_animating)
            .unwrap_or(false)
    }

    /// Whether any entity is animating.
    pub fn any_animating(&self) -> bool {
        self.entities.values().any(Entity::is_animating)
    }

    /// Checks if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.completion != GameCompletionState::Playing
    }

    /// Validates a step for `id` with the shared movement policy and, if it
    /// is legal, reserves the destination tile and starts the animation.
    ///
    /// Blocked moves leave the entity untouched.
    pub fn try_move(&mut self, id: EntityId, dx: i32, dy: i32) -> CryptResult<MoveCheck> {
        let from = self
            .entity_tile(id)
            .ok_or(CryptError::EntityNotFound(id))?;
        let check = plan_step(&self.grid, &*self, Some(id), from, (dx, dy))?;

        match check.outcome {
            MoveOutcome::Moved => {
                self.reserve_tile(id, check.target)?;
                self.start_motion(id, check.target)?;
            }
            MoveOutcome::BlockedWall => {
                debug!("{} bumped into a wall at ({}, {})", id, check.target.x, check.target.y);
            }
            MoveOutcome::BlockedEntity(blocker) => {
                debug!("{} blocked by {}", id, blocker);
            }
        }

        Ok(check)
    }

    /// Writes the entity's logical tile. The pixel position is not touched.
    pub(crate) fn reserve_tile(&mut self, id: EntityId, tile: Position) -> CryptResult<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(CryptError::EntityNotFound(id))?;
        entity.tile = tile;
        Ok(())
    }

    /// Starts easing the entity's pixel position toward the centre of `tile`.
    fn start_motion(&mut self, id: EntityId, tile: Position) -> CryptResult<()> {
        let to = tile_to_pixel(tile, self.settings.tile_size);
        let duration = self.settings.move_duration;
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(CryptError::EntityNotFound(id))?;
        entity.motion = Motion::start(entity.pixel, to, duration);
        Ok(())
    }

    /// Advances every running animation by `dt` seconds.
    ///
    /// Returns the entities whose move finished during this call, in spawn
    /// order. Each finished move is reported exactly once.
    pub fn advance_animations(&mut self, dt: f32) -> Vec<EntityId> {
        let mut completed = Vec::new();
        for id in &self.order {
            if let Some(entity) = self.entities.get_mut(id) {
                let step = entity.motion.advance(dt);
                if let Some(position) = step.position {
                    entity.pixel = position;
                }
                if step.completed {
                    completed.push(*id);
                }
            }
        }
        completed
    }

    /// Applies a fixed-damage attack from `attacker` to `target`.
    ///
    /// `damage` defaults to the attacker's melee damage. Range is not
    /// checked; callers decide adjacency. A target whose hit points reach
    /// zero is removed from play before this returns.
    pub fn attack(
        &mut self,
        attacker: EntityId,
        target: EntityId,
        damage: Option<u32>,
    ) -> CryptResult<AttackOutcome> {
        if attacker == target {
            return Err(CryptError::InvalidAction(
                "an entity cannot attack itself".to_string(),
            ));
        }
        let attacker_entity = self
            .entities
            .get(&attacker)
            .ok_or(CryptError::EntityNotFound(attacker))?;
        let damage = damage.unwrap_or(attacker_entity.profile().melee_damage);

        let target_entity = self
            .entities
            .get_mut(&target)
            .ok_or(CryptError::EntityNotFound(target))?;
        let died = target_entity.apply_damage(damage);
        let remaining_hp = target_entity.hp;
        debug!("{} hit {} for {} ({} hp left)", attacker, target, damage, remaining_hp);

        if died {
            self.remove_entity(target)?;
            Ok(AttackOutcome::Killed { damage })
        } else {
            Ok(AttackOutcome::Hit {
                damage,
                remaining_hp,
            })
        }
    }

    /// Removes an entity from play and updates the completion state.
    pub fn remove_entity(&mut self, id: EntityId) -> CryptResult<Entity> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(CryptError::EntityNotFound(id))?;
        self.order.retain(|other| *other != id);
        info!("{} {} removed from play", entity.profile().name, id);

        if Some(id) == self.player_id {
            self.completion = GameCompletionState::PlayerDied;
            info!("The player has died");
        } else if self.completion == GameCompletionState::Playing
            && self.enemies_in_order().is_empty()
        {
            self.completion = GameCompletionState::Cleared;
            info!("Level cleared");
        }
        Ok(entity)
    }

    /// Records an event in the statistics.
    pub fn record_event(&mut self, event: &GameEvent) {
        self.statistics.update_from_event(event, self.player_id);
    }
}

impl Occupancy for GameState {
    fn blocking_entity_at(&self, tile: Position, ignore: Option<EntityId>) -> Option<EntityId> {
        self.entities()
            .find(|entity| {
                entity.blocking
                    && entity.is_alive()
                    && entity.tile() == tile
                    && Some(entity.id) != ignore
            })
            .map(|entity| entity.id)
    }
}
