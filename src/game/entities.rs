//! # Entities
//!
//! A single entity record for everything that occupies a tile. Behaviour
//! differences between kinds live in a profile table, not in types.

use crate::config::DEFAULT_ATTACK_DAMAGE;
use crate::game::world::tile_to_pixel;
use crate::{new_entity_id, EntityId, Motion, PixelPosition, Position};
use serde::{Deserialize, Serialize};

/// The closed set of things that can stand on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Skeleton,
}

/// How an entity decides what to do on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiPolicy {
    /// Acts only on player input.
    Controlled,
    /// Attacks when adjacent, otherwise steps toward the player.
    Chase,
}

/// Static per-kind data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindProfile {
    pub name: &'static str,
    pub max_hp: i32,
    pub blocking: bool,
    pub ai: AiPolicy,
    pub melee_damage: u32,
}

const PLAYER_PROFILE: KindProfile = KindProfile {
    name: "player",
    max_hp: 10,
    blocking: true,
    ai: AiPolicy::Controlled,
    melee_damage: DEFAULT_ATTACK_DAMAGE,
};

const SKELETON_PROFILE: KindProfile = KindProfile {
    name: "skeleton",
    max_hp: 4,
    blocking: true,
    ai: AiPolicy::Chase,
    melee_damage: DEFAULT_ATTACK_DAMAGE,
};

impl EntityKind {
    /// Looks up the profile for this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use crypt::{AiPolicy, EntityKind};
    ///
    /// assert_eq!(EntityKind::Skeleton.profile().max_hp, 4);
    /// assert_eq!(EntityKind::Player.profile().ai, AiPolicy::Controlled);
    /// ```
    pub fn profile(self) -> &'static KindProfile {
        match self {
            EntityKind::Player => &PLAYER_PROFILE,
            EntityKind::Skeleton => &SKELETON_PROFILE,
        }
    }

    /// Whether this kind takes part in the enemy phase.
    pub fn is_enemy(self) -> bool {
        self.profile().ai != AiPolicy::Controlled
    }
}

/// An entity in play.
///
/// `tile` is authoritative and is written only through tile reservation on
/// the game state. `pixel` is visual and follows `motion`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub(crate) tile: Position,
    pub(crate) pixel: PixelPosition,
    pub hp: i32,
    pub max_hp: i32,
    pub blocking: bool,
    pub(crate) motion: Motion,
}

impl Entity {
    /// Creates an entity standing at rest on the centre of `tile`.
    pub fn spawn(kind: EntityKind, tile: Position, tile_size: f32) -> Self {
        let profile = kind.profile();
        Self {
            id: new_entity_id(),
            kind,
            tile,
            pixel: tile_to_pixel(tile, tile_size),
            hp: profile.max_hp,
            max_hp: profile.max_hp,
            blocking: profile.blocking,
            motion: Motion::Idle,
        }
    }

    /// Overrides the starting hit points.
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self.max_hp = self.max_hp.max(hp);
        self
    }

    /// The logical tile this entity occupies.
    pub fn tile(&self) -> Position {
        self.tile
    }

    /// Where the entity is drawn. Lags `tile` while a move animates.
    pub fn pixel(&self) -> PixelPosition {
        self.pixel
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// The static profile for this entity's kind.
    pub fn profile(&self) -> &'static KindProfile {
        self.kind.profile()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Subtracts damage and reports whether the entity is now dead.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.hp = self.hp.saturating_sub(amount);
        !self.is_alive()
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_moving()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_uses_profile() {
        let skeleton = Entity::spawn(EntityKind::Skeleton, Position::new(2, 3), 32.0);
        assert_eq!(skeleton.hp, 4);
        assert!(skeleton.blocking);
        assert_eq!(skeleton.tile(), Position::new(2, 3));
        assert_eq!(skeleton.pixel(), PixelPosition::new(80.0, 112.0));
        assert!(!skeleton.is_animating());
    }

    #[test]
    fn test_damage_kills_at_zero() {
        let mut skeleton = Entity::spawn(EntityKind::Skeleton, Position::new(1, 1), 32.0);
        assert!(!skeleton.apply_damage(3));
        assert_eq!(skeleton.hp, 1);
        assert!(skeleton.apply_damage(1));
        assert!(!skeleton.is_alive());
    }

    #[test]
    fn test_enemy_classification() {
        assert!(EntityKind::Skeleton.is_enemy());
        assert!(!EntityKind::Player.is_enemy());
    }

    #[test]
    fn test_with_hp_override() {
        let player = Entity::spawn(EntityKind::Player, Position::new(1, 1), 32.0).with_hp(3);
        assert_eq!(player.hp, 3);
        assert_eq!(player.max_hp, 10);
    }
}
