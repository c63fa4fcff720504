//! # Turn Scheduler
//!
//! Alternates the player's turn with a sequential enemy phase.
//!
//! The scheduler is a plain state machine advanced by the game loop:
//!
//! ```text
//! PlayerActive --(legal move)--> AwaitingPlayerAnimation --(animation done)--> EnemyActive
//! PlayerActive --(attack / wait)--------------------------------------------> EnemyActive
//! EnemyActive  --(queue empty)--> PlayerActive
//! ```
//!
//! While in `EnemyActive`, an enemy that actually moves suspends the phase
//! until its own animation finishes on a later tick; attacks and skipped
//! turns do not suspend.

use crate::{CryptError, CryptResult, EntityId, GameState, MoveOutcome, Position};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The scheduler's current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for player input
    PlayerActive,
    /// The player moved; waiting for the move animation to land
    AwaitingPlayerAnimation,
    /// Enemies are acting one at a time
    EnemyActive,
}

/// A decision submitted on the player's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerCommand {
    /// Step by (dx, dy), each in -1..=1; attacks if an entity blocks
    Move { dx: i32, dy: i32 },
    /// Pass the turn without moving
    Wait,
}

/// What an enemy wants to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyIntent {
    /// Already adjacent: hit the target.
    Attack(EntityId),
    /// Step toward the player.
    Step { dx: i32, dy: i32 },
    /// Nothing to do.
    Idle,
}

/// Something that happened while advancing the turn state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged {
        from: TurnPhase,
        to: TurnPhase,
    },
    EntityMoved {
        entity_id: EntityId,
        from: Position,
        to: Position,
    },
    MoveBlocked {
        entity_id: EntityId,
        outcome: MoveOutcome,
    },
    Attacked {
        attacker: EntityId,
        target: EntityId,
        damage: u32,
    },
    EntityDied {
        entity_id: EntityId,
        killer: Option<EntityId>,
    },
    Waited {
        entity_id: EntityId,
    },
    TurnCompleted {
        turn_number: u64,
    },
}

/// Result of a scheduler call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Whether a submitted command was acted on and used up the player's turn
    pub accepted: bool,
    /// Events in the order they happened
    pub events: Vec<GameEvent>,
}

impl TurnReport {
    /// Phase transitions contained in this report.
    pub fn phase_changes(&self) -> Vec<(TurnPhase, TurnPhase)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                GameEvent::PhaseChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

/// Decides an enemy's action for this turn.
///
/// Adjacent (Chebyshev distance 1) enemies attack the player. Otherwise the
/// enemy steps toward the player on both axes at once, which may be a
/// diagonal; the shared movement policy handles walls.
pub fn decide_enemy_action(state: &GameState, enemy: EntityId) -> CryptResult<EnemyIntent> {
    let entity = state
        .entity(enemy)
        .ok_or(CryptError::EntityNotFound(enemy))?;
    if !entity.kind.is_enemy() || !entity.is_alive() {
        return Ok(EnemyIntent::Idle);
    }
    let player = match state.player() {
        Some(player) => player,
        None => return Ok(EnemyIntent::Idle),
    };

    let from = entity.tile();
    let to = player.tile();
    match from.chebyshev_distance(to) {
        0 => Ok(EnemyIntent::Idle),
        1 => Ok(EnemyIntent::Attack(player.id)),
        _ => Ok(EnemyIntent::Step {
            dx: (to.x - from.x).signum(),
            dy: (to.y - from.y).signum(),
        }),
    }
}

/// Whether an enemy's turn left something to wait for.
enum EnemyTurn {
    Done,
    Suspended,
}

/// Player/enemy turn state machine.
#[derive(Debug, Clone)]
pub struct TurnScheduler {
    phase: TurnPhase,
    enemy_queue: VecDeque<EntityId>,
    waiting_on: Option<EntityId>,
    turn_number: u64,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnScheduler {
    /// Creates a scheduler waiting for the player.
    pub fn new() -> Self {
        Self {
            phase: TurnPhase::PlayerActive,
            enemy_queue: VecDeque::new(),
            waiting_on: None,
            turn_number: 0,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Completed rounds so far.
    pub fn turn_number(&self) -> u64 {
        self.turn_number
    }

    /// Enemies still to act in the current enemy phase.
    pub fn pending_enemies(&self) -> impl Iterator<Item = &EntityId> + '_ {
        self.enemy_queue.iter()
    }

    /// The entity whose animation currently holds the turn, if any.
    pub fn waiting_on(&self) -> Option<EntityId> {
        self.waiting_on
    }

    /// Whether a player command would be acted on right now.
    pub fn accepts_input(&self, state: &GameState) -> bool {
        self.phase == TurnPhase::PlayerActive && !state.is_game_over()
    }

    /// Applies the player's decision.
    ///
    /// Outside [`TurnPhase::PlayerActive`] the command is dropped. A move into
    /// a wall is reported but does not use up the turn.
    pub fn submit(&mut self, state: &mut GameState, command: PlayerCommand) -> CryptResult<TurnReport> {
        let mut report = TurnReport::default();
        if !self.accepts_input(state) {
            debug!("Ignoring {:?} during {:?}", command, self.phase);
            return Ok(report);
        }
        let player = state
            .player_id
            .ok_or_else(|| CryptError::InvalidState("No player found".to_string()))?;

        match command {
            PlayerCommand::Move { dx, dy } => {
                let from = state
                    .entity_tile(player)
                    .ok_or(CryptError::EntityNotFound(player))?;
                let check = state.try_move(player, dx, dy)?;
                match check.outcome {
                    MoveOutcome::Moved => {
                        report.accepted = true;
                        self.emit(
                            state,
                            &mut report.events,
                            GameEvent::EntityMoved {
                                entity_id: player,
                                from,
                                to: check.target,
                            },
                        );
                        self.waiting_on = Some(player);
                        self.set_phase(state, &mut report.events, TurnPhase::AwaitingPlayerAnimation);
                    }
                    MoveOutcome::BlockedEntity(blocker) => {
                        report.accepted = true;
                        self.resolve_attack(state, &mut report.events, player, blocker)?;
                        self.begin_enemy_phase(state, &mut report.events);
                        self.run_enemy_phase(state, &mut report.events)?;
                    }
                    MoveOutcome::BlockedWall => {
                        self.emit(
                            state,
                            &mut report.events,
                            GameEvent::MoveBlocked {
                                entity_id: player,
                                outcome: check.outcome,
                            },
                        );
                    }
                }
            }
            PlayerCommand::Wait => {
                report.accepted = true;
                self.emit(state, &mut report.events, GameEvent::Waited { entity_id: player });
                self.begin_enemy_phase(state, &mut report.events);
                self.run_enemy_phase(state, &mut report.events)?;
            }
        }

        Ok(report)
    }

    /// Advances animations by `dt` seconds and then the turn state.
    ///
    /// Call once per frame.
    pub fn update(&mut self, state: &mut GameState, dt: f32) -> CryptResult<TurnReport> {
        let mut report = TurnReport::default();
        state.advance_animations(dt);

        match self.phase {
            TurnPhase::PlayerActive => {}
            TurnPhase::AwaitingPlayerAnimation => {
                if self.animation_pending(state) {
                    return Ok(report);
                }
                self.begin_enemy_phase(state, &mut report.events);
                self.run_enemy_phase(state, &mut report.events)?;
            }
            TurnPhase::EnemyActive => {
                if self.animation_pending(state) {
                    return Ok(report);
                }
                self.run_enemy_phase(state, &mut report.events)?;
            }
        }

        Ok(report)
    }

    /// Clears `waiting_on` once its animation has finished.
    fn animation_pending(&mut self, state: &GameState) -> bool {
        match self.waiting_on {
            Some(id) if state.is_animating(id) => true,
            _ => {
                self.waiting_on = None;
                false
            }
        }
    }

    fn begin_enemy_phase(&mut self, state: &mut GameState, events: &mut Vec<GameEvent>) {
        self.enemy_queue = state.enemies_in_order().into();
        self.set_phase(state, events, TurnPhase::EnemyActive);
    }

    /// Lets queued enemies act until one starts a move or the queue empties.
    fn run_enemy_phase(&mut self, state: &mut GameState, events: &mut Vec<GameEvent>) -> CryptResult<()> {
        while let Some(enemy) = self.enemy_queue.pop_front() {
            if state.is_game_over() {
                self.enemy_queue.clear();
                break;
            }
            if state.entity(enemy).is_none() {
                continue;
            }
            if let EnemyTurn::Suspended = self.take_enemy_turn(state, events, enemy)? {
                self.waiting_on = Some(enemy);
                return Ok(());
            }
        }

        self.turn_number += 1;
        self.emit(
            state,
            events,
            GameEvent::TurnCompleted {
                turn_number: self.turn_number,
            },
        );
        self.set_phase(state, events, TurnPhase::PlayerActive);
        Ok(())
    }

    fn take_enemy_turn(
        &mut self,
        state: &mut GameState,
        events: &mut Vec<GameEvent>,
        enemy: EntityId,
    ) -> CryptResult<EnemyTurn> {
        match decide_enemy_action(state, enemy)? {
            EnemyIntent::Idle => Ok(EnemyTurn::Done),
            EnemyIntent::Attack(target) => {
                self.resolve_attack(state, events, enemy, target)?;
                Ok(EnemyTurn::Done)
            }
            EnemyIntent::Step { dx, dy } => {
                let from = state
                    .entity_tile(enemy)
                    .ok_or(CryptError::EntityNotFound(enemy))?;
                let check = state.try_move(enemy, dx, dy)?;
                match check.outcome {
                    MoveOutcome::Moved => {
                        self.emit(
                            state,
                            events,
                            GameEvent::EntityMoved {
                                entity_id: enemy,
                                from,
                                to: check.target,
                            },
                        );
                        Ok(EnemyTurn::Suspended)
                    }
                    MoveOutcome::BlockedEntity(blocker) if Some(blocker) == state.player_id => {
                        self.resolve_attack(state, events, enemy, blocker)?;
                        Ok(EnemyTurn::Done)
                    }
                    outcome => {
                        self.emit(
                            state,
                            events,
                            GameEvent::MoveBlocked {
                                entity_id: enemy,
                                outcome,
                            },
                        );
                        Ok(EnemyTurn::Done)
                    }
                }
            }
        }
    }

    fn resolve_attack(
        &mut self,
        state: &mut GameState,
        events: &mut Vec<GameEvent>,
        attacker: EntityId,
        target: EntityId,
    ) -> CryptResult<()> {
        let outcome = state.attack(attacker, target, None)?;
        self.emit(
            state,
            events,
            GameEvent::Attacked {
                attacker,
                target,
                damage: outcome.damage(),
            },
        );
        if outcome.is_kill() {
            self.emit(
                state,
                events,
                GameEvent::EntityDied {
                    entity_id: target,
                    killer: Some(attacker),
                },
            );
            if Some(target) == state.player_id {
                warn!("Player killed by {}", attacker);
            }
        }
        Ok(())
    }

    fn set_phase(&mut self, state: &mut GameState, events: &mut Vec<GameEvent>, to: TurnPhase) {
        if self.phase == to {
            return;
        }
        let from = self.phase;
        self.phase = to;
        debug!("Turn phase {:?} -> {:?}", from, to);
        self.emit(state, events, GameEvent::PhaseChanged { from, to });
    }

    fn emit(&self, state: &mut GameState, events: &mut Vec<GameEvent>, event: GameEvent) {
        if let GameEvent::TurnCompleted { turn_number } = event {
            info!("Turn {} complete", turn_number);
        }
        state.record_event(&event);
        events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityKind, Grid, Settings};

    fn room(rows: &str) -> GameState {
        GameState::new(Settings::default(), Grid::from_ascii(rows).unwrap()).unwrap()
    }

    fn settle(scheduler: &mut TurnScheduler, state: &mut GameState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..120 {
            events.extend(scheduler.update(state, 1.0 / 60.0).unwrap().events);
            if scheduler.phase() == TurnPhase::PlayerActive {
                break;
            }
        }
        events
    }

    #[test]
    fn test_decide_attack_when_adjacent_diagonally() {
        let mut state = room("#####\n#...#\n#...#\n#####");
        let player = state.spawn(EntityKind::Player, Position::new(1, 1)).unwrap();
        let skeleton = state.spawn(EntityKind::Skeleton, Position::new(2, 2)).unwrap();
        assert_eq!(
            decide_enemy_action(&state, skeleton).unwrap(),
            EnemyIntent::Attack(player)
        );
    }

    #[test]
    fn test_decide_step_toward_player() {
        let mut state = room("#######\n#.....#\n#.....#\n#.....#\n#######");
        state.spawn(EntityKind::Player, Position::new(1, 1)).unwrap();
        let skeleton = state.spawn(EntityKind::Skeleton, Position::new(5, 3)).unwrap();
        assert_eq!(
            decide_enemy_action(&state, skeleton).unwrap(),
            EnemyIntent::Step { dx: -1, dy: -1 }
        );
    }

    #[test]
    fn test_decide_idle_without_player() {
        let mut state = room("####\n#..#\n####");
        let skeleton = state.spawn(EntityKind::Skeleton, Position::new(1, 1)).unwrap();
        assert_eq!(decide_enemy_action(&state, skeleton).unwrap(), EnemyIntent::Idle);
    }

    #[test]
    fn test_wall_bump_keeps_player_turn() {
        let mut state = room("###\n#.#\n###");
        state.spawn(EntityKind::Player, Position::new(1, 1)).unwrap();
        let mut scheduler = TurnScheduler::new();

        let report = scheduler
            .submit(&mut state, PlayerCommand::Move { dx: 1, dy: 0 })
            .unwrap();
        assert!(!report.accepted);
        assert_eq!(scheduler.phase(), TurnPhase::PlayerActive);
        assert_eq!(scheduler.turn_number(), 0);
    }

    #[test]
    fn test_input_ignored_while_animating() {
        let mut state = room("#####\n#...#\n#####");
        let player = state.spawn(EntityKind::Player, Position::new(1, 1)).unwrap();
        let mut scheduler = TurnScheduler::new();

        scheduler
            .submit(&mut state, PlayerCommand::Move { dx: 1, dy: 0 })
            .unwrap();
        let report = scheduler
            .submit(&mut state, PlayerCommand::Move { dx: 1, dy: 0 })
            .unwrap();
        assert!(!report.accepted);
        assert_eq!(state.entity_tile(player), Some(Position::new(2, 1)));
        assert_eq!(scheduler.waiting_on(), Some(player));
    }

    #[test]
    fn test_wait_runs_enemies_immediately() {
        let mut state = room("#######\n#.....#\n#######");
        let player = state.spawn(EntityKind::Player, Position::new(1, 1)).unwrap();
        let skeleton = state.spawn(EntityKind::Skeleton, Position::new(5, 1)).unwrap();
        let mut scheduler = TurnScheduler::new();

        let report = scheduler.submit(&mut state, PlayerCommand::Wait).unwrap();
        assert!(report.accepted);
        assert_eq!(
            report.phase_changes(),
            vec![(TurnPhase::PlayerActive, TurnPhase::EnemyActive)]
        );
        assert_eq!(scheduler.phase(), TurnPhase::EnemyActive);
        assert_eq!(scheduler.waiting_on(), Some(skeleton));
        assert_eq!(state.entity_tile(skeleton), Some(Position::new(4, 1)));

        settle(&mut scheduler, &mut state);
        assert_eq!(scheduler.phase(), TurnPhase::PlayerActive);
        assert_eq!(scheduler.turn_number(), 1);
        assert_eq!(state.entity_tile(player), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_enemies_act_one_at_a_time() {
        let mut state = room("########\n#......#\n#......#\n#......#\n########");
        state.spawn(EntityKind::Player, Position::new(1, 1)).unwrap();
        let first = state.spawn(EntityKind::Skeleton, Position::new(6, 1)).unwrap();
        let second = state.spawn(EntityKind::Skeleton, Position::new(6, 3)).unwrap();
        let mut scheduler = TurnScheduler::new();

        scheduler.submit(&mut state, PlayerCommand::Wait).unwrap();
        // Only the first skeleton has moved; the second is still queued.
        assert_eq!(state.entity_tile(first), Some(Position::new(5, 1)));
        assert_eq!(state.entity_tile(second), Some(Position::new(6, 3)));
        assert_eq!(scheduler.pending_enemies().copied().collect::<Vec<_>>(), vec![second]);

        let events = settle(&mut scheduler, &mut state);
        assert_eq!(state.entity_tile(second), Some(Position::new(5, 2)));
        assert!(events.contains(&GameEvent::TurnCompleted { turn_number: 1 }));
        assert_eq!(state.statistics.turns_completed, 1);
    }

    #[test]
    fn test_enemy_blocked_by_enemy_skips_without_suspending() {
        let mut state = room("#######\n#.....#\n#######");
        state.spawn(EntityKind::Player, Position::new(1, 1)).unwrap();
        let front = state.spawn(EntityKind::Skeleton, Position::new(3, 1)).unwrap();
        let back = state.spawn(EntityKind::Skeleton, Position::new(4, 1)).unwrap();
        let mut scheduler = TurnScheduler::new();

        // Front skeleton steps next to the player and suspends the phase.
        scheduler.submit(&mut state, PlayerCommand::Wait).unwrap();
        assert_eq!(state.entity_tile(front), Some(Position::new(2, 1)));

        // The back skeleton then moves into the freed tile.
        settle(&mut scheduler, &mut state);
        assert_eq!(state.entity_tile(back), Some(Position::new(3, 1)));

        // Next turn: front attacks, back is blocked by front and just skips.
        let report = scheduler.submit(&mut state, PlayerCommand::Wait).unwrap();
        assert!(report.events.contains(&GameEvent::MoveBlocked {
            entity_id: back,
            outcome: MoveOutcome::BlockedEntity(front),
        }));
        assert_eq!(scheduler.phase(), TurnPhase::PlayerActive);
        assert_eq!(state.player().unwrap().hp, 9);
    }
}
