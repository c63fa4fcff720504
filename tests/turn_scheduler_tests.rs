//! Turn scheduler behaviour driven through the public API, frame by frame.

use crypt::{
    CryptResult, Entity, EntityKind, GameCompletionState, GameEvent, GameState, Grid,
    PlayerCommand, Position, Settings, TurnPhase, TurnScheduler,
};

const FRAME: f32 = 1.0 / 60.0;

fn level(rows: &str) -> CryptResult<GameState> {
    GameState::new(Settings::default(), Grid::from_ascii(rows)?)
}

/// Runs frames until the scheduler hands control back to the player.
fn run_until_player_turn(
    scheduler: &mut TurnScheduler,
    state: &mut GameState,
) -> CryptResult<Vec<GameEvent>> {
    let mut events = Vec::new();
    for _ in 0..600 {
        events.extend(scheduler.update(state, FRAME)?.events);
        if scheduler.phase() == TurnPhase::PlayerActive {
            break;
        }
    }
    Ok(events)
}

fn phase_changes(events: &[GameEvent]) -> Vec<(TurnPhase, TurnPhase)> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::PhaseChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_moved_player_visits_each_phase_once() -> CryptResult<()> {
    let mut state = level(
        "
        ########
        #......#
        ########
        ",
    )?;
    state.spawn(EntityKind::Player, Position::new(1, 1))?;
    state.spawn(EntityKind::Skeleton, Position::new(6, 1))?;
    let mut scheduler = TurnScheduler::new();

    let mut events = scheduler
        .submit(&mut state, PlayerCommand::Move { dx: 1, dy: 0 })?
        .events;
    assert_eq!(scheduler.phase(), TurnPhase::AwaitingPlayerAnimation);
    events.extend(run_until_player_turn(&mut scheduler, &mut state)?);

    assert_eq!(
        phase_changes(&events),
        vec![
            (TurnPhase::PlayerActive, TurnPhase::AwaitingPlayerAnimation),
            (TurnPhase::AwaitingPlayerAnimation, TurnPhase::EnemyActive),
            (TurnPhase::EnemyActive, TurnPhase::PlayerActive),
        ]
    );
    assert_eq!(scheduler.turn_number(), 1);
    assert!(!state.any_animating());
    Ok(())
}

#[test]
fn test_enemy_waits_for_player_animation() -> CryptResult<()> {
    let mut state = level(
        "
        ########
        #......#
        ########
        ",
    )?;
    state.spawn(EntityKind::Player, Position::new(1, 1))?;
    let skeleton = state.spawn(EntityKind::Skeleton, Position::new(6, 1))?;
    let mut scheduler = TurnScheduler::new();

    scheduler.submit(&mut state, PlayerCommand::Move { dx: 1, dy: 0 })?;
    scheduler.update(&mut state, FRAME)?;
    assert_eq!(scheduler.phase(), TurnPhase::AwaitingPlayerAnimation);
    assert_eq!(state.entity_tile(skeleton), Some(Position::new(6, 1)));

    run_until_player_turn(&mut scheduler, &mut state)?;
    assert_eq!(state.entity_tile(skeleton), Some(Position::new(5, 1)));
    Ok(())
}

#[test]
fn test_attack_passes_turn_without_animation() -> CryptResult<()> {
    let mut state = level(
        "
        #####
        #...#
        #####
        ",
    )?;
    let player = state.spawn(EntityKind::Player, Position::new(1, 1))?;
    let skeleton = state.spawn(EntityKind::Skeleton, Position::new(2, 1))?;
    let mut scheduler = TurnScheduler::new();

    let report = scheduler.submit(&mut state, PlayerCommand::Move { dx: 1, dy: 0 })?;
    assert!(report.accepted);
    // The skeleton strikes back in the same call; no frame is needed.
    assert_eq!(
        report.phase_changes(),
        vec![
            (TurnPhase::PlayerActive, TurnPhase::EnemyActive),
            (TurnPhase::EnemyActive, TurnPhase::PlayerActive),
        ]
    );
    assert!(report.events.contains(&GameEvent::Attacked {
        attacker: player,
        target: skeleton,
        damage: 1,
    }));
    assert!(report.events.contains(&GameEvent::Attacked {
        attacker: skeleton,
        target: player,
        damage: 1,
    }));
    assert_eq!(state.player().map(|p| p.hp), Some(9));
    assert_eq!(state.statistics.damage_dealt, 1);
    assert_eq!(state.statistics.damage_taken, 1);
    Ok(())
}

#[test]
fn test_fight_to_the_death() -> CryptResult<()> {
    let mut state = level(
        "
        #####
        #...#
        #####
        ",
    )?;
    state.spawn(EntityKind::Player, Position::new(1, 1))?;
    let skeleton = state.spawn(EntityKind::Skeleton, Position::new(2, 1))?;
    let mut scheduler = TurnScheduler::new();

    for _ in 0..3 {
        scheduler.submit(&mut state, PlayerCommand::Move { dx: 1, dy: 0 })?;
        assert!(state.entity(skeleton).is_some());
    }
    let report = scheduler.submit(&mut state, PlayerCommand::Move { dx: 1, dy: 0 })?;
    assert!(report.events.contains(&GameEvent::EntityDied {
        entity_id: skeleton,
        killer: state.player_id,
    }));
    assert_eq!(state.completion, GameCompletionState::Cleared);
    assert_eq!(state.player().map(|p| p.hp), Some(7));
    assert_eq!(state.statistics.enemies_defeated, 1);

    // The game is over; further input is ignored.
    let report = scheduler.submit(&mut state, PlayerCommand::Wait)?;
    assert!(!report.accepted);
    assert!(report.events.is_empty());
    Ok(())
}

#[test]
fn test_player_death_stops_enemy_phase() -> CryptResult<()> {
    let mut state = level(
        "
        #####
        #...#
        #...#
        #####
        ",
    )?;
    let player = Entity::spawn(EntityKind::Player, Position::new(2, 1), 32.0).with_hp(1);
    let player = state.add_entity(player)?;
    let first = state.spawn(EntityKind::Skeleton, Position::new(1, 1))?;
    let second = state.spawn(EntityKind::Skeleton, Position::new(3, 2))?;
    let mut scheduler = TurnScheduler::new();

    let report = scheduler.submit(&mut state, PlayerCommand::Wait)?;
    assert!(report.events.contains(&GameEvent::EntityDied {
        entity_id: player,
        killer: Some(first),
    }));
    assert!(!report
        .events
        .iter()
        .any(|event| matches!(event, GameEvent::Attacked { attacker, .. } if *attacker == second)));
    assert_eq!(state.completion, GameCompletionState::PlayerDied);
    assert!(!scheduler.accepts_input(&state));
    assert_eq!(scheduler.pending_enemies().count(), 0);
    Ok(())
}

#[test]
fn test_skeleton_closes_in_then_attacks() -> CryptResult<()> {
    let mut state = level(
        "
        ######
        #....#
        #....#
        ######
        ",
    )?;
    state.spawn(EntityKind::Player, Position::new(1, 1))?;
    let skeleton = state.spawn(EntityKind::Skeleton, Position::new(4, 2))?;
    let mut scheduler = TurnScheduler::new();

    // Diagonal approach: (4,2) -> (3,1).
    scheduler.submit(&mut state, PlayerCommand::Wait)?;
    run_until_player_turn(&mut scheduler, &mut state)?;
    assert_eq!(state.entity_tile(skeleton), Some(Position::new(3, 1)));

    scheduler.submit(&mut state, PlayerCommand::Wait)?;
    run_until_player_turn(&mut scheduler, &mut state)?;
    assert_eq!(state.entity_tile(skeleton), Some(Position::new(2, 1)));
    assert_eq!(state.player().map(|p| p.hp), Some(10));

    // Adjacent now: the skeleton attacks instead of moving.
    let report = scheduler.submit(&mut state, PlayerCommand::Wait)?;
    assert_eq!(scheduler.phase(), TurnPhase::PlayerActive);
    assert_eq!(state.entity_tile(skeleton), Some(Position::new(2, 1)));
    assert_eq!(state.player().map(|p| p.hp), Some(9));
    assert!(report
        .events
        .contains(&GameEvent::TurnCompleted { turn_number: 3 }));
    Ok(())
}

#[test]
fn test_diagonal_bump_across_wall_corner_attacks() -> CryptResult<()> {
    let mut state = level(
        "
        #####
        #.#.#
        #...#
        #####
        ",
    )?;
    let player = state.spawn(EntityKind::Player, Position::new(1, 1))?;
    let skeleton = state.spawn(EntityKind::Skeleton, Position::new(2, 2))?;
    let mut scheduler = TurnScheduler::new();

    let report = scheduler.submit(&mut state, PlayerCommand::Move { dx: 1, dy: 1 })?;
    assert!(report.accepted);
    assert!(report.events.contains(&GameEvent::Attacked {
        attacker: player,
        target: skeleton,
        damage: 1,
    }));
    assert_eq!(state.entity_tile(player), Some(Position::new(1, 1)));
    assert_eq!(state.entity(skeleton).map(|e| e.hp), Some(3));
    Ok(())
}
