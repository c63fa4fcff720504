//! # User Interface Elements
//!
//! The message log and HUD text. Nothing here draws; the display turns these
//! strings into pixels.

use crate::{EntityId, GameCompletionState, GameEvent, GameState, MoveOutcome, TurnPhase};
use std::collections::VecDeque;

/// Bounded history of player-facing messages.
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: VecDeque<String>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Adds a message, dropping the oldest one when full.
    pub fn push(&mut self, message: impl Into<String>) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }

    /// The newest `count` messages, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &str> + '_ {
        let skip = self.messages.len().saturating_sub(count);
        self.messages.iter().skip(skip).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Turns an event into a line for the message log, from the player's point of view.
pub fn event_message(event: &GameEvent, player_id: Option<EntityId>) -> Option<String> {
    let is_player = |id: &EntityId| Some(*id) == player_id;
    match event {
        GameEvent::Attacked {
            attacker, damage, ..
        } if is_player(attacker) => Some(format!("You hit the skeleton for {}.", damage)),
        GameEvent::Attacked { target, damage, .. } if is_player(target) => {
            Some(format!("A skeleton hits you for {}.", damage))
        }
        GameEvent::EntityDied { entity_id, .. } if is_player(entity_id) => {
            Some("You die.".to_string())
        }
        GameEvent::EntityDied { .. } => Some("The skeleton crumbles.".to_string()),
        GameEvent::MoveBlocked {
            entity_id,
            outcome: MoveOutcome::BlockedWall,
        } if is_player(entity_id) => Some("A wall blocks your way.".to_string()),
        _ => None,
    }
}

/// HUD lines for the side panel.
pub fn hud_lines(state: &GameState, phase: TurnPhase, turn_number: u64) -> Vec<String> {
    let mut lines = Vec::new();
    match state.player() {
        Some(player) => lines.push(format!("HP: {}/{}", player.hp, player.max_hp)),
        None => lines.push("HP: 0".to_string()),
    }
    lines.push(format!("Turn: {}", turn_number));
    lines.push(format!("Enemies: {}", state.enemies_in_order().len()));
    lines.push(
        match phase {
            TurnPhase::PlayerActive => "Your move",
            TurnPhase::AwaitingPlayerAnimation => "Moving...",
            TurnPhase::EnemyActive => "Enemies act",
        }
        .to_string(),
    );
    match state.completion {
        GameCompletionState::Playing => {}
        GameCompletionState::PlayerDied => {
            lines.push("You died. Press R to restart.".to_string());
        }
        GameCompletionState::Cleared => {
            lines.push("Level cleared! Press R to restart.".to_string());
        }
    }
    lines
}
