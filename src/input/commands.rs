//! # Command Definitions
//!
//! Raw key events and the inputs they turn into.

use crate::PlayerCommand;

/// One of the four cardinal direction keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionKey {
    Up,
    Down,
    Left,
    Right,
}

impl DirectionKey {
    /// The (dx, dy) step this key asks for on its own.
    pub fn to_delta(self) -> (i32, i32) {
        match self {
            DirectionKey::Up => (0, -1),
            DirectionKey::Down => (0, 1),
            DirectionKey::Left => (-1, 0),
            DirectionKey::Right => (1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, DirectionKey::Left | DirectionKey::Right)
    }

    /// Whether the two keys lie on different axes and so can form a diagonal.
    pub fn is_perpendicular_to(self, other: DirectionKey) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }

    /// The single-axis move for this key.
    pub fn to_command(self) -> PlayerCommand {
        let (dx, dy) = self.to_delta();
        PlayerCommand::Move { dx, dy }
    }
}

/// A key event as delivered by the window layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Pressed(DirectionKey),
    Wait,
    Quit,
    Restart,
}

/// Player input after disambiguation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// A command for the turn scheduler
    Command(PlayerCommand),
    /// Quit the game
    Quit,
    /// Start a new game (when the game has ended)
    Restart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perpendicular_keys() {
        assert!(DirectionKey::Up.is_perpendicular_to(DirectionKey::Left));
        assert!(!DirectionKey::Up.is_perpendicular_to(DirectionKey::Down));
        assert!(!DirectionKey::Right.is_perpendicular_to(DirectionKey::Right));
    }

    #[test]
    fn test_key_commands() {
        assert_eq!(
            DirectionKey::Left.to_command(),
            PlayerCommand::Move { dx: -1, dy: 0 }
        );
        assert_eq!(DirectionKey::Down.to_delta(), (0, 1));
    }
}
