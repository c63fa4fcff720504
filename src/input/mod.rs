//! # Input Module
//!
//! Keyboard handling for the player's turn.
//!
//! Key events go through a [`DirectionBuffer`] so that pressing two arrow
//! keys at almost the same time produces one diagonal move instead of two
//! axis moves.

pub mod buffer;
pub mod commands;

pub use buffer::*;
pub use commands::*;

use crate::config::DEFAULT_DIAGONAL_TOLERANCE;
use crate::PlayerCommand;
use macroquad::input::{is_key_pressed, KeyCode};

/// Input handler for processing player commands.
///
/// Translates key events into [`PlayerInput`], buffering direction keys for
/// diagonal disambiguation.
///
/// The combining window is only as fine as the timestamps fed in. Through
/// [`InputHandler::read_keyboard`] every key seen in a frame carries the
/// frame's time, so keys landing in the same frame always combine and keys
/// in adjacent frames combine only when the tolerance exceeds the frame time
/// (about 16 ms at 60 fps).
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
    buffer: DirectionBuffer,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(DEFAULT_DIAGONAL_TOLERANCE)
    }
}

impl InputHandler {
    /// Creates a new input handler with a diagonal window of `tolerance` seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use crypt::{InputHandler, KeyEvent, PlayerInput};
    ///
    /// let mut input = InputHandler::new(0.010);
    /// assert_eq!(input.handle(KeyEvent::Quit, 0.0), Some(PlayerInput::Quit));
    /// ```
    pub fn new(tolerance: f64) -> Self {
        Self {
            vi_keys_enabled: true,
            buffer: DirectionBuffer::new(tolerance),
        }
    }

    /// Feeds one key event observed at `now` seconds.
    ///
    /// A wait, quit or restart discards any half-entered direction.
    pub fn handle(&mut self, event: KeyEvent, now: f64) -> Option<PlayerInput> {
        match event {
            KeyEvent::Pressed(key) => self.buffer.press(key, now).map(PlayerInput::Command),
            KeyEvent::Wait => {
                self.buffer.clear();
                Some(PlayerInput::Command(PlayerCommand::Wait))
            }
            KeyEvent::Quit => {
                self.buffer.clear();
                Some(PlayerInput::Quit)
            }
            KeyEvent::Restart => {
                self.buffer.clear();
                Some(PlayerInput::Restart)
            }
        }
    }

    /// Commits a buffered direction whose window has elapsed.
    pub fn poll(&mut self, now: f64) -> Option<PlayerInput> {
        self.buffer.poll(now).map(PlayerInput::Command)
    }

    /// Drops any buffered direction.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Reads this frame's key presses from macroquad and feeds them through
    /// [`InputHandler::handle`], then polls the buffer.
    ///
    /// All presses are stamped with `now`; macroquad does not report when
    /// within the frame a key went down.
    pub fn read_keyboard(&mut self, now: f64) -> Vec<PlayerInput> {
        let mut inputs: Vec<PlayerInput> = self
            .pressed_key_events()
            .into_iter()
            .filter_map(|event| self.handle(event, now))
            .collect();
        inputs.extend(self.poll(now));
        inputs
    }

    fn pressed_key_events(&self) -> Vec<KeyEvent> {
        let mut events = Vec::new();

        if is_key_pressed(KeyCode::Escape) {
            events.push(KeyEvent::Quit);
        }
        if is_key_pressed(KeyCode::R) {
            events.push(KeyEvent::Restart);
        }
        if is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::Period) {
            events.push(KeyEvent::Wait);
        }

        let mut bindings = vec![
            (KeyCode::Up, DirectionKey::Up),
            (KeyCode::Down, DirectionKey::Down),
            (KeyCode::Left, DirectionKey::Left),
            (KeyCode::Right, DirectionKey::Right),
            (KeyCode::W, DirectionKey::Up),
            (KeyCode::S, DirectionKey::Down),
            (KeyCode::A, DirectionKey::Left),
            (KeyCode::D, DirectionKey::Right),
        ];
        if self.vi_keys_enabled {
            bindings.extend([
                (KeyCode::K, DirectionKey::Up),
                (KeyCode::J, DirectionKey::Down),
                (KeyCode::H, DirectionKey::Left),
                (KeyCode::L, DirectionKey::Right),
            ]);
        }
        for (code, key) in bindings {
            if is_key_pressed(code) {
                events.push(KeyEvent::Pressed(key));
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    #[test]
    fn test_combining_window_is_frame_granular() {
        // Same frame: combined regardless of tolerance.
        let mut input = InputHandler::new(0.010);
        input.handle(KeyEvent::Pressed(DirectionKey::Left), FRAME);
        assert_eq!(
            input.handle(KeyEvent::Pressed(DirectionKey::Down), FRAME),
            Some(PlayerInput::Command(PlayerCommand::Move { dx: -1, dy: 1 }))
        );

        // Adjacent frames with a window shorter than a frame: two axis moves.
        let mut input = InputHandler::new(0.010);
        input.handle(KeyEvent::Pressed(DirectionKey::Left), FRAME);
        assert_eq!(input.poll(FRAME), None);
        assert_eq!(
            input.handle(KeyEvent::Pressed(DirectionKey::Down), 2.0 * FRAME),
            Some(PlayerInput::Command(PlayerCommand::Move { dx: -1, dy: 0 }))
        );

        // A window longer than a frame spans the frame boundary.
        let mut input = InputHandler::new(0.030);
        input.handle(KeyEvent::Pressed(DirectionKey::Left), FRAME);
        assert_eq!(input.poll(FRAME), None);
        assert_eq!(
            input.handle(KeyEvent::Pressed(DirectionKey::Down), 2.0 * FRAME),
            Some(PlayerInput::Command(PlayerCommand::Move { dx: -1, dy: 1 }))
        );
    }

    #[test]
    fn test_handle_routes_directions_through_buffer() {
        let mut input = InputHandler::new(0.010);
        assert_eq!(input.handle(KeyEvent::Pressed(DirectionKey::Up), 0.0), None);
        assert_eq!(
            input.handle(KeyEvent::Pressed(DirectionKey::Right), 0.002),
            Some(PlayerInput::Command(PlayerCommand::Move { dx: 1, dy: -1 }))
        );
    }

    #[test]
    fn test_wait_discards_pending_direction() {
        let mut input = InputHandler::new(0.010);
        input.handle(KeyEvent::Pressed(DirectionKey::Left), 0.0);
        assert_eq!(
            input.handle(KeyEvent::Wait, 0.001),
            Some(PlayerInput::Command(PlayerCommand::Wait))
        );
        assert_eq!(input.poll(1.0), None);
    }

    #[test]
    fn test_poll_commits_axis_move() {
        let mut input = InputHandler::default();
        input.handle(KeyEvent::Pressed(DirectionKey::Down), 0.0);
        assert_eq!(
            input.poll(0.02),
            Some(PlayerInput::Command(PlayerCommand::Move { dx: 0, dy: 1 }))
        );
    }
}
