//! # Direction Buffer
//!
//! Combines two near-simultaneous direction keys into one diagonal move.
//!
//! A lone key is held for `tolerance` seconds before it is committed as an
//! axis move, so that a perpendicular key arriving inside the window can
//! still turn it into a diagonal. Times are plain seconds supplied by the
//! caller, which keeps the buffer independent of any clock.

use crate::{DirectionKey, PlayerCommand};
use log::trace;

/// Holds at most one pending direction key.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionBuffer {
    tolerance: f64,
    pending: Option<(DirectionKey, f64)>,
}

impl DirectionBuffer {
    /// Creates a buffer with a combining window of `tolerance` seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use crypt::{DirectionBuffer, DirectionKey, PlayerCommand};
    ///
    /// let mut buffer = DirectionBuffer::new(0.010);
    /// assert_eq!(buffer.press(DirectionKey::Right, 1.000), None);
    /// assert_eq!(
    ///     buffer.press(DirectionKey::Down, 1.004),
    ///     Some(PlayerCommand::Move { dx: 1, dy: 1 })
    /// );
    /// ```
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.max(0.0),
            pending: None,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The key waiting for a partner, if any.
    pub fn pending(&self) -> Option<DirectionKey> {
        self.pending.map(|(key, _)| key)
    }

    /// Registers a key press at time `now`.
    ///
    /// Returns a diagonal when `key` is perpendicular to a key pressed within
    /// the window. A second key on the same axis replaces the pending one and
    /// restarts the window. A pending key whose window already ran out is
    /// committed here and `key` becomes the new pending key.
    pub fn press(&mut self, key: DirectionKey, now: f64) -> Option<PlayerCommand> {
        match self.pending.take() {
            Some((held, at)) if now - at <= self.tolerance => {
                if held.is_perpendicular_to(key) {
                    let (hx, hy) = held.to_delta();
                    let (kx, ky) = key.to_delta();
                    trace!("Combined {:?} and {:?} into a diagonal", held, key);
                    Some(PlayerCommand::Move {
                        dx: hx + kx,
                        dy: hy + ky,
                    })
                } else {
                    trace!("{:?} replaces pending {:?}", key, held);
                    self.pending = Some((key, now));
                    None
                }
            }
            Some((held, _)) => {
                self.pending = Some((key, now));
                Some(held.to_command())
            }
            None => {
                self.pending = Some((key, now));
                None
            }
        }
    }

    /// Commits the pending key as an axis move once its window has elapsed.
    pub fn poll(&mut self, now: f64) -> Option<PlayerCommand> {
        match self.pending {
            Some((held, at)) if now - at >= self.tolerance => {
                self.pending = None;
                Some(held.to_command())
            }
            _ => None,
        }
    }

    /// Drops any pending key.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOL: f64 = 0.010;

    #[test]
    fn test_lone_key_waits_for_window() {
        let mut buffer = DirectionBuffer::new(TOL);
        assert_eq!(buffer.press(DirectionKey::Up, 0.0), None);
        assert_eq!(buffer.poll(0.005), None);
        assert_eq!(buffer.pending(), Some(DirectionKey::Up));
        assert_eq!(
            buffer.poll(0.011),
            Some(PlayerCommand::Move { dx: 0, dy: -1 })
        );
        assert_eq!(buffer.pending(), None);
        assert_eq!(buffer.poll(0.5), None);
    }

    #[test]
    fn test_perpendicular_keys_combine() {
        let mut buffer = DirectionBuffer::new(TOL);
        buffer.press(DirectionKey::Up, 2.0);
        assert_eq!(
            buffer.press(DirectionKey::Left, 2.008),
            Some(PlayerCommand::Move { dx: -1, dy: -1 })
        );
        assert_eq!(buffer.pending(), None);
    }

    #[test]
    fn test_same_axis_key_replaces_pending() {
        let mut buffer = DirectionBuffer::new(TOL);
        buffer.press(DirectionKey::Left, 0.0);
        assert_eq!(buffer.press(DirectionKey::Right, 0.004), None);
        assert_eq!(buffer.pending(), Some(DirectionKey::Right));
        // The window restarts from the replacing press.
        assert_eq!(buffer.poll(0.012), None);
        assert_eq!(
            buffer.poll(0.014),
            Some(PlayerCommand::Move { dx: 1, dy: 0 })
        );
    }

    #[test]
    fn test_late_second_key_commits_first() {
        let mut buffer = DirectionBuffer::new(TOL);
        buffer.press(DirectionKey::Down, 0.0);
        assert_eq!(
            buffer.press(DirectionKey::Right, 0.050),
            Some(PlayerCommand::Move { dx: 0, dy: 1 })
        );
        assert_eq!(buffer.pending(), Some(DirectionKey::Right));
    }

    #[test]
    fn test_zero_tolerance_still_combines_same_instant() {
        let mut buffer = DirectionBuffer::new(0.0);
        buffer.press(DirectionKey::Down, 1.0);
        assert_eq!(
            buffer.press(DirectionKey::Right, 1.0),
            Some(PlayerCommand::Move { dx: 1, dy: 1 })
        );
    }

    fn any_key() -> impl Strategy<Value = DirectionKey> {
        prop_oneof![
            Just(DirectionKey::Up),
            Just(DirectionKey::Down),
            Just(DirectionKey::Left),
            Just(DirectionKey::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_commands_are_single_steps(
            presses in prop::collection::vec((any_key(), 0.0f64..0.05), 1..20)
        ) {
            let mut buffer = DirectionBuffer::new(TOL);
            let mut now = 0.0;
            let mut commands = Vec::new();
            for (key, gap) in presses {
                now += gap;
                commands.extend(buffer.poll(now));
                commands.extend(buffer.press(key, now));
            }
            commands.extend(buffer.poll(now + 1.0));

            prop_assert!(buffer.pending().is_none());
            for command in commands {
                match command {
                    PlayerCommand::Move { dx, dy } => {
                        prop_assert!((-1..=1).contains(&dx) && (-1..=1).contains(&dy));
                        prop_assert!(dx != 0 || dy != 0);
                    }
                    PlayerCommand::Wait => prop_assert!(false, "buffer never waits"),
                }
            }
        }
    }
}
