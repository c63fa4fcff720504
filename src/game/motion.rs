//! # Motion
//!
//! Eased tile-to-tile pixel interpolation.
//!
//! A motion knows nothing about tiles or collision. It is started after a
//! tile has already been reserved and only moves the visual position.

use crate::PixelPosition;
use serde::{Deserialize, Serialize};

/// Quadratic ease-out: fast start, gentle landing.
///
/// # Examples
///
/// ```
/// use crypt::ease_out_quad;
///
/// assert_eq!(ease_out_quad(0.0), 0.0);
/// assert_eq!(ease_out_quad(1.0), 1.0);
/// assert_eq!(ease_out_quad(0.5), 0.75);
/// ```
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Per-entity animation state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Motion {
    /// Not animating; the pixel position is at rest.
    #[default]
    Idle,
    /// Easing from `from` to `to`.
    Moving {
        from: PixelPosition,
        to: PixelPosition,
        elapsed: f32,
        duration: f32,
    },
}

/// What a single [`Motion::advance`] call produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    /// The pixel position to draw this frame, or None when idle.
    pub position: Option<PixelPosition>,
    /// True on the one call where the move finished.
    pub completed: bool,
}

impl Motion {
    /// Starts a move between two pixel positions.
    pub fn start(from: PixelPosition, to: PixelPosition, duration: f32) -> Self {
        Motion::Moving {
            from,
            to,
            elapsed: 0.0,
            duration,
        }
    }

    /// Whether a move is in flight.
    pub fn is_moving(&self) -> bool {
        matches!(self, Motion::Moving { .. })
    }

    /// Eased progress of the current move in `[0, 1]`, or None when idle.
    pub fn progress(&self) -> Option<f32> {
        match *self {
            Motion::Idle => None,
            Motion::Moving {
                elapsed, duration, ..
            } => Some(if duration <= 0.0 {
                1.0
            } else {
                ease_out_quad(elapsed / duration)
            }),
        }
    }

    /// Current interpolated position, or None when idle.
    pub fn current_position(&self) -> Option<PixelPosition> {
        match *self {
            Motion::Idle => None,
            Motion::Moving { from, to, .. } => {
                let t = self.progress().unwrap_or(1.0);
                Some(from.lerp(to, t))
            }
        }
    }

    /// Advances the move by `dt` seconds.
    ///
    /// Once the raw progress reaches 1 the position snaps to the target,
    /// the motion becomes idle and `completed` is reported. Further calls
    /// report nothing until the next [`Motion::start`].
    pub fn advance(&mut self, dt: f32) -> MotionStep {
        match *self {
            Motion::Idle => MotionStep {
                position: None,
                completed: false,
            },
            Motion::Moving {
                from,
                to,
                elapsed,
                duration,
            } => {
                let elapsed = elapsed + dt.max(0.0);
                if duration <= 0.0 || elapsed >= duration {
                    *self = Motion::Idle;
                    return MotionStep {
                        position: Some(to),
                        completed: true,
                    };
                }
                *self = Motion::Moving {
                    from,
                    to,
                    elapsed,
                    duration,
                };
                MotionStep {
                    position: Some(from.lerp(to, ease_out_quad(elapsed / duration))),
                    completed: false,
                }
            }
        }
    }
}
