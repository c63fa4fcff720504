//! # Rendering Module
//!
//! 2D rendering with macroquad, plus the HUD text and message log it shows.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;
