//! # Display Management
//!
//! Draws the grid and entities with macroquad. Entities are drawn at their
//! interpolated pixel positions, never at their logical tiles.

use crate::game::world::tile_to_pixel;
use crate::rendering::{event_message, hud_lines, MessageLog};
use crate::{CellKind, CryptResult, EntityKind, GameState, TurnReport, TurnScheduler};
use macroquad::prelude::*;

/// Macroquad display manager for the game.
pub struct MacroquadDisplay {
    /// Tile size in pixels
    pub tile_size: f32,
    /// Width of the HUD panel in pixels
    pub ui_panel_width: f32,
    /// Message history
    pub messages: MessageLog,
}

impl MacroquadDisplay {
    /// Creates a display for tiles of `tile_size` pixels.
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size,
            ui_panel_width: 260.0,
            messages: MessageLog::default(),
        }
    }

    /// Window size that fits a `width` x `height` level plus the HUD panel.
    pub fn window_size(&self, width: u32, height: u32) -> (f32, f32) {
        (
            width as f32 * self.tile_size + self.ui_panel_width,
            (height as f32 * self.tile_size).max(240.0) + 80.0,
        )
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message);
    }

    /// Logs the player-facing messages for a scheduler report.
    pub fn record_report(&mut self, report: &TurnReport, state: &GameState) {
        for event in &report.events {
            if let Some(text) = event_message(event, state.player_id) {
                self.messages.push(text);
            }
        }
    }

    /// Draws one complete frame.
    pub fn draw_frame(&self, state: &GameState, scheduler: &TurnScheduler) -> CryptResult<()> {
        clear_background(BLACK);
        self.draw_grid(state);
        self.draw_entities(state);
        self.draw_hud(state, scheduler);
        self.draw_messages();
        Ok(())
    }

    fn draw_grid(&self, state: &GameState) {
        for pos in state.grid().positions() {
            let color = match state.grid().cell(pos) {
                Some(CellKind::Wall) => DARKGRAY,
                Some(CellKind::Floor) => Color::new(0.15, 0.13, 0.12, 1.0),
                None => continue,
            };
            let centre = tile_to_pixel(pos, self.tile_size);
            let half = self.tile_size / 2.0;
            draw_rectangle(
                centre.x - half,
                centre.y - half,
                self.tile_size - 1.0,
                self.tile_size - 1.0,
                color,
            );
        }
    }

    fn draw_entities(&self, state: &GameState) {
        let size = self.tile_size * 0.7;
        for entity in state.entities() {
            let color = match entity.kind {
                EntityKind::Player => YELLOW,
                EntityKind::Skeleton => LIGHTGRAY,
            };
            let pixel = entity.pixel();
            draw_rectangle(
                pixel.x - size / 2.0,
                pixel.y - size / 2.0,
                size,
                size,
                color,
            );

            if entity.hp < entity.max_hp {
                let fraction = entity.hp.max(0) as f32 / entity.max_hp.max(1) as f32;
                let top = pixel.y - size / 2.0 - 4.0;
                draw_rectangle(pixel.x - size / 2.0, top, size, 3.0, MAROON);
                draw_rectangle(pixel.x - size / 2.0, top, size * fraction, 3.0, RED);
            }
        }
    }

    fn draw_hud(&self, state: &GameState, scheduler: &TurnScheduler) {
        let panel_x = state.grid().width() as f32 * self.tile_size + 10.0;
        let mut line_y = 24.0;

        draw_text("CRYPT", panel_x, line_y, 24.0, WHITE);
        line_y += 32.0;

        for line in hud_lines(state, scheduler.phase(), scheduler.turn_number()) {
            draw_text(&line, panel_x, line_y, 18.0, WHITE);
            line_y += 20.0;
        }

        line_y += 20.0;
        draw_text("Controls:", panel_x, line_y, 18.0, GREEN);
        for control in ["Arrows/WASD: move", "Two keys: diagonal", "Space: wait", "Esc: quit"] {
            line_y += 18.0;
            draw_text(control, panel_x, line_y, 16.0, GRAY);
        }
    }

    fn draw_messages(&self) {
        let top = screen_height() - 70.0;
        for (i, message) in self.messages.recent(3).enumerate() {
            draw_text(message, 10.0, top + i as f32 * 18.0, 16.0, WHITE);
        }
    }
}
