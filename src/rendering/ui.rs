//! # User Interface Elements
//!
//! Palette, font metrics and the textbox frame shared by every screen.

use crate::config::{FONT_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH, TEXT_BOX_HEIGHT, TEXTBOX_PADDING};
use crate::TextMeasure;
use macroquad::prelude::*;

pub const PATH_BROWN: Color = Color::new(139.0 / 255.0, 69.0 / 255.0, 19.0 / 255.0, 1.0);
pub const GRASS_GREEN: Color = Color::new(34.0 / 255.0, 177.0 / 255.0, 76.0 / 255.0, 1.0);
pub const TALL_GRASS_GREEN: Color = Color::new(0.0, 100.0 / 255.0, 0.0, 1.0);
pub const WALL_GREY: Color = Color::new(0.5, 0.5, 0.5, 1.0);
pub const WATER_BLUE: Color = Color::new(0.0, 116.0 / 255.0, 217.0 / 255.0, 1.0);
pub const LIGHT_YELLOW: Color = Color::new(1.0, 1.0, 224.0 / 255.0, 1.0);
pub const UI_BORDER: Color = Color::new(50.0 / 255.0, 50.0 / 255.0, 50.0 / 255.0, 1.0);
pub const ROOF_RED: Color = Color::new(200.0 / 255.0, 50.0 / 255.0, 50.0 / 255.0, 1.0);
pub const BUILDING_WALL: Color = Color::new(200.0 / 255.0, 200.0 / 255.0, 180.0 / 255.0, 1.0);
pub const FLOWER_PINK: Color = Color::new(1.0, 182.0 / 255.0, 193.0 / 255.0, 1.0);

/// Converts an RGB triple from game data to a macroquad colour.
pub fn rgb(color: [u8; 3]) -> Color {
    Color::from_rgba(color[0], color[1], color[2], 255)
}

/// Text measurement backed by macroquad's default font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub font_size: u16,
}

impl FontMetrics {
    /// Metrics for the textbox font.
    pub fn new() -> Self {
        Self {
            font_size: FONT_SIZE,
        }
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for FontMetrics {
    fn text_width(&self, text: &str) -> f32 {
        measure_text(text, None, self.font_size, 1.0).width
    }
}

/// Textbox strip geometry and drawing.
pub struct UI {
    pub font_size: f32,
    pub line_height: f32,
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

impl UI {
    /// Creates the UI helper for the textbox font.
    pub fn new() -> Self {
        Self {
            font_size: f32::from(FONT_SIZE),
            line_height: f32::from(FONT_SIZE) + 2.0,
        }
    }

    /// Top edge of the textbox strip.
    pub fn textbox_top(&self) -> f32 {
        (SCREEN_HEIGHT - TEXT_BOX_HEIGHT) as f32
    }

    /// Draws the empty textbox frame.
    pub fn draw_textbox_frame(&self) {
        let top = self.textbox_top();
        draw_rectangle(
            0.0,
            top,
            SCREEN_WIDTH as f32,
            TEXT_BOX_HEIGHT as f32,
            LIGHT_YELLOW,
        );
        draw_rectangle_lines(
            0.0,
            top,
            SCREEN_WIDTH as f32,
            TEXT_BOX_HEIGHT as f32,
            3.0,
            UI_BORDER,
        );
    }

    /// Draws text lines inside the textbox, top to bottom.
    pub fn draw_textbox_lines<S: AsRef<str>>(&self, lines: &[S]) {
        let top = self.textbox_top();
        for (i, line) in lines.iter().enumerate() {
            // draw_text positions the baseline, not the top edge
            let y = top + TEXTBOX_PADDING + i as f32 * self.line_height + self.font_size * 0.75;
            draw_text(line.as_ref(), TEXTBOX_PADDING, y, self.font_size, BLACK);
        }
    }

    /// Draws the "more text" prompt in the bottom-right corner.
    pub fn draw_continue_prompt(&self) {
        draw_text(
            "v (Z)",
            SCREEN_WIDTH as f32 - 40.0,
            SCREEN_HEIGHT as f32 - 12.0,
            self.font_size,
            RED,
        );
    }
}
