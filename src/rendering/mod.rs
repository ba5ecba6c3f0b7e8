//! # Rendering Module
//!
//! Macroquad-based drawing of the overworld, the textbox and the battle
//! screen, plus the font metrics the textbox wraps against.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::{FontMetrics, UI};
