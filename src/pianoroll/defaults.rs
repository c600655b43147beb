//! Default sizes, ranges and colours for the piano roll

use crate::types::{Color, Pitch};

pub const CANVAS_WIDTH: f64 = 1024.0;
pub const CANVAS_HEIGHT: f64 = 400.0;

/// Pitch range used when none is set and the voices contain no notes.
pub const LOW_PITCH: Pitch = 0;
pub const HIGH_PITCH: Pitch = 127;

/// Keyboard strip width, in note heights.
pub const KEYBOARD_WIDTH_IN_NOTES: f64 = 6.0;
/// The keyboard never takes more than this share of the canvas width.
pub const KEYBOARD_MAX_SHARE: f64 = 0.25;
/// Black keys cover this share of the keyboard width.
pub const BLACK_KEY_LENGTH: f64 = 0.6;
/// Rows are never thinner than this, even for huge pitch ranges.
pub const MIN_NOTE_HEIGHT: f64 = 1.0;

/// Hue step between automatically coloured voices.
pub const HUE_STEP: f64 = 0.618_033_988_749_895;
pub const AUTO_SATURATION: f64 = 0.5;
pub const AUTO_VALUE: f64 = 0.9;

pub const NOTE_COLOR: Color = Color::BLACK;
pub const GRID_COLOR: Color = Color::rgb(200, 200, 200);
pub const MEASURE_BAR_COLOR: Color = Color::rgb(128, 128, 128);
pub const KEY_COLOR: Color = Color::BLACK;
