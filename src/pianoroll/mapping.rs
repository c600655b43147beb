//! Pure time/pitch → canvas mapping.
//!
//! The horizontal axis starts after the keyboard strip; the vertical axis
//! puts the highest pitch at the top. Degenerate windows and ranges fall back
//! to something drawable instead of dividing by zero.

use super::defaults;
use crate::types::{Pitch, TimePosition, time_to_f64};

/// Row height used to size the keyboard strip, never below
/// [`MIN_NOTE_HEIGHT`](defaults::MIN_NOTE_HEIGHT).
pub fn note_height_for(height: f64, pitch_range: i32) -> f64 {
    (height / pitch_range.max(1) as f64).max(defaults::MIN_NOTE_HEIGHT)
}

/// Keyboard strip width derived from the row height, capped to a share of
/// the canvas width. Zero when the keyboard is disabled.
pub fn keyboard_width_for(note_height: f64, canvas_width: f64, enabled: bool) -> f64 {
    if !enabled {
        return 0.0;
    }
    (note_height * defaults::KEYBOARD_WIDTH_IN_NOTES)
        .min(canvas_width * defaults::KEYBOARD_MAX_SHARE)
}

/// Clamp both ends to `LOW_PITCH..=HIGH_PITCH` and put them in order.
pub fn clamp_pitch_range(low: Pitch, high: Pitch) -> (Pitch, Pitch) {
    let low = low.clamp(defaults::LOW_PITCH, defaults::HIGH_PITCH);
    let high = high.clamp(defaults::LOW_PITCH, defaults::HIGH_PITCH);
    if low <= high { (low, high) } else { (high, low) }
}

/// Snapshot of the canvas geometry for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollMapper {
    width: f64,
    height: f64,
    keyboard_width: f64,
    note_height: f64,
    start: TimePosition,
    end: TimePosition,
    start_f: f64,
    window: f64,
    low: Pitch,
    high: Pitch,
}

impl RollMapper {
    /// Mapper without a keyboard strip. The pitch range is clamped to MIDI
    /// keys and a reversed range is swapped.
    pub fn new(
        width: f64,
        height: f64,
        start: TimePosition,
        end: TimePosition,
        low: Pitch,
        high: Pitch,
    ) -> Self {
        let (low, high) = clamp_pitch_range(low, high);
        let window = time_to_f64(end - start);
        let window = if window > 0.0 { window } else { 1.0 };
        let pitch_range = high - low + 1;

        Self {
            width,
            height,
            keyboard_width: 0.0,
            note_height: note_height_for(height, pitch_range),
            start,
            end,
            start_f: time_to_f64(start),
            window,
            low,
            high,
        }
    }

    pub fn with_keyboard_width(mut self, keyboard_width: f64) -> Self {
        self.keyboard_width = keyboard_width;
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn keyboard_width(&self) -> f64 {
        self.keyboard_width
    }

    pub fn note_height(&self) -> f64 {
        self.note_height
    }

    pub fn low_pitch(&self) -> Pitch {
        self.low
    }

    pub fn high_pitch(&self) -> Pitch {
        self.high
    }

    pub fn start_date(&self) -> TimePosition {
        self.start
    }

    pub fn end_date(&self) -> TimePosition {
        self.end
    }

    /// Window length in whole notes; 1.0 when the dates do not span a window.
    pub fn window_duration(&self) -> f64 {
        self.window
    }

    pub fn pitch_range(&self) -> i32 {
        self.high - self.low + 1
    }

    pub fn step_height(&self) -> f64 {
        self.height / self.pitch_range() as f64
    }

    fn plot_width(&self) -> f64 {
        self.width - self.keyboard_width
    }

    pub fn date_to_x(&self, date: f64) -> f64 {
        self.keyboard_width + self.plot_width() * (date - self.start_f) / self.window
    }

    /// Inverse of [`date_to_x`](Self::date_to_x).
    pub fn x_to_date(&self, x: f64) -> f64 {
        let plot = self.plot_width();
        if plot <= 0.0 {
            return self.start_f;
        }
        self.start_f + (x - self.keyboard_width) * self.window / plot
    }

    pub fn duration_to_width(&self, duration: f64) -> f64 {
        self.plot_width() * duration / self.window
    }

    /// Top edge of the row for `pitch`. A single-pitch range maps every
    /// pitch to row 0.
    pub fn pitch_to_y(&self, pitch: Pitch) -> f64 {
        if self.low == self.high {
            return 0.0;
        }
        self.height - (f64::from(pitch) - f64::from(self.low) + 1.0) * self.step_height()
    }

    /// Whether an onset falls inside `[start, end)`.
    pub fn contains_date(&self, date: TimePosition) -> bool {
        date >= self.start && date < self.end
    }
}
