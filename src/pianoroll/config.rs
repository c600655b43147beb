//! Piano-roll settings.

use num_rational::Rational64;

use super::defaults;
use super::grid::GridMode;
use crate::types::{Pitch, TimePosition};

/// Everything a render depends on besides the voices themselves.
///
/// `None` for the end date or pitch range means "detect from the voices".
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub start_date: TimePosition,
    pub end_date: Option<TimePosition>,
    pub pitch_range: Option<(Pitch, Pitch)>,
    pub keyboard: bool,
    pub measure_bars: bool,
    pub grid: GridMode,
    pub auto_voice_colors: bool,
    pub color_seed: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: defaults::CANVAS_WIDTH,
            height: defaults::CANVAS_HEIGHT,
            start_date: Rational64::from_integer(0),
            end_date: None,
            pitch_range: None,
            keyboard: false,
            measure_bars: false,
            grid: GridMode::default(),
            auto_voice_colors: false,
            color_seed: 0.0,
        }
    }
}

impl CanvasConfig {
    pub fn with_dimensions(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_dates(mut self, start: TimePosition, end: Option<TimePosition>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_pitch_range(mut self, low: Pitch, high: Pitch) -> Self {
        self.pitch_range = Some((low, high));
        self
    }

    pub fn with_keyboard(mut self, enabled: bool) -> Self {
        self.keyboard = enabled;
        self
    }

    pub fn with_measure_bars(mut self, enabled: bool) -> Self {
        self.measure_bars = enabled;
        self
    }

    pub fn with_grid(mut self, grid: GridMode) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_auto_voice_colors(mut self, enabled: bool) -> Self {
        self.auto_voice_colors = enabled;
        self
    }

    pub fn with_color_seed(mut self, seed: f64) -> Self {
        self.color_seed = seed;
        self
    }

    /// Canvas size, with unusable dimensions replaced by the defaults.
    pub(crate) fn effective_dimensions(&self) -> (f64, f64) {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        let width = if usable(self.width) {
            self.width
        } else {
            crate::log::warn!(width = self.width, "unusable canvas width, using default");
            defaults::CANVAS_WIDTH
        };
        let height = if usable(self.height) {
            self.height
        } else {
            crate::log::warn!(height = self.height, "unusable canvas height, using default");
            defaults::CANVAS_HEIGHT
        };
        (width, height)
    }
}
