//! Voice colouring: automatic hues, nested format scopes, and a pen that
//! skips redundant colour changes.

use super::defaults;
use crate::surface::DrawingSurface;
use crate::types::Color;

/// Colour for voice `index` when automatic colouring is on.
///
/// Hues step by the golden-ratio conjugate from `seed`, so neighbouring
/// voices land far apart on the colour wheel.
pub fn auto_voice_color(seed: f64, index: usize) -> Color {
    let hue = (seed + (index as f64 + 1.0) * defaults::HUE_STEP).rem_euclid(1.0);
    Color::from_hsv(hue, defaults::AUTO_SATURATION, defaults::AUTO_VALUE)
}

/// Colours pushed by nested format scopes on top of a voice's base colour.
#[derive(Debug, Clone)]
pub struct ColorStack {
    base: Color,
    scopes: Vec<Color>,
}

impl ColorStack {
    pub fn new(base: Color) -> Self {
        Self {
            base,
            scopes: Vec::new(),
        }
    }

    /// Open a scope. A scope without its own colour keeps the current one.
    pub fn push(&mut self, color: Option<Color>) {
        let color = color.unwrap_or_else(|| self.current());
        self.scopes.push(color);
    }

    /// Close the innermost scope. `None` when no scope is open.
    pub fn pop(&mut self) -> Option<Color> {
        self.scopes.pop()
    }

    pub fn current(&self) -> Color {
        self.scopes.last().copied().unwrap_or(self.base)
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

/// Tracks the surface's current colour.
#[derive(Debug, Clone, Default)]
pub struct Pen {
    current: Option<Color>,
}

impl Pen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, surface: &mut dyn DrawingSurface, color: Color) {
        if self.current != Some(color) {
            surface.select_color(color);
            self.current = Some(color);
        }
    }

    pub fn current(&self) -> Option<Color> {
        self.current
    }
}
