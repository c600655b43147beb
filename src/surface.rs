//! The abstract drawing surface and a recording implementation of it.
//!
//! Nothing in this crate rasterizes. Notation elements and the piano roll
//! only issue the primitives below; a backend decides what they become.

use std::fmt;

use crate::types::Color;

/// Identifier of a glyph in the music font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Repeat-begin bar sign.
    pub const REPEAT_BEGIN: SymbolId = SymbolId(93);
    /// Round dot used for repeat signs.
    pub const DOT: SymbolId = SymbolId(220);
}

/// Primitive operations a rendering backend provides.
pub trait DrawingSurface {
    /// Fill the axis-aligned rectangle spanned by two corners.
    fn fill_rectangle(&mut self, x0: f64, y0: f64, x1: f64, y1: f64);

    /// Draw one glyph with its origin at `(x, y)`.
    fn draw_symbol(&mut self, id: SymbolId, x: f64, y: f64, scale: f64);

    /// Stroke a straight line.
    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64);

    /// Current colour for fills, lines and glyphs.
    fn select_color(&mut self, color: Color);

    /// Announce the extent of the drawing before any primitive.
    fn notify_canvas_size(&mut self, width: f64, height: f64);
}

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { x0: f64, y0: f64, x1: f64, y1: f64 },
    Symbol { id: SymbolId, x: f64, y: f64, scale: f64 },
    Line { x0: f64, y0: f64, x1: f64, y1: f64 },
    Color(Color),
    CanvasSize { width: f64, height: f64 },
}

/// Headless surface that remembers every command, for tests and for
/// backends that replay a frame later.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn rects(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::FillRect { x0, y0, x1, y1 } => Some((x0, y0, x1, y1)),
            _ => None,
        })
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, f64, f64, f64)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Symbol { id, x, y, scale } => Some((id, x, y, scale)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Line { x0, y0, x1, y1 } => Some((x0, y0, x1, y1)),
            _ => None,
        })
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Color(color) => Some(color),
            _ => None,
        })
    }
}

impl DrawingSurface for RecordingSurface {
    fn fill_rectangle(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.commands.push(DrawCommand::FillRect { x0, y0, x1, y1 });
    }

    fn draw_symbol(&mut self, id: SymbolId, x: f64, y: f64, scale: f64) {
        self.commands.push(DrawCommand::Symbol { id, x, y, scale });
    }

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.commands.push(DrawCommand::Line { x0, y0, x1, y1 });
    }

    fn select_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::Color(color));
    }

    fn notify_canvas_size(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::CanvasSize { width, height });
    }
}

/// Two decimals, and never `-0.00`.
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 100.0).round() / 100.0;
        let v = if rounded == 0.0 { 0.0 } else { rounded };
        write!(f, "{:.2}", v)
    }
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DrawCommand::FillRect { x0, y0, x1, y1 } => {
                write!(f, "rect {} {} {} {}", Num(x0), Num(y0), Num(x1), Num(y1))
            }
            DrawCommand::Symbol { id, x, y, scale } => {
                write!(f, "symbol {} {} {} {}", id.0, Num(x), Num(y), Num(scale))
            }
            DrawCommand::Line { x0, y0, x1, y1 } => {
                write!(f, "line {} {} {} {}", Num(x0), Num(y0), Num(x1), Num(y1))
            }
            DrawCommand::Color(color) => write!(f, "color {}", color),
            DrawCommand::CanvasSize { width, height } => {
                write!(f, "size {} {}", Num(width), Num(height))
            }
        }
    }
}

/// One command per line, no trailing newline.
impl fmt::Display for RecordingSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", cmd)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut s = RecordingSurface::new();
        s.notify_canvas_size(100.0, 50.0);
        s.select_color(Color::BLACK);
        s.fill_rectangle(0.0, 0.0, 1.0, 1.0);
        s.draw_symbol(SymbolId::DOT, 2.0, 3.0, 0.4);
        s.draw_line(0.0, 1.0, 2.0, 1.0);

        assert_eq!(s.commands().len(), 5);
        assert_eq!(s.rects().count(), 1);
        assert_eq!(s.symbols().next(), Some((SymbolId::DOT, 2.0, 3.0, 0.4)));
        assert_eq!(s.lines().count(), 1);
        assert_eq!(s.colors().collect::<Vec<_>>(), vec![Color::BLACK]);
    }

    #[test]
    fn text_form_is_stable() {
        let mut s = RecordingSurface::new();
        s.notify_canvas_size(100.0, 50.0);
        s.fill_rectangle(-0.001, 1.005, 2.5, 3.0);
        s.draw_symbol(SymbolId::DOT, 1.0, -2.0, 0.4);
        assert_eq!(
            s.to_string(),
            "size 100.00 50.00\nrect 0.00 1.00 2.50 3.00\nsymbol 220 1.00 -2.00 0.40"
        );
    }

    #[test]
    fn clear_forgets_everything() {
        let mut s = RecordingSurface::new();
        s.select_color(Color::WHITE);
        s.clear();
        assert!(s.commands().is_empty());
        assert_eq!(s.to_string(), "");
    }
}
