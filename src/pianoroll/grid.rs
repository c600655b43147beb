//! Background strategies: pitch grid, keyboard strip, and measure bars.

use super::color::Pen;
use super::defaults;
use super::mapping::RollMapper;
use crate::surface::DrawingSurface;
use crate::types::{Pitch, TimePosition, time_to_f64};

/// Which pitch rows get a horizontal rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridMode {
    None,
    /// Every C.
    #[default]
    Octave,
    /// Every C and G.
    TwoLine,
    /// Every pitch.
    Chromatic,
    /// Every natural note.
    Diatonic,
}

impl GridMode {
    pub fn rules(self, pitch: Pitch) -> bool {
        let class = pitch_class(pitch);
        match self {
            GridMode::None => false,
            GridMode::Octave => class == 0,
            GridMode::TwoLine => class == 0 || class == 7,
            GridMode::Chromatic => true,
            GridMode::Diatonic => !is_black_key(pitch),
        }
    }
}

fn pitch_class(pitch: Pitch) -> i32 {
    pitch.rem_euclid(12)
}

pub fn is_black_key(pitch: Pitch) -> bool {
    matches!(pitch_class(pitch), 1 | 3 | 6 | 8 | 10)
}

/// Rule the lower edge of every row selected by `mode`, across the plot area.
pub fn draw_grid(
    mapper: &RollMapper,
    mode: GridMode,
    surface: &mut dyn DrawingSurface,
    pen: &mut Pen,
) {
    if mode == GridMode::None {
        return;
    }
    let step = mapper.step_height();
    let (x0, x1) = (mapper.keyboard_width(), mapper.width());
    for pitch in mapper.low_pitch()..=mapper.high_pitch() {
        if mode.rules(pitch) {
            pen.select(surface, defaults::GRID_COLOR);
            let y = mapper.pitch_to_y(pitch) + step;
            surface.draw_line(x0, y, x1, y);
        }
    }
}

/// Keyboard strip on the left: black keys as filled rows, white keys
/// separated where two of them touch (E/F and B/C), and a closing edge.
pub fn draw_keyboard(mapper: &RollMapper, surface: &mut dyn DrawingSurface, pen: &mut Pen) {
    let width = mapper.keyboard_width();
    if width <= 0.0 {
        return;
    }
    pen.select(surface, defaults::KEY_COLOR);

    let step = mapper.step_height();
    let black = width * defaults::BLACK_KEY_LENGTH;
    for pitch in mapper.low_pitch()..=mapper.high_pitch() {
        let y = mapper.pitch_to_y(pitch);
        if is_black_key(pitch) {
            surface.fill_rectangle(0.0, y, black, y + step);
        } else if matches!(pitch_class(pitch), 4 | 11) {
            surface.draw_line(0.0, y, width, y);
        }
    }
    surface.draw_line(width, 0.0, width, mapper.height());
}

/// Full-height vertical line at every date inside the window.
pub fn draw_measure_bars(
    mapper: &RollMapper,
    dates: impl IntoIterator<Item = TimePosition>,
    surface: &mut dyn DrawingSurface,
    pen: &mut Pen,
) {
    for date in dates {
        if !mapper.contains_date(date) {
            continue;
        }
        pen.select(surface, defaults::MEASURE_BAR_COLOR);
        let x = mapper.date_to_x(time_to_f64(date));
        surface.draw_line(x, 0.0, x, mapper.height());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use num_rational::Rational64;

    fn octave_mapper() -> RollMapper {
        // C4..B4, 10 units per row
        RollMapper::new(200.0, 120.0, Rational64::from_integer(0), Rational64::from_integer(2), 60, 71)
    }

    #[test]
    fn grid_modes_select_rows() {
        let ruled = |mode: GridMode| (60..72).filter(|&p| mode.rules(p)).collect::<Vec<_>>();
        assert_eq!(ruled(GridMode::None), Vec::<Pitch>::new());
        assert_eq!(ruled(GridMode::Octave), vec![60]);
        assert_eq!(ruled(GridMode::TwoLine), vec![60, 67]);
        assert_eq!(ruled(GridMode::Diatonic), vec![60, 62, 64, 65, 67, 69, 71]);
        assert_eq!(ruled(GridMode::Chromatic).len(), 12);
    }

    #[test]
    fn negative_pitches_keep_their_class() {
        assert!(GridMode::Octave.rules(-12));
        assert!(is_black_key(-11));
    }

    #[test]
    fn grid_rules_lower_row_edges() {
        let mut surface = RecordingSurface::new();
        let mut pen = Pen::new();
        draw_grid(&octave_mapper(), GridMode::TwoLine, &mut surface, &mut pen);
        assert_eq!(
            surface.lines().collect::<Vec<_>>(),
            vec![(0.0, 120.0, 200.0, 120.0), (0.0, 50.0, 200.0, 50.0)]
        );
        assert_eq!(surface.colors().count(), 1);
    }

    #[test]
    fn keyboard_marks_black_keys_and_white_boundaries() {
        let mapper = octave_mapper().with_keyboard_width(50.0);
        let mut surface = RecordingSurface::new();
        let mut pen = Pen::new();
        draw_keyboard(&mapper, &mut surface, &mut pen);

        assert_eq!(surface.rects().count(), 5);
        // C#4 sits one row above C4
        assert_eq!(surface.rects().next(), Some((0.0, 100.0, 30.0, 110.0)));
        assert_eq!(
            surface.lines().collect::<Vec<_>>(),
            vec![(0.0, 70.0, 50.0, 70.0), (0.0, 0.0, 50.0, 0.0), (50.0, 0.0, 50.0, 120.0)]
        );
    }

    #[test]
    fn disabled_keyboard_draws_nothing() {
        let mut surface = RecordingSurface::new();
        draw_keyboard(&octave_mapper(), &mut surface, &mut Pen::new());
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn measure_bars_inside_window_only() {
        let mut surface = RecordingSurface::new();
        let dates = [0, 1, 2].map(Rational64::from_integer);
        draw_measure_bars(&octave_mapper(), dates, &mut surface, &mut Pen::new());
        assert_eq!(
            surface.lines().collect::<Vec<_>>(),
            vec![(0.0, 0.0, 0.0, 120.0), (100.0, 0.0, 100.0, 120.0)]
        );
    }
}
