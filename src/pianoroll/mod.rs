//! Piano-roll rendering: voices drawn as pitch/time rectangles.
//!
//! A [`PianoRoll`] holds the canvas settings and per-voice colours. Each
//! [`render`](PianoRoll::render) call resolves the time window and pitch
//! range, takes a [`RollMapper`] snapshot, and walks the voices in order.
//! Chord and format scopes live only for the duration of one voice walk.

mod color;
mod config;
pub mod defaults;
mod grid;
mod mapping;
mod midi;
mod voice;

use std::collections::{BTreeMap, BTreeSet};

pub use color::{ColorStack, Pen, auto_voice_color};
pub use config::CanvasConfig;
pub use grid::{GridMode, draw_grid, draw_keyboard, draw_measure_bars, is_black_key};
pub use mapping::{RollMapper, clamp_pitch_range, keyboard_width_for, note_height_for};
pub use voice::{Voice, VoiceEvent};

use crate::errors::RenderError;
use crate::surface::DrawingSurface;
use crate::types::{Color, Duration, Pitch, TimePosition, time_to_f64};

/// Sizes derived from the canvas and pitch range, kept until a setter
/// changes something they depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Geometry {
    width: f64,
    height: f64,
    low: Pitch,
    high: Pitch,
    note_height: f64,
    keyboard_width: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PianoRoll {
    config: CanvasConfig,
    voice_colors: BTreeMap<usize, Color>,
    geometry: Option<Geometry>,
}

impl PianoRoll {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            voice_colors: BTreeMap::new(),
            geometry: None,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CanvasConfig) {
        self.config = config;
        self.geometry = None;
    }

    pub fn set_canvas_dimensions(&mut self, width: f64, height: f64) {
        self.config.width = width;
        self.config.height = height;
        self.geometry = None;
    }

    /// Time window `[start, end)`. `None` for `end` detects it from the voices.
    pub fn set_limit_dates(&mut self, start: TimePosition, end: Option<TimePosition>) {
        if let Some(end) = end {
            if end <= start {
                crate::log::warn!(%start, %end, "empty time window, falling back to one whole note");
            }
        }
        self.config.start_date = start;
        self.config.end_date = end;
        self.geometry = None;
    }

    /// Fixed pitch range, clamped to MIDI keys; a reversed range is swapped.
    pub fn set_pitch_range(&mut self, low: Pitch, high: Pitch) {
        let range = clamp_pitch_range(low, high);
        if range != (low, high) {
            crate::log::warn!(low, high, "pitch range adjusted to {:?}", range);
        }
        self.config.pitch_range = Some(range);
        self.geometry = None;
    }

    /// Go back to detecting the pitch range from the voices.
    pub fn clear_pitch_range(&mut self) {
        self.config.pitch_range = None;
        self.geometry = None;
    }

    pub fn enable_keyboard(&mut self, enabled: bool) {
        self.config.keyboard = enabled;
        self.geometry = None;
    }

    pub fn enable_measure_bars(&mut self, enabled: bool) {
        self.config.measure_bars = enabled;
    }

    pub fn set_grid_mode(&mut self, mode: GridMode) {
        self.config.grid = mode;
    }

    pub fn enable_auto_voice_colors(&mut self, enabled: bool) {
        self.config.auto_voice_colors = enabled;
    }

    pub fn set_color_seed(&mut self, seed: f64) {
        self.config.color_seed = seed;
    }

    /// Explicit colour for voice `index`; wins over automatic colouring.
    pub fn set_voice_color(&mut self, index: usize, r: u8, g: u8, b: u8, a: u8) {
        self.voice_colors.insert(index, Color::rgba(r, g, b, a));
    }

    pub fn clear_voice_color(&mut self, index: usize) {
        self.voice_colors.remove(&index);
    }

    /// Base colour for voice `index`: explicit, else automatic, else black.
    pub fn voice_color(&self, index: usize) -> Color {
        if let Some(color) = self.voice_colors.get(&index) {
            *color
        } else if self.config.auto_voice_colors {
            auto_voice_color(self.config.color_seed, index)
        } else {
            defaults::NOTE_COLOR
        }
    }

    /// Row height from the last layout, if it is still valid.
    pub fn note_height(&self) -> Option<f64> {
        self.geometry.map(|g| g.note_height)
    }

    /// Keyboard strip width from the last layout, if it is still valid.
    pub fn keyboard_width(&self) -> Option<f64> {
        self.geometry.map(|g| g.keyboard_width)
    }

    /// Resolve window and pitch range against `voices` and return the
    /// mapping used for drawing them.
    pub fn layout(&mut self, voices: &[Voice]) -> RollMapper {
        let (start, end) = self.time_window(voices);
        let (low, high) = self.pitch_range(voices);
        let geometry = self.geometry(low, high);
        RollMapper::new(geometry.width, geometry.height, start, end, low, high)
            .with_keyboard_width(geometry.keyboard_width)
    }

    /// Draw the grid, the keyboard, then every voice in slice order.
    ///
    /// Stops at the first malformed voice; whatever was drawn before stays on
    /// the surface.
    pub fn render(
        &mut self,
        voices: &[Voice],
        surface: &mut dyn DrawingSurface,
    ) -> Result<(), RenderError> {
        let mapper = self.layout(voices);
        crate::log::debug!(
            voices = voices.len(),
            low = mapper.low_pitch(),
            high = mapper.high_pitch(),
            keyboard_width = mapper.keyboard_width(),
            "render piano roll"
        );

        surface.notify_canvas_size(mapper.width(), mapper.height());
        let mut pen = Pen::new();
        draw_grid(&mapper, self.config.grid, surface, &mut pen);
        if self.config.keyboard {
            draw_keyboard(&mapper, surface, &mut pen);
        }

        let mut bars = BTreeSet::new();
        for voice in voices {
            self.render_voice(&mapper, voice, surface, &mut pen, &mut bars)?;
        }
        Ok(())
    }

    fn render_voice(
        &self,
        mapper: &RollMapper,
        voice: &Voice,
        surface: &mut dyn DrawingSurface,
        pen: &mut Pen,
        bars: &mut BTreeSet<TimePosition>,
    ) -> Result<(), RenderError> {
        let index = voice.index();
        let mut colors = ColorStack::new(self.voice_color(index));
        let mut chords: Vec<ChordScope> = Vec::new();

        for event in voice.events() {
            match *event {
                VoiceEvent::Note {
                    date,
                    duration,
                    pitch,
                } => match chords.last_mut() {
                    Some(chord) => chord.add(date, duration, pitch, colors.current()),
                    None if mapper.contains_date(date) => {
                        draw_note(mapper, surface, pen, colors.current(), date, duration, pitch)
                    }
                    None => {}
                },
                VoiceEvent::Rest { .. } => {}
                VoiceEvent::ChordBegin => chords.push(ChordScope::default()),
                VoiceEvent::ChordEnd => {
                    let chord = chords
                        .pop()
                        .ok_or(RenderError::UnbalancedChordEnd { voice: index })?;
                    chord.draw(mapper, surface, pen);
                }
                VoiceEvent::FormatBegin { color } => colors.push(color),
                VoiceEvent::FormatEnd => {
                    colors
                        .pop()
                        .ok_or(RenderError::UnbalancedFormatEnd { voice: index })?;
                }
                VoiceEvent::Bar { date } => {
                    if self.config.measure_bars && bars.insert(date) {
                        draw_measure_bars(mapper, [date], surface, pen);
                    }
                }
            }
        }

        if !chords.is_empty() {
            return Err(RenderError::UnterminatedChord { voice: index });
        }
        if !colors.is_empty() {
            return Err(RenderError::UnterminatedFormat {
                voice: index,
                depth: colors.depth(),
            });
        }
        Ok(())
    }

    fn time_window(&self, voices: &[Voice]) -> (TimePosition, TimePosition) {
        let start = self.config.start_date;
        let end = self
            .config
            .end_date
            .or_else(|| voices.iter().filter_map(Voice::end_date).max())
            .unwrap_or(start);
        (start, end)
    }

    fn pitch_range(&self, voices: &[Voice]) -> (Pitch, Pitch) {
        if let Some((low, high)) = self.config.pitch_range {
            return clamp_pitch_range(low, high);
        }
        voices
            .iter()
            .filter_map(Voice::pitch_bounds)
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
            .map(|(low, high)| clamp_pitch_range(low, high))
            .unwrap_or((defaults::LOW_PITCH, defaults::HIGH_PITCH))
    }

    fn geometry(&mut self, low: Pitch, high: Pitch) -> Geometry {
        let (width, height) = self.config.effective_dimensions();
        if let Some(g) = self.geometry {
            if (g.width, g.height, g.low, g.high) == (width, height, low, high) {
                return g;
            }
        }

        let note_height = note_height_for(height, high - low + 1);
        let geometry = Geometry {
            width,
            height,
            low,
            high,
            note_height,
            keyboard_width: keyboard_width_for(note_height, width, self.config.keyboard),
        };
        crate::log::debug!(
            note_height,
            keyboard_width = geometry.keyboard_width,
            "recomputed piano roll geometry"
        );
        self.geometry = Some(geometry);
        geometry
    }
}

/// Members of an open chord, drawn together once the chord closes.
#[derive(Debug, Default)]
struct ChordScope {
    onset: Option<TimePosition>,
    duration: Duration,
    members: Vec<(Pitch, Color)>,
}

impl ChordScope {
    fn add(&mut self, date: TimePosition, duration: Duration, pitch: Pitch, color: Color) {
        self.onset.get_or_insert(date);
        self.duration = self.duration.max(duration);
        self.members.push((pitch, color));
    }

    fn draw(self, mapper: &RollMapper, surface: &mut dyn DrawingSurface, pen: &mut Pen) {
        let Some(onset) = self.onset else {
            return;
        };
        if !mapper.contains_date(onset) {
            return;
        }
        for (pitch, color) in self.members {
            draw_note(mapper, surface, pen, color, onset, self.duration, pitch);
        }
    }
}

fn draw_note(
    mapper: &RollMapper,
    surface: &mut dyn DrawingSurface,
    pen: &mut Pen,
    color: Color,
    date: TimePosition,
    duration: Duration,
    pitch: Pitch,
) {
    pen.select(surface, color);
    let x = mapper.date_to_x(time_to_f64(date));
    let y = mapper.pitch_to_y(pitch);
    let w = mapper.duration_to_width(time_to_f64(duration));
    surface.fill_rectangle(x, y, x + w, y + mapper.step_height());
}
