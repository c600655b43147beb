//! Voices as flat event sequences.
//!
//! Chords and format scopes are bracketed by begin/end events rather than
//! nested, so a voice reads the way it was written.

use num_rational::Rational64;

use crate::types::{Color, Duration, Pitch, TimePosition};

#[derive(Debug, Clone, PartialEq)]
pub enum VoiceEvent {
    Note {
        date: TimePosition,
        duration: Duration,
        pitch: Pitch,
    },
    Rest {
        date: TimePosition,
        duration: Duration,
    },
    ChordBegin,
    ChordEnd,
    /// Opens a format scope; `None` keeps the enclosing colour.
    FormatBegin {
        color: Option<Color>,
    },
    FormatEnd,
    /// Measure boundary.
    Bar {
        date: TimePosition,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Voice {
    index: usize,
    events: Vec<VoiceEvent>,
}

impl Voice {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            events: Vec::new(),
        }
    }

    /// Plain melodic line: `(date, duration, pitch)` triples in order.
    pub fn from_notes(
        index: usize,
        notes: impl IntoIterator<Item = (TimePosition, Duration, Pitch)>,
    ) -> Self {
        let mut voice = Self::new(index);
        for (date, duration, pitch) in notes {
            voice.push(VoiceEvent::Note {
                date,
                duration,
                pitch,
            });
        }
        voice
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn events(&self) -> &[VoiceEvent] {
        &self.events
    }

    pub fn push(&mut self, event: VoiceEvent) -> &mut Self {
        self.events.push(event);
        self
    }

    pub fn note(&mut self, date: TimePosition, duration: Duration, pitch: Pitch) -> &mut Self {
        self.push(VoiceEvent::Note {
            date,
            duration,
            pitch,
        })
    }

    pub fn rest(&mut self, date: TimePosition, duration: Duration) -> &mut Self {
        self.push(VoiceEvent::Rest { date, duration })
    }

    pub fn bar(&mut self, date: TimePosition) -> &mut Self {
        self.push(VoiceEvent::Bar { date })
    }

    /// Chord in the usual encoded form: every member but the last carries a
    /// zero duration, the last one carries the chord's.
    pub fn chord(&mut self, date: TimePosition, duration: Duration, pitches: &[Pitch]) -> &mut Self {
        self.push(VoiceEvent::ChordBegin);
        let zero = Rational64::from_integer(0);
        for (i, &pitch) in pitches.iter().enumerate() {
            let d = if i + 1 == pitches.len() { duration } else { zero };
            self.note(date, d, pitch);
        }
        self.push(VoiceEvent::ChordEnd)
    }

    /// Latest end date of any note or rest.
    pub fn end_date(&self) -> Option<TimePosition> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                VoiceEvent::Note { date, duration, .. } | VoiceEvent::Rest { date, duration } => {
                    Some(date + duration)
                }
                _ => None,
            })
            .max()
    }

    /// Lowest and highest pitch of the voice's notes.
    pub fn pitch_bounds(&self) -> Option<(Pitch, Pitch)> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                VoiceEvent::Note { pitch, .. } => Some(pitch),
                _ => None,
            })
            .fold(None, |acc, pitch| match acc {
                None => Some((pitch, pitch)),
                Some((lo, hi)) => Some((Pitch::min(lo, pitch), Pitch::max(hi, pitch))),
            })
    }
}
