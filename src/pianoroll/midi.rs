//! Standard MIDI File import.
//!
//! Each track with at least one note becomes a [`Voice`] whose index is the
//! track index. Note-on and note-off events are paired per channel and key,
//! first on first off, and tick positions become whole-note fractions.

use std::collections::{HashMap, VecDeque};

use midly::{MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use num_rational::Rational64;

use super::voice::Voice;
use crate::errors::MidiError;
use crate::types::{Duration, Pitch, TimePosition};

impl Voice {
    /// Read the notes of an in-memory Standard MIDI File, one voice per
    /// track that carries notes.
    ///
    /// A note-on with velocity 0 counts as a note-off. Notes still sounding
    /// at the end of their track are closed there.
    pub fn from_smf(bytes: &[u8]) -> Result<Vec<Voice>, MidiError> {
        let smf = Smf::parse(bytes).map_err(|e| MidiError::Malformed {
            message: e.to_string(),
        })?;
        let ticks_per_quarter = match smf.header.timing {
            Timing::Metrical(tpq) => i64::from(tpq.as_int()),
            Timing::Timecode(..) => return Err(MidiError::TimecodeTiming),
        };
        if ticks_per_quarter == 0 {
            return Err(MidiError::ZeroTicksPerQuarter);
        }
        let ticks_per_whole = 4 * ticks_per_quarter;

        let voices: Vec<Voice> = smf
            .tracks
            .iter()
            .enumerate()
            .filter_map(|(index, track)| {
                let notes = track_notes(track, ticks_per_whole);
                crate::log::debug!(track = index, notes = notes.len(), "imported MIDI track");
                (!notes.is_empty()).then(|| Voice::from_notes(index, notes))
            })
            .collect();
        Ok(voices)
    }
}

/// Paired notes of one track as `(date, duration, pitch)`, ordered by onset
/// then pitch.
fn track_notes(track: &[TrackEvent<'_>], ticks_per_whole: i64) -> Vec<(TimePosition, Duration, Pitch)> {
    let whole = |ticks: i64| Rational64::new(ticks, ticks_per_whole);
    let mut sounding: HashMap<(u8, u8), VecDeque<i64>> = HashMap::new();
    let mut notes = Vec::new();
    let mut now: i64 = 0;

    for event in track {
        now += i64::from(event.delta.as_int());
        let TrackEventKind::Midi { channel, message } = event.kind else {
            continue;
        };
        let (key, on) = match message {
            MidiMessage::NoteOn { key, vel } => (key, vel.as_int() > 0),
            MidiMessage::NoteOff { key, .. } => (key, false),
            _ => continue,
        };
        let slot = (channel.as_int(), key.as_int());
        if on {
            sounding.entry(slot).or_default().push_back(now);
        } else if let Some(start) = sounding.get_mut(&slot).and_then(VecDeque::pop_front) {
            notes.push((whole(start), whole(now - start), Pitch::from(slot.1)));
        } else {
            crate::log::debug!(channel = slot.0, key = slot.1, tick = now, "note-off without note-on");
        }
    }

    for ((_, key), starts) in sounding {
        for start in starts {
            notes.push((whole(start), whole(now - start), Pitch::from(key)));
        }
    }

    notes.sort_by(|a, b| (a.0, a.2).cmp(&(b.0, b.2)));
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pianoroll::VoiceEvent;
    use midly::{Format, Header, MetaMessage};

    fn r(n: i64, d: i64) -> Rational64 {
        Rational64::new(n, d)
    }

    fn note_event(delta: u32, channel: u8, key: u8, vel: u8) -> TrackEvent<'static> {
        TrackEvent {
            delta: delta.into(),
            kind: TrackEventKind::Midi {
                channel: channel.into(),
                message: MidiMessage::NoteOn {
                    key: key.into(),
                    vel: vel.into(),
                },
            },
        }
    }

    fn end_of_track(delta: u32) -> TrackEvent<'static> {
        TrackEvent {
            delta: delta.into(),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        }
    }

    fn write(header: Header, tracks: Vec<Vec<TrackEvent<'static>>>) -> Vec<u8> {
        let smf = Smf { header, tracks };
        let mut out = Vec::new();
        smf.write(&mut out).unwrap();
        out
    }

    fn notes(voice: &Voice) -> Vec<(TimePosition, Duration, Pitch)> {
        voice
            .events()
            .iter()
            .filter_map(|e| match *e {
                VoiceEvent::Note {
                    date,
                    duration,
                    pitch,
                } => Some((date, duration, pitch)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn hand_written_single_track_file() {
        #[rustfmt::skip]
        let bytes: &[u8] = &[
            b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
            b'M', b'T', b'r', b'k', 0, 0, 0, 20,
            0x00, 0x90, 60, 64,
            0x60, 0x80, 60, 0,
            0x00, 0x90, 64, 64,
            0x60, 0x90, 64, 0,
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let voices = Voice::from_smf(bytes).unwrap();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].index(), 0);
        assert_eq!(
            notes(&voices[0]),
            vec![(r(0, 1), r(1, 4), 60), (r(1, 4), r(1, 4), 64)]
        );
    }

    #[test]
    fn overlapping_keys_pair_first_on_first_off_per_channel() {
        let track = vec![
            note_event(0, 0, 60, 100),
            note_event(0, 1, 60, 100),
            note_event(240, 0, 60, 100),
            note_event(240, 0, 60, 0),
            note_event(240, 1, 60, 0),
            note_event(0, 0, 60, 0),
            end_of_track(0),
        ];
        let bytes = write(Header::new(Format::SingleTrack, Timing::Metrical(480.into())), vec![track]);

        let voices = Voice::from_smf(&bytes).unwrap();
        assert_eq!(
            notes(&voices[0]),
            vec![
                (r(0, 1), r(1, 4), 60),
                (r(0, 1), r(3, 8), 60),
                (r(1, 8), r(1, 4), 60),
            ]
        );
    }

    #[test]
    fn tracks_without_notes_are_skipped_and_indices_kept() {
        let conductor = vec![
            TrackEvent {
                delta: 0.into(),
                kind: TrackEventKind::Meta(MetaMessage::Tempo(500_000.into())),
            },
            end_of_track(0),
        ];
        let melody = vec![note_event(0, 0, 72, 90), note_event(192, 0, 72, 0), end_of_track(0)];
        let bass = vec![note_event(96, 2, 36, 90), end_of_track(288)];
        let bytes = write(
            Header::new(Format::Parallel, Timing::Metrical(96.into())),
            vec![conductor, melody, bass],
        );

        let voices = Voice::from_smf(&bytes).unwrap();
        assert_eq!(voices.iter().map(Voice::index).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(notes(&voices[0]), vec![(r(0, 1), r(1, 2), 72)]);
        // still sounding at the end of the track
        assert_eq!(notes(&voices[1]), vec![(r(1, 4), r(3, 4), 36)]);
    }

    #[test]
    fn timecode_timing_is_rejected() {
        let header = Header::new(Format::SingleTrack, Timing::Timecode(midly::Fps::Fps25, 40));
        let bytes = write(header, vec![vec![end_of_track(0)]]);
        assert_eq!(Voice::from_smf(&bytes), Err(MidiError::TimecodeTiming));
    }

    #[test]
    fn zero_ticks_per_quarter_is_rejected() {
        #[rustfmt::skip]
        let bytes: &[u8] = &[
            b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 0,
            b'M', b'T', b'r', b'k', 0, 0, 0, 4,
            0x00, 0xFF, 0x2F, 0x00,
        ];
        assert_eq!(Voice::from_smf(bytes), Err(MidiError::ZeroTicksPerQuarter));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = Voice::from_smf(b"not a midi file").unwrap_err();
        assert!(matches!(err, MidiError::Malformed { .. }), "{err:?}");
    }
}
