//! Piano-roll rendering through the public API.

use num_rational::Rational64;
use scoreplot::pianoroll::RollMapper;
use scoreplot::types::time_to_f64;
use scoreplot::{
    CanvasConfig, Color, GridMode, PianoRoll, RecordingSurface, RenderError, Voice, VoiceEvent,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn r(n: i64, d: i64) -> Rational64 {
    Rational64::new(n, d)
}

/// 400x120 canvas, one octave from C4, four whole notes.
fn octave_roll() -> PianoRoll {
    let mut roll = PianoRoll::new(CanvasConfig::default().with_dimensions(400.0, 120.0));
    roll.set_limit_dates(r(0, 1), Some(r(4, 1)));
    roll.set_pitch_range(60, 71);
    roll
}

// =============================================================================
// Mapping
// =============================================================================

#[test]
fn date_and_x_round_trip_over_many_windows() {
    let windows = [(r(0, 1), r(1, 1)), (r(1, 3), r(17, 8)), (r(-2, 1), r(5, 1))];
    for (start, end) in windows {
        for keyboard in [0.0, 37.5] {
            let mapper = RollMapper::new(640.0, 200.0, start, end, 21, 108).with_keyboard_width(keyboard);
            let (s, e) = (time_to_f64(start), time_to_f64(end));
            for i in 0..=64 {
                let date = s + (e - s) * i as f64 / 64.0;
                let back = mapper.x_to_date(mapper.date_to_x(date));
                assert!((back - date).abs() < 1e-9, "{date} came back as {back}");
            }
        }
    }
}

#[test]
fn higher_pitches_are_never_lower_on_the_canvas() {
    for (low, high) in [(0, 127), (60, 72), (48, 49), (64, 64)] {
        let mapper = RollMapper::new(300.0, 90.0, r(0, 1), r(1, 1), low, high);
        for p in low..high {
            assert!(mapper.pitch_to_y(p + 1) <= mapper.pitch_to_y(p));
        }
    }
    let single = RollMapper::new(300.0, 90.0, r(0, 1), r(1, 1), 64, 64);
    assert_eq!(single.pitch_to_y(64), 0.0);
    assert_eq!(single.pitch_to_y(30), 0.0);
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn chord_members_span_the_chord_duration() {
    init_tracing();
    let mut voice = Voice::new(0);
    voice
        .push(VoiceEvent::ChordBegin)
        .note(r(0, 1), r(0, 1), 60)
        .note(r(0, 1), r(0, 1), 64)
        .note(r(0, 1), r(1, 1), 67)
        .push(VoiceEvent::ChordEnd);

    let mut roll = octave_roll();
    let mapper = roll.layout(std::slice::from_ref(&voice));
    let expected = mapper.duration_to_width(1.0);

    let mut surface = RecordingSurface::new();
    roll.render(&[voice], &mut surface).unwrap();
    let notes: Vec<_> = surface.rects().collect();
    assert_eq!(notes.len(), 3);
    for (x0, _, x1, _) in notes {
        assert_eq!(x1 - x0, expected);
    }
}

#[test]
fn explicit_voice_color_wins_over_auto_colors() {
    let voices = [
        Voice::from_notes(1, [(r(0, 1), r(1, 4), 62)]),
        Voice::from_notes(2, [(r(0, 1), r(1, 4), 64)]),
    ];
    let mut roll = octave_roll();
    roll.set_grid_mode(GridMode::None);
    roll.enable_auto_voice_colors(true);
    roll.set_voice_color(2, 255, 0, 0, 255);

    let mut surface = RecordingSurface::new();
    roll.render(&voices, &mut surface).unwrap();
    let colors: Vec<_> = surface.colors().collect();
    assert_eq!(
        colors,
        vec![scoreplot::pianoroll::auto_voice_color(0.0, 1), Color::rgb(255, 0, 0)]
    );
}

#[test]
fn well_formed_nesting_renders_cleanly_and_repeatably() {
    let blue = Color::rgb(0, 0, 255);
    let mut voice = Voice::new(0);
    voice
        .push(VoiceEvent::FormatBegin { color: Some(blue) })
        .push(VoiceEvent::ChordBegin)
        .note(r(0, 1), r(0, 1), 60)
        .push(VoiceEvent::FormatBegin { color: None })
        .note(r(0, 1), r(1, 2), 67)
        .push(VoiceEvent::FormatEnd)
        .push(VoiceEvent::ChordEnd)
        .push(VoiceEvent::FormatEnd)
        .note(r(1, 2), r(1, 2), 62);

    let mut roll = octave_roll();
    let mut first = RecordingSurface::new();
    roll.render(std::slice::from_ref(&voice), &mut first).unwrap();
    let mut second = RecordingSurface::new();
    roll.render(std::slice::from_ref(&voice), &mut second).unwrap();

    assert_eq!(first.commands(), second.commands());
    assert_eq!(first.rects().count(), 3);
}

#[test]
fn malformed_voice_keeps_partial_output() {
    let good = Voice::from_notes(0, [(r(0, 1), r(1, 4), 60)]);
    let mut bad = Voice::new(1);
    bad.note(r(0, 1), r(1, 4), 62).push(VoiceEvent::ChordBegin);

    let mut roll = octave_roll();
    roll.set_grid_mode(GridMode::None);
    let mut surface = RecordingSurface::new();
    let err = roll.render(&[good, bad], &mut surface).unwrap_err();
    assert_eq!(err, RenderError::UnterminatedChord { voice: 1 });
    assert_eq!(surface.rects().count(), 2);
}

#[test]
fn full_render_stream() {
    init_tracing();
    let mut melody = Voice::new(0);
    melody
        .note(r(0, 1), r(1, 4), 60)
        .bar(r(1, 1))
        .chord(r(1, 2), r(1, 2), &[64, 67]);
    let bass = Voice::from_notes(1, [(r(3, 1), r(1, 1), 71)]);

    let mut roll = octave_roll();
    roll.enable_keyboard(true);
    roll.enable_measure_bars(true);
    roll.set_voice_color(1, 0, 0, 255, 128);

    let mut surface = RecordingSurface::new();
    roll.render(&[melody, bass], &mut surface).unwrap();
    assert_eq!(roll.keyboard_width(), Some(60.0));
    insta::assert_snapshot!(surface.to_string(), @r"
    size 400.00 120.00
    color rgba(200,200,200,255)
    line 60.00 120.00 400.00 120.00
    color rgba(0,0,0,255)
    rect 0.00 100.00 36.00 110.00
    rect 0.00 80.00 36.00 90.00
    line 0.00 70.00 60.00 70.00
    rect 0.00 50.00 36.00 60.00
    rect 0.00 30.00 36.00 40.00
    rect 0.00 10.00 36.00 20.00
    line 0.00 0.00 60.00 0.00
    line 60.00 0.00 60.00 120.00
    rect 60.00 110.00 81.25 120.00
    color rgba(128,128,128,255)
    line 145.00 0.00 145.00 120.00
    color rgba(0,0,0,255)
    rect 102.50 70.00 145.00 80.00
    rect 102.50 40.00 145.00 50.00
    color rgba(0,0,255,128)
    rect 315.00 0.00 400.00 10.00
    ");
}
