//! Error types with diagnostic codes using miette
//!
//! Configuration mistakes never show up here: they fall back to safe
//! defaults. What remains are structural problems in the input voices and
//! MIDI files that cannot be read as voices.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::NumericError;

// ============================================================================
// Render Errors
// ============================================================================

/// Render-integrity failures found while walking a voice.
///
/// Output emitted before the failure is left on the surface.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("voice {voice} ends inside a chord")]
    #[diagnostic(
        code(scoreplot::render::unterminated_chord),
        help("every chord start needs a matching chord end")
    )]
    UnterminatedChord { voice: usize },

    #[error("voice {voice} closes a chord that was never opened")]
    #[diagnostic(code(scoreplot::render::unbalanced_chord_end))]
    UnbalancedChordEnd { voice: usize },

    #[error("voice {voice} ends with {depth} open format scope(s)")]
    #[diagnostic(
        code(scoreplot::render::unterminated_format),
        help("every format start needs a matching format end")
    )]
    UnterminatedFormat { voice: usize, depth: usize },

    #[error("voice {voice} closes a format scope that was never opened")]
    #[diagnostic(code(scoreplot::render::unbalanced_format_end))]
    UnbalancedFormatEnd { voice: usize },
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Rejected values for the few settings that are validated up front.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid spacing unit: {source}")]
    #[diagnostic(
        code(scoreplot::config::spacing_unit),
        help("the spacing unit must be a finite, positive length")
    )]
    SpacingUnit {
        #[source]
        source: NumericError,
    },

    #[error("invalid staff size ratio: {source}")]
    #[diagnostic(code(scoreplot::config::size_ratio))]
    SizeRatio {
        #[source]
        source: NumericError,
    },

    #[error("invalid staff line count: {count}")]
    #[diagnostic(
        code(scoreplot::config::line_count),
        help("a staff has zero or more lines")
    )]
    LineCount { count: i32 },
}

// ============================================================================
// MIDI Import Errors
// ============================================================================

/// Standard MIDI File input that cannot become voices.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum MidiError {
    #[error("malformed MIDI file: {message}")]
    #[diagnostic(code(scoreplot::midi::malformed))]
    Malformed { message: String },

    #[error("MIDI file uses timecode timing")]
    #[diagnostic(
        code(scoreplot::midi::timecode_timing),
        help("only metrical (ticks per quarter note) timing maps onto note values")
    )]
    TimecodeTiming,

    #[error("MIDI file declares zero ticks per quarter note")]
    #[diagnostic(code(scoreplot::midi::zero_ticks_per_quarter))]
    ZeroTicksPerQuarter,
}
