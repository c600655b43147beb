//! Score notation layout and piano-roll rendering.
//!
//! Two independent pieces share one drawing abstraction:
//!
//! - [`notation`]: score elements (repeat-begin signs, bar lines) that lay
//!   themselves out against a staff and draw onto a [`DrawingSurface`].
//! - [`pianoroll`]: voices drawn as time/pitch rectangles, with optional
//!   pitch grid, keyboard strip and measure bars.
//!
//! Nothing here rasterizes. Backends implement [`DrawingSurface`];
//! [`RecordingSurface`] records the command stream instead.

pub mod errors;
pub mod log;
pub mod notation;
pub mod pianoroll;
pub mod spacing;
pub mod staff;
pub mod surface;
pub mod types;

pub use errors::{ConfigError, MidiError, RenderError};
pub use notation::{
    Bar, Drawable, HasBoundingBox, LayoutContext, MapExportable, MapSelector, NotationElement,
    Positionable, RepeatBegin,
};
pub use pianoroll::{CanvasConfig, GridMode, PianoRoll, Voice, VoiceEvent};
pub use spacing::SpacingUnit;
pub use staff::{StaffContext, StaffId, StaffLookup, StaffProvider, StaffTable};
pub use surface::{DrawCommand, DrawingSurface, RecordingSurface, SymbolId};
pub use types::{BBox, Color, Duration, Pitch, TimePosition};
