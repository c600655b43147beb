//! Geometry, colour and musical-time primitives shared by the notation
//! elements and the piano roll.

use std::fmt;
use std::ops::Add;

use glam::DVec2;
use num_rational::Rational64;

/// Error type for invalid numeric configuration values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl NumericError {
    /// Validate that `val` is finite and strictly positive.
    pub fn check_positive(val: f64) -> Result<f64, NumericError> {
        if val.is_nan() {
            Err(NumericError::NaN)
        } else if val.is_infinite() {
            Err(NumericError::Infinite)
        } else if val == 0.0 {
            Err(NumericError::Zero)
        } else if val < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(val)
        }
    }
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Onset of a musical event, in whole notes from the start of the score.
pub type TimePosition = Rational64;

/// Length of a musical event, in whole notes.
pub type Duration = Rational64;

/// MIDI key number (60 = middle C).
pub type Pitch = i32;

/// Convert a rational date or duration to `f64` for pixel math.
#[inline]
pub fn time_to_f64(t: Rational64) -> f64 {
    *t.numer() as f64 / *t.denom() as f64
}

/// Axis-aligned rectangle in local (element) or canvas coordinates.
///
/// Y grows downward, so `top <= bottom` for a laid-out box. The invariant is
/// not enforced before the first layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BBox {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BBox {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        BBox { top, left, right, bottom }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// The same rectangle moved by `by`.
    pub fn translated(self, by: DVec2) -> BBox {
        BBox {
            top: self.top + by.y,
            left: self.left + by.x,
            right: self.right + by.x,
            bottom: self.bottom + by.y,
        }
    }
}

impl Add<DVec2> for BBox {
    type Output = BBox;
    fn add(self, rhs: DVec2) -> BBox {
        self.translated(rhs)
    }
}

/// 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Build an opaque colour from hue, saturation and value, each in `[0, 1]`.
    ///
    /// Hue wraps, so `1.0` is the same as `0.0`.
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let s = s.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        if s == 0.0 {
            let c = channel(v);
            return Color::rgb(c, c, c);
        }

        let h = h.rem_euclid(1.0) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Color::rgb(channel(r), channel(g), channel(b))
    }
}

fn channel(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}
