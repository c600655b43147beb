//! The spacing-unit model: the base length every staff-relative distance is
//! expressed in, plus the engraving constants derived from it.

use crate::errors::ConfigError;
use crate::types::NumericError;

/// Default base length (one staff space) in device units.
pub const LSPACE: f64 = 50.0;

/// Number of lines on a standard staff.
pub const DEFAULT_LINE_COUNT: i32 = 5;

/// Thickness of a regular bar line.
pub const LINE_THICK: f64 = 4.0;

/// Staff line thickness used before an element sees its staff.
pub const DEFAULT_STAFF_THICKNESS: f64 = 0.08;

/// Base length unit (`LSPACE`). Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingUnit(f64);

impl SpacingUnit {
    /// Validate and wrap a spacing unit.
    pub fn try_new(lspace: f64) -> Result<Self, ConfigError> {
        NumericError::check_positive(lspace)
            .map(SpacingUnit)
            .map_err(|source| ConfigError::SpacingUnit { source })
    }

    #[inline]
    pub fn lspace(self) -> f64 {
        self.0
    }

    /// `n` staff spaces.
    #[inline]
    pub fn spaces(self, n: f64) -> f64 {
        self.0 * n
    }

    /// `n` staff spaces scaled by a staff size ratio.
    #[inline]
    pub fn scaled(self, n: f64, size_ratio: f64) -> f64 {
        self.0 * n * size_ratio
    }

    /// Height of a standard five-line staff (four spaces).
    #[inline]
    pub fn staff_height(self) -> f64 {
        self.spaces(4.0)
    }
}

impl Default for SpacingUnit {
    fn default() -> Self {
        SpacingUnit(LSPACE)
    }
}
