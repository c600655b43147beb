//! Staff contexts: the per-staff attributes notation elements adapt to.
//!
//! Elements never own a staff. They carry a [`StaffId`] and resolve it
//! through a [`StaffLookup`] each time they lay themselves out.

use crate::errors::ConfigError;
use crate::spacing::{DEFAULT_LINE_COUNT, DEFAULT_STAFF_THICKNESS, LSPACE};
use crate::types::NumericError;

/// Read-only view of a staff, queried at layout time.
///
/// Implementations must return the same values for the duration of one
/// layout call.
pub trait StaffProvider {
    fn num_lines(&self) -> i32;
    fn line_thickness(&self) -> f64;
    fn size_ratio(&self) -> f64;
    /// The staff's own spacing unit (already scaled by its size ratio).
    fn spacing_unit(&self) -> f64;
}

/// Plain snapshot of staff attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffContext {
    pub line_count: i32,
    pub line_thickness: f64,
    pub size_ratio: f64,
    pub unit_size: f64,
}

impl StaffContext {
    /// Build a validated staff context.
    pub fn try_new(
        line_count: i32,
        line_thickness: f64,
        size_ratio: f64,
        unit_size: f64,
    ) -> Result<Self, ConfigError> {
        if line_count < 0 {
            return Err(ConfigError::LineCount { count: line_count });
        }
        NumericError::check_positive(size_ratio)
            .map_err(|source| ConfigError::SizeRatio { source })?;
        NumericError::check_positive(unit_size)
            .map_err(|source| ConfigError::SpacingUnit { source })?;
        Ok(StaffContext {
            line_count,
            line_thickness,
            size_ratio,
            unit_size,
        })
    }

    pub fn with_line_count(mut self, line_count: i32) -> Self {
        self.line_count = line_count;
        self
    }

    pub fn with_size_ratio(mut self, size_ratio: f64) -> Self {
        self.size_ratio = size_ratio;
        self
    }
}

impl Default for StaffContext {
    fn default() -> Self {
        StaffContext {
            line_count: DEFAULT_LINE_COUNT,
            line_thickness: DEFAULT_STAFF_THICKNESS,
            size_ratio: 1.0,
            unit_size: LSPACE,
        }
    }
}

impl StaffProvider for StaffContext {
    fn num_lines(&self) -> i32 {
        self.line_count
    }

    fn line_thickness(&self) -> f64 {
        self.line_thickness
    }

    fn size_ratio(&self) -> f64 {
        self.size_ratio
    }

    fn spacing_unit(&self) -> f64 {
        self.unit_size
    }
}

/// Handle to a staff held by some [`StaffLookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StaffId(pub usize);

/// Resolves staff handles to providers.
pub trait StaffLookup {
    fn staff(&self, id: StaffId) -> Option<&dyn StaffProvider>;
}

/// A lookup with no staves; everything falls back to defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStaves;

impl StaffLookup for NoStaves {
    fn staff(&self, _id: StaffId) -> Option<&dyn StaffProvider> {
        None
    }
}

/// Vec-backed staff table, indexed by insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaffTable {
    staves: Vec<StaffContext>,
}

impl StaffTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a staff and return its handle.
    pub fn insert(&mut self, staff: StaffContext) -> StaffId {
        self.staves.push(staff);
        StaffId(self.staves.len() - 1)
    }

    /// Replace the attributes of an existing staff.
    ///
    /// Returns `false` if the handle is unknown.
    pub fn update(&mut self, id: StaffId, staff: StaffContext) -> bool {
        match self.staves.get_mut(id.0) {
            Some(slot) => {
                *slot = staff;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: StaffId) -> Option<&StaffContext> {
        self.staves.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.staves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staves.is_empty()
    }
}

impl StaffLookup for StaffTable {
    fn staff(&self, id: StaffId) -> Option<&dyn StaffProvider> {
        self.staves.get(id.0).map(|s| s as &dyn StaffProvider)
    }
}
