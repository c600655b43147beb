//! Staff-adaptive notation elements
//!
//! Each element kind is its own type implementing a small set of capability
//! traits:
//! - [`HasBoundingBox`]: derive the local extent from the staff it sits on
//! - [`Positionable`]: anchor position, offset and the exported mapping region
//! - [`Drawable`]: emit primitives to a [`DrawingSurface`]
//! - [`MapExportable`]: report `(time, duration, kind, region)` tuples
//!
//! [`NotationElement`] wraps the kinds and forwards the traits with
//! `enum_dispatch`.

mod bar;
mod repeat_begin;

pub use bar::Bar;
pub use repeat_begin::RepeatBegin;

use std::collections::HashMap;

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};

use crate::spacing::SpacingUnit;
use crate::staff::{StaffId, StaffLookup, StaffProvider};
use crate::surface::{DrawingSurface, SymbolId};
use crate::types::{BBox, Duration, TimePosition};

// ============================================================================
// Layout context
// ============================================================================

/// Glyph metrics, provided by whatever owns the music font.
pub trait SymbolMetrics {
    /// Horizontal extent of a glyph at unit scale.
    fn symbol_extent(&self, id: SymbolId) -> f64;
}

/// Table-backed metrics with a fallback extent for unknown glyphs.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    extents: HashMap<SymbolId, f64>,
    fallback: f64,
}

impl SymbolTable {
    pub fn new(fallback: f64) -> Self {
        Self {
            extents: HashMap::new(),
            fallback,
        }
    }

    pub fn with_extent(mut self, id: SymbolId, extent: f64) -> Self {
        self.extents.insert(id, extent);
        self
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        let unit = SpacingUnit::default();
        SymbolTable::new(unit.lspace())
            .with_extent(SymbolId::REPEAT_BEGIN, unit.spaces(2.0))
            .with_extent(SymbolId::DOT, unit.spaces(0.4))
    }
}

impl SymbolMetrics for SymbolTable {
    fn symbol_extent(&self, id: SymbolId) -> f64 {
        self.extents.get(&id).copied().unwrap_or(self.fallback)
    }
}

/// Everything an element needs to lay itself out and draw, passed in
/// explicitly on every call.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    pub spacing: SpacingUnit,
    pub staves: &'a dyn StaffLookup,
    pub metrics: &'a dyn SymbolMetrics,
    /// Glyph reference point, scaled by the glyph size when drawing.
    pub reference_position: DVec2,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        spacing: SpacingUnit,
        staves: &'a dyn StaffLookup,
        metrics: &'a dyn SymbolMetrics,
    ) -> Self {
        Self {
            spacing,
            staves,
            metrics,
            reference_position: dvec2(0.0, spacing.staff_height()),
        }
    }

    pub fn with_reference_position(mut self, reference_position: DVec2) -> Self {
        self.reference_position = reference_position;
        self
    }

    /// Resolve an element's staff, if it has one and the lookup knows it.
    pub fn staff(&self, id: Option<StaffId>) -> Option<&'a dyn StaffProvider> {
        let staves: &'a dyn StaffLookup = self.staves;
        id.and_then(|id| staves.staff(id))
    }
}

// ============================================================================
// Mapping export
// ============================================================================

/// Which mapping category a caller is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSelector {
    Page,
    System,
    Staff,
    Bar,
    Event,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    RepeatBegin,
    Bar,
}

/// One exported region, correlating graphics with musical time.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub time: TimePosition,
    pub duration: Duration,
    pub kind: ElementKind,
    pub region: BBox,
}

/// Opaque identity of whoever reports a new position (usually the
/// spacing engine's spring or a neighbouring element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub usize);

// ============================================================================
// Capability traits
// ============================================================================

#[enum_dispatch]
pub trait HasBoundingBox {
    /// Local extent relative to the anchor position.
    fn bounding_box(&self) -> BBox;

    /// Re-derive the extent (and any staff-dependent state) from the
    /// element's current staff.
    fn update_bounding_box(&mut self, ctx: &LayoutContext<'_>);
}

/// Every mutation here refreshes the mapping region before returning.
#[enum_dispatch]
pub trait Positionable {
    fn position(&self) -> DVec2;
    fn set_position(&mut self, position: DVec2);
    fn set_h_position(&mut self, x: f64);
    /// Position notification from the spacing engine or a neighbour.
    fn tell_position(&mut self, caller: ElementId, position: DVec2);
    fn offset(&self) -> DVec2;
    fn set_offset(&mut self, offset: DVec2);
    /// Bounding box translated by position and offset.
    fn mapping_region(&self) -> BBox;
}

#[enum_dispatch]
pub trait Drawable {
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
    fn draw(&self, ctx: &LayoutContext<'_>, surface: &mut dyn DrawingSurface);
}

#[enum_dispatch]
pub trait MapExportable {
    fn kind(&self) -> ElementKind;
    /// Append this element's entry if it belongs to `selector`.
    fn collect_map(&self, selector: MapSelector, out: &mut Vec<MapEntry>);
}

/// A notation element of any supported kind.
#[enum_dispatch(HasBoundingBox, Positionable, Drawable, MapExportable)]
#[derive(Debug, Clone)]
pub enum NotationElement {
    RepeatBegin(RepeatBegin),
    Bar(Bar),
}

// ============================================================================
// Shared element state
// ============================================================================

/// State common to all tag elements.
#[derive(Debug, Clone)]
pub(crate) struct TagCore {
    pub(crate) position: DVec2,
    pub(crate) offset: DVec2,
    pub(crate) bbox: BBox,
    pub(crate) mapping: BBox,
    pub(crate) visible: bool,
    pub(crate) tag_size: f64,
    pub(crate) staff: Option<StaffId>,
    pub(crate) time: TimePosition,
    pub(crate) duration: Duration,
    pub(crate) symbol: SymbolId,
    /// Vertical adjustment applied for the staff's line count, on top of the
    /// anchor the caller set.
    pub(crate) staff_shift: f64,
}

impl TagCore {
    pub(crate) fn new(symbol: SymbolId, time: TimePosition, duration: Duration) -> Self {
        Self {
            position: DVec2::ZERO,
            offset: DVec2::ZERO,
            bbox: BBox::default(),
            mapping: BBox::default(),
            visible: true,
            tag_size: 1.0,
            staff: None,
            time,
            duration,
            symbol,
            staff_shift: 0.0,
        }
    }

    pub(crate) fn refresh_mapping(&mut self) {
        self.mapping = self.bbox + (self.position + self.offset);
    }

    pub(crate) fn set_position(&mut self, position: DVec2) {
        self.position = position;
        self.staff_shift = 0.0;
        self.refresh_mapping();
    }

    pub(crate) fn set_h_position(&mut self, x: f64) {
        self.position.x = x;
        self.refresh_mapping();
    }

    pub(crate) fn set_offset(&mut self, offset: DVec2) {
        self.offset = offset;
        self.refresh_mapping();
    }

    /// Replace the staff-derived vertical shift, keeping the caller's anchor.
    pub(crate) fn apply_staff_shift(&mut self, shift: f64) {
        self.position.y += shift - self.staff_shift;
        self.staff_shift = shift;
    }

    /// Draw a glyph relative to the anchor. A `size` of zero uses the tag size.
    pub(crate) fn draw_symbol(
        &self,
        ctx: &LayoutContext<'_>,
        surface: &mut dyn DrawingSurface,
        id: SymbolId,
        dx: f64,
        dy: f64,
        size: f64,
    ) {
        let scale = if size > 0.0 { size } else { self.tag_size };
        let at = self.position + self.offset + ctx.reference_position * scale + dvec2(dx, dy);
        surface.draw_symbol(id, at.x, at.y, scale);
    }

    pub(crate) fn map_entry(&self, kind: ElementKind) -> MapEntry {
        MapEntry {
            time: self.time,
            duration: self.duration,
            kind,
            region: self.mapping,
        }
    }
}

macro_rules! delegate_positionable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Positionable for $ty {
                fn position(&self) -> DVec2 {
                    self.core.position
                }

                fn set_position(&mut self, position: DVec2) {
                    self.core.set_position(position);
                }

                fn set_h_position(&mut self, x: f64) {
                    self.core.set_h_position(x);
                }

                fn tell_position(&mut self, caller: ElementId, position: DVec2) {
                    let _ = caller;
                    crate::log::debug!(?caller, x = position.x, y = position.y, "tell_position");
                    self.core.set_position(position);
                }

                fn offset(&self) -> DVec2 {
                    self.core.offset
                }

                fn set_offset(&mut self, offset: DVec2) {
                    self.core.set_offset(offset);
                }

                fn mapping_region(&self) -> BBox {
                    self.core.mapping
                }
            }
        )*
    };
}

delegate_positionable!(RepeatBegin, Bar);

// ============================================================================
// Passes over element lists
// ============================================================================

/// Lay out every element against its staff.
pub fn layout_all(elements: &mut [NotationElement], ctx: &LayoutContext<'_>) {
    crate::log::debug!(count = elements.len(), "layout pass");
    for element in elements.iter_mut() {
        element.update_bounding_box(ctx);
    }
}

/// Draw every element in order.
pub fn draw_all(
    elements: &[NotationElement],
    ctx: &LayoutContext<'_>,
    surface: &mut dyn DrawingSurface,
) {
    for element in elements {
        element.draw(ctx, surface);
    }
}

/// Collect the mapping entries of one category.
pub fn collect_map(elements: &[NotationElement], selector: MapSelector) -> Vec<MapEntry> {
    let mut out = Vec::new();
    for element in elements {
        element.collect_map(selector, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staff::{NoStaves, StaffContext, StaffTable};
    use num_rational::Rational64;

    #[test]
    fn symbol_table_falls_back() {
        let table = SymbolTable::new(7.0).with_extent(SymbolId::DOT, 3.0);
        assert_eq!(table.symbol_extent(SymbolId::DOT), 3.0);
        assert_eq!(table.symbol_extent(SymbolId(1)), 7.0);
    }

    #[test]
    fn context_resolves_only_attached_staves() {
        let mut staves = StaffTable::new();
        let id = staves.insert(StaffContext::default().with_line_count(3));
        let metrics = SymbolTable::default();
        let ctx = LayoutContext::new(SpacingUnit::default(), &staves, &metrics);

        assert_eq!(ctx.staff(Some(id)).map(|s| s.num_lines()), Some(3));
        assert!(ctx.staff(None).is_none());
        assert_eq!(ctx.reference_position, dvec2(0.0, 200.0));
    }

    #[test]
    fn enum_forwards_to_kinds() {
        let metrics = SymbolTable::default();
        let ctx = LayoutContext::new(SpacingUnit::default(), &NoStaves, &metrics);
        let mut elements: Vec<NotationElement> = vec![
            RepeatBegin::new(SpacingUnit::default(), Rational64::from_integer(1)).into(),
            Bar::new(Rational64::from_integer(2)).into(),
        ];

        layout_all(&mut elements, &ctx);
        assert_eq!(elements[0].kind(), ElementKind::RepeatBegin);
        assert_eq!(elements[1].kind(), ElementKind::Bar);

        for (i, element) in elements.iter_mut().enumerate() {
            element.set_h_position(100.0 * (i as f64 + 1.0));
        }
        let map = collect_map(&elements, MapSelector::Bar);
        assert_eq!(map.len(), 2);
        assert_eq!(map[0].time, Rational64::from_integer(1));
        assert_eq!(map[1].region, elements[1].mapping_region());

        assert!(collect_map(&elements, MapSelector::Event).is_empty());
    }

    #[test]
    fn staff_shift_is_replaced_not_accumulated() {
        let mut core = TagCore::new(SymbolId::DOT, Rational64::from_integer(0), Rational64::from_integer(0));
        core.set_position(dvec2(0.0, 10.0));
        core.apply_staff_shift(25.0);
        core.apply_staff_shift(25.0);
        assert_eq!(core.position.y, 35.0);
        core.apply_staff_shift(-50.0);
        assert_eq!(core.position.y, -40.0);
        core.set_position(dvec2(0.0, 10.0));
        assert_eq!(core.staff_shift, 0.0);
    }
}
