//! Repeat-begin bar sign: a thick stroke, a thin stroke and two dots.
//!
//! The sign adapts to the staff it sits on. Line count, staff thickness and
//! size ratio are re-read from the staff on every layout call, so moving the
//! element to a different staff (or changing the staff) is picked up the next
//! time it is laid out.

use num_rational::Rational64;

use super::{
    Drawable, ElementKind, HasBoundingBox, LayoutContext, MapEntry, MapExportable, MapSelector,
    TagCore,
};
use crate::spacing::{DEFAULT_LINE_COUNT, DEFAULT_STAFF_THICKNESS, LINE_THICK, SpacingUnit};
use crate::staff::StaffId;
use crate::surface::{DrawingSurface, SymbolId};
use crate::types::{BBox, TimePosition};

/// Dot glyph scale relative to the staff size.
const DOT_SCALE: f64 = 0.4;

#[derive(Debug, Clone)]
pub struct RepeatBegin {
    pub(crate) core: TagCore,
    line_count: i32,
    staff_thickness: f64,
    size: f64,
    base_thickness: f64,
}

impl RepeatBegin {
    pub fn new(spacing: SpacingUnit, time: TimePosition) -> Self {
        Self {
            core: TagCore::new(SymbolId::REPEAT_BEGIN, time, Rational64::from_integer(0)),
            line_count: DEFAULT_LINE_COUNT,
            staff_thickness: DEFAULT_STAFF_THICKNESS,
            size: 1.0,
            base_thickness: spacing.spaces(0.6),
        }
    }

    /// Attach to a staff. Takes effect at the next layout.
    pub fn with_staff(mut self, staff: StaffId) -> Self {
        self.core.staff = Some(staff);
        self
    }

    pub fn attach(&mut self, staff: Option<StaffId>) {
        self.core.staff = staff;
    }

    pub fn staff(&self) -> Option<StaffId> {
        self.core.staff
    }

    pub fn line_count(&self) -> i32 {
        self.line_count
    }

    pub fn staff_thickness(&self) -> f64 {
        self.staff_thickness
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn base_thickness(&self) -> f64 {
        self.base_thickness
    }

    pub fn tag_size(&self) -> f64 {
        self.core.tag_size
    }

    /// Width of the thin right stroke.
    pub fn right_line_thickness(&self) -> f64 {
        1.8 * LINE_THICK * self.size
    }

    /// Vertical offsets of the strokes' top and of their extra length,
    /// derived from the line count. Staves with 0 or 1 lines get no
    /// extra length.
    fn stroke_offsets(&self, lspace: f64) -> (f64, f64) {
        let n = self.line_count;
        let top = ((-0.5 * n as f64 - 2.0) % 3.0 + 1.5) * lspace;
        let extra = if n != 0 && n != 1 {
            ((n - 5) % 6) as f64 * lspace
        } else {
            0.0
        };
        (top, extra)
    }

    /// Vertical offsets of the two dots. 0, 1 and 2 line staves use
    /// engraving-tuned values; every other count uses the generic placement.
    fn dot_offsets(&self, lspace: f64) -> (f64, f64) {
        let size = self.size;
        let (first, second) = match self.line_count {
            0 => (-lspace / 2.0 * size, 0.0),
            1 => (-lspace * size, 0.0),
            2 => {
                let first = 14.0 * size;
                (first, -2.0 * first)
            }
            _ => (0.0, 0.0),
        };
        let y1 = -5.0 * size + first;
        let y2 = y1 + lspace * size + second;
        (y1, y2)
    }
}

impl HasBoundingBox for RepeatBegin {
    fn bounding_box(&self) -> BBox {
        self.core.bbox
    }

    fn update_bounding_box(&mut self, ctx: &LayoutContext<'_>) {
        let half_extent = ctx.metrics.symbol_extent(self.core.symbol) * 0.5;
        self.core.bbox = BBox::new(-half_extent, 0.0, half_extent, ctx.spacing.staff_height());

        match ctx.staff(self.core.staff) {
            Some(staff) => {
                let lines_offset = staff.num_lines() - DEFAULT_LINE_COUNT;
                self.core
                    .apply_staff_shift(staff.spacing_unit() * lines_offset as f64 / 2.0);

                self.line_count = staff.num_lines();
                self.staff_thickness = staff.line_thickness();
                self.size = staff.size_ratio();
                self.base_thickness = ctx.spacing.scaled(0.6, self.size);
                self.core.tag_size = self.size;

                crate::log::debug!(
                    lines = self.line_count,
                    size = self.size,
                    shift = self.core.staff_shift,
                    "repeat begin adapted to staff"
                );
            }
            None => {
                self.core.apply_staff_shift(0.0);
                self.line_count = DEFAULT_LINE_COUNT;
                self.staff_thickness = DEFAULT_STAFF_THICKNESS;
                self.size = 1.0;
                self.base_thickness = ctx.spacing.spaces(0.6);
                self.core.tag_size = 1.0;

                crate::log::debug!("repeat begin has no staff, using default geometry");
            }
        }

        self.core.refresh_mapping();
    }
}

impl Drawable for RepeatBegin {
    fn is_visible(&self) -> bool {
        self.core.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.core.visible = visible;
    }

    fn draw(&self, ctx: &LayoutContext<'_>, surface: &mut dyn DrawingSurface) {
        if !self.core.visible {
            return;
        }

        let lspace = ctx.spacing.lspace();
        let size = self.size;
        let position = self.core.position;
        let bbox = self.core.bbox;

        let (offset_top, offset_extra) = self.stroke_offsets(lspace);
        let right_thickness = self.right_line_thickness();
        let spacing = self.base_thickness + lspace * 0.4 * size - right_thickness;

        let x1 = position.x - bbox.width() + 1.0 + self.staff_thickness / 2.0;
        let x2 = x1 + spacing;
        let y1 = position.y + offset_top * size;
        let y2 = y1 + (bbox.bottom + offset_extra) * size;

        surface.fill_rectangle(x1, y1, x1 + self.base_thickness, y2);
        surface.fill_rectangle(x2, y1, x2 + right_thickness, y2);

        let (dot_y1, dot_y2) = self.dot_offsets(lspace);
        let dot_x = 55.0 * size - 85.0;
        let dot_size = DOT_SCALE * size;
        self.core
            .draw_symbol(ctx, surface, SymbolId::DOT, dot_x, dot_y1, dot_size);
        self.core
            .draw_symbol(ctx, surface, SymbolId::DOT, dot_x, dot_y2, dot_size);
    }
}

impl MapExportable for RepeatBegin {
    fn kind(&self) -> ElementKind {
        ElementKind::RepeatBegin
    }

    fn collect_map(&self, selector: MapSelector, out: &mut Vec<MapEntry>) {
        if selector == MapSelector::Bar {
            out.push(self.core.map_entry(ElementKind::RepeatBegin));
        }
    }
}
