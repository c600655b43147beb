//! Plain single bar line, spanning the staff it is attached to.

use num_rational::Rational64;

use super::{
    Drawable, ElementKind, HasBoundingBox, LayoutContext, MapEntry, MapExportable, MapSelector,
    TagCore,
};
use crate::spacing::{DEFAULT_LINE_COUNT, LINE_THICK};
use crate::staff::StaffId;
use crate::surface::{DrawingSurface, SymbolId};
use crate::types::{BBox, TimePosition};

#[derive(Debug, Clone)]
pub struct Bar {
    pub(crate) core: TagCore,
    line_count: i32,
    size: f64,
}

impl Bar {
    pub fn new(time: TimePosition) -> Self {
        Self {
            // bar lines are ruled, not drawn from a glyph
            core: TagCore::new(SymbolId(0), time, Rational64::from_integer(0)),
            line_count: DEFAULT_LINE_COUNT,
            size: 1.0,
        }
    }

    pub fn with_staff(mut self, staff: StaffId) -> Self {
        self.core.staff = Some(staff);
        self
    }

    pub fn attach(&mut self, staff: Option<StaffId>) {
        self.core.staff = staff;
    }

    pub fn line_count(&self) -> i32 {
        self.line_count
    }

    pub fn thickness(&self) -> f64 {
        LINE_THICK * self.size
    }
}

impl HasBoundingBox for Bar {
    fn bounding_box(&self) -> BBox {
        self.core.bbox
    }

    fn update_bounding_box(&mut self, ctx: &LayoutContext<'_>) {
        let (lines, unit) = match ctx.staff(self.core.staff) {
            Some(staff) => {
                self.size = staff.size_ratio();
                (staff.num_lines(), staff.spacing_unit())
            }
            None => {
                self.size = 1.0;
                (DEFAULT_LINE_COUNT, ctx.spacing.lspace())
            }
        };
        self.line_count = lines;

        let half = self.thickness() / 2.0;
        // staves with a single line (or none) get a bar one space above and below
        self.core.bbox = if lines > 1 {
            BBox::new(-half, 0.0, half, (lines - 1) as f64 * unit)
        } else {
            BBox::new(-half, -unit, half, unit)
        };
        self.core.refresh_mapping();
    }
}

impl Drawable for Bar {
    fn is_visible(&self) -> bool {
        self.core.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.core.visible = visible;
    }

    fn draw(&self, _ctx: &LayoutContext<'_>, surface: &mut dyn DrawingSurface) {
        if !self.core.visible {
            return;
        }
        let r = self.core.bbox + (self.core.position + self.core.offset);
        surface.fill_rectangle(r.left, r.top, r.right, r.bottom);
    }
}

impl MapExportable for Bar {
    fn kind(&self) -> ElementKind {
        ElementKind::Bar
    }

    fn collect_map(&self, selector: MapSelector, out: &mut Vec<MapEntry>) {
        if selector == MapSelector::Bar {
            out.push(self.core.map_entry(ElementKind::Bar));
        }
    }
}
