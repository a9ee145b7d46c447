//! Drawing extent with recursive block expansion

use super::expand::{BlockExpander, ExpansionVisitor};
use crate::document::DrawingDocument;
use crate::entities::EntityType;
use crate::types::{BoundingBox2D, Transform2D, Vector2};

pub use crate::document::DEFAULT_MAX_EXPANDED_ENTITIES;

/// Default cap on nested block expansion
pub const DEFAULT_MAX_BLOCK_DEPTH: usize = 64;

/// Extent of a drawing in drawing units.
///
/// `width` and `height` are always positive: degenerate axes are widened to
/// one unit and an empty drawing is the unit box at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderInfo {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

impl RenderInfo {
    /// The unit box used when nothing has extent
    pub const UNIT: RenderInfo = RenderInfo {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 1.0,
        max_y: 1.0,
        width: 1.0,
        height: 1.0,
    };

    /// Build from a measured box, flooring degenerate axes
    pub fn from_bounds(bounds: &BoundingBox2D) -> Self {
        let (min_x, max_x, width) = Self::floor_axis(bounds.min.x, bounds.max.x);
        let (min_y, max_y, height) = Self::floor_axis(bounds.min.y, bounds.max.y);
        RenderInfo {
            min_x,
            min_y,
            max_x,
            max_y,
            width,
            height,
        }
    }

    fn floor_axis(min: f64, max: f64) -> (f64, f64, f64) {
        let span = max - min;
        if span.is_finite() && span >= f64::EPSILON {
            (min, max, span)
        } else {
            (min, min + 1.0, 1.0)
        }
    }

    pub fn min(&self) -> Vector2 {
        Vector2::new(self.min_x, self.min_y)
    }

    pub fn max(&self) -> Vector2 {
        Vector2::new(self.max_x, self.max_y)
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

impl Default for RenderInfo {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Computes the axis-aligned extent of a document's geometry.
///
/// Inserts are expanded through their placement transform. A block that is
/// already on the current expansion path, a block nested deeper than
/// `max_depth`, or an undefined block contributes nothing. Once
/// `max_expansion` entity visits are used, the rest of the drawing
/// contributes nothing either.
pub struct BoundsResolver<'a> {
    document: &'a DrawingDocument,
    max_depth: usize,
    max_expansion: usize,
}

impl<'a> BoundsResolver<'a> {
    pub fn new(document: &'a DrawingDocument) -> Self {
        Self {
            document,
            max_depth: DEFAULT_MAX_BLOCK_DEPTH,
            max_expansion: DEFAULT_MAX_EXPANDED_ENTITIES,
        }
    }

    /// Builder: cap nested block expansion
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder: cap the total entity visits of one pass
    pub fn with_max_expansion(mut self, max_expansion: usize) -> Self {
        self.max_expansion = max_expansion;
        self
    }

    /// Extent as [`RenderInfo`], never degenerate
    pub fn resolve(&self) -> RenderInfo {
        match self.extent() {
            Some(bounds) => RenderInfo::from_bounds(&bounds),
            None => RenderInfo::UNIT,
        }
    }

    /// Raw extent, or `None` when no entity contributes
    pub fn extent(&self) -> Option<BoundingBox2D> {
        let mut expander = BlockExpander::new(self.document, self.max_depth, self.max_expansion);
        let mut extent = Extent(None);
        expander.walk(self.document.entities(), &Transform2D::identity(), &(), 0, &mut extent);

        let budget = expander.budget();
        if budget.is_exhausted() {
            tracing::warn!(visits = budget.spent(), "bounds pass hit the expansion limit");
        }
        extent.0
    }
}

struct Extent(Option<BoundingBox2D>);

impl Extent {
    fn include(&mut self, point: Vector2) {
        if !point.is_finite() {
            return;
        }
        match &mut self.0 {
            Some(bounds) => bounds.expand_to_include(point),
            None => self.0 = Some(BoundingBox2D::from_point(point)),
        }
    }
}

impl ExpansionVisitor for Extent {
    type Context = ();

    fn visit(&mut self, entity: &EntityType, transform: &Transform2D, _: &()) {
        match entity {
            EntityType::Line(line) => {
                self.include(transform.apply(line.start));
                self.include(transform.apply(line.end));
            }
            EntityType::Polyline(pl) => {
                for v in &pl.vertices {
                    self.include(transform.apply(v.location));
                }
            }
            EntityType::Circle(circle) => {
                let center = transform.apply(circle.center);
                let reach = transform.axis_extents() * circle.radius.abs();
                self.include(center - reach);
                self.include(center + reach);
            }
            EntityType::Insert(_) | EntityType::Text(_) | EntityType::Unknown(_) => {}
        }
    }

    fn nest(&mut self, _: &EntityType, _: &()) {}
}
