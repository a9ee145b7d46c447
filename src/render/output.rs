//! Geographic primitives handed to the map surface
//!
//! Each top-level entity is expanded (inserts recursively) into styled
//! primitives in geographic coordinates. Text and unknown records carry no
//! drawable geometry beyond a text anchor point.
//!
//! The expansion budget is shared by the whole document. A sequential
//! counting pass decides how many visits each top-level entity gets, so the
//! parallel pass truncates at exactly the point a sequential render would.

use super::bounds::{RenderInfo, DEFAULT_MAX_BLOCK_DEPTH, DEFAULT_MAX_EXPANDED_ENTITIES};
use super::color::{ColorResolver, InheritContext, ResolvedColor};
use super::expand::{BlockExpander, ExpansionVisitor, Tally};
use super::projector::GeoProjector;
use crate::document::DrawingDocument;
use crate::entities::{Circle, EntityType};
use crate::placement::{GeoPoint, GeographicPlacement};
use crate::types::{Transform2D, Vector2};
use rayon::prelude::*;

/// Render options
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Segments used to tessellate a full turn of an arc or bulge
    pub arc_segments: usize,
    /// Cap on nested block expansion
    pub max_block_depth: usize,
    /// Cap on entity and insert-instance visits for the whole document
    pub max_expanded_entities: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            arc_segments: 32,
            max_block_depth: DEFAULT_MAX_BLOCK_DEPTH,
            max_expanded_entities: DEFAULT_MAX_EXPANDED_ENTITIES,
        }
    }
}

/// Geometry in geographic coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum RenderGeometry {
    Polyline { points: Vec<GeoPoint>, closed: bool },
    Circle { center: GeoPoint, radius_meters: f64 },
    Point(GeoPoint),
}

/// Stroke and fill implied by the entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub stroke: bool,
    pub fill: bool,
}

impl StrokeStyle {
    pub const OUTLINE: StrokeStyle = StrokeStyle { stroke: true, fill: false };
    pub const FILLED: StrokeStyle = StrokeStyle { stroke: true, fill: true };
    pub const MARKER: StrokeStyle = StrokeStyle { stroke: false, fill: true };
}

/// One drawable item
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPrimitive {
    pub geometry: RenderGeometry,
    pub color: ResolvedColor,
    pub style: StrokeStyle,
}

/// Render every visible entity of `document` into `placement`.
///
/// Output order follows drawing order, with block contents in place of
/// their insert.
pub fn render_document(
    document: &DrawingDocument,
    info: &RenderInfo,
    placement: &GeographicPlacement,
    config: &RenderConfig,
) -> Vec<RenderPrimitive> {
    let renderer = Renderer::new(document, info, placement, config);
    let allowances = expansion_allowances(document, config);
    let chunks: Vec<Vec<RenderPrimitive>> = document
        .entities()
        .par_iter()
        .zip(allowances.par_iter())
        .map(|(entity, &allowance)| {
            let mut expander = BlockExpander::new(document, config.max_block_depth, allowance);
            let mut emitter = Emitter {
                renderer: &renderer,
                out: Vec::new(),
            };
            expander.walk(std::slice::from_ref(entity), &Transform2D::identity(), &None, 0, &mut emitter);
            emitter.out
        })
        .collect();

    let primitives: Vec<RenderPrimitive> = chunks.into_iter().flatten().collect();
    tracing::debug!(
        entities = document.entities().len(),
        primitives = primitives.len(),
        "document rendered"
    );
    primitives
}

/// Visits each top-level entity may use, in drawing order
fn expansion_allowances(document: &DrawingDocument, config: &RenderConfig) -> Vec<usize> {
    let mut expander = BlockExpander::new(document, config.max_block_depth, config.max_expanded_entities);
    let allowances = document
        .entities()
        .iter()
        .map(|entity| {
            let before = expander.budget().spent();
            expander.walk(std::slice::from_ref(entity), &Transform2D::identity(), &(), 0, &mut Tally);
            expander.budget().spent() - before
        })
        .collect();

    let budget = expander.budget();
    if budget.is_exhausted() {
        tracing::warn!(visits = budget.spent(), "render pass hit the expansion limit");
    }
    allowances
}

struct Renderer<'a> {
    colors: ColorResolver<'a>,
    projector: GeoProjector,
    meters_per_unit: f64,
    config: &'a RenderConfig,
}

impl<'a> Renderer<'a> {
    fn new(
        document: &'a DrawingDocument,
        info: &RenderInfo,
        placement: &GeographicPlacement,
        config: &'a RenderConfig,
    ) -> Self {
        let (width_m, height_m) = placement.bounds.size_meters();
        Renderer {
            colors: ColorResolver::new(document),
            projector: GeoProjector::new(info, &placement.bounds).with_rotation(placement.rotation),
            meters_per_unit: (width_m / info.width + height_m / info.height) / 2.0,
            config,
        }
    }

    fn geometry(&self, entity: &EntityType, transform: &Transform2D) -> Option<(RenderGeometry, StrokeStyle)> {
        match entity {
            EntityType::Line(line) => Some((
                RenderGeometry::Polyline {
                    points: self.project(&[line.start, line.end], transform),
                    closed: false,
                },
                StrokeStyle::OUTLINE,
            )),
            EntityType::Polyline(pl) => {
                let points = pl.sample(self.config.arc_segments);
                if points.len() < 2 {
                    return None;
                }
                let closed = pl.is_closed();
                let style = if closed { StrokeStyle::FILLED } else { StrokeStyle::OUTLINE };
                Some((
                    RenderGeometry::Polyline {
                        points: self.project(&points, transform),
                        closed,
                    },
                    style,
                ))
            }
            EntityType::Circle(circle) => Some((self.circle(circle, transform), StrokeStyle::OUTLINE)),
            EntityType::Text(text) => Some((
                RenderGeometry::Point(self.projector.project(transform.apply(text.insertion_point))),
                StrokeStyle::MARKER,
            )),
            EntityType::Insert(_) | EntityType::Unknown(_) => None,
        }
    }

    fn circle(&self, circle: &Circle, transform: &Transform2D) -> RenderGeometry {
        if circle.is_arc() || !transform.is_uniform() {
            return RenderGeometry::Polyline {
                points: self.project(&circle.sample(self.config.arc_segments), transform),
                closed: !circle.is_arc(),
            };
        }
        RenderGeometry::Circle {
            center: self.projector.project(transform.apply(circle.center)),
            radius_meters: circle.radius.abs() * transform.max_scale() * self.meters_per_unit,
        }
    }

    fn project(&self, points: &[Vector2], transform: &Transform2D) -> Vec<GeoPoint> {
        points
            .iter()
            .map(|p| self.projector.project(transform.apply(*p)))
            .collect()
    }
}

/// Collects the primitives of one top-level entity
struct Emitter<'r, 'a> {
    renderer: &'r Renderer<'a>,
    out: Vec<RenderPrimitive>,
}

impl ExpansionVisitor for Emitter<'_, '_> {
    type Context = Option<InheritContext>;

    fn visit(&mut self, entity: &EntityType, transform: &Transform2D, context: &Self::Context) {
        if let Some((geometry, style)) = self.renderer.geometry(entity, transform) {
            let color = self.renderer.colors.resolve(entity, context.as_ref());
            self.out.push(RenderPrimitive { geometry, color, style });
        }
    }

    fn nest(&mut self, insert: &EntityType, context: &Self::Context) -> Self::Context {
        Some(self.renderer.colors.context_for(insert, context.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityCommon, Insert, Line, Polyline, Text, UnknownEntity};
    use crate::placement::PlacementConfig;
    use crate::render::BoundsResolver;
    use crate::tables::{BlockRecord, Layer};
    use crate::types::{aci_to_rgb, BYBLOCK};

    fn render(doc: &DrawingDocument) -> Vec<RenderPrimitive> {
        let info = BoundsResolver::new(doc).resolve();
        let placement = GeographicPlacement::initial(
            info.width,
            info.height,
            GeoPoint::new(40.0, 22.0),
            &PlacementConfig::default(),
        )
        .unwrap();
        render_document(doc, &info, &placement, &RenderConfig::default())
    }

    fn colored_line(x: f64, color: Option<i16>) -> EntityType {
        let mut line = Line::from_coords(x, 0.0, x + 1.0, 1.0);
        line.common.color = color;
        EntityType::Line(line)
    }

    #[test]
    fn test_line_becomes_open_polyline() {
        let doc = DrawingDocument::new().with_entity(colored_line(0.0, Some(1)));
        let out = render(&doc);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].color, ResolvedColor::from_index(1));
        assert_eq!(out[0].style, StrokeStyle::OUTLINE);
        match &out[0].geometry {
            RenderGeometry::Polyline { points, closed } => {
                assert_eq!(points.len(), 2);
                assert!(!closed);
                assert!(points[0].lat < points[1].lat);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_circle_radius_in_meters() {
        let doc = DrawingDocument::new().with_entity(EntityType::Circle(Circle::from_center(Vector2::ZERO, 5.0)));
        let out = render(&doc);
        match out[0].geometry {
            RenderGeometry::Circle { center, radius_meters } => {
                // 10 units span the default 100 m
                assert!((radius_meters - 50.0).abs() < 1e-6);
                assert!((center.lat - 40.0).abs() < 1e-9);
            }
            ref other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_arc_and_closed_polyline() {
        let doc = DrawingDocument::new()
            .with_entity(EntityType::Circle(Circle::arc(Vector2::ZERO, 1.0, 0.0, 90.0)))
            .with_entity(EntityType::Polyline(Polyline::from_points(
                [Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::new(1.0, 1.0)],
                true,
            )));
        let out = render(&doc);
        assert_eq!(out.len(), 2);
        assert!(matches!(&out[0].geometry, RenderGeometry::Polyline { points, closed: false } if points.len() == 33));
        assert_eq!(out[1].style, StrokeStyle::FILLED);
    }

    #[test]
    fn test_insert_expands_with_inherited_color() {
        let mut insert = Insert::new("FIXTURE", Vector2::new(10.0, 0.0));
        insert.common = EntityCommon::with_layer("FURNITURE").with_color(3);
        let doc = DrawingDocument::new()
            .with_layer(Layer::with_color("FURNITURE", 5))
            .with_block(
                BlockRecord::new("FIXTURE")
                    .with_entity(colored_line(0.0, Some(BYBLOCK)))
                    .with_entity(colored_line(2.0, None)),
            )
            .with_entity(colored_line(0.0, None))
            .with_entity(EntityType::Insert(insert));

        let out = render(&doc);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].color.index, 7);
        assert_eq!(out[1].color.rgb, aci_to_rgb(3));
        // Layer "0" inside the block resolves against the insert's layer
        assert_eq!(out[2].color.index, 5);
    }

    #[test]
    fn test_text_unknown_invisible() {
        let mut hidden = Line::from_coords(0.0, 0.0, 4.0, 4.0);
        hidden.common.invisible = true;
        let doc = DrawingDocument::new()
            .with_entity(EntityType::Line(hidden))
            .with_entity(EntityType::Unknown(UnknownEntity::new("HATCH")))
            .with_entity(EntityType::Text(Text::new("Kitchen", Vector2::new(1.0, 1.0))))
            .with_entity(colored_line(0.0, None));
        let out = render(&doc);
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0].geometry, RenderGeometry::Point(_)));
        assert_eq!(out[0].style, StrokeStyle::MARKER);
    }

    #[test]
    fn test_cyclic_blocks_render_once() {
        let doc = DrawingDocument::new()
            .with_block(
                BlockRecord::new("A")
                    .with_entity(colored_line(0.0, None))
                    .with_entity(EntityType::Insert(Insert::new("B", Vector2::ZERO))),
            )
            .with_block(BlockRecord::new("B").with_entity(EntityType::Insert(Insert::new("A", Vector2::ZERO))))
            .with_entity(EntityType::Insert(Insert::new("A", Vector2::ZERO)));
        assert_eq!(render(&doc).len(), 1);
    }

    #[test]
    fn test_expansion_limit_spans_top_level_entities() {
        let grid = Insert::new("TILE", Vector2::ZERO).with_array(32767, 32767, 1.0, 1.0);
        let doc = DrawingDocument::new()
            .with_block(BlockRecord::new("TILE").with_entity(colored_line(0.0, None)))
            .with_entity(colored_line(-5.0, None))
            .with_entity(EntityType::Insert(grid))
            .with_entity(colored_line(-9.0, None));
        let info = BoundsResolver::new(&doc).with_max_expansion(101).resolve();
        let placement = GeographicPlacement::initial(
            info.width,
            info.height,
            GeoPoint::new(40.0, 22.0),
            &PlacementConfig::default(),
        )
        .unwrap();
        let config = RenderConfig {
            max_expanded_entities: 101,
            ..RenderConfig::default()
        };

        // 1 for the first line, 1 for the insert, then 2 per tile: 49 tiles
        let out = render_document(&doc, &info, &placement, &config);
        assert_eq!(out.len(), 1 + 49);
        assert_eq!(render_document(&doc, &info, &placement, &config), out);
    }
}
