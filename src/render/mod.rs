//! Bounds, color, and projection passes over a decoded document

pub mod bounds;
pub mod color;
mod expand;
pub mod output;
pub mod projector;

pub use bounds::{BoundsResolver, RenderInfo, DEFAULT_MAX_BLOCK_DEPTH, DEFAULT_MAX_EXPANDED_ENTITIES};
pub use color::{ColorResolver, InheritContext, ResolvedColor};
pub use expand::ExpansionBudget;
pub use output::{render_document, RenderConfig, RenderGeometry, RenderPrimitive, StrokeStyle};
pub use projector::GeoProjector;
