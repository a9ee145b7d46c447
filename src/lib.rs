//! # floorplan-anchor
//!
//! Decode DXF floor plans and anchor them to a place on a map.
//!
//! The pipeline runs leaves first:
//!
//! - [`io::dxf::DxfReader`] decodes an ASCII or binary DXF payload into a
//!   [`DrawingDocument`] of entities, block definitions, and layers.
//! - [`render::BoundsResolver`] measures the drawing, expanding block
//!   inserts, and yields a never-degenerate [`render::RenderInfo`].
//! - [`render::ColorResolver`] resolves each entity's display color through
//!   BYBLOCK / BYLAYER inheritance.
//! - [`render::GeoProjector`] maps drawing coordinates into the plan's
//!   geographic rectangle.
//! - [`placement::PlacementController`] edits that rectangle through a draft
//!   session that only becomes visible on commit.
//!
//! [`plan::FloorPlan`] ties these together for one attached payload.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use floorplan_anchor::{FloorPlan, PlanPayload, DecodeCache, GeoPoint, ItemId};
//! use floorplan_anchor::placement::PlacementConfig;
//! use floorplan_anchor::render::RenderConfig;
//!
//! let cache = DecodeCache::new();
//! let payload = PlanPayload::vector(std::fs::read("level-1.dxf")?);
//! let mut plan = FloorPlan::attach(
//!     ItemId::from("level-1"),
//!     &payload,
//!     GeoPoint::new(40.6401, 22.9444),
//!     &cache,
//!     &PlacementConfig::default(),
//! )?;
//!
//! let primitives = plan.render(&RenderConfig::default());
//! ```

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod document;
pub mod entities;
pub mod error;
pub mod io;
pub mod notification;
pub mod placement;
pub mod plan;
pub mod render;
pub mod tables;
pub mod types;

// Re-export commonly used types
pub use error::{DxfError, PlacementError, Result, StoreError};
pub use types::{BoundingBox2D, DrawingUnit, DxfVersion, Rgb, Transform2D, Vector2};

// Re-export entity types
pub use entities::{Circle, Entity, EntityType, Insert, Line, Polyline, Text, UnknownEntity};

// Re-export table types
pub use tables::{BlockRecord, Layer, Table};

// Re-export document
pub use document::{DrawingDocument, DrawingHeader};

// Re-export I/O types
pub use io::{DecodeCache, DxfReader, DxfReaderConfiguration};

// Re-export the placement and render surface
pub use placement::{GeoBounds, GeoPoint, GeographicPlacement, ItemId, PlacementController};
pub use plan::{FloorPlan, PayloadKind, PlanPayload, PlanSource};
pub use render::{render_document, RenderInfo, RenderPrimitive};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_document_creation() {
        let doc = DrawingDocument::new();
        assert!(doc.entities().is_empty());
        assert_eq!(doc.header.insertion_units, DrawingUnit::Unitless);
    }
}
