//! A floor plan attached to an item: its payload, decoded geometry, and
//! placement.
//!
//! Vector payloads go through the decode cache and the bounds pass once at
//! attach time. Raster payloads are opaque rectangles sized by their pixel
//! dimensions; the map surface draws them itself inside the placement
//! bounds. A payload that fails to decode produces an invalid plan that
//! renders nothing.

use crate::document::DrawingDocument;
use crate::error::PlacementError;
use crate::io::DecodeCache;
use crate::placement::{GeoPoint, GeographicPlacement, ItemId, PlacementConfig, PlacementController};
use crate::render::{render_document, BoundsResolver, RenderConfig, RenderInfo, RenderPrimitive};
use crate::types::DrawingUnit;
use std::sync::Arc;

/// What the upload component says the bytes are
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    VectorDrawing,
    RasterImage { width_px: u32, height_px: u32 },
}

/// Raw plan bytes plus their type tag
#[derive(Debug, Clone)]
pub struct PlanPayload {
    pub kind: PayloadKind,
    pub bytes: Vec<u8>,
}

impl PlanPayload {
    pub fn vector(bytes: impl Into<Vec<u8>>) -> Self {
        PlanPayload {
            kind: PayloadKind::VectorDrawing,
            bytes: bytes.into(),
        }
    }

    pub fn raster(width_px: u32, height_px: u32, bytes: impl Into<Vec<u8>>) -> Self {
        PlanPayload {
            kind: PayloadKind::RasterImage { width_px, height_px },
            bytes: bytes.into(),
        }
    }
}

/// Where a plan's geometry comes from
#[derive(Debug, Clone)]
pub enum PlanSource {
    /// A decoded drawing and its extent
    Vector {
        document: Arc<DrawingDocument>,
        info: RenderInfo,
    },
    /// An image placed as an opaque rectangle
    Raster { width_px: u32, height_px: u32 },
    /// The payload could not be used
    Invalid { reason: String },
}

/// A plan attached to one item
#[derive(Debug, Clone)]
pub struct FloorPlan {
    id: ItemId,
    source: PlanSource,
    controller: Option<PlacementController>,
}

impl FloorPlan {
    /// Attach a payload with a default placement centered on `center`
    pub fn attach(
        id: ItemId,
        payload: &PlanPayload,
        center: GeoPoint,
        cache: &DecodeCache,
        config: &PlacementConfig,
    ) -> Result<Self, PlacementError> {
        let source = Self::load_source(payload, cache);
        let controller = match Self::intrinsic_size(&source) {
            Some((width, height)) => {
                let placement = GeographicPlacement::initial(width, height, center, config)?;
                Some(PlacementController::new(id.clone(), placement))
            }
            None => None,
        };
        tracing::debug!(item = %id, valid = controller.is_some(), "plan attached");
        Ok(FloorPlan { id, source, controller })
    }

    /// Re-open a plan with a previously committed placement
    pub fn restore(id: ItemId, payload: &PlanPayload, placement: GeographicPlacement, cache: &DecodeCache) -> Self {
        let source = Self::load_source(payload, cache);
        let controller = match source {
            PlanSource::Invalid { .. } => None,
            _ => Some(PlacementController::new(id.clone(), placement)),
        };
        FloorPlan { id, source, controller }
    }

    fn load_source(payload: &PlanPayload, cache: &DecodeCache) -> PlanSource {
        match payload.kind {
            PayloadKind::VectorDrawing => match cache.get_or_decode(&payload.bytes) {
                Ok(document) => {
                    let info = BoundsResolver::new(&document).resolve();
                    PlanSource::Vector { document, info }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "plan payload rejected");
                    PlanSource::Invalid { reason: e.to_string() }
                }
            },
            PayloadKind::RasterImage { width_px, height_px } if width_px > 0 && height_px > 0 => {
                PlanSource::Raster { width_px, height_px }
            }
            PayloadKind::RasterImage { width_px, height_px } => PlanSource::Invalid {
                reason: format!("raster image has no area ({width_px}x{height_px})"),
            },
        }
    }

    fn intrinsic_size(source: &PlanSource) -> Option<(f64, f64)> {
        match source {
            PlanSource::Vector { info, .. } => Some((info.width, info.height)),
            PlanSource::Raster { width_px, height_px } => Some((f64::from(*width_px), f64::from(*height_px))),
            PlanSource::Invalid { .. } => None,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn source(&self) -> &PlanSource {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self.source, PlanSource::Invalid { .. })
    }

    /// The decoded drawing, for vector plans
    pub fn document(&self) -> Option<&Arc<DrawingDocument>> {
        match &self.source {
            PlanSource::Vector { document, .. } => Some(document),
            _ => None,
        }
    }

    pub fn render_info(&self) -> Option<&RenderInfo> {
        match &self.source {
            PlanSource::Vector { info, .. } => Some(info),
            _ => None,
        }
    }

    /// Placement editing; `None` for invalid plans
    pub fn controller(&self) -> Option<&PlacementController> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut PlacementController> {
        self.controller.as_mut()
    }

    /// Unit declared by the drawing, when it declares one
    pub fn suggested_unit(&self) -> Option<DrawingUnit> {
        self.document()
            .map(|doc| doc.header.insertion_units)
            .filter(|unit| *unit != DrawingUnit::Unitless)
    }

    /// Geometry placed at the committed placement
    pub fn render(&self, config: &RenderConfig) -> Vec<RenderPrimitive> {
        match &self.controller {
            Some(controller) => self.render_at(controller.placement(), config),
            None => Vec::new(),
        }
    }

    /// Geometry placed at the draft, while a session is open
    pub fn render_draft(&self, config: &RenderConfig) -> Option<Vec<RenderPrimitive>> {
        let draft = self.controller.as_ref()?.draft()?;
        Some(self.render_at(draft, config))
    }

    fn render_at(&self, placement: &GeographicPlacement, config: &RenderConfig) -> Vec<RenderPrimitive> {
        match &self.source {
            PlanSource::Vector { document, info } => render_document(document, info, placement, config),
            PlanSource::Raster { .. } | PlanSource::Invalid { .. } => Vec::new(),
        }
    }
}
