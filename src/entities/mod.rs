//! Drawing entities
//!
//! The decoder maps every DXF entity record into one variant of
//! [`EntityType`] at the parser boundary. Downstream code (bounds, color,
//! rendering) matches the variants exhaustively instead of probing optional
//! fields.

use crate::types::Rgb;

pub mod circle;
pub mod insert;
pub mod line;
pub mod polyline;
pub mod text;
pub mod unknown_entity;

pub use circle::{ArcAngles, Circle};
pub use insert::Insert;
pub use line::Line;
pub use polyline::{Polyline, PolylineFlags, PolylineVertex};
pub use text::Text;
pub use unknown_entity::UnknownEntity;

/// Base trait for all drawing entities
pub trait Entity {
    /// Get the shared entity data
    fn common(&self) -> &EntityCommon;

    /// Get the entity type name as it appears in DXF
    fn entity_type(&self) -> &'static str;

    /// Get the entity's layer name
    fn layer(&self) -> &str {
        &self.common().layer
    }

    /// Get the explicit color index, if the record carried one
    fn color_index(&self) -> Option<i16> {
        self.common().color
    }

    /// Check if the entity is invisible (group code 60)
    fn is_invisible(&self) -> bool {
        self.common().invisible
    }
}

/// Common entity data shared by all entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Layer name
    pub layer: String,
    /// Explicit color index (group code 62); `None` when absent
    pub color: Option<i16>,
    /// True color (group code 420)
    pub true_color: Option<Rgb>,
    /// Visibility flag
    pub invisible: bool,
}

impl EntityCommon {
    /// Create new common entity data with defaults
    pub fn new() -> Self {
        EntityCommon {
            layer: "0".to_string(),
            color: None,
            true_color: None,
            invisible: false,
        }
    }

    /// Create with a specific layer
    pub fn with_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }

    /// Builder: set the explicit color index
    pub fn with_color(mut self, index: i16) -> Self {
        self.color = Some(index);
        self
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Tagged union of every entity kind the decoder produces
#[derive(Debug, Clone, PartialEq)]
pub enum EntityType {
    /// LINE
    Line(Line),
    /// LWPOLYLINE and POLYLINE
    Polyline(Polyline),
    /// CIRCLE and ARC
    Circle(Circle),
    /// INSERT (block instance)
    Insert(Insert),
    /// TEXT and MTEXT
    Text(Text),
    /// Anything else; carries no geometry
    Unknown(UnknownEntity),
}

impl EntityType {
    /// Get a reference to the entity trait object
    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            EntityType::Line(e) => e,
            EntityType::Polyline(e) => e,
            EntityType::Circle(e) => e,
            EntityType::Insert(e) => e,
            EntityType::Text(e) => e,
            EntityType::Unknown(e) => e,
        }
    }

    pub fn common(&self) -> &EntityCommon {
        self.as_entity().common()
    }

    /// Block name referenced by this entity, if it is an insert
    pub fn referenced_block(&self) -> Option<&str> {
        match self {
            EntityType::Insert(insert) => Some(&insert.block_name),
            _ => None,
        }
    }
}
