//! Text entity (TEXT and MTEXT)
//!
//! Text is carried for completeness; it contributes no extent and renders
//! as a point marker only.

use super::{Entity, EntityCommon};
use crate::types::Vector2;

/// A text label
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Common entity data
    pub common: EntityCommon,
    /// Text content
    pub value: String,
    /// Insertion point
    pub insertion_point: Vector2,
    /// Text height
    pub height: f64,
    /// Rotation angle in degrees
    pub rotation: f64,
    /// Whether the record was MTEXT
    pub multiline: bool,
}

impl Text {
    pub fn new(value: impl Into<String>, insertion_point: Vector2) -> Self {
        Text {
            common: EntityCommon::new(),
            value: value.into(),
            insertion_point,
            height: 1.0,
            rotation: 0.0,
            multiline: false,
        }
    }
}

impl Entity for Text {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn entity_type(&self) -> &'static str {
        if self.multiline {
            "MTEXT"
        } else {
            "TEXT"
        }
    }
}
