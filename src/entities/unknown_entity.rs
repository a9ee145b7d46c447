//! Entities the decoder does not model.
//!
//! When the reader meets an entity kind outside the supported set (HATCH,
//! DIMENSION, SPLINE, ...) it keeps the common properties and the DXF type
//! name so callers can report what was skipped. Unknown entities carry no
//! geometry and never contribute to bounds or rendering.

use crate::entities::{Entity, EntityCommon};

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownEntity {
    /// Common entity data
    pub common: EntityCommon,
    /// The DXF type name as it appeared in the payload
    pub dxf_name: String,
}

impl UnknownEntity {
    pub fn new(dxf_name: impl Into<String>) -> Self {
        Self {
            common: EntityCommon::new(),
            dxf_name: dxf_name.into(),
        }
    }
}

impl Entity for UnknownEntity {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn entity_type(&self) -> &'static str {
        "UNKNOWN"
    }
}
