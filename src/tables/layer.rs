//! Layer table entry

use super::TableEntry;
use crate::types::{Rgb, DEFAULT_COLOR_INDEX};

bitflags::bitflags! {
    /// Layer flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerFlags: i16 {
        /// Layer is frozen
        const FROZEN = 1;
        /// Layer is frozen by default in new viewports
        const FROZEN_IN_NEW_VIEWPORTS = 2;
        /// Layer is locked
        const LOCKED = 4;
        /// Layer depends on an external reference
        const XREF_DEPENDENT = 16;
    }
}

/// A layer table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer name
    pub name: String,
    /// Default color index; negative when the layer is switched off
    pub color: i16,
    /// True color (group code 420)
    pub true_color: Option<Rgb>,
    /// Layer flags
    pub flags: LayerFlags,
}

impl Layer {
    /// Create a new layer with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            name: name.into(),
            color: DEFAULT_COLOR_INDEX,
            true_color: None,
            flags: LayerFlags::empty(),
        }
    }

    /// Create a layer with a specific color index
    pub fn with_color(name: impl Into<String>, color: i16) -> Self {
        Layer {
            color,
            ..Self::new(name)
        }
    }

    /// A negative color index marks the layer as off
    pub fn is_off(&self) -> bool {
        self.color < 0
    }

    pub fn is_frozen(&self) -> bool {
        self.flags.contains(LayerFlags::FROZEN)
    }
}

impl TableEntry for Layer {
    fn name(&self) -> &str {
        &self.name
    }
}
