//! Drawing units declared by `$INSUNITS`

/// Unit of one drawing-space coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawingUnit {
    /// No unit declared
    #[default]
    Unitless,
    Inches,
    Feet,
    Millimeters,
    Centimeters,
    Meters,
}

impl DrawingUnit {
    /// Map an `$INSUNITS` value; unsupported codes are treated as unitless
    pub fn from_insunits(code: i16) -> Self {
        match code {
            1 => DrawingUnit::Inches,
            2 => DrawingUnit::Feet,
            4 => DrawingUnit::Millimeters,
            5 => DrawingUnit::Centimeters,
            6 => DrawingUnit::Meters,
            _ => DrawingUnit::Unitless,
        }
    }

    /// Real-world meters represented by one drawing unit, if known
    pub fn meters_per_unit(&self) -> Option<f64> {
        match self {
            DrawingUnit::Unitless => None,
            DrawingUnit::Inches => Some(0.0254),
            DrawingUnit::Feet => Some(0.3048),
            DrawingUnit::Millimeters => Some(0.001),
            DrawingUnit::Centimeters => Some(0.01),
            DrawingUnit::Meters => Some(1.0),
        }
    }
}
