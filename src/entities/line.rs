//! Line entity

use super::{Entity, EntityCommon};
use crate::types::Vector2;

/// A line entity defined by two endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Common entity data
    pub common: EntityCommon,
    /// Start point of the line
    pub start: Vector2,
    /// End point of the line
    pub end: Vector2,
}

impl Line {
    /// Create a new line from origin to origin
    pub fn new() -> Self {
        Line {
            common: EntityCommon::new(),
            start: Vector2::ZERO,
            end: Vector2::ZERO,
        }
    }

    /// Create a new line between two points
    pub fn from_points(start: Vector2, end: Vector2) -> Self {
        Line {
            start,
            end,
            ..Self::new()
        }
    }

    /// Create a new line from coordinates
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Line::from_points(Vector2::new(x1, y1), Vector2::new(x2, y2))
    }

    /// Get the length of the line
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Get the midpoint of the line
    pub fn midpoint(&self) -> Vector2 {
        (self.start + self.end) / 2.0
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Line {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn entity_type(&self) -> &'static str {
        "LINE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_creation() {
        let line = Line::new();
        assert_eq!(line.start, Vector2::ZERO);
        assert_eq!(line.end, Vector2::ZERO);
        assert_eq!(line.entity_type(), "LINE");
    }

    #[test]
    fn test_line_length() {
        let line = Line::from_coords(0.0, 0.0, 3.0, 4.0);
        assert_eq!(line.length(), 5.0);
    }

    #[test]
    fn test_line_midpoint() {
        let line = Line::from_coords(0.0, 0.0, 10.0, 5.0);
        assert_eq!(line.midpoint(), Vector2::new(5.0, 2.5));
    }
}
