//! Circle and arc entities
//!
//! DXF has separate CIRCLE and ARC records; both decode to [`Circle`], with
//! arcs carrying their sweep in [`ArcAngles`].

use super::{Entity, EntityCommon};
use crate::types::Vector2;

/// Sweep of an arc, counter-clockwise from `start` to `end`, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcAngles {
    pub start: f64,
    pub end: f64,
}

impl ArcAngles {
    /// Counter-clockwise sweep in degrees, in (0, 360]
    pub fn sweep(&self) -> f64 {
        let sweep = (self.end - self.start).rem_euclid(360.0);
        if sweep == 0.0 {
            360.0
        } else {
            sweep
        }
    }
}

/// A circle, or an arc when `arc` is set
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Common entity data
    pub common: EntityCommon,
    /// Center point
    pub center: Vector2,
    /// Radius
    pub radius: f64,
    /// Arc sweep; `None` for a full circle
    pub arc: Option<ArcAngles>,
}

impl Circle {
    /// Create a unit circle at the origin
    pub fn new() -> Self {
        Circle {
            common: EntityCommon::new(),
            center: Vector2::ZERO,
            radius: 1.0,
            arc: None,
        }
    }

    /// Create a full circle
    pub fn from_center(center: Vector2, radius: f64) -> Self {
        Circle {
            center,
            radius,
            ..Self::new()
        }
    }

    /// Create an arc from angles in degrees
    pub fn arc(center: Vector2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Circle {
            center,
            radius,
            arc: Some(ArcAngles {
                start: start_angle,
                end: end_angle,
            }),
            ..Self::new()
        }
    }

    pub fn is_arc(&self) -> bool {
        self.arc.is_some()
    }

    /// Sample `segments + 1` points along the arc (or `segments` around a
    /// full circle, without repeating the first point)
    pub fn sample(&self, segments: usize) -> Vec<Vector2> {
        let segments = segments.max(4);
        let (start, sweep, count) = match self.arc {
            Some(angles) => (angles.start, angles.sweep(), segments + 1),
            None => (0.0, 360.0, segments),
        };
        (0..count)
            .map(|i| {
                let angle = (start + sweep * i as f64 / segments as f64).to_radians();
                self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius
            })
            .collect()
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Circle {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn entity_type(&self) -> &'static str {
        if self.is_arc() {
            "ARC"
        } else {
            "CIRCLE"
        }
    }
}
