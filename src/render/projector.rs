//! Drawing space to geographic coordinates
//!
//! The mapping is linear per axis: drawing x runs west to east and drawing y
//! runs south to north. There is no vertical flip.

use super::bounds::RenderInfo;
use crate::placement::{meters_per_degree, GeoBounds, GeoPoint};
use crate::types::Vector2;

/// Maps drawing-space points into a geographic rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjector {
    min_x: f64,
    min_y: f64,
    width: f64,
    height: f64,
    south: f64,
    west: f64,
    lat_span: f64,
    lng_span: f64,
    center: GeoPoint,
    rotation: Option<Rotation>,
}

/// Clockwise rotation about the bounds center, in a local metric frame
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rotation {
    sin: f64,
    cos: f64,
    lat_m: f64,
    lng_m: f64,
}

impl GeoProjector {
    pub fn new(info: &RenderInfo, bounds: &GeoBounds) -> Self {
        GeoProjector {
            min_x: info.min_x,
            min_y: info.min_y,
            width: info.max_x - info.min_x,
            height: info.max_y - info.min_y,
            south: bounds.south(),
            west: bounds.west(),
            lat_span: bounds.lat_span(),
            lng_span: bounds.lng_span(),
            center: bounds.center(),
            rotation: None,
        }
    }

    /// Builder: rotate output clockwise by `degrees` about the bounds center
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = if degrees.is_finite() && degrees.rem_euclid(360.0) != 0.0 {
            let (sin, cos) = degrees.to_radians().sin_cos();
            let (lat_m, lng_m) = meters_per_degree(self.center.lat);
            Some(Rotation { sin, cos, lat_m, lng_m })
        } else {
            None
        };
        self
    }

    /// The coordinate returned when a point cannot be normalized
    pub fn fallback(&self) -> GeoPoint {
        self.center
    }

    /// Geographic position of a drawing-space point
    #[inline]
    pub fn project(&self, point: Vector2) -> GeoPoint {
        let nx = (point.x - self.min_x) / self.width;
        let ny = (point.y - self.min_y) / self.height;
        if !nx.is_finite() || !ny.is_finite() {
            return self.center;
        }

        let projected = GeoPoint::new(self.south + ny * self.lat_span, self.west + nx * self.lng_span);
        match self.rotation {
            Some(rotation) => self.rotate(projected, rotation),
            None => projected,
        }
    }

    /// Project a sequence of points
    pub fn project_all(&self, points: &[Vector2]) -> Vec<GeoPoint> {
        points.iter().map(|p| self.project(*p)).collect()
    }

    /// Drawing-space position of a geographic point, ignoring rotation
    pub fn unproject(&self, point: GeoPoint) -> Vector2 {
        let nx = (point.lng - self.west) / self.lng_span;
        let ny = (point.lat - self.south) / self.lat_span;
        Vector2::new(self.min_x + nx * self.width, self.min_y + ny * self.height)
    }

    fn rotate(&self, point: GeoPoint, r: Rotation) -> GeoPoint {
        let dx = (point.lng - self.center.lng) * r.lng_m;
        let dy = (point.lat - self.center.lat) * r.lat_m;
        let x = dx * r.cos + dy * r.sin;
        let y = dy * r.cos - dx * r.sin;
        GeoPoint::new(self.center.lat + y / r.lat_m, self.center.lng + x / r.lng_m)
    }
}
