//! Polyline entity (LWPOLYLINE and POLYLINE/VERTEX/SEQEND)

use super::{Entity, EntityCommon};
use crate::types::Vector2;

bitflags::bitflags! {
    /// Polyline flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PolylineFlags: i16 {
        /// Last vertex connects back to the first
        const CLOSED = 1;
        /// Curve-fit vertices added
        const CURVE_FIT = 2;
        /// Spline-fit vertices added
        const SPLINE_FIT = 4;
        /// 3D polyline
        const POLYLINE_3D = 8;
        /// 3D polygon mesh
        const POLYGON_MESH = 16;
        /// Polyface mesh
        const POLYFACE_MESH = 64;
        /// Linetype pattern continuous around vertices
        const CONTINUOUS_LINETYPE = 128;
    }
}

/// A polyline vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineVertex {
    /// Location of the vertex
    pub location: Vector2,
    /// Bulge of the segment starting here.
    /// 0 = straight, positive = counter-clockwise arc, `tan(angle / 4)`
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(location: Vector2) -> Self {
        PolylineVertex {
            location,
            bulge: 0.0,
        }
    }

    pub fn with_bulge(location: Vector2, bulge: f64) -> Self {
        PolylineVertex { location, bulge }
    }
}

/// A 2D polyline
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Common entity data
    pub common: EntityCommon,
    /// Vertices in drawing order
    pub vertices: Vec<PolylineVertex>,
    /// Polyline flags
    pub flags: PolylineFlags,
}

impl Polyline {
    /// Create an empty open polyline
    pub fn new() -> Self {
        Polyline {
            common: EntityCommon::new(),
            vertices: Vec::new(),
            flags: PolylineFlags::empty(),
        }
    }

    /// Create a polyline through straight-segment points
    pub fn from_points(points: impl IntoIterator<Item = Vector2>, closed: bool) -> Self {
        let mut polyline = Polyline::new();
        polyline.vertices = points.into_iter().map(PolylineVertex::new).collect();
        polyline.flags.set(PolylineFlags::CLOSED, closed);
        polyline
    }

    pub fn is_closed(&self) -> bool {
        self.flags.contains(PolylineFlags::CLOSED)
    }

    /// Expand the polyline into a point path, tessellating bulged segments
    /// with `arc_segments` steps per half turn.
    ///
    /// The closing segment of a closed polyline is included (its bulge
    /// sits on the last vertex) but the first point is not repeated.
    pub fn sample(&self, arc_segments: usize) -> Vec<Vector2> {
        let n = self.vertices.len();
        let mut points = Vec::with_capacity(n);
        for (i, vertex) in self.vertices.iter().enumerate() {
            points.push(vertex.location);
            let next = if i + 1 < n {
                self.vertices[i + 1].location
            } else if self.is_closed() && n > 1 {
                self.vertices[0].location
            } else {
                break;
            };
            if vertex.bulge.abs() > 1e-12 {
                bulge_points(vertex.location, next, vertex.bulge, arc_segments, &mut points);
            }
        }
        points
    }
}

impl Default for Polyline {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Polyline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn entity_type(&self) -> &'static str {
        "LWPOLYLINE"
    }
}

/// Push the interior points of a bulged segment (endpoints excluded)
fn bulge_points(from: Vector2, to: Vector2, bulge: f64, arc_segments: usize, out: &mut Vec<Vector2>) {
    let chord = to - from;
    let length = chord.length();
    if length == 0.0 {
        return;
    }
    let theta = 4.0 * bulge.atan();
    let radius = length / (2.0 * (theta / 2.0).sin());
    let normal = Vector2::new(-chord.y, chord.x) / length;
    let center = (from + to) / 2.0 + normal * (radius * (theta / 2.0).cos());
    let start = (from.y - center.y).atan2(from.x - center.x);
    let steps = ((theta.abs() / std::f64::consts::PI) * arc_segments.max(2) as f64).ceil() as usize;
    let steps = steps.max(2);
    let r = radius.abs();
    for i in 1..steps {
        let angle = start + theta * i as f64 / steps as f64;
        out.push(center + Vector2::new(angle.cos(), angle.sin()) * r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_flag() {
        let square = Polyline::from_points(
            [
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(1.0, 1.0),
                Vector2::new(0.0, 1.0),
            ],
            true,
        );
        assert!(square.is_closed());
        assert_eq!(square.sample(8).len(), 4);
    }

    #[test]
    fn test_semicircle_bulge_passes_below_chord() {
        let mut polyline = Polyline::new();
        polyline.vertices.push(PolylineVertex::with_bulge(Vector2::new(0.0, 0.0), 1.0));
        polyline.vertices.push(PolylineVertex::new(Vector2::new(2.0, 0.0)));
        let pts = polyline.sample(4);
        assert_eq!(pts.first(), Some(&Vector2::new(0.0, 0.0)));
        assert_eq!(pts.last(), Some(&Vector2::new(2.0, 0.0)));
        // every interior point is on the unit circle around (1, 0), below the chord
        for p in &pts[1..pts.len() - 1] {
            assert!(((p.x - 1.0).hypot(p.y) - 1.0).abs() < 1e-9);
            assert!(p.y < 0.0);
        }
        assert!(pts.iter().any(|p| (p.x - 1.0).abs() < 1e-9 && (p.y + 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_flags_from_bits() {
        let flags = PolylineFlags::from_bits_truncate(129);
        assert!(flags.contains(PolylineFlags::CLOSED));
        assert!(flags.contains(PolylineFlags::CONTINUOUS_LINETYPE));
    }
}
