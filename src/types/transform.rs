//! 2D affine transforms for block expansion
//!
//! A block instance places its block's geometry with base-point removal,
//! scale, rotation, and translation. Nested instances compose their
//! transforms, outermost last.

use crate::types::Vector2;
use std::ops::Mul;

/// Affine transform `p' = M * p + t`, stored as a 2x3 row-major matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub m: [[f64; 3]; 2],
}

impl Transform2D {
    /// Create identity transform
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        }
    }

    /// Create translation
    pub const fn translation(offset: Vector2) -> Self {
        Self {
            m: [[1.0, 0.0, offset.x], [0.0, 1.0, offset.y]],
        }
    }

    /// Create counter-clockwise rotation about the origin, in degrees
    pub fn rotation_degrees(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self {
            m: [[cos, -sin, 0.0], [sin, cos, 0.0]],
        }
    }

    /// Create scaling about the origin
    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            m: [[sx, 0.0, 0.0], [0.0, sy, 0.0]],
        }
    }

    /// Transform that places block geometry for one insert instance:
    /// `insert_point + R(rotation) * S(sx, sy) * (p - base_point)`
    pub fn for_insert(
        base_point: Vector2,
        insert_point: Vector2,
        x_scale: f64,
        y_scale: f64,
        rotation_degrees: f64,
    ) -> Self {
        Self::translation(insert_point)
            * Self::rotation_degrees(rotation_degrees)
            * Self::scaling(x_scale, y_scale)
            * Self::translation(-base_point)
    }

    /// Transform a point
    pub fn apply(&self, p: Vector2) -> Vector2 {
        Vector2::new(
            self.m[0][0] * p.x + self.m[0][1] * p.y + self.m[0][2],
            self.m[1][0] * p.x + self.m[1][1] * p.y + self.m[1][2],
        )
    }

    /// Half-extent along x and y of the image of a unit circle.
    ///
    /// A circle of radius `r` maps to an ellipse that fits in
    /// `center ± r * axis_extents()`, shear included.
    pub fn axis_extents(&self) -> Vector2 {
        Vector2::new(self.m[0][0].hypot(self.m[0][1]), self.m[1][0].hypot(self.m[1][1]))
    }

    /// Stretch of the longer transformed axis.
    ///
    /// The radius scale for uniform transforms. Not a bound on extent under
    /// shear; use [`axis_extents`](Self::axis_extents) for that.
    pub fn max_scale(&self) -> f64 {
        let sx = self.m[0][0].hypot(self.m[1][0]);
        let sy = self.m[0][1].hypot(self.m[1][1]);
        sx.max(sy)
    }

    /// Whether circles stay circles: equal axis stretch and no shear
    pub fn is_uniform(&self) -> bool {
        let sx = self.m[0][0].hypot(self.m[1][0]);
        let sy = self.m[0][1].hypot(self.m[1][1]);
        let shear = self.m[0][0] * self.m[0][1] + self.m[1][0] * self.m[1][1];
        let tolerance = 1e-9 * sx.max(sy).max(1.0);
        (sx - sy).abs() <= tolerance && shear.abs() <= tolerance
    }

    /// Rotation of the transformed X axis, in degrees
    pub fn rotation(&self) -> f64 {
        self.m[1][0].atan2(self.m[0][0]).to_degrees()
    }

    /// Whether the transform mirrors geometry (negative determinant)
    pub fn is_mirrored(&self) -> bool {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0] < 0.0
    }
}

impl Mul for Transform2D {
    type Output = Self;

    /// `a * b` applies `b` first, then `a`.
    fn mul(self, rhs: Self) -> Self::Output {
        let a = &self.m;
        let b = &rhs.m;
        Self {
            m: [
                [
                    a[0][0] * b[0][0] + a[0][1] * b[1][0],
                    a[0][0] * b[0][1] + a[0][1] * b[1][1],
                    a[0][0] * b[0][2] + a[0][1] * b[1][2] + a[0][2],
                ],
                [
                    a[1][0] * b[0][0] + a[1][1] * b[1][0],
                    a[1][0] * b[0][1] + a[1][1] * b[1][1],
                    a[1][0] * b[0][2] + a[1][1] * b[1][2] + a[1][2],
                ],
            ],
        }
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}
