//! Insert entity (block reference)

use crate::entities::{Entity, EntityCommon};
use crate::types::{Transform2D, Vector2};

/// Insert entity - a reference to a block definition
///
/// An Insert places an instance of a block at a specified location with
/// optional scaling, rotation, and rectangular array.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub common: EntityCommon,
    /// Block name (references a BlockRecord)
    pub block_name: String,
    /// Insertion point
    pub insert_point: Vector2,
    /// X scale factor
    pub x_scale: f64,
    /// Y scale factor
    pub y_scale: f64,
    /// Rotation angle in degrees, as stored in DXF
    pub rotation: f64,
    /// Column count (for array inserts)
    pub column_count: u16,
    /// Row count (for array inserts)
    pub row_count: u16,
    /// Column spacing (for array inserts)
    pub column_spacing: f64,
    /// Row spacing (for array inserts)
    pub row_spacing: f64,
}

impl Insert {
    /// Create a new insert entity
    pub fn new(block_name: impl Into<String>, insert_point: Vector2) -> Self {
        Self {
            common: EntityCommon::default(),
            block_name: block_name.into(),
            insert_point,
            x_scale: 1.0,
            y_scale: 1.0,
            rotation: 0.0,
            column_count: 1,
            row_count: 1,
            column_spacing: 0.0,
            row_spacing: 0.0,
        }
    }

    /// Builder: Set the scale factors
    pub fn with_scale(mut self, x: f64, y: f64) -> Self {
        self.x_scale = x;
        self.y_scale = y;
        self
    }

    /// Builder: Set the rotation angle in degrees
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Builder: Set array properties
    pub fn with_array(mut self, columns: u16, rows: u16, col_spacing: f64, row_spacing: f64) -> Self {
        self.column_count = columns.max(1);
        self.row_count = rows.max(1);
        self.column_spacing = col_spacing;
        self.row_spacing = row_spacing;
        self
    }

    /// Check if this is an array insert
    pub fn is_array(&self) -> bool {
        self.column_count > 1 || self.row_count > 1
    }

    /// Get the total number of instances in the array
    pub fn instance_count(&self) -> usize {
        (self.column_count as usize) * (self.row_count as usize)
    }

    /// Insertion point of every array instance, row by row.
    ///
    /// Lazy: a 32767 x 32767 array is never materialized.
    pub fn array_points(&self) -> impl Iterator<Item = Vector2> + '_ {
        let angle = self.rotation.to_radians();
        (0..self.row_count).flat_map(move |row| {
            (0..self.column_count).map(move |col| {
                let offset = Vector2::new(col as f64 * self.column_spacing, row as f64 * self.row_spacing);
                self.insert_point + offset.rotated(angle)
            })
        })
    }

    /// Placement transform of every array instance, for a block whose base
    /// point is `base_point`
    pub fn instance_transforms(&self, base_point: Vector2) -> impl Iterator<Item = Transform2D> + '_ {
        self.array_points()
            .map(move |origin| Transform2D::for_insert(base_point, origin, self.x_scale, self.y_scale, self.rotation))
    }
}

impl Entity for Insert {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn entity_type(&self) -> &'static str {
        "INSERT"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_instance() {
        let insert = Insert::new("DOOR", Vector2::new(5.0, 5.0));
        assert!(!insert.is_array());
        assert_eq!(insert.array_points().collect::<Vec<_>>(), vec![Vector2::new(5.0, 5.0)]);
    }

    #[test]
    fn test_array_points() {
        let insert = Insert::new("DESK", Vector2::ZERO).with_array(3, 2, 10.0, 5.0);
        assert_eq!(insert.instance_count(), 6);
        let pts: Vec<_> = insert.array_points().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[2], Vector2::new(20.0, 0.0));
        assert_eq!(pts[5], Vector2::new(20.0, 5.0));
    }

    #[test]
    fn test_instance_transform_translates() {
        let insert = Insert::new("B", Vector2::new(3.0, -2.0));
        let transforms: Vec<_> = insert.instance_transforms(Vector2::ZERO).collect();
        assert_eq!(transforms.len(), 1);
        assert_eq!(transforms[0].apply(Vector2::new(1.0, 1.0)), Vector2::new(4.0, -1.0));
    }

    #[test]
    fn test_huge_array_is_lazy() {
        let insert = Insert::new("GRID", Vector2::ZERO).with_array(32767, 32767, 1.0, 1.0);
        assert_eq!(insert.instance_count(), 32767 * 32767);
        let third = insert.instance_transforms(Vector2::ZERO).nth(2).unwrap();
        assert_eq!(third.apply(Vector2::ZERO), Vector2::new(2.0, 0.0));
        // Second row starts after one full row of columns
        assert_eq!(insert.array_points().nth(32767), Some(Vector2::new(0.0, 1.0)));
    }
}
