//! Core value types shared by the decoder, resolvers, and placement code

pub mod bounds;
pub mod color;
pub mod transform;
pub mod units;
pub mod vector;
pub mod version;

pub use bounds::BoundingBox2D;
pub use color::{aci_to_rgb, Rgb, BYBLOCK, BYLAYER, DEFAULT_COLOR_INDEX};
pub use transform::Transform2D;
pub use units::DrawingUnit;
pub use vector::Vector2;
pub use version::DxfVersion;
