//! Geographic placement of a plan and its interactive editing

pub mod controller;
pub mod geo;
pub mod session;
pub mod store;

pub use controller::{EditState, PlacementController};
pub use geo::{meters_per_degree, GeoBounds, GeoPoint, GeographicPlacement, PlacementConfig};
pub use session::{Confirmation, PlacementSession, ScaleOutcome};
pub use store::{InMemoryPlacementStore, ItemId, PlacementStore};
