//! Persistence boundary for committed placements

use super::geo::GeographicPlacement;
use crate::error::StoreError;
use indexmap::IndexMap;
use std::fmt;

/// Identity of the item (listing layer) a plan belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where committed placements are written
pub trait PlacementStore {
    /// Persist the placement of one item, replacing any previous record
    fn save(&mut self, item: &ItemId, placement: &GeographicPlacement) -> Result<(), StoreError>;

    /// Load the last committed placement of an item
    fn load(&self, item: &ItemId) -> Option<GeographicPlacement>;
}

/// Process-local store, used by tests and the diagnostic binary
#[derive(Debug, Default)]
pub struct InMemoryPlacementStore {
    records: IndexMap<ItemId, GeographicPlacement>,
    writes: usize,
}

impl InMemoryPlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PlacementStore for InMemoryPlacementStore {
    fn save(&mut self, item: &ItemId, placement: &GeographicPlacement) -> Result<(), StoreError> {
        self.records.insert(item.clone(), *placement);
        self.writes += 1;
        Ok(())
    }

    fn load(&self, item: &ItemId) -> Option<GeographicPlacement> {
        self.records.get(item).copied()
    }
}
