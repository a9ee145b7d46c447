//! Decoded drawing document

use crate::entities::EntityType;
use crate::notification::NotificationCollection;
use crate::tables::{BlockRecord, Layer, Table};
use crate::types::{BoundingBox2D, DrawingUnit, DxfVersion};
use ahash::{AHashMap, AHashSet};

/// Default cap on entity visits in one full expansion of a drawing.
///
/// Counts every entity and every insert instance reached through block
/// expansion, so array inserts and repeatedly nested blocks are bounded
/// together.
pub const DEFAULT_MAX_EXPANDED_ENTITIES: usize = 2_000_000;

/// Header variables the placement pipeline cares about
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingHeader {
    /// `$ACADVER`
    pub version: DxfVersion,
    /// `$DWGCODEPAGE`
    pub code_page: Option<String>,
    /// `$INSUNITS`
    pub insertion_units: DrawingUnit,
    /// `$EXTMIN` / `$EXTMAX` as written by the authoring tool.
    ///
    /// Often stale; bounds are always recomputed from geometry.
    pub declared_extents: Option<BoundingBox2D>,
}

/// A decoded drawing: top-level entities, block definitions, and layers.
///
/// Built once by [`DxfReader`](crate::io::dxf::DxfReader) and shared
/// read-only afterwards (typically behind an `Arc`); bounds, color, and
/// render passes all borrow it without re-parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingDocument {
    /// Header variables
    pub header: DrawingHeader,

    /// Layer table
    pub layers: Table<Layer>,

    /// Block definitions by name
    pub blocks: Table<BlockRecord>,

    /// Notifications collected while decoding
    pub notifications: NotificationCollection,

    /// Top-level (model space) entities in drawing order
    entities: Vec<EntityType>,
}

impl DrawingDocument {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top-level entity
    pub fn add_entity(&mut self, entity: EntityType) {
        self.entities.push(entity);
    }

    /// Builder: append a top-level entity
    pub fn with_entity(mut self, entity: EntityType) -> Self {
        self.add_entity(entity);
        self
    }

    /// Builder: add a layer, replacing nothing if the name already exists
    pub fn with_layer(mut self, layer: Layer) -> Self {
        let _ = self.layers.add(layer);
        self
    }

    /// Builder: add a block definition
    pub fn with_block(mut self, block: BlockRecord) -> Self {
        let _ = self.blocks.add(block);
        self
    }

    /// Top-level entities in drawing order
    pub fn entities(&self) -> &[EntityType] {
        &self.entities
    }

    /// Look up a block definition (case-insensitive)
    pub fn block(&self, name: &str) -> Option<&BlockRecord> {
        self.blocks.get(name)
    }

    /// Default color index of a layer, if the layer exists
    pub fn layer_color(&self, name: &str) -> Option<i16> {
        self.layers.get(name).map(|layer| layer.color)
    }

    /// Find a cycle in the block reference graph.
    ///
    /// Returns the offending path with the repeated block at both ends
    /// (`["A", "B", "A"]`), or `None` when every block expands finitely.
    /// References to undefined blocks are ignored here.
    pub fn find_block_cycle(&self) -> Option<Vec<String>> {
        let mut finished: AHashSet<String> = AHashSet::new();
        for block in self.blocks.iter() {
            let mut path: Vec<String> = Vec::new();
            if let Some(cycle) = self.visit_block(block, &mut path, &mut finished) {
                return Some(cycle);
            }
        }
        None
    }

    /// Entity visits needed to expand every top-level entity completely.
    ///
    /// Each entity costs one visit and each insert instance one more, the
    /// same accounting the bounds and render passes use. Saturates instead
    /// of overflowing, and a block re-entered through a cycle counts as
    /// empty, so the result is finite for any block graph.
    pub fn expansion_size(&self) -> u64 {
        let mut memo: AHashMap<String, u64> = AHashMap::new();
        let mut active: AHashSet<String> = AHashSet::new();
        self.entities_cost(&self.entities, &mut memo, &mut active)
    }

    fn entities_cost(
        &self,
        entities: &[EntityType],
        memo: &mut AHashMap<String, u64>,
        active: &mut AHashSet<String>,
    ) -> u64 {
        entities.iter().fold(0u64, |total, entity| {
            let cost = match entity {
                EntityType::Insert(insert) => match self.block(&insert.block_name) {
                    Some(block) => {
                        let inner = self.block_cost(block, memo, active);
                        (insert.instance_count() as u64).saturating_mul(inner.saturating_add(1))
                    }
                    None => 0,
                },
                _ => 0,
            };
            total.saturating_add(cost.saturating_add(1))
        })
    }

    fn block_cost(
        &self,
        block: &BlockRecord,
        memo: &mut AHashMap<String, u64>,
        active: &mut AHashSet<String>,
    ) -> u64 {
        let key = block.name.to_uppercase();
        if let Some(cost) = memo.get(&key) {
            return *cost;
        }
        if !active.insert(key.clone()) {
            return 0;
        }
        let cost = self.entities_cost(&block.entities, memo, active);
        active.remove(&key);
        memo.insert(key, cost);
        cost
    }

    fn visit_block(
        &self,
        block: &BlockRecord,
        path: &mut Vec<String>,
        finished: &mut AHashSet<String>,
    ) -> Option<Vec<String>> {
        let key = block.name.to_uppercase();
        if finished.contains(&key) {
            return None;
        }
        if let Some(start) = path.iter().position(|p| p.to_uppercase() == key) {
            let mut cycle = path[start..].to_vec();
            cycle.push(block.name.clone());
            return Some(cycle);
        }

        path.push(block.name.clone());
        for child in block.referenced_blocks() {
            if let Some(child_block) = self.block(child) {
                if let Some(cycle) = self.visit_block(child_block, path, finished) {
                    return Some(cycle);
                }
            }
        }
        path.pop();
        finished.insert(key);
        None
    }
}
