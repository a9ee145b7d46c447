//! Block definitions

use super::TableEntry;
use crate::entities::EntityType;
use crate::types::Vector2;

/// A named, reusable block definition (BLOCK ... ENDBLK)
///
/// Blocks are stored as decoded and never expanded in place; resolvers that
/// expand inserts work on transformed copies of the points.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    /// Block name
    pub name: String,
    /// Base point subtracted from block geometry when instanced
    pub base_point: Vector2,
    /// Entities owned by this block
    pub entities: Vec<EntityType>,
}

impl BlockRecord {
    /// Create a new empty block definition
    pub fn new(name: impl Into<String>) -> Self {
        BlockRecord {
            name: name.into(),
            base_point: Vector2::ZERO,
            entities: Vec::new(),
        }
    }

    /// Builder: add an entity
    pub fn with_entity(mut self, entity: EntityType) -> Self {
        self.entities.push(entity);
        self
    }

    /// Whether this is one of the layout blocks (`*Model_Space`, `*Paper_Space*`)
    pub fn is_layout(&self) -> bool {
        let upper = self.name.to_uppercase();
        upper == "*MODEL_SPACE" || upper.starts_with("*PAPER_SPACE")
    }

    /// Names of blocks directly referenced by this block's inserts
    pub fn referenced_blocks(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().filter_map(|e| e.referenced_block())
    }
}

impl TableEntry for BlockRecord {
    fn name(&self) -> &str {
        &self.name
    }
}
