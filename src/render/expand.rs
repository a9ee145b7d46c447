//! Bounded block expansion shared by the bounds and render passes
//!
//! Both passes walk the same tree: top-level entities, then every instance
//! of every insert, recursively. The walk is bounded three ways: a block on
//! the active path is not re-entered, nesting stops at `max_depth`, and the
//! total number of entity visits stops at the budget. Each entity costs one
//! visit and each insert instance one more, matching
//! [`DrawingDocument::expansion_size`].

use crate::document::DrawingDocument;
use crate::entities::{Entity, EntityType};
use crate::types::Transform2D;
use ahash::AHashSet;

/// Remaining entity visits for one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionBudget {
    limit: usize,
    remaining: usize,
    exhausted: bool,
}

impl ExpansionBudget {
    pub fn new(limit: usize) -> Self {
        ExpansionBudget {
            limit,
            remaining: limit,
            exhausted: false,
        }
    }

    /// Take one visit; `false` once the budget is used up
    pub fn spend(&mut self) -> bool {
        if self.remaining == 0 {
            self.exhausted = true;
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Visits taken so far
    pub fn spent(&self) -> usize {
        self.limit - self.remaining
    }

    /// Whether a visit was refused, meaning the walk was cut short
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Receives the leaves of an expansion
pub(crate) trait ExpansionVisitor {
    /// State inherited from enclosing inserts
    type Context;

    /// A visible non-insert entity, placed by `transform`
    fn visit(&mut self, entity: &EntityType, transform: &Transform2D, context: &Self::Context);

    /// Context for the contents of `insert`
    fn nest(&mut self, insert: &EntityType, context: &Self::Context) -> Self::Context;
}

/// Visitor that only counts, used to measure a walk
pub(crate) struct Tally;

impl ExpansionVisitor for Tally {
    type Context = ();

    fn visit(&mut self, _: &EntityType, _: &Transform2D, _: &()) {}

    fn nest(&mut self, _: &EntityType, _: &()) {}
}

pub(crate) struct BlockExpander<'a> {
    document: &'a DrawingDocument,
    max_depth: usize,
    budget: ExpansionBudget,
    path: AHashSet<String>,
}

impl<'a> BlockExpander<'a> {
    pub fn new(document: &'a DrawingDocument, max_depth: usize, budget: usize) -> Self {
        BlockExpander {
            document,
            max_depth,
            budget: ExpansionBudget::new(budget),
            path: AHashSet::new(),
        }
    }

    pub fn budget(&self) -> &ExpansionBudget {
        &self.budget
    }

    /// Walk `entities` under `transform`, handing leaves to `visitor`
    pub fn walk<V: ExpansionVisitor>(
        &mut self,
        entities: &[EntityType],
        transform: &Transform2D,
        context: &V::Context,
        depth: usize,
        visitor: &mut V,
    ) {
        for entity in entities {
            if !self.budget.spend() {
                return;
            }
            if entity.as_entity().is_invisible() {
                continue;
            }
            let EntityType::Insert(insert) = entity else {
                visitor.visit(entity, transform, context);
                continue;
            };

            let Some(block) = self.document.block(&insert.block_name) else {
                continue;
            };
            let key = block.name.to_uppercase();
            if depth >= self.max_depth || self.path.contains(&key) {
                tracing::debug!(block = %block.name, depth, "block expansion truncated");
                continue;
            }

            let nested_context = visitor.nest(entity, context);
            self.path.insert(key.clone());
            for instance in insert.instance_transforms(block.base_point) {
                if !self.budget.spend() {
                    break;
                }
                let nested = *transform * instance;
                self.walk(&block.entities, &nested, &nested_context, depth + 1, visitor);
            }
            self.path.remove(&key);
        }
    }
}
