//! Display color resolution
//!
//! An entity's color comes from, in order: its explicit index (with
//! [`BYBLOCK`] replaced by the enclosing insert's color), its layer's
//! default index, and finally [`DEFAULT_COLOR_INDEX`]. A true color on the
//! entity overrides the palette lookup of whatever index won.
//!
//! Lookups never fail. Missing layers and out-of-palette indices fall back.

use crate::document::DrawingDocument;
use crate::entities::EntityType;
use crate::types::{aci_to_rgb, Rgb, BYBLOCK, BYLAYER, DEFAULT_COLOR_INDEX};

/// Layer whose entities take the enclosing insert's layer inside a block
const BLOCK_LAYER: &str = "0";

/// Color state handed down from a block insert to the entities it expands
#[derive(Debug, Clone, PartialEq)]
pub struct InheritContext {
    /// Resolved index of the insert
    pub parent_color_index: i16,
    /// Resolved RGB of the insert (includes its true color, if any)
    pub parent_rgb: Rgb,
    /// Effective layer of the insert
    pub parent_layer: String,
}

/// A resolved display color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColor {
    /// Palette index that won; always in `1..=255`
    pub index: i16,
    pub rgb: Rgb,
}

impl ResolvedColor {
    pub fn from_index(index: i16) -> Self {
        ResolvedColor {
            index,
            rgb: aci_to_rgb(index),
        }
    }
}

impl Default for ResolvedColor {
    fn default() -> Self {
        Self::from_index(DEFAULT_COLOR_INDEX)
    }
}

/// Resolves entity colors against one document's layer table
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver<'a> {
    document: &'a DrawingDocument,
}

impl<'a> ColorResolver<'a> {
    pub fn new(document: &'a DrawingDocument) -> Self {
        ColorResolver { document }
    }

    /// Resolve the display color of `entity`.
    ///
    /// `context` is `None` for top-level entities and the enclosing insert's
    /// state for entities expanded from a block.
    pub fn resolve(&self, entity: &EntityType, context: Option<&InheritContext>) -> ResolvedColor {
        let common = entity.common();
        let layer = self.effective_layer(&common.layer, context);

        let resolved = match (common.color, context) {
            (Some(BYBLOCK), Some(ctx)) => ResolvedColor {
                index: ctx.parent_color_index,
                rgb: ctx.parent_rgb,
            },
            (Some(index), _) if is_palette_index(index) => ResolvedColor::from_index(index),
            _ => self.layer_color(layer),
        };

        match common.true_color {
            Some(rgb) => ResolvedColor { rgb, ..resolved },
            None => resolved,
        }
    }

    /// Context for the entities of the block referenced by `insert`
    pub fn context_for(&self, insert: &EntityType, context: Option<&InheritContext>) -> InheritContext {
        let color = self.resolve(insert, context);
        InheritContext {
            parent_color_index: color.index,
            parent_rgb: color.rgb,
            parent_layer: self.effective_layer(&insert.common().layer, context).to_string(),
        }
    }

    fn effective_layer<'b>(&self, layer: &'b str, context: Option<&'b InheritContext>) -> &'b str {
        match context {
            Some(ctx) if layer == BLOCK_LAYER => &ctx.parent_layer,
            _ => layer,
        }
    }

    fn layer_color(&self, name: &str) -> ResolvedColor {
        match self.document.layers.get(name) {
            Some(layer) if is_palette_index(layer.color) => match layer.true_color {
                Some(rgb) => ResolvedColor {
                    index: layer.color,
                    rgb,
                },
                None => ResolvedColor::from_index(layer.color),
            },
            _ => ResolvedColor::default(),
        }
    }
}

fn is_palette_index(index: i16) -> bool {
    index > BYBLOCK && index < BYLAYER
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityCommon, Line};
    use crate::tables::Layer;

    fn line_on(layer: &str, color: Option<i16>) -> EntityType {
        let mut line = Line::from_coords(0.0, 0.0, 1.0, 1.0);
        line.common = EntityCommon::with_layer(layer);
        line.common.color = color;
        EntityType::Line(line)
    }

    fn doc() -> DrawingDocument {
        DrawingDocument::new()
            .with_layer(Layer::with_color("0", 7))
            .with_layer(Layer::with_color("WALLS", 1))
            .with_layer(Layer::with_color("HIDDEN", -3))
    }

    #[test]
    fn test_explicit_beats_layer() {
        let doc = doc();
        let resolver = ColorResolver::new(&doc);
        assert_eq!(resolver.resolve(&line_on("WALLS", Some(3)), None).index, 3);
        assert_eq!(resolver.resolve(&line_on("WALLS", None), None).index, 1);
        assert_eq!(resolver.resolve(&line_on("WALLS", Some(BYLAYER)), None).index, 1);
    }

    #[test]
    fn test_fallbacks() {
        let doc = doc();
        let resolver = ColorResolver::new(&doc);
        // Missing layer
        assert_eq!(resolver.resolve(&line_on("NOPE", None), None), ResolvedColor::default());
        // Layer switched off
        assert_eq!(resolver.resolve(&line_on("HIDDEN", None), None).index, DEFAULT_COLOR_INDEX);
        // Out of palette
        assert_eq!(resolver.resolve(&line_on("NOPE", Some(-5)), None).index, DEFAULT_COLOR_INDEX);
        assert_eq!(resolver.resolve(&line_on("NOPE", Some(300)), None).index, DEFAULT_COLOR_INDEX);
    }

    #[test]
    fn test_byblock_inherits_parent() {
        let doc = doc();
        let resolver = ColorResolver::new(&doc);
        let ctx = InheritContext {
            parent_color_index: 5,
            parent_rgb: aci_to_rgb(5),
            parent_layer: "WALLS".to_string(),
        };
        let resolved = resolver.resolve(&line_on("WALLS", Some(BYBLOCK)), Some(&ctx));
        assert_eq!(resolved, ResolvedColor::from_index(5));

        // Top-level BYBLOCK has nothing to inherit and uses the layer
        assert_eq!(resolver.resolve(&line_on("WALLS", Some(BYBLOCK)), None).index, 1);
    }

    #[test]
    fn test_layer_zero_takes_insert_layer() {
        let doc = doc();
        let resolver = ColorResolver::new(&doc);
        let insert = line_on("WALLS", None);
        let ctx = resolver.context_for(&insert, None);
        assert_eq!(ctx.parent_layer, "WALLS");
        assert_eq!(resolver.resolve(&line_on("0", None), Some(&ctx)).index, 1);
        assert_eq!(resolver.resolve(&line_on("0", None), None).index, 7);
    }

    #[test]
    fn test_true_color_overrides_rgb() {
        let doc = doc().with_layer(Layer {
            true_color: Some(Rgb::new(10, 20, 30)),
            ..Layer::with_color("TINTED", 4)
        });
        let resolver = ColorResolver::new(&doc);

        let mut entity = line_on("WALLS", Some(2));
        if let EntityType::Line(line) = &mut entity {
            line.common.true_color = Some(Rgb::new(1, 2, 3));
        }
        let resolved = resolver.resolve(&entity, None);
        assert_eq!(resolved.index, 2);
        assert_eq!(resolved.rgb, Rgb::new(1, 2, 3));

        let resolved = resolver.resolve(&line_on("TINTED", None), None);
        assert_eq!(resolved, ResolvedColor { index: 4, rgb: Rgb::new(10, 20, 30) });
    }
}
