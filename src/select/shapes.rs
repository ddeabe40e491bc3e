use crate::dom::{query, DomBackend, Pattern};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Logical element shapes the pipeline needs to locate on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Shape {
    InnerCard,
    CarouselCard,
    BrowseCard,
    Title,
    Rating,
    Votes,
    CarouselContainer,
    BrowseContainer,
}

impl Shape {
    /// All card-level shapes, in probe priority order
    pub const CARDS: [Shape; 3] = [Shape::CarouselCard, Shape::BrowseCard, Shape::InnerCard];

    /// Both container-level shapes
    pub const CONTAINERS: [Shape; 2] = [Shape::CarouselContainer, Shape::BrowseContainer];
}

/// Primary selector plus ranked fallbacks for one shape.
///
/// Fallbacks are consulted only when the primary pattern yields nothing;
/// entries that fail to parse are skipped, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorEntry {
    /// Primary selector pattern
    pub primary: String,

    /// Ranked fallback patterns, highest priority first
    #[serde(default)]
    pub fallbacks: Vec<String>,
}

impl SelectorEntry {
    /// Create an entry with no fallbacks
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallbacks: Vec::new(),
        }
    }

    /// Builder method: append a fallback pattern
    pub fn with_fallback(mut self, pattern: impl Into<String>) -> Self {
        self.fallbacks.push(pattern.into());
        self
    }
}

/// Static table mapping logical shapes to selector cascades.
///
/// The table is immutable during processing; `Default` carries selectors
/// for a typical streaming listing page, and hosts can deserialize a
/// site-specific table from JSON instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeTable {
    /// Shape → selector cascade, in declaration order
    pub entries: IndexMap<Shape, SelectorEntry>,

    /// Attribute marking a structural wrapper between a card and its
    /// container; the wrapper becomes the movable unit during reordering
    pub wrapper_attr: String,
}

impl Default for ShapeTable {
    fn default() -> Self {
        let mut entries = IndexMap::new();
        entries.insert(
            Shape::InnerCard,
            SelectorEntry::new(".tray-card")
                .with_fallback("[data-card-id]")
                .with_fallback("article.card"),
        );
        entries.insert(
            Shape::CarouselCard,
            SelectorEntry::new(".carousel-card").with_fallback("[data-carousel-item]"),
        );
        entries.insert(
            Shape::BrowseCard,
            SelectorEntry::new(".browse-card").with_fallback(".grid-item"),
        );
        entries.insert(
            Shape::Title,
            SelectorEntry::new(".card-title")
                .with_fallback(".title")
                .with_fallback("h3"),
        );
        entries.insert(
            Shape::Rating,
            SelectorEntry::new(".card-rating").with_fallback("[data-rating]"),
        );
        entries.insert(
            Shape::Votes,
            SelectorEntry::new(".card-votes").with_fallback(".vote-count"),
        );
        entries.insert(
            Shape::CarouselContainer,
            SelectorEntry::new(".carousel-track")
                .with_fallback(".tray-container")
                .with_fallback("[data-tray]"),
        );
        entries.insert(
            Shape::BrowseContainer,
            SelectorEntry::new(".browse-grid")
                .with_fallback(".grid-container")
                .with_fallback("[role=grid]"),
        );

        Self {
            entries,
            wrapper_attr: "data-slide".to_string(),
        }
    }
}

impl ShapeTable {
    /// Selector cascade for a shape, if the table defines one
    pub fn entry(&self, shape: Shape) -> Option<&SelectorEntry> {
        self.entries.get(&shape)
    }

    /// Query descendants of `scope` matching a shape: the primary pattern
    /// first, then each fallback in priority order until one yields a
    /// non-empty result. Unparsable patterns are skipped.
    pub fn query_shape<B: DomBackend>(&self, dom: &B, scope: B::Node, shape: Shape) -> Vec<B::Node> {
        for raw in self.cascade(shape) {
            match Pattern::parse(raw) {
                Ok(pattern) => {
                    let hits = query(dom, scope, &pattern);
                    if !hits.is_empty() {
                        return hits;
                    }
                }
                Err(e) => log::warn!("Skipping bad selector for {:?}: {}", shape, e),
            }
        }
        Vec::new()
    }

    /// Query a shape using only the primary pattern
    pub fn query_primary<B: DomBackend>(
        &self,
        dom: &B,
        scope: B::Node,
        shape: Shape,
    ) -> Vec<B::Node> {
        let Some(entry) = self.entry(shape) else {
            return Vec::new();
        };
        match Pattern::parse(&entry.primary) {
            Ok(pattern) => query(dom, scope, &pattern),
            Err(e) => {
                log::warn!("Bad primary selector for {:?}: {}", shape, e);
                Vec::new()
            }
        }
    }

    /// Test whether a node itself matches a shape, trying the primary
    /// pattern and then each fallback
    pub fn matches_shape<B: DomBackend>(&self, dom: &B, node: B::Node, shape: Shape) -> bool {
        for raw in self.cascade(shape) {
            match Pattern::parse(raw) {
                Ok(pattern) => {
                    if pattern.matches(dom, node) {
                        return true;
                    }
                }
                Err(e) => log::warn!("Skipping bad selector for {:?}: {}", shape, e),
            }
        }
        false
    }

    /// True if the node has a descendant matching the shape
    pub fn has_descendant<B: DomBackend>(&self, dom: &B, node: B::Node, shape: Shape) -> bool {
        !self.query_shape(dom, node, shape).is_empty()
    }

    /// Ranked container fallback patterns: the carousel-container
    /// fallbacks followed by the browse-container fallbacks, deduplicated
    pub fn container_fallbacks(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for shape in Shape::CONTAINERS {
            let Some(entry) = self.entry(shape) else {
                continue;
            };
            for raw in &entry.fallbacks {
                if !out.contains(&raw.as_str()) {
                    out.push(raw);
                }
            }
        }
        out
    }

    /// Ranked card patterns for generic containers: the inner-card
    /// primary followed by the inner-card fallbacks
    pub fn generic_card_patterns(&self) -> Vec<&str> {
        self.cascade(Shape::InnerCard).collect()
    }

    fn cascade(&self, shape: Shape) -> impl Iterator<Item = &str> {
        self.entry(shape).into_iter().flat_map(|entry| {
            std::iter::once(entry.primary.as_str())
                .chain(entry.fallbacks.iter().map(String::as_str))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_default_table_covers_all_shapes() {
        let table = ShapeTable::default();
        for shape in [
            Shape::InnerCard,
            Shape::CarouselCard,
            Shape::BrowseCard,
            Shape::Title,
            Shape::Rating,
            Shape::Votes,
            Shape::CarouselContainer,
            Shape::BrowseContainer,
        ] {
            assert!(!table.entry(shape).unwrap().primary.is_empty());
        }
        assert_eq!(table.wrapper_attr, "data-slide");
    }

    #[test]
    fn test_query_shape_prefers_primary() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let primary_hit = doc.append(root, "div");
        doc.set_attr(primary_hit, "class", "tray-card");
        let fallback_hit = doc.append(root, "div");
        doc.set_attr(fallback_hit, "data-card-id", "42");

        let table = ShapeTable::default();
        let hits = table.query_shape(&doc, root, Shape::InnerCard);
        assert_eq!(hits, vec![primary_hit]);
    }

    #[test]
    fn test_query_shape_falls_back() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let fallback_hit = doc.append(root, "div");
        doc.set_attr(fallback_hit, "data-card-id", "42");

        let table = ShapeTable::default();
        let hits = table.query_shape(&doc, root, Shape::InnerCard);
        assert_eq!(hits, vec![fallback_hit]);
    }

    #[test]
    fn test_bad_fallback_does_not_abort_cascade() {
        let mut table = ShapeTable::default();
        table.entries.insert(
            Shape::InnerCard,
            SelectorEntry::new(".missing")
                .with_fallback(".bad [")
                .with_fallback("[data-card-id]"),
        );

        let mut doc = Document::new("body");
        let root = doc.root();
        let hit = doc.append(root, "div");
        doc.set_attr(hit, "data-card-id", "7");

        assert_eq!(table.query_shape(&doc, root, Shape::InnerCard), vec![hit]);
    }

    #[test]
    fn test_matches_shape() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let card = doc.append(root, "div");
        doc.set_attr(card, "class", "carousel-card");

        let table = ShapeTable::default();
        assert!(table.matches_shape(&doc, card, Shape::CarouselCard));
        assert!(!table.matches_shape(&doc, card, Shape::BrowseCard));
    }

    #[test]
    fn test_container_fallbacks_order_and_dedup() {
        let table = ShapeTable::default();
        let fallbacks = table.container_fallbacks();
        assert_eq!(
            fallbacks,
            vec![".tray-container", "[data-tray]", ".grid-container", "[role=grid]"]
        );
    }

    #[test]
    fn test_table_serde_round_trip() {
        let table = ShapeTable::default();
        let json = serde_json::to_string(&table).unwrap();
        let back: ShapeTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);
    }
}
