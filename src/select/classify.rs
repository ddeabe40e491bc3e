use crate::dom::{query, DomBackend, Pattern};
use crate::select::shapes::{Shape, ShapeTable};

/// Structural classification of a card container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Horizontally scrolling row of cards
    Carousel,
    /// Browse/search results grid
    Browse,
    /// Recognized structurally but matching neither known shape
    Generic,
}

/// Result of container discovery over a scope
#[derive(Debug, Clone)]
pub struct Containers<N> {
    /// Containers matched (or inferred) as carousels
    pub carousels: Vec<N>,

    /// Containers matched (or inferred) as browse grids
    pub browse: Vec<N>,

    /// Structurally inferred containers of unknown kind, with the number
    /// of inner-card descendants each one held at discovery time
    pub unknown: Vec<(N, usize)>,
}

impl<N> Containers<N> {
    fn empty() -> Self {
        Self {
            carousels: Vec::new(),
            browse: Vec::new(),
            unknown: Vec::new(),
        }
    }

    /// Total number of discovered containers across all buckets
    pub fn len(&self) -> usize {
        self.carousels.len() + self.browse.len() + self.unknown.len()
    }

    /// True if nothing was discovered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Locate card containers under `scope`.
///
/// The primary carousel- and browse-container patterns are tried first; if
/// either matches anything, those matches are the answer. Only when both
/// come up empty does structural inference run: every node matched by the
/// ranked container fallback patterns is bucketed by which card shapes it
/// contains (carousel cards win over browse cards, which win over bare
/// inner cards); nodes containing no card shape at all are discarded.
pub fn find_containers<B: DomBackend>(
    dom: &B,
    table: &ShapeTable,
    scope: B::Node,
) -> Containers<B::Node> {
    let mut found = Containers::empty();

    found.carousels = table.query_primary(dom, scope, Shape::CarouselContainer);
    found.browse = table.query_primary(dom, scope, Shape::BrowseContainer);
    if !found.carousels.is_empty() || !found.browse.is_empty() {
        log::debug!(
            "Primary container patterns matched: {} carousels, {} browse",
            found.carousels.len(),
            found.browse.len()
        );
        return found;
    }

    let mut seen: Vec<B::Node> = Vec::new();
    for raw in table.container_fallbacks() {
        let pattern = match Pattern::parse(raw) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Skipping bad container fallback: {}", e);
                continue;
            }
        };

        for node in query(dom, scope, &pattern) {
            if seen.contains(&node) {
                continue;
            }
            seen.push(node);

            let carousel_cards = table.query_shape(dom, node, Shape::CarouselCard).len();
            let browse_cards = table.query_shape(dom, node, Shape::BrowseCard).len();
            let inner_cards = table.query_shape(dom, node, Shape::InnerCard).len();

            if carousel_cards > 0 {
                found.carousels.push(node);
            } else if browse_cards > 0 {
                found.browse.push(node);
            } else if inner_cards > 0 {
                found.unknown.push((node, inner_cards));
            }
            // No card shape at all: not a card container, drop it
        }
    }

    found
}

/// Classify a structurally inferred container by probing its descendants:
/// carousel cards first, then browse cards, otherwise `Generic`.
pub fn classify_unknown<B: DomBackend>(
    dom: &B,
    table: &ShapeTable,
    container: B::Node,
) -> ContainerKind {
    if table.has_descendant(dom, container, Shape::CarouselCard) {
        ContainerKind::Carousel
    } else if table.has_descendant(dom, container, Shape::BrowseCard) {
        ContainerKind::Browse
    } else {
        ContainerKind::Generic
    }
}
