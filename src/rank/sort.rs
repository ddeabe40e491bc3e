use crate::dom::{query, DomBackend, Pattern};
use crate::rank::annotate::annotate;
use crate::rank::extract::{extract, CardData};
use crate::rank::markers::ProcessedSet;
use crate::select::{ContainerKind, Shape, ShapeTable};
use indexmap::IndexSet;
use std::cmp::Ordering;

/// Reorder one container's cards so higher-rated items come first.
///
/// Sorting a container is a one-shot transform: once it succeeds the
/// container is marked and later calls are no-ops. The reorder is pure:
/// it moves existing children in one batch and never creates, drops, or
/// duplicates a node; children outside the resolved card/wrapper set keep
/// their positions at the front of the child list.
///
/// Returns true only if a reorder was applied.
pub fn sort_container<B: DomBackend>(
    dom: &mut B,
    table: &ShapeTable,
    card_markers: &mut ProcessedSet<B::Node>,
    container_markers: &mut ProcessedSet<B::Node>,
    container: B::Node,
    kind: ContainerKind,
) -> bool {
    if container_markers.is_marked(container) {
        return false;
    }

    let cards = resolve_cards(dom, table, container, kind);
    if cards.len() < 2 {
        log::debug!("Container has {} card(s), nothing to sort", cards.len());
        return false;
    }

    // Extract and annotate through the data-bearing inner node of each card
    let mut rated: Vec<(B::Node, CardData)> = Vec::new();
    let mut unrated: Vec<B::Node> = Vec::new();
    for &card in &cards {
        let inner = table
            .query_shape(dom, card, Shape::InnerCard)
            .first()
            .copied()
            .unwrap_or(card);
        let data = extract(dom, table, inner);
        annotate(dom, table, card_markers, inner, &data);

        if data.is_rated() {
            rated.push((card, data));
        } else {
            unrated.push(card);
        }
    }

    if rated.len() < 2 {
        log::debug!("Container has {} rated card(s), nothing to sort", rated.len());
        return false;
    }

    // Stable two-key sort: rating descending, votes descending; ties keep
    // their original relative order (slice::sort_by is guaranteed stable)
    rated.sort_by(|(_, a), (_, b)| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.votes.cmp(&a.votes))
    });

    // Order-preserving dedup: two cards can share one wrapper
    let mut units: IndexSet<B::Node> = IndexSet::new();
    for (card, _) in &rated {
        if let Some(unit) = movable_unit(dom, table, container, *card) {
            units.insert(unit);
        }
    }
    for card in &unrated {
        if let Some(unit) = movable_unit(dom, table, container, *card) {
            units.insert(unit);
        }
    }

    let batch: Vec<B::Node> = units.into_iter().collect();
    dom.move_to_end(container, &batch);

    if wants_scroll_reset(dom, container, kind) {
        dom.reset_scroll(container);
    }

    container_markers.mark(container);
    log::debug!(
        "Sorted container: {} rated, {} unrated card(s)",
        rated.len(),
        unrated.len()
    );
    true
}

/// Resolve the node actually relocated for a card: its immediate parent
/// when that parent is a structural wrapper (carries the wrapper attribute
/// and is not the container itself), otherwise the card. Cards whose unit
/// is no longer a child of the container were already moved elsewhere by a
/// concurring pass and yield `None`.
fn movable_unit<B: DomBackend>(
    dom: &B,
    table: &ShapeTable,
    container: B::Node,
    card: B::Node,
) -> Option<B::Node> {
    let parent = dom.parent(card)?;
    let unit = if parent != container && dom.attr(parent, &table.wrapper_attr).is_some() {
        parent
    } else {
        card
    };

    (dom.parent(unit) == Some(container)).then_some(unit)
}

fn resolve_cards<B: DomBackend>(
    dom: &B,
    table: &ShapeTable,
    container: B::Node,
    kind: ContainerKind,
) -> Vec<B::Node> {
    match kind {
        ContainerKind::Carousel => table.query_shape(dom, container, Shape::CarouselCard),
        ContainerKind::Browse => table.query_shape(dom, container, Shape::BrowseCard),
        ContainerKind::Generic => {
            for raw in table.generic_card_patterns() {
                match Pattern::parse(raw) {
                    Ok(pattern) => {
                        let hits = query(dom, container, &pattern);
                        if !hits.is_empty() {
                            return hits;
                        }
                    }
                    Err(e) => log::warn!("Skipping bad generic card pattern: {}", e),
                }
            }
            Vec::new()
        }
    }
}

/// Carousel-kind containers always reset; otherwise the class list decides
/// (anything that advertises horizontal scrolling)
fn wants_scroll_reset<B: DomBackend>(dom: &B, container: B::Node, kind: ContainerKind) -> bool {
    if kind == ContainerKind::Carousel {
        return true;
    }
    dom.classes(container).iter().any(|c| {
        let c = c.to_ascii_lowercase();
        c.contains("carousel") || c.contains("slider") || c.contains("tray")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};

    fn card_with(
        doc: &mut Document,
        parent: NodeId,
        class: &str,
        title: &str,
        rating: &str,
        votes: &str,
    ) -> NodeId {
        let card = doc.append(parent, "div");
        doc.set_attr(card, "class", class);
        let t = doc.append(card, "span");
        doc.set_attr(t, "class", "card-title");
        doc.set_text(t, title);
        if !rating.is_empty() {
            let r = doc.append(card, "span");
            doc.set_attr(r, "class", "card-rating");
            doc.set_text(r, rating);
        }
        if !votes.is_empty() {
            let v = doc.append(card, "span");
            doc.set_attr(v, "class", "card-votes");
            doc.set_text(v, votes);
        }
        card
    }

    fn run_sort(doc: &mut Document, container: NodeId, kind: ContainerKind) -> bool {
        let table = ShapeTable::default();
        let mut card_markers = ProcessedSet::new();
        let mut container_markers = ProcessedSet::new();
        sort_container(
            doc,
            &table,
            &mut card_markers,
            &mut container_markers,
            container,
            kind,
        )
    }

    #[test]
    fn test_sort_by_rating_descending() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        let low = card_with(&mut doc, container, "browse-card", "Low", "3.1", "(10)");
        let high = card_with(&mut doc, container, "browse-card", "High", "4.8", "(10)");
        let mid = card_with(&mut doc, container, "browse-card", "Mid", "4.2", "(10)");

        assert!(run_sort(&mut doc, container, ContainerKind::Browse));
        assert_eq!(doc.children(container), vec![high, mid, low]);
    }

    #[test]
    fn test_stability_and_unrated_last() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        // Ratings in input order: 4.2, 4.8 (first seen), 4.8 (second seen), none
        let a = card_with(&mut doc, container, "browse-card", "A", "4.2", "(5)");
        let b = card_with(&mut doc, container, "browse-card", "B", "4.8", "(5)");
        let c = card_with(&mut doc, container, "browse-card", "C", "4.8", "(5)");
        let d = card_with(&mut doc, container, "browse-card", "D", "", "");

        assert!(run_sort(&mut doc, container, ContainerKind::Browse));
        assert_eq!(doc.children(container), vec![b, c, a, d]);
    }

    #[test]
    fn test_votes_break_rating_ties() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        let few = card_with(&mut doc, container, "browse-card", "Few", "4.5", "(100)");
        let many = card_with(&mut doc, container, "browse-card", "Many", "4.5", "(2.5k)");

        assert!(run_sort(&mut doc, container, ContainerKind::Browse));
        assert_eq!(doc.children(container), vec![many, few]);
    }

    #[test]
    fn test_sort_preserves_child_identity_set() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        card_with(&mut doc, container, "browse-card", "A", "2.0", "(1)");
        card_with(&mut doc, container, "browse-card", "B", "5.0", "(1)");
        card_with(&mut doc, container, "browse-card", "C", "", "");
        let chevron = doc.append(container, "button");
        doc.set_attr(chevron, "class", "chevron");

        let mut before = doc.children(container);
        assert!(run_sort(&mut doc, container, ContainerKind::Browse));
        let mut after = doc.children(container);

        before.sort_by_key(|n| n.index());
        after.sort_by_key(|n| n.index());
        assert_eq!(before, after);
    }

    #[test]
    fn test_unrelated_children_stay_in_front() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        let chevron = doc.append(container, "button");
        let a = card_with(&mut doc, container, "browse-card", "A", "2.0", "(1)");
        let b = card_with(&mut doc, container, "browse-card", "B", "5.0", "(1)");

        assert!(run_sort(&mut doc, container, ContainerKind::Browse));
        assert_eq!(doc.children(container), vec![chevron, b, a]);
    }

    #[test]
    fn test_second_sort_is_noop() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        card_with(&mut doc, container, "browse-card", "A", "2.0", "(1)");
        card_with(&mut doc, container, "browse-card", "B", "5.0", "(1)");

        let table = ShapeTable::default();
        let mut card_markers = ProcessedSet::new();
        let mut container_markers = ProcessedSet::new();

        assert!(sort_container(
            &mut doc,
            &table,
            &mut card_markers,
            &mut container_markers,
            container,
            ContainerKind::Browse,
        ));
        let order = doc.children(container);

        assert!(!sort_container(
            &mut doc,
            &table,
            &mut card_markers,
            &mut container_markers,
            container,
            ContainerKind::Browse,
        ));
        assert_eq!(doc.children(container), order);
    }

    #[test]
    fn test_fewer_than_two_rated_is_noop() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        card_with(&mut doc, container, "browse-card", "A", "4.0", "(1)");
        card_with(&mut doc, container, "browse-card", "B", "", "");
        card_with(&mut doc, container, "browse-card", "C", "", "");

        let order = doc.children(container);
        assert!(!run_sort(&mut doc, container, ContainerKind::Browse));
        assert_eq!(doc.children(container), order);
    }

    #[test]
    fn test_wrapper_is_the_movable_unit() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");

        let wrap_low = doc.append(container, "div");
        doc.set_attr(wrap_low, "data-slide", "0");
        card_with(&mut doc, wrap_low, "carousel-card", "Low", "3.0", "(1)");

        let wrap_high = doc.append(container, "div");
        doc.set_attr(wrap_high, "data-slide", "1");
        card_with(&mut doc, wrap_high, "carousel-card", "High", "4.9", "(1)");

        assert!(run_sort(&mut doc, container, ContainerKind::Carousel));
        assert_eq!(doc.children(container), vec![wrap_high, wrap_low]);
        // Cards themselves were not re-parented
        assert_eq!(doc.parent(doc.children(wrap_high)[0]), Some(wrap_high));
    }

    #[test]
    fn test_nested_card_without_wrapper_attr_is_not_moved() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        let a = card_with(&mut doc, container, "browse-card", "A", "2.0", "(1)");
        let b = card_with(&mut doc, container, "browse-card", "B", "5.0", "(1)");

        // A card buried under a plain div: its resolved unit is the card
        // itself, which is not a direct child of the container, so it is
        // skipped rather than re-parented
        let shell = doc.append(container, "div");
        card_with(&mut doc, shell, "browse-card", "C", "4.0", "(1)");

        assert!(run_sort(&mut doc, container, ContainerKind::Browse));
        assert_eq!(doc.children(container), vec![shell, b, a]);
    }

    #[test]
    fn test_carousel_scroll_reset() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        doc.set_attr(container, "class", "carousel-track");
        doc.set_scroll_left(container, 800.0);
        card_with(&mut doc, container, "carousel-card", "A", "2.0", "(1)");
        card_with(&mut doc, container, "carousel-card", "B", "5.0", "(1)");

        assert!(run_sort(&mut doc, container, ContainerKind::Carousel));
        assert_eq!(doc.scroll_left(container), 0.0);
    }

    #[test]
    fn test_browse_sort_keeps_scroll() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        doc.set_attr(container, "class", "browse-grid");
        doc.set_scroll_left(container, 120.0);
        card_with(&mut doc, container, "browse-card", "A", "2.0", "(1)");
        card_with(&mut doc, container, "browse-card", "B", "5.0", "(1)");

        assert!(run_sort(&mut doc, container, ContainerKind::Browse));
        assert_eq!(doc.scroll_left(container), 120.0);
    }

    #[test]
    fn test_generic_container_uses_card_cascade() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        let a = card_with(&mut doc, container, "tray-card", "A", "1.5", "(1)");
        let b = card_with(&mut doc, container, "tray-card", "B", "4.5", "(1)");

        assert!(run_sort(&mut doc, container, ContainerKind::Generic));
        assert_eq!(doc.children(container), vec![b, a]);
    }

    #[test]
    fn test_annotation_happens_during_sort() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let container = doc.append(root, "section");
        let a = card_with(&mut doc, container, "browse-card", "A", "3.3", "(1)");
        card_with(&mut doc, container, "browse-card", "B", "4.4", "(1)");

        assert!(run_sort(&mut doc, container, ContainerKind::Browse));
        let table = ShapeTable::default();
        let title = table.query_shape(&doc, a, Shape::Title)[0];
        assert_eq!(doc.text(title), "A (3.3)");
    }
}
