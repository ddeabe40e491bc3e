use crate::dom::DomBackend;
use crate::rank::extract::CardData;
use crate::rank::markers::ProcessedSet;
use crate::rank::parse::format_rating;
use crate::select::{Shape, ShapeTable};

/// Append the extracted rating to a card's visible title, once.
///
/// Returns true only if the title text was actually changed. Two guards
/// make repeated passes safe: the processed marker stops re-invocation on
/// the same node, and the text containment check stops a re-derived suffix
/// from being appended a second time even if the marker was lost.
pub fn annotate<B: DomBackend>(
    dom: &mut B,
    table: &ShapeTable,
    markers: &mut ProcessedSet<B::Node>,
    card: B::Node,
    data: &CardData,
) -> bool {
    if markers.is_marked(card) {
        return false;
    }

    if !data.is_rated() {
        return false;
    }

    let Some(&title_node) = table.query_shape(dom, card, Shape::Title).first() else {
        return false;
    };

    let suffix = format!("({})", format_rating(data.rating));
    let current = dom.text(title_node);
    if current.contains(&suffix) {
        // Already annotated on a previous load of this subtree; remember it
        markers.mark(card);
        return false;
    }

    dom.set_text(title_node, &format!("{} {}", current.trim_end(), suffix));
    markers.mark(card);
    log::debug!("Annotated '{}' with rating {}", data.title, data.rating);
    true
}
