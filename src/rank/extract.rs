use crate::dom::DomBackend;
use crate::rank::parse::{parse_rating, parse_votes};
use crate::select::{Shape, ShapeTable};
use serde::{Deserialize, Serialize};

/// Data extracted from one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    /// Visible title text, trimmed; empty if no title element was found
    pub title: String,

    /// Extracted rating; `0.0` means "no rating"
    pub rating: f64,

    /// Extracted vote count; `0` means "no votes"
    pub votes: u64,
}

impl CardData {
    /// True if the card carries a usable rating
    pub fn is_rated(&self) -> bool {
        self.rating > 0.0
    }
}

/// Extract title, rating, and votes from one card.
///
/// Each sub-element is located via the selector cascade inside the card
/// subtree; a missing sub-element is a normal outcome (cards are not
/// guaranteed fully rendered) and degrades to the empty title or the zero
/// sentinel. This function never fails.
pub fn extract<B: DomBackend>(dom: &B, table: &ShapeTable, card: B::Node) -> CardData {
    let title = table
        .query_shape(dom, card, Shape::Title)
        .first()
        .map(|&node| dom.text(node).trim().to_string())
        .unwrap_or_default();

    let rating = table
        .query_shape(dom, card, Shape::Rating)
        .first()
        .map(|&node| parse_rating(&dom.text(node)))
        .unwrap_or(0.0);

    let votes = table
        .query_shape(dom, card, Shape::Votes)
        .first()
        .map(|&node| parse_votes(&dom.text(node)))
        .unwrap_or(0);

    CardData {
        title,
        rating,
        votes,
    }
}
