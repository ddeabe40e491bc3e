//! Extraction, annotation, and reordering
//!
//! The leaf pipeline: parse rating/vote text ([`parse`]), pull a
//! [`CardData`] out of one card ([`extract`]), write the rating back into
//! the visible title ([`annotate`]), and reorder a container's cards by
//! rating ([`sort_container`]). Processed-marker sets keep every one of
//! these idempotent under repeated passes.

pub mod annotate;
pub mod extract;
pub mod markers;
pub mod parse;
pub mod sort;

pub use annotate::annotate;
pub use extract::{extract, CardData};
pub use markers::ProcessedSet;
pub use parse::{format_rating, parse_rating, parse_votes};
pub use sort::sort_container;
