//! Selector cascade and container classification
//!
//! A [`ShapeTable`] maps logical shapes (cards, titles, ratings,
//! containers) to a primary selector plus ranked fallbacks;
//! [`find_containers`] and [`classify_unknown`] resolve page structure
//! from it, inferring container kind structurally when no primary pattern
//! matches.

pub mod classify;
pub mod shapes;

pub use classify::{classify_unknown, find_containers, ContainerKind, Containers};
pub use shapes::{SelectorEntry, Shape, ShapeTable};
