//! Host-tree boundary
//!
//! The pipeline reads and reorders an externally owned document tree. This
//! module defines that boundary:
//! - [`DomBackend`]: the read/reorder/text/scroll surface the pipeline
//!   consumes
//! - [`Pattern`]: a compound simple-selector language with document-order
//!   [`query`]
//! - [`Document`]: an arena-backed in-memory implementation used as the
//!   test substrate and as an embeddable fake

pub mod backend;
pub mod document;
pub mod node;
pub mod pattern;

pub use backend::DomBackend;
pub use document::{Document, NodeSnapshot};
pub use node::{NodeData, NodeId};
pub use pattern::{query, query_inclusive, Pattern};
