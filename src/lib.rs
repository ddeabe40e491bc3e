//! # card-ranker
//!
//! A Rust library that augments content listing pages: it locates item
//! cards in a live, continuously mutating document tree, extracts a
//! rating and vote count from the text inside each card, annotates the
//! card's visible title with the rating, and reorders sibling cards so
//! higher-rated items come first.
//!
//! ## Features
//!
//! - **Selector Cascade**: every logical shape (card, title, rating,
//!   container) resolves through a primary pattern plus ranked fallbacks,
//!   tolerating unknown or shifting page structure
//! - **Structural Classification**: containers with no primary match are
//!   classified by probing their descendants for known card shapes
//! - **Idempotent Mutation**: annotation and reordering are guarded by
//!   non-owning processed markers, so repeated passes never duplicate a
//!   suffix or re-sort a container
//! - **Reactive Controller**: bootstrap retries, debounced mutation
//!   bursts, and a bounded safety-net poll, all on one cooperative
//!   timeline
//!
//! ## Quick start
//!
//! ```rust
//! use card_ranker::control::PageSession;
//! use card_ranker::dom::{Document, DomBackend};
//! use std::time::Duration;
//!
//! // Build (or import) a document snapshot
//! let mut doc = Document::new("body");
//! let root = doc.root();
//! let grid = doc.append(root, "section");
//! doc.set_attr(grid, "class", "browse-grid");
//! for (title, rating) in [("Show A", "3.1"), ("Show B", "4.8")] {
//!     let card = doc.append(grid, "div");
//!     doc.set_attr(card, "class", "browse-card");
//!     let t = doc.append(card, "span");
//!     doc.set_attr(t, "class", "card-title");
//!     doc.set_text(t, title);
//!     let r = doc.append(card, "span");
//!     doc.set_attr(r, "class", "card-rating");
//!     doc.set_text(r, rating);
//! }
//!
//! // Watch it: annotate titles, then reorder by rating
//! let mut session = PageSession::new(doc);
//! session.start();
//! session.advance(Duration::from_secs(1));
//! assert_eq!(session.stats().sorts, 1);
//! ```
//!
//! ## Embedding against a real page
//!
//! The pipeline is generic over [`dom::DomBackend`]: implement its read /
//! reorder / text / scroll surface for your tree, implement
//! [`control::Scheduler`] over your event loop, and drive a
//! [`control::Controller`] from your mutation subscription. The in-memory
//! [`dom::Document`] and the virtual-clock
//! [`control::StepScheduler`] are reference implementations of both seams.
//!
//! ## Module Overview
//!
//! - [`dom`]: host-tree boundary (backend trait, selector patterns,
//!   in-memory document)
//! - [`select`]: shape table (selector cascade) and container classifier
//! - [`rank`]: text parsing, extraction, annotation, and the sort engine
//! - [`control`]: reactive controller, scheduler, tunables, session
//! - [`error`]: error types and result alias

pub mod control;
pub mod dom;
pub mod error;
pub mod rank;
pub mod select;

pub use control::{Controller, ControllerConfig, ControllerStats, PageSession, Phase};
pub use dom::{Document, DomBackend, NodeId, Pattern};
pub use error::{RankerError, Result};
pub use rank::{CardData, ProcessedSet};
pub use select::{ContainerKind, Shape, ShapeTable};
