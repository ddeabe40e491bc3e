//! Reactive control plane
//!
//! A single-threaded [`Controller`] keeps the ranking pipeline in sync
//! with a mutating tree: bootstrap retries while the page hydrates, a
//! debounce window collapsing mutation bursts into one pass, a bounded
//! safety-net poll for changes the subscription races against, and a
//! deferred container sort sweep after new annotations. [`PageSession`]
//! bundles a controller with the in-memory document and a virtual-clock
//! scheduler.

pub mod config;
pub mod controller;
pub mod scheduler;
pub mod session;

pub use config::ControllerConfig;
pub use controller::{Controller, ControllerStats, Phase};
pub use scheduler::{Scheduler, StepScheduler, Timer, TimerId};
pub use session::PageSession;
