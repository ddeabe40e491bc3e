use crate::control::config::ControllerConfig;
use crate::control::controller::{Controller, ControllerStats, Phase};
use crate::control::scheduler::StepScheduler;
use crate::dom::{Document, NodeId};
use crate::select::ShapeTable;
use std::time::Duration;

/// Owning façade over a [`Document`], a [`StepScheduler`], and a
/// [`Controller`], wired together on one cooperative timeline.
///
/// Embedders with a real page implement [`DomBackend`](crate::dom::DomBackend)
/// and a [`Scheduler`](crate::control::Scheduler) and drive a `Controller`
/// directly; `PageSession` is the batteries-included variant for tests,
/// fixtures, and offline snapshots.
#[derive(Debug)]
pub struct PageSession {
    document: Document,
    scheduler: StepScheduler,
    controller: Controller<NodeId>,
    started: bool,
}

impl PageSession {
    /// Wrap a document with default shapes and tunables
    pub fn new(document: Document) -> Self {
        Self::with_config(document, ShapeTable::default(), ControllerConfig::default())
    }

    /// Build a session from a JSON snapshot of a page subtree
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(Self::new(Document::from_json(json)?))
    }

    /// Wrap a document with a site-specific shape table and tunables
    pub fn with_config(document: Document, table: ShapeTable, config: ControllerConfig) -> Self {
        Self {
            document,
            scheduler: StepScheduler::new(),
            controller: Controller::new(table, config),
            started: false,
        }
    }

    /// Begin watching the document: runs the initial processing pass and
    /// subscribes to subsequent node additions
    pub fn start(&mut self) {
        self.document.track_changes();
        self.controller.start(&mut self.document, &mut self.scheduler);
        self.started = true;
    }

    /// Stop watching. Armed timers are not cancelled; if the host fires
    /// them anyway they land on idempotent handlers.
    pub fn stop(&mut self) {
        self.document.untrack_changes();
        self.started = false;
    }

    /// Deliver any batched node additions to the controller
    pub fn pump(&mut self) {
        let added = self.document.take_added();
        if self.started && !added.is_empty() {
            self.controller
                .on_added_nodes(&self.document, &mut self.scheduler, &added);
        }
    }

    /// Advance the virtual clock, delivering pending additions first and
    /// then firing due timers into the controller
    pub fn advance(&mut self, dt: Duration) {
        self.pump();
        for timer in self.scheduler.advance(dt) {
            if self.started {
                self.controller
                    .on_timer(&mut self.document, &mut self.scheduler, timer);
            }
        }
    }

    /// The watched document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the watched document (host-side mutations)
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Controller lifecycle phase
    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Controller activity counters
    pub fn stats(&self) -> ControllerStats {
        self.controller.stats()
    }
}
