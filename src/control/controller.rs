use crate::control::config::ControllerConfig;
use crate::control::scheduler::{Scheduler, Timer, TimerId};
use crate::dom::DomBackend;
use crate::rank::{annotate, extract, sort_container, ProcessedSet};
use crate::select::{classify_unknown, find_containers, ContainerKind, Shape, ShapeTable};
use indexmap::IndexSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Controller lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No cards discovered yet; bootstrap retries and the safety-net poll
    /// are still active
    Bootstrapping,
    /// At least one pass found cards; only mutation-driven passes remain
    Steady,
}

/// Observable counters for the controller's activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    /// Processing passes run
    pub passes: u64,
    /// Titles annotated
    pub annotations: u64,
    /// Containers sorted
    pub sorts: u64,
    /// Bootstrap retries armed
    pub retries: u32,
}

/// Single-threaded reactive controller.
///
/// Owns the processed-marker sets, the retry/tick counters, and the
/// pending debounce handle, and drives the classify → extract → annotate →
/// sort pipeline from three host-delivered events: [`start`](Self::start),
/// [`on_added_nodes`](Self::on_added_nodes) (mutation batches), and
/// [`on_timer`](Self::on_timer) (fired timers). All entry points are
/// synchronous end to end; redundant work across bursts is collapsed by
/// the debounce timer, and every downstream mutation is idempotent, so a
/// stale timer firing after teardown is harmless.
#[derive(Debug)]
pub struct Controller<N: Copy + Eq + Hash + Debug> {
    config: ControllerConfig,
    table: ShapeTable,
    phase: Phase,
    retries: u32,
    safety_ticks: u32,
    pending_debounce: Option<TimerId>,
    pending_retry: Option<TimerId>,
    card_markers: ProcessedSet<N>,
    container_markers: ProcessedSet<N>,
    stats: ControllerStats,
}

impl<N: Copy + Eq + Hash + Debug> Controller<N> {
    /// Create a controller with the given shape table and tunables
    pub fn new(table: ShapeTable, config: ControllerConfig) -> Self {
        Self {
            config,
            table,
            phase: Phase::Bootstrapping,
            retries: 0,
            safety_ticks: 0,
            pending_debounce: None,
            pending_retry: None,
            card_markers: ProcessedSet::new(),
            container_markers: ProcessedSet::new(),
            stats: ControllerStats::default(),
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Activity counters
    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Shape table driving classification
    pub fn table(&self) -> &ShapeTable {
        &self.table
    }

    /// Run the initial processing pass and arm the safety-net poll
    pub fn start<B, S>(&mut self, dom: &mut B, sched: &mut S)
    where
        B: DomBackend<Node = N>,
        S: Scheduler,
    {
        log::info!("Controller starting");
        self.run_pass(dom, sched);
        if self.config.safety_net_ticks > 0 {
            sched.schedule(self.config.safety_net_interval, Timer::SafetyNet);
        }
    }

    /// Handle a batch of nodes added to the watched tree.
    ///
    /// Irrelevant batches (nothing card- or container-shaped in them) are
    /// dropped; relevant ones collapse into a single debounced pass.
    pub fn on_added_nodes<B, S>(&mut self, dom: &B, sched: &mut S, added: &[N])
    where
        B: DomBackend<Node = N>,
        S: Scheduler,
    {
        if !added.iter().any(|&node| self.is_relevant(dom, node)) {
            return;
        }

        if let Some(id) = self.pending_debounce.take() {
            sched.cancel(id);
        }
        self.pending_debounce = Some(sched.schedule(self.config.debounce_delay, Timer::Debounce));
    }

    /// Handle a fired timer
    pub fn on_timer<B, S>(&mut self, dom: &mut B, sched: &mut S, timer: Timer)
    where
        B: DomBackend<Node = N>,
        S: Scheduler,
    {
        match timer {
            Timer::BootstrapRetry => {
                self.pending_retry = None;
                self.run_pass(dom, sched);
            }
            Timer::Debounce => {
                self.pending_debounce = None;
                self.run_pass(dom, sched);
            }
            Timer::SortSweep => self.run_sort_sweep(dom),
            Timer::SafetyNet => {
                if self.phase == Phase::Steady {
                    return;
                }
                self.safety_ticks += 1;
                self.run_pass(dom, sched);
                if self.phase != Phase::Steady && self.safety_ticks < self.config.safety_net_ticks
                {
                    sched.schedule(self.config.safety_net_interval, Timer::SafetyNet);
                }
            }
        }
    }

    /// One full processing pass: re-query every card shape from the root,
    /// extract + annotate everything unmarked, and arm the sort sweep if
    /// anything new was annotated. Feeds the bootstrap state machine with
    /// the number of cards found.
    fn run_pass<B, S>(&mut self, dom: &mut B, sched: &mut S)
    where
        B: DomBackend<Node = N>,
        S: Scheduler,
    {
        self.stats.passes += 1;

        // Union of all card shapes, first occurrence wins
        let mut cards: IndexSet<N> = IndexSet::new();
        for shape in Shape::CARDS {
            cards.extend(self.table.query_shape(dom, dom.root(), shape));
        }

        let mut annotated = 0u64;
        for &card in &cards {
            if self.card_markers.is_marked(card) {
                continue;
            }
            let data = extract(dom, &self.table, card);
            if annotate(dom, &self.table, &mut self.card_markers, card, &data) {
                annotated += 1;
            }
        }
        self.stats.annotations += annotated;
        log::debug!(
            "Pass #{}: {} card(s), {} newly annotated",
            self.stats.passes,
            cards.len(),
            annotated
        );

        if self.phase == Phase::Bootstrapping {
            if cards.is_empty() {
                if self.retries < self.config.max_retries && self.pending_retry.is_none() {
                    self.retries += 1;
                    self.stats.retries = self.retries;
                    self.pending_retry =
                        Some(sched.schedule(self.config.retry_delay, Timer::BootstrapRetry));
                    log::debug!(
                        "No cards yet, retry {}/{} armed",
                        self.retries,
                        self.config.max_retries
                    );
                }
            } else {
                self.phase = Phase::Steady;
                log::info!("Found {} card(s), controller is steady", cards.len());
            }
        }

        // Let the tree settle before reordering around the new annotations
        if annotated > 0 {
            sched.schedule(self.config.sort_delay, Timer::SortSweep);
        }
    }

    /// Discover containers from the root, classify the structurally
    /// inferred ones, and sort each container at most once.
    fn run_sort_sweep<B>(&mut self, dom: &mut B)
    where
        B: DomBackend<Node = N>,
    {
        let found = find_containers(dom, &self.table, dom.root());
        log::debug!(
            "Sort sweep over {} container(s) ({} carousel, {} browse, {} unknown)",
            found.len(),
            found.carousels.len(),
            found.browse.len(),
            found.unknown.len()
        );

        let mut work: Vec<(N, ContainerKind)> = Vec::new();
        work.extend(
            found
                .carousels
                .iter()
                .map(|&c| (c, ContainerKind::Carousel)),
        );
        work.extend(found.browse.iter().map(|&c| (c, ContainerKind::Browse)));
        for &(container, _) in &found.unknown {
            work.push((container, classify_unknown(dom, &self.table, container)));
        }

        for (container, kind) in work {
            let sorted = sort_container(
                dom,
                &self.table,
                &mut self.card_markers,
                &mut self.container_markers,
                container,
                kind,
            );
            if sorted {
                self.stats.sorts += 1;
            }
        }
    }

    /// A batch is relevant if any added node matches, or contains a
    /// descendant matching, any known card or container shape
    fn is_relevant<B>(&self, dom: &B, node: N) -> bool
    where
        B: DomBackend<Node = N>,
    {
        Shape::CARDS
            .into_iter()
            .chain(Shape::CONTAINERS)
            .any(|shape| {
                self.table.matches_shape(dom, node, shape)
                    || self.table.has_descendant(dom, node, shape)
            })
    }
}
