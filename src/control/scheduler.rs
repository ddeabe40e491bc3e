use std::time::Duration;

/// The deferred actions the controller can arm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Bootstrap retry after an empty discovery pass
    BootstrapRetry,
    /// Collapsed mutation-burst processing pass
    Debounce,
    /// Container discovery-and-sort sweep after new annotations
    SortSweep,
    /// Bounded periodic re-check during early load
    SafetyNet,
}

/// Handle to a scheduled timer, usable for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Deferred-execution seam between the controller and its host loop.
///
/// All controller work runs on one cooperative timeline: the host arms
/// timers here and later feeds the fired [`Timer`] values back into
/// [`Controller::on_timer`](crate::control::Controller::on_timer). The
/// only timer the controller ever cancels is the debounce timer
/// (cancel-and-reschedule); everything else fires or is ignored by an
/// idempotent handler.
pub trait Scheduler {
    /// Arm a timer; returns a handle usable with [`cancel`](Self::cancel)
    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerId;

    /// Disarm a previously scheduled timer. Unknown or already-fired
    /// handles are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Virtual-clock scheduler for deterministic, single-threaded pumping.
///
/// Timers are kept in fire-time order; [`advance`](Self::advance) moves
/// the clock forward and returns everything that fired, oldest first.
#[derive(Debug, Default)]
pub struct StepScheduler {
    now: Duration,
    next_id: u64,
    pending: Vec<(TimerId, Duration, Timer)>,
}

impl StepScheduler {
    /// Create a scheduler with the clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of armed timers
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Advance the virtual clock and collect the timers that fired, in
    /// fire-time order (insertion order breaks ties)
    pub fn advance(&mut self, dt: Duration) -> Vec<Timer> {
        self.now += dt;
        let now = self.now;

        let mut due: Vec<(TimerId, Duration, Timer)> = Vec::new();
        self.pending.retain(|entry| {
            if entry.1 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });

        due.sort_by_key(|&(id, at, _)| (at, id.0));
        due.into_iter().map(|(_, _, timer)| timer).collect()
    }
}

impl Scheduler for StepScheduler {
    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push((id, self.now + delay, timer));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|&(pending_id, _, _)| pending_id != id);
    }
}
