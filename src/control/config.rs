use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the reactive controller.
///
/// Defaults match the behavior the pipeline was tuned against: a handful
/// of bootstrap retries while the page hydrates, a short debounce window
/// for mutation bursts, and a bounded safety-net poll covering the early
/// load phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Maximum bootstrap retries when no cards are found
    pub max_retries: u32,

    /// Delay between bootstrap retries
    pub retry_delay: Duration,

    /// Debounce window for mutation notifications
    pub debounce_delay: Duration,

    /// Delay between the last new annotation and the sort sweep
    pub sort_delay: Duration,

    /// Interval between safety-net poll ticks
    pub safety_net_interval: Duration,

    /// Number of safety-net ticks before the poll gives up
    pub safety_net_ticks: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_delay: Duration::from_millis(1500),
            debounce_delay: Duration::from_millis(400),
            sort_delay: Duration::from_millis(250),
            safety_net_interval: Duration::from_millis(1000),
            safety_net_ticks: 10,
        }
    }
}

impl ControllerConfig {
    /// Create a config with default tunables
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the bootstrap retry bound
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Builder method: set the bootstrap retry delay
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Builder method: set the debounce window
    pub fn debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Builder method: set the post-annotation sort delay
    pub fn sort_delay(mut self, delay: Duration) -> Self {
        self.sort_delay = delay;
        self
    }

    /// Builder method: set the safety-net poll interval and tick budget
    pub fn safety_net(mut self, interval: Duration, ticks: u32) -> Self {
        self.safety_net_interval = interval;
        self.safety_net_ticks = ticks;
        self
    }
}
