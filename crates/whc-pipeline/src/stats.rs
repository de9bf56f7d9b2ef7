//! Wall-clock duration and result-size counters per pipeline stage, kept
//! separate from the artefacts themselves since they never affect
//! correctness.

use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct StageStats {
    pub duration: Duration,
    pub items_produced: usize,
    pub items_lost: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MappingStats {
    pub placement: StageStats,
    pub merging: StageStats,
    pub addressing: StageStats,
    pub routing: StageStats,
    pub synapses: StageStats,
}

impl MappingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_duration(&self) -> Duration {
        self.placement.duration
            + self.merging.duration
            + self.addressing.duration
            + self.routing.duration
            + self.synapses.duration
    }

    pub fn total_lost(&self) -> usize {
        self.placement.items_lost
            + self.merging.items_lost
            + self.addressing.items_lost
            + self.routing.items_lost
            + self.synapses.items_lost
    }

    pub fn summary(&self) -> String {
        format!(
            "MappingStats {{ placed: {}, merged: {}, addresses_lost: {}, routed: {}, synapses_realized: {}, synapses_lost: {}, total: {:.2?} }}",
            self.placement.items_produced,
            self.merging.items_produced,
            self.addressing.items_lost,
            self.routing.items_produced,
            self.synapses.items_produced,
            self.synapses.items_lost,
            self.total_duration(),
        )
    }
}

impl fmt::Display for MappingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
