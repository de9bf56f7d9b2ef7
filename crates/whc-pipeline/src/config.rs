//! The pipeline's external configuration surface: user pins, per-stage
//! strategy choices and seeds, and per-projection priorities.

use std::collections::HashMap;

use whc_coords::{HicannOnWafer, NeuronBlockOnHICANN};
use whc_graph::{EdgeId, SwitchOrdering, VertexId};
use whc_merge::{MergerStrategy, PopStrategy};

/// Where the L1 router looks for a path: the cheap single-backbone walk,
/// or the exhaustive Dijkstra fallback over the whole chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L1Algorithm {
    Backbone,
    Dijkstra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserPin {
    Block(HicannOnWafer, NeuronBlockOnHICANN),
    Hicann(HicannOnWafer),
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub user_pins: HashMap<VertexId, UserPin>,
    pub hw_neuron_size: u8,
    pub merger_strategy: MergerStrategy,
    pub l1_address_strategy: PopStrategy,
    pub l1_algorithm: L1Algorithm,
    pub switch_ordering: SwitchOrdering,
    pub projection_priorities: HashMap<EdgeId, f64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            user_pins: HashMap::new(),
            hw_neuron_size: 1,
            merger_strategy: MergerStrategy::MinimizeNumberOfSendingRepeaters,
            l1_address_strategy: PopStrategy::HighFirst,
            l1_algorithm: L1Algorithm::Backbone,
            switch_ordering: SwitchOrdering::InEnumOrder,
            projection_priorities: HashMap::new(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin(&self, population: VertexId) -> Option<UserPin> {
        self.user_pins.get(&population).copied()
    }

    /// Per-projection priority, defaulting to 1.0 (the spec's floor for
    /// unpinned real-number priorities).
    pub fn priority_of(&self, edge: EdgeId) -> f64 {
        self.projection_priorities.get(&edge).copied().unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_defaults_to_one() {
        let config = PipelineConfig::new();
        assert_eq!(config.priority_of(EdgeId(3)), 1.0);
    }
}
