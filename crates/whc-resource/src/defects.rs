//! Per-HICANN sets of disabled components, as reported by the (out-of-scope)
//! defect data provider.

use std::collections::HashSet;
use whc_coords::{
    DNCMergerOnHICANN, HLineOnHICANN, MergerOnHICANN, NeuronOnHICANN, SynapseDriverOnHICANN,
    SynapseOnHICANN, VLineOnHICANN,
};

/// Disabled components on one chip. Empty by default: a chip with no
/// loaded defect data is assumed fully functional.
#[derive(Debug, Clone, Default)]
pub struct Defects {
    pub hlines: HashSet<HLineOnHICANN>,
    pub vlines: HashSet<VLineOnHICANN>,
    pub mergers: HashSet<MergerOnHICANN>,
    pub dnc_mergers: HashSet<DNCMergerOnHICANN>,
    pub neurons: HashSet<NeuronOnHICANN>,
    pub synapses: HashSet<SynapseOnHICANN>,
    pub synapse_drivers: HashSet<SynapseDriverOnHICANN>,
}

impl Defects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable_hline(&mut self, line: HLineOnHICANN) {
        self.hlines.insert(line);
    }

    pub fn disable_vline(&mut self, line: VLineOnHICANN) {
        self.vlines.insert(line);
    }

    pub fn disable_neuron(&mut self, neuron: NeuronOnHICANN) {
        self.neurons.insert(neuron);
    }

    pub fn disable_synapse(&mut self, synapse: SynapseOnHICANN) {
        self.synapses.insert(synapse);
    }

    pub fn is_hline_disabled(&self, line: &HLineOnHICANN) -> bool {
        self.hlines.contains(line)
    }

    pub fn is_vline_disabled(&self, line: &VLineOnHICANN) -> bool {
        self.vlines.contains(line)
    }

    pub fn is_neuron_disabled(&self, neuron: &NeuronOnHICANN) -> bool {
        self.neurons.contains(neuron)
    }

    pub fn is_synapse_disabled(&self, synapse: &SynapseOnHICANN) -> bool {
        self.synapses.contains(synapse)
    }

    pub fn disable_synapse_driver(&mut self, driver: SynapseDriverOnHICANN) {
        self.synapse_drivers.insert(driver);
    }

    pub fn is_synapse_driver_disabled(&self, driver: &SynapseDriverOnHICANN) -> bool {
        self.synapse_drivers.contains(driver)
    }
}
