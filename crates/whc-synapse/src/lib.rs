//! Synapse driver requirement counting, chain allocation, target mapping
//! and loss accounting.

pub mod allocation;
pub mod error;
pub mod loss;
pub mod requirements;
pub mod target_mapping;
pub mod types;

pub use allocation::{allocate_chain, ConnectedSynapseDrivers, DriverMode};
pub use error::{SynapseError, SynapseResult};
pub use loss::{is_real_weight, SynapseLoss};
pub use requirements::{
    count_drivers, count_drivers_per_stp, count_half_rows, count_half_rows_per_input_granularity,
    count_half_rows_per_side, count_half_rows_vec, count_rows_per_side, count_synapses_per_neuron,
    drivers_possible, more_drivers_possible, InputGranularity, SynapseCounts, SynapseEvent,
};
pub use target_mapping::simple_mapping;
pub use types::{DriverDecoder, NeuronOnHicann, Parity, Side, StpMode, SynapseType, TriParity, STP_MODES};
