//! Small value types the seven-stage requirement count is keyed and
//! grouped by.

use whc_coords::SideHorizontal;

/// Opaque identifier of a target neuron on a HICANN; the caller supplies
/// whatever numbering its placement step already produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NeuronOnHicann(pub u32);

/// A synaptic-input kind (e.g. excitatory/inhibitory); opaque beyond
/// equality, since the target-mapping table only needs to keep kinds
/// apart from each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SynapseType(pub u8);

/// The 2 most-significant bits of a driver's decoder, one of 4 values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DriverDecoder(pub u8);

impl DriverDecoder {
    pub const SIZE: u8 = 4;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StpMode {
    Depression,
    Facilitation,
    Off,
}

pub const STP_MODES: [StpMode; 3] = [StpMode::Depression, StpMode::Facilitation, StpMode::Off];

/// Column parity a half-row serves, or `Any` when both are equally good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TriParity {
    Even,
    Odd,
    Any,
}

/// Resolved, binary column parity (post parity-resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Parity {
    Even,
    Odd,
}

pub use SideHorizontal as Side;
