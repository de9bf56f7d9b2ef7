//! Coordinate algebra for the wafer-scale mapping core.
//!
//! Every type here is a zero-cost newtype over the integers that validates
//! its range (and, for wafer positions, the wafer's non-rectangular shape)
//! at construction. Neighbour queries (`north`/`south`/`east`/`west`,
//! `parent`/`children`, ...) return [`error::CoordResult`] rather than
//! panicking or saturating, so an invalid neighbour is always an explicit
//! error at the call site instead of a value that can silently propagate
//! into a route.

pub mod address;
pub mod bus;
pub mod error;
pub mod merger;
pub mod neuron;
pub mod synapse;
pub mod wafer;

pub use address::L1Address;
pub use bus::{
    crossbar_exists, HLineOnHICANN, HRepeaterOnHICANN, SideHorizontal, SideVertical,
    VLineOnHICANN, VRepeaterOnHICANN, CROSSBAR_PERIOD,
};
pub use error::{CoordError, CoordResult};
pub use merger::{DNCMergerOnHICANN, GbitLinkOnHICANN, MergerOnHICANN, RepeaterBlockOnHICANN};
pub use neuron::{NeuronBlockOnHICANN, NeuronOnHICANN, NeuronOnNeuronBlock};
pub use synapse::{
    SynapseColumnOnHICANN, SynapseDriverOnHICANN, SynapseOnHICANN, SynapseRowOnHICANN,
};
pub use wafer::{iter_all_hicanns, wafer_mask_contains, HicannOnWafer, WaferIndex, WAFER_HEIGHT, WAFER_WIDTH};
