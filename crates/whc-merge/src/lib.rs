//! L1 address pool and merger-tree routing: collecting neuron blocks onto
//! shared DNC mergers and handing out L1 addresses to the result.

pub mod error;
pub mod pool;
pub mod router;
pub mod strategy;

pub use error::{MergeError, MergeResult};
pub use pool::{L1AddressPool, Mode, PopStrategy};
pub use router::{MergerAssignment, MergerTreeRouter, UnroutableNeuronBlock};
pub use strategy::{AlwaysApprove, ConstrainMergers, MergerStrategy};
