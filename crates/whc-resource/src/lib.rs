//! Per-wafer resource inventory: HICANN presence, user masking, allocation,
//! and the defect data that drives the synapse-driver capacity oracle.

pub mod defects;
pub mod error;
pub mod manager;
pub mod wafer;

pub use defects::Defects;
pub use error::{ResourceError, ResourceResult};
pub use manager::Manager;
pub use wafer::WaferResources;
