//! Trait-based seams for the three external collaborators the pipeline
//! consumes. No concrete implementation ships here — parsing a network
//! description, deriving defects from wafer telemetry, and talking to a
//! calibration device are all out of scope.

use whc_graph::BioGraph;
use whc_resource::Defects;

/// Yields the populations and projections to map, already flattened into
/// the bio-graph shape the pipeline consumes.
pub trait NetworkSource {
    type Error: std::fmt::Debug + std::fmt::Display;

    fn load(&self) -> Result<BioGraph, Self::Error>;
}

/// Per-wafer, per-HICANN disabled-component sets.
pub trait DefectProvider {
    type Error: std::fmt::Debug + std::fmt::Display;

    fn defects_for(&self, hicann: whc_coords::HicannOnWafer) -> Result<Defects, Self::Error>;
}

/// Key/value calibration store, loaded lazily per HICANN on first use via
/// a `config`/`init` handshake.
pub trait CalibrationBackend {
    type Error: std::fmt::Debug + std::fmt::Display;

    fn config(&mut self, path: &str, value: &str) -> Result<(), Self::Error>;
    fn init(&mut self, hicann: whc_coords::HicannOnWafer) -> Result<(), Self::Error>;
    fn get(&self, hicann: whc_coords::HicannOnWafer, key: &str) -> Option<String>;
}
