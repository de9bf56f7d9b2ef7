//! The per-wafer resource manager: HICANN presence/masking/allocation plus
//! per-chip defect data, and the driver-chain capacity oracle C10 consults.

use crate::defects::Defects;
use crate::error::{ResourceError, ResourceResult};
use crate::manager::Manager;
use std::collections::HashMap;
use whc_coords::{HicannOnWafer, SideHorizontal, SynapseDriverOnHICANN};

/// Inventory of HICANNs on one wafer, plus their loaded defect data.
pub struct WaferResources {
    hicanns: Manager<HicannOnWafer>,
    defects: HashMap<HicannOnWafer, Defects>,
}

impl Default for WaferResources {
    fn default() -> Self {
        WaferResources { hicanns: Manager::new(), defects: HashMap::new() }
    }
}

impl WaferResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_hicann(&mut self, hicann: HicannOnWafer) {
        self.hicanns.load(hicann);
    }

    pub fn has(&self, hicann: &HicannOnWafer) -> bool {
        self.hicanns.has(hicann)
    }

    pub fn mask(&mut self, hicann: HicannOnWafer) -> ResourceResult<()> {
        self.hicanns.mask(hicann)
    }

    pub fn unmask(&mut self, hicann: HicannOnWafer) -> ResourceResult<()> {
        self.hicanns.unmask(hicann)
    }

    pub fn available(&self, hicann: &HicannOnWafer) -> bool {
        self.hicanns.available(hicann)
    }

    pub fn allocate(&mut self, hicann: HicannOnWafer) -> ResourceResult<()> {
        self.hicanns.allocate(hicann)
    }

    pub fn release(&mut self, hicann: HicannOnWafer) -> ResourceResult<()> {
        self.hicanns.release(hicann)
    }

    pub fn present_iter(&self) -> impl Iterator<Item = &HicannOnWafer> {
        self.hicanns.present_iter()
    }

    pub fn available_iter(&self) -> impl Iterator<Item = &HicannOnWafer> {
        self.hicanns.available_iter()
    }

    pub fn allocated_iter(&self) -> impl Iterator<Item = &HicannOnWafer> {
        self.hicanns.allocated_iter()
    }

    /// Lazily loaded per-HICANN defect data; a chip with no entry yet is
    /// assumed fully functional.
    pub fn load_defects(&mut self, hicann: HicannOnWafer, defects: Defects) -> ResourceResult<()> {
        if !self.has(&hicann) {
            return Err(ResourceError::NotPresent);
        }
        self.defects.insert(hicann, defects);
        Ok(())
    }

    pub fn defects(&self, hicann: &HicannOnWafer) -> Option<&Defects> {
        self.defects.get(hicann)
    }

    /// Longest contiguous run of non-defective drivers on one side of a
    /// chip, i.e. `Manager::getMaxChainLength(hicann)`: the minimum over
    /// both sides of each side's longest usable run.
    pub fn max_chain_length(&self, hicann: &HicannOnWafer) -> usize {
        [SideHorizontal::Left, SideHorizontal::Right]
            .into_iter()
            .map(|side| self.longest_usable_run(hicann, side))
            .min()
            .unwrap_or(0)
    }

    fn longest_usable_run(&self, hicann: &HicannOnWafer, side: SideHorizontal) -> usize {
        let defects = self.defects.get(hicann);
        let mut best = 0usize;
        let mut current = 0usize;
        for y in 0..SynapseDriverOnHICANN::SIZE {
            let driver = SynapseDriverOnHICANN::new(side, y).expect("y in range");
            let disabled = defects.map(|d| d.is_synapse_driver_disabled(&driver)).unwrap_or(false);
            if disabled {
                best = best.max(current);
                current = 0;
            } else {
                current += 1;
            }
        }
        best.max(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whc_coords::SynapseDriverOnHICANN;

    fn hicann() -> HicannOnWafer {
        HicannOnWafer::new(18, 8).unwrap()
    }

    #[test]
    fn undefective_chip_has_full_chain_length() {
        let mut wafer = WaferResources::new();
        wafer.load_hicann(hicann());
        assert_eq!(wafer.max_chain_length(&hicann()), SynapseDriverOnHICANN::SIZE as usize);
    }

    #[test]
    fn a_disabled_driver_splits_the_run() {
        let mut wafer = WaferResources::new();
        wafer.load_hicann(hicann());
        let mut defects = Defects::new();
        defects.disable_synapse_driver(SynapseDriverOnHICANN::new(SideHorizontal::Left, 50).unwrap());
        wafer.load_defects(hicann(), defects).unwrap();
        let max = wafer.max_chain_length(&hicann());
        assert!(max < SynapseDriverOnHICANN::SIZE as usize);
        assert_eq!(max, 61);
    }

    #[test]
    fn allocation_requires_presence() {
        let mut wafer = WaferResources::new();
        assert!(wafer.allocate(hicann()).is_err());
        wafer.load_hicann(hicann());
        wafer.allocate(hicann()).unwrap();
        assert!(!wafer.available(&hicann()));
    }
}
