//! The neuron placer: a builder-with-validation pass assigning each
//! `NeuronPlacementRequest` a contiguous denmem rectangle in one neuron
//! block.

use std::collections::HashMap;
use whc_coords::{HicannOnWafer, NeuronBlockOnHICANN, NeuronOnNeuronBlock};
use whc_graph::VertexId;
use whc_resource::WaferResources;

use crate::block::OnNeuronBlock;
use crate::placement::{BioNeuron, Placement};
use crate::request::{NeuronPlacementRequest, Pin};

/// A request that could not be placed anywhere; its bio-neurons are later
/// recorded as synapse loss by the caller.
#[derive(Debug, Clone)]
pub struct PlacementLoss {
    pub population: VertexId,
    pub slice: (usize, usize),
}

/// Builder collecting requests before running the placement pass.
#[derive(Default)]
pub struct Placer {
    requests: Vec<NeuronPlacementRequest>,
}

impl Placer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(mut self, request: NeuronPlacementRequest) -> Self {
        self.requests.push(request);
        self
    }

    pub fn with_requests(mut self, requests: impl IntoIterator<Item = NeuronPlacementRequest>) -> Self {
        self.requests.extend(requests);
        self
    }

    /// Run the pass: pinned requests first, then unpinned by descending
    /// priority; each request claims the first block (in HICANN/block
    /// enumeration order) with a large-enough defect-free run.
    pub fn place(mut self, resources: &WaferResources) -> (Placement, Vec<PlacementLoss>) {
        self.requests.sort_by(|a, b| {
            let pinned = |r: &NeuronPlacementRequest| r.pin.is_none() as u8;
            pinned(a).cmp(&pinned(b)).then(b.priority.cmp(&a.priority))
        });

        let mut placement = Placement::new();
        let mut grids: HashMap<(HicannOnWafer, NeuronBlockOnHICANN), OnNeuronBlock> = HashMap::new();
        let mut losses = Vec::new();

        for request in &self.requests {
            match self.try_place_one(request, resources, &mut grids, &mut placement) {
                Some(()) => {}
                None => {
                    log::warn!("no defect-free block large enough for population {:?} slice {:?}", request.population, request.slice);
                    losses.push(PlacementLoss { population: request.population, slice: request.slice });
                }
            }
        }

        (placement, losses)
    }

    fn candidate_blocks(&self, request: &NeuronPlacementRequest, resources: &WaferResources) -> Vec<(HicannOnWafer, NeuronBlockOnHICANN)> {
        match request.pin {
            Some(Pin::Block(h, b)) => vec![(h, b)],
            Some(Pin::Hicann(h)) => NeuronBlockOnHICANN::iter_all().map(|b| (h, b)).collect(),
            None => resources
                .present_iter()
                .flat_map(|&h| NeuronBlockOnHICANN::iter_all().map(move |b| (h, b)))
                .collect(),
        }
    }

    fn try_place_one(
        &self,
        request: &NeuronPlacementRequest,
        resources: &WaferResources,
        grids: &mut HashMap<(HicannOnWafer, NeuronBlockOnHICANN), OnNeuronBlock>,
        placement: &mut Placement,
    ) -> Option<()> {
        let width = request.width();
        for (hicann, block) in self.candidate_blocks(request, resources) {
            let defects = block_defects(resources, hicann, block);
            let grid = grids.entry((hicann, block)).or_default();
            if let Some(x_start) = grid.find_free_rect(width, &defects) {
                let owner_id = placement.len();
                grid.place(x_start, width, owner_id);
                for bio_index in request.slice.0..request.slice.1 {
                    let local = bio_index - request.slice.0;
                    let x = x_start as usize + local * request.hw_neuron_size as usize;
                    let denmem = NeuronOnNeuronBlock::new(x as u8, 0).expect("x within block width");
                    placement.insert(
                        BioNeuron { population: request.population, index: bio_index },
                        hicann,
                        block,
                        denmem,
                    );
                }
                return Some(());
            }
        }
        None
    }
}

fn block_defects(
    resources: &WaferResources,
    hicann: HicannOnWafer,
    block: NeuronBlockOnHICANN,
) -> std::collections::HashSet<NeuronOnNeuronBlock> {
    resources
        .defects(&hicann)
        .map(|d| {
            d.neurons
                .iter()
                .filter(|n| n.block() == block)
                .map(|n| n.on_block())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use whc_coords::NeuronOnHICANN;
    use whc_resource::Defects;

    fn hicann() -> HicannOnWafer {
        HicannOnWafer::new(18, 8).unwrap()
    }

    fn wafer_with_one_hicann() -> WaferResources {
        let mut w = WaferResources::new();
        w.load_hicann(hicann());
        w
    }

    #[test]
    fn unpinned_request_lands_on_first_available_block() {
        let wafer = wafer_with_one_hicann();
        let placer = Placer::new().with_request(NeuronPlacementRequest::new(VertexId(0), (0, 4), 2));
        let (placement, losses) = placer.place(&wafer);
        assert!(losses.is_empty());
        assert_eq!(placement.len(), 4);
    }

    #[test]
    fn pinned_requests_are_placed_before_unpinned_ones() {
        let wafer = wafer_with_one_hicann();
        let block0 = NeuronBlockOnHICANN::new(0).unwrap();
        // Unpinned request first in insertion order, pinned request second;
        // pinned must still win block 0 because it sorts first.
        let big_unpinned = NeuronPlacementRequest::new(VertexId(0), (0, 16), 2).with_priority(100);
        let pinned = NeuronPlacementRequest::new(VertexId(1), (0, 1), 1).with_pin(Pin::Block(hicann(), block0));
        let placer = Placer::new().with_request(big_unpinned).with_request(pinned);
        let (placement, losses) = placer.place(&wafer);
        assert!(losses.is_empty());
        let pinned_row = placement.by_bio_neuron(BioNeuron { population: VertexId(1), index: 0 }).unwrap();
        assert_eq!(pinned_row.denmem.x(), 0);
    }

    #[test]
    fn defective_denmems_are_never_used() {
        let mut wafer = wafer_with_one_hicann();
        let block0 = NeuronBlockOnHICANN::new(0).unwrap();
        let mut defects = Defects::new();
        for x in 0..2 {
            defects.disable_neuron(NeuronOnHICANN::new(block0, whc_coords::NeuronOnNeuronBlock::new(x, 0).unwrap()));
        }
        wafer.load_defects(hicann(), defects).unwrap();

        let placer = Placer::new().with_request(NeuronPlacementRequest::new(VertexId(0), (0, 1), 2));
        let (placement, losses) = placer.place(&wafer);
        assert!(losses.is_empty());
        let row = placement.by_bio_neuron(BioNeuron { population: VertexId(0), index: 0 }).unwrap();
        assert_eq!(row.denmem.x(), 2);
    }

    #[test]
    fn request_too_wide_for_any_block_is_recorded_as_loss() {
        let wafer = wafer_with_one_hicann();
        let placer = Placer::new().with_request(NeuronPlacementRequest::new(VertexId(0), (0, 100), 1));
        let (placement, losses) = placer.place(&wafer);
        assert!(placement.is_empty());
        assert_eq!(losses.len(), 1);
    }
}
