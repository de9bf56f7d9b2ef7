//! `Placement`: the multi-indexed result container C6 produces and later
//! stages (merger-tree router, L1 address assignment) annotate in place.

use std::collections::HashMap;
use whc_coords::{DNCMergerOnHICANN, HicannOnWafer, L1Address, NeuronBlockOnHICANN, NeuronOnNeuronBlock};
use whc_graph::VertexId;

use crate::error::{PlaceError, PlaceResult};

/// Identity of one bio-neuron: a population vertex plus its index within
/// that population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BioNeuron {
    pub population: VertexId,
    pub index: usize,
}

/// Identity of the logical (hardware-side) neuron a bio-neuron maps to:
/// stable across the lifetime of one `Placement`, assigned in insertion
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalNeuronId(pub u32);

#[derive(Debug, Clone)]
pub struct PlacementRow {
    pub bio_neuron: BioNeuron,
    pub logical_neuron: LogicalNeuronId,
    pub hicann: HicannOnWafer,
    pub block: NeuronBlockOnHICANN,
    pub denmem: NeuronOnNeuronBlock,
    pub dnc_merger: Option<DNCMergerOnHICANN>,
    pub address: Option<L1Address>,
}

/// Multi-indexed placement result: every successfully placed bio-neuron,
/// indexed by bio-neuron, logical neuron, population vertex, neuron block
/// and (once assigned) DNC merger.
#[derive(Default)]
pub struct Placement {
    rows: Vec<PlacementRow>,
    by_bio_neuron: HashMap<BioNeuron, usize>,
    by_population: HashMap<VertexId, Vec<usize>>,
    by_block: HashMap<(HicannOnWafer, NeuronBlockOnHICANN), Vec<usize>>,
    by_dnc_merger: HashMap<(HicannOnWafer, DNCMergerOnHICANN), Vec<usize>>,
}

impl Placement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        bio_neuron: BioNeuron,
        hicann: HicannOnWafer,
        block: NeuronBlockOnHICANN,
        denmem: NeuronOnNeuronBlock,
    ) -> LogicalNeuronId {
        let logical_neuron = LogicalNeuronId(self.rows.len() as u32);
        let row_idx = self.rows.len();
        self.rows.push(PlacementRow {
            bio_neuron,
            logical_neuron,
            hicann,
            block,
            denmem,
            dnc_merger: None,
            address: None,
        });
        self.by_bio_neuron.insert(bio_neuron, row_idx);
        self.by_population.entry(bio_neuron.population).or_default().push(row_idx);
        self.by_block.entry((hicann, block)).or_default().push(row_idx);
        logical_neuron
    }

    pub fn row(&self, logical_neuron: LogicalNeuronId) -> Option<&PlacementRow> {
        self.rows.get(logical_neuron.0 as usize)
    }

    pub fn by_bio_neuron(&self, bio_neuron: BioNeuron) -> Option<&PlacementRow> {
        self.by_bio_neuron.get(&bio_neuron).map(|&i| &self.rows[i])
    }

    pub fn rows_for_population(&self, population: VertexId) -> impl Iterator<Item = &PlacementRow> {
        self.by_population.get(&population).into_iter().flatten().map(move |&i| &self.rows[i])
    }

    pub fn rows_for_block(&self, hicann: HicannOnWafer, block: NeuronBlockOnHICANN) -> impl Iterator<Item = &PlacementRow> {
        self.by_block.get(&(hicann, block)).into_iter().flatten().map(move |&i| &self.rows[i])
    }

    pub fn rows_for_dnc_merger(&self, hicann: HicannOnWafer, dnc: DNCMergerOnHICANN) -> impl Iterator<Item = &PlacementRow> {
        self.by_dnc_merger.get(&(hicann, dnc)).into_iter().flatten().map(move |&i| &self.rows[i])
    }

    pub fn rows(&self) -> impl Iterator<Item = &PlacementRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record the DNC merger a neuron block was merged onto, for every
    /// already-placed row in that block.
    pub fn assign_dnc_merger(&mut self, hicann: HicannOnWafer, block: NeuronBlockOnHICANN, dnc: DNCMergerOnHICANN) {
        if let Some(indices) = self.by_block.get(&(hicann, block)).cloned() {
            for &idx in &indices {
                self.rows[idx].dnc_merger = Some(dnc);
            }
            self.by_dnc_merger.entry((hicann, dnc)).or_default().extend(indices);
        }
    }

    /// Set the L1 address of one logical neuron's row; fails if no such row
    /// exists.
    pub fn set_address(&mut self, logical_neuron: LogicalNeuronId, address: L1Address) -> PlaceResult<()> {
        let row = self.rows.get_mut(logical_neuron.0 as usize).ok_or(PlaceError::NoSuchLogicalNeuron)?;
        row.address = Some(address);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_lookup_by_every_index() {
        let mut placement = Placement::new();
        let hicann = HicannOnWafer::new(18, 8).unwrap();
        let block = NeuronBlockOnHICANN::new(0).unwrap();
        let denmem = NeuronOnNeuronBlock::new(0, 0).unwrap();
        let bio = BioNeuron { population: VertexId(0), index: 3 };

        let logical = placement.insert(bio, hicann, block, denmem);
        assert_eq!(placement.row(logical).unwrap().bio_neuron, bio);
        assert_eq!(placement.by_bio_neuron(bio).unwrap().logical_neuron, logical);
        assert_eq!(placement.rows_for_population(VertexId(0)).count(), 1);
        assert_eq!(placement.rows_for_block(hicann, block).count(), 1);
    }

    #[test]
    fn set_address_fails_for_unknown_neuron() {
        let mut placement = Placement::new();
        let bogus = LogicalNeuronId(42);
        let addr = L1Address::new(5).unwrap();
        assert!(placement.set_address(bogus, addr).is_err());
    }

    #[test]
    fn assign_dnc_merger_updates_every_row_in_block() {
        let mut placement = Placement::new();
        let hicann = HicannOnWafer::new(18, 8).unwrap();
        let block = NeuronBlockOnHICANN::new(0).unwrap();
        for i in 0..3 {
            let denmem = NeuronOnNeuronBlock::new(i, 0).unwrap();
            placement.insert(BioNeuron { population: VertexId(0), index: i as usize }, hicann, block, denmem);
        }
        let dnc = DNCMergerOnHICANN::new(2).unwrap();
        placement.assign_dnc_merger(hicann, block, dnc);
        assert_eq!(placement.rows_for_dnc_merger(hicann, dnc).count(), 3);
        assert!(placement.rows().all(|r| r.dnc_merger == Some(dnc)));
    }
}
