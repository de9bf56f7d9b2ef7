//! Merger-tree router: groups adjacent neuron blocks onto shared DNC
//! mergers subject to tree reachability, address-pool capacity and an
//! optional feasibility oracle.

use whc_coords::{DNCMergerOnHICANN, L1Address, MergerOnHICANN};
use whc_graph::MergerTreeGraph;

use crate::strategy::{ConstrainMergers, MergerStrategy};

/// Ground truth's centre-outward candidate order; `None` denotes the
/// special all-blocks-onto-`DNCMerger3` leading pass.
const CANDIDATE_ORDER: [Option<u8>; 9] = [None, Some(5), Some(3), Some(1), Some(6), Some(4), Some(2), Some(7), Some(0)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergerAssignment {
    pub dnc: DNCMergerOnHICANN,
    pub blocks: Vec<u8>,
}

/// A neuron block the router could not collect onto any DNC merger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnroutableNeuronBlock(pub u8);

pub struct MergerTreeRouter<'a> {
    strategy: MergerStrategy,
    constrain: Option<&'a dyn ConstrainMergers>,
}

impl<'a> MergerTreeRouter<'a> {
    pub fn new(strategy: MergerStrategy) -> Self {
        MergerTreeRouter { strategy, constrain: None }
    }

    pub fn with_oracle(mut self, oracle: &'a dyn ConstrainMergers) -> Self {
        self.constrain = Some(oracle);
        self
    }

    /// `block_counts[i]` is the number of bio-addresses placed in neuron
    /// block `i` (0..7). Returns the committed assignments plus any block
    /// that could not be routed at all.
    pub fn route(&self, block_counts: [usize; 8]) -> (Vec<MergerAssignment>, Vec<UnroutableNeuronBlock>) {
        let mut graph = MergerTreeGraph::new();
        let mut assigned = [false; 8];
        let mut used_dncs = [false; 8];
        let mut assignments = Vec::new();
        let capacity = L1Address::capacity() as usize;

        if self.strategy != MergerStrategy::OneToOne {
            if let Some(assignment) = self.try_dnc3_pass(&mut graph, &block_counts, &mut assigned, capacity) {
                used_dncs[assignment.dnc.value() as usize] = true;
                assignments.push(assignment);
            }
        }

        for candidate in CANDIDATE_ORDER.iter().skip(1).filter_map(|c| *c) {
            if self.strategy == MergerStrategy::OneToOne {
                break;
            }
            let dnc = DNCMergerOnHICANN::new(candidate).expect("candidate in range");
            if let Some(assignment) = self.try_merge(&mut graph, dnc, &block_counts, &mut assigned, capacity) {
                used_dncs[dnc.value() as usize] = true;
                assignments.push(assignment);
            }
        }

        // Leftover blocks: one_to_one fallback, or not yet assigned under a
        // merging strategy, land on the first still-free DNC merger whose
        // remaining tree path still reaches them.
        let mut unroutable = Vec::new();
        for block in 0u8..8 {
            if assigned[block as usize] {
                continue;
            }
            match self.route_single(&mut graph, &mut used_dncs, block) {
                Some(assignment) => {
                    assigned[block as usize] = true;
                    assignments.push(assignment);
                }
                None => {
                    log::warn!("neuron block {block} could not be routed onto any DNC merger");
                    unroutable.push(UnroutableNeuronBlock(block));
                }
            }
        }

        (assignments, unroutable)
    }

    fn central_block(dnc: DNCMergerOnHICANN) -> u8 {
        let mut m = dnc.source_merger();
        while m.level() > 0 {
            m = m.children().expect("non-leaf has children").0;
        }
        m.index()
    }

    fn try_dnc3_pass(
        &self,
        graph: &mut MergerTreeGraph,
        block_counts: &[usize; 8],
        assigned: &mut [bool; 8],
        capacity: usize,
    ) -> Option<MergerAssignment> {
        let dnc3 = DNCMergerOnHICANN::new(3).expect("index 3 in range");
        let total: usize = block_counts.iter().sum();
        if total > capacity {
            return None;
        }
        let source = graph.vertex_of_dnc(dnc3);
        let reachable: Vec<u8> = graph.reachable_leaves(source).iter().map(|m| m.index()).collect();
        if reachable.len() != 8 {
            return None;
        }
        let blocks: Vec<u8> = (0u8..8).collect();
        if let Some(oracle) = self.constrain {
            if !oracle.approve(3, &blocks) {
                return None;
            }
        }
        let blocks = trim_trailing_empty(&blocks, block_counts, 3);
        for &b in &blocks {
            assigned[b as usize] = true;
            let m = MergerOnHICANN::new(0, b).expect("block index is a valid Merger0 index");
            graph.remove(graph.vertex_of_merger(m));
        }
        Some(MergerAssignment { dnc: dnc3, blocks })
    }

    fn try_merge(
        &self,
        graph: &mut MergerTreeGraph,
        dnc: DNCMergerOnHICANN,
        block_counts: &[usize; 8],
        assigned: &mut [bool; 8],
        capacity: usize,
    ) -> Option<MergerAssignment> {
        let central = Self::central_block(dnc);
        if assigned[central as usize] {
            return None;
        }
        let source = graph.vertex_of_dnc(dnc);
        let reachable: std::collections::HashSet<u8> = graph.reachable_leaves(source).iter().map(|m| m.index()).collect();
        if !reachable.contains(&central) {
            return None;
        }

        let mut blocks = vec![central];
        let mut total = block_counts[central as usize];
        let mut left = central as i16 - 1;
        let mut right = central as i16 + 1;

        if self.strategy != MergerStrategy::OneToOne {
            loop {
                let mut extended = false;
                if left >= 0 && !assigned[left as usize] && reachable.contains(&(left as u8)) {
                    let candidate_total = total + block_counts[left as usize];
                    if candidate_total <= capacity {
                        let mut trial = blocks.clone();
                        trial.push(left as u8);
                        if self.constrain.map(|o| o.approve(dnc.value(), &trial)).unwrap_or(true) {
                            blocks.push(left as u8);
                            total = candidate_total;
                            left -= 1;
                            extended = true;
                        }
                    }
                }
                if right < 8 && !assigned[right as usize] && reachable.contains(&(right as u8)) {
                    let candidate_total = total + block_counts[right as usize];
                    if candidate_total <= capacity {
                        let mut trial = blocks.clone();
                        trial.push(right as u8);
                        if self.constrain.map(|o| o.approve(dnc.value(), &trial)).unwrap_or(true) {
                            blocks.push(right as u8);
                            total = candidate_total;
                            right += 1;
                            extended = true;
                        }
                    }
                }
                if !extended {
                    break;
                }
            }
        }

        blocks.sort_unstable();
        for &b in &blocks {
            assigned[b as usize] = true;
            let m = MergerOnHICANN::new(0, b).expect("block index is a valid Merger0 index");
            graph.remove(graph.vertex_of_merger(m));
        }
        Some(MergerAssignment { dnc, blocks })
    }

    /// Fallback for a block none of the candidate passes claimed: hand it to
    /// the first still-unused DNC merger whose tree path still reaches it,
    /// preferring the DNC merger whose natural central block this is.
    fn route_single(&self, graph: &mut MergerTreeGraph, used_dncs: &mut [bool; 8], block: u8) -> Option<MergerAssignment> {
        let mut candidates: Vec<u8> = (0u8..8).filter(|&i| !used_dncs[i as usize]).collect();
        candidates.sort_by_key(|&i| Self::central_block(DNCMergerOnHICANN::new(i).expect("index in range")) != block);
        for dnc_idx in candidates {
            let dnc = DNCMergerOnHICANN::new(dnc_idx).expect("index in range");
            let source = graph.vertex_of_dnc(dnc);
            if graph.reachable_leaves(source).iter().any(|m| m.index() == block) {
                let m = MergerOnHICANN::new(0, block).expect("block index valid");
                graph.remove(graph.vertex_of_merger(m));
                used_dncs[dnc_idx as usize] = true;
                return Some(MergerAssignment { dnc, blocks: vec![block] });
            }
        }
        None
    }
}

/// Drop empty (zero-count) blocks from the outer ends of `blocks`, never
/// trimming `never_trim`.
fn trim_trailing_empty(blocks: &[u8], block_counts: &[usize; 8], never_trim: u8) -> Vec<u8> {
    let mut start = 0usize;
    let mut end = blocks.len();
    while start < end && blocks[start] != never_trim && block_counts[blocks[start] as usize] == 0 {
        start += 1;
    }
    while end > start && blocks[end - 1] != never_trim && block_counts[blocks[end - 1] as usize] == 0 {
        end -= 1;
    }
    blocks[start..end].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dnc3_pass_collects_all_blocks_when_capacity_allows() {
        let router = MergerTreeRouter::new(MergerStrategy::MinimizeNumberOfSendingRepeaters);
        let counts = [1, 1, 1, 1, 1, 1, 1, 1];
        let (assignments, unroutable) = router.route(counts);
        assert!(unroutable.is_empty());
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].dnc.value(), 3);
        assert_eq!(assignments[0].blocks, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn one_to_one_never_merges() {
        let router = MergerTreeRouter::new(MergerStrategy::OneToOne);
        let counts = [1, 1, 1, 1, 1, 1, 1, 1];
        let (assignments, unroutable) = router.route(counts);
        assert!(unroutable.is_empty());
        assert_eq!(assignments.len(), 8);
        assert!(assignments.iter().all(|a| a.blocks.len() == 1));
    }

    #[test]
    fn capacity_overflow_forces_splitting_out_of_the_dnc3_pass() {
        let router = MergerTreeRouter::new(MergerStrategy::MinimizeNumberOfSendingRepeaters);
        let counts = [30, 30, 30, 30, 30, 30, 30, 30];
        let (assignments, unroutable) = router.route(counts);
        assert!(unroutable.is_empty());
        assert!(assignments.len() > 1);
        for a in &assignments {
            let total: usize = a.blocks.iter().map(|&b| counts[b as usize]).sum();
            assert!(total <= 59);
        }
    }

    #[test]
    fn trim_never_removes_the_central_block() {
        let counts = [0, 0, 0, 5, 0, 0, 0, 0];
        let blocks: Vec<u8> = (0..8).collect();
        let trimmed = trim_trailing_empty(&blocks, &counts, 3);
        assert_eq!(trimmed, vec![3]);
    }

    /// Two adjacent, low-occupancy blocks collate onto one DNC merger
    /// rather than each claiming its own.
    #[test]
    fn adjacent_low_occupancy_blocks_collate_onto_one_merger() {
        let router = MergerTreeRouter::new(MergerStrategy::MinimizeNumberOfSendingRepeaters);
        let mut counts = [0usize; 8];
        counts[2] = 12;
        counts[3] = 32;
        let (assignments, unroutable) = router.route(counts);
        assert!(unroutable.is_empty());
        let owner = assignments.iter().find(|a| a.blocks.contains(&2)).expect("block 2 assigned");
        assert!(owner.blocks.contains(&3), "blocks 2 and 3 should collate onto the same merger");
    }

    /// Three blocks whose combined bio count exceeds the 59-address cap
    /// must split across at least two DNC mergers, each under the cap.
    #[test]
    fn over_capacity_blocks_split_across_mergers_under_the_cap() {
        let router = MergerTreeRouter::new(MergerStrategy::MinimizeNumberOfSendingRepeaters);
        let mut counts = [0usize; 8];
        counts[3] = 32;
        counts[4] = 26;
        counts[5] = 32;
        let (assignments, unroutable) = router.route(counts);
        assert!(unroutable.is_empty());
        let block3_owner = assignments.iter().find(|a| a.blocks.contains(&3)).expect("block 3 assigned").dnc;
        let block4_owner = assignments.iter().find(|a| a.blocks.contains(&4)).expect("block 4 assigned").dnc;
        let block5_owner = assignments.iter().find(|a| a.blocks.contains(&5)).expect("block 5 assigned").dnc;
        assert_eq!(block4_owner, block5_owner, "blocks 4 and 5 must land together");
        assert_ne!(block3_owner, block4_owner, "block 3 must land on a different merger");
        for a in &assignments {
            let total: usize = a.blocks.iter().map(|&b| counts[b as usize]).sum();
            assert!(total <= 59);
        }
    }
}
