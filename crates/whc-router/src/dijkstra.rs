//! Dijkstra-based router over the full `L1RoutingGraph`, enforcing the
//! "one switch per bus" rule: a horizontal line may be entered by at most
//! one distinct crossbar switch across every accepted path.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use whc_graph::{L1Bus, L1RoutingGraph};

use crate::target::{Orientation, Target};
use crate::weights::L1EdgeWeights;

pub struct L1DijkstraRouter<'a> {
    graph: &'a L1RoutingGraph,
    weights: &'a L1EdgeWeights,
    source: usize,
    targets: Vec<Target>,
}

/// The outcome of a single `run()`: every vertex's shortest-path
/// predecessor, plus which vertex (if any) satisfied each registered
/// target once the one-switch-per-bus rule was enforced.
pub struct DijkstraResult {
    source: usize,
    predecessors: HashMap<usize, usize>,
    reached: HashMap<Target, usize>,
}

impl DijkstraResult {
    pub fn reached_vertex(&self, target: Target) -> Option<usize> {
        self.reached.get(&target).copied()
    }

    /// Walk predecessors from `vertex` back to the router's source,
    /// returning the path in source-to-target order.
    pub fn path_to_vertex(&self, vertex: usize) -> Vec<usize> {
        let mut path = vec![vertex];
        let mut cur = vertex;
        while cur != self.source {
            match self.predecessors.get(&cur) {
                Some(&p) => {
                    path.push(p);
                    cur = p;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    pub fn path_to(&self, target: Target) -> Option<Vec<usize>> {
        self.reached_vertex(target).map(|v| self.path_to_vertex(v))
    }
}

impl<'a> L1DijkstraRouter<'a> {
    pub fn new(graph: &'a L1RoutingGraph, weights: &'a L1EdgeWeights, source: usize) -> Self {
        L1DijkstraRouter { graph, weights, source, targets: Vec::new() }
    }

    pub fn add_target(&mut self, target: Target) {
        self.targets.push(target);
    }

    /// True when traversing from `from` to `to` crosses a crossbar switch
    /// (same chip, opposite bus orientation) rather than a plain chip
    /// continuation edge or an intra-orientation hop.
    fn crosses_switch(&self, from: usize, to: usize) -> bool {
        let a = self.graph.bus(from);
        let b = self.graph.bus(to);
        a.hicann() == b.hicann() && matches!((a, b), (L1Bus::Horizontal(..), L1Bus::Vertical(..)) | (L1Bus::Vertical(..), L1Bus::Horizontal(..)))
    }

    pub fn run(&self) -> DijkstraResult {
        let n = self.graph.num_vertices();
        let mut dist = vec![u32::MAX; n];
        let mut predecessors: HashMap<usize, usize> = HashMap::new();
        let mut visited = vec![false; n];
        let mut used_switches: HashMap<usize, usize> = HashMap::new();
        let mut blocked: HashSet<usize> = HashSet::new();
        let mut heap = BinaryHeap::new();

        let mut by_vertex: HashMap<usize, Vec<Target>> = HashMap::new();
        for v in 0..n {
            let bus = self.graph.bus(v);
            for &t in &self.targets {
                let orientation_matches = matches!(
                    (bus, t.orientation),
                    (L1Bus::Horizontal(..), Orientation::Horizontal) | (L1Bus::Vertical(..), Orientation::Vertical)
                );
                if bus.hicann() == t.hicann && orientation_matches {
                    by_vertex.entry(v).or_default().push(t);
                }
            }
        }

        dist[self.source] = 0;
        heap.push(Reverse((0u32, self.source)));
        let mut reached: HashMap<Target, usize> = HashMap::new();

        while let Some(Reverse((d, v))) = heap.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;

            // finish_vertex hook: a vertex entered through a second,
            // different switch onto an already-claimed H-line is rejected
            // and never expanded further.
            if let Some(&p) = predecessors.get(&v) {
                if self.crosses_switch(p, v) {
                    match used_switches.get(&v) {
                        Some(&existing) if existing != p => {
                            blocked.insert(v);
                        }
                        _ => {
                            used_switches.insert(v, p);
                        }
                    }
                }
            }
            if blocked.contains(&v) {
                continue;
            }

            if let Some(ts) = by_vertex.get(&v) {
                for t in ts {
                    reached.entry(*t).or_insert(v);
                }
            }

            for neighbour in self.graph.neighbours(v) {
                if visited[neighbour] {
                    continue;
                }
                let w = self.weights.weight(v, neighbour);
                let nd = d.saturating_add(w);
                if nd < dist[neighbour] {
                    dist[neighbour] = nd;
                    predecessors.insert(neighbour, v);
                    heap.push(Reverse((nd, neighbour)));
                }
            }
        }

        DijkstraResult { source: self.source, predecessors, reached }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whc_coords::HicannOnWafer;
    use whc_graph::SwitchOrdering;

    fn hicann(x: u16, y: u16) -> HicannOnWafer {
        HicannOnWafer::new(x, y).unwrap()
    }

    #[test]
    fn finds_a_path_to_a_vertical_target_on_the_same_chip() {
        let mut graph = L1RoutingGraph::new();
        let h = hicann(18, 8);
        graph.add(h, SwitchOrdering::InEnumOrder);
        let source = graph.hline_vertex(h, whc_coords::HLineOnHICANN::new(0).unwrap()).unwrap();
        let weights = L1EdgeWeights::new();
        let mut router = L1DijkstraRouter::new(&graph, &weights, source);
        router.add_target(Target::new(h, Orientation::Vertical));
        let result = router.run();
        let path = result.path_to(Target::new(h, Orientation::Vertical));
        assert!(path.is_some());
        assert_eq!(*path.unwrap().first().unwrap(), source);
    }

    #[test]
    fn unreachable_target_on_an_isolated_chip_is_not_found() {
        let mut graph = L1RoutingGraph::new();
        let h = hicann(18, 8);
        let other = hicann(20, 8);
        graph.add(h, SwitchOrdering::InEnumOrder);
        graph.add(other, SwitchOrdering::InEnumOrder);
        let source = graph.hline_vertex(h, whc_coords::HLineOnHICANN::new(0).unwrap()).unwrap();
        let weights = L1EdgeWeights::new();
        let mut router = L1DijkstraRouter::new(&graph, &weights, source);
        router.add_target(Target::new(other, Orientation::Horizontal));
        let result = router.run();
        assert!(result.path_to(Target::new(other, Orientation::Horizontal)).is_none());
    }

    #[test]
    fn second_path_through_a_claimed_switch_is_rejected() {
        let mut graph = L1RoutingGraph::new();
        let h = hicann(18, 8);
        graph.add(h, SwitchOrdering::InEnumOrder);
        let hline = whc_coords::HLineOnHICANN::new(0).unwrap();
        let source = graph.hline_vertex(h, hline).unwrap();
        let weights = L1EdgeWeights::new();
        let router = L1DijkstraRouter::new(&graph, &weights, source);
        let result = router.run();
        // The source hline has no predecessor, so it can never itself be
        // blocked; this just exercises that run() completes deterministically.
        assert_eq!(result.path_to_vertex(source), vec![source]);
    }
}
