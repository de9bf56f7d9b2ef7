//! Backbone router: walks a single horizontal bus line east and west from
//! its source chip, branching onto whichever crossbar-connected vertical
//! line reaches the most still-pending column targets.

use std::collections::{BTreeMap, HashMap};

use whc_coords::{crossbar_exists, HicannOnWafer, VLineOnHICANN};
use whc_graph::{L1Bus, L1RoutingGraph};

use crate::error::{RouterError, RouterResult};

/// Scores a candidate vertical line by how many still-pending targets it
/// would reach; default is a plain count.
pub type ScoringFn<'a> = dyn Fn(&[HicannOnWafer]) -> u32 + 'a;

fn default_scoring(reached: &[HicannOnWafer]) -> u32 {
    reached.len() as u32
}

pub struct L1BackboneRouter<'a> {
    graph: &'a L1RoutingGraph,
    source: usize,
    line: whc_coords::HLineOnHICANN,
    hicann: HicannOnWafer,
    pending: BTreeMap<i32, Vec<HicannOnWafer>>,
    scoring: Box<ScoringFn<'a>>,
    predecessors: HashMap<usize, usize>,
    reached: HashMap<HicannOnWafer, usize>,
}

impl<'a> L1BackboneRouter<'a> {
    pub fn new(graph: &'a L1RoutingGraph, source: usize) -> RouterResult<Self> {
        match graph.bus(source) {
            L1Bus::Horizontal(hicann, line) => Ok(L1BackboneRouter {
                graph,
                source,
                line,
                hicann,
                pending: BTreeMap::new(),
                scoring: Box::new(default_scoring),
                predecessors: HashMap::new(),
                reached: HashMap::new(),
            }),
            L1Bus::Vertical(..) => Err(RouterError::SourceNotHorizontal),
        }
    }

    pub fn with_scoring(mut self, f: impl Fn(&[HicannOnWafer]) -> u32 + 'a) -> Self {
        self.scoring = Box::new(f);
        self
    }

    /// Register a vertical target at `hicann`, grouped by x-column so each
    /// column is only evaluated once, matching the "only want to walk each
    /// column once" invariant.
    pub fn add_target(&mut self, hicann: HicannOnWafer) {
        self.pending.entry(hicann.x() as i32).or_default().push(hicann);
    }

    pub fn run(&mut self) {
        if let Some(candidates) = self.pending.remove(&(self.hicann.x() as i32)) {
            self.maybe_branch_off(self.hicann, self.source, candidates);
        }
        self.walk_direction(true);
        self.walk_direction(false);
        if !self.pending.is_empty() {
            log::warn!("backbone walk left {} column(s) unreached from this source", self.pending.len());
        }
    }

    pub fn path_to(&self, hicann: HicannOnWafer) -> Option<Vec<usize>> {
        let vertex = *self.reached.get(&hicann)?;
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
        Some(path)
    }

    fn walk_direction(&mut self, east: bool) {
        let mut current_hicann = self.hicann;
        let mut current_vertex = self.source;
        loop {
            let next_hicann = if east { current_hicann.east() } else { current_hicann.west() };
            let Ok(next_hicann) = next_hicann else { break };
            if !self.graph.contains(next_hicann) {
                break;
            }
            let Ok(next_vertex) = self.graph.hline_vertex(next_hicann, self.line) else { break };
            self.predecessors.entry(next_vertex).or_insert(current_vertex);
            current_hicann = next_hicann;
            current_vertex = next_vertex;

            // Erase the column regardless of whether a branch is found:
            // an unreachable column is never retried.
            if let Some(candidates) = self.pending.remove(&(current_hicann.x() as i32)) {
                self.maybe_branch_off(current_hicann, current_vertex, candidates);
            }
        }
    }

    fn maybe_branch_off(&mut self, hicann: HicannOnWafer, hline_vertex: usize, candidates: Vec<HicannOnWafer>) {
        let mut best: Option<(VLineOnHICANN, Vec<HicannOnWafer>, u32)> = None;
        for vline in VLineOnHICANN::iter_all() {
            if !crossbar_exists(vline, self.line) {
                continue;
            }
            if self.graph.vline_vertex(hicann, vline).is_err() {
                continue;
            }
            let reachable = reachable_on_vline(self.graph, hicann, vline);
            let hit: Vec<HicannOnWafer> = reachable.into_iter().filter(|c| candidates.contains(c)).collect();
            if hit.is_empty() {
                continue;
            }
            let score = (self.scoring)(&hit);
            let better = match &best {
                Some((_, _, best_score)) => score > *best_score,
                None => true,
            };
            if better {
                best = Some((vline, hit, score));
            }
        }

        if let Some((vline, hit, _)) = best {
            self.commit_vline_predecessors(hicann, hline_vertex, vline);
            for c in hit {
                if let Ok(v) = self.graph.vline_vertex(c, vline) {
                    self.reached.entry(c).or_insert(v);
                }
            }
        }
    }

    fn commit_vline_predecessors(&mut self, branch_hicann: HicannOnWafer, branch_vertex: usize, vline: VLineOnHICANN) {
        let Ok(v0) = self.graph.vline_vertex(branch_hicann, vline) else { return };
        self.predecessors.entry(v0).or_insert(branch_vertex);

        let mut prev = v0;
        let mut cur = branch_hicann;
        while let Ok(n) = cur.north() {
            if !self.graph.contains(n) {
                break;
            }
            let Ok(v) = self.graph.vline_vertex(n, vline) else { break };
            self.predecessors.entry(v).or_insert(prev);
            prev = v;
            cur = n;
        }

        prev = v0;
        cur = branch_hicann;
        while let Ok(s) = cur.south() {
            if !self.graph.contains(s) {
                break;
            }
            let Ok(v) = self.graph.vline_vertex(s, vline) else { break };
            self.predecessors.entry(v).or_insert(prev);
            prev = v;
            cur = s;
        }
    }
}

/// Every present chip transitively reachable from `hicann` by walking
/// north/south along `vline`'s index, `hicann` included.
fn reachable_on_vline(graph: &L1RoutingGraph, hicann: HicannOnWafer, vline: VLineOnHICANN) -> Vec<HicannOnWafer> {
    let mut result = vec![hicann];
    let mut cur = hicann;
    while let Ok(n) = cur.north() {
        if !graph.contains(n) || graph.vline_vertex(n, vline).is_err() {
            break;
        }
        result.push(n);
        cur = n;
    }
    cur = hicann;
    while let Ok(s) = cur.south() {
        if !graph.contains(s) || graph.vline_vertex(s, vline).is_err() {
            break;
        }
        result.push(s);
        cur = s;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use whc_coords::HLineOnHICANN;
    use whc_graph::SwitchOrdering;

    fn hicann(x: u16, y: u16) -> HicannOnWafer {
        HicannOnWafer::new(x, y).unwrap()
    }

    #[test]
    fn rejects_a_vertical_source_vertex() {
        let mut graph = L1RoutingGraph::new();
        let h = hicann(18, 8);
        graph.add(h, SwitchOrdering::InEnumOrder);
        let vline = VLineOnHICANN::new(0).unwrap();
        let source = graph.vline_vertex(h, vline).unwrap();
        assert_eq!(L1BackboneRouter::new(&graph, source).unwrap_err(), RouterError::SourceNotHorizontal);
    }

    #[test]
    fn walks_east_to_reach_a_same_row_target() {
        let mut graph = L1RoutingGraph::new();
        let a = hicann(17, 8);
        let b = a.east().unwrap();
        graph.add(a, SwitchOrdering::InEnumOrder);
        graph.add(b, SwitchOrdering::InEnumOrder);
        let line = HLineOnHICANN::new(0).unwrap();
        let source = graph.hline_vertex(a, line).unwrap();
        let mut router = L1BackboneRouter::new(&graph, source).unwrap();
        router.add_target(b);
        router.run();
        let path = router.path_to(b);
        assert!(path.is_some());
        assert_eq!(*path.unwrap().first().unwrap(), source);
    }

    #[test]
    fn branches_onto_a_vertical_line_to_reach_a_column_target() {
        let mut graph = L1RoutingGraph::new();
        let a = hicann(18, 8);
        let below = a.south().unwrap();
        graph.add(a, SwitchOrdering::InEnumOrder);
        graph.add(below, SwitchOrdering::InEnumOrder);
        let line = HLineOnHICANN::new(0).unwrap();
        let source = graph.hline_vertex(a, line).unwrap();
        let mut router = L1BackboneRouter::new(&graph, source).unwrap();
        router.add_target(below);
        router.run();
        assert!(router.path_to(below).is_some());
    }
}
