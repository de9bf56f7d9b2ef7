//! The L1 routing graph: every H-line and V-line on every present HICANN,
//! joined by intra-chip crossbar edges and inter-chip continuation edges.

use crate::error::{GraphError, GraphResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use whc_coords::{
    crossbar_exists, HLineOnHICANN, HicannOnWafer, SideHorizontal, SideVertical, VLineOnHICANN,
};

/// One vertex of the routing graph: a bus line on a specific chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum L1Bus {
    Horizontal(HicannOnWafer, HLineOnHICANN),
    Vertical(HicannOnWafer, VLineOnHICANN),
}

impl L1Bus {
    pub fn hicann(&self) -> HicannOnWafer {
        match self {
            L1Bus::Horizontal(h, _) => *h,
            L1Bus::Vertical(h, _) => *h,
        }
    }
}

/// Ordering applied to a chip's intra-chip crossbar-switch edges before
/// they are inserted, which only affects tie-breaking in later traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOrdering {
    InEnumOrder,
    ShuffleWithHicannSeed,
    ShuffleWithGivenSeed(u64),
}

/// Vertex-index lookup table for one present HICANN.
struct HicannVertices {
    horizontal: [usize; HLineOnHICANN::SIZE as usize],
    vertical: [usize; VLineOnHICANN::SIZE as usize],
}

/// The undirected L1 routing graph over every present HICANN on a wafer.
pub struct L1RoutingGraph {
    vertices: Vec<L1Bus>,
    adjacency: Vec<HashSet<usize>>,
    index: HashMap<HicannOnWafer, HicannVertices>,
}

impl Default for L1RoutingGraph {
    fn default() -> Self {
        L1RoutingGraph { vertices: Vec::new(), adjacency: Vec::new(), index: HashMap::new() }
    }
}

impl L1RoutingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, hicann: HicannOnWafer) -> bool {
        self.index.contains_key(&hicann)
    }

    fn push_vertex(&mut self, bus: L1Bus) -> usize {
        let idx = self.vertices.len();
        self.vertices.push(bus);
        self.adjacency.push(HashSet::new());
        idx
    }

    fn connect(&mut self, a: usize, b: usize) {
        self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
    }

    /// Add a HICANN's 320 vertices, its intra-chip crossbar edges (ordered
    /// per `ordering`) and continuation edges to any already-present
    /// neighbour.
    pub fn add(&mut self, hicann: HicannOnWafer, ordering: SwitchOrdering) {
        if self.index.contains_key(&hicann) {
            return;
        }
        let mut horizontal = [0usize; HLineOnHICANN::SIZE as usize];
        let mut vertical = [0usize; VLineOnHICANN::SIZE as usize];
        for (i, slot) in horizontal.iter_mut().enumerate() {
            *slot = self.push_vertex(L1Bus::Horizontal(hicann, HLineOnHICANN::new(i as u8).unwrap()));
        }
        for (i, slot) in vertical.iter_mut().enumerate() {
            *slot = self.push_vertex(L1Bus::Vertical(hicann, VLineOnHICANN::new(i as u16).unwrap()));
        }

        let mut crossbar_pairs: Vec<(usize, usize)> = Vec::new();
        for hline_raw in 0..HLineOnHICANN::SIZE as u8 {
            let hline = HLineOnHICANN::new(hline_raw).unwrap();
            for vline_raw in 0..VLineOnHICANN::SIZE {
                let vline = VLineOnHICANN::new(vline_raw).unwrap();
                if crossbar_exists(vline, hline) {
                    crossbar_pairs.push((horizontal[hline_raw as usize], vertical[vline_raw as usize]));
                }
            }
        }
        match ordering {
            SwitchOrdering::InEnumOrder => {}
            SwitchOrdering::ShuffleWithHicannSeed => {
                let mut rng = StdRng::seed_from_u64(hicann.enum_index() as u64);
                crossbar_pairs.shuffle(&mut rng);
            }
            SwitchOrdering::ShuffleWithGivenSeed(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                crossbar_pairs.shuffle(&mut rng);
            }
        }
        for (h, v) in crossbar_pairs {
            self.connect(h, v);
        }

        self.index.insert(hicann, HicannVertices { horizontal, vertical });

        if let Ok(west) = hicann.west() {
            self.connect_horizontal_neighbours(west, hicann);
        }
        if let Ok(east) = hicann.east() {
            self.connect_horizontal_neighbours(hicann, east);
        }
        if let Ok(north) = hicann.north() {
            self.connect_vertical_neighbours(north, hicann);
        }
        if let Ok(south) = hicann.south() {
            self.connect_vertical_neighbours(hicann, south);
        }
    }

    fn connect_horizontal_neighbours(&mut self, west: HicannOnWafer, east: HicannOnWafer) {
        let (Some(w), Some(e)) = (self.index.get(&west), self.index.get(&east)) else { return };
        for i in 0..HLineOnHICANN::SIZE as usize {
            self.connect(w.horizontal[i], e.horizontal[i]);
        }
    }

    fn connect_vertical_neighbours(&mut self, north: HicannOnWafer, south: HicannOnWafer) {
        let (Some(n), Some(s)) = (self.index.get(&north), self.index.get(&south)) else { return };
        for i in 0..VLineOnHICANN::SIZE as usize {
            self.connect(n.vertical[i], s.vertical[i]);
        }
    }

    pub fn hline_vertex(&self, hicann: HicannOnWafer, line: HLineOnHICANN) -> GraphResult<usize> {
        let hv = self.index.get(&hicann).ok_or_else(|| GraphError::HicannNotPresent(hicann.to_string()))?;
        Ok(hv.horizontal[line.raw() as usize])
    }

    pub fn vline_vertex(&self, hicann: HicannOnWafer, line: VLineOnHICANN) -> GraphResult<usize> {
        let hv = self.index.get(&hicann).ok_or_else(|| GraphError::HicannNotPresent(hicann.to_string()))?;
        Ok(hv.vertical[line.raw() as usize])
    }

    pub fn bus(&self, vertex: usize) -> L1Bus {
        self.vertices[vertex]
    }

    pub fn neighbours(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[vertex].iter().copied()
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Clear all edges incident to a line's vertex; the vertex index is
    /// preserved and future lookups still resolve.
    pub fn remove_hline(&mut self, hicann: HicannOnWafer, line: HLineOnHICANN) -> GraphResult<()> {
        let v = self.hline_vertex(hicann, line)?;
        self.clear_vertex(v);
        Ok(())
    }

    pub fn remove_vline(&mut self, hicann: HicannOnWafer, line: VLineOnHICANN) -> GraphResult<()> {
        let v = self.vline_vertex(hicann, line)?;
        self.clear_vertex(v);
        Ok(())
    }

    fn clear_vertex(&mut self, v: usize) {
        let neighbours: Vec<usize> = self.adjacency[v].drain().collect();
        for n in neighbours {
            self.adjacency[n].remove(&v);
        }
    }

    /// Drop only the single continuation edge an H-repeater gates, leaving
    /// intra-chip crossbar connectivity intact.
    pub fn remove_hrepeater(&mut self, hicann: HicannOnWafer, line: HLineOnHICANN, side: SideHorizontal) -> GraphResult<()> {
        let neighbour = match side {
            SideHorizontal::Left => hicann.west(),
            SideHorizontal::Right => hicann.east(),
        };
        let Ok(neighbour) = neighbour else { return Ok(()) };
        if !self.index.contains_key(&neighbour) {
            return Ok(());
        }
        let a = self.hline_vertex(hicann, line)?;
        let b = self.hline_vertex(neighbour, line)?;
        self.adjacency[a].remove(&b);
        self.adjacency[b].remove(&a);
        Ok(())
    }

    /// Drop only the single continuation edge a V-repeater gates.
    pub fn remove_vrepeater(&mut self, hicann: HicannOnWafer, line: VLineOnHICANN, side: SideVertical) -> GraphResult<()> {
        let neighbour = match side {
            SideVertical::Top => hicann.north(),
            SideVertical::Bottom => hicann.south(),
        };
        let Ok(neighbour) = neighbour else { return Ok(()) };
        if !self.index.contains_key(&neighbour) {
            return Ok(());
        }
        let a = self.vline_vertex(hicann, line)?;
        let b = self.vline_vertex(neighbour, line)?;
        self.adjacency[a].remove(&b);
        self.adjacency[b].remove(&a);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hicann(x: u16, y: u16) -> HicannOnWafer {
        HicannOnWafer::new(x, y).unwrap()
    }

    #[test]
    fn single_hicann_has_320_vertices() {
        let mut g = L1RoutingGraph::new();
        g.add(hicann(18, 8), SwitchOrdering::InEnumOrder);
        assert_eq!(g.num_vertices(), 320);
    }

    #[test]
    fn east_west_neighbours_connect_matching_hlines() {
        let mut g = L1RoutingGraph::new();
        let a = hicann(18, 8);
        let b = a.east().unwrap();
        g.add(a, SwitchOrdering::InEnumOrder);
        g.add(b, SwitchOrdering::InEnumOrder);
        let line = HLineOnHICANN::new(10).unwrap();
        let va = g.hline_vertex(a, line).unwrap();
        let vb = g.hline_vertex(b, line).unwrap();
        assert!(g.neighbours(va).any(|n| n == vb));
    }

    #[test]
    fn remove_hline_clears_incident_edges_but_keeps_vertex() {
        let mut g = L1RoutingGraph::new();
        let a = hicann(18, 8);
        let b = a.east().unwrap();
        g.add(a, SwitchOrdering::InEnumOrder);
        g.add(b, SwitchOrdering::InEnumOrder);
        let line = HLineOnHICANN::new(10).unwrap();
        g.remove_hline(a, line).unwrap();
        let va = g.hline_vertex(a, line).unwrap();
        assert_eq!(g.neighbours(va).count(), 0);
    }

    #[test]
    fn remove_hrepeater_drops_only_one_direction() {
        let mut g = L1RoutingGraph::new();
        let a = hicann(18, 8);
        let west = a.west().unwrap();
        let east = a.east().unwrap();
        g.add(west, SwitchOrdering::InEnumOrder);
        g.add(a, SwitchOrdering::InEnumOrder);
        g.add(east, SwitchOrdering::InEnumOrder);
        let line = HLineOnHICANN::new(10).unwrap();
        g.remove_hrepeater(a, line, SideHorizontal::Left).unwrap();
        let va = g.hline_vertex(a, line).unwrap();
        let ve = g.hline_vertex(east, line).unwrap();
        assert!(g.neighbours(va).any(|n| n == ve));
    }
}
