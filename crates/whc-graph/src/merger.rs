//! The fixed on-chip merger-tree DAG: 8 `DNCMergerOnHICANN` sinks plus the
//! 15 `MergerOnHICANN` tree nodes, with the ground truth's 8 fixed
//! DNC-to-merger edges.

use std::collections::{HashMap, HashSet, VecDeque};
use whc_coords::{DNCMergerOnHICANN, MergerOnHICANN};

/// A vertex of the merger-tree graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergerVertex {
    Dnc(DNCMergerOnHICANN),
    Tree(MergerOnHICANN),
}

/// The 23-vertex merger tree, rebuilt fresh per HICANN that needs routing
/// (its edges are consumed and removed as the merger-tree router assigns
/// blocks, so each chip gets its own working copy).
pub struct MergerTreeGraph {
    vertices: Vec<MergerVertex>,
    adjacency: Vec<HashSet<usize>>,
    index: HashMap<MergerVertex, usize>,
}

impl MergerTreeGraph {
    /// Build the fixed topology: vertices in DNC-then-tier order, tree
    /// edges root to leaf, then the 8 fixed DNC-to-merger edges.
    pub fn new() -> Self {
        let mut vertices = Vec::with_capacity(23);
        let mut index = HashMap::with_capacity(23);

        for dnc in DNCMergerOnHICANN::iter_all() {
            let idx = vertices.len();
            vertices.push(MergerVertex::Dnc(dnc));
            index.insert(MergerVertex::Dnc(dnc), idx);
        }
        for level in (0..4u8).rev() {
            for m in MergerOnHICANN::iter_level(level) {
                let idx = vertices.len();
                vertices.push(MergerVertex::Tree(m));
                index.insert(MergerVertex::Tree(m), idx);
            }
        }

        let mut adjacency = vec![HashSet::new(); vertices.len()];
        let connect = |adjacency: &mut Vec<HashSet<usize>>, a: usize, b: usize| {
            adjacency[a].insert(b);
            adjacency[b].insert(a);
        };

        for level in (1..4u8).rev() {
            for m in MergerOnHICANN::iter_level(level) {
                let (left, right) = m.children().expect("non-leaf tier has children");
                let pi = index[&MergerVertex::Tree(m)];
                let li = index[&MergerVertex::Tree(left)];
                let ri = index[&MergerVertex::Tree(right)];
                connect(&mut adjacency, pi, li);
                connect(&mut adjacency, pi, ri);
            }
        }

        for dnc in DNCMergerOnHICANN::iter_all() {
            let source = dnc.source_merger();
            let di = index[&MergerVertex::Dnc(dnc)];
            let si = index[&MergerVertex::Tree(source)];
            connect(&mut adjacency, di, si);
        }

        MergerTreeGraph { vertices, adjacency, index }
    }

    pub fn vertex_of(&self, v: MergerVertex) -> usize {
        self.index[&v]
    }

    pub fn vertex_of_dnc(&self, dnc: DNCMergerOnHICANN) -> usize {
        self.vertex_of(MergerVertex::Dnc(dnc))
    }

    pub fn vertex_of_merger(&self, m: MergerOnHICANN) -> usize {
        self.vertex_of(MergerVertex::Tree(m))
    }

    pub fn vertex(&self, idx: usize) -> MergerVertex {
        self.vertices[idx]
    }

    pub fn neighbours(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[idx].iter().copied()
    }

    /// Clear a vertex's adjacency set, consuming it from the working tree
    /// without shrinking the vertex vector.
    pub fn remove(&mut self, idx: usize) {
        let neighbours: Vec<usize> = self.adjacency[idx].drain().collect();
        for n in neighbours {
            self.adjacency[n].remove(&idx);
        }
    }

    /// BFS from `source`, returning every `Merger0OnHICANN` vertex index
    /// still reachable through the remaining tree edges.
    pub fn reachable_leaves(&self, source: usize) -> Vec<MergerOnHICANN> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(source);
        queue.push_back(source);
        let mut leaves = Vec::new();
        while let Some(v) = queue.pop_front() {
            if let MergerVertex::Tree(m) = self.vertices[v] {
                if m.level() == 0 {
                    leaves.push(m);
                }
            }
            for n in self.adjacency[v].iter().copied() {
                if seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        leaves
    }
}

impl Default for MergerTreeGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_23_vertices() {
        let g = MergerTreeGraph::new();
        assert_eq!(g.vertices.len(), 23);
    }

    #[test]
    fn dnc3_reaches_all_eight_leaves() {
        let g = MergerTreeGraph::new();
        let dnc3 = DNCMergerOnHICANN::new(3).unwrap();
        let start = g.vertex_of_dnc(dnc3);
        assert_eq!(g.reachable_leaves(start).len(), 8);
    }

    #[test]
    fn removing_a_vertex_isolates_its_subtree() {
        let mut g = MergerTreeGraph::new();
        let dnc3 = DNCMergerOnHICANN::new(3).unwrap();
        let root = MergerOnHICANN::new(3, 0).unwrap();
        let root_idx = g.vertex_of_merger(root);
        g.remove(root_idx);
        let start = g.vertex_of_dnc(dnc3);
        assert_eq!(g.reachable_leaves(start).len(), 0);
    }
}
