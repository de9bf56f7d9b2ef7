//! Bio-graph: populations as vertices, projection views as edges.

use crate::error::{GraphError, GraphResult};
use std::collections::HashMap;

/// Stable small-integer identity of a vertex descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexId(pub u32);

/// Stable small-integer identity of an edge, independent of its current
/// position in the adjacency storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(pub u32);

/// A biological population, the vertex payload of the bio-graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    pub name: String,
    pub size: usize,
    /// External spike source, not realised by any hardware neuron.
    pub is_source: bool,
    /// Mapped onto hardware denmems (false for purely virtual populations).
    pub is_physical: bool,
}

impl Population {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Population { name: name.into(), size, is_source: false, is_physical: true }
    }

    pub fn source(name: impl Into<String>, size: usize) -> Self {
        Population { name: name.into(), size, is_source: true, is_physical: false }
    }
}

/// A restriction of a projection to a contiguous pre- and post-population
/// slice: the flattened unit the bio-graph stores as one edge.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionView {
    pub pre: VertexId,
    pub post: VertexId,
    pub pre_slice: (usize, usize),
    pub post_slice: (usize, usize),
    /// `"excitatory"`, `"inhibitory"`, or a non-negative integer string for
    /// multi-conductance models.
    pub target: String,
}

struct EdgeEntry {
    id: EdgeId,
    view: ProjectionView,
}

/// Directed graph of populations (vertices) and projection views (edges),
/// with a stable `EdgeId` minted once per edge and never reused.
#[derive(Default)]
pub struct BioGraph {
    vertices: Vec<Population>,
    edges: Vec<EdgeEntry>,
    out_edges: Vec<Vec<usize>>,
    edge_index: HashMap<EdgeId, usize>,
    next_edge_id: u32,
}

impl BioGraph {
    pub fn new() -> Self {
        BioGraph::default()
    }

    pub fn add_population(&mut self, population: Population) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(population);
        self.out_edges.push(Vec::new());
        id
    }

    pub fn population(&self, v: VertexId) -> GraphResult<&Population> {
        self.vertices.get(v.0 as usize).ok_or(GraphError::VertexNotFound)
    }

    /// Insert one edge per projection view, as the flattening step demands.
    pub fn add_edge(&mut self, view: ProjectionView) -> GraphResult<EdgeId> {
        if view.pre.0 as usize >= self.vertices.len() || view.post.0 as usize >= self.vertices.len() {
            return Err(GraphError::VertexNotFound);
        }
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        let slot = self.edges.len();
        self.out_edges[view.pre.0 as usize].push(slot);
        self.edges.push(EdgeEntry { id, view });
        self.edge_index.insert(id, slot);
        Ok(id)
    }

    pub fn edge(&self, id: EdgeId) -> GraphResult<&ProjectionView> {
        let slot = *self.edge_index.get(&id).ok_or(GraphError::NoSuchEdge)?;
        Ok(&self.edges[slot].view)
    }

    pub fn out_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges[v.0 as usize].iter().map(move |&slot| self.edges[slot].id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len() as u32).map(VertexId)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().map(|e| e.id)
    }

    pub fn is_source(&self, v: VertexId) -> bool {
        self.vertices.get(v.0 as usize).map(|p| p.is_source).unwrap_or(false)
    }

    pub fn is_physical(&self, v: VertexId) -> bool {
        self.vertices.get(v.0 as usize).map(|p| p.is_physical).unwrap_or(false)
    }

    pub fn is_spikeinput_edge(&self, id: EdgeId) -> bool {
        match self.edge(id) {
            Ok(view) => self.is_source(view.pre),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_ids_stay_stable_across_inserts() {
        let mut g = BioGraph::new();
        let a = g.add_population(Population::new("a", 10));
        let b = g.add_population(Population::new("b", 10));
        let e1 = g
            .add_edge(ProjectionView {
                pre: a,
                post: b,
                pre_slice: (0, 10),
                post_slice: (0, 10),
                target: "excitatory".into(),
            })
            .unwrap();
        let e2 = g
            .add_edge(ProjectionView {
                pre: b,
                post: a,
                pre_slice: (0, 5),
                post_slice: (0, 5),
                target: "inhibitory".into(),
            })
            .unwrap();
        assert_ne!(e1, e2);
        assert_eq!(g.edge(e1).unwrap().target, "excitatory");
        assert_eq!(g.out_edges(a).collect::<Vec<_>>(), vec![e1]);
    }

    #[test]
    fn spikeinput_edge_detects_source_populations() {
        let mut g = BioGraph::new();
        let src = g.add_population(Population::source("ext", 4));
        let tgt = g.add_population(Population::new("tgt", 4));
        let e = g
            .add_edge(ProjectionView {
                pre: src,
                post: tgt,
                pre_slice: (0, 4),
                post_slice: (0, 4),
                target: "excitatory".into(),
            })
            .unwrap();
        assert!(g.is_spikeinput_edge(e));
    }
}
