//! Per-edge and per-vertex weight overrides for the Dijkstra router.
//!
//! Congestion-aware rerouting is layered on top of the plain-shortest-path
//! core by supplying non-default weights here, without touching the
//! Dijkstra implementation itself.

use std::collections::HashMap;

/// Default edge weight when neither endpoint nor the edge itself has an
/// override.
pub const DEFAULT_WEIGHT: u32 = 1;

#[derive(Debug, Clone, Default)]
pub struct L1EdgeWeights {
    edge_overrides: HashMap<(usize, usize), u32>,
    vertex_overrides: HashMap<usize, u32>,
}

impl L1EdgeWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the weight of the (undirected) edge between `a` and `b`.
    pub fn set_edge(&mut self, a: usize, b: usize, weight: u32) {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.edge_overrides.insert(key, weight);
    }

    /// Override the weight of every edge incident to `vertex`.
    pub fn set_vertex(&mut self, vertex: usize, weight: u32) {
        self.vertex_overrides.insert(vertex, weight);
    }

    /// Weight of the edge `a -> b`: the edge override if set, else the
    /// larger of either endpoint's vertex override if either is set, else
    /// [`DEFAULT_WEIGHT`].
    pub fn weight(&self, a: usize, b: usize) -> u32 {
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(&w) = self.edge_overrides.get(&key) {
            return w;
        }
        let va = self.vertex_overrides.get(&a);
        let vb = self.vertex_overrides.get(&b);
        match (va, vb) {
            (Some(&x), Some(&y)) => x.max(y),
            (Some(&x), None) => x,
            (None, Some(&y)) => y,
            (None, None) => DEFAULT_WEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weight_is_one() {
        let w = L1EdgeWeights::new();
        assert_eq!(w.weight(3, 7), DEFAULT_WEIGHT);
    }

    #[test]
    fn edge_override_wins_over_vertex_override() {
        let mut w = L1EdgeWeights::new();
        w.set_vertex(3, 5);
        w.set_edge(3, 7, 9);
        assert_eq!(w.weight(3, 7), 9);
        assert_eq!(w.weight(7, 3), 9);
    }

    #[test]
    fn vertex_override_takes_the_larger_of_both_endpoints() {
        let mut w = L1EdgeWeights::new();
        w.set_vertex(3, 5);
        w.set_vertex(7, 2);
        assert_eq!(w.weight(3, 7), 5);
    }
}
