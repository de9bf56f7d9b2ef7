//! Interactive route exploration: every simple path from a source vertex
//! to any vertex matching a target specification, for tooling use. Never
//! consulted by the committed pipeline and never mutates the graph.

use std::collections::HashSet;

use whc_graph::{L1Bus, L1RoutingGraph};

use crate::target::{Orientation, Target};

/// Default depth cap keeping interactive exploration bounded on a
/// wafer-sized graph; override with [`find_routes_with_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 12;

fn matches(graph: &L1RoutingGraph, vertex: usize, target: Target) -> bool {
    match graph.bus(vertex) {
        L1Bus::Horizontal(h, _) => h == target.hicann && target.orientation == Orientation::Horizontal,
        L1Bus::Vertical(h, _) => h == target.hicann && target.orientation == Orientation::Vertical,
    }
}

/// All simple paths (as vertex-index sequences, source first) from
/// `source` to any vertex on `target.hicann` matching `target.orientation`,
/// up to `max_depth` hops.
pub fn find_routes_with_depth(graph: &L1RoutingGraph, source: usize, target: Target, max_depth: usize) -> Vec<Vec<usize>> {
    let mut found = Vec::new();
    let mut visited = HashSet::new();
    let mut path = vec![source];
    visited.insert(source);
    walk(graph, target, max_depth, &mut path, &mut visited, &mut found);
    found
}

/// [`find_routes_with_depth`] with [`DEFAULT_MAX_DEPTH`].
pub fn find_routes(graph: &L1RoutingGraph, source: usize, target: Target) -> Vec<Vec<usize>> {
    find_routes_with_depth(graph, source, target, DEFAULT_MAX_DEPTH)
}

fn walk(
    graph: &L1RoutingGraph,
    target: Target,
    max_depth: usize,
    path: &mut Vec<usize>,
    visited: &mut HashSet<usize>,
    found: &mut Vec<Vec<usize>>,
) {
    let current = *path.last().expect("path always has a source");
    if path.len() > 1 && matches(graph, current, target) {
        found.push(path.clone());
        return;
    }
    if path.len() > max_depth {
        return;
    }
    for next in graph.neighbours(current) {
        if visited.contains(&next) {
            continue;
        }
        visited.insert(next);
        path.push(next);
        walk(graph, target, max_depth, path, visited, found);
        path.pop();
        visited.remove(&next);
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
    fn finds_a_path_between_two_adjacent_chips() {
        let mut graph = L1RoutingGraph::new();
        graph.add(hicann(17, 8), SwitchOrdering::InEnumOrder);
        graph.add(hicann(18, 8), SwitchOrdering::InEnumOrder);

        let source = graph.hline_vertex(hicann(17, 8), whc_coords::HLineOnHICANN::new(0).unwrap()).unwrap();
        let target = Target::new(hicann(18, 8), Orientation::Horizontal);
        let routes = find_routes(&graph, source, target);
        assert!(!routes.is_empty());
        for route in &routes {
            assert_eq!(route.first().copied(), Some(source));
            assert!(matches(&graph, *route.last().unwrap(), target));
        }
    }

    #[test]
    fn returns_nothing_past_the_depth_cap() {
        let mut graph = L1RoutingGraph::new();
        graph.add(hicann(17, 8), SwitchOrdering::InEnumOrder);
        graph.add(hicann(18, 8), SwitchOrdering::InEnumOrder);
        let source = graph.hline_vertex(hicann(17, 8), whc_coords::HLineOnHICANN::new(0).unwrap()).unwrap();
        let target = Target::new(hicann(18, 8), Orientation::Horizontal);
        let routes = find_routes_with_depth(&graph, source, target, 0);
        assert!(routes.is_empty());
    }
}
