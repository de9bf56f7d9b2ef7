//! Lowers a sequence of `L1RoutingGraph` vertices (as produced by the
//! backbone or Dijkstra router) into a validated `L1Route`.

use whc_coords::DNCMergerOnHICANN;
use whc_graph::L1RoutingGraph;
use whc_route::{is_valid_successor, L1Route, L1Segment};

use crate::error::{RouterError, RouterResult};

fn bus_to_segment(bus: whc_graph::L1Bus) -> L1Segment {
    match bus {
        whc_graph::L1Bus::Horizontal(_, line) => L1Segment::HLine(line),
        whc_graph::L1Bus::Vertical(_, line) => L1Segment::VLine(line),
    }
}

/// Turn a path of graph vertices into plain segments: a `HicannOnWafer`
/// marker on every chip change, then the bus line itself.
fn path_to_segments(graph: &L1RoutingGraph, path: &[usize]) -> Vec<L1Segment> {
    let mut segments = Vec::new();
    let mut current_hicann = None;
    for &v in path {
        let bus = graph.bus(v);
        let hicann = bus.hicann();
        if current_hicann != Some(hicann) {
            segments.push(L1Segment::Hicann(hicann));
            current_hicann = Some(hicann);
        }
        segments.push(bus_to_segment(bus));
    }
    segments
}

/// Lower `path` (vertices on chip `source_chip`) into an `L1Route`. When
/// `dnc_source` is supplied, the route is prepended with
/// `[HicannOnWafer(source_chip), DNCMergerOnHICANN]`; the path's own
/// redundant leading chip marker is always dropped in favour of that
/// prefix's, and, in the "output-to-the-left" case (the path's first hop
/// crosses onto the merger's western neighbour), the leading H-line is
/// dropped too since invariant 4 lets a `DNCMergerOnHICANN` connect
/// straight to that neighbouring chip.
pub fn lower_path(
    graph: &L1RoutingGraph,
    path: &[usize],
    dnc_source: Option<DNCMergerOnHICANN>,
) -> RouterResult<L1Route> {
    if path.is_empty() {
        return Err(RouterError::NoPath);
    }
    let mut segments = path_to_segments(graph, path);

    if let Some(dnc) = dnc_source {
        let source_chip = segments[0].as_hicann().expect("path_to_segments always opens with a Hicann");
        segments.remove(0);

        let output_to_the_left = matches!(
            (segments.first(), segments.get(1)),
            (Some(L1Segment::HLine(_)), Some(L1Segment::Hicann(next))) if Some(*next) == source_chip.west().ok()
        );
        if output_to_the_left {
            segments.remove(0);
            segments.remove(0);
        }

        let valid = match segments.first() {
            Some(next) => is_valid_successor(source_chip, &L1Segment::DncMerger(dnc), next).is_some(),
            None => false,
        };
        if !valid {
            return Err(RouterError::NoPath);
        }

        let mut prefix = vec![L1Segment::Hicann(source_chip), L1Segment::DncMerger(dnc)];
        prefix.append(&mut segments);
        segments = prefix;
    }

    L1Route::new(segments).map_err(|_| RouterError::NoPath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use whc_coords::{HLineOnHICANN, HicannOnWafer};
    use whc_graph::SwitchOrdering;

    fn hicann(x: u16, y: u16) -> HicannOnWafer {
        HicannOnWafer::new(x, y).unwrap()
    }

    #[test]
    fn lowers_a_same_chip_hop_to_a_crossbar_pair() {
        let mut graph = L1RoutingGraph::new();
        let h = hicann(18, 8);
        graph.add(h, SwitchOrdering::InEnumOrder);
        let hline = HLineOnHICANN::new(0).unwrap();
        let vline = whc_coords::VLineOnHICANN::new(0).unwrap();
        let v0 = graph.hline_vertex(h, hline).unwrap();
        let v1 = graph.vline_vertex(h, vline).unwrap();
        let route = lower_path(&graph, &[v0, v1], None).unwrap();
        assert_eq!(route.segments()[0], L1Segment::Hicann(h));
        assert_eq!(route.segments()[1], L1Segment::HLine(hline));
        assert_eq!(route.segments()[2], L1Segment::VLine(vline));
    }

    #[test]
    fn prepends_a_dnc_merger_in_the_sending_east_case() {
        let mut graph = L1RoutingGraph::new();
        let h = hicann(18, 8);
        graph.add(h, SwitchOrdering::InEnumOrder);
        let dnc = DNCMergerOnHICANN::new(0).unwrap();
        let hline = dnc.sending_repeater_hline();
        let v0 = graph.hline_vertex(h, hline).unwrap();
        let route = lower_path(&graph, &[v0], Some(dnc)).unwrap();
        assert_eq!(route.segments()[0], L1Segment::Hicann(h));
        assert_eq!(route.segments()[1], L1Segment::DncMerger(dnc));
        assert_eq!(route.segments()[2], L1Segment::HLine(hline));
    }
}
