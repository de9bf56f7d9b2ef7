//! `L1RouteTree`: a prefix tree over `L1Route`s sharing a common head,
//! used to represent one DNC merger's fan-out as a single structure instead
//! of a flat list of overlapping routes.

use crate::route::L1Route;
use crate::segment::L1Segment;

/// A node holding a shared prefix (`head`) and the ordered subtrees that
/// diverge after it. A leaf has an empty `head` representing "nothing more
/// to traverse" once attached as a childless tail.
#[derive(Debug, Clone)]
pub struct L1RouteTree {
    head: Vec<L1Segment>,
    children: Vec<L1RouteTree>,
}

impl L1RouteTree {
    pub fn new(route: L1Route) -> Self {
        L1RouteTree { head: route.segments().to_vec(), children: Vec::new() }
    }

    pub fn head(&self) -> &[L1Segment] {
        &self.head
    }

    pub fn children(&self) -> &[L1RouteTree] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Insert `route`, splitting the common-prefix node if `route` and the
    /// existing tree diverge partway through.
    pub fn add(&mut self, route: &L1Route) {
        let segments = route.segments();
        let shared = common_prefix_len(&self.head, segments);

        if shared == self.head.len() && shared == segments.len() {
            return;
        }

        if shared < self.head.len() {
            let demoted_tail = self.head.split_off(shared);
            let demoted = L1RouteTree { head: demoted_tail, children: std::mem::take(&mut self.children) };
            self.children.push(demoted);
        }

        if shared == segments.len() {
            return;
        }

        let new_tail = segments[shared..].to_vec();
        for child in &mut self.children {
            if !child.head.is_empty() && !new_tail.is_empty() && child.head[0] == new_tail[0] {
                let sub_route_segments: Vec<L1Segment> = self.head[..shared].iter().chain(new_tail.iter()).cloned().collect();
                if let Ok(sub_route) = L1Route::new(sub_route_segments) {
                    let rebased = sub_route.segments()[shared..].to_vec();
                    child.insert_raw(&rebased);
                    return;
                }
            }
        }

        self.children.push(L1RouteTree { head: new_tail, children: Vec::new() });
        self.sort_children();
    }

    fn insert_raw(&mut self, tail: &[L1Segment]) {
        let shared = common_prefix_len(&self.head, tail);
        if shared < self.head.len() {
            let demoted_tail = self.head.split_off(shared);
            let demoted = L1RouteTree { head: demoted_tail, children: std::mem::take(&mut self.children) };
            self.children.push(demoted);
        }
        if shared == tail.len() {
            return;
        }
        let new_tail = tail[shared..].to_vec();
        for child in &mut self.children {
            if !child.head.is_empty() && !new_tail.is_empty() && child.head[0] == new_tail[0] {
                child.insert_raw(&new_tail);
                return;
            }
        }
        self.children.push(L1RouteTree { head: new_tail, children: Vec::new() });
        self.sort_children();
    }

    /// Deterministic ordering: by the first segment's text token, then by
    /// subtree size as a tiebreak.
    fn sort_children(&mut self) {
        self.children.sort_by(|a, b| {
            let a_key = a.head.first().map(|s| s.to_string()).unwrap_or_default();
            let b_key = b.head.first().map(|s| s.to_string()).unwrap_or_default();
            a_key.cmp(&b_key).then(a.children.len().cmp(&b.children.len()))
        });
    }

    /// Reconstruct every full route stored in this tree, given the segment
    /// sequence leading to this node.
    pub fn routes(&self) -> Vec<L1Route> {
        let mut out = Vec::new();
        self.collect_routes(Vec::new(), &mut out);
        out
    }

    fn collect_routes(&self, mut prefix: Vec<L1Segment>, out: &mut Vec<L1Route>) {
        prefix.extend(self.head.iter().cloned());
        if self.children.is_empty() {
            if let Ok(route) = L1Route::new(prefix) {
                out.push(route);
            }
            return;
        }
        for child in &self.children {
            child.collect_routes(prefix.clone(), out);
        }
    }
}

fn common_prefix_len(a: &[L1Segment], b: &[L1Segment]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use whc_coords::{HLineOnHICANN, HicannOnWafer, VLineOnHICANN};

    fn h(x: u16, y: u16) -> HicannOnWafer {
        HicannOnWafer::new(x, y).unwrap()
    }

    fn route(segments: Vec<L1Segment>) -> L1Route {
        L1Route::new(segments).unwrap()
    }

    #[test]
    fn single_route_tree_has_no_children() {
        let hicann = h(18, 8);
        let hline = HLineOnHICANN::new(3).unwrap();
        let r = route(vec![L1Segment::Hicann(hicann), L1Segment::HLine(hline)]);
        let tree = L1RouteTree::new(r.clone());
        assert!(tree.is_leaf());
        assert_eq!(tree.routes(), vec![r]);
    }

    #[test]
    fn diverging_routes_split_the_shared_prefix() {
        let hicann = h(18, 8);
        let vline = VLineOnHICANN::new(0).unwrap();
        let hline_a = HLineOnHICANN::new(0).unwrap();
        let hline_b = HLineOnHICANN::new(1).unwrap();

        let base = route(vec![L1Segment::Hicann(hicann), L1Segment::VLine(vline), L1Segment::HLine(hline_a)]);
        let mut tree = L1RouteTree::new(base);

        let second = route(vec![L1Segment::Hicann(hicann), L1Segment::VLine(vline), L1Segment::HLine(hline_b)]);
        tree.add(&second);

        assert!(!tree.is_leaf());
        assert_eq!(tree.head(), &[L1Segment::Hicann(hicann), L1Segment::VLine(vline)]);
        let routes = tree.routes();
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn adding_the_same_route_twice_is_a_no_op() {
        let hicann = h(18, 8);
        let hline = HLineOnHICANN::new(3).unwrap();
        let r = route(vec![L1Segment::Hicann(hicann), L1Segment::HLine(hline)]);
        let mut tree = L1RouteTree::new(r.clone());
        tree.add(&r);
        assert_eq!(tree.routes().len(), 1);
    }
}
