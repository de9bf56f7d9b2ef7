//! `L1Segment`: the 11-kind tagged union of everything an `L1Route` can
//! pass through, plus the successor relation connecting adjacent segments.

use std::fmt;
use whc_coords::{
    crossbar_exists, DNCMergerOnHICANN, GbitLinkOnHICANN, HLineOnHICANN, HRepeaterOnHICANN,
    HicannOnWafer, MergerOnHICANN, RepeaterBlockOnHICANN, SideHorizontal, SynapseDriverOnHICANN,
    SynapseOnHICANN, VLineOnHICANN, VRepeaterOnHICANN,
};

/// One element of an `L1Route`'s segment sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum L1Segment {
    Hicann(HicannOnWafer),
    Merger(MergerOnHICANN),
    DncMerger(DNCMergerOnHICANN),
    GbitLink(GbitLinkOnHICANN),
    RepeaterBlock(RepeaterBlockOnHICANN),
    HLine(HLineOnHICANN),
    VLine(VLineOnHICANN),
    HRepeater(HRepeaterOnHICANN),
    VRepeater(VRepeaterOnHICANN),
    SynapseDriver(SynapseDriverOnHICANN),
    Synapse(SynapseOnHICANN),
}

impl L1Segment {
    pub fn is_hicann(&self) -> bool {
        matches!(self, L1Segment::Hicann(_))
    }

    pub fn as_hicann(&self) -> Option<HicannOnWafer> {
        match self {
            L1Segment::Hicann(h) => Some(*h),
            _ => None,
        }
    }
}

impl fmt::Display for L1Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            L1Segment::Hicann(h) => write!(f, "{h}"),
            L1Segment::Merger(m) => write!(f, "{m}"),
            L1Segment::DncMerger(m) => write!(f, "{m}"),
            L1Segment::GbitLink(g) => write!(f, "{g}"),
            L1Segment::RepeaterBlock(r) => write!(f, "{r}"),
            L1Segment::HLine(l) => write!(f, "{l}"),
            L1Segment::VLine(l) => write!(f, "{l}"),
            L1Segment::HRepeater(r) => write!(f, "HR{}_{}", r.to_hline(), r.to_side_horizontal()),
            L1Segment::VRepeater(r) => write!(f, "VR{}", r.to_vline()),
            L1Segment::SynapseDriver(d) => write!(f, "{d}"),
            L1Segment::Synapse(s) => write!(f, "{s}"),
        }
    }
}

/// Whether `next` may immediately follow `prev` while `current_hicann` is
/// the chip the route is currently on. Returns the *new* current HICANN on
/// a chip-crossing pair (`Some(current_hicann)` unchanged otherwise), or
/// `None` if the pair is invalid.
///
/// Continuation-line index consistency across a `HicannOnWafer` crossing
/// (the three-segment `HLine, Hicann, HLine` / `VLine, Hicann, VLine`
/// rule) is enforced by [`crate::route::L1Route::verify`], which has
/// access to the segment *before* the crossing; this function only
/// validates pairs it can judge without that context.
pub fn is_valid_successor(
    current_hicann: HicannOnWafer,
    prev: &L1Segment,
    next: &L1Segment,
) -> Option<HicannOnWafer> {
    use L1Segment::*;
    match (prev, next) {
        (VLine(v), HLine(h)) | (HLine(h), VLine(v)) => {
            crossbar_exists(*v, *h).then_some(current_hicann)
        }

        (DncMerger(dnc), HLine(h)) => (dnc.sending_repeater_hline() == *h).then_some(current_hicann),

        (DncMerger(_), Hicann(next_hicann)) => {
            (current_hicann.west().ok() == Some(*next_hicann)).then_some(*next_hicann)
        }

        (HLine(h), Hicann(next_hicann)) => {
            let east = current_hicann.east().ok();
            let west = current_hicann.west().ok();
            if Some(*next_hicann) == east || Some(*next_hicann) == west {
                let _ = h;
                Some(*next_hicann)
            } else {
                None
            }
        }

        (VLine(v), Hicann(next_hicann)) => {
            let north = current_hicann.north().ok();
            let south = current_hicann.south().ok();
            if Some(*next_hicann) == north || Some(*next_hicann) == south {
                let _ = v;
                Some(*next_hicann)
            } else {
                None
            }
        }

        (Hicann(h), HLine(_)) | (Hicann(h), VLine(_)) => Some(*h),

        (VLine(v), SynapseDriver(d)) => {
            if v.to_side_horizontal() == d.to_side_horizontal() {
                Some(current_hicann)
            } else {
                None
            }
        }

        (SynapseDriver(a), SynapseDriver(b)) => a.chains_with(b).then_some(current_hicann),

        (RepeaterBlock(rb), HLine(h)) => (*rb == RepeaterBlockOnHICANN::of_hline(*h)).then_some(current_hicann),

        (Merger(a), Merger(b)) => (a.parent() == Some(*b)).then_some(current_hicann),

        (Merger(m), DncMerger(dnc)) => (dnc.source_merger() == *m).then_some(current_hicann),

        (DncMerger(a), GbitLink(b)) | (GbitLink(b), DncMerger(a)) => {
            (b.matching_dnc_merger() == *a).then_some(current_hicann)
        }

        (SynapseDriver(_), Synapse(_)) => Some(current_hicann),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(x: u16, y: u16) -> HicannOnWafer {
        HicannOnWafer::new(x, y).unwrap()
    }

    #[test]
    fn crossbar_pair_requires_existence() {
        let hicann = h(18, 8);
        let hline = HLineOnHICANN::new(0).unwrap();
        let vline = VLineOnHICANN::new(0).unwrap();
        let valid = is_valid_successor(hicann, &L1Segment::VLine(vline), &L1Segment::HLine(hline));
        assert_eq!(valid, Some(hicann));
    }

    #[test]
    fn driver_chain_requires_same_side_and_delta_two() {
        let hicann = h(18, 8);
        let a = SynapseDriverOnHICANN::new(SideHorizontal::Left, 4).unwrap();
        let b = SynapseDriverOnHICANN::new(SideHorizontal::Left, 6).unwrap();
        let c = SynapseDriverOnHICANN::new(SideHorizontal::Right, 6).unwrap();
        assert!(is_valid_successor(hicann, &L1Segment::SynapseDriver(a), &L1Segment::SynapseDriver(b)).is_some());
        assert!(is_valid_successor(hicann, &L1Segment::SynapseDriver(a), &L1Segment::SynapseDriver(c)).is_none());
    }

    #[test]
    fn merger_tree_step_requires_parent_relation() {
        let hicann = h(18, 8);
        let leaf = MergerOnHICANN::new(0, 0).unwrap();
        let parent = leaf.parent().unwrap();
        let not_parent = MergerOnHICANN::new(1, 3).unwrap();
        assert!(is_valid_successor(hicann, &L1Segment::Merger(leaf), &L1Segment::Merger(parent)).is_some());
        assert!(is_valid_successor(hicann, &L1Segment::Merger(leaf), &L1Segment::Merger(not_parent)).is_none());
    }

    #[test]
    fn dnc_merger_to_hicann_requires_west_neighbour() {
        let hicann = h(18, 8);
        let west = hicann.west().unwrap();
        let east = hicann.east().unwrap();
        let dnc = DNCMergerOnHICANN::new(0).unwrap();
        assert_eq!(
            is_valid_successor(hicann, &L1Segment::DncMerger(dnc), &L1Segment::Hicann(west)),
            Some(west)
        );
        assert_eq!(
            is_valid_successor(hicann, &L1Segment::DncMerger(dnc), &L1Segment::Hicann(east)),
            None
        );
    }
}
