//! `L1Route`: a validated sequence of `L1Segment`s and its join/split
//! algebra.

use crate::error::{RouteError, RouteResult};
use crate::segment::{is_valid_successor, L1Segment};
use whc_coords::HicannOnWafer;

/// How two routes are joined end-to-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// Plain concatenation; the join boundary must satisfy the successor
    /// relation on its own (and the chip-crossing triple rule if the
    /// boundary crosses a `HicannOnWafer`).
    Extend,
    /// The previous route's last segment and the next route's first
    /// segment must be equal and on the same chip; the duplicate is
    /// dropped.
    MergeCommonEndpoints,
}

/// A validated, non-empty sequence of `L1Segment`s starting with a
/// `HicannOnWafer` and ending with a non-`HicannOnWafer` segment.
#[derive(Debug, Clone, PartialEq)]
pub struct L1Route {
    segments: Vec<L1Segment>,
}

impl L1Route {
    /// Build and validate a route from a segment sequence.
    pub fn new(segments: Vec<L1Segment>) -> RouteResult<Self> {
        let route = L1Route { segments };
        route.verify()?;
        Ok(route)
    }

    pub fn segments(&self) -> &[L1Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn front(&self) -> RouteResult<&L1Segment> {
        self.segments.first().ok_or(RouteError::Empty)
    }

    pub fn back(&self) -> RouteResult<&L1Segment> {
        self.segments.last().ok_or(RouteError::Empty)
    }

    pub fn source_hicann(&self) -> RouteResult<HicannOnWafer> {
        self.front()?.as_hicann().ok_or(RouteError::MissingLeadingHicann)
    }

    /// The last `HicannOnWafer` segment in the sequence.
    pub fn target_hicann(&self) -> RouteResult<HicannOnWafer> {
        self.segments
            .iter()
            .rev()
            .find_map(|s| s.as_hicann())
            .ok_or(RouteError::MissingLeadingHicann)
    }

    /// Walk the full segment sequence checking the successor relation,
    /// including the three-segment chip-crossing rule that
    /// [`is_valid_successor`] alone cannot judge. Returns the index of the
    /// first broken pair, or `None` if the whole route is valid.
    pub fn find_invalid(&self) -> Option<usize> {
        if self.segments.is_empty() {
            return Some(0);
        }
        if !self.segments[0].is_hicann() {
            return Some(0);
        }
        if self.segments.last().unwrap().is_hicann() {
            return Some(self.segments.len() - 1);
        }

        let mut current_hicann = self.segments[0].as_hicann().unwrap();
        let mut entry_line: Option<L1Segment> = None;

        for i in 0..self.segments.len() - 1 {
            let prev = &self.segments[i];
            let next = &self.segments[i + 1];
            match is_valid_successor(current_hicann, prev, next) {
                Some(new_hicann) => {
                    if next.is_hicann() {
                        entry_line = Some(*prev);
                        current_hicann = new_hicann;
                    } else if prev.is_hicann() {
                        if let Some(entry) = entry_line.take() {
                            if !continuation_matches(&entry, next) {
                                return Some(i);
                            }
                        }
                        current_hicann = new_hicann;
                    } else {
                        current_hicann = new_hicann;
                    }
                }
                None => return Some(i),
            }
        }
        None
    }

    pub fn verify(&self) -> RouteResult<()> {
        match self.find_invalid() {
            None => Ok(()),
            Some(0) if self.segments.is_empty() => Err(RouteError::Empty),
            Some(0) if !self.segments.first().map(|s| s.is_hicann()).unwrap_or(false) => {
                Err(RouteError::MissingLeadingHicann)
            }
            Some(i) if i == self.segments.len().saturating_sub(1) && self.segments.last().map(|s| s.is_hicann()).unwrap_or(false) => {
                Err(RouteError::TrailingHicann)
            }
            Some(i) => Err(RouteError::InvalidSuccessor(i)),
        }
    }

    /// Append a segment without a chip change.
    pub fn append_segment(&mut self, segment: L1Segment) -> RouteResult<()> {
        let current = self.target_hicann()?;
        let prev = *self.back()?;
        is_valid_successor(current, &prev, &segment).ok_or(RouteError::InvalidSuccessor(self.segments.len()))?;
        self.segments.push(segment);
        Ok(())
    }

    /// Append a chip-crossing pair: `[HicannOnWafer, segment]`.
    pub fn append_hicann(&mut self, hicann: HicannOnWafer, segment: L1Segment) -> RouteResult<()> {
        let current = self.target_hicann()?;
        let prev = *self.back()?;
        let entry_line = prev;
        let new_current =
            is_valid_successor(current, &prev, &L1Segment::Hicann(hicann)).ok_or(RouteError::InvalidSuccessor(self.segments.len()))?;
        if !continuation_matches(&entry_line, &segment) {
            return Err(RouteError::InvalidSuccessor(self.segments.len() + 1));
        }
        self.segments.push(L1Segment::Hicann(hicann));
        self.segments.push(segment);
        let _ = new_current;
        Ok(())
    }

    /// Join `self` and `other` end to end under the given mode.
    pub fn append(mut self, other: L1Route, mode: JoinMode) -> RouteResult<L1Route> {
        match mode {
            JoinMode::Extend => {
                let current = self.target_hicann()?;
                let prev = *self.back()?;
                let first_is_hicann = other.front()?.is_hicann();
                let joined_current = is_valid_successor(current, &prev, other.front()?)
                    .ok_or(RouteError::InvalidSuccessor(self.segments.len()))?;
                let _ = joined_current;
                if first_is_hicann && other.segments.len() > 1 {
                    if !continuation_matches(&prev, &other.segments[1]) {
                        return Err(RouteError::InvalidSuccessor(self.segments.len() + 1));
                    }
                }
                self.segments.extend(other.segments);
                self.verify()?;
                Ok(self)
            }
            JoinMode::MergeCommonEndpoints => {
                let target = self.target_hicann()?;
                let back = *self.back()?;
                if other.segments.len() < 2 {
                    return Err(RouteError::JoinMismatch);
                }
                let shared_hicann = other.segments[0].as_hicann().filter(|&h| h == target);
                if shared_hicann.is_none() || other.segments[1] != back {
                    return Err(RouteError::JoinMismatch);
                }
                self.segments.extend(other.segments.into_iter().skip(2));
                self.verify()?;
                Ok(self)
            }
        }
    }

    pub fn prepend(self, other: L1Route, mode: JoinMode) -> RouteResult<L1Route> {
        other.append(self, mode)
    }

    /// Split at `index` into two valid routes. If the tail does not begin
    /// with a `HicannOnWafer`, the last known HICANN is re-inserted as its
    /// start (invariant 1).
    pub fn split(&self, index: usize) -> RouteResult<(L1Route, L1Route)> {
        if index == 0 || index >= self.segments.len() {
            return Err(RouteError::SplitOutOfRange);
        }
        let head: Vec<L1Segment> = self.segments[..index].to_vec();
        let mut tail: Vec<L1Segment> = self.segments[index..].to_vec();

        if !tail[0].is_hicann() {
            let last_hicann = head
                .iter()
                .rev()
                .find_map(|s| s.as_hicann())
                .ok_or(RouteError::MissingLeadingHicann)?;
            tail.insert(0, L1Segment::Hicann(last_hicann));
        }

        let head_route = L1Route::new(head)?;
        let tail_route = L1Route::new(tail)?;
        Ok((head_route, tail_route))
    }
}

/// Whether `next`'s bus-line index continues `entry`'s across a chip
/// boundary (same line index, as `HLineOnHICANN`/`VLineOnHICANN`'s
/// `east`/`west`/`north`/`south` are identity maps in this coordinate
/// model).
fn continuation_matches(entry: &L1Segment, next: &L1Segment) -> bool {
    match (entry, next) {
        (L1Segment::HLine(a), L1Segment::HLine(b)) => a == b,
        (L1Segment::VLine(a), L1Segment::VLine(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whc_coords::{HLineOnHICANN, VLineOnHICANN};

    fn h(x: u16, y: u16) -> HicannOnWafer {
        HicannOnWafer::new(x, y).unwrap()
    }

    #[test]
    fn minimal_route_must_start_with_hicann_and_not_end_with_one() {
        let hicann = h(18, 8);
        let hline = HLineOnHICANN::new(3).unwrap();
        let route = L1Route::new(vec![L1Segment::Hicann(hicann), L1Segment::HLine(hline)]).unwrap();
        assert_eq!(route.source_hicann().unwrap(), hicann);
        assert_eq!(route.target_hicann().unwrap(), hicann);
    }

    #[test]
    fn rejects_trailing_hicann() {
        let hicann = h(18, 8);
        let hline = HLineOnHICANN::new(3).unwrap();
        let err = L1Route::new(vec![L1Segment::HLine(hline), L1Segment::Hicann(hicann)]).unwrap_err();
        assert_eq!(err, RouteError::MissingLeadingHicann);
    }

    #[test]
    fn chip_crossing_requires_matching_continuation_line() {
        let hicann = h(18, 8);
        let east = hicann.east().unwrap();
        let hline = HLineOnHICANN::new(3).unwrap();
        let ok = L1Route::new(vec![
            L1Segment::Hicann(hicann),
            L1Segment::HLine(hline),
            L1Segment::Hicann(east),
            L1Segment::HLine(hline),
        ]);
        assert!(ok.is_ok());

        let other_hline = HLineOnHICANN::new(4).unwrap();
        let bad = L1Route::new(vec![
            L1Segment::Hicann(hicann),
            L1Segment::HLine(hline),
            L1Segment::Hicann(east),
            L1Segment::HLine(other_hline),
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn split_reinserts_last_known_hicann() {
        let hicann = h(18, 8);
        let vline = VLineOnHICANN::new(0).unwrap();
        let hline = HLineOnHICANN::new(0).unwrap();
        let route = L1Route::new(vec![L1Segment::Hicann(hicann), L1Segment::VLine(vline), L1Segment::HLine(hline)]).unwrap();
        let (first, second) = route.split(1).unwrap();
        assert_eq!(first.segments(), &[L1Segment::Hicann(hicann), L1Segment::VLine(vline)]);
        assert_eq!(second.segments(), &[L1Segment::Hicann(hicann), L1Segment::HLine(hline)]);
    }

    #[test]
    fn merge_common_endpoints_drops_the_shared_hicann_and_bus_line() {
        let hicann = h(18, 8);
        let vline = VLineOnHICANN::new(0).unwrap();
        let hline = HLineOnHICANN::new(0).unwrap();
        let a = L1Route::new(vec![L1Segment::Hicann(hicann), L1Segment::VLine(vline)]).unwrap();
        let b = L1Route::new(vec![L1Segment::Hicann(hicann), L1Segment::VLine(vline), L1Segment::HLine(hline)]).unwrap();
        let a_len = a.len();
        let b_len = b.len();
        let merged = a.append(b, JoinMode::MergeCommonEndpoints).unwrap();
        assert_eq!(merged.len(), a_len + b_len - 2);
        assert_eq!(merged.segments(), &[L1Segment::Hicann(hicann), L1Segment::VLine(vline), L1Segment::HLine(hline)]);
    }
}
