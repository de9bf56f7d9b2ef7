//! The on-chip merger tree: `Merger0..3OnHICANN`, `DNCMergerOnHICANN`, and
//! their fixed adjacency to the sending repeater / Gbit link layer.

use crate::bus::HLineOnHICANN;
use crate::error::{CoordError, CoordResult};
use std::fmt;

/// A node in one of the four merger tiers (0 = leaves, 3 = root).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergerOnHICANN {
    level: u8,
    index: u8,
}

impl MergerOnHICANN {
    /// Number of merger nodes at each tier, indexed by level 0..=3.
    pub const TIER_SIZES: [u8; 4] = [8, 4, 2, 1];

    pub const fn new(level: u8, index: u8) -> CoordResult<Self> {
        if level > 3 {
            return Err(CoordError::OutOfBounds { field: "merger_level", value: level as i64, max: 3 });
        }
        if index >= Self::TIER_SIZES[level as usize] {
            return Err(CoordError::OutOfBounds {
                field: "merger_index",
                value: index as i64,
                max: Self::TIER_SIZES[level as usize] as i64 - 1,
            });
        }
        Ok(MergerOnHICANN { level, index })
    }

    pub const fn level(&self) -> u8 {
        self.level
    }

    pub const fn index(&self) -> u8 {
        self.index
    }

    /// The parent merger this node feeds into, following the fixed 2-input
    /// combining tree (`Merger0 -> Merger1 -> Merger2 -> Merger3`).
    pub fn parent(&self) -> Option<MergerOnHICANN> {
        if self.level == 3 {
            return None;
        }
        Some(MergerOnHICANN::new(self.level + 1, self.index / 2).expect("parent index in range"))
    }

    /// The two children feeding into this node, if any (`Merger3..1`).
    pub fn children(&self) -> Option<(MergerOnHICANN, MergerOnHICANN)> {
        if self.level == 0 {
            return None;
        }
        let left = MergerOnHICANN::new(self.level - 1, self.index * 2).expect("child in range");
        let right = MergerOnHICANN::new(self.level - 1, self.index * 2 + 1).expect("child in range");
        Some((left, right))
    }

    pub fn iter_level(level: u8) -> impl Iterator<Item = MergerOnHICANN> {
        (0..Self::TIER_SIZES[level as usize]).map(move |i| MergerOnHICANN::new(level, i).unwrap())
    }
}

impl fmt::Display for MergerOnHICANN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}_{}", self.level, self.index)
    }
}

/// One of the 8 DNC-facing event output lanes of a chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DNCMergerOnHICANN(u8);

impl DNCMergerOnHICANN {
    pub const SIZE: u8 = 8;

    pub const fn new(raw: u8) -> CoordResult<Self> {
        if raw >= Self::SIZE {
            return Err(CoordError::OutOfBounds { field: "dnc_merger", value: raw as i64, max: Self::SIZE as i64 - 1 });
        }
        Ok(DNCMergerOnHICANN(raw))
    }

    pub const fn value(&self) -> u8 {
        self.0
    }

    /// The fixed Merger-tree node this DNC merger collects from, following
    /// the ground truth's 8 fixed `DNCMerger -> Merger` edges:
    /// `0->M0(0), 1->M1(0), 2->M0(2), 3->M3(0), 4->M0(4), 5->M2(1), 6->M1(3), 7->M0(7)`.
    pub fn source_merger(&self) -> MergerOnHICANN {
        let (level, index) = match self.0 {
            0 => (0, 0),
            1 => (1, 0),
            2 => (0, 2),
            3 => (3, 0),
            4 => (0, 4),
            5 => (2, 1),
            6 => (1, 3),
            7 => (0, 7),
            _ => unreachable!(),
        };
        MergerOnHICANN::new(level, index).unwrap()
    }

    /// The unique sending-repeater HLine this merger's output reaches.
    pub fn sending_repeater_hline(&self) -> HLineOnHICANN {
        HLineOnHICANN::new(self.0 * 8).expect("dnc*8 in HLine range")
    }

    pub fn iter_all() -> impl Iterator<Item = DNCMergerOnHICANN> {
        (0..Self::SIZE).map(DNCMergerOnHICANN)
    }
}

impl fmt::Display for DNCMergerOnHICANN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DNC{}", self.0)
    }
}

/// One of the 8 chip-to-FPGA Gbit links, matched 1:1 by index to a DNC
/// merger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GbitLinkOnHICANN(u8);

impl GbitLinkOnHICANN {
    pub const fn new(raw: u8) -> CoordResult<Self> {
        if raw >= DNCMergerOnHICANN::SIZE {
            return Err(CoordError::OutOfBounds { field: "gbit_link", value: raw as i64, max: DNCMergerOnHICANN::SIZE as i64 - 1 });
        }
        Ok(GbitLinkOnHICANN(raw))
    }

    pub const fn value(&self) -> u8 {
        self.0
    }

    pub fn matching_dnc_merger(&self) -> DNCMergerOnHICANN {
        DNCMergerOnHICANN::new(self.0).unwrap()
    }
}

impl fmt::Display for GbitLinkOnHICANN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GL{}", self.0)
    }
}

/// One of the small number of repeater blocks gating test-port access to
/// H/V lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepeaterBlockOnHICANN(u8);

impl RepeaterBlockOnHICANN {
    pub const SIZE: u8 = 8;

    pub const fn new(raw: u8) -> CoordResult<Self> {
        if raw >= Self::SIZE {
            return Err(CoordError::OutOfBounds { field: "repeater_block", value: raw as i64, max: Self::SIZE as i64 - 1 });
        }
        Ok(RepeaterBlockOnHICANN(raw))
    }

    pub const fn value(&self) -> u8 {
        self.0
    }

    pub fn of_hline(hline: HLineOnHICANN) -> Self {
        RepeaterBlockOnHICANN((hline.raw() / 8) % Self::SIZE)
    }
}

impl fmt::Display for RepeaterBlockOnHICANN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RB{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merger_tree_has_23_nodes() {
        let total: usize = (0..4).map(|l| MergerOnHICANN::iter_level(l).count()).sum();
        assert_eq!(total, 8 + 4 + 2 + 1);
    }

    #[test]
    fn parent_child_are_consistent() {
        for m in MergerOnHICANN::iter_level(0) {
            let parent = m.parent().unwrap();
            let (c0, c1) = parent.children().unwrap();
            assert!(m == c0 || m == c1);
        }
    }

    #[test]
    fn dnc_merger_source_mergers_match_ground_truth_table() {
        let expected = [
            (0, (0, 0)),
            (1, (1, 0)),
            (2, (0, 2)),
            (3, (3, 0)),
            (4, (0, 4)),
            (5, (2, 1)),
            (6, (1, 3)),
            (7, (0, 7)),
        ];
        for (dnc, (level, index)) in expected {
            let m = DNCMergerOnHICANN::new(dnc).unwrap().source_merger();
            assert_eq!((m.level(), m.index()), (level, index));
        }
    }
}
