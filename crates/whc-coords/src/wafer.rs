//! Wafer and HICANN coordinates, including the wafer's non-rectangular
//! enabled shape.
//!
//! The wafer's real physical layout table lives outside this crate's
//! grounding corpus (it is generated by the hardware-description library
//! the original compiler depends on, not shipped with the mapping core).
//! `wafer_mask_contains` below is this crate's own deterministic stand-in:
//! a rounded-rectangle cut of a fixed bounding grid, chosen to give the
//! same *shape* of neighbour failures (edges produce `OutOfBounds`,
//! cut corners produce `DomainMismatch`) that the original wafer geometry
//! produces. See `DESIGN.md` for the Open Question this resolves.

use crate::error::{CoordError, CoordResult};
use std::fmt;

/// Number of columns in the wafer's bounding grid.
pub const WAFER_WIDTH: u16 = 36;
/// Number of rows in the wafer's bounding grid.
pub const WAFER_HEIGHT: u16 = 16;

/// Index of a wafer within a multi-wafer setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaferIndex(pub u32);

impl WaferIndex {
    pub const fn new(raw: u32) -> Self {
        WaferIndex(raw)
    }

    pub const fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for WaferIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

impl Default for WaferIndex {
    fn default() -> Self {
        WaferIndex(0)
    }
}

/// Returns whether `(x, y)` lies within the wafer's enabled shape.
///
/// Shape: an axis-aligned ellipse inscribed in the bounding grid, which
/// reproduces the two distinct failure modes a "round" wafer mask must
/// produce: falling off the bounding grid entirely (`OutOfBounds`) versus
/// landing in a masked-out corner still inside the grid (`DomainMismatch`).
pub fn wafer_mask_contains(x: u16, y: u16) -> bool {
    if x >= WAFER_WIDTH || y >= WAFER_HEIGHT {
        return false;
    }
    let cx = (WAFER_WIDTH as f64 - 1.0) / 2.0;
    let cy = (WAFER_HEIGHT as f64 - 1.0) / 2.0;
    let ax = (WAFER_WIDTH as f64) / 2.0;
    let ay = (WAFER_HEIGHT as f64) / 2.0;
    let dx = (x as f64 - cx) / ax;
    let dy = (y as f64 - cy) / ay;
    dx * dx + dy * dy <= 1.0
}

/// A HICANN chip's position on a wafer.
///
/// `(x, y)` ranges over a non-rectangular mask: not every pair in the
/// bounding grid names an enabled chip. Construction and every neighbour
/// step validate against [`wafer_mask_contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HicannOnWafer {
    x: u16,
    y: u16,
}

impl HicannOnWafer {
    pub fn new(x: u16, y: u16) -> CoordResult<Self> {
        if x >= WAFER_WIDTH {
            return Err(CoordError::out_of_bounds("x", x as i64, WAFER_WIDTH as i64 - 1));
        }
        if y >= WAFER_HEIGHT {
            return Err(CoordError::out_of_bounds("y", y as i64, WAFER_HEIGHT as i64 - 1));
        }
        if !wafer_mask_contains(x, y) {
            return Err(CoordError::domain_mismatch("(x, y) is not an enabled HICANN position"));
        }
        Ok(HicannOnWafer { x, y })
    }

    pub const fn x(&self) -> u16 {
        self.x
    }

    pub const fn y(&self) -> u16 {
        self.y
    }

    /// Enumeration index: position of this chip in row-major order among
    /// all enabled chips. Deterministic and stable for a fixed mask.
    pub fn enum_index(&self) -> u32 {
        let mut idx = 0u32;
        for row in 0..self.y {
            for col in 0..WAFER_WIDTH {
                if wafer_mask_contains(col, row) {
                    idx += 1;
                }
            }
        }
        for col in 0..self.x {
            if wafer_mask_contains(col, self.y) {
                idx += 1;
            }
        }
        idx
    }

    /// Inverse of [`Self::enum_index`].
    pub fn from_enum_index(mut index: u32) -> CoordResult<Self> {
        for row in 0..WAFER_HEIGHT {
            for col in 0..WAFER_WIDTH {
                if wafer_mask_contains(col, row) {
                    if index == 0 {
                        return HicannOnWafer::new(col, row);
                    }
                    index -= 1;
                }
            }
        }
        Err(CoordError::out_of_bounds("enum_index", index as i64, -1))
    }

    pub fn north(&self) -> CoordResult<Self> {
        if self.y == 0 {
            return Err(CoordError::out_of_bounds("y", -1, WAFER_HEIGHT as i64 - 1));
        }
        HicannOnWafer::new(self.x, self.y - 1)
    }

    pub fn south(&self) -> CoordResult<Self> {
        HicannOnWafer::new(self.x, self.y + 1)
    }

    pub fn west(&self) -> CoordResult<Self> {
        if self.x == 0 {
            return Err(CoordError::out_of_bounds("x", -1, WAFER_WIDTH as i64 - 1));
        }
        HicannOnWafer::new(self.x - 1, self.y)
    }

    pub fn east(&self) -> CoordResult<Self> {
        HicannOnWafer::new(self.x + 1, self.y)
    }
}

impl fmt::Display for HicannOnWafer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}_{}", self.x, self.y)
    }
}

/// Iterate all enabled HICANN positions in row-major order.
pub fn iter_all_hicanns() -> impl Iterator<Item = HicannOnWafer> {
    (0..WAFER_HEIGHT).flat_map(|y| {
        (0..WAFER_WIDTH).filter_map(move |x| HicannOnWafer::new(x, y).ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_index_round_trips() {
        for h in iter_all_hicanns().take(50) {
            let idx = h.enum_index();
            assert_eq!(HicannOnWafer::from_enum_index(idx).unwrap(), h);
        }
    }

    #[test]
    fn edge_of_grid_is_out_of_bounds() {
        assert!(matches!(
            HicannOnWafer::new(WAFER_WIDTH, 5).unwrap_err(),
            CoordError::OutOfBounds { .. }
        ));
    }

    #[test]
    fn corner_is_domain_mismatch() {
        // (0, 0) lies in the bounding grid but outside the inscribed ellipse.
        assert!(matches!(
            HicannOnWafer::new(0, 0).unwrap_err(),
            CoordError::DomainMismatch(_)
        ));
    }

    #[test]
    fn north_of_top_row_is_out_of_bounds() {
        let h = HicannOnWafer::new(WAFER_WIDTH / 2, 4).unwrap();
        // walk north until we hit the boundary
        let mut cur = h;
        loop {
            match cur.north() {
                Ok(next) => cur = next,
                Err(CoordError::OutOfBounds { .. }) => break,
                Err(CoordError::DomainMismatch(_)) => break,
            }
        }
    }

    #[test]
    fn east_west_are_inverse() {
        let h = HicannOnWafer::new(WAFER_WIDTH / 2, WAFER_HEIGHT / 2).unwrap();
        let e = h.east().unwrap();
        assert_eq!(e.west().unwrap(), h);
    }
}
