//! Synapse driver, row, column and individual synapse coordinates.

use crate::bus::SideHorizontal;
use crate::error::{CoordError, CoordResult};
use std::fmt;

/// A synapse driver: one of 112 per side of a HICANN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynapseDriverOnHICANN {
    side: SideHorizontal,
    y: u8,
}

impl SynapseDriverOnHICANN {
    pub const SIZE: u8 = 112;

    pub const fn new(side: SideHorizontal, y: u8) -> CoordResult<Self> {
        if y >= Self::SIZE {
            return Err(CoordError::OutOfBounds { field: "driver_y", value: y as i64, max: Self::SIZE as i64 - 1 });
        }
        Ok(SynapseDriverOnHICANN { side, y })
    }

    pub const fn side(&self) -> SideHorizontal {
        self.side
    }

    pub const fn y(&self) -> u8 {
        self.y
    }

    pub fn to_side_horizontal(&self) -> SideHorizontal {
        self.side
    }

    /// The next driver towards increasing y on the same side, if any.
    pub fn next(&self) -> Option<Self> {
        if self.y + 1 >= Self::SIZE {
            None
        } else {
            Some(SynapseDriverOnHICANN { side: self.side, y: self.y + 1 })
        }
    }

    /// The previous driver towards decreasing y on the same side, if any.
    pub fn prev(&self) -> Option<Self> {
        if self.y == 0 {
            None
        } else {
            Some(SynapseDriverOnHICANN { side: self.side, y: self.y - 1 })
        }
    }

    /// Two adjacent drivers chain iff same side and `|delta y| == 2`
    /// (drivers occupy every other row slot).
    pub fn chains_with(&self, other: &Self) -> bool {
        self.side == other.side && (self.y as i16 - other.y as i16).abs() == 2
    }

    pub fn rows(&self) -> (SynapseRowOnHICANN, SynapseRowOnHICANN) {
        (
            SynapseRowOnHICANN { driver: *self, top: true },
            SynapseRowOnHICANN { driver: *self, top: false },
        )
    }

    pub fn iter_side(side: SideHorizontal) -> impl Iterator<Item = SynapseDriverOnHICANN> {
        (0..Self::SIZE).map(move |y| SynapseDriverOnHICANN { side, y })
    }
}

impl fmt::Display for SynapseDriverOnHICANN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SD{}{}", self.side, self.y)
    }
}

/// One of the two synapse rows belonging to a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynapseRowOnHICANN {
    driver: SynapseDriverOnHICANN,
    top: bool,
}

impl SynapseRowOnHICANN {
    pub const SYNAPSES_PER_ROW: u16 = 256;

    pub fn driver(&self) -> SynapseDriverOnHICANN {
        self.driver
    }

    pub fn is_top(&self) -> bool {
        self.top
    }

    pub fn synapse(&self, column: u16) -> CoordResult<SynapseOnHICANN> {
        if column >= Self::SYNAPSES_PER_ROW {
            return Err(CoordError::OutOfBounds {
                field: "column",
                value: column as i64,
                max: Self::SYNAPSES_PER_ROW as i64 - 1,
            });
        }
        Ok(SynapseOnHICANN { row: *self, column })
    }
}

impl fmt::Display for SynapseRowOnHICANN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.driver, if self.top { "T" } else { "B" })
    }
}

/// A synapse column on a HICANN (shared across all rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynapseColumnOnHICANN(u16);

impl SynapseColumnOnHICANN {
    pub const fn new(raw: u16) -> CoordResult<Self> {
        if raw >= SynapseRowOnHICANN::SYNAPSES_PER_ROW {
            return Err(CoordError::OutOfBounds {
                field: "synapse_column",
                value: raw as i64,
                max: SynapseRowOnHICANN::SYNAPSES_PER_ROW as i64 - 1,
            });
        }
        Ok(SynapseColumnOnHICANN(raw))
    }

    pub const fn value(&self) -> u16 {
        self.0
    }

    pub const fn is_even(&self) -> bool {
        self.0 % 2 == 0
    }
}

impl fmt::Display for SynapseColumnOnHICANN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SC{}", self.0)
    }
}

/// A single synapse circuit: the intersection of a row and a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynapseOnHICANN {
    row: SynapseRowOnHICANN,
    column: u16,
}

impl SynapseOnHICANN {
    pub fn row(&self) -> SynapseRowOnHICANN {
        self.row
    }

    pub fn column(&self) -> SynapseColumnOnHICANN {
        SynapseColumnOnHICANN::new(self.column).unwrap()
    }
}

impl fmt::Display for SynapseOnHICANN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.SY{}", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chaining_requires_same_side_and_delta_two() {
        let a = SynapseDriverOnHICANN::new(SideHorizontal::Left, 4).unwrap();
        let b = SynapseDriverOnHICANN::new(SideHorizontal::Left, 6).unwrap();
        let c = SynapseDriverOnHICANN::new(SideHorizontal::Right, 6).unwrap();
        assert!(a.chains_with(&b));
        assert!(!a.chains_with(&c));
    }

    #[test]
    fn row_sum_law_fixture() {
        // 7 drivers realise 14 rows (two per driver).
        let drivers: Vec<_> = SynapseDriverOnHICANN::iter_side(SideHorizontal::Left).take(7).collect();
        let rows: usize = drivers.iter().map(|_| 2).sum();
        assert_eq!(rows, drivers.len() * 2);
    }
}
