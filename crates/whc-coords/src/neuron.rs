//! Neuron block and denmem coordinates.

use crate::error::{CoordError, CoordResult};
use std::fmt;

/// One of the 8 neuron blocks on a HICANN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeuronBlockOnHICANN(u8);

impl NeuronBlockOnHICANN {
    pub const SIZE: u8 = 8;

    pub const fn new(raw: u8) -> CoordResult<Self> {
        if raw >= Self::SIZE {
            return Err(CoordError::OutOfBounds {
                field: "neuron_block",
                value: raw as i64,
                max: Self::SIZE as i64 - 1,
            });
        }
        Ok(NeuronBlockOnHICANN(raw))
    }

    pub const fn value(&self) -> u8 {
        self.0
    }

    pub fn iter_all() -> impl Iterator<Item = NeuronBlockOnHICANN> {
        (0..Self::SIZE).map(|i| NeuronBlockOnHICANN(i))
    }
}

impl fmt::Display for NeuronBlockOnHICANN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NB{}", self.0)
    }
}

/// Denmem position within a neuron block: a 32 (x) x 2 (y) rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeuronOnNeuronBlock {
    x: u8,
    y: u8,
}

impl NeuronOnNeuronBlock {
    pub const WIDTH: u8 = 32;
    pub const HEIGHT: u8 = 2;

    pub const fn new(x: u8, y: u8) -> CoordResult<Self> {
        if x >= Self::WIDTH {
            return Err(CoordError::OutOfBounds {
                field: "x",
                value: x as i64,
                max: Self::WIDTH as i64 - 1,
            });
        }
        if y >= Self::HEIGHT {
            return Err(CoordError::OutOfBounds {
                field: "y",
                value: y as i64,
                max: Self::HEIGHT as i64 - 1,
            });
        }
        Ok(NeuronOnNeuronBlock { x, y })
    }

    pub const fn x(&self) -> u8 {
        self.x
    }

    pub const fn y(&self) -> u8 {
        self.y
    }

    pub const fn is_even(&self) -> bool {
        self.x % 2 == 0
    }

    pub fn iter_all() -> impl Iterator<Item = NeuronOnNeuronBlock> {
        (0..Self::HEIGHT).flat_map(|y| (0..Self::WIDTH).map(move |x| NeuronOnNeuronBlock { x, y }))
    }
}

impl fmt::Display for NeuronOnNeuronBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}_{}", self.x, self.y)
    }
}

/// Concatenation of a neuron block and a denmem position: a single denmem
/// on a HICANN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeuronOnHICANN {
    block: NeuronBlockOnHICANN,
    on_block: NeuronOnNeuronBlock,
}

impl NeuronOnHICANN {
    pub fn new(block: NeuronBlockOnHICANN, on_block: NeuronOnNeuronBlock) -> Self {
        NeuronOnHICANN { block, on_block }
    }

    pub fn block(&self) -> NeuronBlockOnHICANN {
        self.block
    }

    pub fn on_block(&self) -> NeuronOnNeuronBlock {
        self.on_block
    }

    /// Global x column across the whole HICANN (block index folded into
    /// the column, for neuron blocks laid out side by side).
    pub fn global_x(&self) -> u16 {
        self.block.value() as u16 * NeuronOnNeuronBlock::WIDTH as u16 + self.on_block.x() as u16
    }

    pub fn is_even(&self) -> bool {
        self.on_block.is_even()
    }
}

impl fmt::Display for NeuronOnHICANN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.block, self.on_block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neuron_block_rejects_out_of_range() {
        assert!(NeuronBlockOnHICANN::new(8).is_err());
        assert!(NeuronBlockOnHICANN::new(7).is_ok());
    }

    #[test]
    fn neuron_on_neuron_block_parity() {
        let even = NeuronOnNeuronBlock::new(0, 0).unwrap();
        let odd = NeuronOnNeuronBlock::new(1, 0).unwrap();
        assert!(even.is_even());
        assert!(!odd.is_even());
    }

    #[test]
    fn iter_all_counts() {
        assert_eq!(NeuronBlockOnHICANN::iter_all().count(), 8);
        assert_eq!(NeuronOnNeuronBlock::iter_all().count(), 64);
    }
}
