//! `OnNeuronBlock`: the 32x2 denmem bit-grid of one neuron block, tracking
//! ownership by at most one request per cell.

use std::collections::HashSet;
use whc_coords::NeuronOnNeuronBlock;

/// Per-cell ownership grid for one `NeuronBlockOnHICANN`. Top and bottom
/// rows are always claimed together for a given column (compound neurons
/// are top/bottom symmetric).
#[derive(Debug, Clone)]
pub struct OnNeuronBlock {
    owner: [Option<usize>; (NeuronOnNeuronBlock::WIDTH as usize) * (NeuronOnNeuronBlock::HEIGHT as usize)],
}

impl Default for OnNeuronBlock {
    fn default() -> Self {
        OnNeuronBlock { owner: [None; 64] }
    }
}

impl OnNeuronBlock {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(x: u8, y: u8) -> usize {
        y as usize * NeuronOnNeuronBlock::WIDTH as usize + x as usize
    }

    pub fn owner(&self, cell: NeuronOnNeuronBlock) -> Option<usize> {
        self.owner[Self::index(cell.x(), cell.y())]
    }

    fn column_free(&self, x: u8, defects: &HashSet<NeuronOnNeuronBlock>) -> bool {
        for y in 0..NeuronOnNeuronBlock::HEIGHT {
            let cell = NeuronOnNeuronBlock::new(x, y).expect("x,y in range");
            if self.owner(cell).is_some() || defects.contains(&cell) {
                return false;
            }
        }
        true
    }

    /// Leftmost free, non-defective, contiguous run of `width` columns, or
    /// `None` if the block cannot fit it.
    pub fn find_free_rect(&self, width: usize, defects: &HashSet<NeuronOnNeuronBlock>) -> Option<u8> {
        if width == 0 || width > NeuronOnNeuronBlock::WIDTH as usize {
            return None;
        }
        let mut run_start = 0u8;
        let mut run_len = 0usize;
        for x in 0..NeuronOnNeuronBlock::WIDTH {
            if self.column_free(x, defects) {
                if run_len == 0 {
                    run_start = x;
                }
                run_len += 1;
                if run_len == width {
                    return Some(run_start);
                }
            } else {
                run_len = 0;
            }
        }
        None
    }

    /// Claim columns `[x_start, x_start + width)` on both rows for `owner_id`.
    pub fn place(&mut self, x_start: u8, width: usize, owner_id: usize) {
        for dx in 0..width {
            let x = x_start + dx as u8;
            for y in 0..NeuronOnNeuronBlock::HEIGHT {
                self.owner[Self::index(x, y)] = Some(owner_id);
            }
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.owner.iter().filter(|o| o.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_leftmost_free_run() {
        let block = OnNeuronBlock::new();
        let defects = HashSet::new();
        assert_eq!(block.find_free_rect(4, &defects), Some(0));
    }

    #[test]
    fn placed_cells_are_no_longer_free() {
        let mut block = OnNeuronBlock::new();
        let defects = HashSet::new();
        block.place(0, 4, 7);
        assert_eq!(block.find_free_rect(30, &defects), Some(4));
        assert_eq!(block.owner(NeuronOnNeuronBlock::new(0, 0).unwrap()), Some(7));
        assert_eq!(block.owner(NeuronOnNeuronBlock::new(0, 1).unwrap()), Some(7));
    }

    #[test]
    fn defective_column_blocks_placement() {
        let block = OnNeuronBlock::new();
        let mut defects = HashSet::new();
        defects.insert(NeuronOnNeuronBlock::new(2, 0).unwrap());
        assert_eq!(block.find_free_rect(4, &defects), Some(3));
    }

    #[test]
    fn rejects_width_larger_than_block() {
        let block = OnNeuronBlock::new();
        let defects = HashSet::new();
        assert_eq!(block.find_free_rect(33, &defects), None);
    }
}
