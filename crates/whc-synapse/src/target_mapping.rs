//! Maps a compound neuron's up to four synapse targets onto the two
//! synaptic inputs (even/odd column, left/right side) of its denmems.

use crate::error::{SynapseError, SynapseResult};
use crate::types::{Parity, Side, SynapseType};

/// Implements the table: top and bottom row of the compound neuron share
/// the same pattern, so only `(Side, Parity)` need be returned.
pub fn simple_mapping(targets: &[SynapseType]) -> SynapseResult<Vec<((Side, Parity), SynapseType)>> {
    let t = targets;
    let mapping = match t.len() {
        0 => vec![],
        1 => vec![
            ((Side::Left, Parity::Even), t[0]),
            ((Side::Right, Parity::Even), t[0]),
            ((Side::Left, Parity::Odd), t[0]),
            ((Side::Right, Parity::Odd), t[0]),
        ],
        2 => vec![
            ((Side::Left, Parity::Even), t[0]),
            ((Side::Right, Parity::Even), t[1]),
            ((Side::Left, Parity::Odd), t[0]),
            ((Side::Right, Parity::Odd), t[1]),
        ],
        3 => vec![
            ((Side::Left, Parity::Even), t[0]),
            ((Side::Right, Parity::Even), t[1]),
            ((Side::Left, Parity::Odd), t[0]),
            ((Side::Right, Parity::Odd), t[2]),
        ],
        4 => vec![
            ((Side::Left, Parity::Even), t[0]),
            ((Side::Right, Parity::Even), t[1]),
            ((Side::Left, Parity::Odd), t[2]),
            ((Side::Right, Parity::Odd), t[3]),
        ],
        n => return Err(SynapseError::TooManyTargets(n)),
    };
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(n: u8) -> SynapseType {
        SynapseType(n)
    }

    #[test]
    fn one_target_covers_all_four_cells() {
        let mapping = simple_mapping(&[ty(5)]).unwrap();
        assert!(mapping.iter().all(|&(_, t)| t == ty(5)));
    }

    #[test]
    fn three_targets_follows_the_documented_table() {
        let mapping = simple_mapping(&[ty(0), ty(1), ty(2)]).unwrap();
        assert_eq!(mapping[0], ((Side::Left, Parity::Even), ty(0)));
        assert_eq!(mapping[1], ((Side::Right, Parity::Even), ty(1)));
        assert_eq!(mapping[2], ((Side::Left, Parity::Odd), ty(0)));
        assert_eq!(mapping[3], ((Side::Right, Parity::Odd), ty(2)));
    }

    /// A compound neuron of width 3 with four projection tags distributes
    /// as even-left = t0, even-right = t1, odd-left = t2, odd-right = t3
    /// on every pair of denmems, top and bottom.
    #[test]
    fn four_targets_cover_every_side_parity_combination_distinctly() {
        let mapping = simple_mapping(&[ty(0), ty(1), ty(2), ty(3)]).unwrap();
        assert_eq!(mapping[0], ((Side::Left, Parity::Even), ty(0)));
        assert_eq!(mapping[1], ((Side::Right, Parity::Even), ty(1)));
        assert_eq!(mapping[2], ((Side::Left, Parity::Odd), ty(2)));
        assert_eq!(mapping[3], ((Side::Right, Parity::Odd), ty(3)));
    }

    #[test]
    fn five_targets_is_rejected() {
        let targets = [ty(0), ty(1), ty(2), ty(3), ty(4)];
        assert_eq!(simple_mapping(&targets), Err(SynapseError::TooManyTargets(5)));
    }
}
