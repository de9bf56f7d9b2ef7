//! The seven-stage synapse-driver requirement count. Each stage is a
//! plain free function over `BTreeMap`/`HashMap` data, mirroring the
//! static-method-per-stage decomposition of the system this is grounded
//! on ("We use static functions to allow an easy testing").

use std::collections::{BTreeMap, HashMap};

use crate::types::{DriverDecoder, NeuronOnHicann, Side, StpMode, SynapseType, TriParity};

pub type SynapseCounts = HashMap<NeuronOnHicann, BTreeMap<(SynapseType, DriverDecoder, StpMode), usize>>;

#[derive(Debug, Clone, Copy)]
pub struct SynapseEvent {
    pub neuron: NeuronOnHicann,
    /// Global (population, index)-derived id of the presynaptic neuron,
    /// carried through for per-synapse loss accounting.
    pub source: u32,
    /// Same encoding as `source`, for the postsynaptic neuron.
    pub target: u32,
    pub synapse_type: SynapseType,
    pub decoder: DriverDecoder,
    pub stp: StpMode,
}

/// Stage 1: tally incoming synapses per neuron per `(Type, Decoder, STP)`.
pub fn count_synapses_per_neuron(events: &[SynapseEvent]) -> SynapseCounts {
    let mut counts: SynapseCounts = HashMap::new();
    for e in events {
        *counts
            .entry(e.neuron)
            .or_default()
            .entry((e.synapse_type, e.decoder, e.stp))
            .or_insert(0) += 1;
    }
    counts
}

/// How many denmem half-rows of a compound neuron, per synapse type,
/// land on each `(Side, TriParity)` combination.
#[derive(Debug, Clone, Default)]
pub struct InputGranularity {
    pub slots: HashMap<SynapseType, HashMap<(Side, TriParity), usize>>,
}

/// Stage 2: half-rows needed on each `(Side, TriParity)` to realise every
/// `(Type, Decoder, STP)` bucket's synapse count.
pub fn count_half_rows_per_input_granularity(
    counts: &BTreeMap<(SynapseType, DriverDecoder, StpMode), usize>,
    granularity: &InputGranularity,
) -> BTreeMap<(SynapseType, DriverDecoder, StpMode, Side, TriParity), usize> {
    let mut out = BTreeMap::new();
    for (&(ty, decoder, stp), &count) in counts {
        let Some(slots) = granularity.slots.get(&ty) else { continue };
        for (&(side, parity), &capacity) in slots {
            if capacity == 0 {
                continue;
            }
            out.insert((ty, decoder, stp, side, parity), count.div_ceil(capacity));
        }
    }
    out
}

fn rank(side: Side, parity: TriParity, rows: usize) -> (usize, u8, u8) {
    let parity_rank = if matches!(parity, TriParity::Any) { 0 } else { 1 };
    let side_rank = if side == Side::Left { 0 } else { 1 };
    (rows, parity_rank, side_rank)
}

/// Stage 3: per `(Type, Decoder, STP)`, the `Side`/`TriParity` with the
/// fewest half-rows, ties broken towards `TriParity::Any` then `Side::Left`.
pub fn count_half_rows(
    per_granularity: &BTreeMap<(SynapseType, DriverDecoder, StpMode, Side, TriParity), usize>,
) -> BTreeMap<(SynapseType, DriverDecoder, StpMode), (Side, TriParity, usize)> {
    let mut best: BTreeMap<(SynapseType, DriverDecoder, StpMode), (Side, TriParity, usize)> = BTreeMap::new();
    for (&(ty, decoder, stp, side, parity), &half_rows) in per_granularity {
        let key = (ty, decoder, stp);
        let replace = match best.get(&key) {
            None => true,
            Some(&(cur_side, cur_parity, cur_rows)) => rank(side, parity, half_rows) < rank(cur_side, cur_parity, cur_rows),
        };
        if replace {
            best.insert(key, (side, parity, half_rows));
        }
    }
    best
}

/// Stage 4: global max over neurons of the half-row count needed on each
/// `(TriParity, Side, Decoder, STP)`; within one neuron, distinct synapse
/// types that land on the same cell need separate physical half-rows and
/// are summed first.
pub fn count_half_rows_vec(
    per_neuron: &HashMap<NeuronOnHicann, BTreeMap<(SynapseType, DriverDecoder, StpMode), (Side, TriParity, usize)>>,
) -> BTreeMap<(TriParity, Side, DriverDecoder, StpMode), usize> {
    let mut global: BTreeMap<(TriParity, Side, DriverDecoder, StpMode), usize> = BTreeMap::new();
    for assignments in per_neuron.values() {
        let mut per_neuron_cell: BTreeMap<(TriParity, Side, DriverDecoder, StpMode), usize> = BTreeMap::new();
        for (&(_ty, decoder, stp), &(side, parity, rows)) in assignments {
            *per_neuron_cell.entry((parity, side, decoder, stp)).or_insert(0) += rows;
        }
        for (key, rows) in per_neuron_cell {
            let entry = global.entry(key).or_insert(0);
            *entry = (*entry).max(rows);
        }
    }
    global
}

/// Stage 5: collapse decoders, summing over `DriverDecoder`.
pub fn count_half_rows_per_side(
    global: &BTreeMap<(TriParity, Side, DriverDecoder, StpMode), usize>,
) -> BTreeMap<(TriParity, Side, StpMode), usize> {
    let mut out = BTreeMap::new();
    for (&(parity, side, _decoder, stp), &rows) in global {
        *out.entry((parity, side, stp)).or_insert(0) += rows;
    }
    out
}

/// Stage 6: resolve `TriParity::Any` into concrete even/odd row counts,
/// balanced within 1 — the even count gets the extra row on an odd
/// remainder.
pub fn count_rows_per_side(per_side: &BTreeMap<(TriParity, Side, StpMode), usize>) -> BTreeMap<(Side, StpMode), usize> {
    let mut grouped: BTreeMap<(Side, StpMode), (usize, usize, usize)> = BTreeMap::new();
    for (&(parity, side, stp), &count) in per_side {
        let entry = grouped.entry((side, stp)).or_insert((0, 0, 0));
        match parity {
            TriParity::Even => entry.0 += count,
            TriParity::Odd => entry.1 += count,
            TriParity::Any => entry.2 += count,
        }
    }
    grouped
        .into_iter()
        .map(|(key, (even, odd, any))| {
            let mut total_even = even + any / 2;
            let total_odd = odd + any / 2;
            if any % 2 == 1 {
                total_even += 1;
            }
            (key, total_even.max(total_odd))
        })
        .collect()
}

/// Stage 7a: rows to drivers, one driver carries two rows.
pub fn count_drivers_per_stp(rows_per_side: &BTreeMap<(Side, StpMode), usize>) -> BTreeMap<(Side, StpMode), usize> {
    rows_per_side.iter().map(|(&key, &rows)| (key, rows.div_ceil(2))).collect()
}

/// Stage 7b: total drivers required, summed over every `(Side, STP)`.
pub fn count_drivers(drivers_per_stp: &BTreeMap<(Side, StpMode), usize>) -> usize {
    drivers_per_stp.values().sum()
}

pub fn drivers_possible(required: usize, max_chain_length: usize) -> bool {
    required <= max_chain_length
}

pub fn more_drivers_possible(required: usize, max_chain_length: usize) -> bool {
    required < max_chain_length
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(n: u8) -> SynapseType {
        SynapseType(n)
    }
    fn dec(n: u8) -> DriverDecoder {
        DriverDecoder(n)
    }

    #[test]
    fn stage1_tallies_per_neuron_per_bucket() {
        let events = vec![
            SynapseEvent { neuron: NeuronOnHicann(0), source: 10, target: 0, synapse_type: ty(0), decoder: dec(0), stp: StpMode::Off },
            SynapseEvent { neuron: NeuronOnHicann(0), source: 11, target: 0, synapse_type: ty(0), decoder: dec(0), stp: StpMode::Off },
            SynapseEvent { neuron: NeuronOnHicann(1), source: 12, target: 1, synapse_type: ty(0), decoder: dec(0), stp: StpMode::Off },
        ];
        let counts = count_synapses_per_neuron(&events);
        assert_eq!(counts[&NeuronOnHicann(0)][&(ty(0), dec(0), StpMode::Off)], 2);
        assert_eq!(counts[&NeuronOnHicann(1)][&(ty(0), dec(0), StpMode::Off)], 1);
    }

    #[test]
    fn stage3_prefers_fewer_rows_then_any_then_left() {
        let mut per_granularity = BTreeMap::new();
        per_granularity.insert((ty(0), dec(0), StpMode::Off, Side::Left, TriParity::Even), 3);
        per_granularity.insert((ty(0), dec(0), StpMode::Off, Side::Right, TriParity::Any), 2);
        per_granularity.insert((ty(0), dec(0), StpMode::Off, Side::Left, TriParity::Any), 2);
        let best = count_half_rows(&per_granularity);
        let (side, parity, rows) = best[&(ty(0), dec(0), StpMode::Off)];
        assert_eq!(rows, 2);
        assert_eq!(parity, TriParity::Any);
        assert_eq!(side, Side::Left);
    }

    #[test]
    fn stage6_balances_any_within_one_and_favours_even() {
        let mut per_side = BTreeMap::new();
        per_side.insert((TriParity::Any, Side::Left, StpMode::Off), 5);
        let rows = count_rows_per_side(&per_side);
        // 5 any -> 3 even, 2 odd -> rows = 3
        assert_eq!(rows[&(Side::Left, StpMode::Off)], 3);
    }

    #[test]
    fn stage7_divides_rows_into_driver_pairs() {
        let mut rows_per_side = BTreeMap::new();
        rows_per_side.insert((Side::Left, StpMode::Off), 5);
        rows_per_side.insert((Side::Right, StpMode::Off), 2);
        let per_stp = count_drivers_per_stp(&rows_per_side);
        assert_eq!(per_stp[&(Side::Left, StpMode::Off)], 3);
        assert_eq!(per_stp[&(Side::Right, StpMode::Off)], 1);
        assert_eq!(count_drivers(&per_stp), 4);
    }

    #[test]
    fn oracle_bounds_are_inclusive_then_strict() {
        assert!(drivers_possible(10, 10));
        assert!(!more_drivers_possible(10, 10));
        assert!(more_drivers_possible(9, 10));
    }
}
