//! Per-projection sparse weight matrix plus per-chip realised/lost
//! synapse tallies.

use std::collections::HashMap;

use crate::error::{SynapseError, SynapseResult};

/// A weight of NaN marks a lost synapse; any other value marks it
/// realised, possibly distorted from the value originally requested.
pub fn is_real_weight(weight: f64) -> bool {
    !weight.is_nan() && weight > 0.0
}

#[derive(Debug, Clone, Default)]
pub struct SynapseLoss {
    weights: HashMap<(u32, u32), f64>,
    pre_total: HashMap<u32, usize>,
    pre_realized: HashMap<u32, usize>,
    post_total: HashMap<u32, usize>,
    post_realized: HashMap<u32, usize>,
    set: usize,
}

impl SynapseLoss {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a synapse that could not be realised on hardware.
    pub fn add_loss(&mut self, source: u32, target: u32) -> SynapseResult<()> {
        self.claim(source, target, f64::NAN)
    }

    /// Record a synapse realised with the given (possibly distorted)
    /// weight.
    pub fn add_realized(&mut self, source: u32, target: u32, weight: f64) -> SynapseResult<()> {
        self.claim(source, target, weight)
    }

    fn claim(&mut self, source: u32, target: u32, weight: f64) -> SynapseResult<()> {
        if self.weights.contains_key(&(source, target)) {
            log::warn!("duplicate synapse claim for ({source}, {target}), dropping it");
            return Err(SynapseError::DuplicateSynapseIndex((source, target)));
        }
        self.weights.insert((source, target), weight);
        *self.pre_total.entry(source).or_insert(0) += 1;
        *self.post_total.entry(target).or_insert(0) += 1;
        self.set += 1;
        if is_real_weight(weight) {
            *self.pre_realized.entry(source).or_insert(0) += 1;
            *self.post_realized.entry(target).or_insert(0) += 1;
        } else {
            log::debug!("synapse ({source}, {target}) could not be realised on hardware");
        }
        Ok(())
    }

    /// Overwrite the weight of an already-claimed (source, target) pair,
    /// e.g. after hardware calibration distorts it further.
    pub fn set_weight(&mut self, source: u32, target: u32, weight: f64) {
        if let Some(slot) = self.weights.get_mut(&(source, target)) {
            *slot = weight;
        }
    }

    pub fn weight(&self, source: u32, target: u32) -> Option<f64> {
        self.weights.get(&(source, target)).copied()
    }

    pub fn realized_count(&self) -> usize {
        self.weights.values().filter(|&&w| is_real_weight(w)).count()
    }

    pub fn lost_count(&self) -> usize {
        self.weights.values().filter(|&&w| !is_real_weight(w)).count()
    }

    pub fn pre_realized(&self, source: u32) -> usize {
        self.pre_realized.get(&source).copied().unwrap_or(0)
    }

    pub fn post_realized(&self, target: u32) -> usize {
        self.post_realized.get(&target).copied().unwrap_or(0)
    }

    /// Union two partial results (e.g. one per chip). Fails if both claim
    /// the same (source, target) index.
    pub fn merge(mut self, other: SynapseLoss) -> SynapseResult<SynapseLoss> {
        for (&(source, target), &weight) in &other.weights {
            if self.weights.contains_key(&(source, target)) {
                return Err(SynapseError::DuplicateSynapseIndex((source, target)));
            }
            self.claim(source, target, weight)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realized_and_lost_counts_split_on_nan() {
        let mut loss = SynapseLoss::new();
        loss.add_realized(1, 2, 0.5).unwrap();
        loss.add_loss(1, 3).unwrap();
        assert_eq!(loss.realized_count(), 1);
        assert_eq!(loss.lost_count(), 1);
        assert_eq!(loss.pre_realized(1), 1);
    }

    #[test]
    fn claiming_the_same_index_twice_is_rejected() {
        let mut loss = SynapseLoss::new();
        loss.add_realized(1, 2, 0.5).unwrap();
        assert_eq!(loss.add_loss(1, 2), Err(SynapseError::DuplicateSynapseIndex((1, 2))));
    }

    #[test]
    fn merge_unions_disjoint_partial_results() {
        let mut a = SynapseLoss::new();
        a.add_realized(1, 2, 0.5).unwrap();
        let mut b = SynapseLoss::new();
        b.add_loss(3, 4).unwrap();
        let merged = a.merge(b).unwrap();
        assert_eq!(merged.realized_count(), 1);
        assert_eq!(merged.lost_count(), 1);
    }

    #[test]
    fn merge_rejects_overlapping_claims() {
        let mut a = SynapseLoss::new();
        a.add_realized(1, 2, 0.5).unwrap();
        let mut b = SynapseLoss::new();
        b.add_realized(1, 2, 0.7).unwrap();
        assert!(a.merge(b).is_err());
    }
}
