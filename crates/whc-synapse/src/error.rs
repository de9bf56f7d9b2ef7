use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynapseError {
    #[error("compound neuron has {0} synapse targets, more than the 4 the target mapping table covers")]
    TooManyTargets(usize),

    #[error("(source, target) synapse index {0:?} was already claimed by another partial result")]
    DuplicateSynapseIndex((u32, u32)),
}

pub type SynapseResult<T> = Result<T, SynapseError>;
