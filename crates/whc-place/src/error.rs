use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaceError {
    #[error("no row exists for the given logical neuron")]
    NoSuchLogicalNeuron,

    #[error("requested rectangle does not fit within a single neuron block")]
    DoesNotFit,

    #[error("hicann {0:?} is not present in the resource manager")]
    HicannNotPresent(String),
}

pub type PlaceResult<T> = Result<T, PlaceError>;
