use thiserror::Error;

/// Failure modes of graph construction and mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("vertex not present in graph")]
    VertexNotFound,

    #[error("edge does not connect the given vertices")]
    NoSuchEdge,

    #[error("hicann {0} is not present in the routing graph")]
    HicannNotPresent(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
