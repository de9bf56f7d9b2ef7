use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("DNC merger {0} is already in a mode incompatible with the requested transition")]
    ForbiddenModeTransition(u8),

    #[error("address pool is exhausted")]
    PoolExhausted,
}

pub type MergeResult<T> = Result<T, MergeError>;
