use thiserror::Error;

/// Failure modes of resource inventory operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("resource is not present on the wafer")]
    NotPresent,

    #[error("resource is already allocated")]
    InUse,

    #[error("resource is not currently allocated")]
    NotAllocated,
}

pub type ResourceResult<T> = Result<T, ResourceError>;
