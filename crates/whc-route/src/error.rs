use thiserror::Error;

/// Failure modes of `L1Route` construction and algebra. Every variant here
/// is a programmer error per the error taxonomy: a broken invariant is
/// never caught and accumulated, it aborts the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("route does not start with a HICANNOnWafer segment")]
    MissingLeadingHicann,

    #[error("route's last segment is a HICANNOnWafer")]
    TrailingHicann,

    #[error("segment pair at position {0} does not satisfy the successor relation")]
    InvalidSuccessor(usize),

    #[error("cannot join routes: boundary segments do not match for merge_common_endpoints")]
    JoinMismatch,

    #[error("split index out of range")]
    SplitOutOfRange,

    #[error("route is empty")]
    Empty,

    #[error("failed to parse route text: {0}")]
    ParseError(String),
}

pub type RouteResult<T> = Result<T, RouteError>;
