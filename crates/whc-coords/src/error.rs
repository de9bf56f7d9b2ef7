use thiserror::Error;

/// Failure modes of coordinate construction and neighbour arithmetic.
///
/// Neighbour queries never panic: an invalid neighbour must be observable
/// by the caller before it can flow into a committed [`crate::L1Segment`]
/// (see `whc-route`), where it would otherwise surface much later as an
/// opaque invariant violation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CoordError {
    /// A field value exceeds the coordinate's declared range (e.g. an
    /// `HLineOnHICANN` index >= 64), or a neighbour step would leave the
    /// wafer's bounding grid entirely.
    #[error("coordinate out of bounds: {field} = {value} (max {max})")]
    OutOfBounds {
        field: &'static str,
        value: i64,
        max: i64,
    },

    /// An (x, y) pair lies within the bounding grid but outside the
    /// wafer's enabled shape, or a conversion was attempted between two
    /// coordinates that do not correspond (e.g. a repeater block that is
    /// not the adjoint of the given bus line).
    #[error("domain mismatch: {0}")]
    DomainMismatch(&'static str),
}

impl CoordError {
    pub fn out_of_bounds(field: &'static str, value: i64, max: i64) -> Self {
        CoordError::OutOfBounds { field, value, max }
    }

    pub fn domain_mismatch(reason: &'static str) -> Self {
        CoordError::DomainMismatch(reason)
    }
}

pub type CoordResult<T> = Result<T, CoordError>;
