use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("backbone router's source vertex must be a horizontal bus line")]
    SourceNotHorizontal,

    #[error("HICANN {0} is not present in the routing graph")]
    HicannNotPresent(String),

    #[error("no path found to the requested target")]
    NoPath,
}

pub type RouterResult<T> = Result<T, RouterError>;
