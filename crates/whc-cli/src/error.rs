//! CLI error taxonomy, mirroring the teacher's `CliError`: one variant per
//! failure mode, `#[from]` where a lower crate's error propagates
//! naturally, helper constructors for the rest.

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("pipeline error: {0}")]
    Pipeline(#[from] whc_pipeline::PipelineError),

    #[error("coordinate error: {0}")]
    Coord(#[from] whc_coords::CoordError),

    #[error("resource error: {0}")]
    Resource(#[from] whc_resource::ResourceError),

    #[error("graph error: {0}")]
    Graph(#[from] whc_graph::GraphError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("workspace error: {0}")]
    Workspace(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("missing resource: {0}")]
    MissingResource(String),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn workspace(msg: impl Into<String>) -> Self {
        Self::Workspace(msg.into())
    }

    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArgs(msg.into())
    }

    pub fn missing_resource(msg: impl Into<String>) -> Self {
        Self::MissingResource(msg.into())
    }
}
