use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("placement stage failed: {0}")]
    Place(#[from] whc_place::PlaceError),

    #[error("merger/address stage failed: {0}")]
    Merge(#[from] whc_merge::MergeError),

    #[error("L1 routing stage failed: {0}")]
    Route(#[from] whc_router::RouterError),

    #[error("route lowering produced an invalid L1Route: {0}")]
    InvalidRoute(#[from] whc_route::RouteError),

    #[error("synapse-driver stage failed: {0}")]
    Synapse(#[from] whc_synapse::SynapseError),

    #[error("resource inventory error: {0}")]
    Resource(#[from] whc_resource::ResourceError),

    #[error("population {0:?} referenced by a projection was never added to the network")]
    UnknownPopulation(whc_graph::VertexId),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
