//! L1 router: the backbone walker, the Dijkstra fallback over the full
//! routing graph, and lowering of either's output into an `L1Route`.

pub mod backbone;
pub mod dijkstra;
pub mod error;
pub mod lowering;
pub mod target;
pub mod walker;
pub mod weights;

pub use backbone::L1BackboneRouter;
pub use dijkstra::{DijkstraResult, L1DijkstraRouter};
pub use error::{RouterError, RouterResult};
pub use lowering::lower_path;
pub use target::{Orientation, Target};
pub use walker::{find_routes, find_routes_with_depth, DEFAULT_MAX_DEPTH};
pub use weights::L1EdgeWeights;
