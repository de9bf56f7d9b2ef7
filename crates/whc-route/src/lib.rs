//! L1 routes: a validated segment sequence (`L1Route`), a prefix tree over
//! routes sharing a source (`L1RouteTree`), and their canonical textual
//! serialisation.

pub mod error;
pub mod route;
pub mod segment;
pub mod text;
pub mod tree;

pub use error::{RouteError, RouteResult};
pub use route::{JoinMode, L1Route};
pub use segment::{is_valid_successor, L1Segment};
pub use text::{parse_text, to_text};
pub use tree::L1RouteTree;
