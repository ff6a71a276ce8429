pub mod client;
pub mod error;
pub mod model;

pub use error::{AggregatorError, RpcError};
pub use model::{Geolocation, NodeRecord, NodeStats, SeedPods};
