use crate::contract::error::AggregatorError;
use crate::contract::model::{NodeRecord, NodeStats, SeedPods};
use std::sync::Arc;

/// Client trait for consumers of the aggregated pNode view
#[async_trait::async_trait]
pub trait PodsApi: Send + Sync {
    /// Current deduplicated, enriched view; served from cache when fresh
    async fn current_view(&self) -> Result<Arc<Vec<NodeRecord>>, AggregatorError>;

    /// Drop the cached view and rebuild it
    async fn force_refresh(&self) -> Result<Arc<Vec<NodeRecord>>, AggregatorError>;

    /// Statistics for a single node, queried through the seed endpoints
    async fn node_stats(&self, address: &str) -> Result<NodeStats, AggregatorError>;

    /// Pod listing as known to the seed endpoints
    async fn seed_pods(&self) -> Result<SeedPods, AggregatorError>;
}
