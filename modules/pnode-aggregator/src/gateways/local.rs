use crate::contract::client::PodsApi;
use crate::contract::{AggregatorError, NodeRecord, NodeStats, SeedPods};
use crate::domain::service::Service;
use std::sync::Arc;

/// In-process client for the aggregator
pub struct PodsLocalClient {
    service: Arc<Service>,
}

impl PodsLocalClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl PodsApi for PodsLocalClient {
    async fn current_view(&self) -> Result<Arc<Vec<NodeRecord>>, AggregatorError> {
        Ok(self.service.get_current_view().await)
    }

    async fn force_refresh(&self) -> Result<Arc<Vec<NodeRecord>>, AggregatorError> {
        Ok(self.service.force_refresh().await)
    }

    async fn node_stats(&self, address: &str) -> Result<NodeStats, AggregatorError> {
        self.service.node_stats(address).await
    }

    async fn seed_pods(&self) -> Result<SeedPods, AggregatorError> {
        self.service.seed_pods().await
    }
}
