//! Outbound collaborators of the aggregation service.

use crate::contract::{Geolocation, NodeRecord, NodeStats, RpcError, SeedPods};
use crate::domain::error::EnrichmentError;
use std::collections::HashMap;

/// Fan-out poll of the pNode fleet.
///
/// Best effort: endpoints that fail contribute no records; the call itself
/// never fails.
#[async_trait::async_trait]
pub trait FleetPoller: Send + Sync {
    async fn poll_all(&self, endpoints: &[String]) -> Vec<NodeRecord>;
}

/// Bulk `public_key -> credits` lookup
#[async_trait::async_trait]
pub trait CreditsSource: Send + Sync {
    async fn fetch_credits(&self) -> Result<HashMap<String, u64>, EnrichmentError>;
}

/// Per-host geolocation lookup
#[async_trait::async_trait]
pub trait GeoSource: Send + Sync {
    async fn lookup(&self, host: &str) -> Result<Geolocation, EnrichmentError>;
}

/// On-demand queries against the seed nodes
#[async_trait::async_trait]
pub trait SeedSource: Send + Sync {
    async fn get_pods(&self) -> Result<SeedPods, RpcError>;

    async fn get_stats(&self, address: &str) -> Result<NodeStats, RpcError>;
}
