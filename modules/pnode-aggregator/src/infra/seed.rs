use crate::contract::{NodeStats, RpcError, SeedPods};
use crate::domain::ports::SeedSource;
use crate::infra::pod::decode_pods;
use crate::infra::resilient::ResilientRpcClient;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct GetPodsResult {
    #[serde(default)]
    pods: Vec<Value>,
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GetStatsResult {
    stats: NodeStats,
}

/// Seed-node queries routed through the resilient client
pub struct SeedClient {
    rpc: ResilientRpcClient,
    endpoints: Vec<String>,
    max_attempts: u32,
}

impl SeedClient {
    #[must_use]
    pub fn new(rpc: ResilientRpcClient, endpoints: Vec<String>, max_attempts: u32) -> Self {
        Self {
            rpc,
            endpoints,
            max_attempts,
        }
    }
}

#[async_trait::async_trait]
impl SeedSource for SeedClient {
    async fn get_pods(&self) -> Result<SeedPods, RpcError> {
        let result: GetPodsResult = self
            .rpc
            .call("get-pods", Vec::new(), &self.endpoints, self.max_attempts)
            .await?;

        let reported = u64::try_from(result.pods.len()).unwrap_or(u64::MAX);
        // Seed listings are gossip, not a direct answer from the node.
        let pods = decode_pods(result.pods, "seed", false);
        Ok(SeedPods {
            pods,
            total_count: result.total_count.unwrap_or(reported),
        })
    }

    async fn get_stats(&self, address: &str) -> Result<NodeStats, RpcError> {
        let result: GetStatsResult = self
            .rpc
            .call(
                "get-stats",
                vec![Value::String(address.to_owned())],
                &self.endpoints,
                self.max_attempts,
            )
            .await?;
        Ok(result.stats)
    }
}
