use crate::contract::{NodeRecord, RpcError};
use crate::domain::ports::FleetPoller;
use crate::infra::pod::decode_pods;
use crate::infra::rpc::{RpcRequest, RpcTransport};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;

const POLL_METHOD: &str = "get-pods-with-stats";

/// Polls every fleet endpoint once, concurrently, without retries.
///
/// The per-endpoint timeout is the transport's; a timed out, unreachable or
/// erroring endpoint contributes zero records.
pub struct RpcPoller {
    transport: Arc<dyn RpcTransport>,
}

impl RpcPoller {
    #[must_use]
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    async fn poll_one(&self, endpoint: &str) -> Vec<NodeRecord> {
        match self.fetch_pods(endpoint).await {
            Ok(pods) => {
                let records = decode_pods(pods, endpoint, true);
                tracing::debug!(endpoint, count = records.len(), "polled endpoint");
                records
            }
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "poll failed, endpoint contributes no records");
                Vec::new()
            }
        }
    }

    async fn fetch_pods(&self, endpoint: &str) -> Result<Vec<Value>, RpcError> {
        let request = RpcRequest::new(POLL_METHOD, Vec::new(), 1);
        let result = self
            .transport
            .exchange(endpoint, &request)
            .await?
            .into_result()?;

        match result {
            Value::Object(mut fields) => match fields.remove("pods") {
                Some(Value::Array(pods)) => Ok(pods),
                Some(Value::Null) | None => Ok(Vec::new()),
                Some(other) => Err(RpcError::Decode(serde::de::Error::custom(format!(
                    "expected a pods array, got {other}"
                )))),
            },
            other => Err(RpcError::Decode(serde::de::Error::custom(format!(
                "expected an object result, got {other}"
            )))),
        }
    }
}

#[async_trait::async_trait]
impl FleetPoller for RpcPoller {
    async fn poll_all(&self, endpoints: &[String]) -> Vec<NodeRecord> {
        let batches = join_all(endpoints.iter().map(|ep| self.poll_one(ep))).await;
        batches.into_iter().flatten().collect()
    }
}
