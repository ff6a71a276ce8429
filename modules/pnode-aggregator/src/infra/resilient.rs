//! Single-target JSON-RPC caller with endpoint failover and exponential backoff.

use crate::contract::RpcError;
use crate::infra::rpc::{RpcRequest, RpcTransport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Calls one endpoint at a time, rotating to the next on failure.
///
/// The rotation cursor belongs to the instance and only advances on
/// failure, so a healthy endpoint keeps serving until it breaks.
pub struct ResilientRpcClient {
    transport: Arc<dyn RpcTransport>,
    backoff_base: Duration,
    cursor: AtomicUsize,
    next_id: AtomicU64,
}

impl ResilientRpcClient {
    #[must_use]
    pub fn new(transport: Arc<dyn RpcTransport>, backoff_base: Duration) -> Self {
        Self {
            transport,
            backoff_base,
            cursor: AtomicUsize::new(0),
            next_id: AtomicU64::new(1),
        }
    }

    /// Delay before the retry that follows failed attempt `attempt` (0-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }

    /// Call `method` with at most `max_attempts` attempts (at least one).
    ///
    /// # Errors
    ///
    /// `NoEndpoints` for an empty list, otherwise the error of the final
    /// attempt once all attempts failed.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
        endpoints: &[String],
        max_attempts: u32,
    ) -> Result<T, RpcError> {
        if endpoints.is_empty() {
            return Err(RpcError::NoEndpoints);
        }
        let max_attempts = max_attempts.max(1);

        let mut attempt = 0u32;
        loop {
            let endpoint = &endpoints[self.cursor.load(Ordering::Relaxed) % endpoints.len()];
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let request = RpcRequest::new(method, params.clone(), id);

            let error = match self.attempt(endpoint, &request).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            self.cursor.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                method,
                endpoint = %endpoint,
                attempt = attempt + 1,
                max_attempts,
                error = %error,
                "RPC call failed"
            );

            if attempt + 1 >= max_attempts {
                return Err(error);
            }

            let delay = self.backoff(attempt);
            tracing::debug!(method, delay_ms = delay.as_millis(), "backing off before retry");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: &RpcRequest,
    ) -> Result<T, RpcError> {
        let result = self
            .transport
            .exchange(endpoint, request)
            .await?
            .into_result()?;
        serde_json::from_value(result).map_err(RpcError::Decode)
    }
}
