//! JSON-RPC 2.0 envelopes and the transport that carries them.

use crate::contract::RpcError;
use pnode_http::{HttpClient, HttpError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const JSONRPC_VERSION: &str = "2.0";

/// Outgoing JSON-RPC request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub method: String,
    pub id: u64,
    /// Omitted from the wire when there are no parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
}

impl RpcRequest {
    #[must_use]
    pub fn new(method: &str, params: Vec<Value>, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.to_owned(),
            id,
            params: if params.is_empty() { None } else { Some(params) },
        }
    }
}

/// Error object of a failed JSON-RPC call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// Incoming JSON-RPC response envelope
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    /// Successful response carrying `result`
    #[must_use]
    pub fn success(result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// Error response
    #[must_use]
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(RpcErrorObject {
                code,
                message: message.into(),
            }),
        }
    }

    /// The `result` member, or the error the envelope reports.
    ///
    /// # Errors
    ///
    /// `Remote` when the envelope carries an error object, `MissingResult`
    /// when it carries neither member (or a null result).
    pub fn into_result(self) -> Result<Value, RpcError> {
        if let Some(err) = self.error {
            return Err(RpcError::Remote {
                code: err.code,
                message: err.message,
            });
        }
        match self.result {
            Some(Value::Null) | None => Err(RpcError::MissingResult),
            Some(value) => Ok(value),
        }
    }
}

/// URL for an endpoint string: full URLs are kept, `host:port` maps to
/// `http://host:port/rpc`.
#[must_use]
pub fn endpoint_url(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_owned()
    } else {
        format!("http://{endpoint}/rpc")
    }
}

/// One request/response exchange with a single endpoint
#[async_trait::async_trait]
pub trait RpcTransport: Send + Sync {
    async fn exchange(&self, endpoint: &str, request: &RpcRequest)
    -> Result<RpcResponse, RpcError>;
}

/// JSON-RPC over HTTP POST
#[derive(Debug, Clone)]
pub struct HttpRpcTransport {
    client: HttpClient,
}

impl HttpRpcTransport {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl RpcTransport for HttpRpcTransport {
    async fn exchange(
        &self,
        endpoint: &str,
        request: &RpcRequest,
    ) -> Result<RpcResponse, RpcError> {
        let url = endpoint_url(endpoint);
        let transport = |source| RpcError::Transport {
            endpoint: endpoint.to_owned(),
            source,
        };

        self.client
            .post(&url)
            .json(request)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?
            .json::<RpcResponse>()
            .await
            .map_err(|e| match e {
                // The peer answered, just not with a JSON-RPC envelope.
                HttpError::Json(source) => RpcError::Decode(source),
                other => transport(other),
            })
    }
}
