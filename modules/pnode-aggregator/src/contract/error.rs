use pnode_http::HttpError;

/// Errors from a JSON-RPC exchange with a pNode or seed endpoint
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("transport failure talking to {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: HttpError,
    },

    #[error("RPC error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("RPC response carried neither a result nor an error")]
    MissingResult,

    #[error("unexpected RPC result shape: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("no RPC endpoints configured")]
    NoEndpoints,
}

/// Errors surfaced by the aggregator's public operations
///
/// The network view itself never fails; only on-demand seed queries do.
#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("seed query failed: {0}")]
    Seed(#[from] RpcError),

    #[error("Invalid input: {0}")]
    Validation(String),
}
