use std::time::Duration;
use thiserror::Error;

/// Why a URL was rejected before any connection was attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidUriKind {
    /// Not a syntactically valid URI
    ParseError,
    /// No host, e.g. a relative path
    MissingAuthority,
    /// No `http://` or `https://` prefix
    MissingScheme,
}

/// Failures of a single HTTP exchange
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    #[error("Failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Deadline hit while waiting for the head or reading the body
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connect, DNS or I/O failure
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("TLS error: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Response body too large: limit {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Non-2xx status with the start of the body
    #[error("HTTP {status}: {body_preview}")]
    HttpStatus {
        status: http::StatusCode,
        body_preview: String,
    },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// `kind` is stable for matching; `reason` is human-readable only.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUri {
        url: String,
        kind: InvalidUriKind,
        reason: String,
    },

    /// Scheme refused, e.g. `http` under [`crate::TransportSecurity::TlsOnly`]
    #[error("URL scheme '{scheme}' not allowed: {reason}")]
    InvalidScheme { scheme: String, reason: String },
}

impl HttpError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Timeout(_))
    }

    /// Status of a non-2xx response
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            HttpError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<hyper::Error> for HttpError {
    fn from(err: hyper::Error) -> Self {
        HttpError::Transport(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        HttpError::Transport(Box::new(err))
    }
}
