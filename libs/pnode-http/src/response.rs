use crate::error::HttpError;
use bytes::Bytes;
use http::Response;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::Instant;

/// Upper bound on how much of a failing response body is kept for the error
const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Type-erased response body
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// HTTP response wrapper with body-reading helpers
///
/// All body reads enforce the configured `max_body_size` limit. They share
/// the request's deadline: waiting for the head and reading the body together
/// never exceed the client timeout.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
    /// Instant by which the whole exchange must have completed
    pub(crate) deadline: Instant,
    /// Configured timeout, reported in `HttpError::Timeout`
    pub(crate) timeout: Duration,
}

impl HttpResponse {
    /// Read response body as bytes without status check
    ///
    /// # Errors
    /// Returns `HttpError::BodyTooLarge` if body exceeds limit.
    /// Returns `HttpError::Timeout` if the body does not arrive in time.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        read_body_limited(self.inner, self.max_body_size, self.deadline, self.timeout).await
    }

    /// Read response body as bytes with status check
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` if status is not 2xx.
    /// Returns `HttpError::BodyTooLarge` if body exceeds limit.
    /// Returns `HttpError::Timeout` once the request deadline has passed.
    pub async fn checked_bytes(self) -> Result<Bytes, HttpError> {
        let status = self.inner.status();
        if !status.is_success() {
            let preview_limit = self.max_body_size.min(ERROR_BODY_PREVIEW_LIMIT);
            let body_preview =
                match read_body_limited(self.inner, preview_limit, self.deadline, self.timeout).await {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                    Err(HttpError::BodyTooLarge { .. }) => {
                        "<body too large for preview>".to_owned()
                    }
                    Err(e) => return Err(e),
                };
            return Err(HttpError::HttpStatus {
                status,
                body_preview,
            });
        }

        read_body_limited(self.inner, self.max_body_size, self.deadline, self.timeout).await
    }

    /// Parse response body as JSON with status check
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` if status is not 2xx.
    /// Returns `HttpError::BodyTooLarge` if body exceeds limit.
    /// Returns `HttpError::Json` if parsing fails.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let body_bytes = self.checked_bytes().await?;
        Ok(serde_json::from_slice(&body_bytes)?)
    }
}

async fn read_body_limited(
    response: Response<ResponseBody>,
    limit: usize,
    deadline: Instant,
    timeout: Duration,
) -> Result<Bytes, HttpError> {
    let (_parts, body) = response.into_parts();

    let read = async move {
        let mut collected = Vec::new();
        let mut body = std::pin::pin!(body);

        while let Some(frame) = body.frame().await {
            let frame = frame.map_err(HttpError::Transport)?;
            if let Some(chunk) = frame.data_ref() {
                if collected.len() + chunk.len() > limit {
                    return Err(HttpError::BodyTooLarge { limit });
                }
                collected.extend_from_slice(chunk);
            }
        }

        Ok(Bytes::from(collected))
    };

    tokio::time::timeout_at(deadline, read)
        .await
        .map_err(|_| HttpError::Timeout(timeout))?
}
