use crate::config::{HttpClientConfig, TransportSecurity};
use crate::error::HttpError;
use crate::response::ResponseBody;
use crate::tls;
use bytes::Bytes;
use http::Response;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::time::Duration;
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneSyncService;
use tower::{ServiceBuilder, ServiceExt};

/// Type-erased service stack used by [`crate::HttpClient`]
pub(crate) type HttpService =
    BoxCloneSyncService<http::Request<Full<Bytes>>, Response<ResponseBody>, HttpError>;

/// Builder for constructing an [`crate::HttpClient`]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Create a new builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
        }
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the User-Agent header value
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the maximum accepted response body size
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Set the accepted URL schemes
    #[must_use]
    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    /// Allow plain `http://` URLs
    #[must_use]
    pub fn allow_insecure_http(self) -> Self {
        self.transport(TransportSecurity::AllowInsecureHttp)
    }

    /// Build the HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS connector cannot be created or the
    /// User-Agent is not a valid header value.
    pub fn build(self) -> Result<crate::HttpClient, HttpError> {
        let timeout = self.config.request_timeout;
        let user_agent = http::HeaderValue::try_from(self.config.user_agent.as_str())?;
        tracing::debug!(
            timeout = ?timeout,
            transport = ?self.config.transport,
            max_body_size = self.config.max_body_size,
            "building HTTP client"
        );

        let https = tls::build_https_connector(self.config.transport)?;

        let mut client_builder = Client::builder(TokioExecutor::new());
        client_builder
            .pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host);
        if let Some(idle_timeout) = self.config.pool_idle_timeout {
            client_builder.pool_idle_timeout(idle_timeout);
        }
        let hyper_client = client_builder.build::<_, Full<Bytes>>(https);

        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .service(hyper_client)
            .map_response(box_response_body)
            .map_err(move |e: tower::BoxError| map_tower_error(e, timeout));

        Ok(crate::HttpClient {
            service: BoxCloneSyncService::new(service),
            user_agent,
            timeout,
            max_body_size: self.config.max_body_size,
            transport: self.config.transport,
        })
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Map tower errors to `HttpError`, recognising the timeout layer's `Elapsed`
fn map_tower_error(err: tower::BoxError, timeout: Duration) -> HttpError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return HttpError::Timeout(timeout);
    }

    match err.downcast::<hyper_util::client::legacy::Error>() {
        Ok(hyper_err) => HttpError::from(*hyper_err),
        Err(other) => HttpError::Transport(other),
    }
}

fn box_response_body(response: Response<hyper::body::Incoming>) -> Response<ResponseBody> {
    response.map(|body| {
        body.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
            .boxed()
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_builder_applies_settings() {
        let builder = HttpClientBuilder::new()
            .timeout(Duration::from_secs(5))
            .user_agent("pnode-monitor/test")
            .max_body_size(1024)
            .allow_insecure_http();

        assert_eq!(builder.config.request_timeout, Duration::from_secs(5));
        assert_eq!(builder.config.user_agent, "pnode-monitor/test");
        assert_eq!(builder.config.max_body_size, 1024);
        assert_eq!(builder.config.transport, TransportSecurity::AllowInsecureHttp);
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let result = HttpClientBuilder::new().user_agent("bad\nagent").build();
        assert!(matches!(result, Err(HttpError::InvalidHeaderValue(_))));
    }

    #[test]
    fn test_map_tower_error_wraps_unknown_as_transport() {
        let err: tower::BoxError = "connection reset".into();
        let mapped = map_tower_error(err, Duration::from_secs(3));
        assert!(matches!(mapped, HttpError::Transport(_)));
    }
}
