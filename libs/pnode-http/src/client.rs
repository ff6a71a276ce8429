use crate::builder::{HttpClientBuilder, HttpService};
use crate::config::TransportSecurity;
use crate::request::RequestBuilder;
use std::time::Duration;

/// HTTP client with connection pooling, TLS and a per-request timeout
///
/// Cloning is cheap: clones share the same connection pool.
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: HttpService,
    pub(crate) user_agent: http::HeaderValue,
    pub(crate) timeout: Duration,
    pub(crate) max_body_size: usize,
    pub(crate) transport: TransportSecurity,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("max_body_size", &self.max_body_size)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Start building a client
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Start a GET request
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(http::Method::GET, url)
    }

    /// Start a POST request
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(http::Method::POST, url)
    }

    fn request(&self, method: http::Method, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), method, url.to_owned())
    }
}
