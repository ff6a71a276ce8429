use std::time::Duration;

/// Default User-Agent string for HTTP requests
pub(crate) const DEFAULT_USER_AGENT: &str = concat!("pnode-http/", env!("CARGO_PKG_VERSION"));

/// Default maximum response body size (10 MiB)
pub(crate) const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Which URL schemes the client accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportSecurity {
    /// Only `https://` URLs are accepted
    #[default]
    TlsOnly,
    /// Both `http://` and `https://` URLs are accepted
    ///
    /// pNode RPC endpoints and the free geolocation tier are plain HTTP, so
    /// the clients that talk to them opt into this mode explicitly.
    AllowInsecureHttp,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub(crate) struct HttpClientConfig {
    /// Deadline for a single request, shared by the response head and the
    /// body read (default: 30s)
    pub request_timeout: Duration,

    /// User-Agent header value
    pub user_agent: String,

    /// Maximum accepted response body size in bytes (default: 10 MiB)
    pub max_body_size: usize,

    /// Accepted URL schemes
    pub transport: TransportSecurity,

    /// Idle timeout for pooled connections (default: 90s, `None` keeps them forever)
    pub pool_idle_timeout: Option<Duration>,

    /// Maximum idle connections kept per host (default: 32)
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            transport: TransportSecurity::TlsOnly,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }
}
