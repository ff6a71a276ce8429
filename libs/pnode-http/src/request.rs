use crate::client::HttpClient;
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::HttpResponse;
use bytes::Bytes;
use http::Request;
use http_body_util::Full;
use serde::Serialize;
use tower::ServiceExt;

/// HTTP request builder with fluent API
///
/// Created by [`HttpClient::get`] or [`HttpClient::post`]. Header errors are
/// deferred and surface from [`send()`](RequestBuilder::send).
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    client: HttpClient,
    method: http::Method,
    url: String,
    headers: Vec<(http::header::HeaderName, http::header::HeaderValue)>,
    body: Option<Bytes>,
    /// Error captured during building (deferred to `send()`)
    error: Option<HttpError>,
}

impl RequestBuilder {
    pub(crate) fn new(client: HttpClient, method: http::Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: Vec::new(),
            body: None,
            error: None,
        }
    }

    /// Add a single header to the request
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }

        match (
            http::header::HeaderName::try_from(name),
            http::header::HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.push((name, value));
            }
            (Err(e), _) => {
                self.error = Some(HttpError::InvalidHeaderName(e));
            }
            (_, Err(e)) => {
                self.error = Some(HttpError::InvalidHeaderValue(e));
            }
        }
        self
    }

    /// Set request body as JSON
    ///
    /// Content-Type is set to `application/json` unless already provided.
    ///
    /// # Errors
    ///
    /// Returns `Err(HttpError::Json)` if serialization fails, or any deferred
    /// header error.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        let json_bytes = serde_json::to_vec(body)?;
        self.body = Some(Bytes::from(json_bytes));
        Ok(self)
    }

    /// Validate URL and scheme against the transport security mode
    fn validate_url(&self) -> Result<http::Uri, HttpError> {
        let uri: http::Uri =
            self.url
                .parse()
                .map_err(|e: http::uri::InvalidUri| HttpError::InvalidUri {
                    url: self.url.clone(),
                    kind: InvalidUriKind::ParseError,
                    reason: e.to_string(),
                })?;

        if uri.authority().is_none() {
            return Err(HttpError::InvalidUri {
                url: self.url.clone(),
                kind: InvalidUriKind::MissingAuthority,
                reason: "missing host/authority".to_owned(),
            });
        }

        match uri.scheme_str() {
            Some("https") => Ok(uri),
            Some("http") => match self.client.transport {
                TransportSecurity::AllowInsecureHttp => Ok(uri),
                TransportSecurity::TlsOnly => Err(HttpError::InvalidScheme {
                    scheme: "http".to_owned(),
                    reason: "HTTPS required (transport security is TlsOnly)".to_owned(),
                }),
            },
            Some(scheme) => Err(HttpError::InvalidScheme {
                scheme: scheme.to_owned(),
                reason: "only http:// and https:// schemes are supported".to_owned(),
            }),
            None => Err(HttpError::InvalidUri {
                url: self.url.clone(),
                kind: InvalidUriKind::MissingScheme,
                reason: "missing scheme".to_owned(),
            }),
        }
    }

    /// Send the request and return the response head
    ///
    /// The body is read later through [`HttpResponse`] against the same
    /// deadline, so head and body together are bounded by the client timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` if:
    /// - a deferred header error was recorded
    /// - the URL or its scheme is invalid
    /// - the transport fails or the request times out
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        let uri = self.validate_url()?;
        let mut builder = Request::builder().method(self.method).uri(uri);

        let has_header = |wanted: &http::header::HeaderName| {
            self.headers.iter().any(|(name, _)| name == wanted)
        };
        if !has_header(&http::header::USER_AGENT) {
            builder = builder.header(http::header::USER_AGENT, self.client.user_agent.clone());
        }
        if self.body.is_some() && !has_header(&http::header::CONTENT_TYPE) {
            builder = builder.header(http::header::CONTENT_TYPE, "application/json");
        }
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        let request = builder.body(Full::new(self.body.unwrap_or_default()))?;

        let timeout = self.client.timeout;
        let deadline = tokio::time::Instant::now() + timeout;
        let max_body_size = self.client.max_body_size;
        let inner = self.client.service.oneshot(request).await?;

        Ok(HttpResponse {
            inner,
            max_body_size,
            deadline,
            timeout,
        })
    }
}
