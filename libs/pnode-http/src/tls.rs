//! TLS utilities for the HTTP client.

use crate::config::TransportSecurity;
use crate::error::HttpError;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use std::sync::Arc;

/// Get the crypto provider for TLS connections.
///
/// Uses the globally installed default provider when there is one, otherwise
/// creates an aws-lc-rs provider without installing it globally.
pub(crate) fn crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

/// Build the HTTPS connector with bundled webpki roots.
///
/// # Errors
///
/// Returns `HttpError::Tls` if the crypto provider rejects the default
/// protocol versions.
pub(crate) fn build_https_connector(
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let builder = hyper_rustls::HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(crypto_provider())
        .map_err(|e| HttpError::Tls(Box::new(e)))?;

    let connector = match transport {
        TransportSecurity::AllowInsecureHttp => builder.https_or_http().enable_http1().build(),
        TransportSecurity::TlsOnly => builder.https_only().enable_http1().build(),
    };
    Ok(connector)
}
