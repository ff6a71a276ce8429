use pnode_http::HttpError;

/// Enrichment failures; the pipeline logs them and carries on without the data
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("credits lookup failed: {0}")]
    Credits(#[source] HttpError),

    #[error("geolocation lookup for {ip} failed: {source}")]
    Geolocation {
        ip: String,
        #[source]
        source: HttpError,
    },

    #[error("geolocation lookup for {ip} was rejected with status '{status}'")]
    GeolocationRejected { ip: String, status: String },
}
