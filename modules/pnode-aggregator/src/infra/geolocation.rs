use crate::contract::Geolocation;
use crate::domain::error::EnrichmentError;
use crate::domain::ports::GeoSource;
use pnode_http::HttpClient;
use serde::Deserialize;

const FIELDS: &str = "status,country,countryCode,city,lat,lon,isp";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeoResponse {
    status: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    country_code: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
    isp: Option<String>,
}

/// Per-host lookups against an ip-api style service
pub struct HttpGeoSource {
    client: HttpClient,
    base_url: String,
}

impl HttpGeoSource {
    #[must_use]
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn lookup_url(&self, host: &str) -> String {
        format!(
            "{}/{host}?fields={FIELDS}",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl GeoSource for HttpGeoSource {
    async fn lookup(&self, host: &str) -> Result<Geolocation, EnrichmentError> {
        let failed = |source| EnrichmentError::Geolocation {
            ip: host.to_owned(),
            source,
        };

        let response: GeoResponse = self
            .client
            .get(&self.lookup_url(host))
            .send()
            .await
            .map_err(failed)?
            .json()
            .await
            .map_err(failed)?;

        if response.status != "success" {
            return Err(EnrichmentError::GeolocationRejected {
                ip: host.to_owned(),
                status: response.status,
            });
        }

        Ok(Geolocation {
            city: response.city,
            country: response.country,
            country_code: response.country_code,
            latitude: response.lat,
            longitude: response.lon,
            isp: response.isp,
        })
    }
}
