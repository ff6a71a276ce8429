use crate::domain::error::EnrichmentError;
use crate::domain::ports::CreditsSource;
use pnode_http::HttpClient;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    pods_credits: Vec<PodCredits>,
}

#[derive(Debug, Deserialize)]
struct PodCredits {
    pod_id: String,
    credits: u64,
}

/// Bulk credits table fetched with one GET
pub struct HttpCreditsSource {
    client: HttpClient,
    url: String,
}

impl HttpCreditsSource {
    #[must_use]
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl CreditsSource for HttpCreditsSource {
    async fn fetch_credits(&self) -> Result<HashMap<String, u64>, EnrichmentError> {
        let response: CreditsResponse = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(EnrichmentError::Credits)?
            .json()
            .await
            .map_err(EnrichmentError::Credits)?;

        let table: HashMap<String, u64> = response
            .pods_credits
            .into_iter()
            .map(|entry| (entry.pod_id, entry.credits))
            .collect();
        tracing::debug!(entries = table.len(), "fetched credits table");
        Ok(table)
    }
}
