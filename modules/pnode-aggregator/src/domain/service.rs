use crate::config::AggregatorConfig;
use crate::contract::{AggregatorError, NodeRecord, NodeStats, SeedPods};
use crate::domain::address::host_of;
use crate::domain::cache::{CacheKey, CacheValue, ViewCache};
use crate::domain::merge::dedup_latest;
use crate::domain::pacing::BatchSchedule;
use crate::domain::ports::{CreditsSource, FleetPoller, GeoSource, SeedSource};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Tunables of the aggregation cycle
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    /// Fleet endpoints polled every cycle, in report order
    pub endpoints: Vec<String>,
    pub view_ttl: Duration,
    pub credits_ttl: Duration,
    pub geolocation: BatchSchedule,
}

impl ServiceSettings {
    #[must_use]
    pub fn from_config(config: &AggregatorConfig) -> Self {
        Self {
            endpoints: config.endpoints.clone(),
            view_ttl: config.view_ttl,
            credits_ttl: config.credits_ttl,
            geolocation: BatchSchedule::new(
                config.geolocation_batch_size,
                config.geolocation_batch_delay,
            ),
        }
    }
}

/// External collaborators the service composes
#[derive(Clone)]
pub struct Sources {
    pub poller: Arc<dyn FleetPoller>,
    pub credits: Arc<dyn CreditsSource>,
    pub geo: Arc<dyn GeoSource>,
    pub seeds: Arc<dyn SeedSource>,
}

/// Aggregation service: poll, merge, enrich and publish behind the cache
pub struct Service {
    cache: Arc<ViewCache>,
    sources: Sources,
    settings: ServiceSettings,
    /// Serializes cycles so a burst of misses runs one poll
    refresh_lock: Mutex<()>,
}

impl Service {
    #[must_use]
    pub fn new(cache: Arc<ViewCache>, sources: Sources, settings: ServiceSettings) -> Self {
        Self {
            cache,
            sources,
            settings,
            refresh_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<ViewCache> {
        &self.cache
    }

    #[must_use]
    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Current network view, rebuilt only when the cached one has expired.
    pub async fn get_current_view(&self) -> Arc<Vec<NodeRecord>> {
        if let Some(view) = self.cached_view() {
            return view;
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(view) = self.cached_view() {
            tracing::debug!("view rebuilt by a concurrent caller");
            return view;
        }
        self.run_cycle().await
    }

    /// Drop the cached view and always run a new cycle.
    pub async fn force_refresh(&self) -> Arc<Vec<NodeRecord>> {
        self.cache.delete(&CacheKey::AggregatedPods);
        let _guard = self.refresh_lock.lock().await;
        self.run_cycle().await
    }

    /// Stats of one node as reported by the seed endpoints.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty address, `Seed` once every attempt failed.
    pub async fn node_stats(&self, address: &str) -> Result<NodeStats, AggregatorError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AggregatorError::Validation(
                "address parameter is required".to_owned(),
            ));
        }

        let stats = self
            .sources
            .seeds
            .get_stats(address)
            .await
            .inspect_err(|e| tracing::warn!(address, error = %e, "seed get-stats failed"))?;
        Ok(stats)
    }

    /// Pod listing as known to the seed endpoints.
    ///
    /// # Errors
    ///
    /// `Seed` once every attempt failed.
    pub async fn seed_pods(&self) -> Result<SeedPods, AggregatorError> {
        let pods = self
            .sources
            .seeds
            .get_pods()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "seed get-pods failed"))?;
        Ok(pods)
    }

    fn cached_view(&self) -> Option<Arc<Vec<NodeRecord>>> {
        match self.cache.get(&CacheKey::AggregatedPods) {
            Some(CacheValue::Pods(view)) => Some(view),
            _ => None,
        }
    }

    async fn run_cycle(&self) -> Arc<Vec<NodeRecord>> {
        let started = Instant::now();
        tracing::debug!(endpoints = self.settings.endpoints.len(), "starting aggregation cycle");

        let (reports, credits) = tokio::join!(
            self.sources.poller.poll_all(&self.settings.endpoints),
            self.credits_table(),
        );
        let report_count = reports.len();

        let mut records = dedup_latest(reports);
        for record in &mut records {
            record.credits = credits.get(&record.public_key).copied().unwrap_or(0);
        }
        self.attach_geolocation(&mut records).await;

        let view = Arc::new(records);
        self.cache.set(
            CacheKey::AggregatedPods,
            CacheValue::Pods(Arc::clone(&view)),
            self.settings.view_ttl,
        );

        tracing::info!(
            count = view.len(),
            reports = report_count,
            elapsed = ?started.elapsed(),
            "aggregated pNode view"
        );
        tracing::debug!(cache = ?self.cache.stats(), "cache after publish");
        view
    }

    async fn credits_table(&self) -> Arc<HashMap<String, u64>> {
        if let Some(CacheValue::Credits(table)) = self.cache.get(&CacheKey::PodCredits) {
            return table;
        }

        match self.sources.credits.fetch_credits().await {
            Ok(table) => {
                let table = Arc::new(table);
                self.cache.set(
                    CacheKey::PodCredits,
                    CacheValue::Credits(Arc::clone(&table)),
                    self.settings.credits_ttl,
                );
                table
            }
            Err(e) => {
                tracing::warn!(error = %e, "credits unavailable, defaulting every node to 0");
                Arc::default()
            }
        }
    }

    async fn attach_geolocation(&self, records: &mut [NodeRecord]) {
        let hosts: Vec<String> = records
            .iter()
            .map(|r| host_of(&r.address).to_owned())
            .collect();
        let geo = &self.sources.geo;

        let lookups = self
            .settings
            .geolocation
            .run(&hosts, |host| {
                let host = host.clone();
                async move { geo.lookup(&host).await }
            })
            .await;

        let mut located = 0usize;
        for (record, lookup) in records.iter_mut().zip(lookups) {
            match lookup {
                Ok(location) => {
                    record.geolocation = Some(location);
                    located += 1;
                }
                Err(e) => {
                    tracing::warn!(address = %record.address, error = %e, "geolocation unavailable");
                }
            }
        }
        tracing::debug!(located, total = records.len(), "geolocation attached");
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::contract::{Geolocation, RpcError};
    use crate::domain::error::EnrichmentError;
    use chrono::DateTime;
    use tracing_test::traced_test;

    struct OnePod;

    #[async_trait::async_trait]
    impl FleetPoller for OnePod {
        async fn poll_all(&self, _endpoints: &[String]) -> Vec<NodeRecord> {
            vec![NodeRecord {
                address: "10.0.0.1:9001".to_owned(),
                public_key: "pk1".to_owned(),
                version: "0.7.0".to_owned(),
                last_seen_at: 100,
                last_seen: DateTime::from_timestamp(100, 0).unwrap(),
                rpc_port: 6000,
                is_public: true,
                uptime_seconds: 1,
                storage_committed_bytes: 0,
                storage_used_bytes: 0,
                storage_usage_percent: 0.0,
                credits: 0,
                geolocation: None,
                is_online: true,
            }]
        }
    }

    struct CreditsDown;

    #[async_trait::async_trait]
    impl CreditsSource for CreditsDown {
        async fn fetch_credits(&self) -> Result<HashMap<String, u64>, EnrichmentError> {
            Err(EnrichmentError::Credits(pnode_http::HttpError::Timeout(
                Duration::from_secs(10),
            )))
        }
    }

    struct NoGeo;

    #[async_trait::async_trait]
    impl GeoSource for NoGeo {
        async fn lookup(&self, host: &str) -> Result<Geolocation, EnrichmentError> {
            Err(EnrichmentError::GeolocationRejected {
                ip: host.to_owned(),
                status: "fail".to_owned(),
            })
        }
    }

    struct NoSeeds;

    #[async_trait::async_trait]
    impl SeedSource for NoSeeds {
        async fn get_pods(&self) -> Result<SeedPods, RpcError> {
            Err(RpcError::NoEndpoints)
        }

        async fn get_stats(&self, _address: &str) -> Result<NodeStats, RpcError> {
            Err(RpcError::NoEndpoints)
        }
    }

    fn service() -> Service {
        let sources = Sources {
            poller: Arc::new(OnePod),
            credits: Arc::new(CreditsDown),
            geo: Arc::new(NoGeo),
            seeds: Arc::new(NoSeeds),
        };
        let settings = ServiceSettings::from_config(&AggregatorConfig::default());
        Service::new(Arc::new(ViewCache::new()), sources, settings)
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn degraded_cycle_is_logged() {
        let view = service().get_current_view().await;

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].credits, 0);
        assert!(view[0].geolocation.is_none());
        assert!(logs_contain("credits unavailable"));
        assert!(logs_contain("geolocation unavailable"));
        assert!(logs_contain("aggregated pNode view"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_credits_are_not_cached() {
        let service = service();
        service.get_current_view().await;
        assert!(
            service.cache().get(&CacheKey::PodCredits).is_none(),
            "an outage must not be remembered as an empty table"
        );
    }

    #[tokio::test]
    async fn blank_address_is_a_validation_error() {
        let err = service().node_stats("   ").await.unwrap_err();
        assert!(matches!(err, AggregatorError::Validation(_)));
    }
}
