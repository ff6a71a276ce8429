//! Wiring of the aggregator from configuration.

use crate::api::rest::routes;
use crate::config::AggregatorConfig;
use crate::contract::client::PodsApi;
use crate::domain::cache::ViewCache;
use crate::domain::service::{Service, ServiceSettings, Sources};
use crate::gateways::local::PodsLocalClient;
use crate::infra::credits::HttpCreditsSource;
use crate::infra::geolocation::HttpGeoSource;
use crate::infra::poller::RpcPoller;
use crate::infra::resilient::ResilientRpcClient;
use crate::infra::rpc::HttpRpcTransport;
use crate::infra::seed::SeedClient;
use anyhow::Context;
use pnode_http::{HttpClient, TransportSecurity};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A configured aggregator: service, shared cache and HTTP surface
pub struct AggregatorModule {
    service: Arc<Service>,
    cache: Arc<ViewCache>,
    sweep_interval: Duration,
}

impl AggregatorModule {
    /// Build every collaborator from `config`.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or when an HTTP client cannot be built.
    pub fn from_config(config: &AggregatorConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid aggregator configuration")?;

        let client = |timeout: Duration, transport: TransportSecurity| {
            HttpClient::builder()
                .timeout(timeout)
                .user_agent(config.user_agent.as_str())
                .transport(transport)
                .build()
        };
        let insecure = TransportSecurity::AllowInsecureHttp;

        let poll_transport = HttpRpcTransport::new(
            client(config.poll_timeout, insecure).context("building poll HTTP client")?,
        );
        let seed_transport = HttpRpcTransport::new(
            client(config.seed_timeout, insecure).context("building seed HTTP client")?,
        );
        // Both schemes are accepted so the credits URL may point at a local mirror.
        let credits_client =
            client(config.credits_timeout, insecure).context("building credits HTTP client")?;
        let geo_client =
            client(config.geolocation_timeout, insecure).context("building geolocation HTTP client")?;

        let seeds = SeedClient::new(
            ResilientRpcClient::new(Arc::new(seed_transport), config.seed_backoff_base),
            config.seed_endpoints.clone(),
            config.seed_max_attempts,
        );

        let sources = Sources {
            poller: Arc::new(RpcPoller::new(Arc::new(poll_transport))),
            credits: Arc::new(HttpCreditsSource::new(credits_client, &config.credits_url)),
            geo: Arc::new(HttpGeoSource::new(geo_client, &config.geolocation_url)),
            seeds: Arc::new(seeds),
        };

        let cache = Arc::new(ViewCache::new());
        let service = Service::new(
            Arc::clone(&cache),
            sources,
            ServiceSettings::from_config(config),
        );

        tracing::info!(
            endpoints = config.endpoints.len(),
            seeds = config.seed_endpoints.len(),
            view_ttl = ?config.view_ttl,
            "pNode aggregator initialized"
        );

        Ok(Self {
            service: Arc::new(service),
            cache,
            sweep_interval: config.cache_sweep_interval,
        })
    }

    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    /// In-process client over the service
    #[must_use]
    pub fn client(&self) -> Arc<dyn PodsApi> {
        Arc::new(PodsLocalClient::new(self.service()))
    }

    /// REST routes under `/api`
    #[must_use]
    pub fn router(&self) -> axum::Router {
        routes::register_routes(axum::Router::new(), self.client())
    }

    /// Start the background cache sweep; it stops when `cancel` fires.
    pub fn spawn_background(&self, cancel: CancellationToken) -> JoinHandle<()> {
        self.cache.spawn_sweeper(self.sweep_interval, cancel)
    }
}
