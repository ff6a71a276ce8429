//! Test doubles shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use chrono::DateTime;
use pnode_aggregator::config::AggregatorConfig;
use pnode_aggregator::contract::{Geolocation, NodeRecord, NodeStats, RpcError, SeedPods};
use pnode_aggregator::domain::cache::ViewCache;
use pnode_aggregator::domain::error::EnrichmentError;
use pnode_aggregator::domain::ports::{CreditsSource, FleetPoller, GeoSource, SeedSource};
use pnode_aggregator::domain::service::{Service, ServiceSettings, Sources};
use pnode_aggregator::infra::rpc::{RpcRequest, RpcResponse, RpcTransport};
use pnode_http::HttpError;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn record(pubkey: &str, address: &str, last_seen_at: i64) -> NodeRecord {
    NodeRecord {
        address: address.to_owned(),
        public_key: pubkey.to_owned(),
        version: "0.7.3".to_owned(),
        last_seen_at,
        last_seen: DateTime::from_timestamp(last_seen_at, 0).unwrap(),
        rpc_port: 6000,
        is_public: true,
        uptime_seconds: 3600,
        storage_committed_bytes: 1_000,
        storage_used_bytes: 100,
        storage_usage_percent: 10.0,
        credits: 0,
        geolocation: None,
        is_online: true,
    }
}

pub fn location(city: &str) -> Geolocation {
    Geolocation {
        city: city.to_owned(),
        country: "Germany".to_owned(),
        country_code: "DE".to_owned(),
        latitude: 49.45,
        longitude: 11.07,
        isp: None,
    }
}

/// Returns a fixed list of reports and counts how often it was polled
#[derive(Default)]
pub struct FakePoller {
    pub reports: Mutex<Vec<NodeRecord>>,
    pub calls: AtomicUsize,
    pub delay: Duration,
}

impl FakePoller {
    pub fn with(reports: Vec<NodeRecord>) -> Self {
        Self {
            reports: Mutex::new(reports),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FleetPoller for FakePoller {
    async fn poll_all(&self, _endpoints: &[String]) -> Vec<NodeRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reports.lock().unwrap().clone()
    }
}

/// Serves a credits table, or fails when `table` is `None`
#[derive(Default)]
pub struct FakeCredits {
    pub table: Option<HashMap<String, u64>>,
    pub calls: AtomicUsize,
}

impl FakeCredits {
    pub fn with(entries: &[(&str, u64)]) -> Self {
        Self {
            table: Some(entries.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()),
            ..Default::default()
        }
    }

    pub fn down() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CreditsSource for FakeCredits {
    async fn fetch_credits(&self) -> Result<HashMap<String, u64>, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table
            .clone()
            .ok_or(EnrichmentError::Credits(HttpError::Timeout(Duration::from_secs(10))))
    }
}

/// Known hosts resolve; everything else is rejected. Records lookup times.
#[derive(Default)]
pub struct FakeGeo {
    pub known: HashMap<String, Geolocation>,
    pub lookups: Mutex<Vec<(String, tokio::time::Instant)>>,
}

impl FakeGeo {
    pub fn with(entries: &[(&str, Geolocation)]) -> Self {
        Self {
            known: entries
                .iter()
                .map(|(host, geo)| ((*host).to_owned(), geo.clone()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> Vec<(String, tokio::time::Instant)> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GeoSource for FakeGeo {
    async fn lookup(&self, host: &str) -> Result<Geolocation, EnrichmentError> {
        self.lookups
            .lock()
            .unwrap()
            .push((host.to_owned(), tokio::time::Instant::now()));
        self.known
            .get(host)
            .cloned()
            .ok_or_else(|| EnrichmentError::GeolocationRejected {
                ip: host.to_owned(),
                status: "fail".to_owned(),
            })
    }
}

/// Seed source answering `get-stats` for one address
#[derive(Default)]
pub struct FakeSeeds {
    pub stats: Option<NodeStats>,
}

#[async_trait::async_trait]
impl SeedSource for FakeSeeds {
    async fn get_pods(&self) -> Result<SeedPods, RpcError> {
        Ok(SeedPods {
            pods: Vec::new(),
            total_count: 0,
        })
    }

    async fn get_stats(&self, _address: &str) -> Result<NodeStats, RpcError> {
        self.stats.clone().ok_or(RpcError::Remote {
            code: -32000,
            message: "node unknown".to_owned(),
        })
    }
}

pub fn sample_stats() -> NodeStats {
    NodeStats {
        cpu_percent: 12.5,
        ram_used: 1_024,
        ram_total: 4_096,
        uptime: 86_400,
        packets_received: 10,
        packets_sent: 20,
        active_streams: 2,
        total_bytes: 1_000_000,
        total_pages: 250,
        file_size: 2_000_000,
    }
}

pub struct Harness {
    pub service: Arc<Service>,
    pub poller: Arc<FakePoller>,
    pub credits: Arc<FakeCredits>,
    pub geo: Arc<FakeGeo>,
}

pub fn harness(poller: FakePoller, credits: FakeCredits, geo: FakeGeo) -> Harness {
    harness_with_seeds(poller, credits, geo, FakeSeeds::default())
}

pub fn harness_with_seeds(
    poller: FakePoller,
    credits: FakeCredits,
    geo: FakeGeo,
    seeds: FakeSeeds,
) -> Harness {
    let poller = Arc::new(poller);
    let credits = Arc::new(credits);
    let geo = Arc::new(geo);
    let sources = Sources {
        poller: poller.clone(),
        credits: credits.clone(),
        geo: geo.clone(),
        seeds: Arc::new(seeds),
    };
    let settings = ServiceSettings::from_config(&AggregatorConfig::default());
    let service = Arc::new(Service::new(Arc::new(ViewCache::new()), sources, settings));
    Harness {
        service,
        poller,
        credits,
        geo,
    }
}

/// Scripted transport: each endpoint answers from its own queue, the last
/// entry repeating once the queue is drained. Every attempt is recorded.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    pub attempts: Mutex<Vec<(String, RpcRequest)>>,
    pub delay: Duration,
}

#[derive(Clone)]
pub enum Reply {
    Ok(RpcResponse),
    Timeout,
}

impl ScriptedTransport {
    pub fn script(self, endpoint: &str, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(endpoint.to_owned(), replies.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn attempted_endpoints(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|(ep, _)| ep.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl RpcTransport for ScriptedTransport {
    async fn exchange(
        &self,
        endpoint: &str,
        request: &RpcRequest,
    ) -> Result<RpcResponse, RpcError> {
        self.attempts
            .lock()
            .unwrap()
            .push((endpoint.to_owned(), request.clone()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts.get_mut(endpoint);
            match queue {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Ok(response)) => Ok(response),
            Some(Reply::Timeout) | None => Err(RpcError::Transport {
                endpoint: endpoint.to_owned(),
                source: HttpError::Timeout(Duration::from_secs(5)),
            }),
        }
    }
}
