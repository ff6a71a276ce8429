//! Configuration for the pNode aggregator.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// RPC port every fleet pNode listens on
pub const DEFAULT_RPC_PORT: u16 = 6000;

const KNOWN_PNODE_HOSTS: &[&str] = &[
    "173.212.203.145",
    "173.212.220.65",
    "161.97.97.41",
    "192.190.136.36",
    "192.190.136.37",
    "192.190.136.38",
    "192.190.136.28",
    "192.190.136.29",
    "207.244.255.1",
];

/// Aggregator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregatorConfig {
    /// pNode RPC endpoints polled every cycle (`host:port` or full URL).
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    /// Seed RPC endpoints used for on-demand queries, tried in rotation.
    #[serde(default = "default_seed_endpoints")]
    pub seed_endpoints: Vec<String>,

    /// Per-endpoint timeout for the fan-out poll.
    #[serde(default = "default_poll_timeout", with = "crate::humantime_serde")]
    pub poll_timeout: Duration,

    /// Per-attempt timeout for seed calls.
    #[serde(default = "default_seed_timeout", with = "crate::humantime_serde")]
    pub seed_timeout: Duration,

    /// Total attempts per seed call, failover included.
    #[serde(default = "default_seed_max_attempts")]
    pub seed_max_attempts: u32,

    /// Base of the exponential backoff between seed attempts.
    #[serde(default = "default_seed_backoff_base", with = "crate::humantime_serde")]
    pub seed_backoff_base: Duration,

    /// Bulk credits endpoint.
    #[serde(default = "default_credits_url")]
    pub credits_url: String,

    #[serde(default = "default_credits_timeout", with = "crate::humantime_serde")]
    pub credits_timeout: Duration,

    /// How long a fetched credits table is reused.
    #[serde(default = "default_credits_ttl", with = "crate::humantime_serde")]
    pub credits_ttl: Duration,

    /// Geolocation lookup base URL; the IP is appended as a path segment.
    #[serde(default = "default_geolocation_url")]
    pub geolocation_url: String,

    #[serde(default = "default_geolocation_timeout", with = "crate::humantime_serde")]
    pub geolocation_timeout: Duration,

    /// Lookups issued concurrently per batch.
    #[serde(default = "default_geolocation_batch_size")]
    pub geolocation_batch_size: usize,

    /// Pause between consecutive geolocation batches.
    #[serde(
        default = "default_geolocation_batch_delay",
        with = "crate::humantime_serde"
    )]
    pub geolocation_batch_delay: Duration,

    /// Freshness window of the aggregated node view.
    #[serde(default = "default_view_ttl", with = "crate::humantime_serde")]
    pub view_ttl: Duration,

    /// Period of the background sweep that drops expired cache entries.
    #[serde(default = "default_cache_sweep_interval", with = "crate::humantime_serde")]
    pub cache_sweep_interval: Duration,

    /// User-Agent sent on every outbound request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoints() -> Vec<String> {
    KNOWN_PNODE_HOSTS
        .iter()
        .map(|host| format!("{host}:{DEFAULT_RPC_PORT}"))
        .collect()
}

fn default_seed_endpoints() -> Vec<String> {
    vec![
        "http://seed1.xandeum.network:6000/rpc".to_owned(),
        "http://seed2.xandeum.network:6000/rpc".to_owned(),
    ]
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_seed_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_seed_max_attempts() -> u32 {
    3
}

fn default_seed_backoff_base() -> Duration {
    Duration::from_secs(1)
}

fn default_credits_url() -> String {
    "https://podcredits.xandeum.network/api/pods-credits".to_owned()
}

fn default_credits_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_credits_ttl() -> Duration {
    Duration::from_secs(60)
}

fn default_geolocation_url() -> String {
    "http://ip-api.com/json".to_owned()
}

fn default_geolocation_timeout() -> Duration {
    Duration::from_secs(3)
}

fn default_geolocation_batch_size() -> usize {
    40
}

fn default_geolocation_batch_delay() -> Duration {
    Duration::from_millis(1500)
}

fn default_view_ttl() -> Duration {
    Duration::from_secs(15)
}

fn default_cache_sweep_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_user_agent() -> String {
    concat!("pnode-monitor/", env!("CARGO_PKG_VERSION")).to_owned()
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            seed_endpoints: default_seed_endpoints(),
            poll_timeout: default_poll_timeout(),
            seed_timeout: default_seed_timeout(),
            seed_max_attempts: default_seed_max_attempts(),
            seed_backoff_base: default_seed_backoff_base(),
            credits_url: default_credits_url(),
            credits_timeout: default_credits_timeout(),
            credits_ttl: default_credits_ttl(),
            geolocation_url: default_geolocation_url(),
            geolocation_timeout: default_geolocation_timeout(),
            geolocation_batch_size: default_geolocation_batch_size(),
            geolocation_batch_delay: default_geolocation_batch_delay(),
            view_ttl: default_view_ttl(),
            cache_sweep_interval: default_cache_sweep_interval(),
            user_agent: default_user_agent(),
        }
    }
}

/// Configuration values that would make the aggregator misbehave at runtime
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one pNode endpoint must be configured")]
    NoEndpoints,

    #[error("at least one seed endpoint must be configured")]
    NoSeedEndpoints,

    #[error("seed_max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("geolocation_batch_size must be at least 1")]
    ZeroBatchSize,

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
}

impl AggregatorConfig {
    /// Check the configuration for values that cannot work.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        if self.seed_endpoints.is_empty() {
            return Err(ConfigError::NoSeedEndpoints);
        }
        if self.seed_max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.geolocation_batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }

        let timeouts = [
            ("poll_timeout", self.poll_timeout),
            ("seed_timeout", self.seed_timeout),
            ("credits_timeout", self.credits_timeout),
            ("geolocation_timeout", self.geolocation_timeout),
            ("cache_sweep_interval", self.cache_sweep_interval),
        ];
        if let Some((field, _)) = timeouts.iter().find(|(_, d)| d.is_zero()) {
            return Err(ConfigError::ZeroDuration { field: *field });
        }
        Ok(())
    }
}
