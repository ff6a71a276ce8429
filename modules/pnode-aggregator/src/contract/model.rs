use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One pNode as seen by the fleet during a single aggregation cycle.
///
/// Records are rebuilt from scratch every cycle; enrichment fields are
/// attached before the record is published and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Network endpoint (`host:port`) as reported by the polled node
    pub address: String,
    /// Stable node identity across all reporting endpoints
    #[serde(rename = "pubkey")]
    pub public_key: String,
    pub version: String,
    /// Last-seen time, seconds since the Unix epoch
    #[serde(rename = "last_seen_timestamp")]
    pub last_seen_at: i64,
    /// `last_seen_at` as an RFC 3339 timestamp
    pub last_seen: DateTime<Utc>,
    pub rpc_port: u16,
    pub is_public: bool,
    #[serde(rename = "uptime")]
    pub uptime_seconds: u64,
    #[serde(rename = "storage_committed")]
    pub storage_committed_bytes: u64,
    #[serde(rename = "storage_used")]
    pub storage_used_bytes: u64,
    pub storage_usage_percent: f64,
    #[serde(default)]
    pub credits: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<Geolocation>,
    /// True iff the record came from an endpoint that answered this cycle
    #[serde(rename = "isOnline")]
    pub is_online: bool,
}

/// Location of a node's host as reported by the geolocation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub city: String,
    pub country: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
}

/// Runtime statistics of a single node, returned by a seed's `get-stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    pub cpu_percent: f64,
    pub ram_used: u64,
    pub ram_total: u64,
    pub uptime: u64,
    pub packets_received: u64,
    pub packets_sent: u64,
    pub active_streams: u64,
    pub total_bytes: u64,
    pub total_pages: u64,
    pub file_size: u64,
}

/// Pod listing returned by a seed's `get-pods`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPods {
    pub pods: Vec<NodeRecord>,
    pub total_count: u64,
}
