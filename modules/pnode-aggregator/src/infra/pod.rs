//! Wire shape of a pod as reported by pNodes and seeds.

use crate::contract::NodeRecord;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RawPod {
    address: String,
    pubkey: String,
    last_seen_timestamp: i64,
    #[serde(default)]
    version: String,
    #[serde(default)]
    rpc_port: u16,
    #[serde(default)]
    is_public: bool,
    #[serde(default)]
    uptime: u64,
    #[serde(default)]
    storage_committed: u64,
    #[serde(default)]
    storage_used: u64,
    #[serde(default)]
    storage_usage_percent: f64,
}

/// Why a pod entry was rejected
#[derive(Debug, thiserror::Error)]
pub enum PodDecodeError {
    #[error("malformed pod entry: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("last_seen_timestamp {0} out of range")]
    TimestampOutOfRange(i64),
}

/// Decode one pod entry into a fresh record.
///
/// # Errors
///
/// `Shape` when a required member is missing or has the wrong type,
/// `TimestampOutOfRange` when the timestamp has no calendar representation.
pub fn normalize(value: Value, is_online: bool) -> Result<NodeRecord, PodDecodeError> {
    let raw: RawPod = serde_json::from_value(value)?;
    let last_seen = DateTime::from_timestamp(raw.last_seen_timestamp, 0)
        .ok_or(PodDecodeError::TimestampOutOfRange(raw.last_seen_timestamp))?;

    Ok(NodeRecord {
        address: raw.address,
        public_key: raw.pubkey,
        version: raw.version,
        last_seen_at: raw.last_seen_timestamp,
        last_seen,
        rpc_port: raw.rpc_port,
        is_public: raw.is_public,
        uptime_seconds: raw.uptime,
        storage_committed_bytes: raw.storage_committed,
        storage_used_bytes: raw.storage_used,
        storage_usage_percent: raw.storage_usage_percent,
        credits: 0,
        geolocation: None,
        is_online,
    })
}

/// Decode a `pods` array entry by entry; malformed entries are logged and skipped.
pub fn decode_pods(pods: Vec<Value>, source: &str, is_online: bool) -> Vec<NodeRecord> {
    pods.into_iter()
        .enumerate()
        .filter_map(|(index, pod)| match normalize(pod, is_online) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(source, index, error = %e, "skipping malformed pod entry");
                None
            }
        })
        .collect()
}
