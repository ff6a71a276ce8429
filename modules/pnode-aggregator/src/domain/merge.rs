use crate::contract::NodeRecord;
use std::collections::HashMap;

/// Collapse reports of the same node into the most recent one.
///
/// Records are keyed by `public_key`; a later report replaces an earlier one
/// only when its `last_seen_at` is strictly greater, so on a tie the first
/// report wins. Output keeps the order in which each key was first seen.
pub fn dedup_latest(records: impl IntoIterator<Item = NodeRecord>) -> Vec<NodeRecord> {
    let mut merged: Vec<NodeRecord> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for record in records {
        if let Some(&slot) = slots.get(&record.public_key) {
            if record.last_seen_at > merged[slot].last_seen_at {
                merged[slot] = record;
            }
        } else {
            slots.insert(record.public_key.clone(), merged.len());
            merged.push(record);
        }
    }

    merged
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn record(pubkey: &str, address: &str, last_seen_at: i64) -> NodeRecord {
        NodeRecord {
            address: address.to_owned(),
            public_key: pubkey.to_owned(),
            version: "0.7.0".to_owned(),
            last_seen_at,
            last_seen: DateTime::from_timestamp(last_seen_at, 0).unwrap(),
            rpc_port: 6000,
            is_public: true,
            uptime_seconds: 0,
            storage_committed_bytes: 0,
            storage_used_bytes: 0,
            storage_usage_percent: 0.0,
            credits: 0,
            geolocation: None,
            is_online: true,
        }
    }

    #[test]
    fn newer_report_wins() {
        let merged = dedup_latest(vec![
            record("pk1", "10.0.0.1:9001", 100),
            record("pk1", "10.0.0.2:9001", 200),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].last_seen_at, 200);
        assert_eq!(merged[0].address, "10.0.0.2:9001");
    }

    #[test]
    fn older_report_does_not_replace() {
        let merged = dedup_latest(vec![
            record("pk1", "10.0.0.2:9001", 200),
            record("pk1", "10.0.0.1:9001", 100),
        ]);
        assert_eq!(merged[0].last_seen_at, 200);
    }

    #[test]
    fn tie_keeps_first_seen() {
        let merged = dedup_latest(vec![
            record("pk1", "first:9001", 100),
            record("pk1", "second:9001", 100),
        ]);
        assert_eq!(merged[0].address, "first:9001");
    }

    #[test]
    fn distinct_keys_across_endpoints() {
        // 3 endpoints each reporting the same 4 nodes.
        let reports = (0..3).flat_map(|endpoint| {
            (0..4).map(move |n| record(&format!("pk{n}"), &format!("ep{endpoint}:9001"), n))
        });
        let merged = dedup_latest(reports);
        assert_eq!(merged.len(), 4);
        let keys: Vec<_> = merged.iter().map(|r| r.public_key.as_str()).collect();
        assert_eq!(keys, vec!["pk0", "pk1", "pk2", "pk3"]);
    }
}
