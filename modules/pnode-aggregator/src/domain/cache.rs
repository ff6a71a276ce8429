//! In-memory key/value cache with per-entry expiry.

use crate::contract::NodeRecord;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

struct CacheEntry<V> {
    data: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_valid(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) <= self.ttl
    }
}

/// Snapshot of cache occupancy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats<K> {
    pub size: usize,
    pub keys: Vec<K>,
}

/// Concurrent TTL cache.
///
/// Expired entries are logically absent: `get` drops them on read and
/// [`TtlCache::sweep`] removes the rest. Values are handed out as clones, so
/// store `Arc`s for anything large.
pub struct TtlCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Store `value` under `key`; it expires `ttl` after this call.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        self.entries.insert(
            key,
            CacheEntry {
                data: value,
                created_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Value under `key` if it has not expired.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        {
            let entry = self.entries.get(key)?;
            if entry.is_valid(now) {
                return Some(entry.data.clone());
            }
        }
        // Re-check under the write lock: a fresh value may have landed since.
        self.entries.remove_if(key, |_, entry| !entry.is_valid(now));
        None
    }

    #[must_use]
    pub fn has(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn delete(&self, key: &K) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included until swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats<K> {
        let keys = self.keys();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }

    /// Remove every expired entry and return how many were dropped.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_valid(now));
        before.saturating_sub(self.entries.len())
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Spawn the periodic sweep; it stops when `cancel` fires.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        tracing::info!("cache sweeper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let removed = cache.sweep();
                        if removed > 0 {
                            tracing::debug!(removed, remaining = cache.len(), "swept expired cache entries");
                        }
                    }
                }
            }
        })
    }
}

/// Keys used by the aggregation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    AggregatedPods,
    PodCredits,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CacheKey::AggregatedPods => "aggregated_pods",
            CacheKey::PodCredits => "pod_credits",
        })
    }
}

/// Values stored by the aggregation pipeline
#[derive(Debug, Clone)]
pub enum CacheValue {
    Pods(Arc<Vec<NodeRecord>>),
    Credits(Arc<HashMap<String, u64>>),
}

/// The cache shared by the aggregator service
pub type ViewCache = TtlCache<CacheKey, CacheValue>;
