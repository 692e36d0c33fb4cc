//! Time-bounded fragment cache
//!
//! Rendered section HTML is stored under `daily-recap-cache-<section>` with
//! a 5-minute TTL, so a section can be re-served instantly while a fresh
//! build runs. Expired entries are evicted lazily on read; a sweep runs at
//! startup and on a fixed interval.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

/// Prefix shared with the legacy page's localStorage keys.
const CACHE_KEY_PREFIX: &str = "daily-recap-cache-";

/// Configuration for the fragment cache.
#[derive(Debug, Clone)]
pub struct FragmentCacheConfig {
    /// How long a rendered fragment stays valid.
    pub ttl: Duration,

    /// How often the sweep task removes expired entries.
    pub sweep_interval: Duration,
}

impl Default for FragmentCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// A cached rendered fragment.
#[derive(Debug, Clone)]
struct CachedFragment {
    html: String,
    stored_at: Instant,
}

impl CachedFragment {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() >= ttl
    }
}

/// Hit/miss/eviction counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
}

impl CacheStats {
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
}

/// TTL store for rendered section fragments.
pub struct FragmentCache {
    entries: DashMap<String, CachedFragment>,
    config: FragmentCacheConfig,
    stats: CacheStats,
}

impl FragmentCache {
    pub fn new(config: FragmentCacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            stats: CacheStats::default(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FragmentCacheConfig::default())
    }

    pub fn config(&self) -> &FragmentCacheConfig {
        &self.config
    }

    fn cache_key(section: &str) -> String {
        format!("{CACHE_KEY_PREFIX}{section}")
    }

    /// Get a fragment if it is still fresh. An expired entry is evicted
    /// and reads as absent.
    pub fn get(&self, section: &str) -> Option<String> {
        let key = Self::cache_key(section);

        if let Some(entry) = self.entries.get(&key) {
            if entry.is_expired(self.config.ttl) {
                drop(entry);
                self.entries.remove(&key);
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(section, "cache entry expired");
                return None;
            }

            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Some(entry.html.clone());
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a rendered fragment, stamping the current time.
    pub fn insert(&self, section: &str, html: String) {
        self.entries.insert(
            Self::cache_key(section),
            CachedFragment {
                html,
                stored_at: Instant::now(),
            },
        );
        self.stats.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove all expired entries. Returns the number removed.
    pub fn sweep(&self) -> usize {
        let ttl = self.config.ttl;
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            if entry.is_expired(ttl) {
                removed += 1;
                false
            } else {
                true
            }
        });
        if removed > 0 {
            self.stats.evictions.fetch_add(removed as u64, Ordering::Relaxed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}

/// Periodically sweep expired fragments.
pub fn spawn_sweep_task(cache: Arc<FragmentCache>) {
    let interval = cache.config().sweep_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            let removed = cache.sweep();
            if removed > 0 {
                debug!(removed, "swept expired fragments");
            }
        }
    });
}
