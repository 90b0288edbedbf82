//! Fixed-size time-expiring cache region used by the catalog engine.

use lru::LruCache;
use parking_lot::Mutex;
use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{CacheRegionStats, EvictionPolicy};

struct TimedEntry<V> {
    value: V,
    stored_at: Instant,
}

/// One logical partition of the catalog engine's second-level cache.
///
/// Eviction is least-recently-used once `max_entries` is reached, plus
/// per-entry time-to-live expiry checked on read. Hit/miss/put counters are
/// monotonic between clears and reset to zero on `clear`.
pub struct TimedLruRegion<K: Hash + Eq, V: Clone> {
    name: &'static str,
    entries: Mutex<LruCache<K, TimedEntry<V>>>,
    max_entries: NonZeroUsize,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    puts: AtomicU64,
}

impl<K: Hash + Eq, V: Clone> TimedLruRegion<K, V> {
    pub fn new(name: &'static str, max_entries: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            name,
            entries: Mutex::new(LruCache::new(max_entries)),
            max_entries,
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            puts: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::TimedLru {
            max_entries: self.max_entries.get(),
            ttl: self.ttl,
        }
    }

    /// Look up a cached value, accounting a hit or a miss.
    ///
    /// An expired entry counts as a miss and is dropped on the spot.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a value, accounting a put. Evicts the LRU entry when full.
    pub fn put(&self, key: K, value: V) {
        let mut entries = self.entries.lock();
        entries.put(
            key,
            TimedEntry {
                value,
                stored_at: Instant::now(),
            },
        );
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    /// Drop a single entry, e.g. after the backing row was deleted.
    pub fn invalidate<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().pop(key);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Evict every entry and reset the counters to zero.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let evicted = entries.len();
        entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.puts.store(0, Ordering::Relaxed);
        debug!(region = self.name, evicted, "cache region cleared");
    }

    pub fn stats(&self) -> CacheRegionStats {
        CacheRegionStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
        }
    }
}
