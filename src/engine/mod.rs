//! In-process persistence engines with second-level caches.
//!
//! Two independently-configured engines share the process but never share
//! entities:
//!
//! - [`catalog::CatalogEngine`] (engine 1): `Product` rows, cached in a
//!   fixed-size time-expiring LRU region per entity type
//! - [`directory::DirectoryEngine`] (engine 2): `Supplier` rows, cached in a
//!   weak-reference identity map that is reclaimed when callers drop their
//!   strong references
//!
//! Cache clears affect only in-memory cache state, never stored rows. A read
//! racing a clear may observe either the cached or the freshly-loaded value;
//! that race is accepted and documented, not a bug.

pub mod catalog;
pub mod directory;
pub mod region;

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Counters for one second-level cache region.
///
/// Monotonically non-decreasing between clears; a clear resets all three to
/// zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheRegionStats {
    pub hits: u64,
    pub misses: u64,
    pub puts: u64,
}

/// Configured eviction policy of a cache region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Bounded LRU with per-entry time-to-live expiry (engine 1).
    TimedLru { max_entries: usize, ttl: Duration },
    /// Weak-reference reclamation: entries live as long as some caller holds
    /// a strong reference (engine 2).
    WeakReference,
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::TimedLru { max_entries, ttl } => {
                write!(f, "timed-lru(max={}, ttl={}s)", max_entries, ttl.as_secs())
            }
            EvictionPolicy::WeakReference => write!(f, "weak-reference"),
        }
    }
}
