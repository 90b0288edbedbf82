//! Dual-engine cache coordination.
//!
//! [`DualCacheManager`] is the single control point for both engines' cache
//! state. Clears and statistics are best-effort: a missing engine is logged
//! and skipped, never an error, so operational tooling can always call these
//! methods.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::engine::catalog::CatalogEngine;
use crate::engine::directory::DirectoryEngine;

/// Point-in-time view of both engines' cache state.
///
/// Catalog counters come from the timed LRU region; the directory side only
/// has a live-entry count because weak-reference reclamation has no hit/miss
/// bookkeeping of its own.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CacheStatisticsSnapshot {
    pub catalog_hits: u64,
    pub catalog_misses: u64,
    pub catalog_puts: u64,
    pub directory_cache_size: usize,
    pub taken_at: DateTime<Utc>,
}

impl CacheStatisticsSnapshot {
    /// Catalog hit ratio in `[0.0, 1.0]`. Zero lookups yield `0.0`, not NaN.
    pub fn catalog_hit_ratio(&self) -> f64 {
        hit_ratio(self.catalog_hits, self.catalog_misses)
    }
}

impl fmt::Display for CacheStatisticsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheStats{{catalog: hits={}, misses={}, puts={}, hit_ratio={:.2}, directory: size={}}}",
            self.catalog_hits,
            self.catalog_misses,
            self.catalog_puts,
            self.catalog_hit_ratio(),
            self.directory_cache_size,
        )
    }
}

/// `hits / (hits + misses)`, or `0.0` when there were no lookups at all.
pub fn hit_ratio(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        return 0.0;
    }
    hits as f64 / total as f64
}

/// Coordinates cache maintenance across both engines.
///
/// Either engine may be absent (construction-order gaps, partial test
/// fixtures); every operation degrades gracefully in that case.
pub struct DualCacheManager {
    catalog: Option<Arc<CatalogEngine>>,
    directory: Option<Arc<DirectoryEngine>>,
}

impl DualCacheManager {
    pub fn new(catalog: Arc<CatalogEngine>, directory: Arc<DirectoryEngine>) -> Self {
        Self {
            catalog: Some(catalog),
            directory: Some(directory),
        }
    }

    /// A manager with no engines attached. Every clear is a logged no-op and
    /// statistics report zeros.
    pub fn detached() -> Self {
        Self {
            catalog: None,
            directory: None,
        }
    }

    /// Clear both engines' caches. Each side is attempted independently, so a
    /// missing catalog engine never prevents the directory clear.
    pub fn clear_all(&self) {
        info!("clearing all caches across both engines");
        self.clear_catalog();
        self.clear_directory();
    }

    /// Evict every catalog cache region. Stored rows are untouched.
    pub fn clear_catalog(&self) {
        match &self.catalog {
            Some(engine) => {
                engine.evict_all_regions();
                info!("catalog cache regions cleared");
            }
            None => warn!("catalog engine not attached, skipping clear"),
        }
    }

    /// Reset the directory identity map. Stored rows are untouched.
    pub fn clear_directory(&self) {
        match &self.directory {
            Some(engine) => {
                engine.reset_identity_map();
                info!("directory identity map cleared");
            }
            None => warn!("directory engine not attached, skipping clear"),
        }
    }

    /// Snapshot both engines' cache state. Never fails: an absent engine
    /// contributes zeros.
    pub fn statistics(&self) -> CacheStatisticsSnapshot {
        let catalog = match &self.catalog {
            Some(engine) => engine.statistics(),
            None => {
                debug!("catalog engine not attached, reporting zero counters");
                Default::default()
            }
        };
        let directory_cache_size = match &self.directory {
            Some(engine) => engine.cache_size(),
            None => {
                debug!("directory engine not attached, reporting zero cache size");
                0
            }
        };
        CacheStatisticsSnapshot {
            catalog_hits: catalog.hits,
            catalog_misses: catalog.misses,
            catalog_puts: catalog.puts,
            directory_cache_size,
            taken_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogCacheConfig;
    use crate::domain::{Product, Supplier};

    fn manager() -> (DualCacheManager, Arc<CatalogEngine>, Arc<DirectoryEngine>) {
        let catalog = Arc::new(CatalogEngine::new(&CatalogCacheConfig::default()));
        let directory = Arc::new(DirectoryEngine::new());
        (
            DualCacheManager::new(catalog.clone(), directory.clone()),
            catalog,
            directory,
        )
    }

    #[test]
    fn clear_all_resets_both_engines() {
        let (manager, catalog, directory) = manager();
        let product = catalog.persist(Product::new("a", "desc", 1.0, "misc"));
        let supplier = directory.persist(Supplier::new("acme", "1 main", "lyon", "555", "tools"));

        manager.clear_all();
        let stats = manager.statistics();
        assert_eq!(stats.catalog_puts, 0);
        assert_eq!(stats.directory_cache_size, 0);

        // rows survive the clear
        assert!(catalog.find_by_id(product.id).is_some());
        assert!(directory.find_by_id(supplier.id).is_some());
    }

    #[test]
    fn clear_all_is_idempotent() {
        let (manager, _catalog, _directory) = manager();
        manager.clear_all();
        manager.clear_all();
        assert_eq!(manager.statistics().catalog_hits, 0);
    }

    #[test]
    fn detached_manager_never_fails() {
        let manager = DualCacheManager::detached();
        manager.clear_all();
        manager.clear_catalog();
        manager.clear_directory();

        let stats = manager.statistics();
        assert_eq!(stats.catalog_hits, 0);
        assert_eq!(stats.catalog_misses, 0);
        assert_eq!(stats.directory_cache_size, 0);
        assert_eq!(stats.catalog_hit_ratio(), 0.0);
    }

    #[test]
    fn hit_ratio_is_hits_over_lookups() {
        assert_eq!(hit_ratio(7, 3), 0.7);
        assert_eq!(hit_ratio(0, 0), 0.0);
        assert_eq!(hit_ratio(5, 0), 1.0);
    }

    #[test]
    fn snapshot_reflects_engine_activity() {
        let (manager, catalog, directory) = manager();
        let product = catalog.persist(Product::new("a", "desc", 1.0, "misc"));
        catalog.find_by_id(product.id);
        catalog.find_by_id(999);
        let _held = directory.persist(Supplier::new("acme", "1 main", "lyon", "555", "tools"));

        let stats = manager.statistics();
        assert_eq!(stats.catalog_hits, 1);
        assert_eq!(stats.catalog_misses, 1);
        assert_eq!(stats.catalog_puts, 1);
        assert_eq!(stats.directory_cache_size, 1);
        assert_eq!(stats.catalog_hit_ratio(), 0.5);
    }

    #[test]
    fn display_format() {
        let (manager, catalog, _directory) = manager();
        let product = catalog.persist(Product::new("a", "desc", 1.0, "misc"));
        catalog.find_by_id(product.id);

        let rendered = manager.statistics().to_string();
        assert!(rendered.starts_with("CacheStats{catalog: hits=1"));
        assert!(rendered.contains("directory: size="));
    }
}
