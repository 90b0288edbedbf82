//! Catalog engine (engine 1): `Product` rows behind a timed LRU second-level
//! cache.

use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use super::region::TimedLruRegion;
use super::{CacheRegionStats, EvictionPolicy};
use crate::config::CatalogCacheConfig;
use crate::domain::Product;

/// In-process store for `Product` rows with a second-level cache.
///
/// The backing rows are the durable state; the region holds loaded copies
/// shared across all callers. One region per entity type — this engine stores
/// a single entity type, so there is exactly one.
pub struct CatalogEngine {
    rows: DashMap<i64, Product>,
    region: TimedLruRegion<i64, Product>,
    next_id: AtomicI64,
}

impl CatalogEngine {
    pub fn new(config: &CatalogCacheConfig) -> Self {
        let engine = Self {
            rows: DashMap::new(),
            region: TimedLruRegion::new(
                "products",
                config.max_entries(),
                Duration::from_secs(config.ttl_secs),
            ),
            next_id: AtomicI64::new(1),
        };
        info!(policy = %engine.region.policy(), "catalog engine initialized");
        engine
    }

    pub fn cache_policy(&self) -> EvictionPolicy {
        self.region.policy()
    }

    /// Insert or update a row. Transient rows (`id == 0`) get an identifier.
    /// Writes through to the cache region.
    pub fn persist(&self, mut product: Product) -> Product {
        if product.id == 0 {
            product.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        }
        self.rows.insert(product.id, product.clone());
        self.region.put(product.id, product.clone());
        product
    }

    /// Load by primary key, consulting the second-level cache first.
    pub fn find_by_id(&self, id: i64) -> Option<Product> {
        if let Some(cached) = self.region.get(&id) {
            return Some(cached);
        }
        let loaded = self.rows.get(&id).map(|row| row.value().clone());
        if let Some(product) = &loaded {
            self.region.put(id, product.clone());
        }
        loaded
    }

    /// Full scan, sorted by id. Bypasses the cache region.
    pub fn list_all(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.rows.iter().map(|row| row.value().clone()).collect();
        products.sort_by_key(|product| product.id);
        products
    }

    pub fn delete(&self, id: i64) -> bool {
        self.region.invalidate(&id);
        self.rows.remove(&id).is_some()
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn find_by_category(&self, category: &str) -> Vec<Product> {
        self.scan(|product| product.category == category)
    }

    pub fn find_by_price_range(&self, min_price: f64, max_price: f64) -> Vec<Product> {
        self.scan(|product| product.price >= min_price && product.price <= max_price)
    }

    pub fn find_by_name_containing(&self, fragment: &str) -> Vec<Product> {
        self.scan(|product| product.name.contains(fragment))
    }

    fn scan<P: Fn(&Product) -> bool>(&self, predicate: P) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .rows
            .iter()
            .filter(|row| predicate(row.value()))
            .map(|row| row.value().clone())
            .collect();
        products.sort_by_key(|product| product.id);
        products
    }

    /// Evict every cached entry; stored rows are untouched.
    pub fn evict_all_regions(&self) {
        debug!("evicting all catalog cache regions");
        self.region.clear();
    }

    /// Second-level cache instrumentation counters.
    pub fn statistics(&self) -> CacheRegionStats {
        self.region.stats()
    }

    pub fn cached_entries(&self) -> usize {
        self.region.len()
    }
}
