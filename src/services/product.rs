//! Catalog-side repository and service (primary container).

use std::sync::Arc;
use tracing::debug;

use crate::domain::Product;
use crate::engine::catalog::CatalogEngine;
use crate::engine::CacheRegionStats;
use crate::metrics::MetricsService;

/// Thin data-access layer over the catalog engine.
pub struct ProductRepository {
    engine: Arc<CatalogEngine>,
}

impl ProductRepository {
    pub fn new(engine: Arc<CatalogEngine>) -> Self {
        Self { engine }
    }

    pub fn save(&self, product: Product) -> Product {
        self.engine.persist(product)
    }

    pub fn find_by_id(&self, id: i64) -> Option<Product> {
        self.engine.find_by_id(id)
    }

    pub fn find_all(&self) -> Vec<Product> {
        self.engine.list_all()
    }

    pub fn delete(&self, id: i64) -> bool {
        self.engine.delete(id)
    }

    pub fn count(&self) -> usize {
        self.engine.count()
    }

    pub fn find_by_category(&self, category: &str) -> Vec<Product> {
        self.engine.find_by_category(category)
    }

    pub fn find_by_price_range(&self, min_price: f64, max_price: f64) -> Vec<Product> {
        self.engine.find_by_price_range(min_price, max_price)
    }

    pub fn find_by_name_containing(&self, fragment: &str) -> Vec<Product> {
        self.engine.find_by_name_containing(fragment)
    }

    pub fn cache_statistics(&self) -> CacheRegionStats {
        self.engine.statistics()
    }
}

/// Catalog service: repository access plus per-operation instrumentation.
pub struct ProductService {
    repository: Arc<ProductRepository>,
    metrics: Arc<MetricsService>,
}

impl ProductService {
    pub fn new(repository: Arc<ProductRepository>, metrics: Arc<MetricsService>) -> Self {
        Self {
            repository,
            metrics,
        }
    }

    pub fn create(&self, product: Product) -> Product {
        self.metrics.record_catalog_operation();
        let saved = self.repository.save(product);
        debug!(id = saved.id, name = %saved.name, "product created");
        saved
    }

    pub fn get(&self, id: i64) -> Option<Product> {
        self.metrics.record_catalog_operation();
        let _timer = self.metrics.time_catalog_query();
        self.repository.find_by_id(id)
    }

    pub fn list(&self) -> Vec<Product> {
        self.metrics.record_catalog_operation();
        let _timer = self.metrics.time_catalog_query();
        self.repository.find_all()
    }

    pub fn update(&self, product: Product) -> Option<Product> {
        self.metrics.record_catalog_operation();
        if product.id == 0 || self.repository.find_by_id(product.id).is_none() {
            return None;
        }
        Some(self.repository.save(product))
    }

    pub fn remove(&self, id: i64) -> bool {
        self.metrics.record_catalog_operation();
        self.repository.delete(id)
    }

    pub fn count(&self) -> usize {
        self.repository.count()
    }

    pub fn by_category(&self, category: &str) -> Vec<Product> {
        self.metrics.record_catalog_operation();
        let _timer = self.metrics.time_catalog_query();
        self.repository.find_by_category(category)
    }

    pub fn by_price_range(&self, min_price: f64, max_price: f64) -> Vec<Product> {
        self.metrics.record_catalog_operation();
        let _timer = self.metrics.time_catalog_query();
        self.repository.find_by_price_range(min_price, max_price)
    }

    pub fn search(&self, fragment: &str) -> Vec<Product> {
        self.metrics.record_catalog_operation();
        let _timer = self.metrics.time_catalog_query();
        self.repository.find_by_name_containing(fragment)
    }
}
