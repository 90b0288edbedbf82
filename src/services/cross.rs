//! Secondary-side service consuming primary-managed catalog services over
//! the bridge.

use std::sync::Arc;
use tracing::debug;

use super::product::{ProductRepository, ProductService};
use crate::domain::Product;

/// Catalog access from inside the secondary injector.
///
/// Both dependencies are bridged: the instances are the very singletons the
/// primary container manages, so writes made here are immediately visible to
/// primary-side callers.
pub struct CrossProductService {
    product_service: Arc<ProductService>,
    product_repository: Arc<ProductRepository>,
}

impl CrossProductService {
    pub fn new(
        product_service: Arc<ProductService>,
        product_repository: Arc<ProductRepository>,
    ) -> Self {
        Self {
            product_service,
            product_repository,
        }
    }

    pub fn create_product(&self, product: Product) -> Product {
        let saved = self.product_service.create(product);
        debug!(id = saved.id, "product created across the bridge");
        saved
    }

    pub fn get_product(&self, id: i64) -> Option<Product> {
        self.product_service.get(id)
    }

    pub fn list_products(&self) -> Vec<Product> {
        self.product_service.list()
    }

    pub fn update_product(&self, product: Product) -> Option<Product> {
        self.product_service.update(product)
    }

    pub fn delete_product(&self, id: i64) -> bool {
        self.product_service.remove(id)
    }

    pub fn products_in_category(&self, category: &str) -> Vec<Product> {
        self.product_service.by_category(category)
    }

    pub fn products_in_price_range(&self, min_price: f64, max_price: f64) -> Vec<Product> {
        self.product_service.by_price_range(min_price, max_price)
    }

    /// One-line inventory summary straight from the repository.
    pub fn summary(&self) -> String {
        let count = self.product_repository.count();
        let total: f64 = self
            .product_repository
            .find_all()
            .iter()
            .map(|product| product.price)
            .sum();
        format!("{} products, total value {:.2}", count, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DualCacheManager;
    use crate::config::CatalogCacheConfig;
    use crate::engine::catalog::CatalogEngine;
    use crate::metrics::MetricsService;

    fn service() -> CrossProductService {
        let engine = Arc::new(CatalogEngine::new(&CatalogCacheConfig::default()));
        let repository = Arc::new(ProductRepository::new(engine));
        let metrics = Arc::new(MetricsService::new(Arc::new(DualCacheManager::detached())));
        let product_service = Arc::new(ProductService::new(repository.clone(), metrics));
        CrossProductService::new(product_service, repository)
    }

    #[test]
    fn crud_pass_through() {
        let cross = service();
        let created = cross.create_product(Product::new("mug", "ceramic", 8.0, "kitchen"));

        assert_eq!(cross.get_product(created.id).unwrap(), created);
        assert_eq!(cross.products_in_category("kitchen").len(), 1);
        assert!(cross.delete_product(created.id));
        assert!(cross.list_products().is_empty());
    }

    #[test]
    fn price_range_lookup_crosses_the_bridge() {
        let cross = service();
        cross.create_product(Product::new("mug", "ceramic", 8.0, "kitchen"));
        cross.create_product(Product::new("pan", "steel", 25.0, "kitchen"));

        assert_eq!(cross.products_in_price_range(10.0, 30.0).len(), 1);
        assert_eq!(cross.products_in_price_range(1.0, 30.0).len(), 2);
    }

    #[test]
    fn summary_reports_count_and_value() {
        let cross = service();
        cross.create_product(Product::new("mug", "ceramic", 8.0, "kitchen"));
        cross.create_product(Product::new("pan", "steel", 12.0, "kitchen"));

        assert_eq!(cross.summary(), "2 products, total value 20.00");
    }
}
