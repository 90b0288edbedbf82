//! Directory-side repository and service (primary container).

use std::sync::Arc;
use tracing::debug;

use crate::domain::Supplier;
use crate::engine::directory::DirectoryEngine;
use crate::metrics::MetricsService;

/// Thin data-access layer over the directory engine.
///
/// Reads hand out the engine's shared instances, so two callers fetching the
/// same supplier hold the same allocation while either keeps it alive.
pub struct SupplierRepository {
    engine: Arc<DirectoryEngine>,
}

impl SupplierRepository {
    pub fn new(engine: Arc<DirectoryEngine>) -> Self {
        Self { engine }
    }

    pub fn save(&self, supplier: Supplier) -> Arc<Supplier> {
        self.engine.persist(supplier)
    }

    pub fn find_by_id(&self, id: i64) -> Option<Arc<Supplier>> {
        self.engine.find_by_id(id)
    }

    pub fn find_all(&self) -> Vec<Supplier> {
        self.engine.list_all()
    }

    pub fn delete(&self, id: i64) -> bool {
        self.engine.delete(id)
    }

    pub fn count(&self) -> usize {
        self.engine.count()
    }

    pub fn find_by_city(&self, city: &str) -> Vec<Supplier> {
        self.engine.find_by_city(city)
    }

    pub fn find_by_category(&self, category: &str) -> Vec<Supplier> {
        self.engine.find_by_category(category)
    }

    pub fn find_by_name_containing(&self, fragment: &str) -> Vec<Supplier> {
        self.engine.find_by_name_containing(fragment)
    }

    pub fn cached_entries(&self) -> usize {
        self.engine.cache_size()
    }
}

/// Directory service: repository access plus per-operation instrumentation.
pub struct SupplierService {
    repository: Arc<SupplierRepository>,
    metrics: Arc<MetricsService>,
}

impl SupplierService {
    pub fn new(repository: Arc<SupplierRepository>, metrics: Arc<MetricsService>) -> Self {
        Self {
            repository,
            metrics,
        }
    }

    pub fn create(&self, supplier: Supplier) -> Arc<Supplier> {
        self.metrics.record_directory_operation();
        let saved = self.repository.save(supplier);
        debug!(id = saved.id, name = %saved.name, "supplier created");
        saved
    }

    pub fn get(&self, id: i64) -> Option<Arc<Supplier>> {
        self.metrics.record_directory_operation();
        let _timer = self.metrics.time_directory_query();
        self.repository.find_by_id(id)
    }

    pub fn list(&self) -> Vec<Supplier> {
        self.metrics.record_directory_operation();
        let _timer = self.metrics.time_directory_query();
        self.repository.find_all()
    }

    pub fn remove(&self, id: i64) -> bool {
        self.metrics.record_directory_operation();
        self.repository.delete(id)
    }

    pub fn count(&self) -> usize {
        self.repository.count()
    }

    pub fn by_city(&self, city: &str) -> Vec<Supplier> {
        self.metrics.record_directory_operation();
        let _timer = self.metrics.time_directory_query();
        self.repository.find_by_city(city)
    }

    pub fn by_category(&self, category: &str) -> Vec<Supplier> {
        self.metrics.record_directory_operation();
        let _timer = self.metrics.time_directory_query();
        self.repository.find_by_category(category)
    }

    pub fn search(&self, fragment: &str) -> Vec<Supplier> {
        self.metrics.record_directory_operation();
        let _timer = self.metrics.time_directory_query();
        self.repository.find_by_name_containing(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DualCacheManager;

    fn service() -> SupplierService {
        let engine = Arc::new(DirectoryEngine::new());
        let repository = Arc::new(SupplierRepository::new(engine));
        let metrics = Arc::new(MetricsService::new(Arc::new(DualCacheManager::detached())));
        SupplierService::new(repository, metrics)
    }

    #[test]
    fn create_then_get_shares_the_instance() {
        let service = service();
        let created = service.create(Supplier::new("acme", "1 main", "lyon", "555", "tools"));

        let fetched = service.get(created.id).unwrap();
        assert!(Arc::ptr_eq(&created, &fetched));
    }

    #[test]
    fn city_lookup_and_removal() {
        let service = service();
        let created = service.create(Supplier::new("acme", "1 main", "lyon", "555", "tools"));
        service.create(Supplier::new("bolt", "2 side", "nice", "556", "tools"));

        assert_eq!(service.by_city("lyon").len(), 1);
        assert!(service.remove(created.id));
        assert_eq!(service.count(), 1);
    }

    #[test]
    fn name_search_matches_fragments() {
        let service = service();
        service.create(Supplier::new("acme tools", "1 main", "lyon", "555", "tools"));
        service.create(Supplier::new("bolt depot", "2 side", "nice", "556", "hardware"));

        assert_eq!(service.search("acme").len(), 1);
        assert_eq!(service.search("o").len(), 2);
        assert!(service.search("zzz").is_empty());
    }
}
