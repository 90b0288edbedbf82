//! Directory engine (engine 2): `Supplier` rows behind a weak-reference
//! identity map.

use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

use super::EvictionPolicy;
use crate::domain::Supplier;

/// In-process store for `Supplier` rows with an identity-map cache.
///
/// The identity map holds weak references: an entry stays cached only while
/// some caller still holds the `Arc` handed out by a read. Reclamation is
/// therefore driven by reference lifetimes, not by TTL or capacity.
pub struct DirectoryEngine {
    rows: DashMap<i64, Supplier>,
    identity_map: DashMap<i64, Weak<Supplier>>,
    next_id: AtomicI64,
}

impl Default for DirectoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryEngine {
    pub fn new() -> Self {
        info!(policy = %EvictionPolicy::WeakReference, "directory engine initialized");
        Self {
            rows: DashMap::new(),
            identity_map: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn cache_policy(&self) -> EvictionPolicy {
        EvictionPolicy::WeakReference
    }

    /// Insert or update a row. Returns the shared instance now held by the
    /// identity map.
    pub fn persist(&self, mut supplier: Supplier) -> Arc<Supplier> {
        if supplier.id == 0 {
            supplier.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        }
        self.rows.insert(supplier.id, supplier.clone());
        let shared = Arc::new(supplier);
        self.identity_map.insert(shared.id, Arc::downgrade(&shared));
        shared
    }

    /// Load by primary key through the identity map.
    ///
    /// Repeated reads of the same key return the same shared instance as long
    /// as a strong reference to it is still alive somewhere.
    pub fn find_by_id(&self, id: i64) -> Option<Arc<Supplier>> {
        if let Some(entry) = self.identity_map.get(&id) {
            if let Some(live) = entry.value().upgrade() {
                return Some(live);
            }
        }
        let loaded = self.rows.get(&id).map(|row| Arc::new(row.value().clone()))?;
        self.identity_map.insert(id, Arc::downgrade(&loaded));
        Some(loaded)
    }

    pub fn list_all(&self) -> Vec<Supplier> {
        let mut suppliers: Vec<Supplier> =
            self.rows.iter().map(|row| row.value().clone()).collect();
        suppliers.sort_by_key(|supplier| supplier.id);
        suppliers
    }

    pub fn delete(&self, id: i64) -> bool {
        self.identity_map.remove(&id);
        self.rows.remove(&id).is_some()
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn find_by_city(&self, city: &str) -> Vec<Supplier> {
        self.scan(|supplier| supplier.city == city)
    }

    pub fn find_by_category(&self, category: &str) -> Vec<Supplier> {
        self.scan(|supplier| supplier.category == category)
    }

    pub fn find_by_name_containing(&self, fragment: &str) -> Vec<Supplier> {
        self.scan(|supplier| supplier.name.contains(fragment))
    }

    fn scan<P: Fn(&Supplier) -> bool>(&self, predicate: P) -> Vec<Supplier> {
        let mut suppliers: Vec<Supplier> = self
            .rows
            .iter()
            .filter(|row| predicate(row.value()))
            .map(|row| row.value().clone())
            .collect();
        suppliers.sort_by_key(|supplier| supplier.id);
        suppliers
    }

    /// Drop every identity-map entry; stored rows are untouched.
    pub fn reset_identity_map(&self) {
        let dropped = self.identity_map.len();
        self.identity_map.clear();
        debug!(dropped, "directory identity map reset");
    }

    /// Number of live cached entries.
    ///
    /// Dead weak references are pruned as a side effect, so the size reflects
    /// entries that are actually reachable.
    pub fn cache_size(&self) -> usize {
        self.identity_map
            .retain(|_, weak| weak.strong_count() > 0);
        self.identity_map.len()
    }
}
