//! Per-system operation counters, query timers, and cache gauges.
//!
//! Every metric carries a `system` tag (`catalog` or `directory`) so the two
//! engines can be compared side by side. Gauge reads go through
//! [`DualCacheManager`] and therefore never fail.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cache::DualCacheManager;

pub const SYSTEM_CATALOG: &str = "catalog";
pub const SYSTEM_DIRECTORY: &str = "directory";

/// Monotonic operation counter.
#[derive(Debug, Default)]
pub struct Counter {
    count: AtomicU64,
}

impl Counter {
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Accumulating query timer: total elapsed time plus sample count.
#[derive(Debug, Default)]
pub struct QueryTimer {
    total_micros: AtomicU64,
    samples: AtomicU64,
}

impl QueryTimer {
    pub fn start(&self) -> TimerSample<'_> {
        TimerSample {
            timer: self,
            started_at: Instant::now(),
        }
    }

    pub fn record(&self, elapsed: Duration) {
        self.total_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
        self.samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sample_count(&self) -> u64 {
        self.samples.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> Duration {
        Duration::from_micros(self.total_micros.load(Ordering::Relaxed))
    }

    pub fn mean(&self) -> Duration {
        let samples = self.samples.load(Ordering::Relaxed);
        if samples == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(self.total_micros.load(Ordering::Relaxed) / samples)
    }
}

/// Records into its timer on drop.
pub struct TimerSample<'a> {
    timer: &'a QueryTimer,
    started_at: Instant,
}

impl Drop for TimerSample<'_> {
    fn drop(&mut self) {
        self.timer.record(self.started_at.elapsed());
    }
}

/// Serializable view of every metric, tagged by system.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsExport {
    pub counters: Vec<MetricPoint>,
    pub timers: Vec<TimerPoint>,
    pub gauges: Vec<GaugePoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricPoint {
    pub name: &'static str,
    pub system: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerPoint {
    pub name: &'static str,
    pub system: &'static str,
    pub samples: u64,
    pub total_micros: u64,
    pub mean_micros: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugePoint {
    pub name: &'static str,
    pub system: &'static str,
    pub value: f64,
}

/// Central metrics facade for both engines.
pub struct MetricsService {
    cache_manager: Arc<DualCacheManager>,
    catalog_ops: Counter,
    directory_ops: Counter,
    catalog_query: QueryTimer,
    directory_query: QueryTimer,
}

impl MetricsService {
    pub fn new(cache_manager: Arc<DualCacheManager>) -> Self {
        Self {
            cache_manager,
            catalog_ops: Counter::default(),
            directory_ops: Counter::default(),
            catalog_query: QueryTimer::default(),
            directory_query: QueryTimer::default(),
        }
    }

    pub fn record_catalog_operation(&self) {
        self.catalog_ops.increment();
    }

    pub fn record_directory_operation(&self) {
        self.directory_ops.increment();
    }

    /// Time a catalog query; the sample records when the guard drops.
    pub fn time_catalog_query(&self) -> TimerSample<'_> {
        self.catalog_query.start()
    }

    pub fn time_directory_query(&self) -> TimerSample<'_> {
        self.directory_query.start()
    }

    /// Catalog second-level cache hit ratio gauge. Reads through the cache
    /// manager and never fails.
    pub fn cache_hit_ratio(&self) -> f64 {
        self.cache_manager.statistics().catalog_hit_ratio()
    }

    /// Directory identity-map size gauge.
    pub fn cache_size(&self) -> usize {
        self.cache_manager.statistics().directory_cache_size
    }

    pub fn export(&self) -> MetricsExport {
        let stats = self.cache_manager.statistics();
        debug!(%stats, "exporting metrics snapshot");
        MetricsExport {
            counters: vec![
                MetricPoint {
                    name: "operations",
                    system: SYSTEM_CATALOG,
                    count: self.catalog_ops.count(),
                },
                MetricPoint {
                    name: "operations",
                    system: SYSTEM_DIRECTORY,
                    count: self.directory_ops.count(),
                },
            ],
            timers: vec![
                TimerPoint {
                    name: "query_duration",
                    system: SYSTEM_CATALOG,
                    samples: self.catalog_query.sample_count(),
                    total_micros: self.catalog_query.total().as_micros() as u64,
                    mean_micros: self.catalog_query.mean().as_micros() as u64,
                },
                TimerPoint {
                    name: "query_duration",
                    system: SYSTEM_DIRECTORY,
                    samples: self.directory_query.sample_count(),
                    total_micros: self.directory_query.total().as_micros() as u64,
                    mean_micros: self.directory_query.mean().as_micros() as u64,
                },
            ],
            gauges: vec![
                GaugePoint {
                    name: "cache_hit_ratio",
                    system: SYSTEM_CATALOG,
                    value: stats.catalog_hit_ratio(),
                },
                GaugePoint {
                    name: "cache_size",
                    system: SYSTEM_DIRECTORY,
                    value: stats.directory_cache_size as f64,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MetricsService {
        MetricsService::new(Arc::new(DualCacheManager::detached()))
    }

    #[test]
    fn counters_accumulate_per_system() {
        let metrics = service();
        metrics.record_catalog_operation();
        metrics.record_catalog_operation();
        metrics.record_directory_operation();

        let export = metrics.export();
        let catalog = export
            .counters
            .iter()
            .find(|point| point.system == SYSTEM_CATALOG)
            .unwrap();
        let directory = export
            .counters
            .iter()
            .find(|point| point.system == SYSTEM_DIRECTORY)
            .unwrap();
        assert_eq!(catalog.count, 2);
        assert_eq!(directory.count, 1);
    }

    #[test]
    fn timer_records_on_drop() {
        let metrics = service();
        {
            let _sample = metrics.time_catalog_query();
            std::thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(metrics.catalog_query.sample_count(), 1);
        assert!(metrics.catalog_query.total() >= Duration::from_millis(2));
    }

    #[test]
    fn mean_of_no_samples_is_zero() {
        let timer = QueryTimer::default();
        assert_eq!(timer.mean(), Duration::ZERO);
    }

    #[test]
    fn gauges_never_fail_without_engines() {
        let metrics = service();
        assert_eq!(metrics.cache_hit_ratio(), 0.0);
        assert_eq!(metrics.cache_size(), 0);
    }

    #[test]
    fn export_serializes_to_json() {
        let metrics = service();
        metrics.record_catalog_operation();
        let json = serde_json::to_string(&metrics.export()).unwrap();
        assert!(json.contains("\"cache_hit_ratio\""));
        assert!(json.contains("\"catalog\""));
    }
}
