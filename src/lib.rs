pub mod app;
pub mod bridge;
pub mod cache;
pub mod config;
pub mod container;
pub mod domain;
pub mod engine;
pub mod metrics;
pub mod services;

// Re-export commonly used items for convenience
pub use app::{bootstrap, App};
pub use cache::DualCacheManager;
pub use config::AppConfig;
pub use container::{ContainerError, Injector, PrimaryContainer};
