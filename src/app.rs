//! 应用装配
//!
//! 把两个容器、两个引擎和所有服务接线成一个可运行的应用。
//! 注册顺序遵循依赖图的叶子先行原则:引擎 → 仓库 → 缓存管理器 →
//! 指标 → 服务 → 次级注入器 → 反向生产 → 启动。

use std::sync::Arc;
use tracing::info;

use crate::bridge::{bind_bridge, expose_to_primary, InjectorManager};
use crate::cache::DualCacheManager;
use crate::config::AppConfig;
use crate::container::{Binder, ContainerError, Module, PrimaryContainer};
use crate::engine::catalog::CatalogEngine;
use crate::engine::directory::DirectoryEngine;
use crate::metrics::MetricsService;
use crate::services::{
    Calculator, CrossProductService, HybridPricingService, ProductRepository, ProductService,
    SupplierRepository, SupplierService,
};

/// 次级注入器的绑定模块
///
/// 桥接主容器的商品服务与仓库,并绑定次级容器自有的计算器和
/// 跨容器商品服务。
pub struct IntegrationModule {
    primary: PrimaryContainer,
}

impl IntegrationModule {
    pub fn new(primary: PrimaryContainer) -> Self {
        Self { primary }
    }
}

impl Module for IntegrationModule {
    fn name(&self) -> &str {
        "integration"
    }

    fn configure(&self, binder: &mut Binder<'_>) -> Result<(), ContainerError> {
        bind_bridge::<ProductService>(binder, &self.primary)?;
        bind_bridge::<ProductRepository>(binder, &self.primary)?;
        binder.bind(|_| Ok(Calculator::new()))?;
        binder.bind(|registry| {
            Ok(CrossProductService::new(
                registry.resolve::<ProductService>()?,
                registry.resolve::<ProductRepository>()?,
            ))
        })
    }
}

/// 装配完成的应用
pub struct App {
    primary: PrimaryContainer,
}

impl App {
    pub fn primary(&self) -> &PrimaryContainer {
        &self.primary
    }

    pub fn cache_manager(&self) -> Result<Arc<DualCacheManager>, ContainerError> {
        self.primary.get::<DualCacheManager>()
    }

    pub fn metrics(&self) -> Result<Arc<MetricsService>, ContainerError> {
        self.primary.get::<MetricsService>()
    }

    pub fn product_service(&self) -> Result<Arc<ProductService>, ContainerError> {
        self.primary.get::<ProductService>()
    }

    pub fn supplier_service(&self) -> Result<Arc<SupplierService>, ContainerError> {
        self.primary.get::<SupplierService>()
    }

    pub fn pricing_service(&self) -> Result<Arc<HybridPricingService>, ContainerError> {
        self.primary.get::<HybridPricingService>()
    }

    /// 次级容器中的跨容器商品服务
    pub fn cross_product_service(&self) -> Result<Arc<CrossProductService>, ContainerError> {
        self.primary
            .get::<InjectorManager>()?
            .instance::<CrossProductService>()
    }
}

/// 装配并启动应用
pub fn bootstrap(config: &AppConfig) -> Result<App, ContainerError> {
    let primary = PrimaryContainer::new("primary");

    // 引擎
    let catalog_config = config.cache.catalog.clone();
    primary.register_shared_singleton(move |_| {
        Ok(Arc::new(CatalogEngine::new(&catalog_config)))
    })?;
    primary.register_shared_singleton(|_| Ok(Arc::new(DirectoryEngine::new())))?;

    // 仓库
    primary.register_singleton(|registry| {
        Ok(ProductRepository::new(registry.resolve::<CatalogEngine>()?))
    })?;
    primary.register_singleton(|registry| {
        Ok(SupplierRepository::new(
            registry.resolve::<DirectoryEngine>()?,
        ))
    })?;

    // 缓存管理器:急切构建,启动即可接受运维调用
    primary.register_eager_singleton(|registry| {
        Ok(DualCacheManager::new(
            registry.resolve::<CatalogEngine>()?,
            registry.resolve::<DirectoryEngine>()?,
        ))
    })?;

    // 指标
    primary.register_singleton(|registry| {
        Ok(MetricsService::new(registry.resolve::<DualCacheManager>()?))
    })?;

    // 业务服务
    primary.register_singleton(|registry| {
        Ok(ProductService::new(
            registry.resolve::<ProductRepository>()?,
            registry.resolve::<MetricsService>()?,
        ))
    })?;
    primary.register_singleton(|registry| {
        Ok(SupplierService::new(
            registry.resolve::<SupplierRepository>()?,
            registry.resolve::<MetricsService>()?,
        ))
    })?;

    // 次级注入器(惰性初始化,持有模块)
    let module = IntegrationModule::new(primary.clone());
    primary.register_singleton(move |_| InjectorManager::initialize(&module))?;

    // 反向生产:次级容器管理的计算器进入主容器对象图
    expose_to_primary::<Calculator>(&primary)?;

    primary.register_singleton(|registry| {
        Ok(HybridPricingService::new(
            registry.resolve::<Calculator>()?,
            registry.resolve::<ProductRepository>()?,
        ))
    })?;

    primary.start()?;
    info!("application assembled and started");
    Ok(App { primary })
}
