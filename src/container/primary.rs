//! 主容器
//!
//! 进程级应用单例容器：注册发生在启动前，`start()` 之后注册表只读。
//! 单例默认惰性构建（首次访问时记忆化），标记为急切的服务在
//! `start()` 时按注册顺序构建，对应声明式依赖图的叶子先行原则。

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::registry::ServiceRegistry;
use super::{BindingKey, ContainerError, ContainerHandle};

/// 主容器
///
/// 克隆得到的是同一个容器的轻量引用。
#[derive(Clone)]
pub struct PrimaryContainer {
    handle: ContainerHandle,
    registry: ServiceRegistry,
    started: Arc<AtomicBool>,
    eager: Arc<Mutex<Vec<BindingKey>>>,
}

impl PrimaryContainer {
    pub fn new(name: &'static str) -> Self {
        let handle = ContainerHandle::new(name);
        Self {
            registry: ServiceRegistry::new(handle.id, name),
            handle,
            started: Arc::new(AtomicBool::new(false)),
            eager: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn handle(&self) -> ContainerHandle {
        self.handle
    }

    pub fn name(&self) -> &'static str {
        self.handle.name
    }

    /// 注册应用级单例（惰性构建）
    pub fn register_singleton<T, F>(&self, factory: F) -> Result<(), ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceRegistry) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.ensure_not_started()?;
        self.registry.register(factory)
    }

    /// 注册产出共享实例的单例工厂
    ///
    /// 工厂返回 `Arc<T>` 并被原样缓存；跨容器生产方向依赖这一点
    /// 来保证两个容器共享同一个实例。
    pub fn register_shared_singleton<T, F>(&self, factory: F) -> Result<(), ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceRegistry) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        self.ensure_not_started()?;
        self.registry.register_shared(factory)
    }

    /// 注册急切单例：`start()` 时立即构建
    pub fn register_eager_singleton<T, F>(&self, factory: F) -> Result<(), ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceRegistry) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.register_singleton(factory)?;
        self.eager.lock().push(BindingKey::of::<T>());
        Ok(())
    }

    fn ensure_not_started(&self) -> Result<(), ContainerError> {
        if self.started.load(Ordering::Acquire) {
            return Err(ContainerError::AlreadyStarted {
                container: self.handle.name,
            });
        }
        Ok(())
    }

    /// 启动容器
    ///
    /// 封存注册表并按注册顺序构建急切单例。重复调用是无害的空操作。
    pub fn start(&self) -> Result<(), ContainerError> {
        if self.started.swap(true, Ordering::AcqRel) {
            warn!(
                container = self.handle.name,
                "container already started, ignoring"
            );
            return Ok(());
        }

        let eager = self.eager.lock().clone();
        for key in eager {
            debug!(
                container = self.handle.name,
                service = key.type_name,
                "eagerly constructing"
            );
            self.registry.resolve_erased(key)?;
        }

        info!(
            container = self.handle.name,
            services = self.registry.registered_keys().len(),
            "primary container started"
        );
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// 实例查找能力之一：类型是否有活跃绑定
    ///
    /// 容器未启动时一律不可用——桥接解析绝不触发容器启动。
    pub fn is_available<T: Send + Sync + 'static>(&self) -> bool {
        self.is_started() && self.registry.contains::<T>()
    }

    /// 实例查找能力之二：取得（必要时构建）单例
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ContainerError> {
        if !self.is_started() {
            return Err(ContainerError::NotStarted {
                container: self.handle.name,
            });
        }
        self.registry.resolve::<T>()
    }

    /// 容器统计信息
    pub fn stats(&self) -> super::ContainerStats {
        self.registry.stats()
    }
}
