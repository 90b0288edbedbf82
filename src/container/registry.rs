//! 类型安全的服务注册表
//!
//! 两个容器共用的核心机制：
//! - 注册表只在启动阶段写入，稳态下只读
//! - 单例记忆化使用每（容器, 类型）一个互斥保护的 construct-once 单元，
//!   并发首次访问时保证至多构建一次
//! - 线程本地解析栈用于在跨容器构建链上检测循环依赖，而不是死锁

use dashmap::DashMap;
use parking_lot::Mutex;
use std::any::Any;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use super::{BindingKey, ContainerError};

/// 类型擦除后的共享实例
pub(crate) type SharedInstance = Arc<dyn Any + Send + Sync>;

type SharedFactory =
    Box<dyn Fn(&ServiceRegistry) -> Result<SharedInstance, ContainerError> + Send + Sync>;

/// 注册信息
struct Registration {
    create: SharedFactory,
}

/// 单例的 construct-once 单元
///
/// 构建期间持有锁，同类型的并发解析方阻塞等待同一个实例；
/// 不同类型使用不同单元，嵌套解析不会相互阻塞。
#[derive(Default)]
struct OnceSlot {
    slot: Mutex<Option<SharedInstance>>,
}

/// 内部统计信息（原子计数器）
#[derive(Default)]
struct InnerStats {
    total_resolutions: AtomicUsize,
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
}

/// 注册表统计快照
#[derive(Debug, Clone)]
pub struct ContainerStats {
    pub total_resolutions: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub registered_services: usize,
    pub active_singletons: usize,
}

impl ContainerStats {
    /// 单例缓存命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

thread_local! {
    /// 当前线程的解析栈，条目为（容器ID, 绑定键）
    ///
    /// 记忆化按容器隔离，因此栈条目也必须带上容器ID，
    /// 跨桥的构建链才能被完整追踪。
    static RESOLUTION_STACK: RefCell<Vec<(Uuid, BindingKey)>> = const { RefCell::new(Vec::new()) };
}

/// 服务注册表
///
/// 内部均为 `Arc` 共享状态，克隆开销低。
#[derive(Clone)]
pub struct ServiceRegistry {
    id: Uuid,
    name: &'static str,
    factories: Arc<DashMap<std::any::TypeId, Registration>>,
    cells: Arc<DashMap<std::any::TypeId, Arc<OnceSlot>>>,
    order: Arc<Mutex<Vec<BindingKey>>>,
    stats: Arc<InnerStats>,
}

impl ServiceRegistry {
    pub fn new(id: Uuid, name: &'static str) -> Self {
        Self {
            id,
            name,
            factories: Arc::new(DashMap::new()),
            cells: Arc::new(DashMap::new()),
            order: Arc::new(Mutex::new(Vec::new())),
            stats: Arc::new(InnerStats::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 注册服务工厂
    ///
    /// 同一个键重复注册直接报错，而不是静默覆盖。
    pub fn register<T, F>(&self, factory: F) -> Result<(), ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceRegistry) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.register_shared::<T, _>(move |registry| Ok(Arc::new(factory(registry)?)))
    }

    /// 注册返回共享实例的工厂
    ///
    /// 工厂直接产出 `Arc<T>`；用于跨容器生产场景——
    /// 另一个容器已持有实例时，两边必须共享同一个 `Arc`。
    pub fn register_shared<T, F>(&self, factory: F) -> Result<(), ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceRegistry) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        let key = BindingKey::of::<T>();
        match self.factories.entry(key.type_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(ContainerError::DuplicateBinding {
                key,
                container: self.name,
            }),
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(Registration {
                    create: Box::new(move |registry| {
                        factory(registry).map(|instance| instance as SharedInstance)
                    }),
                });
                self.order.lock().push(key);
                Ok(())
            }
        }
    }

    /// 检查服务是否已注册
    pub fn contains<T: 'static>(&self) -> bool {
        self.factories.contains_key(&std::any::TypeId::of::<T>())
    }

    /// 已注册的绑定键（注册顺序）
    pub fn registered_keys(&self) -> Vec<BindingKey> {
        self.order.lock().clone()
    }

    /// 解析单例服务
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ContainerError> {
        let key = BindingKey::of::<T>();
        let shared = self.resolve_erased(key)?;
        shared
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeCastFailed {
                expected: key.type_name,
            })
    }

    /// 类型擦除版本的解析，供急切构建复用
    pub(crate) fn resolve_erased(&self, key: BindingKey) -> Result<SharedInstance, ContainerError> {
        self.stats.total_resolutions.fetch_add(1, Ordering::Relaxed);

        let cell = self
            .cells
            .entry(key.type_id)
            .or_insert_with(|| Arc::new(OnceSlot::default()))
            .clone();

        // 快路径：单例已存在
        if let Some(existing) = cell.slot.lock().clone() {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(existing);
        }
        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);

        self.push_frame(key)?;
        let result = self.construct_in_cell(&cell, key);
        self.pop_frame();
        result
    }

    fn construct_in_cell(
        &self,
        cell: &OnceSlot,
        key: BindingKey,
    ) -> Result<SharedInstance, ContainerError> {
        let mut slot = cell.slot.lock();
        // 双重检查：竞争失败方直接复用胜者构建的实例
        if let Some(existing) = slot.clone() {
            return Ok(existing);
        }

        let registration =
            self.factories
                .get(&key.type_id)
                .ok_or_else(|| ContainerError::ServiceNotRegistered {
                    key,
                    container: self.name,
                    available: self.order.lock().iter().map(|k| k.type_name).collect(),
                })?;

        let instance = (registration.create)(self)?;
        *slot = Some(instance.clone());
        Ok(instance)
    }

    /// 将当前解析压入线程本地栈；检测到环则报错
    fn push_frame(&self, key: BindingKey) -> Result<(), ContainerError> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|(id, k)| *id == self.id && *k == key) {
                let mut chain: Vec<&'static str> =
                    stack.iter().map(|(_, k)| k.type_name).collect();
                chain.push(key.type_name);
                return Err(ContainerError::CircularDependency { chain });
            }
            stack.push((self.id, key));
            Ok(())
        })
    }

    fn pop_frame(&self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }

    /// 获取统计快照
    pub fn stats(&self) -> ContainerStats {
        let active_singletons = self
            .cells
            .iter()
            .filter(|cell| cell.value().slot.lock().is_some())
            .count();
        ContainerStats {
            total_resolutions: self.stats.total_resolutions.load(Ordering::Relaxed),
            cache_hits: self.stats.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.stats.cache_misses.load(Ordering::Relaxed),
            registered_services: self.factories.len(),
            active_singletons,
        }
    }
}
