//! 跨容器依赖解析桥
//!
//! 让一个容器管理的类型可以作为依赖出现在另一个容器的对象图中，
//! 双方都不感知对方的内部装配：
//!
//! - 正向（主 → 次）：`bind_bridge` 在次级模块中安装桥接提供者，
//!   解析时回查主容器的活跃实例注册表
//! - 反向（次 → 主）：`expose_to_primary` 在主容器注册一个工厂，
//!   首次请求时向 `InjectorManager` 持有的注入器索取实例并记忆化
//!
//! 解析始终是同步单次尝试：依赖可用性在单次解析内不会变化，
//! 失败即为装配缺陷，不重试、不降级、绝不返回半初始化对象。

use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::container::{
    Binder, BindingKey, ContainerError, ContainerHandle, Injector, Module, PrimaryContainer,
};

/// 一次跨容器解析请求
///
/// 每次查找临时构造，仅用于诊断输出，从不持久化。
#[derive(Debug, Clone, Copy)]
pub struct ResolutionRequest {
    /// 发起请求的容器
    pub source: ContainerHandle,
    /// 被查询的容器
    pub target: ContainerHandle,
    /// 请求的绑定键
    pub key: BindingKey,
}

impl ResolutionRequest {
    pub fn new(source: ContainerHandle, target: ContainerHandle, key: BindingKey) -> Self {
        Self { source, target, key }
    }
}

impl fmt::Display for ResolutionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.source, self.target, self.key)
    }
}

/// 在次级模块中安装一个桥接提供者
///
/// 次级容器解析 `T` 时回查主容器：实例可用则共享同一个 `Arc`，
/// 不可用则以 `UnresolvedDependency` 失败——这是请求方对象的
/// 致命构建错误。前置条件：主容器必须已启动，桥接绝不触发启动。
pub fn bind_bridge<T>(
    binder: &mut Binder<'_>,
    primary: &PrimaryContainer,
) -> Result<(), ContainerError>
where
    T: Send + Sync + 'static,
{
    let source = binder.handle();
    let primary = primary.clone();

    binder.bind_shared::<T, _>(move |_| {
        let key = BindingKey::of::<T>();
        let request = ResolutionRequest::new(source, primary.handle(), key);
        debug!(%request, "resolving bridged dependency");

        if !primary.is_started() {
            return Err(ContainerError::NotStarted {
                container: primary.name(),
            });
        }
        if !primary.is_available::<T>() {
            return Err(ContainerError::UnresolvedDependency {
                key,
                source: source.name,
                target: primary.name(),
            });
        }
        primary.get::<T>()
    })
}

/// 注入器管理器
///
/// 主容器中的单例，负责持有次级注入器的生命周期；
/// 反向生产方向通过它访问次级容器。
pub struct InjectorManager {
    injector: Injector,
}

impl InjectorManager {
    /// 从模块初始化次级注入器
    pub fn initialize(module: &dyn Module) -> Result<Self, ContainerError> {
        info!(module = module.name(), "initializing secondary injector");
        match Injector::from_module(module) {
            Ok(injector) => {
                info!("secondary injector successfully initialized");
                Ok(Self { injector })
            }
            Err(err) => {
                error!(error = %err, "failed to initialize secondary injector");
                Err(err)
            }
        }
    }

    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    /// 从次级注入器获取一个实例
    pub fn instance<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ContainerError> {
        self.injector.get::<T>()
    }
}

/// 反向生产：把次级容器管理的 `T` 暴露给主容器的对象图
///
/// 主容器首次请求 `T` 时向注入器索取实例，并作为主容器级单例
/// 记忆化——记忆化单元按（容器, 类型）隔离，两个容器各自持有
/// 指向同一实例的缓存，首次访问不会在共享作用域上死锁。
pub fn expose_to_primary<T>(primary: &PrimaryContainer) -> Result<(), ContainerError>
where
    T: Send + Sync + 'static,
{
    primary.register_shared_singleton::<T, _>(|registry| {
        let manager = registry.resolve::<InjectorManager>()?;
        debug!(
            service = std::any::type_name::<T>(),
            "producing secondary-managed instance for the primary graph"
        );
        manager.instance::<T>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NativeService {
        id: u32,
    }

    struct SecondaryOnlyService;

    struct BridgedModule {
        primary: PrimaryContainer,
    }

    impl Module for BridgedModule {
        fn name(&self) -> &str {
            "bridged"
        }

        fn configure(&self, binder: &mut Binder<'_>) -> Result<(), ContainerError> {
            bind_bridge::<NativeService>(binder, &self.primary)?;
            bind_bridge::<SecondaryOnlyService>(binder, &self.primary)
        }
    }

    #[test]
    fn bridged_resolution_shares_the_primary_instance() {
        let primary = PrimaryContainer::new("primary");
        primary
            .register_singleton(|_| Ok(NativeService { id: 11 }))
            .unwrap();
        primary.start().unwrap();

        let injector = Injector::from_module(&BridgedModule {
            primary: primary.clone(),
        })
        .unwrap();

        let via_bridge = injector.get::<NativeService>().unwrap();
        let native = primary.get::<NativeService>().unwrap();
        assert_eq!(via_bridge.id, 11);
        assert!(Arc::ptr_eq(&via_bridge, &native));
    }

    #[test]
    fn unavailable_dependency_is_fatal() {
        let primary = PrimaryContainer::new("primary");
        primary
            .register_singleton(|_| Ok(NativeService { id: 1 }))
            .unwrap();
        primary.start().unwrap();

        let injector = Injector::from_module(&BridgedModule {
            primary: primary.clone(),
        })
        .unwrap();

        // SecondaryOnlyService 在主容器中没有活跃绑定
        let result = injector.get::<SecondaryOnlyService>();
        assert!(matches!(
            result,
            Err(ContainerError::UnresolvedDependency { .. })
        ));
    }

    #[test]
    fn bridge_never_triggers_primary_startup() {
        let primary = PrimaryContainer::new("primary");
        primary
            .register_singleton(|_| Ok(NativeService { id: 1 }))
            .unwrap();
        // 注意：未调用 start()

        let injector = Injector::from_module(&BridgedModule {
            primary: primary.clone(),
        })
        .unwrap();

        let result = injector.get::<NativeService>();
        assert!(matches!(result, Err(ContainerError::NotStarted { .. })));
        assert!(!primary.is_started());
    }
}
