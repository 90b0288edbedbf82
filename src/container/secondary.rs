//! 次级注入器
//!
//! 从显式模块构建的独立注入器：模块在 `configure` 中声明全部绑定，
//! 之后注入器按需惰性构建单例。与主容器不共享任何注册表或
//! 记忆化状态。

use std::sync::Arc;
use tracing::info;

use super::registry::ServiceRegistry;
use super::{ContainerError, ContainerHandle};

/// 次级容器的绑定模块
///
/// 对应"描述绑定的显式模块"：所有绑定集中在 `configure` 中声明，
/// 注入器构建完成后不再接受新绑定。
pub trait Module: Send + Sync {
    /// 模块名称
    fn name(&self) -> &str;

    /// 声明绑定
    fn configure(&self, binder: &mut Binder<'_>) -> Result<(), ContainerError>;
}

/// 绑定收集器
///
/// 仅在 `Injector::from_module` 期间存在；同一个键绑定两次会
/// 立即失败（`DuplicateBinding`），而不是后写覆盖先写。
pub struct Binder<'a> {
    handle: ContainerHandle,
    registry: &'a ServiceRegistry,
}

impl Binder<'_> {
    /// 注入器句柄（供桥接提供者构造诊断信息）
    pub fn handle(&self) -> ContainerHandle {
        self.handle
    }

    /// 绑定一个提供者
    pub fn bind<T, F>(&mut self, provider: F) -> Result<(), ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceRegistry) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.registry.register(provider)
    }

    /// 绑定一个产出共享实例的提供者
    ///
    /// 桥接提供者使用此形式：被解析的实例归另一个容器所有，
    /// 这里缓存的是同一个 `Arc`。
    pub fn bind_shared<T, F>(&mut self, provider: F) -> Result<(), ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn(&ServiceRegistry) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        self.registry.register_shared(provider)
    }
}

/// 次级注入器
#[derive(Clone)]
pub struct Injector {
    handle: ContainerHandle,
    registry: ServiceRegistry,
}

impl Injector {
    /// 从模块构建注入器
    pub fn from_module(module: &dyn Module) -> Result<Self, ContainerError> {
        let handle = ContainerHandle::new("secondary");
        let registry = ServiceRegistry::new(handle.id, handle.name);

        let mut binder = Binder {
            handle,
            registry: &registry,
        };
        module.configure(&mut binder)?;

        info!(
            module = module.name(),
            bindings = registry.registered_keys().len(),
            "secondary injector configured"
        );
        Ok(Self { handle, registry })
    }

    pub fn handle(&self) -> ContainerHandle {
        self.handle
    }

    /// 类型是否有绑定
    pub fn is_bound<T: 'static>(&self) -> bool {
        self.registry.contains::<T>()
    }

    /// 解析单例（惰性构建，按类型记忆化）
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ContainerError> {
        self.registry.resolve::<T>()
    }

    /// 注入器统计信息
    pub fn stats(&self) -> super::ContainerStats {
        self.registry.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GreeterService {
        greeting: &'static str,
    }

    struct TestModule;

    impl Module for TestModule {
        fn name(&self) -> &str {
            "test"
        }

        fn configure(&self, binder: &mut Binder<'_>) -> Result<(), ContainerError> {
            binder.bind(|_| Ok(GreeterService { greeting: "hello" }))
        }
    }

    #[test]
    fn injector_resolves_module_bindings() {
        let injector = Injector::from_module(&TestModule).unwrap();
        assert!(injector.is_bound::<GreeterService>());

        let service = injector.get::<GreeterService>().unwrap();
        assert_eq!(service.greeting, "hello");
    }

    #[test]
    fn injector_memoizes_singletons() {
        let injector = Injector::from_module(&TestModule).unwrap();
        let first = injector.get::<GreeterService>().unwrap();
        let second = injector.get::<GreeterService>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn duplicate_module_binding_fails_loudly() {
        struct BrokenModule;

        impl Module for BrokenModule {
            fn name(&self) -> &str {
                "broken"
            }

            fn configure(&self, binder: &mut Binder<'_>) -> Result<(), ContainerError> {
                binder.bind(|_| Ok(GreeterService { greeting: "a" }))?;
                binder.bind(|_| Ok(GreeterService { greeting: "b" }))
            }
        }

        let result = Injector::from_module(&BrokenModule);
        assert!(matches!(
            result,
            Err(ContainerError::DuplicateBinding { .. })
        ));
    }
}
