//! 双容器基础设施
//!
//! 提供两个相互独立的控制反转容器：
//! - 主容器（`PrimaryContainer`）：进程级单例图，启动一次，生命周期与进程绑定
//! - 次级注入器（`Injector`）：按需从显式模块（`Module`）构建
//!
//! 两个容器各自拥有独立的注册表和单例缓存，互不感知对方的内部装配；
//! 跨容器解析通过 `bridge` 模块的窄接口完成。

pub mod primary;
pub mod registry;
pub mod secondary;

pub use primary::PrimaryContainer;
pub use registry::{ContainerStats, ServiceRegistry};
pub use secondary::{Binder, Injector, Module};

use std::any::TypeId;
use std::fmt;
use uuid::Uuid;

/// 容器句柄
///
/// 每个容器每个进程恰好一个；由进程生命周期独占持有，
/// 不属于任何单个服务。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHandle {
    /// 容器实例ID
    pub id: Uuid,
    /// 容器名称（用于诊断信息）
    pub name: &'static str,
}

impl ContainerHandle {
    pub fn new(name: &'static str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

impl fmt::Display for ContainerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// 绑定键
///
/// 按类型查找提供者或实例；每个容器中每个键至多一个活跃绑定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl BindingKey {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)
    }
}

/// 容器统一错误类型
#[derive(Debug)]
pub enum ContainerError {
    /// 容器尚未启动就发起了解析（启动顺序缺陷，不可恢复）
    NotStarted { container: &'static str },
    /// 容器启动后还在尝试注册（注册只允许发生在启动阶段）
    AlreadyStarted { container: &'static str },
    /// 服务未注册 - 附带可用服务列表便于排查
    ServiceNotRegistered {
        key: BindingKey,
        container: &'static str,
        available: Vec<&'static str>,
    },
    /// 同一个键被注册了两次（静默覆盖会掩盖重复注册缺陷，必须显式失败）
    DuplicateBinding {
        key: BindingKey,
        container: &'static str,
    },
    /// 跨容器依赖无法解析（致命，请求方对象无法构建，不重试）
    UnresolvedDependency {
        key: BindingKey,
        source: &'static str,
        target: &'static str,
    },
    /// 构建链上出现循环依赖
    CircularDependency { chain: Vec<&'static str> },
    /// 服务创建失败
    CreationFailed { key: BindingKey, reason: String },
    /// 类型转换失败
    TypeCastFailed { expected: &'static str },
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::NotStarted { container } => {
                write!(f, "Container '{}' has not been started", container)
            }
            ContainerError::AlreadyStarted { container } => {
                write!(
                    f,
                    "Container '{}' is already started; registration is only allowed during startup",
                    container
                )
            }
            ContainerError::ServiceNotRegistered {
                key,
                container,
                available,
            } => {
                write!(
                    f,
                    "Service '{}' is not registered in container '{}'",
                    key, container
                )?;
                if !available.is_empty() {
                    write!(f, ". Available services: {}", available.join(", "))?;
                }
                Ok(())
            }
            ContainerError::DuplicateBinding { key, container } => {
                write!(
                    f,
                    "Binding for '{}' already exists in container '{}'; duplicate registration is rejected",
                    key, container
                )
            }
            ContainerError::UnresolvedDependency { key, source, target } => {
                write!(
                    f,
                    "Dependency '{}' requested by container '{}' could not be resolved from container '{}'",
                    key, source, target
                )
            }
            ContainerError::CircularDependency { chain } => {
                write!(f, "Circular dependency detected: {}", chain.join(" -> "))
            }
            ContainerError::CreationFailed { key, reason } => {
                write!(f, "Failed to create service '{}': {}", key, reason)
            }
            ContainerError::TypeCastFailed { expected } => {
                write!(f, "Type cast failed for '{}'", expected)
            }
        }
    }
}

impl std::error::Error for ContainerError {}
