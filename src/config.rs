//! 应用配置加载。
//!
//! 配置来自 TOML 文件,缺失的文件或字段回退到内置默认值,保证应用在
//! 零配置环境下也能启动。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::{debug, info};

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 读取配置文件失败
    Io {
        path: String,
        source: std::io::Error,
    },
    /// TOML 解析失败
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "读取配置文件 {} 失败: {}", path, source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "解析配置文件 {} 失败: {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// 应用总配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: CacheConfig,
}

/// 缓存配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub catalog: CatalogCacheConfig,
}

/// 目录引擎的弱引用缓存无需配置,此处只描述商品引擎的 LRU 区域。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCacheConfig {
    /// 缓存区域最大条目数
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// 条目存活时间(秒)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_max_entries() -> usize {
    500
}

fn default_ttl_secs() -> u64 {
    300
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CatalogCacheConfig {
    /// 配置值为 0 时回退到 1,LRU 区域的容量必须非零。
    pub fn max_entries(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_entries).unwrap_or(NonZeroUsize::MIN)
    }
}

impl AppConfig {
    /// 从指定路径加载配置;未指定路径或文件不存在时使用默认值。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("未指定配置文件,使用默认配置");
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "配置文件不存在,使用默认配置");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "配置加载完成");
        Ok(config)
    }
}
