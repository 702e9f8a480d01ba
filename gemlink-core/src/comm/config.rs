use anyhow::{anyhow, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref GLOBAL_CONFIG_MANAGER: RwLock<Option<Arc<ConfigManager>>> = RwLock::new(None);
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("配置项 '{key}' 不存在")]
    KeyNotFound { key: String },
    #[error("配置项 '{key}' 类型转换失败: {message}")]
    TypeConversionError { key: String, message: String },
    #[error("配置初始化失败: {message}")]
    InitializationError { message: String },
}

/// 分层配置管理器：文件层叠 + GEMLINK_* 环境变量覆盖
/// Layered configuration manager: stacked files + GEMLINK_* env overrides
pub struct ConfigManager {
    config: Config,
}

impl ConfigManager {
    /// 使用默认配置源创建（development -> default -> production -> env）
    pub fn new() -> Result<Self> {
        Self::with_sources(vec![])
    }

    /// 在默认配置源之上追加额外的配置源
    /// Extra sources are layered on top of the defaults
    pub fn with_sources(sources: Vec<ConfigSource>) -> Result<Self> {
        let mut builder = Config::builder();

        // 后添加者优先生效：development.toml -> default.toml -> production.toml -> 环境变量
        let default_sources = vec![
            ConfigSource::File {
                path: "config/development.toml".to_string(),
                required: false,
            },
            ConfigSource::File {
                path: "config/default.toml".to_string(),
                required: false,
            },
            ConfigSource::File {
                path: "config/production.toml".to_string(),
                required: false,
            },
            ConfigSource::Env {
                prefix: "GEMLINK".to_string(),
                separator: "_",
            },
        ];

        for source in default_sources.into_iter().chain(sources) {
            if let ConfigSource::File { path, required } = &source {
                let exists = std::path::Path::new(path).exists();
                if !exists && !required {
                    continue;
                }
                if !exists && *required {
                    return Err(anyhow!("必需的配置文件不存在: {}", path));
                }
            }
            builder = source.add_to_builder(builder)?;
        }

        let config = builder
            .build()
            .map_err(|e| anyhow!("构建配置失败: {}", e))?;
        Ok(Self { config })
    }

    /// 获取指定 key 的配置值
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.config
            .get(key)
            .map_err(|e| anyhow!("获取配置 '{}' 失败: {}", key, e))
    }

    /// 获取指定 key 的配置值，不存在时返回默认值
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// 安全获取配置值，返回结构化错误
    pub fn get_safe<T: DeserializeOwned>(&self, key: &str) -> std::result::Result<T, ConfigError> {
        self.config.get(key).map_err(|e| {
            if e.to_string().contains("not found") {
                ConfigError::KeyNotFound {
                    key: key.to_string(),
                }
            } else {
                ConfigError::TypeConversionError {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    /// 检查配置项是否存在
    pub fn exists(&self, key: &str) -> bool {
        self.config.get::<serde_json::Value>(key).is_ok()
    }

    /// 验证必需的配置项
    pub fn validate_required_keys(
        &self,
        required_keys: &[&str],
    ) -> std::result::Result<(), ConfigError> {
        for key in required_keys {
            if !self.exists(key) {
                return Err(ConfigError::KeyNotFound {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// 配置源类型
pub enum ConfigSource {
    /// 文件配置源（按扩展名自动识别格式）
    File { path: String, required: bool },
    /// 环境变量配置源
    Env {
        prefix: String,
        separator: &'static str,
    },
    /// 内存配置源（HashMap）
    Memory(HashMap<String, serde_json::Value>),
    /// 字符串配置源
    String { content: String, format: FileFormat },
}

impl ConfigSource {
    fn add_to_builder(
        self,
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ConfigBuilder<config::builder::DefaultState>> {
        match self {
            ConfigSource::File { path, required } => {
                Ok(builder.add_source(File::with_name(&path).required(required)))
            }
            ConfigSource::Env { prefix, separator } => Ok(builder.add_source(
                Environment::with_prefix(&prefix)
                    .separator(separator)
                    .prefix_separator("_")
                    .ignore_empty(true),
            )),
            ConfigSource::Memory(map) => {
                let json_content = serde_json::to_string(&map)
                    .map_err(|e| anyhow!("序列化内存配置失败: {}", e))?;
                Ok(builder.add_source(File::from_str(&json_content, FileFormat::Json)))
            }
            ConfigSource::String { content, format } => {
                Ok(builder.add_source(File::from_str(&content, format)))
            }
        }
    }
}

/// 获取全局配置管理器实例（单例模式）
pub fn get_global_config_manager() -> Result<Arc<ConfigManager>> {
    {
        let manager = GLOBAL_CONFIG_MANAGER
            .read()
            .map_err(|e| anyhow!("读取全局配置管理器锁失败: {}", e))?;
        if let Some(ref config_manager) = *manager {
            return Ok(Arc::clone(config_manager));
        }
    }
    let mut manager = GLOBAL_CONFIG_MANAGER
        .write()
        .map_err(|e| anyhow!("获取全局配置管理器写锁失败: {}", e))?;
    match &*manager {
        Some(existing) => Ok(Arc::clone(existing)),
        None => {
            let config_manager = Arc::new(ConfigManager::new()?);
            *manager = Some(Arc::clone(&config_manager));
            Ok(config_manager)
        }
    }
}

/// 使用指定的额外配置源初始化全局单例（仅首次调用生效）
/// Initialize the global singleton with extra sources (first call wins)
pub fn init_global_config(sources: Vec<ConfigSource>) -> Result<Arc<ConfigManager>> {
    let mut manager = GLOBAL_CONFIG_MANAGER
        .write()
        .map_err(|e| anyhow!("获取全局配置管理器写锁失败: {}", e))?;
    match &*manager {
        Some(existing) => Ok(Arc::clone(existing)),
        None => {
            let config_manager = Arc::new(ConfigManager::with_sources(sources)?);
            *manager = Some(Arc::clone(&config_manager));
            Ok(config_manager)
        }
    }
}

/// 全局配置获取函数（使用单例）
pub fn get_config<T: DeserializeOwned>(key: &str) -> Result<T> {
    let manager = get_global_config_manager()?;
    manager.get(key)
}

#[cfg(test)]
mod tests {
    use super::{ConfigManager, ConfigSource};
    use config::FileFormat;
    use std::collections::HashMap;

    #[test]
    fn test_config_manager_new() {
        let manager = ConfigManager::new();
        assert!(manager.is_ok());
    }

    #[test]
    fn test_config_from_string() {
        let toml_content = "[server]\nws_port = 9100".to_string();
        let source = ConfigSource::String {
            content: toml_content,
            format: FileFormat::Toml,
        };
        let manager = ConfigManager::with_sources(vec![source]).unwrap();
        assert_eq!(manager.get::<i64>("server.ws_port").unwrap(), 9100);
    }

    #[test]
    fn test_config_from_memory() {
        let mut map = HashMap::new();
        map.insert(
            "server.host".to_string(),
            serde_json::Value::String("127.0.0.1".to_string()),
        );
        let source = ConfigSource::Memory(map);
        let manager = ConfigManager::with_sources(vec![source]).unwrap();
        assert_eq!(manager.get::<String>("server.host").unwrap(), "127.0.0.1");
    }

    #[test]
    fn test_get_or_falls_back() {
        let manager = ConfigManager::with_sources(vec![]).unwrap();
        assert_eq!(manager.get_or("no.such.key", 7_i64), 7);
    }
}
