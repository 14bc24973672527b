//! 管理配置
//!
//! 定义日志、注册中心以及启动时加载的声明文件。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bean::{DeclarationParser, ParsedDeclaration};
use crate::server::{InMemoryBeanServer, DEFAULT_DOMAIN};
use crate::utils::{CoreError, Result};

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否输出到文件
    #[serde(default)]
    pub file_output: bool,

    /// 日志文件目录
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// 是否输出 JSON 格式
    #[serde(default)]
    pub json_format: bool,

    /// 日志轮转策略
    #[serde(default = "default_rotation")]
    pub rotation: String,

    /// 额外的过滤指令
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: false,
            log_dir: None,
            json_format: false,
            rotation: default_rotation(),
            filter: None,
        }
    }
}

/// 注册中心配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 默认域名
    #[serde(default = "default_domain")]
    pub default_domain: String,
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_domain: default_domain(),
        }
    }
}

/// 管理配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagementConfig {
    /// 配置文件路径
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// 日志配置
    #[serde(default)]
    pub logging: LogConfig,

    /// 注册中心配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 声明文件列表，相对路径相对于配置文件所在目录
    #[serde(default)]
    pub declarations: Vec<PathBuf>,
}

impl ManagementConfig {
    /// 创建配置构建器
    pub fn builder() -> ManagementConfigBuilder {
        ManagementConfigBuilder::new()
    }

    /// 从文件加载配置
    ///
    /// 扩展名为 `.json` 时按 JSON 解析，否则按 YAML 解析。
    ///
    /// # Errors
    ///
    /// 文件无法读取时返回 `ConfigLoadFailed`，内容格式错误时返回 YAML / JSON 错误
    pub async fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CoreError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;

        let mut config: ManagementConfig = if path.extension().map(|e| e == "json").unwrap_or(false) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        tracing::debug!(path = %path.display(), declarations = config.declarations.len(), "配置已加载");
        config.config_path = Some(path);
        Ok(config)
    }

    /// 合并另一个配置，非默认值覆盖当前值
    pub fn merge(&mut self, other: ManagementConfig) {
        if other.logging.level != default_log_level() {
            self.logging.level = other.logging.level;
        }
        if other.logging.file_output {
            self.logging.file_output = true;
            self.logging.log_dir = other.logging.log_dir;
        }
        if other.logging.json_format {
            self.logging.json_format = true;
        }
        if other.logging.rotation != default_rotation() {
            self.logging.rotation = other.logging.rotation;
        }
        if other.logging.filter.is_some() {
            self.logging.filter = other.logging.filter;
        }
        if other.server.default_domain != default_domain() {
            self.server.default_domain = other.server.default_domain;
        }
        self.declarations.extend(other.declarations);
    }

    /// 解析后的声明文件路径
    pub fn declaration_paths(&self) -> Vec<PathBuf> {
        let base = self.config_path.as_deref().and_then(Path::parent);
        self.declarations
            .iter()
            .map(|p| match base {
                Some(base) if p.is_relative() => base.join(p),
                _ => p.clone(),
            })
            .collect()
    }

    /// 加载全部声明文件
    ///
    /// # Errors
    ///
    /// 任一文件加载失败即返回该错误
    pub async fn load_declarations(&self) -> Result<Vec<ParsedDeclaration>> {
        let mut parsed = Vec::with_capacity(self.declarations.len());
        for path in self.declaration_paths() {
            parsed.push(DeclarationParser::parse_file(&path).await?);
        }
        Ok(parsed)
    }

    /// 按配置创建进程内注册中心
    pub fn create_server(&self) -> InMemoryBeanServer {
        InMemoryBeanServer::new(self.server.default_domain.clone())
    }
}

/// 配置构建器
#[derive(Debug, Default)]
pub struct ManagementConfigBuilder {
    config: ManagementConfig,
}

impl ManagementConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config: ManagementConfig::default(),
        }
    }

    /// 设置配置文件路径
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.config_path = Some(path.into());
        self
    }

    /// 设置日志级别
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// 启用文件日志
    pub fn file_logging(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.config.logging.file_output = true;
        self.config.logging.log_dir = Some(log_dir.into());
        self
    }

    /// 启用 JSON 格式日志
    pub fn json_logging(mut self) -> Self {
        self.config.logging.json_format = true;
        self
    }

    /// 设置日志滚动策略（`minutely` / `hourly` / `daily` / `never`）
    pub fn log_rotation(mut self, rotation: impl Into<String>) -> Self {
        self.config.logging.rotation = rotation.into();
        self
    }

    /// 设置默认域名
    pub fn default_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.server.default_domain = domain.into();
        self
    }

    /// 添加声明文件
    pub fn declaration(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.declarations.push(path.into());
        self
    }

    /// 构建配置
    pub fn build(self) -> ManagementConfig {
        self.config
    }
}
