//! 日志系统
//!
//! 基于 tracing 生态：控制台输出、可选的滚动文件输出、JSON 格式以及按模块过滤。
//! 注册与注销失败只通过这里配置的订阅者上报。
//!
//! ```rust,no_run
//! use chips_management::utils::logger::{Logger, LoggerConfig, RotationStrategy};
//!
//! let _guard = Logger::init(
//!     LoggerConfig::builder()
//!         .level("debug")
//!         .file_output("./logs")
//!         .rotation(RotationStrategy::Hourly)
//!         .build(),
//! )
//! .unwrap();
//!
//! tracing::warn!(object_name = "com.example:type=Worker,name=w1", "not registered");
//! ```

use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::LogConfig;
use crate::utils::{CoreError, Result};

/// 默认日志文件前缀
pub const DEFAULT_FILE_PREFIX: &str = "chips-management";

// ============================================================================
// 日志轮转策略
// ============================================================================

/// 日志文件轮转策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationStrategy {
    /// 单个文件
    Never,
    /// 每小时
    Hourly,
    /// 每天
    #[default]
    Daily,
}

impl RotationStrategy {
    fn to_rotation(self) -> Rotation {
        match self {
            RotationStrategy::Never => Rotation::NEVER,
            RotationStrategy::Hourly => Rotation::HOURLY,
            RotationStrategy::Daily => Rotation::DAILY,
        }
    }

    /// 解析配置中的策略名，未知值按每天处理
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "never" | "none" => RotationStrategy::Never,
            "hourly" | "hour" => RotationStrategy::Hourly,
            _ => RotationStrategy::Daily,
        }
    }
}

impl std::fmt::Display for RotationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RotationStrategy::Never => "never",
            RotationStrategy::Hourly => "hourly",
            RotationStrategy::Daily => "daily",
        };
        f.write_str(s)
    }
}

// ============================================================================
// 日志配置
// ============================================================================

/// 日志系统配置
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// 默认级别（trace / debug / info / warn / error）
    pub level: String,

    /// JSON 格式输出
    pub json_format: bool,

    /// 输出到控制台（stderr）
    pub console_output: bool,

    /// 文件输出目录，None 表示不写文件
    pub file_output: Option<PathBuf>,

    /// 日志文件名前缀
    pub file_prefix: String,

    /// 轮转策略
    pub rotation: RotationStrategy,

    /// 显示目标模块
    pub show_target: bool,

    /// 显示文件名和行号
    pub show_file_line: bool,

    /// 额外的过滤指令（EnvFilter 格式），如 `chips_management::server=debug`
    pub filter_directives: Option<String>,

    /// 控制台 ANSI 颜色
    pub ansi_colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            rotation: RotationStrategy::Daily,
            show_target: true,
            show_file_line: false,
            filter_directives: None,
            ansi_colors: true,
        }
    }
}

impl LoggerConfig {
    /// 创建配置构建器
    pub fn builder() -> LoggerConfigBuilder {
        LoggerConfigBuilder::new()
    }

    /// 从配置文件中的日志段创建
    pub fn from_log_config(log_config: &LogConfig) -> Self {
        Self {
            level: log_config.level.clone(),
            json_format: log_config.json_format,
            file_output: if log_config.file_output {
                log_config.log_dir.clone()
            } else {
                None
            },
            rotation: RotationStrategy::parse(&log_config.rotation),
            filter_directives: log_config.filter.clone(),
            ..Default::default()
        }
    }

    /// 解析日志级别，无法识别时为 INFO
    pub fn parse_level(&self) -> Level {
        match self.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" | "warning" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// 日志配置构建器
#[derive(Debug, Default)]
pub struct LoggerConfigBuilder {
    config: LoggerConfig,
}

impl LoggerConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
        }
    }

    /// 设置日志级别
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    /// 启用 JSON 格式输出
    pub fn json_format(mut self, enable: bool) -> Self {
        self.config.json_format = enable;
        self
    }

    /// 设置控制台输出
    pub fn console_output(mut self, enable: bool) -> Self {
        self.config.console_output = enable;
        self
    }

    /// 设置文件输出目录
    pub fn file_output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.file_output = Some(dir.into());
        self
    }

    /// 设置日志文件前缀
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.file_prefix = prefix.into();
        self
    }

    /// 设置轮转策略
    pub fn rotation(mut self, strategy: RotationStrategy) -> Self {
        self.config.rotation = strategy;
        self
    }

    /// 显示目标模块
    pub fn show_target(mut self, enable: bool) -> Self {
        self.config.show_target = enable;
        self
    }

    /// 显示文件名和行号
    pub fn show_file_line(mut self, enable: bool) -> Self {
        self.config.show_file_line = enable;
        self
    }

    /// 设置过滤指令
    pub fn filter_directives(mut self, directives: impl Into<String>) -> Self {
        self.config.filter_directives = Some(directives.into());
        self
    }

    /// 启用 ANSI 颜色
    pub fn ansi_colors(mut self, enable: bool) -> Self {
        self.config.ansi_colors = enable;
        self
    }

    /// 构建配置
    pub fn build(self) -> LoggerConfig {
        self.config
    }
}

// ============================================================================
// 日志守卫
// ============================================================================

/// 日志守卫
///
/// 持有非阻塞写入器的 WorkerGuard，丢弃时刷新挂起的日志。
#[must_use = "丢弃守卫会导致挂起的日志丢失"]
pub struct LogGuard {
    _guards: Vec<WorkerGuard>,
}

impl LogGuard {
    fn empty() -> Self {
        Self { _guards: Vec::new() }
    }

    /// 持有的写入器数量
    pub fn writer_count(&self) -> usize {
        self._guards.len()
    }
}

// ============================================================================
// 日志系统
// ============================================================================

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// 日志系统
pub struct Logger;

impl Logger {
    /// 初始化全局订阅者
    ///
    /// 返回的守卫必须保持存活直到程序退出。
    ///
    /// # Errors
    ///
    /// 已初始化过或订阅者安装失败时返回 `InitFailed`
    pub fn init(config: LoggerConfig) -> Result<LogGuard> {
        if LOGGER_INITIALIZED.get().is_some() {
            return Err(CoreError::InitFailed("日志系统已初始化，不能重复初始化".to_string()));
        }

        let env_filter = Self::create_env_filter(&config);
        let mut guard = LogGuard::empty();

        let console_writer = config.console_output.then(|| {
            let (writer, worker) = tracing_appender::non_blocking(io::stderr());
            guard._guards.push(worker);
            writer
        });
        let file_writer = config.file_output.as_ref().map(|dir| {
            let appender = RollingFileAppender::new(
                config.rotation.to_rotation(),
                dir,
                format!("{}.log", config.file_prefix),
            );
            let (writer, worker) = tracing_appender::non_blocking(appender);
            guard._guards.push(worker);
            writer
        });

        let registry = tracing_subscriber::registry().with(env_filter);
        let installed = if config.json_format {
            registry
                .with(console_writer.map(|w| {
                    fmt::layer()
                        .json()
                        .with_writer(w)
                        .with_target(config.show_target)
                        .with_file(config.show_file_line)
                        .with_line_number(config.show_file_line)
                }))
                .with(file_writer.map(|w| {
                    fmt::layer()
                        .json()
                        .with_writer(w)
                        .with_target(config.show_target)
                        .with_file(config.show_file_line)
                        .with_line_number(config.show_file_line)
                }))
                .try_init()
        } else {
            registry
                .with(console_writer.map(|w| {
                    fmt::layer()
                        .with_writer(w)
                        .with_target(config.show_target)
                        .with_file(config.show_file_line)
                        .with_line_number(config.show_file_line)
                        .with_ansi(config.ansi_colors)
                }))
                .with(file_writer.map(|w| {
                    fmt::layer()
                        .with_writer(w)
                        .with_target(config.show_target)
                        .with_file(config.show_file_line)
                        .with_line_number(config.show_file_line)
                        .with_ansi(false)
                }))
                .try_init()
        };
        installed.map_err(|e| CoreError::InitFailed(format!("日志系统初始化失败: {}", e)))?;

        let _ = LOGGER_INITIALIZED.set(());
        Ok(guard)
    }

    /// 初始化，失败时返回空守卫
    ///
    /// 用于测试或可能重复初始化的场景。
    pub fn try_init(config: LoggerConfig) -> LogGuard {
        Self::init(config).unwrap_or_else(|_| LogGuard::empty())
    }

    /// RUST_LOG 优先，其次为配置的级别加过滤指令；无法解析的指令被忽略
    fn create_env_filter(config: &LoggerConfig) -> EnvFilter {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.parse_level().as_str().to_lowercase()));

        match &config.filter_directives {
            Some(directives) => directives
                .split(',')
                .filter_map(|d| d.trim().parse().ok())
                .fold(filter, |f, directive| f.add_directive(directive)),
            None => filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_strategy_parse() {
        assert_eq!(RotationStrategy::parse("daily"), RotationStrategy::Daily);
        assert_eq!(RotationStrategy::parse(" HOURLY "), RotationStrategy::Hourly);
        assert_eq!(RotationStrategy::parse("none"), RotationStrategy::Never);
        assert_eq!(RotationStrategy::parse("weekly"), RotationStrategy::Daily);
        assert_eq!(RotationStrategy::Never.to_string(), "never");
        let _ = RotationStrategy::Hourly.to_rotation();
    }

    #[test]
    fn test_logger_config_default() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
        assert!(config.file_output.is_none());
        assert_eq!(config.file_prefix, DEFAULT_FILE_PREFIX);
        assert_eq!(config.rotation, RotationStrategy::Daily);
    }

    #[test]
    fn test_logger_config_builder() {
        let config = LoggerConfig::builder()
            .level("debug")
            .json_format(true)
            .file_output("/var/log/chips")
            .file_prefix("beans")
            .rotation(RotationStrategy::Never)
            .show_target(false)
            .filter_directives("chips_management::server=trace")
            .ansi_colors(false)
            .build();

        assert_eq!(config.parse_level(), Level::DEBUG);
        assert!(config.json_format);
        assert_eq!(config.file_output, Some(PathBuf::from("/var/log/chips")));
        assert_eq!(config.file_prefix, "beans");
        assert!(!config.show_target);
        assert!(!config.ansi_colors);
    }

    #[test]
    fn test_parse_level_fallback() {
        for (level, expected) in [("TRACE", Level::TRACE), ("warning", Level::WARN), ("loud", Level::INFO)] {
            assert_eq!(LoggerConfig::builder().level(level).build().parse_level(), expected);
        }
    }

    #[test]
    fn test_from_log_config() {
        let log_config = LogConfig {
            level: "warn".to_string(),
            file_output: true,
            log_dir: Some(PathBuf::from("/tmp/logs")),
            json_format: true,
            rotation: "hourly".to_string(),
            filter: Some("chips_management=debug".to_string()),
        };
        let config = LoggerConfig::from_log_config(&log_config);
        assert_eq!(config.level, "warn");
        assert_eq!(config.file_output, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.rotation, RotationStrategy::Hourly);
        assert_eq!(config.filter_directives.as_deref(), Some("chips_management=debug"));

        // 未开启文件输出时忽略目录
        let config = LoggerConfig::from_log_config(&LogConfig {
            file_output: false,
            ..log_config
        });
        assert!(config.file_output.is_none());
    }

    #[test]
    fn test_env_filter_ignores_bad_directives() {
        let config = LoggerConfig::builder()
            .filter_directives("chips_management=debug,[[not a directive")
            .build();
        let _ = Logger::create_env_filter(&config);
    }

    #[test]
    fn test_try_init_never_fails() {
        let _first = Logger::try_init(LoggerConfig::builder().console_output(false).build());
        let second = Logger::try_init(LoggerConfig::default());
        assert_eq!(second.writer_count(), 0);
    }
}
