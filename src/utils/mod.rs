//! 工具模块
//!
//! 包含错误类型与日志系统。

pub mod error;
pub mod logger;

pub use error::{error_code, CoreError, Result};
pub use logger::{LogGuard, Logger, LoggerConfig, LoggerConfigBuilder, RotationStrategy};
