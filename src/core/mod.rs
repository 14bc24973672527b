//! 核心模块
//!
//! 包含管理配置。

pub mod config;

pub use config::{LogConfig, ManagementConfig, ManagementConfigBuilder, ServerConfig};
