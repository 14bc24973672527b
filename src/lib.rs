//! # Chips Management - 注解驱动的受管实例元数据
//!
//! 为受管实例生成交给注册中心的元数据，并负责实例的注册与注销：
//!
//! - **签名匹配**: 按名称与精确参数类型在管理接口或实现类型上定位成员
//! - **元数据解析**: 用接口上声明的描述、参数名与操作影响替换通用默认值
//! - **注册管理**: 按名称模板生成对象名称，注册失败只记录日志
//! - **声明文件**: 从 YAML / JSON 加载管理接口及其注解
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chips_management::bean::{AnnotatedBean, ManagementInterface, ImplementationType, OperationDecl};
//! use chips_management::server::platform_server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let interface = ManagementInterface::builder("com.example.WorkerMBean")
//!         .description("工作者")
//!         .object_name("com.example:type=Worker,name=%s")
//!         .operation(OperationDecl::new("getStatus").returns("java.lang.String"))
//!         .build()?;
//!
//!     let bean = AnnotatedBean::new(
//!         (),
//!         Arc::new(interface),
//!         Arc::new(ImplementationType::new("com.example.Worker")),
//!         platform_server(),
//!         &[&"w1"],
//!     )
//!     .await;
//!
//!     bean.unregister().await;
//!     Ok(())
//! }
//! ```
//!
//! ## 模块结构
//!
//! - `bean` - 类型模型、签名匹配、元数据解析、注解实例
//! - `server` - 对象名称、注册中心与注册管理
//! - `core` - 配置
//! - `utils` - 错误类型与日志

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bean;
pub mod core;
pub mod server;
pub mod utils;

// 重导出常用类型
pub use bean::{
    introspect, AnnotatedBean, AnnotatedMetadata, BeanInfo, DeclarationParser, Impact, ImplementationType,
    ManagementInterface, MetadataCustomizer, ParsedDeclaration, StandardMetadata,
};

pub use server::{platform_server, BeanServer, InMemoryBeanServer, ManagedBean, ObjectName, RegistrationState};

pub use utils::logger::{LogGuard, Logger, LoggerConfig, LoggerConfigBuilder, RotationStrategy};
pub use utils::{error_code, CoreError, Result};

pub use core::config::{LogConfig, ManagementConfig, ManagementConfigBuilder, ServerConfig};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
