//! 声明文件解析器
//!
//! 负责从 YAML（或 `.json`）声明文件加载管理接口及其注解。
//!
//! ```yaml
//! interface:
//!   name: com.example.WorkerMBean
//!   description: 工作线程池
//!   object_name: "com.example:type=Worker,name=%s"
//!   operations:
//!     - name: getStatus
//!       returns: java.lang.String
//!       description: 当前状态
//!     - name: resize
//!       impact: action
//!       parameters:
//!         - { type: int, name: size, description: 新的线程数 }
//! implementation:
//!   name: com.example.Worker
//!   constructors:
//!     - parameters: [{ type: java.lang.String, name: id }]
//! types:
//!   - com.example.Config
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::interface::{ImplementationDecl, ImplementationType, InterfaceDecl, ManagementInterface, ParameterDecl};
use super::types::TypeLoader;
use crate::utils::{CoreError, Result};

/// 声明文件内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeanDeclaration {
    /// 管理接口
    pub interface: InterfaceDecl,

    /// 实现类型（缺省时按 `XxxMBean` -> `Xxx` 约定推导，且无构造器）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<ImplementationDecl>,

    /// 额外登记到加载上下文的引用类型
    #[serde(default)]
    pub types: Vec<String>,
}

/// 解析结果
#[derive(Debug, Clone)]
pub struct ParsedDeclaration {
    /// 管理接口
    pub interface: ManagementInterface,
    /// 实现类型
    pub implementation: ImplementationType,
}

/// 声明文件解析器
#[derive(Debug, Clone, Default)]
pub struct DeclarationParser;

impl DeclarationParser {
    /// 创建新的解析器实例
    pub fn new() -> Self {
        Self
    }

    /// 从文件解析声明
    ///
    /// 扩展名为 `.json` 时按 JSON 解析，否则按 YAML 解析。
    ///
    /// # Errors
    ///
    /// - 文件不存在或无法读取时返回 IO 错误
    /// - 内容格式错误时返回 YAML / JSON 错误
    /// - 声明验证失败时返回 `InvalidDeclaration` 错误
    pub async fn parse_file(path: &Path) -> Result<ParsedDeclaration> {
        let content = tokio::fs::read_to_string(path).await?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            let decl: BeanDeclaration = serde_json::from_str(&content)?;
            Self::build(decl)
        } else {
            Self::parse_string(&content)
        }
    }

    /// 从文件同步解析声明
    pub fn parse_file_sync(path: &Path) -> Result<ParsedDeclaration> {
        let content = std::fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            let decl: BeanDeclaration = serde_json::from_str(&content)?;
            Self::build(decl)
        } else {
            Self::parse_string(&content)
        }
    }

    /// 从 YAML 字符串解析声明
    pub fn parse_string(content: &str) -> Result<ParsedDeclaration> {
        let decl: BeanDeclaration = serde_yaml::from_str(content)?;
        Self::build(decl)
    }

    /// 验证并构建
    pub fn build(decl: BeanDeclaration) -> Result<ParsedDeclaration> {
        Self::validate(&decl)?;

        let mut loader = TypeLoader::new();
        for name in &decl.types {
            loader.register(name.trim());
        }

        let interface = ManagementInterface::from_decl(&decl.interface, loader.clone())?;
        let implementation = match &decl.implementation {
            Some(implementation) => ImplementationType::from_decl(implementation, loader)?,
            None => ImplementationType::new(Self::implementation_name(&decl.interface.name)),
        };

        tracing::debug!(
            interface = interface.name(),
            implementation = implementation.name(),
            operations = interface.operations().len(),
            "声明解析完成"
        );

        Ok(ParsedDeclaration {
            interface,
            implementation,
        })
    }

    /// 验证声明
    ///
    /// 收集全部问题后一次性返回。
    pub fn validate(decl: &BeanDeclaration) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if decl.interface.name.trim().is_empty() {
            errors.push("接口名不能为空".to_string());
        }

        for (index, op) in decl.interface.operations.iter().enumerate() {
            if op.name.trim().is_empty() {
                errors.push(format!("第 {} 个操作的名称不能为空", index + 1));
            }
            Self::check_parameters(&op.name, &op.parameters, &mut errors);
        }

        if let Some(implementation) = &decl.implementation {
            if implementation.name.trim().is_empty() {
                errors.push("实现类型名不能为空".to_string());
            }
            for (index, c) in implementation.constructors.iter().enumerate() {
                Self::check_parameters(&format!("构造器 #{}", index + 1), &c.parameters, &mut errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidDeclaration(errors.join("; ")))
        }
    }

    fn check_parameters(owner: &str, params: &[ParameterDecl], errors: &mut Vec<String>) {
        for (index, param) in params.iter().enumerate() {
            if param.type_name.trim().is_empty() {
                errors.push(format!("'{}' 的第 {} 个参数缺少类型", owner, index + 1));
            }
        }
    }

    /// `com.example.WorkerMBean` -> `com.example.Worker`
    fn implementation_name(interface: &str) -> String {
        match interface.strip_suffix("MBean") {
            Some(stripped) if !stripped.is_empty() && !stripped.ends_with('.') => stripped.to_string(),
            _ => interface.to_string(),
        }
    }
}
