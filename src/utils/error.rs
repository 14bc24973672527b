//! 管理组件错误类型定义
//!
//! 本模块定义了元数据解析、名称格式化与注册过程中使用的所有错误类型。

use thiserror::Error;

/// 管理组件核心错误类型
#[derive(Error, Debug)]
pub enum CoreError {
    // ==================== 签名匹配错误 ====================

    /// 类型描述符无法解析
    #[error("类型未找到: '{0}'")]
    TypeNotFound(String),

    /// 接口或实现类型上不存在对应成员
    #[error("成员未找到: '{owner}.{member}'")]
    MemberNotFound {
        /// 接口或实现类型名
        owner: String,
        /// 成员名
        member: String,
    },

    // ==================== 声明错误 ====================

    /// 无效的接口声明
    #[error("无效的接口声明: {0}")]
    InvalidDeclaration(String),

    // ==================== 名称与注册错误 ====================

    /// 名称模板格式化失败
    #[error("名称模板无效: '{template}' - {reason}")]
    MalformedNameTemplate {
        /// 名称模板
        template: String,
        /// 失败原因
        reason: String,
    },

    /// 对象名称格式无效
    #[error("对象名称无效: '{name}' - {reason}")]
    MalformedObjectName {
        /// 格式化后的名称
        name: String,
        /// 失败原因
        reason: String,
    },

    /// 名称已被占用
    #[error("实例已存在: '{0}'")]
    InstanceAlreadyExists(String),

    /// 名称未注册
    #[error("实例未找到: '{0}'")]
    InstanceNotFound(String),

    /// 未声明名称模板，无注册名称
    #[error("未设置注册名称")]
    NameNotSet,

    // ==================== 配置错误 ====================

    /// 配置加载失败
    #[error("配置加载失败: {0}")]
    ConfigLoadFailed(String),

    // ==================== IO 和序列化错误 ====================

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML 序列化/反序列化错误
    #[error("YAML 错误: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ==================== 通用错误 ====================

    /// 初始化失败
    #[error("初始化失败: {0}")]
    InitFailed(String),
}

/// 管理组件操作结果类型别名
pub type Result<T> = std::result::Result<T, CoreError>;

/// 错误码常量
pub mod error_code {
    // 解析错误 (RESOLVE-xxx)
    /// 类型未找到
    pub const RESOLVE_TYPE_NOT_FOUND: &str = "RESOLVE-001";
    /// 成员未找到
    pub const RESOLVE_MEMBER_NOT_FOUND: &str = "RESOLVE-002";

    // 声明错误 (DECL-xxx)
    /// 无效声明
    pub const DECL_INVALID: &str = "DECL-001";

    // 注册错误 (MGMT-xxx)
    /// 名称模板无效
    pub const MGMT_MALFORMED_TEMPLATE: &str = "MGMT-001";
    /// 对象名称无效
    pub const MGMT_MALFORMED_NAME: &str = "MGMT-002";
    /// 名称已被占用
    pub const MGMT_ALREADY_EXISTS: &str = "MGMT-003";
    /// 名称未注册
    pub const MGMT_NOT_FOUND: &str = "MGMT-004";
    /// 无注册名称
    pub const MGMT_NAME_NOT_SET: &str = "MGMT-005";

    // 配置错误 (CONFIG-xxx)
    /// 配置加载失败
    pub const CONFIG_LOAD_FAILED: &str = "CONFIG-001";
}

impl CoreError {
    /// 获取错误码
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::TypeNotFound(_) => error_code::RESOLVE_TYPE_NOT_FOUND,
            CoreError::MemberNotFound { .. } => error_code::RESOLVE_MEMBER_NOT_FOUND,
            CoreError::InvalidDeclaration(_) => error_code::DECL_INVALID,
            CoreError::MalformedNameTemplate { .. } => error_code::MGMT_MALFORMED_TEMPLATE,
            CoreError::MalformedObjectName { .. } => error_code::MGMT_MALFORMED_NAME,
            CoreError::InstanceAlreadyExists(_) => error_code::MGMT_ALREADY_EXISTS,
            CoreError::InstanceNotFound(_) => error_code::MGMT_NOT_FOUND,
            CoreError::NameNotSet => error_code::MGMT_NAME_NOT_SET,
            CoreError::ConfigLoadFailed(_) => error_code::CONFIG_LOAD_FAILED,
            _ => "UNKNOWN",
        }
    }

    /// 是否属于注册失败一类（只记录日志，不向调用方传播）
    pub fn is_registration_failure(&self) -> bool {
        matches!(
            self,
            CoreError::MalformedNameTemplate { .. }
                | CoreError::MalformedObjectName { .. }
                | CoreError::InstanceAlreadyExists(_)
                | CoreError::InstanceNotFound(_)
                | CoreError::NameNotSet
        )
    }
}
