//! 注册中心元数据对象
//!
//! 注册中心用这些结构描述一个受管实例：属性、操作、构造器及其参数。
//! 参数类型以字符串描述符表示。

use serde::{Deserialize, Serialize};

use super::interface::Impact;

/// 参数元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// 参数名
    pub name: String,
    /// 类型描述符
    #[serde(rename = "type")]
    pub type_name: String,
    /// 参数描述
    #[serde(default)]
    pub description: String,
}

impl ParameterInfo {
    /// 创建参数元数据
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            description: description.into(),
        }
    }
}

/// 属性元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInfo {
    /// 属性名
    pub name: String,
    /// 类型描述符
    #[serde(rename = "type")]
    pub type_name: String,
    /// 属性描述
    #[serde(default)]
    pub description: String,
    /// 可读
    pub readable: bool,
    /// 可写
    pub writable: bool,
    /// 读访问器为 `is` 前缀
    #[serde(default)]
    pub is_getter: bool,
}

/// 操作元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationInfo {
    /// 操作名
    pub name: String,
    /// 操作描述
    #[serde(default)]
    pub description: String,
    /// 参数签名
    #[serde(default)]
    pub signature: Vec<ParameterInfo>,
    /// 返回类型描述符，无返回值为 `void`
    pub return_type: String,
    /// 影响分类
    pub impact: Impact,
}

impl OperationInfo {
    /// 签名中的类型描述符列表
    pub fn parameter_types(&self) -> Vec<&str> {
        self.signature.iter().map(|p| p.type_name.as_str()).collect()
    }
}

/// 构造器元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorInfo {
    /// 构造器名（即实现类型名）
    pub name: String,
    /// 构造器描述
    #[serde(default)]
    pub description: String,
    /// 参数签名
    #[serde(default)]
    pub signature: Vec<ParameterInfo>,
}

impl ConstructorInfo {
    /// 签名中的类型描述符列表
    pub fn parameter_types(&self) -> Vec<&str> {
        self.signature.iter().map(|p| p.type_name.as_str()).collect()
    }
}

/// 受管实例的完整元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeanInfo {
    /// 实现类型名
    pub class_name: String,
    /// 接口描述
    #[serde(default)]
    pub description: String,
    /// 属性
    #[serde(default)]
    pub attributes: Vec<AttributeInfo>,
    /// 构造器
    #[serde(default)]
    pub constructors: Vec<ConstructorInfo>,
    /// 操作
    #[serde(default)]
    pub operations: Vec<OperationInfo>,
}

impl BeanInfo {
    /// 按名称查找属性
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// 按名称查找操作（取第一个重载）
    pub fn operation(&self, name: &str) -> Option<&OperationInfo> {
        self.operations.iter().find(|o| o.name == name)
    }
}
