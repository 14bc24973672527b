//! 管理接口声明
//!
//! 管理接口是对外暴露的类型契约：它的操作、由访问器合成的属性，
//! 以及实现类型上的构造器。描述、参数名、影响分类等注解以旁路元数据
//! 的形式挂在各成员上，在启动时通过构建器或声明文件一次性构建，
//! 构建完成后只读。

use serde::{Deserialize, Serialize};

use super::types::{declare_type, ConcreteType, TypeLoader};
use crate::utils::{CoreError, Result};

/// 操作影响分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    /// 只读：返回信息，不改变状态
    Info,
    /// 只写：产生效果，不返回信息
    Action,
    /// 读写：产生效果，同时返回信息
    ActionInfo,
    /// 未知或无法用其他值表达
    Unknown,
}

impl Default for Impact {
    fn default() -> Self {
        Impact::Unknown
    }
}

impl Impact {
    /// 数值编码
    pub fn value(self) -> i32 {
        match self {
            Impact::Info => 0,
            Impact::Action => 1,
            Impact::ActionInfo => 2,
            Impact::Unknown => 3,
        }
    }

    /// 从数值编码解析
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Impact::Info),
            1 => Some(Impact::Action),
            2 => Some(Impact::ActionInfo),
            3 => Some(Impact::Unknown),
            _ => None,
        }
    }
}

// ============================================================================
// 声明（可序列化，供构建器与声明文件使用）
// ============================================================================

/// 参数声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDecl {
    /// 类型描述符
    #[serde(rename = "type")]
    pub type_name: String,

    /// 显示名称注解
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// 描述注解
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterDecl {
    /// 按类型描述符创建
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: None,
            description: None,
        }
    }

    /// 设置显示名称
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 设置描述
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// 操作声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDecl {
    /// 操作名
    pub name: String,

    /// 参数列表（有序）
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,

    /// 返回类型描述符，缺省或 "void" 表示无返回值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,

    /// 描述注解
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// 影响分类注解
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
}

impl OperationDecl {
    /// 按操作名创建，默认无参数、无返回值
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: vec![],
            returns: None,
            description: None,
            impact: None,
        }
    }

    /// 追加参数
    pub fn param(mut self, param: ParameterDecl) -> Self {
        self.parameters.push(param);
        self
    }

    /// 设置返回类型
    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.returns = Some(type_name.into());
        self
    }

    /// 设置描述
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 设置影响分类
    pub fn impact(mut self, impact: Impact) -> Self {
        self.impact = Some(impact);
        self
    }
}

/// 构造器声明
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstructorDecl {
    /// 参数列表（有序）
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,

    /// 描述注解
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConstructorDecl {
    /// 创建无参构造器声明
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加参数
    pub fn param(mut self, param: ParameterDecl) -> Self {
        self.parameters.push(param);
        self
    }

    /// 设置描述
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// 接口声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceDecl {
    /// 接口全限定名
    pub name: String,

    /// 描述注解
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// 注册名称模板注解，如 `com.foo:type=Worker,name=%s`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,

    /// 操作（含访问器）
    #[serde(default)]
    pub operations: Vec<OperationDecl>,
}

/// 实现类型声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplementationDecl {
    /// 实现类型全限定名
    pub name: String,

    /// 公开构造器
    #[serde(default)]
    pub constructors: Vec<ConstructorDecl>,
}

// ============================================================================
// 已构建的接口模型
// ============================================================================

/// 参数注解
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterAnnotations {
    /// 参数描述
    pub description: Option<String>,
    /// 参数名
    pub name: Option<String>,
}

/// 成员注解
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberAnnotations {
    /// 成员描述
    pub description: Option<String>,
    /// 操作影响，构造器恒为 None
    pub impact: Option<Impact>,
    /// 按参数位置排列
    pub parameters: Vec<ParameterAnnotations>,
}

impl MemberAnnotations {
    /// 指定位置的参数注解，越界返回 None
    pub fn parameter(&self, position: usize) -> Option<&ParameterAnnotations> {
        self.parameters.get(position)
    }
}

/// 接口操作
#[derive(Debug, Clone)]
pub struct Operation {
    /// 操作名
    pub name: String,
    /// 参数类型（声明顺序）
    pub parameter_types: Vec<ConcreteType>,
    /// None 表示 void
    pub return_type: Option<ConcreteType>,
    /// 注解
    pub annotations: MemberAnnotations,
}

/// 实现类型的构造器
#[derive(Debug, Clone)]
pub struct Constructor {
    /// 参数类型（声明顺序）
    pub parameter_types: Vec<ConcreteType>,
    /// 注解
    pub annotations: MemberAnnotations,
}

fn build_parameters(
    params: &[ParameterDecl],
    loader: &mut TypeLoader,
) -> Result<(Vec<ConcreteType>, Vec<ParameterAnnotations>)> {
    let mut types = Vec::with_capacity(params.len());
    let mut annotations = Vec::with_capacity(params.len());
    for param in params {
        types.push(declare_type(&param.type_name, loader)?);
        annotations.push(ParameterAnnotations {
            description: param.description.clone(),
            name: param.name.clone(),
        });
    }
    Ok((types, annotations))
}

impl Operation {
    fn from_decl(decl: &OperationDecl, loader: &mut TypeLoader) -> Result<Self> {
        if decl.name.trim().is_empty() {
            return Err(CoreError::InvalidDeclaration("操作名不能为空".to_string()));
        }
        let (parameter_types, parameters) = build_parameters(&decl.parameters, loader)?;
        let return_type = match decl.returns.as_deref().map(str::trim) {
            None | Some("void") | Some("") => None,
            Some(t) => Some(declare_type(t, loader)?),
        };
        Ok(Self {
            name: decl.name.clone(),
            parameter_types,
            return_type,
            annotations: MemberAnnotations {
                description: decl.description.clone(),
                impact: decl.impact,
                parameters,
            },
        })
    }

    /// 参数个数
    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

impl Constructor {
    fn from_decl(decl: &ConstructorDecl, loader: &mut TypeLoader) -> Result<Self> {
        let (parameter_types, parameters) = build_parameters(&decl.parameters, loader)?;
        Ok(Self {
            parameter_types,
            annotations: MemberAnnotations {
                description: decl.description.clone(),
                impact: None,
                parameters,
            },
        })
    }
}

/// 管理接口
///
/// 构建后不可变，可通过 `Arc` 在多个实例和线程之间共享。
#[derive(Debug, Clone)]
pub struct ManagementInterface {
    name: String,
    description: Option<String>,
    object_name: Option<String>,
    operations: Vec<Operation>,
    loader: TypeLoader,
}

impl ManagementInterface {
    /// 创建接口构建器
    pub fn builder(name: impl Into<String>) -> InterfaceBuilder {
        InterfaceBuilder::new(name)
    }

    /// 从声明构建，声明中出现的引用类型会登记到 `loader`
    pub fn from_decl(decl: &InterfaceDecl, mut loader: TypeLoader) -> Result<Self> {
        if decl.name.trim().is_empty() {
            return Err(CoreError::InvalidDeclaration("接口名不能为空".to_string()));
        }
        let operations = decl
            .operations
            .iter()
            .map(|op| Operation::from_decl(op, &mut loader))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: decl.name.clone(),
            description: decl.description.clone(),
            object_name: decl.object_name.clone(),
            operations,
            loader,
        })
    }

    /// 接口名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 接口上的描述注解
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 接口上的名称模板注解
    pub fn object_name(&self) -> Option<&str> {
        self.object_name.as_deref()
    }

    /// 全部操作（声明顺序）
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// 接口的类型加载上下文
    pub fn loader(&self) -> &TypeLoader {
        &self.loader
    }

    /// 精确查找：名称与参数类型列表都必须相等
    pub fn method(&self, name: &str, parameter_types: &[ConcreteType]) -> Result<&Operation> {
        self.operations
            .iter()
            .find(|op| op.name == name && op.parameter_types == parameter_types)
            .ok_or_else(|| CoreError::MemberNotFound {
                owner: self.name.clone(),
                member: name.to_string(),
            })
    }
}

/// 接口构建器
#[derive(Debug)]
pub struct InterfaceBuilder {
    decl: InterfaceDecl,
    loader: TypeLoader,
}

impl InterfaceBuilder {
    /// 创建新的构建器
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            decl: InterfaceDecl {
                name: name.into(),
                description: None,
                object_name: None,
                operations: vec![],
            },
            loader: TypeLoader::new(),
        }
    }

    /// 设置描述
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.decl.description = Some(description.into());
        self
    }

    /// 设置名称模板
    pub fn object_name(mut self, template: impl Into<String>) -> Self {
        self.decl.object_name = Some(template.into());
        self
    }

    /// 添加操作
    pub fn operation(mut self, operation: OperationDecl) -> Self {
        self.decl.operations.push(operation);
        self
    }

    /// 添加只读属性访问器 `get<Name>()`
    pub fn getter(self, attribute: &str, type_name: impl Into<String>) -> Self {
        self.operation(OperationDecl::new(format!("get{}", attribute)).returns(type_name))
    }

    /// 使用指定的类型加载上下文
    pub fn loader(mut self, loader: TypeLoader) -> Self {
        self.loader = loader;
        self
    }

    /// 构建接口
    pub fn build(self) -> Result<ManagementInterface> {
        ManagementInterface::from_decl(&self.decl, self.loader)
    }
}

/// 实现类型
///
/// 接口不能声明构造器，构造器注解从实现类型上读取。
#[derive(Debug, Clone)]
pub struct ImplementationType {
    name: String,
    constructors: Vec<Constructor>,
    loader: TypeLoader,
}

impl ImplementationType {
    /// 创建不带构造器的实现类型
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructors: vec![],
            loader: TypeLoader::new(),
        }
    }

    /// 从声明构建
    pub fn from_decl(decl: &ImplementationDecl, mut loader: TypeLoader) -> Result<Self> {
        if decl.name.trim().is_empty() {
            return Err(CoreError::InvalidDeclaration("实现类型名不能为空".to_string()));
        }
        let constructors = decl
            .constructors
            .iter()
            .map(|c| Constructor::from_decl(c, &mut loader))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: decl.name.clone(),
            constructors,
            loader,
        })
    }

    /// 添加构造器
    pub fn with_constructor(mut self, decl: ConstructorDecl) -> Result<Self> {
        let constructor = Constructor::from_decl(&decl, &mut self.loader)?;
        self.constructors.push(constructor);
        Ok(self)
    }

    /// 实现类型名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 全部构造器
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// 实现类型的类型加载上下文
    pub fn loader(&self) -> &TypeLoader {
        &self.loader
    }

    /// 精确查找构造器
    pub fn constructor(&self, parameter_types: &[ConcreteType]) -> Result<&Constructor> {
        self.constructors
            .iter()
            .find(|c| c.parameter_types == parameter_types)
            .ok_or_else(|| CoreError::MemberNotFound {
                owner: self.name.clone(),
                member: "<init>".to_string(),
            })
    }
}
