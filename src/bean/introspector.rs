//! 标准内省
//!
//! 按访问器命名约定从管理接口推导出注册中心的通用元数据：
//! - `getX()`（非 void）或 `isX()`（boolean）为可读属性 `X`
//! - `setX(T)`（void）为可写属性 `X`
//! - 其余方法为操作
//!
//! 这里生成的描述、参数名与影响分类都是通用默认值，
//! 由 [`MetadataCustomizer`](super::resolver::MetadataCustomizer) 再加工。

use super::info::{AttributeInfo, BeanInfo, ConstructorInfo, OperationInfo, ParameterInfo};
use super::interface::{Impact, ImplementationType, ManagementInterface, Operation};
use super::types::ConcreteType;

/// 接口级默认描述
pub const DEFAULT_BEAN_DESCRIPTION: &str = "Information on the management interface of the MBean";
/// 属性默认描述
pub const DEFAULT_ATTRIBUTE_DESCRIPTION: &str = "Attribute exposed for management";
/// 操作默认描述
pub const DEFAULT_OPERATION_DESCRIPTION: &str = "Operation exposed for management";
/// 构造器默认描述
pub const DEFAULT_CONSTRUCTOR_DESCRIPTION: &str = "Public constructor of the MBean";

/// 访问器分类
enum Accessor<'a> {
    Getter { attribute: &'a str, type_name: &'a str, is_getter: bool },
    Setter { attribute: &'a str, type_name: &'a str },
    None,
}

fn classify(op: &Operation) -> Accessor<'_> {
    let name = op.name.as_str();
    match (op.parameter_types.as_slice(), op.return_type.as_ref()) {
        ([], Some(ret)) => {
            if let Some(attribute) = name.strip_prefix("get").filter(|a| !a.is_empty()) {
                return Accessor::Getter {
                    attribute,
                    type_name: ret.descriptor(),
                    is_getter: false,
                };
            }
            if let Some(attribute) = name.strip_prefix("is").filter(|a| !a.is_empty()) {
                if ret.is_boolean() {
                    return Accessor::Getter {
                        attribute,
                        type_name: ret.descriptor(),
                        is_getter: true,
                    };
                }
            }
            Accessor::None
        }
        ([param], None) => match name.strip_prefix("set").filter(|a| !a.is_empty()) {
            Some(attribute) => Accessor::Setter {
                attribute,
                type_name: param.descriptor(),
            },
            None => Accessor::None,
        },
        _ => Accessor::None,
    }
}

fn default_signature(types: &[ConcreteType]) -> Vec<ParameterInfo> {
    types
        .iter()
        .enumerate()
        .map(|(i, t)| ParameterInfo::new(format!("p{}", i + 1), t.descriptor(), ""))
        .collect()
}

fn operation_info(op: &Operation) -> OperationInfo {
    OperationInfo {
        name: op.name.clone(),
        description: DEFAULT_OPERATION_DESCRIPTION.to_string(),
        signature: default_signature(&op.parameter_types),
        return_type: op
            .return_type
            .as_ref()
            .map(|t| t.descriptor().to_string())
            .unwrap_or_else(|| "void".to_string()),
        impact: Impact::Unknown,
    }
}

/// 合并属性访问器，读写类型不一致的 setter 退化为普通操作
fn merge_attribute(
    attributes: &mut Vec<AttributeInfo>,
    attribute: &str,
    type_name: &str,
    readable: bool,
    is_getter: bool,
) -> bool {
    match attributes.iter_mut().find(|a| a.name == attribute) {
        Some(existing) if existing.type_name == type_name => {
            existing.readable |= readable;
            existing.writable |= !readable;
            existing.is_getter |= is_getter;
            true
        }
        Some(_) => false,
        None => {
            attributes.push(AttributeInfo {
                name: attribute.to_string(),
                type_name: type_name.to_string(),
                description: DEFAULT_ATTRIBUTE_DESCRIPTION.to_string(),
                readable,
                writable: !readable,
                is_getter,
            });
            true
        }
    }
}

/// 生成通用元数据
pub fn introspect(interface: &ManagementInterface, implementation: &ImplementationType) -> BeanInfo {
    let mut attributes: Vec<AttributeInfo> = Vec::new();
    let mut operations = Vec::new();

    for op in interface.operations() {
        let merged = match classify(op) {
            Accessor::Getter {
                attribute,
                type_name,
                is_getter,
            } => merge_attribute(&mut attributes, attribute, type_name, true, is_getter),
            Accessor::Setter { attribute, type_name } => {
                merge_attribute(&mut attributes, attribute, type_name, false, false)
            }
            Accessor::None => false,
        };
        if !merged {
            operations.push(operation_info(op));
        }
    }

    let constructors = implementation
        .constructors()
        .iter()
        .map(|c| ConstructorInfo {
            name: implementation.name().to_string(),
            description: DEFAULT_CONSTRUCTOR_DESCRIPTION.to_string(),
            signature: default_signature(&c.parameter_types),
        })
        .collect();

    tracing::debug!(
        interface = interface.name(),
        attributes = attributes.len(),
        operations = operations.len(),
        "完成接口内省"
    );

    BeanInfo {
        class_name: implementation.name().to_string(),
        description: DEFAULT_BEAN_DESCRIPTION.to_string(),
        attributes,
        constructors,
        operations,
    }
}
