//! 元数据解析器
//!
//! 注册中心在组装受管实例元数据时，会针对每一项描述性内容回调
//! [`MetadataCustomizer`] 的钩子。每个钩子的默认实现直接返回注册中心
//! 传入的默认值；[`AnnotatedMetadata`] 则先查找接口上声明的注解，
//! 找不到时再回退到默认值。
//!
//! 所有钩子都是纯函数且不会失败：任何查找失败都视为"无注解"。

use std::sync::Arc;

use super::info::{AttributeInfo, BeanInfo, ConstructorInfo, OperationInfo, ParameterInfo};
use super::interface::{
    Constructor, ImplementationType, Impact, ManagementInterface, Operation, ParameterAnnotations,
};
use super::matcher;

/// 元数据定制钩子
///
/// 默认实现即标准行为：原样返回注册中心提供的值。
pub trait MetadataCustomizer: Send + Sync {
    /// 接口级描述
    fn bean_description(&self, info: &BeanInfo) -> String {
        info.description.clone()
    }

    /// 构造器描述
    fn constructor_description(&self, info: &ConstructorInfo) -> String {
        info.description.clone()
    }

    /// 构造器参数描述
    fn constructor_parameter_description(
        &self,
        _ctor: &ConstructorInfo,
        param: &ParameterInfo,
        _sequence: usize,
    ) -> String {
        param.description.clone()
    }

    /// 构造器参数名
    fn constructor_parameter_name(
        &self,
        _ctor: &ConstructorInfo,
        param: &ParameterInfo,
        _sequence: usize,
    ) -> String {
        param.name.clone()
    }

    /// 属性描述
    fn attribute_description(&self, info: &AttributeInfo) -> String {
        info.description.clone()
    }

    /// 操作描述
    fn operation_description(&self, op: &OperationInfo) -> String {
        op.description.clone()
    }

    /// 操作影响分类
    fn operation_impact(&self, op: &OperationInfo) -> Impact {
        op.impact
    }

    /// 操作参数描述
    fn operation_parameter_description(
        &self,
        _op: &OperationInfo,
        param: &ParameterInfo,
        _sequence: usize,
    ) -> String {
        param.description.clone()
    }

    /// 操作参数名
    fn operation_parameter_name(
        &self,
        _op: &OperationInfo,
        param: &ParameterInfo,
        _sequence: usize,
    ) -> String {
        param.name.clone()
    }

    /// 依次应用全部钩子，得到最终交给注册中心的元数据
    fn customize(&self, info: BeanInfo) -> BeanInfo {
        let description = self.bean_description(&info);

        let attributes = info
            .attributes
            .iter()
            .map(|a| AttributeInfo {
                description: self.attribute_description(a),
                ..a.clone()
            })
            .collect();

        let constructors = info
            .constructors
            .iter()
            .map(|c| {
                let signature = c
                    .signature
                    .iter()
                    .enumerate()
                    .map(|(i, p)| ParameterInfo {
                        name: self.constructor_parameter_name(c, p, i),
                        type_name: p.type_name.clone(),
                        description: self.constructor_parameter_description(c, p, i),
                    })
                    .collect();
                ConstructorInfo {
                    name: c.name.clone(),
                    description: self.constructor_description(c),
                    signature,
                }
            })
            .collect();

        let operations = info
            .operations
            .iter()
            .map(|op| {
                let signature = op
                    .signature
                    .iter()
                    .enumerate()
                    .map(|(i, p)| ParameterInfo {
                        name: self.operation_parameter_name(op, p, i),
                        type_name: p.type_name.clone(),
                        description: self.operation_parameter_description(op, p, i),
                    })
                    .collect();
                OperationInfo {
                    name: op.name.clone(),
                    description: self.operation_description(op),
                    signature,
                    return_type: op.return_type.clone(),
                    impact: self.operation_impact(op),
                }
            })
            .collect();

        BeanInfo {
            class_name: info.class_name,
            description,
            attributes,
            constructors,
            operations,
        }
    }
}

/// 标准元数据：不做任何定制
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetadata;

impl MetadataCustomizer for StandardMetadata {}

/// 属性读访问器名：`get` + 首字母大写的属性名
///
/// 只处理 ASCII 首字母；不考虑 `is` 前缀访问器。空属性名返回 None。
pub fn accessor_name(attribute: &str) -> Option<String> {
    let mut chars = attribute.chars();
    let first = chars.next()?;
    Some(format!("get{}{}", first.to_ascii_uppercase(), chars.as_str()))
}

/// 基于注解的元数据解析器
///
/// 操作、属性与参数只读取接口上的注解；构造器注解从实现类型读取。
#[derive(Debug, Clone)]
pub struct AnnotatedMetadata {
    interface: Arc<ManagementInterface>,
    implementation: Arc<ImplementationType>,
}

impl AnnotatedMetadata {
    /// 创建解析器
    pub fn new(interface: Arc<ManagementInterface>, implementation: Arc<ImplementationType>) -> Self {
        Self {
            interface,
            implementation,
        }
    }

    /// 管理接口
    pub fn interface(&self) -> &ManagementInterface {
        &self.interface
    }

    /// 实现类型
    pub fn implementation(&self) -> &ImplementationType {
        &self.implementation
    }

    fn operation_for(&self, op: &OperationInfo) -> Option<&Operation> {
        matcher::find_operation(&self.interface, &op.name, op.parameter_types().as_slice())
    }

    fn constructor_for(&self, info: &ConstructorInfo) -> Option<&Constructor> {
        matcher::find_constructor(&self.implementation, info.parameter_types().as_slice())
    }

    fn operation_parameter(&self, op: &OperationInfo, sequence: usize) -> Option<&ParameterAnnotations> {
        self.operation_for(op)?.annotations.parameter(sequence)
    }

    fn constructor_parameter(&self, info: &ConstructorInfo, sequence: usize) -> Option<&ParameterAnnotations> {
        self.constructor_for(info)?.annotations.parameter(sequence)
    }
}

impl MetadataCustomizer for AnnotatedMetadata {
    fn bean_description(&self, info: &BeanInfo) -> String {
        match self.interface.description() {
            Some(d) => d.to_string(),
            None => info.description.clone(),
        }
    }

    fn constructor_description(&self, info: &ConstructorInfo) -> String {
        self.constructor_for(info)
            .and_then(|c| c.annotations.description.clone())
            .unwrap_or_else(|| info.description.clone())
    }

    fn constructor_parameter_description(
        &self,
        ctor: &ConstructorInfo,
        param: &ParameterInfo,
        sequence: usize,
    ) -> String {
        self.constructor_parameter(ctor, sequence)
            .and_then(|p| p.description.clone())
            .unwrap_or_else(|| param.description.clone())
    }

    fn constructor_parameter_name(
        &self,
        ctor: &ConstructorInfo,
        param: &ParameterInfo,
        sequence: usize,
    ) -> String {
        self.constructor_parameter(ctor, sequence)
            .and_then(|p| p.name.clone())
            .unwrap_or_else(|| param.name.clone())
    }

    fn attribute_description(&self, info: &AttributeInfo) -> String {
        let getter = accessor_name(&info.name).and_then(|getter| {
            let none: [&str; 0] = [];
            matcher::find_operation(&self.interface, &getter, &none)
        });

        match getter.and_then(|m| m.annotations.description.clone()) {
            Some(d) => d,
            None => {
                tracing::trace!(attribute = %info.name, "属性无描述注解，使用默认值");
                info.description.clone()
            }
        }
    }

    fn operation_description(&self, op: &OperationInfo) -> String {
        self.operation_for(op)
            .and_then(|m| m.annotations.description.clone())
            .unwrap_or_else(|| op.description.clone())
    }

    fn operation_impact(&self, op: &OperationInfo) -> Impact {
        self.operation_for(op)
            .and_then(|m| m.annotations.impact)
            .unwrap_or(op.impact)
    }

    fn operation_parameter_description(
        &self,
        op: &OperationInfo,
        param: &ParameterInfo,
        sequence: usize,
    ) -> String {
        // 无描述注解时以参数名作描述（含名称注解）
        self.operation_parameter(op, sequence)
            .and_then(|p| p.description.clone())
            .unwrap_or_else(|| self.operation_parameter_name(op, param, sequence))
    }

    fn operation_parameter_name(
        &self,
        op: &OperationInfo,
        param: &ParameterInfo,
        sequence: usize,
    ) -> String {
        self.operation_parameter(op, sequence)
            .and_then(|p| p.name.clone())
            .unwrap_or_else(|| param.name.clone())
    }
}
