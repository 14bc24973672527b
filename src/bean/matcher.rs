//! 签名匹配器
//!
//! 把注册中心元数据里的类型描述符列表还原为具体类型列表，
//! 再按 名称 + 参数类型列表 精确定位接口上的操作或实现类型上的构造器。
//!
//! 匹配是尽力而为的元数据增强：任何失败（未知类型、无此成员）
//! 都只返回 `None`，由调用方回退到默认值。

use super::interface::{Constructor, ImplementationType, ManagementInterface, Operation};
use super::types::{primitive_type, ConcreteType, TypeLoader};
use crate::utils::Result;

/// 解析单个类型描述符
///
/// 先查基本类型关键字表（按名加载无法处理裸关键字），
/// 再交给加载上下文按名加载。
///
/// # Errors
///
/// 无法解析时返回 `TypeNotFound`
pub fn resolve_type(descriptor: &str, loader: &TypeLoader) -> Result<ConcreteType> {
    match primitive_type(descriptor) {
        Some(p) => Ok(ConcreteType::Primitive(p)),
        None => loader.load(descriptor),
    }
}

/// 解析有序的类型描述符列表
pub fn resolve_types<S: AsRef<str>>(descriptors: &[S], loader: &TypeLoader) -> Result<Vec<ConcreteType>> {
    descriptors
        .iter()
        .map(|d| resolve_type(d.as_ref(), loader))
        .collect()
}

/// 在接口上查找操作
pub fn find_operation<'a, S: AsRef<str>>(
    interface: &'a ManagementInterface,
    name: &str,
    descriptors: &[S],
) -> Option<&'a Operation> {
    let lookup = resolve_types(descriptors, interface.loader())
        .and_then(|types| interface.method(name, &types));

    match lookup {
        Ok(op) => Some(op),
        Err(e) => {
            tracing::trace!(interface = interface.name(), operation = name, "签名未匹配: {}", e);
            None
        }
    }
}

/// 在实现类型上查找构造器
pub fn find_constructor<'a, S: AsRef<str>>(
    implementation: &'a ImplementationType,
    descriptors: &[S],
) -> Option<&'a Constructor> {
    let lookup = resolve_types(descriptors, implementation.loader())
        .and_then(|types| implementation.constructor(&types));

    match lookup {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::trace!(implementation = implementation.name(), "构造器签名未匹配: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean::interface::{ConstructorDecl, OperationDecl, ParameterDecl};
    use crate::bean::types::PrimitiveType;
    use crate::utils::CoreError;

    fn overloaded_interface() -> ManagementInterface {
        ManagementInterface::builder("com.example.CounterMBean")
            .operation(OperationDecl::new("foo").param(ParameterDecl::new("int")).description("int 版本"))
            .operation(OperationDecl::new("foo").param(ParameterDecl::new("java.lang.Integer")).description("装箱版本"))
            .operation(
                OperationDecl::new("copy")
                    .param(ParameterDecl::new("java.lang.String"))
                    .param(ParameterDecl::new("boolean")),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolve_primitive_descriptors() {
        let loader = TypeLoader::empty();
        for p in PrimitiveType::ALL {
            assert_eq!(
                resolve_type(p.keyword(), &loader).unwrap(),
                ConcreteType::Primitive(p)
            );
        }
    }

    #[test]
    fn test_resolve_unknown_type_fails() {
        let loader = TypeLoader::new();
        let err = resolve_type("com.example.Nope", &loader).unwrap_err();
        assert!(matches!(err, CoreError::TypeNotFound(_)));
    }

    #[test]
    fn test_find_operation_exact_match() {
        let iface = overloaded_interface();

        let op = find_operation(&iface, "foo", &["int"]).unwrap();
        assert_eq!(op.annotations.description.as_deref(), Some("int 版本"));

        let op = find_operation(&iface, "foo", &["java.lang.Integer"]).unwrap();
        assert_eq!(op.annotations.description.as_deref(), Some("装箱版本"));
    }

    #[test]
    fn test_find_operation_rejects_near_misses() {
        let iface = overloaded_interface();
        let none: [&str; 0] = [];

        assert!(find_operation(&iface, "foo", &["long"]).is_none());
        assert!(find_operation(&iface, "foo", &none).is_none());
        assert!(find_operation(&iface, "foo", &["int", "int"]).is_none());
        assert!(find_operation(&iface, "Foo", &["int"]).is_none());
        assert!(find_operation(&iface, "copy", &["boolean", "java.lang.String"]).is_none());
        assert!(find_operation(&iface, "copy", &["java.lang.String", "boolean"]).is_some());
    }

    #[test]
    fn test_find_operation_unknown_type_is_absent() {
        let iface = overloaded_interface();
        assert!(find_operation(&iface, "foo", &["com.example.Unknown"]).is_none());
    }

    #[test]
    fn test_find_constructor() {
        let implementation = ImplementationType::new("com.example.Counter")
            .with_constructor(ConstructorDecl::new().param(ParameterDecl::new("long")))
            .unwrap();

        assert!(find_constructor(&implementation, &["long"]).is_some());
        assert!(find_constructor(&implementation, &["int"]).is_none());
        assert!(find_constructor(&implementation, &["java.lang.Long"]).is_none());
        let none: [&str; 0] = [];
        assert!(find_constructor(&implementation, &none).is_none());
    }
}
