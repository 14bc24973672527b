//! 受管实例元数据
//!
//! 包含管理接口的类型模型、签名匹配、元数据解析以及注解驱动的受管实例。

pub mod annotated;
pub mod info;
pub mod interface;
pub mod introspector;
pub mod matcher;
pub mod parser;
pub mod resolver;
pub mod types;

pub use annotated::AnnotatedBean;
pub use info::{AttributeInfo, BeanInfo, ConstructorInfo, OperationInfo, ParameterInfo};
pub use interface::{
    Constructor, ConstructorDecl, Impact, ImplementationDecl, ImplementationType, InterfaceBuilder,
    InterfaceDecl, ManagementInterface, MemberAnnotations, Operation, OperationDecl, ParameterAnnotations,
    ParameterDecl,
};
pub use introspector::introspect;
pub use matcher::{find_constructor, find_operation, resolve_type, resolve_types};
pub use parser::{BeanDeclaration, DeclarationParser, ParsedDeclaration};
pub use resolver::{accessor_name, AnnotatedMetadata, MetadataCustomizer, StandardMetadata};
pub use types::{primitive_type, ConcreteType, PrimitiveType, TypeLoader};
