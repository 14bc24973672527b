//! 类型描述符与类型加载上下文
//!
//! 注册中心的元数据以字符串描述参数类型（引用类型为全限定名，
//! 基本类型为裸关键字）。本模块把这些描述符还原为可比较的具体类型。

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::utils::{CoreError, Result};

/// 基本类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// `byte`
    Byte,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `char`
    Char,
    /// `boolean`
    Boolean,
}

impl PrimitiveType {
    /// 全部八种基本类型
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Char,
        PrimitiveType::Boolean,
    ];

    /// 元数据中使用的关键字
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Char => "char",
            PrimitiveType::Boolean => "boolean",
        }
    }
}

/// 基本类型关键字表
///
/// 进程内只构建一次，之后只读，可被任意线程并发查询。
static PRIMITIVE_TYPES: LazyLock<HashMap<&'static str, PrimitiveType>> = LazyLock::new(|| {
    PrimitiveType::ALL
        .iter()
        .map(|p| (p.keyword(), *p))
        .collect()
});

/// 按关键字查找基本类型（精确匹配）
pub fn primitive_type(keyword: &str) -> Option<PrimitiveType> {
    PRIMITIVE_TYPES.get(keyword).copied()
}

/// 具体类型
///
/// 签名匹配只比较具体类型是否相等：`int`、`long` 与 `java.lang.Integer`
/// 互不相等，不做装箱或拓宽。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConcreteType {
    /// 基本类型
    Primitive(PrimitiveType),
    /// 引用类型（全限定名）
    Reference(String),
}

impl ConcreteType {
    /// 创建引用类型
    pub fn reference(name: impl Into<String>) -> Self {
        ConcreteType::Reference(name.into())
    }

    /// 类型描述符（与注册中心元数据中的写法一致）
    pub fn descriptor(&self) -> &str {
        match self {
            ConcreteType::Primitive(p) => p.keyword(),
            ConcreteType::Reference(name) => name,
        }
    }

    /// 是否为 boolean 基本类型
    pub fn is_boolean(&self) -> bool {
        matches!(self, ConcreteType::Primitive(PrimitiveType::Boolean))
    }
}

impl fmt::Display for ConcreteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor())
    }
}

/// 预置的常用引用类型
const WELL_KNOWN_TYPES: &[&str] = &[
    "java.lang.Object",
    "java.lang.String",
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
    "java.util.Date",
    "java.util.List",
    "java.util.Map",
    "javax.management.ObjectName",
];

/// 类型加载上下文
///
/// 记录某个接口声明所能"看见"的引用类型名称。
/// 元数据里出现的未知类型名无法加载，匹配因此失败。
#[derive(Debug, Clone)]
pub struct TypeLoader {
    known: HashSet<String>,
}

impl TypeLoader {
    /// 创建只含常用类型的加载上下文
    pub fn new() -> Self {
        Self {
            known: WELL_KNOWN_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 创建空的加载上下文
    pub fn empty() -> Self {
        Self {
            known: HashSet::new(),
        }
    }

    /// 登记一个引用类型
    pub fn register(&mut self, name: impl Into<String>) {
        self.known.insert(name.into());
    }

    /// 是否已登记该类型
    pub fn knows(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// 按名称加载引用类型
    ///
    /// 与语言层面的按名加载一样，裸基本类型关键字在这里无法加载。
    pub fn load(&self, name: &str) -> Result<ConcreteType> {
        if self.known.contains(name) {
            Ok(ConcreteType::reference(name))
        } else {
            Err(CoreError::TypeNotFound(name.to_string()))
        }
    }

    /// 已登记类型数量
    pub fn len(&self) -> usize {
        self.known.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

impl Default for TypeLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// 把声明里的类型描述符转成具体类型，并把引用类型登记到加载上下文
pub(crate) fn declare_type(descriptor: &str, loader: &mut TypeLoader) -> Result<ConcreteType> {
    let descriptor = descriptor.trim();
    if descriptor.is_empty() {
        return Err(CoreError::InvalidDeclaration("类型描述符不能为空".to_string()));
    }
    if let Some(p) = primitive_type(descriptor) {
        return Ok(ConcreteType::Primitive(p));
    }
    loader.register(descriptor);
    Ok(ConcreteType::reference(descriptor))
}
