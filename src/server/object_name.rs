//! 对象名称
//!
//! 受管实例在注册中心中以对象名称寻址，格式为
//! `domain:key=value[,key=value...]`。相等性按规范形式比较
//! （键属性按键名排序），因此 `d:b=2,a=1` 与 `d:a=1,b=2` 是同一个名称。

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::{CoreError, Result};

/// 域名：不含 `:`、换行及通配符
static DOMAIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^:*?\n]*$").expect("Invalid domain regex"));

/// 键：非空，不含 `:,=*?` 及换行
static KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^:,=*?\n]+$").expect("Invalid key regex"));

/// 未加引号的值：非空，不含 `:,="*?` 及换行
static VALUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^:,="*?\n]+$"#).expect("Invalid value regex"));

/// 加引号的值
static QUOTED_VALUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"([^"\\\n]|\\.)*"$"#).expect("Invalid quoted value regex"));

/// 对象名称
#[derive(Debug, Clone)]
pub struct ObjectName {
    /// 原始写法
    name: String,
    domain: String,
    /// 键属性，按键名排序
    properties: BTreeMap<String, String>,
}

impl ObjectName {
    /// 解析对象名称
    ///
    /// # Errors
    ///
    /// 名称不符合 `domain:key=value[,key=value...]` 格式时返回 `MalformedObjectName`
    pub fn parse(name: &str) -> Result<Self> {
        let malformed = |reason: &str| CoreError::MalformedObjectName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let (domain, key_list) = name.split_once(':').ok_or_else(|| malformed("缺少域名分隔符 ':'"))?;

        if !DOMAIN_REGEX.is_match(domain) {
            return Err(malformed("域名包含非法字符"));
        }
        if key_list.is_empty() {
            return Err(malformed("缺少键属性"));
        }

        let mut properties = BTreeMap::new();
        for property in Self::split_properties(key_list) {
            let (key, value) = property
                .split_once('=')
                .ok_or_else(|| malformed("键属性缺少 '='"))?;

            if !KEY_REGEX.is_match(key) {
                return Err(malformed("键为空或包含非法字符"));
            }
            if !(VALUE_REGEX.is_match(value) || QUOTED_VALUE_REGEX.is_match(value)) {
                return Err(malformed("值为空或包含非法字符"));
            }
            if properties.insert(key.to_string(), value.to_string()).is_some() {
                return Err(malformed("键重复"));
            }
        }

        Ok(Self {
            name: name.to_string(),
            domain: domain.to_string(),
            properties,
        })
    }

    /// 按逗号切分键属性，引号内的逗号不切分
    fn split_properties(key_list: &str) -> Vec<&str> {
        let mut parts = Vec::new();
        let mut start = 0;
        let mut in_quotes = false;
        let mut escaped = false;
        for (i, c) in key_list.char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' if in_quotes => escaped = true,
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => {
                    parts.push(&key_list[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        parts.push(&key_list[start..]);
        parts
    }

    /// 域名
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// 替换域名，键属性保持不变
    pub fn with_domain(&self, domain: &str) -> Self {
        Self {
            name: format!("{}{}", domain, &self.name[self.domain.len()..]),
            domain: domain.to_string(),
            properties: self.properties.clone(),
        }
    }

    /// 按键取值
    pub fn key_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// 原始写法
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// 规范形式：键属性按键名排序
    pub fn canonical_name(&self) -> String {
        let properties = self
            .properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}:{}", self.domain, properties)
    }
}

impl PartialEq for ObjectName {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain && self.properties == other.properties
    }
}

impl Eq for ObjectName {}

impl Hash for ObjectName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.domain.hash(state);
        self.properties.hash(state);
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::str::FromStr for ObjectName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// 名称模板的替换值
pub type NameValue<'a> = &'a (dyn fmt::Display + Sync);

/// 按 printf 风格格式化名称模板
///
/// 支持 `%s`（依次取下一个值）与 `%%`（字面百分号）。
/// 多余的值被忽略。
///
/// # Errors
///
/// 值不足或出现其他转换符时返回 `MalformedNameTemplate`
pub fn format_name(template: &str, values: &[NameValue<'_>]) -> Result<String> {
    let malformed = |reason: String| CoreError::MalformedNameTemplate {
        template: template.to_string(),
        reason,
    };

    let mut out = String::with_capacity(template.len());
    let mut next = values.iter();
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => {
                let value = next
                    .next()
                    .ok_or_else(|| malformed(format!("缺少第 {} 个替换值", values.len() + 1)))?;
                out.push_str(&value.to_string());
            }
            Some('%') => out.push('%'),
            Some(other) => return Err(malformed(format!("不支持的转换符 '%{}'", other))),
            None => return Err(malformed("模板以单独的 '%' 结尾".to_string())),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name() {
        let name = format_name("domain:type=Worker,name=%s", &[&"w1"]).unwrap();
        assert_eq!(name, "domain:type=Worker,name=w1");

        let name = format_name("d:type=%s,id=%s", &[&"Pool", &7]).unwrap();
        assert_eq!(name, "d:type=Pool,id=7");

        // 无占位符、多余的值
        assert_eq!(format_name("d:type=Static", &[&"unused"]).unwrap(), "d:type=Static");
        assert_eq!(format_name("d:pct=100%%", &[]).unwrap(), "d:pct=100%");
    }

    #[test]
    fn test_format_name_errors() {
        assert!(matches!(
            format_name("d:name=%s", &[]),
            Err(CoreError::MalformedNameTemplate { .. })
        ));
        assert!(format_name("d:id=%d", &[&1]).is_err());
        assert!(format_name("d:id=%", &[]).is_err());
    }

    #[test]
    fn test_parse_object_name() {
        let name = ObjectName::parse("domain:type=Worker,name=w1").unwrap();
        assert_eq!(name.domain(), "domain");
        assert_eq!(name.key_property("type"), Some("Worker"));
        assert_eq!(name.key_property("name"), Some("w1"));
        assert_eq!(name.key_property("missing"), None);
        assert_eq!(name.to_string(), "domain:type=Worker,name=w1");
        assert_eq!(name.canonical_name(), "domain:name=w1,type=Worker");
    }

    #[test]
    fn test_quoted_values() {
        let name = ObjectName::parse(r#"d:path="a,b=c",type=X"#).unwrap();
        assert_eq!(name.key_property("path"), Some(r#""a,b=c""#));
        assert_eq!(name.key_property("type"), Some("X"));
    }

    #[test]
    fn test_equality_uses_canonical_form() {
        let a = ObjectName::parse("d:b=2,a=1").unwrap();
        let b: ObjectName = "d:a=1,b=2".parse().unwrap();
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_with_domain() {
        let name = ObjectName::parse(":type=Worker,name=w1").unwrap();
        let qualified = name.with_domain("com.example");
        assert_eq!(qualified.as_str(), "com.example:type=Worker,name=w1");
        assert_eq!(qualified, ObjectName::parse("com.example:name=w1,type=Worker").unwrap());
        assert_eq!(qualified.key_property("name"), Some("w1"));
    }

    #[test]
    fn test_malformed_object_names() {
        for bad in [
            "no-colon",
            "d:",
            "d:key",
            "d:=v",
            "d:k=",
            "d:k=v,",
            "d:k=v,k=w",
            "d:k=a*b",
            "d:k=v:w",
            "d*:k=v",
        ] {
            assert!(
                matches!(ObjectName::parse(bad), Err(CoreError::MalformedObjectName { .. })),
                "expected '{}' to be rejected",
                bad
            );
        }
    }
}
