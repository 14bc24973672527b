//! 受管实例注册中心
//!
//! [`BeanServer`] 是外部注册中心的边界：按对象名称注册、注销实例。
//! [`InMemoryBeanServer`] 是进程内实现，提供名称查询与元数据内省。

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::object_name::ObjectName;
use crate::bean::BeanInfo;
use crate::utils::{CoreError, Result};

/// 默认域名
pub const DEFAULT_DOMAIN: &str = "DefaultDomain";

/// 可被注册中心内省的受管实例
pub trait ManagedBean: Send + Sync {
    /// 实现类型名
    fn class_name(&self) -> &str;

    /// 交给注册中心的最终元数据
    fn bean_info(&self) -> BeanInfo;
}

/// 注册中心接口
#[async_trait]
pub trait BeanServer: Send + Sync {
    /// 以指定名称注册实例
    ///
    /// # Errors
    ///
    /// 名称已被占用时返回 `InstanceAlreadyExists`
    async fn register_instance(&self, name: ObjectName, instance: Arc<dyn ManagedBean>) -> Result<()>;

    /// 注销指定名称的实例
    ///
    /// # Errors
    ///
    /// 名称未注册时返回 `InstanceNotFound`
    async fn unregister_instance(&self, name: &ObjectName) -> Result<()>;

    /// 名称是否已注册
    async fn is_registered(&self, name: &ObjectName) -> bool;
}

/// 注册记录
#[derive(Clone)]
pub struct RegisteredBean {
    /// 实例
    pub instance: Arc<dyn ManagedBean>,
    /// 注册时间
    pub registered_at: DateTime<Utc>,
}

impl std::fmt::Debug for RegisteredBean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredBean")
            .field("class_name", &self.instance.class_name())
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

/// 进程内注册中心
///
/// 克隆后共享同一份注册表。域名为空的名称按默认域名登记和查找。
#[derive(Debug, Clone)]
pub struct InMemoryBeanServer {
    /// 已注册实例：对象名称 -> 注册记录
    beans: Arc<RwLock<HashMap<ObjectName, RegisteredBean>>>,

    /// 默认域名
    default_domain: String,
}

impl InMemoryBeanServer {
    /// 创建注册中心
    pub fn new(default_domain: impl Into<String>) -> Self {
        Self {
            beans: Arc::new(RwLock::new(HashMap::new())),
            default_domain: default_domain.into(),
        }
    }

    /// 默认域名
    pub fn default_domain(&self) -> &str {
        &self.default_domain
    }

    /// 空域名替换为默认域名
    fn qualify<'a>(&self, name: &'a ObjectName) -> Cow<'a, ObjectName> {
        if name.domain().is_empty() {
            Cow::Owned(name.with_domain(&self.default_domain))
        } else {
            Cow::Borrowed(name)
        }
    }

    /// 已注册实例数量
    pub async fn count(&self) -> usize {
        let beans = self.beans.read().await;
        beans.len()
    }

    /// 获取注册记录
    pub async fn get(&self, name: &ObjectName) -> Option<RegisteredBean> {
        let beans = self.beans.read().await;
        beans.get(self.qualify(name).as_ref()).cloned()
    }

    /// 获取实例元数据
    ///
    /// # Errors
    ///
    /// 名称未注册时返回 `InstanceNotFound`
    pub async fn bean_info(&self, name: &ObjectName) -> Result<BeanInfo> {
        let beans = self.beans.read().await;
        beans
            .get(self.qualify(name).as_ref())
            .map(|b| b.instance.bean_info())
            .ok_or_else(|| CoreError::InstanceNotFound(name.to_string()))
    }

    /// 查询名称，`domain` 为 None 时返回全部
    pub async fn query_names(&self, domain: Option<&str>) -> Vec<ObjectName> {
        let beans = self.beans.read().await;
        let mut names: Vec<ObjectName> = beans
            .keys()
            .filter(|n| domain.map_or(true, |d| n.domain() == d))
            .cloned()
            .collect();
        names.sort_by_key(|n| n.canonical_name());
        names
    }

    /// 全部域名（去重、排序）
    pub async fn domains(&self) -> Vec<String> {
        let beans = self.beans.read().await;
        let mut domains: Vec<String> = beans.keys().map(|n| n.domain().to_string()).collect();
        domains.sort();
        domains.dedup();
        domains
    }
}

impl Default for InMemoryBeanServer {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN)
    }
}

#[async_trait]
impl BeanServer for InMemoryBeanServer {
    async fn register_instance(&self, name: ObjectName, instance: Arc<dyn ManagedBean>) -> Result<()> {
        let name = match self.qualify(&name) {
            Cow::Owned(qualified) => qualified,
            Cow::Borrowed(_) => name,
        };
        let mut beans = self.beans.write().await;
        if beans.contains_key(&name) {
            return Err(CoreError::InstanceAlreadyExists(name.to_string()));
        }

        tracing::debug!(object_name = %name, class_name = instance.class_name(), "实例已注册");
        beans.insert(
            name,
            RegisteredBean {
                instance,
                registered_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn unregister_instance(&self, name: &ObjectName) -> Result<()> {
        let mut beans = self.beans.write().await;
        match beans.remove(self.qualify(name).as_ref()) {
            Some(_) => {
                tracing::debug!(object_name = %name, "实例已注销");
                Ok(())
            }
            None => Err(CoreError::InstanceNotFound(name.to_string())),
        }
    }

    async fn is_registered(&self, name: &ObjectName) -> bool {
        let beans = self.beans.read().await;
        beans.contains_key(self.qualify(name).as_ref())
    }
}

/// 进程级共享注册中心
static PLATFORM_SERVER: LazyLock<Arc<InMemoryBeanServer>> =
    LazyLock::new(|| Arc::new(InMemoryBeanServer::default()));

/// 获取进程级共享注册中心
pub fn platform_server() -> Arc<InMemoryBeanServer> {
    Arc::clone(&PLATFORM_SERVER)
}
