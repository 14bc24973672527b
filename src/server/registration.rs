//! 注册管理
//!
//! 按名称模板生成对象名称，把实例注册到注册中心，并在需要时注销。
//!
//! 状态机：`Unregistered -> Registered -> Unregistered`。
//! 注册与注销都返回 `Result`，由持有者检查并记录日志；
//! 失败不会影响持有者的构造或销毁。

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::object_name::{format_name, NameValue, ObjectName};
use super::registry::{BeanServer, ManagedBean};
use crate::utils::{CoreError, Result};

/// 注册状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationState {
    /// 未注册
    Unregistered,
    /// 已注册
    Registered,
}

impl Default for RegistrationState {
    fn default() -> Self {
        RegistrationState::Unregistered
    }
}

/// 一个实例的注册记录
pub struct Registration {
    server: Arc<dyn BeanServer>,
    /// 格式化后的名称（格式化失败时为 None）
    name: Option<String>,
    /// 注册成功的对象名称
    registered: Option<ObjectName>,
    state: RegistrationState,
    last_error: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl Registration {
    /// 创建未注册的记录
    pub fn new(server: Arc<dyn BeanServer>) -> Self {
        Self {
            server,
            name: None,
            registered: None,
            state: RegistrationState::Unregistered,
            last_error: None,
        }
    }

    /// 当前状态
    pub fn state(&self) -> RegistrationState {
        self.state
    }

    /// 格式化后的名称
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 最近一次失败的错误信息
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 按模板格式化名称并注册实例
    ///
    /// # Errors
    ///
    /// - 模板格式化失败：`MalformedNameTemplate`
    /// - 名称不合法：`MalformedObjectName`
    /// - 注册中心拒绝（如名称已占用）：注册中心返回的错误
    pub async fn register(
        &mut self,
        template: &str,
        values: &[NameValue<'_>],
        instance: Arc<dyn ManagedBean>,
    ) -> Result<ObjectName> {
        let result = self.try_register(template, values, instance).await;
        self.record(&result);
        result
    }

    async fn try_register(
        &mut self,
        template: &str,
        values: &[NameValue<'_>],
        instance: Arc<dyn ManagedBean>,
    ) -> Result<ObjectName> {
        let formatted = format_name(template, values)?;
        self.name = Some(formatted.clone());

        let object_name = ObjectName::parse(&formatted)?;
        self.server
            .register_instance(object_name.clone(), instance)
            .await?;

        self.state = RegistrationState::Registered;
        self.registered = Some(object_name.clone());
        Ok(object_name)
    }

    /// 注销实例
    ///
    /// 只移除本记录自己注册成功的名称；注册因名称冲突失败后再注销，
    /// 不会移除占用该名称的另一个实例。
    ///
    /// # Errors
    ///
    /// - 从未设置名称：`NameNotSet`
    /// - 当前未处于已注册状态，或注册中心中已不存在该名称：`InstanceNotFound`
    pub async fn unregister(&mut self) -> Result<()> {
        let result = self.try_unregister().await;
        self.record(&result);
        result
    }

    async fn try_unregister(&mut self) -> Result<()> {
        let name = self.name.as_deref().ok_or(CoreError::NameNotSet)?;
        // 注册失败的名称可能属于其他实例，不能代为注销
        let object_name = match (&self.state, &self.registered) {
            (RegistrationState::Registered, Some(object_name)) => object_name.clone(),
            _ => return Err(CoreError::InstanceNotFound(name.to_string())),
        };
        self.server.unregister_instance(&object_name).await?;
        self.state = RegistrationState::Unregistered;
        self.registered = None;
        Ok(())
    }

    fn record<T>(&mut self, result: &Result<T>) {
        self.last_error = result.as_ref().err().map(|e| e.to_string());
    }
}
