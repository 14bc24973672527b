//! 注解驱动的受管实例
//!
//! [`AnnotatedBean`] 包装一个业务对象，把管理接口上的注解应用到
//! 交给注册中心的元数据上。若接口声明了名称模板，构造时即按模板
//! 注册到注册中心；[`AnnotatedBean::unregister`] 负责注销。
//!
//! 注册和注销失败只记录警告日志，不会阻止实例的构造或销毁。

use std::sync::Arc;

use tokio::sync::Mutex;

use super::info::BeanInfo;
use super::interface::{ImplementationType, ManagementInterface};
use super::introspector;
use super::resolver::{AnnotatedMetadata, MetadataCustomizer};
use crate::server::object_name::NameValue;
use crate::server::registration::{Registration, RegistrationState};
use crate::server::registry::{BeanServer, ManagedBean};
use crate::utils::error::CoreError;

const NOT_REGISTERED: &str = " not registered";
const NOT_UNREGISTERED: &str = " not unregistered";

/// 注册类失败记为警告，注册中心自身的其他错误记为错误
fn log_failure(e: &CoreError, message: std::fmt::Arguments<'_>) {
    if e.is_registration_failure() {
        tracing::warn!(error_code = e.error_code(), "{}", message);
    } else {
        tracing::error!(error_code = e.error_code(), "{}", message);
    }
}

/// 注解驱动的受管实例
pub struct AnnotatedBean<T> {
    /// 被管理的业务对象
    target: T,
    metadata: AnnotatedMetadata,
    /// 内省得到的通用元数据
    standard_info: BeanInfo,
    registration: Mutex<Registration>,
}

impl<T> AnnotatedBean<T>
where
    T: Send + Sync + 'static,
{
    /// 创建受管实例
    ///
    /// 接口声明了名称模板时，用 `values` 格式化名称并注册自身。
    /// 注册失败只记录日志。
    pub async fn new(
        target: T,
        interface: Arc<ManagementInterface>,
        implementation: Arc<ImplementationType>,
        server: Arc<dyn BeanServer>,
        values: &[NameValue<'_>],
    ) -> Arc<Self> {
        let standard_info = introspector::introspect(&interface, &implementation);
        let template = interface.object_name().map(str::to_string);

        let bean = Arc::new(Self {
            target,
            metadata: AnnotatedMetadata::new(interface, implementation),
            standard_info,
            registration: Mutex::new(Registration::new(server)),
        });

        if let Some(template) = template {
            let instance: Arc<dyn ManagedBean> = bean.clone();
            let mut registration = bean.registration.lock().await;
            match registration.register(&template, values, instance).await {
                Ok(name) => {
                    tracing::info!(object_name = %name, interface = bean.interface().name(), "受管实例已注册");
                }
                Err(e) => {
                    let name = registration.name().unwrap_or(&template);
                    log_failure(&e, format_args!("{}{}: {}", name, NOT_REGISTERED, e));
                }
            }
        } else {
            tracing::debug!(interface = bean.interface().name(), "接口未声明名称模板，跳过注册");
        }

        bean
    }

    /// 从注册中心注销
    ///
    /// 从未注册（包括未声明名称模板）时只记录一条失败日志。
    pub async fn unregister(&self) {
        let mut registration = self.registration.lock().await;
        match registration.unregister().await {
            Ok(()) => {
                tracing::info!(object_name = registration.name().unwrap_or_default(), "受管实例已注销");
            }
            Err(e) => {
                let name = registration.name().unwrap_or("null");
                log_failure(&e, format_args!("{}{}: {}", name, NOT_UNREGISTERED, e));
            }
        }
    }

    /// 当前注册状态
    pub async fn registration_state(&self) -> RegistrationState {
        self.registration.lock().await.state()
    }

    /// 格式化后的对象名称
    pub async fn object_name(&self) -> Option<String> {
        self.registration.lock().await.name().map(str::to_string)
    }

    /// 最近一次注册或注销失败的原因
    pub async fn last_registration_error(&self) -> Option<String> {
        self.registration.lock().await.last_error().map(str::to_string)
    }
}

impl<T> AnnotatedBean<T> {
    /// 被管理的业务对象
    pub fn target(&self) -> &T {
        &self.target
    }

    /// 管理接口
    pub fn interface(&self) -> &ManagementInterface {
        self.metadata.interface()
    }

    /// 元数据解析器
    pub fn metadata(&self) -> &AnnotatedMetadata {
        &self.metadata
    }

    /// 未经注解加工的通用元数据
    pub fn standard_info(&self) -> &BeanInfo {
        &self.standard_info
    }
}

impl<T> ManagedBean for AnnotatedBean<T>
where
    T: Send + Sync + 'static,
{
    fn class_name(&self) -> &str {
        self.metadata.implementation().name()
    }

    fn bean_info(&self) -> BeanInfo {
        self.metadata.customize(self.standard_info.clone())
    }
}
