//! 注册中心
//!
//! 对象名称、注册中心边界与注册管理。

pub mod object_name;
pub mod registration;
pub mod registry;

pub use object_name::{format_name, NameValue, ObjectName};
pub use registration::{Registration, RegistrationState};
pub use registry::{platform_server, BeanServer, InMemoryBeanServer, ManagedBean, RegisteredBean, DEFAULT_DOMAIN};
