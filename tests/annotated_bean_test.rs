//! 注解实例集成测试
//!
//! 覆盖从声明到注册中心内省的完整流程

use std::sync::Arc;

use chips_management::bean::{
    AnnotatedBean, ConstructorDecl, DeclarationParser, Impact, ImplementationType, ManagementInterface,
    OperationDecl, ParameterDecl,
};
use chips_management::bean::introspector::{
    DEFAULT_ATTRIBUTE_DESCRIPTION, DEFAULT_BEAN_DESCRIPTION, DEFAULT_CONSTRUCTOR_DESCRIPTION,
    DEFAULT_OPERATION_DESCRIPTION,
};
use chips_management::server::{BeanServer, InMemoryBeanServer, ObjectName, RegistrationState};
use chips_management::{ManagedBean, MetadataCustomizer, StandardMetadata};

const POOL_YAML: &str = r#"
interface:
  name: com.example.PoolMBean
  description: 连接池
  object_name: "com.example:type=Pool,name=%s"
  operations:
    - name: getSize
      returns: int
      description: 当前连接数
    - name: getIdle
      returns: int
    - name: resize
      impact: action_info
      description: 调整连接数
      parameters:
        - type: int
          name: size
          description: 新的连接数
        - type: long
    - name: reset
implementation:
  name: com.example.Pool
  constructors:
    - description: 按名称和容量创建
      parameters:
        - type: java.lang.String
          name: name
          description: 池名称
        - type: int
    - parameters: []
"#;

fn pool() -> (Arc<ManagementInterface>, Arc<ImplementationType>) {
    let parsed = DeclarationParser::parse_string(POOL_YAML).unwrap();
    (Arc::new(parsed.interface), Arc::new(parsed.implementation))
}

#[tokio::test]
async fn test_declared_metadata_reaches_registry() {
    let server = Arc::new(InMemoryBeanServer::default());
    let (interface, implementation) = pool();
    let bean = AnnotatedBean::new("pool-state", interface, implementation, server.clone(), &[&"main"]).await;

    assert_eq!(bean.registration_state().await, RegistrationState::Registered);

    let name = ObjectName::parse("com.example:type=Pool,name=main").unwrap();
    let info = server.bean_info(&name).await.unwrap();

    assert_eq!(info.class_name, "com.example.Pool");
    assert_eq!(info.description, "连接池");

    // 声明了描述的 getter 与未声明的 getter
    assert_eq!(info.attribute("Size").unwrap().description, "当前连接数");
    assert_eq!(info.attribute("Idle").unwrap().description, DEFAULT_ATTRIBUTE_DESCRIPTION);

    // 参数按位置取注解，缺失描述时以参数名代替
    let resize = info.operation("resize").unwrap();
    assert_eq!(resize.description, "调整连接数");
    assert_eq!(resize.impact, Impact::ActionInfo);
    assert_eq!(resize.impact.value(), 2);
    assert_eq!(resize.signature[0].name, "size");
    assert_eq!(resize.signature[0].description, "新的连接数");
    assert_eq!(resize.signature[1].name, "p2");
    assert_eq!(resize.signature[1].description, "p2");

    let reset = info.operation("reset").unwrap();
    assert_eq!(reset.description, DEFAULT_OPERATION_DESCRIPTION);
    assert_eq!(reset.impact, Impact::Unknown);

    // 构造器按签名匹配实现类型
    let two_args = info.constructors.iter().find(|c| c.signature.len() == 2).unwrap();
    assert_eq!(two_args.description, "按名称和容量创建");
    assert_eq!(two_args.signature[0].name, "name");
    assert_eq!(two_args.signature[0].description, "池名称");
    assert_eq!(two_args.signature[1].name, "p2");
    let no_args = info.constructors.iter().find(|c| c.signature.is_empty()).unwrap();
    assert_eq!(no_args.description, DEFAULT_CONSTRUCTOR_DESCRIPTION);

    bean.unregister().await;
    assert!(!server.is_registered(&name).await);
}

#[tokio::test]
async fn test_standard_metadata_keeps_defaults() {
    let (interface, implementation) = pool();
    let generic = chips_management::introspect(&interface, &implementation);

    assert_eq!(generic.description, DEFAULT_BEAN_DESCRIPTION);
    assert_eq!(StandardMetadata.customize(generic.clone()), generic);
}

#[tokio::test]
async fn test_duplicate_name_is_logged_not_fatal() {
    let server = Arc::new(InMemoryBeanServer::default());
    let (interface, implementation) = pool();

    let first = AnnotatedBean::new(1u32, interface.clone(), implementation.clone(), server.clone(), &[&"dup"]).await;
    let second = AnnotatedBean::new(2u32, interface, implementation, server.clone(), &[&"dup"]).await;

    assert_eq!(first.registration_state().await, RegistrationState::Registered);
    assert_eq!(second.registration_state().await, RegistrationState::Unregistered);
    assert!(second.last_registration_error().await.unwrap().contains("com.example:type=Pool,name=dup"));
    assert_eq!(*second.target(), 2);

    // 失败的一方注销不影响已注册的一方
    second.unregister().await;
    assert_eq!(server.count().await, 1);

    first.unregister().await;
    assert_eq!(server.count().await, 0);
}

#[tokio::test]
async fn test_missing_template_values_are_logged() {
    let server = Arc::new(InMemoryBeanServer::default());
    let (interface, implementation) = pool();

    let bean = AnnotatedBean::new((), interface, implementation, server.clone(), &[]).await;

    assert_eq!(bean.registration_state().await, RegistrationState::Unregistered);
    assert!(bean.object_name().await.is_none());
    assert!(bean.last_registration_error().await.is_some());
    assert_eq!(server.count().await, 0);
}

#[tokio::test]
async fn test_interface_without_template() {
    let server = Arc::new(InMemoryBeanServer::default());
    let interface = ManagementInterface::builder("com.example.CacheMBean")
        .operation(OperationDecl::new("evict").param(ParameterDecl::new("java.lang.String").named("key")))
        .build()
        .unwrap();
    let implementation = ImplementationType::new("com.example.Cache")
        .with_constructor(ConstructorDecl::new())
        .unwrap();

    let bean = AnnotatedBean::new((), Arc::new(interface), Arc::new(implementation), server.clone(), &[]).await;
    assert_eq!(server.count().await, 0);

    // 从未注册时注销只记录失败
    bean.unregister().await;
    assert!(bean.last_registration_error().await.is_some());

    let info = bean.bean_info();
    let evict = info.operation("evict").unwrap();
    assert_eq!(evict.signature[0].name, "key");
    assert_eq!(evict.signature[0].description, "key");
    assert_eq!(info.description, DEFAULT_BEAN_DESCRIPTION);
}

#[tokio::test]
async fn test_many_beans_register_concurrently() {
    let server = Arc::new(InMemoryBeanServer::default());
    let (interface, implementation) = pool();

    let mut handles = Vec::new();
    for i in 0..8 {
        let server = server.clone();
        let interface = interface.clone();
        let implementation = implementation.clone();
        handles.push(tokio::spawn(async move {
            let id = format!("p{}", i);
            AnnotatedBean::new(i, interface, implementation, server as Arc<dyn BeanServer>, &[&id]).await
        }));
    }

    let mut beans = Vec::new();
    for handle in handles {
        beans.push(handle.await.unwrap());
    }
    assert_eq!(server.count().await, 8);
    assert_eq!(server.query_names(Some("com.example")).await.len(), 8);

    for bean in beans {
        bean.unregister().await;
    }
    assert_eq!(server.count().await, 0);
}
