//! 配置加载集成测试
//!
//! 测试配置文件、声明文件与注册中心的联动

use std::path::PathBuf;

use chips_management::bean::DeclarationParser;
use chips_management::{CoreError, LoggerConfig, ManagementConfig, RotationStrategy};
use tempfile::TempDir;

const WORKER_DECL: &str = r#"
interface:
  name: com.example.WorkerMBean
  description: 工作者
  object_name: "com.example:type=Worker,name=%s"
  operations:
    - name: getStatus
      returns: java.lang.String
"#;

/// 完整的配置加载流程：配置文件 -> 声明文件 -> 注册中心
#[tokio::test]
async fn test_full_config_loading_workflow() {
    let temp_dir = TempDir::new().unwrap();

    tokio::fs::create_dir(temp_dir.path().join("beans")).await.unwrap();
    tokio::fs::write(temp_dir.path().join("beans/worker.yaml"), WORKER_DECL)
        .await
        .unwrap();

    let config_path = temp_dir.path().join("management.yaml");
    tokio::fs::write(
        &config_path,
        r#"
logging:
  level: debug
  rotation: hourly
  filter: "chips_management::server=trace"
server:
  default_domain: com.example
declarations:
  - beans/worker.yaml
"#,
    )
    .await
    .unwrap();

    let config = ManagementConfig::from_file(&config_path).await.unwrap();
    assert_eq!(config.config_path.as_deref(), Some(config_path.as_path()));
    assert_eq!(config.server.default_domain, "com.example");
    assert_eq!(
        config.declaration_paths(),
        vec![temp_dir.path().join("beans/worker.yaml")]
    );

    let logger_config = LoggerConfig::from_log_config(&config.logging);
    assert_eq!(logger_config.level, "debug");
    assert_eq!(logger_config.rotation, RotationStrategy::Hourly);
    assert_eq!(
        logger_config.filter_directives.as_deref(),
        Some("chips_management::server=trace")
    );

    let declarations = config.load_declarations().await.unwrap();
    assert_eq!(declarations.len(), 1);
    assert_eq!(declarations[0].interface.name(), "com.example.WorkerMBean");
    assert_eq!(declarations[0].implementation.name(), "com.example.Worker");

    let server = config.create_server();
    assert_eq!(server.default_domain(), "com.example");
}

/// JSON 配置
#[tokio::test]
async fn test_json_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("management.json");
    tokio::fs::write(
        &path,
        r#"{"logging": {"level": "warn", "json_format": true}, "declarations": ["/abs/a.yaml"]}"#,
    )
    .await
    .unwrap();

    let config = ManagementConfig::from_file(&path).await.unwrap();
    assert_eq!(config.logging.level, "warn");
    assert!(config.logging.json_format);
    assert_eq!(config.declaration_paths(), vec![PathBuf::from("/abs/a.yaml")]);
}

/// 配置格式错误
#[tokio::test]
async fn test_invalid_config_content() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.yaml");
    tokio::fs::write(&path, "logging: [not, a, map]").await.unwrap();

    let result = ManagementConfig::from_file(&path).await;
    assert!(matches!(result, Err(CoreError::Yaml(_))));
}

/// 声明文件缺失时整体加载失败
#[tokio::test]
async fn test_missing_declaration_fails_load() {
    let config = ManagementConfig::builder()
        .declaration("/nonexistent/worker.yaml")
        .build();

    let result = config.load_declarations().await;
    assert!(matches!(result, Err(CoreError::Io(_))));
}

/// 声明文件验证失败
#[test]
fn test_invalid_declaration_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.yaml");
    std::fs::write(&path, "interface:\n  name: \"  \"\n").unwrap();

    let err = DeclarationParser::parse_file_sync(&path).unwrap_err();
    assert_eq!(err.error_code(), chips_management::error_code::DECL_INVALID);
}
