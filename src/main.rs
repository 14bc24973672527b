//! Chips Management 命令行入口
//!
//! 检查声明文件、查看解析后的元数据，以及在进程内注册中心中试注册。
//!
//! # 命令概览
//!
//! - `inspect` - 输出声明文件解析后的元数据
//! - `check` - 验证声明文件
//! - `register` - 按名称模板注册到进程内注册中心并列出结果
//! - `version` - 显示版本信息
//!
//! # 使用示例
//!
//! ```bash
//! # 查看元数据
//! chips-management inspect worker.yaml
//!
//! # 以 JSON 输出
//! chips-management inspect worker.yaml --json
//!
//! # 使用配置文件中列出的声明
//! chips-management -c management.yaml inspect
//!
//! # 试注册，值依次替换模板中的 %s
//! chips-management register worker.yaml -v w1
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use chips_management::bean::{AnnotatedBean, AnnotatedMetadata, BeanInfo, DeclarationParser, MetadataCustomizer};
use chips_management::server::{BeanServer, NameValue};
use chips_management::{introspect, Logger, LoggerConfig, ManagementConfig, ParsedDeclaration};

/// Chips Management - 受管实例元数据工具
#[derive(Parser)]
#[command(name = "chips-management")]
#[command(version, about = "注解驱动的受管实例元数据工具", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "management.yaml", global = true)]
    config: PathBuf,

    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// 子命令
    #[command(subcommand)]
    command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
enum Commands {
    /// 输出解析后的元数据
    ///
    /// 不指定文件时使用配置文件中列出的声明。
    Inspect {
        /// 声明文件
        files: Vec<PathBuf>,

        /// 以 JSON 输出
        #[arg(long)]
        json: bool,

        /// 同时输出未经注解加工的通用元数据
        #[arg(long)]
        standard: bool,
    },

    /// 验证声明文件
    Check {
        /// 声明文件
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// 注册到进程内注册中心并列出已注册名称
    Register {
        /// 声明文件
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// 名称模板的替换值，按出现顺序替换 %s
        #[arg(short, long = "value")]
        values: Vec<String>,
    },

    /// 查看版本信息
    Version,
}

/// 初始化日志系统
///
/// 命令行指定的级别优先于配置文件。
fn init_logging(config: &ManagementConfig, level: Option<&str>) -> chips_management::LogGuard {
    let mut logger_config = LoggerConfig::from_log_config(&config.logging);
    if let Some(level) = level {
        logger_config.level = level.to_string();
    }
    logger_config.show_target = false;
    Logger::try_init(logger_config)
}

/// 加载配置文件，不存在时使用默认配置
async fn load_config(path: &Path) -> anyhow::Result<ManagementConfig> {
    if path.exists() {
        ManagementConfig::from_file(path)
            .await
            .with_context(|| format!("加载配置文件失败: {}", path.display()))
    } else {
        Ok(ManagementConfig::default())
    }
}

/// 加载声明：优先使用命令行指定的文件
async fn load_declarations(
    files: &[PathBuf],
    config: &ManagementConfig,
) -> anyhow::Result<Vec<(PathBuf, ParsedDeclaration)>> {
    let paths = if files.is_empty() {
        config.declaration_paths()
    } else {
        files.to_vec()
    };
    if paths.is_empty() {
        bail!("未指定声明文件，且配置文件中没有 declarations");
    }

    let mut parsed = Vec::with_capacity(paths.len());
    for path in paths {
        let decl = DeclarationParser::parse_file(&path)
            .await
            .with_context(|| format!("解析声明文件失败: {}", path.display()))?;
        parsed.push((path, decl));
    }
    Ok(parsed)
}

fn print_bean_info(info: &BeanInfo) {
    println!("  类型:   {}", info.class_name);
    println!("  描述:   {}", info.description);

    if !info.constructors.is_empty() {
        println!("  [构造器]");
        for c in &info.constructors {
            println!("    {}({})  {}", c.name, c.parameter_types().join(", "), c.description);
            for p in &c.signature {
                println!("      {}: {}  {}", p.name, p.type_name, p.description);
            }
        }
    }

    if !info.attributes.is_empty() {
        println!("  [属性]");
        for a in &info.attributes {
            let access = match (a.readable, a.writable) {
                (true, true) => "RW",
                (true, false) => "R",
                _ => "W",
            };
            println!("    {}: {} [{}]  {}", a.name, a.type_name, access, a.description);
        }
    }

    if !info.operations.is_empty() {
        println!("  [操作]");
        for op in &info.operations {
            println!(
                "    {} {}({}) impact={}  {}",
                op.return_type,
                op.name,
                op.parameter_types().join(", "),
                op.impact.value(),
                op.description
            );
            for p in &op.signature {
                println!("      {}: {}  {}", p.name, p.type_name, p.description);
            }
        }
    }
}

/// 输出元数据
async fn run_inspect(
    files: &[PathBuf],
    config: &ManagementConfig,
    json: bool,
    standard: bool,
) -> anyhow::Result<()> {
    for (path, parsed) in load_declarations(files, config).await? {
        let interface = Arc::new(parsed.interface);
        let implementation = Arc::new(parsed.implementation);

        let generic = introspect(&interface, &implementation);
        let resolver = AnnotatedMetadata::new(interface.clone(), implementation);
        let customized = resolver.customize(generic.clone());

        if json {
            let value = if standard {
                serde_json::json!({ "standard": generic, "annotated": customized })
            } else {
                serde_json::to_value(&customized)?
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
            continue;
        }

        println!();
        println!("{} ({})", interface.name(), path.display());
        println!("────────────────────────────────────────");
        if let Some(template) = interface.object_name() {
            println!("  名称模板: {}", template);
        }
        print_bean_info(&customized);
        if standard {
            println!("  [通用元数据]");
            print_bean_info(&generic);
        }
        println!("────────────────────────────────────────");
    }
    Ok(())
}

/// 验证声明文件
async fn run_check(files: &[PathBuf]) -> anyhow::Result<()> {
    let mut failed = 0;
    for path in files {
        match DeclarationParser::parse_file(path).await {
            Ok(parsed) => println!(
                "✅ {}: {}，{} 个操作，{} 个构造器",
                path.display(),
                parsed.interface.name(),
                parsed.interface.operations().len(),
                parsed.implementation.constructors().len()
            ),
            Err(e) => {
                failed += 1;
                println!("❌ {}: [{}] {}", path.display(), e.error_code(), e);
            }
        }
    }
    if failed > 0 {
        bail!("{} 个声明文件无效", failed);
    }
    Ok(())
}

/// 试注册
async fn run_register(files: &[PathBuf], config: &ManagementConfig, values: &[String]) -> anyhow::Result<()> {
    let server = Arc::new(config.create_server());
    let values: Vec<NameValue<'_>> = values.iter().map(|v| v as NameValue<'_>).collect();

    let mut beans = Vec::new();
    for (_, parsed) in load_declarations(files, config).await? {
        let bean = AnnotatedBean::new(
            (),
            Arc::new(parsed.interface),
            Arc::new(parsed.implementation),
            server.clone() as Arc<dyn BeanServer>,
            &values,
        )
        .await;
        beans.push(bean);
    }

    println!();
    println!("已注册名称 (默认域: {})", server.default_domain());
    println!("────────────────────────────────────────");
    for name in server.query_names(None).await {
        println!("  {}", name);
    }
    for bean in &beans {
        if let Some(error) = bean.last_registration_error().await {
            println!("  ⚠️  {}: {}", bean.interface().name(), error);
        }
    }
    println!("────────────────────────────────────────");

    for bean in &beans {
        bean.unregister().await;
    }
    info!(remaining = server.count().await, "试注册结束");
    Ok(())
}

/// 打印版本信息
fn print_version() {
    println!();
    println!("Chips Management - 受管实例元数据工具");
    println!("═══════════════════════════════════════");
    println!("  版本:     {}", chips_management::VERSION);
    println!("  目标平台: {}", std::env::consts::ARCH);
    println!("  操作系统: {}", std::env::consts::OS);
    println!("═══════════════════════════════════════");
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    let config = load_config(&cli.config).await?;
    let _guard = init_logging(&config, cli.log_level.as_deref());

    match &cli.command {
        Commands::Inspect { files, json, standard } => run_inspect(files, &config, *json, *standard).await,
        Commands::Check { files } => run_check(files).await,
        Commands::Register { files, values } => run_register(files, &config, values).await,
        Commands::Version => Ok(()),
    }
}
