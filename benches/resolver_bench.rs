//! 元数据解析性能基准测试
//!
//! 使用 Criterion 框架，包括：
//! - 签名匹配基准
//! - 元数据定制基准
//! - 名称模板与对象名称解析基准
//! - 注册 / 注销往返基准

use std::sync::Arc;

use chips_management::bean::{
    find_operation, introspect, AnnotatedBean, AnnotatedMetadata, ImplementationType, ManagementInterface,
    MetadataCustomizer, OperationDecl, ParameterDecl,
};
use chips_management::server::{format_name, InMemoryBeanServer, ObjectName};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ============================================================================
// 测试辅助
// ============================================================================

/// 构造含 `count` 个操作的管理接口
fn interface_with(count: usize) -> ManagementInterface {
    let mut builder = ManagementInterface::builder("com.example.BenchMBean")
        .description("基准")
        .object_name("com.example:type=Bench,name=%s");
    for i in 0..count {
        builder = builder.operation(
            OperationDecl::new(format!("op{}", i))
                .param(ParameterDecl::new("int").named("size").described("大小"))
                .param(ParameterDecl::new("java.lang.String"))
                .description(format!("操作 {}", i)),
        );
        builder = builder.getter(&format!("Attr{}", i), "long");
    }
    builder.build().expect("benchmark interface")
}

// ============================================================================
// 签名匹配
// ============================================================================

fn signature_matching_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_operation");

    for count in [10usize, 100] {
        let interface = interface_with(count);
        let name = format!("op{}", count - 1);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| find_operation(black_box(&interface), black_box(&name), &["int", "java.lang.String"]))
        });
    }

    group.finish();
}

// ============================================================================
// 元数据定制
// ============================================================================

fn customize_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("customize");

    for count in [10usize, 100] {
        let interface = Arc::new(interface_with(count));
        let implementation = Arc::new(ImplementationType::new("com.example.Bench"));
        let generic = introspect(&interface, &implementation);
        let resolver = AnnotatedMetadata::new(interface, implementation);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| resolver.customize(black_box(generic.clone())))
        });
    }

    group.finish();
}

// ============================================================================
// 名称
// ============================================================================

fn object_name_benchmark(c: &mut Criterion) {
    c.bench_function("format_and_parse_name", |b| {
        b.iter(|| {
            let name = format_name(black_box("com.example:type=Worker,name=%s,pool=%s"), &[&"w1", &42]).unwrap();
            ObjectName::parse(&name).unwrap()
        })
    });
}

// ============================================================================
// 注册往返
// ============================================================================

fn registration_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = Arc::new(InMemoryBeanServer::default());
    let interface = Arc::new(interface_with(10));
    let implementation = Arc::new(ImplementationType::new("com.example.Bench"));

    c.bench_function("register_unregister", |b| {
        b.to_async(&rt).iter(|| {
            let server = server.clone();
            let interface = interface.clone();
            let implementation = implementation.clone();
            async move {
                let bean = AnnotatedBean::new((), interface, implementation, server, &[&"bench"]).await;
                bean.unregister().await;
            }
        })
    });
}

criterion_group!(
    benches,
    signature_matching_benchmark,
    customize_benchmark,
    object_name_benchmark,
    registration_benchmark
);
criterion_main!(benches);
