//! 导航引擎性能基准测试
//!
//! 使用 Criterion 框架进行性能测试，包括：
//! - 查询串编解码基准
//! - 路由匹配基准
//! - 完整导航流程基准

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use mina_router::history::MemoryHistory;
use mina_router::router::record::{RouteLocation, RouteRecord};
use mina_router::router::{parse_query, stringify_query, RouteMatcher, RouteTable, Router};

fn build_table(size: usize) -> RouteTable {
    (0..size)
        .map(|i| {
            RouteRecord::new(
                format!("page{i}"),
                format!("/page{i}"),
                format!("pages/page{i}/index"),
            )
        })
        .collect()
}

fn bench_query_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_codec");

    group.bench_function("parse_query", |b| {
        b.iter(|| parse_query(black_box("id=42&tags=a&tags=b&msg=hello%20world")))
    });

    let parsed = parse_query("id=42&tags=a&tags=b&msg=hello%20world");
    group.bench_function("stringify_query", |b| {
        b.iter(|| stringify_query(black_box(&parsed)))
    });

    group.finish();
}

fn bench_matcher(c: &mut Criterion) {
    let matcher = RouteMatcher::new(build_table(200)).unwrap();
    let mut group = c.benchmark_group("matcher");

    group.bench_function("resolve_by_name", |b| {
        b.iter(|| matcher.resolve(black_box(&RouteLocation::named("page100"))))
    });

    group.bench_function("resolve_by_path", |b| {
        b.iter(|| {
            matcher.resolve(black_box(&RouteLocation::path(
                "/pages/page100/index?id=42",
            )))
        })
    });

    group.finish();
}

fn bench_navigate(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    c.bench_function("navigate_push", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let history = Arc::new(MemoryHistory::with_entry("/pages/page0/index"));
                let router = Router::new(build_table(50), history).unwrap();
                let result = router
                    .push(RouteLocation::named("page25").with_param("id", "42"))
                    .await
                    .unwrap();
                black_box(result)
            })
        })
    });
}

criterion_group!(benches, bench_query_codec, bench_matcher, bench_navigate);
criterion_main!(benches);
