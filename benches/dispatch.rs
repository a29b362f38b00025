use std::hint::black_box;

use brrtmvc::scan::StaticClassPath;
use brrtmvc::server::Request;
use brrtmvc::{demo, AppConfig, CompatMode, DispatchContext};
use criterion::{criterion_group, criterion_main, Criterion};

fn demo_context() -> DispatchContext {
    let class_path = StaticClassPath::new(demo::classes());
    let config = AppConfig::new(demo::DEMO_PACKAGE).with_compat_mode(CompatMode::Hardened);
    match DispatchContext::initialize(config, &class_path) {
        Ok(ctx) => ctx,
        Err(err) => panic!("demo context failed to start: {err}"),
    }
}

fn bench_dispatch(c: &mut Criterion) {
    let ctx = demo_context();

    let add = Request::from_uri("/app/add?a=2&b=3");
    c.bench_function("dispatch_first_route", |b| {
        b.iter(|| black_box(ctx.serve(black_box(&add))))
    });

    let ping = Request::from_uri("/reports/ping");
    c.bench_function("dispatch_last_route", |b| {
        b.iter(|| black_box(ctx.serve(black_box(&ping))))
    });

    let missing = Request::from_uri("/does/not/exist");
    c.bench_function("dispatch_not_found", |b| {
        b.iter(|| black_box(ctx.serve(black_box(&missing))))
    });

    let bad = Request::from_uri("/app/add?a=x&b=3");
    c.bench_function("dispatch_conversion_error", |b| {
        b.iter(|| black_box(ctx.serve(black_box(&bad))))
    });
}

fn bench_startup(c: &mut Criterion) {
    c.bench_function("context_initialize", |b| b.iter(|| black_box(demo_context())));
}

criterion_group!(benches, bench_dispatch, bench_startup);
criterion_main!(benches);
