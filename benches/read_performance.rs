//! Performance benchmarks for xref-config.
//!
//! Measures:
//! - Typed read latency at the root and through prefix views
//! - Construction cost as the number of references grows
//! - Read throughput with concurrent readers

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::collections::HashMap;
use std::sync::{Arc, Barrier};
use std::thread;
use xref_config::prelude::*;

fn bench_config() -> Config {
    Config::new(
        Store::new()
            .with("server.port", 8080)
            .with("server.readtimeout", "10s")
            .with("server.healthcheck.endpoints.liveness", "/__monitor/live")
            .with("database.url", "${secrets:db_url}"),
        HashMap::from([(
            "secrets".to_string(),
            Store::new().with("db_url", "postgres://localhost/db"),
        )]),
    )
    .unwrap()
}

/// Benchmark single-threaded typed reads
fn benchmark_read_latency(c: &mut Criterion) {
    let config = bench_config();

    let mut group = c.benchmark_group("read_latency");
    group.bench_function("get_int", |b| {
        b.iter(|| black_box(config.get_int("server.port").unwrap()));
    });
    group.bench_function("get_duration", |b| {
        b.iter(|| black_box(config.get_duration("server.readtimeout").unwrap()));
    });
    group.bench_function("get_string_resolved", |b| {
        b.iter(|| black_box(config.get_string("database.url").unwrap()));
    });
    group.finish();
}

/// Benchmark reads through nested prefix views
fn benchmark_prefix_view(c: &mut Criterion) {
    let config = bench_config();
    let view = config.of("server").of("healthcheck");

    let mut group = c.benchmark_group("prefix_view");
    group.bench_function("of", |b| {
        b.iter(|| black_box(config.of("server")));
    });
    group.bench_function("nested_view_read", |b| {
        b.iter(|| black_box(view.get_string("endpoints.liveness").unwrap()));
    });
    group.finish();
}

/// Benchmark construction with a growing number of reference chains
fn benchmark_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    for count in [10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_with_setup(
                || {
                    let mut primary = Store::new();
                    let mut first = Store::new();
                    let mut second = Store::new();
                    for i in 0..count {
                        primary.set(&format!("key{i}"), format!("${{first:k{i}}}"));
                        first.set(&format!("k{i}"), format!("${{second:k{i}}}"));
                        second.set(&format!("k{i}"), format!("value-{i}"));
                    }
                    (
                        primary,
                        HashMap::from([
                            ("first".to_string(), first),
                            ("second".to_string(), second),
                        ]),
                    )
                },
                |(primary, references)| black_box(Config::new(primary, references).unwrap()),
            );
        });
    }
    group.finish();
}

/// Benchmark concurrent reads with varying thread counts
fn benchmark_concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_reads");

    for num_threads in [1, 2, 4, 8] {
        group.throughput(Throughput::Elements(num_threads as u64 * 1000));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_threads),
            &num_threads,
            |b, &num_threads| {
                let config = bench_config();
                b.iter(|| {
                    let barrier = Arc::new(Barrier::new(num_threads));
                    let handles: Vec<_> = (0..num_threads)
                        .map(|_| {
                            let config = config.clone();
                            let barrier = Arc::clone(&barrier);
                            thread::spawn(move || {
                                barrier.wait();
                                for _ in 0..1000 {
                                    black_box(config.get_int("server.port").unwrap());
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_read_latency,
    benchmark_prefix_view,
    benchmark_resolution,
    benchmark_concurrent_reads
);
criterion_main!(benches);
