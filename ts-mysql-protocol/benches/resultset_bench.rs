// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Result set encoding benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ts_common::{TableColumn, Value};
use ts_mysql_protocol::constants::*;
use ts_mysql_protocol::{build_resultset, ClientConn};

fn columns() -> Vec<TableColumn> {
    vec![
        TableColumn::new("id", MYSQL_TYPE_LONGLONG).not_null(),
        TableColumn::new("name", MYSQL_TYPE_VARCHAR).with_collation("utf8mb4_general_ci"),
        TableColumn::new("balance", MYSQL_TYPE_DOUBLE),
        TableColumn::new("visits", MYSQL_TYPE_LONGLONG).unsigned(),
    ]
}

fn rows(n: usize) -> Vec<Vec<Value>> {
    (0..n)
        .map(|i| {
            vec![
                Value::Int64(i as i64),
                Value::String(format!("user_{}", i)),
                if i % 7 == 0 { Value::Null } else { Value::Float64(i as f64 * 1.25) },
                Value::UInt64(i as u64 * 3),
            ]
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_resultset");
    let cols = columns();

    for n in [1usize, 100, 10_000] {
        let data = rows(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| build_resultset(black_box(&cols), black_box(data)))
        });
    }

    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(rt) => rt,
        Err(e) => panic!("failed to build runtime: {}", e),
    };
    let rs = match build_resultset(&columns(), &rows(1000)) {
        Ok(rs) => rs,
        Err(e) => panic!("failed to build resultset: {}", e),
    };

    c.bench_function("write_resultset_1000", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let mut conn = ClientConn::new(Vec::with_capacity(64 * 1024), 1);
                let _ = conn.write_resultset(SERVER_STATUS_AUTOCOMMIT, black_box(&rs)).await;
                conn.into_inner().len()
            })
        })
    });
}

criterion_group!(benches, bench_build, bench_write);
criterion_main!(benches);
