// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_realm::{Aabb3D, BuildOptions, RealmTree, SurfaceSnapshot};

use rstar::{AABB, RTree};

/// Heightfield patch with `n * n` vertices over `[0, n)²`.
fn gen_terrain(n: u32) -> SurfaceSnapshot {
    let mut vertices = Vec::with_capacity((n * n) as usize);
    for y in 0..n {
        for x in 0..n {
            let (fx, fy) = (x as f32, y as f32);
            vertices.push([fx, fy, (fx * 0.1).sin() * (fy * 0.1).cos() * 4.0]);
        }
    }
    let mut faces = Vec::new();
    for y in 0..n - 1 {
        for x in 0..n - 1 {
            let v = y * n + x;
            faces.push([v, v + 1, v + n + 1]);
            faces.push([v, v + n + 1, v + n]);
        }
    }
    SurfaceSnapshot::new(vertices, faces)
}

fn bench_rstar_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_external_compare_points");
    for &n in &[128_u32, 256] {
        let surface = gen_terrain(n);
        let query = Aabb3D::new(10.0, 10.0, -5.0, 40.0, 40.0, 5.0);
        group.throughput(Throughput::Elements(u64::from(n * n)));

        group.bench_function(format!("understory_build_query_n{n}"), |b| {
            b.iter_batched(
                || surface.clone(),
                |surface| {
                    let options = BuildOptions::default().with_validation(false);
                    let tree = RealmTree::build_with(&surface, options).unwrap();
                    let hits = tree.realm(query).vertices().count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{n}"), |b| {
            b.iter_batched(
                || surface.vertices.clone(),
                |points| {
                    let tree = RTree::bulk_load(points);
                    let aabb = AABB::from_corners(query.min(), query.max());
                    let hits = tree.locate_in_envelope(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rstar_external_compare);
criterion_main!(benches);
