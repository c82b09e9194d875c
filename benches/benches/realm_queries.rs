// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f32::consts::{PI, TAU};

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_realm::{Aabb3D, BuildOptions, RealmTree, SurfaceSnapshot};

/// Latitude/longitude sphere of radius 100 with `n` rings of `n` vertices.
fn gen_sphere(n: u32) -> SurfaceSnapshot {
    let mut vertices = Vec::with_capacity((n * n) as usize);
    for ring in 0..n {
        let theta = PI * (ring as f32 + 0.5) / n as f32;
        for seg in 0..n {
            let phi = TAU * seg as f32 / n as f32;
            vertices.push([
                100.0 * theta.sin() * phi.cos(),
                100.0 * theta.sin() * phi.sin(),
                100.0 * theta.cos(),
            ]);
        }
    }
    let mut faces = Vec::with_capacity((2 * n * n) as usize);
    for ring in 0..n - 1 {
        for seg in 0..n {
            let a = ring * n + seg;
            let b = ring * n + (seg + 1) % n;
            faces.push([a, b, b + n]);
            faces.push([a, b + n, a + n]);
        }
    }
    SurfaceSnapshot::new(vertices, faces)
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }
}

/// Cubes of edge `size` centered on points of the sphere's bounding cube.
fn gen_queries(count: usize, size: f32, seed: u64) -> Vec<Aabb3D> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let c = [0; 3].map(|_| rng.next_f32() * 200.0 - 100.0);
            Aabb3D::from_corners(c.map(|v| v - size * 0.5), c.map(|v| v + size * 0.5))
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("realm_build");
    for &n in &[64_u32, 256] {
        let surface = gen_sphere(n);
        let options = BuildOptions::default().with_validation(false);
        group.throughput(Throughput::Elements(u64::from(n * n)));
        group.bench_function(format!("sphere_n{n}"), |b| {
            b.iter(|| black_box(RealmTree::build_with(&surface, options).unwrap()))
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("realm_query");
    let surface = gen_sphere(256);
    let tree = RealmTree::build_with(&surface, BuildOptions::default().with_validation(false)).unwrap();
    for &size in &[2.0_f32, 10.0, 50.0] {
        let queries = gen_queries(256, size, 0x5eed);
        group.throughput(Throughput::Elements(queries.len() as u64));

        group.bench_function(format!("vertices_walk_s{size}"), |b| {
            b.iter(|| {
                let mut total = 0;
                for q in &queries {
                    total += tree.realm(*q).vertices().count();
                }
                black_box(total)
            })
        });

        group.bench_function(format!("faces_count_s{size}"), |b| {
            b.iter(|| {
                let mut total = 0;
                for q in &queries {
                    total += tree.realm(*q).count_candidate_faces();
                }
                black_box(total)
            })
        });

        group.bench_function(format!("faces_list_s{size}"), |b| {
            b.iter_batched(
                || vec![0_u32; surface.faces.len()],
                |mut buf| {
                    let mut total = 0;
                    for q in &queries {
                        total += tree.realm(*q).list_candidate_faces(&mut buf).unwrap();
                    }
                    black_box(total)
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_function(format!("brute_force_vertices_s{size}"), |b| {
            b.iter(|| {
                let mut total = 0;
                for q in &queries {
                    total += surface.vertices.iter().filter(|&&p| q.contains_point(p)).count();
                }
                black_box(total)
            })
        });
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let surface = gen_sphere(256);
    let tree = RealmTree::build(&surface).unwrap();
    c.bench_function("realm_verify_sphere_n256", |b| {
        b.iter(|| black_box(tree.verify(&surface).is_ok()))
    });
}

criterion_group!(benches, bench_build, bench_queries, bench_verify);
criterion_main!(benches);
