//! Benchmarks for the per-frame hot paths.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

use conifer::cloth::{Cloth, ClothParams};
use conifer::attractor::{AttractorField, AttractorParams};
use conifer::drift::{DriftField, DriftParams};
use conifer::family::ParticleFamily;
use conifer::morph::{evaluate_family, Instance, MorphParams};
use conifer::shape::TreeShape;

fn bench_evaluate_family(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_family");
    let shape = TreeShape::default();
    let params = MorphParams::default();

    for count in [1_000, 10_000, 45_000] {
        let family = ParticleFamily::foliage(count, &shape).unwrap();
        let mut out = vec![Instance::default(); count];
        group.bench_with_input(BenchmarkId::new("foliage", count), &count, |b, _| {
            b.iter(|| {
                evaluate_family(
                    &family,
                    black_box(0.5),
                    black_box(1.25),
                    &params,
                    &mut out,
                );
                black_box(&out);
            })
        });
    }

    // Ornaments exercise the bob motion branch.
    let family = ParticleFamily::ornaments(2_800, &shape).unwrap();
    let mut out = vec![Instance::default(); family.len()];
    group.bench_function("ornaments_2800", |b| {
        b.iter(|| {
            evaluate_family(&family, black_box(0.5), black_box(1.25), &params, &mut out);
            black_box(&out);
        })
    });

    group.finish();
}

fn bench_cloth_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("cloth_step");

    group.bench_function("10x6_3iter", |b| {
        let mut cloth = Cloth::new(ClothParams::default()).unwrap();
        let mut t = 0.0f32;
        b.iter(|| {
            t += 1.0 / 60.0;
            cloth.step(black_box(Vec3::new(t.sin() * 28.0, 10.0, t.cos() * 28.0)), t, 1.0 / 60.0);
            black_box(cloth.positions());
        })
    });

    group.bench_function("20x12_8iter", |b| {
        let params = ClothParams {
            width: 20,
            height: 12,
            iterations: 8,
            ..Default::default()
        };
        let mut cloth = Cloth::new(params).unwrap();
        let mut t = 0.0f32;
        b.iter(|| {
            t += 1.0 / 60.0;
            cloth.step(black_box(Vec3::new(t.sin() * 28.0, 10.0, t.cos() * 28.0)), t, 1.0 / 60.0);
            black_box(cloth.positions());
        })
    });

    group.finish();
}

fn bench_attractor_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("attractor_step");

    for count in [300, 2_000] {
        group.bench_with_input(BenchmarkId::new("motes", count), &count, |b, &count| {
            let mut field = AttractorField::new(count, AttractorParams::default());
            let mut out = vec![Instance::default(); count];
            let mut t = 0.0f32;
            b.iter(|| {
                t += 1.0 / 60.0;
                field.step(black_box(Vec3::new(t.sin() * 8.0, 0.0, 5.0)));
                field.instances_into(t, &mut out);
                black_box(&out);
            })
        });
    }

    group.finish();
}

fn bench_snow_eval(c: &mut Criterion) {
    let field = DriftField::new(3_000, DriftParams::default());
    let mut out = vec![Instance::default(); field.len()];
    c.bench_function("snow_3000", |b| {
        b.iter(|| {
            field.instances_into(black_box(7.5), &mut out);
            black_box(&out);
        })
    });
}

criterion_group!(
    benches,
    bench_evaluate_family,
    bench_cloth_step,
    bench_attractor_step,
    bench_snow_eval,
);
criterion_main!(benches);
