//! Benchmarks for CRBA throughput.
//!
//! Run with: `cargo bench -p sim-crba --features parallel`
//!
//! Measures single-call cost on serial chains of growing length and on a
//! branched floating-base tree, plus batch throughput for varying batch
//! sizes to verify scaling with CPU core count.

#![allow(
    missing_docs,
    clippy::wildcard_imports,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::unwrap_used,
    clippy::expect_used
)]

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nalgebra::{DVector, UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_crba::{BatchCrba, JointModel, Model, SpatialInertia, SpatialTransform, crba};

/// Floating base with four 3-joint limbs (nv = 6 + 4 * 5 = 26).
fn legged_model() -> Model {
    let mut m = Model::empty();
    m.name = "legged".to_string();
    let base = m
        .add_joint(0, JointModel::FreeFlyer, SpatialTransform::identity(), "base")
        .unwrap();
    m.append_body(
        base,
        SpatialInertia::solid_box(10.0, Vector3::zeros(), Vector3::new(0.6, 0.3, 0.2)),
        SpatialTransform::identity(),
    )
    .unwrap();
    for (k, (x, y)) in [(0.3, 0.15), (0.3, -0.15), (-0.3, 0.15), (-0.3, -0.15)]
        .into_iter()
        .enumerate()
    {
        let hip = m
            .add_joint(
                base,
                JointModel::SphericalZyx,
                SpatialTransform::from_translation(Vector3::new(x, y, 0.0)),
                format!("hip{k}"),
            )
            .unwrap();
        let knee = m
            .add_joint(
                hip,
                JointModel::revolute_y(),
                SpatialTransform::from_translation(Vector3::new(0.0, 0.0, -0.3)),
                format!("knee{k}"),
            )
            .unwrap();
        let ankle = m
            .add_joint(
                knee,
                JointModel::revolute_y(),
                SpatialTransform::from_translation(Vector3::new(0.0, 0.0, -0.3)),
                format!("ankle{k}"),
            )
            .unwrap();
        for joint in [hip, knee, ankle] {
            m.append_body(
                joint,
                SpatialInertia::solid_box(
                    1.0,
                    Vector3::new(0.0, 0.0, -0.15),
                    Vector3::new(0.05, 0.05, 0.3),
                ),
                SpatialTransform::identity(),
            )
            .unwrap();
        }
    }
    m
}

fn random_configuration(model: &Model, rng: &mut StdRng) -> DVector<f64> {
    let mut q = model.neutral();
    for i in 1..model.njnt {
        let ctx = model.joint_context(i);
        let segment = &mut q.as_mut_slice()[ctx.qpos_adr..ctx.qpos_adr + ctx.nq];
        match model.joints[i] {
            JointModel::FreeFlyer => {
                let quat = UnitQuaternion::from_euler_angles(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
                segment.copy_from_slice(&[0.0, 0.0, 0.5, quat.w, quat.i, quat.j, quat.k]);
            }
            _ => segment
                .iter_mut()
                .for_each(|x| *x = rng.gen_range(-1.0..1.0)),
        }
    }
    q
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("crba_chain");
    let mut rng = StdRng::seed_from_u64(42);

    for &n in &[1, 5, 10, 30, 100] {
        let model = Model::n_link_pendulum(n, 0.5, 1.0);
        let mut data = model.make_data();
        let q = random_configuration(&model, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let m = crba(&model, &mut data, black_box(&q)).unwrap();
                black_box(m[(0, 0)]);
            });
        });
    }

    group.finish();
}

fn bench_legged(c: &mut Criterion) {
    let model = legged_model();
    let mut data = model.make_data();
    let mut rng = StdRng::seed_from_u64(7);
    let q = random_configuration(&model, &mut rng);

    c.bench_function("crba_legged", |b| {
        b.iter(|| {
            let m = crba(&model, &mut data, black_box(&q)).unwrap();
            black_box(m[(0, 0)]);
        });
    });
}

fn bench_batch(c: &mut Criterion) {
    let model = Arc::new(legged_model());
    let mut group = c.benchmark_group("crba_batch");

    for &n in &[1, 16, 64, 256, 1024] {
        let mut rng = StdRng::seed_from_u64(n as u64);
        let configs: Vec<DVector<f64>> = (0..n)
            .map(|_| random_configuration(&model, &mut rng))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut batch = BatchCrba::new(Arc::clone(&model), n);
            b.iter(|| {
                let _errors = batch.compute_all(black_box(&configs));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_chain, bench_legged, bench_batch);
criterion_main!(benches);
