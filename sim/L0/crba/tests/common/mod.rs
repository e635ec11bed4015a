//! Shared helpers for the integration tests: random trees and a brute-force
//! mass matrix built from kinetic energies.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use nalgebra::{DMatrix, DVector, Unit, UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_crba::{
    CompositeJoint, Data, JointModel, Model, SpatialInertia, SpatialTransform, kinetic_energy,
};
use std::f64::consts::PI;

pub fn random_vector(rng: &mut StdRng, scale: f64) -> Vector3<f64> {
    Vector3::new(
        rng.gen_range(-scale..scale),
        rng.gen_range(-scale..scale),
        rng.gen_range(-scale..scale),
    )
}

pub fn random_axis(rng: &mut StdRng) -> Unit<Vector3<f64>> {
    loop {
        let v = random_vector(rng, 1.0);
        if v.norm() > 0.1 {
            return Unit::new_normalize(v);
        }
    }
}

pub fn random_placement(rng: &mut StdRng) -> SpatialTransform {
    let axis = random_axis(rng);
    SpatialTransform::from_translation(random_vector(rng, 0.5))
        * SpatialTransform::from_axis_angle(&axis, rng.gen_range(-PI..PI))
}

pub fn random_joint(rng: &mut StdRng) -> JointModel {
    match rng.gen_range(0..8) {
        0 => JointModel::Revolute {
            axis: random_axis(rng),
        },
        1 => JointModel::Prismatic {
            axis: random_axis(rng),
        },
        2 => JointModel::Spherical,
        3 => JointModel::SphericalZyx,
        4 => JointModel::Planar,
        5 => JointModel::Translation,
        6 => JointModel::FreeFlyer,
        _ => {
            let first = JointModel::Revolute {
                axis: random_axis(rng),
            };
            let first_placement = random_placement(rng);
            let second_placement = random_placement(rng);
            JointModel::Composite(
                CompositeJoint::new()
                    .with_joint(first, first_placement)
                    .with_joint(JointModel::Spherical, second_placement),
            )
        }
    }
}

/// Physically valid body: a solid box, rotated and offset in the joint frame.
pub fn random_body(rng: &mut StdRng) -> (SpatialInertia, SpatialTransform) {
    let size = Vector3::new(
        rng.gen_range(0.05..1.0),
        rng.gen_range(0.05..1.0),
        rng.gen_range(0.05..1.0),
    );
    let mass = rng.gen_range(0.1..5.0);
    (
        SpatialInertia::solid_box(mass, Vector3::zeros(), size),
        random_placement(rng),
    )
}

/// Random depth-first tree with `njoints` moving joints.
pub fn random_tree(seed: u64, njoints: usize) -> Model {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut model = Model::empty();
    model.name = format!("random tree {seed}");
    for k in 0..njoints {
        // Any joint on the branch ending at the last joint keeps the order
        // depth-first.
        let mut branch = vec![model.njnt - 1];
        while let Some(&j) = branch.last() {
            if j == 0 {
                break;
            }
            branch.push(model.jnt_parent[j]);
        }
        let parent = branch[rng.gen_range(0..branch.len())];
        let joint = random_joint(&mut rng);
        let placement = random_placement(&mut rng);
        let id = model
            .add_joint(parent, joint, placement, format!("j{k}"))
            .unwrap();
        let (inertia, body_placement) = random_body(&mut rng);
        model.append_body(id, inertia, body_placement).unwrap();
    }
    model
}

fn random_segment(joint: &JointModel, q: &mut [f64], rng: &mut StdRng) {
    match joint {
        JointModel::Spherical => {
            let quat = UnitQuaternion::from_scaled_axis(random_vector(rng, PI));
            q.copy_from_slice(&[quat.w, quat.i, quat.j, quat.k]);
        }
        JointModel::FreeFlyer => {
            let quat = UnitQuaternion::from_scaled_axis(random_vector(rng, PI));
            let p = random_vector(rng, 2.0);
            q.copy_from_slice(&[p.x, p.y, p.z, quat.w, quat.i, quat.j, quat.k]);
        }
        JointModel::Composite(c) => {
            let mut adr = 0;
            for (sub, _) in c.iter() {
                random_segment(sub, &mut q[adr..adr + sub.nq()], rng);
                adr += sub.nq();
            }
        }
        _ => {
            for x in q.iter_mut() {
                *x = rng.gen_range(-PI..PI);
            }
        }
    }
}

/// Random configuration in every joint's domain (unit quaternions).
pub fn random_configuration(model: &Model, seed: u64) -> DVector<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut q = model.neutral();
    for i in 1..model.njnt {
        let ctx = model.joint_context(i);
        let segment = &mut q.as_mut_slice()[ctx.qpos_adr..ctx.qpos_adr + ctx.nq];
        random_segment(&model.joints[i], segment, &mut rng);
    }
    q
}

/// Mass matrix recovered from the kinetic energy quadratic form by
/// polarization: `T(e_a) = ½ M_aa`, `T(e_a + e_b) - T(e_a) - T(e_b) = M_ab`.
pub fn brute_force_mass_matrix(model: &Model, data: &mut Data, q: &DVector<f64>) -> DMatrix<f64> {
    let nv = model.nv;
    let mut energy = |v: &DVector<f64>| kinetic_energy(model, data, q, v).unwrap();

    let unit = |a: usize| {
        let mut v = DVector::zeros(nv);
        v[a] = 1.0;
        v
    };
    let diag: Vec<f64> = (0..nv).map(|a| energy(&unit(a))).collect();

    let mut m = DMatrix::zeros(nv, nv);
    for a in 0..nv {
        m[(a, a)] = 2.0 * diag[a];
        for b in a + 1..nv {
            let mixed = energy(&(unit(a) + unit(b))) - diag[a] - diag[b];
            m[(a, b)] = mixed;
            m[(b, a)] = mixed;
        }
    }
    m
}
