//! Composite Rigid Body Algorithm for mass matrix computation.
//!
//! Implements CRBA (Featherstone Chapter 6) to build the joint-space mass
//! matrix `M(q)` of a kinematic tree. The forward pass places every joint
//! frame and seeds the composite inertias with the body inertias; the
//! backward pass folds each subtree into its parent and writes one block
//! row of the upper triangle per joint.

use nalgebra::{DMatrix, DVector};

use crate::kinematics::update_joint_placements;
use crate::types::validation::first_bad;
use crate::types::{CrbaConfig, CrbaError, Data, MassMatrixFill, Model};

use super::spatial::SpatialVector;

/// Joint-space inertia matrix at configuration `q`, with default checks.
///
/// Only the upper triangle of the returned matrix is meaningful; see
/// [`crba_with_config`] for the symmetric fill mode.
///
/// # Errors
///
/// See [`crba_with_config`].
pub fn crba<'a>(
    model: &Model,
    data: &'a mut Data,
    q: &DVector<f64>,
) -> Result<&'a DMatrix<f64>, CrbaError> {
    crba_with_config(model, data, q, &CrbaConfig::default())
}

/// Composite Rigid Body Algorithm: build the joint-space mass matrix.
///
/// ## Algorithm Overview
///
/// 1. Forward pass (root to leaves): `calc` each joint, set
///    `li_mi[i] = jnt_placement[i] * joint placement` and
///    `crb_inertia[i] = body_inertia[i]`.
/// 2. Backward pass (leaves to root), for each joint `i` with parent `p`:
///    - `F_i[:, dofs(i)] = Ycrb_i · S_i`
///    - `M[dofs(i), subtree(i)] = S_iᵀ · F_i[:, subtree(i)]`
///    - `Ycrb_p += li_mi[i] · Ycrb_i` and
///      `F_p[:, subtree(i)] = li_mi[i] · F_i[:, subtree(i)]` (skipped for `p = 0`)
///
/// The matrix is zeroed first, so every upper-triangle entry outside the
/// written blocks (pairs of joints where neither is an ancestor of the
/// other) is exactly `0.0`. The strictly-lower triangle holds zeros and the
/// lower halves of multi-DOF diagonal blocks unless `config.fill` is
/// [`MassMatrixFill::Symmetric`].
///
/// Reference: Featherstone, "Rigid Body Dynamics Algorithms", Chapter 6
///
/// # Errors
///
/// Precondition violations, detected before any pass runs:
/// [`CrbaError::InvalidModel`], [`CrbaError::DataMismatch`],
/// [`CrbaError::ConfigurationSize`], [`CrbaError::BadConfiguration`].
///
/// Numerical degeneracy raised by a joint during the forward pass:
/// [`CrbaError::Joint`]. The contents of `data` are unspecified after any
/// error.
pub fn crba_with_config<'a>(
    model: &Model,
    data: &'a mut Data,
    q: &DVector<f64>,
    config: &CrbaConfig,
) -> Result<&'a DMatrix<f64>, CrbaError> {
    let q = q.as_slice();
    check_inputs(model, data, q, config)?;
    tracing::trace!("crba: njnt {}, nv {}", model.njnt, model.nv);

    data.mass_matrix.fill(0.0);
    if model.nv == 0 {
        return Ok(&data.mass_matrix);
    }

    // ============================================================
    // Phase 1: Forward pass (joint placements, body inertias)
    // ============================================================
    update_joint_placements(model, data, q)?;
    data.crb_inertia[1..].copy_from_slice(&model.body_inertia[1..]);

    // ============================================================
    // Phase 2: Backward pass (composite inertias, mass matrix rows)
    // ============================================================
    backward_pass(model, data);

    if config.fill == MassMatrixFill::Symmetric {
        data.symmetrize_mass_matrix();
    }
    Ok(&data.mass_matrix)
}

/// Precondition checks shared by every per-configuration entry point.
pub(crate) fn check_inputs(
    model: &Model,
    data: &Data,
    q: &[f64],
    config: &CrbaConfig,
) -> Result<(), CrbaError> {
    if config.validate_model {
        model.validate()?;
    }
    if !data.fits(model) {
        return Err(CrbaError::DataMismatch {
            data_njnt: data.joint_data.len(),
            data_nv: data.nv(),
            model_njnt: model.njnt,
            model_nv: model.nv,
        });
    }
    if q.len() != model.nq {
        return Err(CrbaError::ConfigurationSize {
            expected: model.nq,
            actual: q.len(),
        });
    }
    if config.check_configuration {
        if let Some((index, value)) = first_bad(q) {
            return Err(CrbaError::BadConfiguration { index, value });
        }
    }
    Ok(())
}

#[allow(clippy::similar_names)]
fn backward_pass(model: &Model, data: &mut Data) {
    for i in (1..model.njnt).rev() {
        let ctx = model.joint_context(i);
        let s = &data.joint_data[i].motion_subspace;

        // Own force columns: F_i[:, dofs(i)] = Ycrb_i · S_i
        let ycrb = data.crb_inertia[i];
        let mut own = ctx.cols_mut(&mut data.crb_force[i]);
        for k in 0..ctx.nv {
            let motion: SpatialVector = s.column(k).into_owned();
            own.set_column(k, &ycrb.mul_motion(&motion));
        }

        // Block row: M[dofs(i), subtree(i)] = S_iᵀ · F_i[:, subtree(i)]
        data.mass_matrix
            .view_mut((ctx.dof_adr, ctx.dof_adr), (ctx.nv, ctx.subtree_nv))
            .gemm_tr(1.0, s, &ctx.subtree_cols(&data.crb_force[i]), 0.0);

        let parent = model.jnt_parent[i];
        if parent == 0 {
            continue;
        }

        // Fold the subtree into the parent, in the parent's frame.
        let li_mi = data.li_mi[i];
        data.crb_inertia[parent] += li_mi.act_inertia(&ycrb);
        let (head, tail) = data.crb_force.split_at_mut(i);
        li_mi.act_force_set(
            &ctx.subtree_cols(&tail[0]),
            &mut ctx.subtree_cols_mut(&mut head[parent]),
        );
    }
}
