//! Kinetic energy from body spatial velocities.
//!
//! Computes `T = ½ Σ vᵢᵀ Yᵢ vᵢ` by propagating body velocities from the root,
//! without forming the mass matrix. Since `T = ½ q̇ᵀ M q̇`, this gives an
//! independent reference for [`crba`](crate::crba).

use nalgebra::DVector;

use crate::dynamics::SpatialVector;
use crate::dynamics::crba::check_inputs;
use crate::kinematics::update_joint_placements;
use crate::types::{CrbaConfig, CrbaError, Data, Model};

/// Kinetic energy of the tree at configuration `q` and velocity `v`.
///
/// Fills `data.li_mi`, `data.joint_data` and `data.body_velocity` along the
/// way. Body velocities are expressed in each joint's own frame:
///
/// ```text
/// v_i = li_mi[i]⁻¹ · v_parent + S_i · q̇_i
/// ```
///
/// # Errors
///
/// The same precondition and joint errors as [`crba`](crate::crba), plus
/// [`CrbaError::VelocitySize`] when `v.len() != model.nv`.
pub fn kinetic_energy(
    model: &Model,
    data: &mut Data,
    q: &DVector<f64>,
    v: &DVector<f64>,
) -> Result<f64, CrbaError> {
    let q = q.as_slice();
    check_inputs(model, data, q, &CrbaConfig::default())?;
    if v.len() != model.nv {
        return Err(CrbaError::VelocitySize {
            expected: model.nv,
            actual: v.len(),
        });
    }
    tracing::trace!("kinetic_energy: njnt {}, nv {}", model.njnt, model.nv);

    update_joint_placements(model, data, q)?;

    let mut energy = 0.0;
    data.body_velocity[0] = SpatialVector::zeros();
    for i in 1..model.njnt {
        let ctx = model.joint_context(i);
        let s = &data.joint_data[i].motion_subspace;

        let mut vel = data.li_mi[i].act_inv_motion(&data.body_velocity[model.jnt_parent[i]]);
        for (k, &qdot) in ctx.v_segment(v.as_slice()).iter().enumerate() {
            vel += s.column(k) * qdot;
        }

        energy += model.body_inertia[i].kinetic_energy(&vel);
        data.body_velocity[i] = vel;
    }
    Ok(energy)
}
