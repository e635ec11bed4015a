//! Forward kinematics over the joint tree.
//!
//! [`update_joint_placements`] is the joint loop shared by every
//! per-configuration algorithm: it runs each joint's `calc` on its slice of
//! `q` and composes the result with the joint's fixed placement.
//! [`forward_kinematics`] additionally chains those placements from the root
//! to get world placements.

use nalgebra::DVector;

use crate::dynamics::SpatialTransform;
use crate::dynamics::crba::check_inputs;
use crate::types::{CrbaConfig, CrbaError, Data, Model};

/// Run every joint's kinematic update and fill `li_mi` and `joint_data`.
///
/// Assumes sizes were checked by the caller.
pub(crate) fn update_joint_placements(
    model: &Model,
    data: &mut Data,
    q: &[f64],
) -> Result<(), CrbaError> {
    for i in 1..model.njnt {
        let ctx = model.joint_context(i);
        let joint_data = &mut data.joint_data[i];
        model.joints[i]
            .calc(ctx.q_segment(q), joint_data)
            .map_err(|e| CrbaError::joint(i, e))?;
        data.li_mi[i] = model.jnt_placement[i] * joint_data.placement;
    }
    Ok(())
}

/// Compute `li_mi`, `joint_data` and world placements `o_mi` at `q`.
///
/// # Errors
///
/// The same precondition and joint errors as [`crba`](crate::crba).
pub fn forward_kinematics(
    model: &Model,
    data: &mut Data,
    q: &DVector<f64>,
) -> Result<(), CrbaError> {
    let q = q.as_slice();
    check_inputs(model, data, q, &CrbaConfig::default())?;
    tracing::trace!("forward_kinematics: njnt {}", model.njnt);

    update_joint_placements(model, data, q)?;
    data.o_mi[0] = SpatialTransform::identity();
    for i in 1..model.njnt {
        data.o_mi[i] = data.o_mi[model.jnt_parent[i]] * data.li_mi[i];
    }
    Ok(())
}
