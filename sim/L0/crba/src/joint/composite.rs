//! Composite joints: a chain of joints collapsed into one tree slot.

use crate::dynamics::SpatialTransform;
use crate::types::JointError;

use super::{JointData, JointModel};

/// Sequence of sub-joints `J0, J1, …` with fixed placements `P0, P1, …`.
///
/// The composite placement is `P0 · J0(q0) · P1 · J1(q1) · …` and its motion
/// subspace stacks each sub-joint's subspace, re-expressed in the frame at
/// the end of the chain. Configuration and velocity segments are the
/// sub-joints' segments concatenated in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositeJoint {
    joints: Vec<JointModel>,
    placements: Vec<SpatialTransform>,
    nq: usize,
    nv: usize,
}

impl CompositeJoint {
    /// Empty composite (no sub-joints, `nq = nv = 0`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sub-joint preceded by a fixed placement.
    pub fn push(&mut self, joint: JointModel, placement: SpatialTransform) {
        self.nq += joint.nq();
        self.nv += joint.nv();
        self.joints.push(joint);
        self.placements.push(placement);
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with_joint(mut self, joint: JointModel, placement: SpatialTransform) -> Self {
        self.push(joint, placement);
        self
    }

    /// Number of sub-joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether the composite has no sub-joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Total configuration coordinates.
    #[must_use]
    pub fn nq(&self) -> usize {
        self.nq
    }

    /// Total degrees of freedom.
    #[must_use]
    pub fn nv(&self) -> usize {
        self.nv
    }

    /// Sub-joints with the fixed placement preceding each.
    pub fn iter(&self) -> impl Iterator<Item = (&JointModel, &SpatialTransform)> {
        self.joints.iter().zip(&self.placements)
    }

    pub(super) fn create_component_data(&self) -> Vec<JointData> {
        self.joints.iter().map(JointModel::create_data).collect()
    }

    pub(super) fn neutral_into(&self, q: &mut [f64]) {
        let mut adr = 0;
        for joint in &self.joints {
            let nq = joint.nq();
            joint.neutral_into(&mut q[adr..adr + nq]);
            adr += nq;
        }
    }

    pub(super) fn calc(&self, q: &[f64], data: &mut JointData) -> Result<(), JointError> {
        let JointData {
            placement,
            motion_subspace,
            components,
        } = data;

        // Sub-joint kinematics and the end-of-chain placement.
        let mut end = SpatialTransform::identity();
        let mut q_adr = 0;
        for ((joint, fixed), sub) in self.iter().zip(components.iter_mut()) {
            let nq = joint.nq();
            joint.calc(&q[q_adr..q_adr + nq], sub)?;
            end = end * *fixed * sub.placement;
            q_adr += nq;
        }
        *placement = end;

        // Re-express each sub-joint subspace in the end frame: endMk = end⁻¹ · oMk.
        let end_inv = end.inverse();
        let mut frame = SpatialTransform::identity();
        let mut v_adr = 0;
        for ((joint, fixed), sub) in self.iter().zip(components.iter()) {
            frame = frame * *fixed * sub.placement;
            let nv = joint.nv();
            let mut cols = motion_subspace.columns_mut(v_adr, nv);
            cols.copy_from(&sub.motion_subspace);
            (end_inv * frame).act_motion_set(&mut cols);
            v_adr += nv;
        }
        Ok(())
    }
}
