//! Per-configuration scratch buffers.
//!
//! [`Data`] holds everything the recursive passes write. It is created by
//! [`Model::make_data`](super::Model::make_data), sized once for that model,
//! and then reused across calls: every entry point overwrites the buffers it
//! reads, so nothing carries over between configurations.

use nalgebra::{DMatrix, Matrix6xX};

use super::model::Model;
use crate::dynamics::{SpatialInertia, SpatialTransform, SpatialVector};
use crate::joint::JointData;

/// Mutable per-configuration state (like `mjData`, restricted to the
/// quantities needed for the joint-space inertia).
///
/// All `Vec` fields are indexed by joint id and have `model.njnt` entries.
/// Entry 0 (the universe) is never written by the passes.
#[derive(Debug, Clone)]
pub struct Data {
    /// Placement of each joint frame in its parent joint frame at the current
    /// configuration (`jnt_placement ∘ joint motion`).
    pub li_mi: Vec<SpatialTransform>,
    /// Placement of each joint frame in the world frame.
    pub o_mi: Vec<SpatialTransform>,
    /// Output of each joint's kinematic update (placement, motion subspace).
    pub joint_data: Vec<JointData>,
    /// Composite inertia of the subtree rooted at each joint, in its frame.
    pub crb_inertia: Vec<SpatialInertia>,
    /// Force subspace per joint (6 × nv). Joint `i` only writes the columns
    /// of its own subtree.
    pub crb_force: Vec<Matrix6xX<f64>>,
    /// Body spatial velocity of each joint frame, in that frame.
    pub body_velocity: Vec<SpatialVector>,
    /// Joint-space inertia matrix (nv × nv).
    pub mass_matrix: DMatrix<f64>,
}

impl Data {
    /// Whether these buffers were allocated for `model`.
    #[must_use]
    pub fn fits(&self, model: &Model) -> bool {
        self.joint_data.len() == model.njnt
            && self.li_mi.len() == model.njnt
            && self.o_mi.len() == model.njnt
            && self.crb_inertia.len() == model.njnt
            && self.crb_force.len() == model.njnt
            && self.body_velocity.len() == model.njnt
            && self.mass_matrix.nrows() == model.nv
            && self.mass_matrix.ncols() == model.nv
            && self.crb_force.iter().all(|f| f.ncols() == model.nv)
            && self
                .joint_data
                .iter()
                .zip(&model.joints)
                .all(|(data, joint)| data.fits(joint))
    }

    /// Number of degrees of freedom these buffers were sized for.
    #[must_use]
    pub fn nv(&self) -> usize {
        self.mass_matrix.nrows()
    }

    /// Mirror the upper triangle of the mass matrix into the lower triangle.
    pub fn symmetrize_mass_matrix(&mut self) {
        self.mass_matrix.fill_lower_triangle_with_upper_triangle();
    }

    /// Full symmetric copy of the mass matrix, leaving the buffer untouched.
    #[must_use]
    pub fn symmetric_mass_matrix(&self) -> DMatrix<f64> {
        let mut m = self.mass_matrix.clone();
        m.fill_lower_triangle_with_upper_triangle();
        m
    }
}
