//! Per-joint index bookkeeping.

use nalgebra::{
    Dim, Dyn, Matrix, MatrixView, MatrixViewMut,
    storage::{RawStorage, RawStorageMut},
};

/// Where one joint's coordinates live in the model-wide vectors.
///
/// Built by [`Model::joint_context`](crate::Model::joint_context). The
/// velocity-indexed accessors select the `nv` columns starting at
/// `dof_adr`; the subtree variants extend that range to `subtree_nv`
/// columns, which is contiguous because joints are stored in depth-first
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointContext {
    /// Joint index.
    pub jnt_id: usize,
    /// Start of the joint's configuration segment.
    pub qpos_adr: usize,
    /// Start of the joint's velocity segment.
    pub dof_adr: usize,
    /// Configuration coordinates of the joint.
    pub nq: usize,
    /// Degrees of freedom of the joint.
    pub nv: usize,
    /// Degrees of freedom of the joint and all its descendants.
    pub subtree_nv: usize,
}

impl JointContext {
    /// The joint's slice of a configuration vector.
    #[must_use]
    pub fn q_segment<'a>(&self, q: &'a [f64]) -> &'a [f64] {
        &q[self.qpos_adr..self.qpos_adr + self.nq]
    }

    /// The joint's slice of a velocity vector.
    #[must_use]
    pub fn v_segment<'a>(&self, v: &'a [f64]) -> &'a [f64] {
        &v[self.dof_adr..self.dof_adr + self.nv]
    }

    /// The joint's columns of a velocity-indexed matrix.
    pub fn cols<'a, R, C, S>(
        &self,
        m: &'a Matrix<f64, R, C, S>,
    ) -> MatrixView<'a, f64, R, Dyn, S::RStride, S::CStride>
    where
        R: Dim,
        C: Dim,
        S: RawStorage<f64, R, C>,
    {
        m.columns(self.dof_adr, self.nv)
    }

    /// Mutable form of [`cols`](Self::cols).
    pub fn cols_mut<'a, R, C, S>(
        &self,
        m: &'a mut Matrix<f64, R, C, S>,
    ) -> MatrixViewMut<'a, f64, R, Dyn, S::RStride, S::CStride>
    where
        R: Dim,
        C: Dim,
        S: RawStorageMut<f64, R, C>,
    {
        m.columns_mut(self.dof_adr, self.nv)
    }

    /// Columns of the joint's whole subtree.
    pub fn subtree_cols<'a, R, C, S>(
        &self,
        m: &'a Matrix<f64, R, C, S>,
    ) -> MatrixView<'a, f64, R, Dyn, S::RStride, S::CStride>
    where
        R: Dim,
        C: Dim,
        S: RawStorage<f64, R, C>,
    {
        m.columns(self.dof_adr, self.subtree_nv)
    }

    /// Mutable form of [`subtree_cols`](Self::subtree_cols).
    pub fn subtree_cols_mut<'a, R, C, S>(
        &self,
        m: &'a mut Matrix<f64, R, C, S>,
    ) -> MatrixViewMut<'a, f64, R, Dyn, S::RStride, S::CStride>
    where
        R: Dim,
        C: Dim,
        S: RawStorageMut<f64, R, C>,
    {
        m.columns_mut(self.dof_adr, self.subtree_nv)
    }
}
