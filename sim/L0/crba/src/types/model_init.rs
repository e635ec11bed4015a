//! Model construction, index bookkeeping and validation.
//!
//! Joints are appended one at a time with [`Model::add_joint`], which keeps
//! every precomputed index (`jnt_qpos_adr`, `jnt_dof_adr`, `jnt_subtree_nv`)
//! current so the recursive passes never recompute them. Models assembled
//! by hand can be brought back into a consistent state with
//! [`Model::compute_joint_offsets`] and checked with [`Model::validate`].

use nalgebra::{DMatrix, DVector, Matrix6xX};

use super::data::Data;
use super::enums::ModelError;
use super::model::Model;
use crate::dynamics::{SpatialInertia, SpatialTransform, SpatialVector};
use crate::joint::{CompositeJoint, JointModel};

/// Name of joint slot 0.
pub const UNIVERSE_NAME: &str = "universe";

impl Model {
    /// Create a model containing only the universe.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            nq: 0,
            nv: 0,
            njnt: 1,
            joints: vec![JointModel::Composite(CompositeJoint::new())],
            jnt_parent: vec![0],
            jnt_placement: vec![SpatialTransform::identity()],
            jnt_name: vec![UNIVERSE_NAME.to_string()],
            jnt_qpos_adr: vec![0],
            jnt_dof_adr: vec![0],
            jnt_subtree_nv: vec![0],
            body_inertia: vec![SpatialInertia::zero()],
            qpos0: DVector::zeros(0),
        }
    }

    /// Append a joint below `parent` and return its index.
    ///
    /// The new joint carries no mass until bodies are attached with
    /// [`append_body`](Self::append_body). `placement` locates the joint frame
    /// in the parent joint frame at zero configuration.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UnknownJoint`] if `parent` does not exist.
    /// - [`ModelError::BranchOrder`] if `parent` is not on the branch ending
    ///   at the most recently added joint. Attaching elsewhere would break
    ///   the contiguity of subtree velocity indices.
    /// - [`ModelError::NoDegreesOfFreedom`] if `joint.nv() == 0`.
    pub fn add_joint(
        &mut self,
        parent: usize,
        joint: JointModel,
        placement: SpatialTransform,
        name: impl Into<String>,
    ) -> Result<usize, ModelError> {
        let name = name.into();
        let id = self.njnt;
        if parent >= self.njnt {
            return Err(ModelError::UnknownJoint {
                index: parent,
                njnt: self.njnt,
            });
        }
        if !self.is_ancestor(parent, id - 1) {
            return Err(ModelError::BranchOrder { joint: id, parent });
        }
        if joint.nv() == 0 {
            return Err(ModelError::NoDegreesOfFreedom { name });
        }

        Ok(self.push_joint(parent, joint, placement, name))
    }

    /// Append a joint without checking it. Callers guarantee that `parent`
    /// is on the current branch and that the joint has DOFs.
    pub(crate) fn push_joint(
        &mut self,
        parent: usize,
        joint: JointModel,
        placement: SpatialTransform,
        name: String,
    ) -> usize {
        let id = self.njnt;
        let (nq, nv) = (joint.nq(), joint.nv());
        tracing::debug!(
            "adding {} joint '{}' (id {}, parent {}, nq {}, nv {})",
            joint,
            name,
            id,
            parent,
            nq,
            nv
        );

        // Neutral segment appended to qpos0.
        let mut neutral = vec![0.0; nq];
        joint.neutral_into(&mut neutral);
        let qpos0 = self.qpos0.iter().copied().chain(neutral).collect::<Vec<_>>();
        self.qpos0 = DVector::from_vec(qpos0);

        self.jnt_qpos_adr.push(self.nq);
        self.jnt_dof_adr.push(self.nv);
        self.jnt_subtree_nv.push(nv);
        self.jnt_parent.push(parent);
        self.jnt_placement.push(placement);
        self.jnt_name.push(name);
        self.joints.push(joint);
        self.body_inertia.push(SpatialInertia::zero());

        // Every ancestor's subtree grows by the new joint's DOFs.
        let mut j = parent;
        loop {
            self.jnt_subtree_nv[j] += nv;
            if j == 0 {
                break;
            }
            j = self.jnt_parent[j];
        }

        self.nq += nq;
        self.nv += nv;
        self.njnt += 1;
        id
    }

    /// Rigidly attach a body to `joint`.
    ///
    /// `placement` locates the body frame in the joint frame. The body's
    /// inertia is moved into the joint frame and summed with whatever the
    /// joint already carries.
    ///
    /// # Errors
    ///
    /// - [`ModelError::UniverseJoint`] for `joint == 0`.
    /// - [`ModelError::UnknownJoint`] if `joint` does not exist.
    pub fn append_body(
        &mut self,
        joint: usize,
        inertia: SpatialInertia,
        placement: SpatialTransform,
    ) -> Result<(), ModelError> {
        if joint == 0 {
            return Err(ModelError::UniverseJoint);
        }
        if joint >= self.njnt {
            return Err(ModelError::UnknownJoint {
                index: joint,
                njnt: self.njnt,
            });
        }
        if !inertia.is_physical() {
            tracing::warn!(
                "Body attached to joint '{}' has a non-physical inertia (mass {}, diagonal {:?})",
                self.jnt_name[joint],
                inertia.mass,
                inertia.inertia.diagonal().as_slice()
            );
        }
        self.body_inertia[joint] += placement.act_inertia(&inertia);
        Ok(())
    }

    /// Recompute `nq`, `nv`, configuration/velocity offsets, subtree DOF
    /// counts and `qpos0` from `jnt_parent` and `joints`.
    ///
    /// Needed only after editing the joint arrays directly; `add_joint`
    /// keeps them current.
    pub fn compute_joint_offsets(&mut self) {
        self.njnt = self.joints.len();
        let mut nq = 0;
        let mut nv = 0;
        self.jnt_qpos_adr.clear();
        self.jnt_dof_adr.clear();
        let mut qpos0 = Vec::new();
        for joint in &self.joints {
            self.jnt_qpos_adr.push(nq);
            self.jnt_dof_adr.push(nv);
            let start = qpos0.len();
            qpos0.resize(start + joint.nq(), 0.0);
            joint.neutral_into(&mut qpos0[start..]);
            nq += joint.nq();
            nv += joint.nv();
        }
        self.nq = nq;
        self.nv = nv;
        self.qpos0 = DVector::from_vec(qpos0);
        self.jnt_subtree_nv = self.compute_subtree_dofs();
    }

    /// DOF count of every subtree, accumulated leaf to root.
    ///
    /// Relies on `jnt_parent[i] < i`; entry 0 is the total for the model.
    #[must_use]
    pub fn compute_subtree_dofs(&self) -> Vec<usize> {
        let mut subtree: Vec<usize> = self.joints.iter().map(JointModel::nv).collect();
        for i in (1..self.joints.len()).rev() {
            let parent = self.jnt_parent[i];
            subtree[parent] += subtree[i];
        }
        subtree
    }

    /// Check the structural invariants the recursive passes rely on.
    ///
    /// # Errors
    ///
    /// The first violated invariant, in this order: array lengths, parent
    /// ordering, depth-first branch ordering, per-joint DOFs, offsets,
    /// totals, subtree DOF counts.
    pub fn validate(&self) -> Result<(), ModelError> {
        let njnt = self.njnt;
        for (field, actual) in [
            ("joints", self.joints.len()),
            ("jnt_parent", self.jnt_parent.len()),
            ("jnt_placement", self.jnt_placement.len()),
            ("jnt_name", self.jnt_name.len()),
            ("jnt_qpos_adr", self.jnt_qpos_adr.len()),
            ("jnt_dof_adr", self.jnt_dof_adr.len()),
            ("jnt_subtree_nv", self.jnt_subtree_nv.len()),
            ("body_inertia", self.body_inertia.len()),
        ] {
            if actual != njnt || njnt == 0 {
                return Err(ModelError::ArrayLength {
                    field,
                    expected: njnt.max(1),
                    actual,
                });
            }
        }

        if self.jnt_parent[0] != 0 {
            return Err(ModelError::ParentOrder {
                joint: 0,
                parent: self.jnt_parent[0],
            });
        }
        if self.joints[0].nv() != 0 {
            return Err(ModelError::IndexMismatch {
                joint: 0,
                field: "nv",
                expected: 0,
                actual: self.joints[0].nv(),
            });
        }

        let mut nq = 0;
        let mut nv = 0;
        for i in 1..njnt {
            let parent = self.jnt_parent[i];
            if parent >= i {
                return Err(ModelError::ParentOrder { joint: i, parent });
            }
            if !self.is_ancestor(parent, i - 1) {
                return Err(ModelError::BranchOrder { joint: i, parent });
            }
            let joint = &self.joints[i];
            if joint.nv() == 0 {
                return Err(ModelError::NoDegreesOfFreedom {
                    name: self.jnt_name[i].clone(),
                });
            }
            check_index(i, "jnt_qpos_adr", nq, self.jnt_qpos_adr[i])?;
            check_index(i, "jnt_dof_adr", nv, self.jnt_dof_adr[i])?;
            nq += joint.nq();
            nv += joint.nv();
        }
        check_index(0, "nq", nq, self.nq)?;
        check_index(0, "nv", nv, self.nv)?;
        if self.qpos0.len() != nq {
            return Err(ModelError::ArrayLength {
                field: "qpos0",
                expected: nq,
                actual: self.qpos0.len(),
            });
        }

        for (i, (&expected, &actual)) in self
            .compute_subtree_dofs()
            .iter()
            .zip(&self.jnt_subtree_nv)
            .enumerate()
        {
            check_index(i, "jnt_subtree_nv", expected, actual)?;
        }

        tracing::debug!(
            "model '{}' validated: njnt {}, nq {}, nv {}",
            self.name,
            njnt,
            nq,
            nv
        );
        Ok(())
    }

    /// Allocate a [`Data`] sized for this model.
    #[must_use]
    pub fn make_data(&self) -> Data {
        Data {
            li_mi: vec![SpatialTransform::identity(); self.njnt],
            o_mi: vec![SpatialTransform::identity(); self.njnt],
            joint_data: self.joints.iter().map(JointModel::create_data).collect(),
            crb_inertia: vec![SpatialInertia::zero(); self.njnt],
            crb_force: vec![Matrix6xX::zeros(self.nv); self.njnt],
            body_velocity: vec![SpatialVector::zeros(); self.njnt],
            mass_matrix: DMatrix::zeros(self.nv, self.nv),
        }
    }
}

fn check_index(
    joint: usize,
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::IndexMismatch {
            joint,
            field,
            expected,
            actual,
        })
    }
}
