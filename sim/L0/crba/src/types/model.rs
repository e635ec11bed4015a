//! Model struct definition and field accessors.
//!
//! [`Model`] is the static, immutable description of the kinematic tree:
//! topology, joint variants, fixed placements, body inertias and the index
//! bookkeeping the recursive passes rely on. It is built once (see
//! `model_init` and `model_factories`) and shared read-only by any number
//! of [`Data`](super::Data) instances.

use nalgebra::DVector;

use crate::dynamics::{SpatialInertia, SpatialTransform};
use crate::joint::{JointContext, JointModel};

/// Static kinematic tree.
///
/// # Memory Layout
///
/// Every `jnt_*` array (and `joints`, `body_inertia`) is indexed by joint id.
/// Slot 0 is the universe: an empty composite joint with no coordinates and
/// no mass. Real joints occupy `1..njnt` and are stored so that every
/// parent precedes its children (`jnt_parent[i] < i`). Because joints are
/// appended depth-first, the velocity indices of a subtree rooted at `i`
/// are the contiguous range `jnt_dof_adr[i] .. jnt_dof_adr[i] + jnt_subtree_nv[i]`.
#[derive(Debug, Clone)]
pub struct Model {
    // ==================== Metadata ====================
    /// Model name.
    pub name: String,

    // ==================== Dimensions ====================
    /// Number of configuration coordinates (includes quaternions).
    pub nq: usize,
    /// Number of degrees of freedom (always <= nq).
    pub nv: usize,
    /// Number of joint slots, including the universe.
    pub njnt: usize,

    // ==================== Joints ====================
    /// Joint variant per slot.
    pub joints: Vec<JointModel>,
    /// Parent joint (`jnt_parent[0] == 0`).
    pub jnt_parent: Vec<usize>,
    /// Fixed placement of the joint frame in the parent joint frame at zero
    /// configuration.
    pub jnt_placement: Vec<SpatialTransform>,
    /// Joint names (`"universe"` for slot 0).
    pub jnt_name: Vec<String>,
    /// Start of each joint's configuration segment.
    pub jnt_qpos_adr: Vec<usize>,
    /// Start of each joint's velocity segment.
    pub jnt_dof_adr: Vec<usize>,
    /// Degrees of freedom of the subtree rooted at each joint.
    pub jnt_subtree_nv: Vec<usize>,

    // ==================== Bodies ====================
    /// Spatial inertia of the body carried by each joint, in the joint frame.
    pub body_inertia: Vec<SpatialInertia>,

    // ==================== Defaults ====================
    /// Neutral configuration (zero angles, identity quaternions).
    pub qpos0: DVector<f64>,
}

impl Model {
    /// Index bookkeeping of joint `jnt_id`.
    ///
    /// # Panics
    /// Panics if `jnt_id >= njnt`.
    #[must_use]
    pub fn joint_context(&self, jnt_id: usize) -> JointContext {
        JointContext {
            jnt_id,
            qpos_adr: self.jnt_qpos_adr[jnt_id],
            dof_adr: self.jnt_dof_adr[jnt_id],
            nq: self.joints[jnt_id].nq(),
            nv: self.joints[jnt_id].nv(),
            subtree_nv: self.jnt_subtree_nv[jnt_id],
        }
    }

    /// Look up a joint by name.
    #[must_use]
    pub fn joint_id(&self, name: &str) -> Option<usize> {
        self.jnt_name.iter().position(|n| n == name)
    }

    /// Whether `ancestor` lies on the path from `descendant` to the universe.
    ///
    /// A joint counts as its own ancestor. The universe is an ancestor of
    /// every joint.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: usize, descendant: usize) -> bool {
        if descendant >= self.njnt {
            return false;
        }
        let mut j = descendant;
        loop {
            if j == ancestor {
                return true;
            }
            if j == 0 || j < ancestor {
                return false;
            }
            j = self.jnt_parent[j];
        }
    }

    /// Joint owning velocity index `dof`, if any.
    #[must_use]
    pub fn dof_joint(&self, dof: usize) -> Option<usize> {
        (1..self.njnt).find(|&i| {
            let start = self.jnt_dof_adr[i];
            dof >= start && dof < start + self.joints[i].nv()
        })
    }

    /// Copy of the neutral configuration.
    #[must_use]
    pub fn neutral(&self) -> DVector<f64> {
        self.qpos0.clone()
    }

    /// Children of joint `jnt_id`, in index order.
    pub fn children(&self, jnt_id: usize) -> impl Iterator<Item = usize> + '_ {
        (jnt_id + 1..self.njnt).filter(move |&i| self.jnt_parent[i] == jnt_id)
    }

    /// Total mass of all bodies.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.body_inertia.iter().map(|b| b.mass).sum()
    }
}
