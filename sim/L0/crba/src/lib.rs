//! Joint-space inertia matrix of articulated rigid-body trees.
//!
//! This crate computes the mass matrix `M(q)` of a kinematic tree with the
//! Composite Rigid Body Algorithm (CRBA). It follows the same Model/Data
//! split as the rest of the simulation stack:
//!
//! - [`Model`] is static: tree topology, joint variants, fixed placements,
//!   body inertias and precomputed index bookkeeping
//! - [`Data`] is per-configuration scratch, exclusively borrowed by each call
//! - [`crba`] sweeps the tree root-to-leaves then leaves-to-root and returns a
//!   borrow of `Data`'s mass matrix
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Model                               │
//! │  Static: jnt_parent, joints, jnt_placement, body_inertia,   │
//! │          jnt_qpos_adr, jnt_dof_adr, jnt_subtree_nv          │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Data                               │
//! │  q → joint calc → li_mi → crb_inertia / crb_force → M       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Layer 0 Crate
//!
//! No rendering or engine dependencies; only `nalgebra` for the linear
//! algebra. It can be used in headless training loops, controllers and
//! analysis tools.
//!
//! # Quick Start
//!
//! ```
//! use nalgebra::{DVector, Vector3};
//! use sim_crba::{JointModel, Model, SpatialInertia, SpatialTransform, crba};
//!
//! let mut model = Model::empty();
//! let shoulder = model
//!     .add_joint(0, JointModel::revolute_z(), SpatialTransform::identity(), "shoulder")
//!     .unwrap();
//! model
//!     .append_body(
//!         shoulder,
//!         SpatialInertia::point_mass(1.0, Vector3::new(1.0, 0.0, 0.0)),
//!         SpatialTransform::identity(),
//!     )
//!     .unwrap();
//!
//! let mut data = model.make_data();
//! let m = crba(&model, &mut data, &DVector::from_vec(vec![0.3])).unwrap();
//! assert!((m[(0, 0)] - 1.0).abs() < 1e-12);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-crba/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,       // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,           // mul_add style changes aren't always clearer
    clippy::neg_cmp_op_on_partial_ord,  // !(x >= 0.0) is intentional for NaN rejection
    clippy::many_single_char_names,     // q, v, s, m, p follow the dynamics literature
    clippy::doc_markdown,               // Not all technical terms need backticks
)]

// Model, Data, errors, configuration
pub mod types;

// Spatial algebra, spatial inertia, CRBA
pub mod dynamics;

// Joint variants, per-joint scratch and index bookkeeping
pub mod joint;

// Joint placements and world placements
pub mod kinematics;

// Kinetic energy from body velocities
pub mod energy;

// Batched CRBA (N configurations sharing one Model)
pub mod batch;

pub use batch::BatchCrba;
pub use dynamics::{SpatialInertia, SpatialTransform, SpatialVector, crba, crba_with_config};
pub use energy::kinetic_energy;
pub use joint::{CompositeJoint, JointContext, JointData, JointModel};
pub use kinematics::forward_kinematics;
pub use types::{
    CrbaConfig, CrbaError, Data, JointError, MassMatrixFill, Model, ModelError, UNIVERSE_NAME,
};
