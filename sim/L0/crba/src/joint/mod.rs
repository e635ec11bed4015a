//! Joint models and their per-configuration kinematics.
//!
//! [`JointModel`] is the closed set of joint variants supported by the tree.
//! Every variant answers the same questions: how many configuration
//! coordinates (`nq`) and degrees of freedom (`nv`) it owns and, through
//! [`JointModel::calc`], where its child frame sits and which spatial
//! velocities it can produce for a given slice of the configuration.
//!
//! Motion subspaces are expressed in the joint's own (child) frame with
//! angular rows first.

mod composite;
mod context;

pub use composite::CompositeJoint;
pub use context::JointContext;

use nalgebra::{Matrix3, Matrix6xX, Quaternion, Rotation3, Unit, UnitQuaternion, Vector3};

use crate::dynamics::SpatialTransform;
use crate::types::JointError;

/// Accepted deviation of a configuration quaternion's norm from 1.
pub const QUATERNION_TOLERANCE: f64 = 1e-6;

/// Joint variant occupying one slot of the kinematic tree.
#[derive(Debug, Clone, PartialEq)]
pub enum JointModel {
    /// Rotation about a fixed unit axis (1 DOF).
    /// q: angle (rad). v: angular rate.
    Revolute {
        /// Rotation axis in the joint frame.
        axis: Unit<Vector3<f64>>,
    },
    /// Translation along a fixed unit axis (1 DOF).
    /// q: displacement. v: linear rate.
    Prismatic {
        /// Translation axis in the joint frame.
        axis: Unit<Vector3<f64>>,
    },
    /// Free rotation (3 DOF).
    /// q: unit quaternion `[w, x, y, z]`. v: body-frame angular velocity.
    Spherical,
    /// Free rotation parameterized by Z-Y-X Euler angles (3 DOF).
    /// q: `[z, y, x]` angles. v: Euler angle rates.
    SphericalZyx,
    /// Planar motion in the xy-plane (3 DOF).
    /// q: `[x, y, θ]`. v: body-frame `[vx, vy, ωz]`.
    Planar,
    /// Free translation (3 DOF).
    /// q: `[x, y, z]`. v: linear rates.
    Translation,
    /// Floating base (6 DOF).
    /// q: `[x, y, z, qw, qx, qy, qz]`. v: body-frame `[v, ω]`.
    FreeFlyer,
    /// Chain of joints separated by fixed placements, acting as one joint.
    Composite(CompositeJoint),
}

impl JointModel {
    /// Revolute joint about the joint frame's X axis.
    #[must_use]
    pub fn revolute_x() -> Self {
        Self::Revolute {
            axis: Vector3::x_axis(),
        }
    }

    /// Revolute joint about the joint frame's Y axis.
    #[must_use]
    pub fn revolute_y() -> Self {
        Self::Revolute {
            axis: Vector3::y_axis(),
        }
    }

    /// Revolute joint about the joint frame's Z axis.
    #[must_use]
    pub fn revolute_z() -> Self {
        Self::Revolute {
            axis: Vector3::z_axis(),
        }
    }

    /// Revolute joint about an arbitrary axis (normalized here).
    #[must_use]
    pub fn revolute(axis: Vector3<f64>) -> Self {
        Self::Revolute {
            axis: Unit::new_normalize(axis),
        }
    }

    /// Prismatic joint along an arbitrary axis (normalized here).
    #[must_use]
    pub fn prismatic(axis: Vector3<f64>) -> Self {
        Self::Prismatic {
            axis: Unit::new_normalize(axis),
        }
    }

    /// Number of configuration coordinates.
    #[must_use]
    pub fn nq(&self) -> usize {
        match self {
            Self::Revolute { .. } | Self::Prismatic { .. } => 1,
            Self::SphericalZyx | Self::Planar | Self::Translation => 3,
            Self::Spherical => 4,
            Self::FreeFlyer => 7,
            Self::Composite(c) => c.nq(),
        }
    }

    /// Number of degrees of freedom.
    #[must_use]
    pub fn nv(&self) -> usize {
        match self {
            Self::Revolute { .. } | Self::Prismatic { .. } => 1,
            Self::Spherical | Self::SphericalZyx | Self::Planar | Self::Translation => 3,
            Self::FreeFlyer => 6,
            Self::Composite(c) => c.nv(),
        }
    }

    /// Short human-readable name of the variant.
    #[must_use]
    pub fn shortname(&self) -> &'static str {
        match self {
            Self::Revolute { .. } => "revolute",
            Self::Prismatic { .. } => "prismatic",
            Self::Spherical => "spherical",
            Self::SphericalZyx => "spherical_zyx",
            Self::Planar => "planar",
            Self::Translation => "translation",
            Self::FreeFlyer => "free_flyer",
            Self::Composite(_) => "composite",
        }
    }

    /// Allocate the scratch buffers [`calc`](Self::calc) writes into.
    #[must_use]
    pub fn create_data(&self) -> JointData {
        let components = match self {
            Self::Composite(c) => c.create_component_data(),
            _ => Vec::new(),
        };
        JointData {
            placement: SpatialTransform::identity(),
            motion_subspace: Matrix6xX::zeros(self.nv()),
            components,
        }
    }

    /// Write the neutral configuration (zero motion) into `q`.
    ///
    /// `q` must have length [`nq`](Self::nq).
    pub fn neutral_into(&self, q: &mut [f64]) {
        q.fill(0.0);
        match self {
            Self::Spherical => q[0] = 1.0,
            Self::FreeFlyer => q[3] = 1.0,
            Self::Composite(c) => c.neutral_into(q),
            _ => {}
        }
    }

    /// Kinematic update for this joint's slice `q` of the configuration.
    ///
    /// On success `data.placement` holds the joint motion relative to the
    /// zero configuration and `data.motion_subspace` the 6 × `nv` motion
    /// subspace in the child frame. Configurations are never normalized: a
    /// quaternion off the unit sphere is reported, not repaired.
    pub fn calc(&self, q: &[f64], data: &mut JointData) -> Result<(), JointError> {
        if q.len() != self.nq() {
            return Err(JointError::SegmentLength {
                expected: self.nq(),
                actual: q.len(),
            });
        }

        match self {
            Self::Revolute { axis } => {
                data.placement = SpatialTransform::from_axis_angle(axis, q[0]);
                let s = &mut data.motion_subspace;
                s.fill(0.0);
                s.fixed_view_mut::<3, 1>(0, 0).copy_from(&axis.into_inner());
            }
            Self::Prismatic { axis } => {
                data.placement = SpatialTransform::from_translation(axis.into_inner() * q[0]);
                let s = &mut data.motion_subspace;
                s.fill(0.0);
                s.fixed_view_mut::<3, 1>(3, 0).copy_from(&axis.into_inner());
            }
            Self::Spherical => {
                let rotation = unit_quaternion_rotation(q[0], q[1], q[2], q[3])?;
                data.placement = SpatialTransform::new(rotation, Vector3::zeros());
                set_identity_block(&mut data.motion_subspace, 0, 0);
            }
            Self::SphericalZyx => {
                let (z, y, x) = (q[0], q[1], q[2]);
                let rotation = Rotation3::from_euler_angles(x, y, z).into_inner();
                data.placement = SpatialTransform::new(rotation, Vector3::zeros());
                let (sy, cy) = y.sin_cos();
                let (sx, cx) = x.sin_cos();
                let s = &mut data.motion_subspace;
                s.fill(0.0);
                s.fixed_view_mut::<3, 3>(0, 0).copy_from(&Matrix3::new(
                    -sy,
                    0.0,
                    1.0,
                    cy * sx,
                    cx,
                    0.0,
                    cy * cx,
                    -sx,
                    0.0,
                ));
            }
            Self::Planar => {
                let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), q[2]).into_inner();
                data.placement = SpatialTransform::new(rotation, Vector3::new(q[0], q[1], 0.0));
                let s = &mut data.motion_subspace;
                s.fill(0.0);
                s[(3, 0)] = 1.0;
                s[(4, 1)] = 1.0;
                s[(2, 2)] = 1.0;
            }
            Self::Translation => {
                data.placement =
                    SpatialTransform::from_translation(Vector3::new(q[0], q[1], q[2]));
                set_identity_block(&mut data.motion_subspace, 3, 0);
            }
            Self::FreeFlyer => {
                let rotation = unit_quaternion_rotation(q[3], q[4], q[5], q[6])?;
                data.placement = SpatialTransform::new(rotation, Vector3::new(q[0], q[1], q[2]));
                // DOF order [vx, vy, vz, ωx, ωy, ωz]
                let s = &mut data.motion_subspace;
                s.fill(0.0);
                for i in 0..3 {
                    s[(3 + i, i)] = 1.0;
                    s[(i, 3 + i)] = 1.0;
                }
            }
            Self::Composite(c) => c.calc(q, data)?,
        }
        Ok(())
    }
}

impl std::fmt::Display for JointModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Revolute { axis } | Self::Prismatic { axis } => write!(
                f,
                "{}({:.3}, {:.3}, {:.3})",
                self.shortname(),
                axis.x,
                axis.y,
                axis.z
            ),
            Self::Composite(c) => write!(f, "composite[{}]", c.len()),
            _ => f.write_str(self.shortname()),
        }
    }
}

/// Per-joint scratch produced by [`JointModel::calc`].
#[derive(Debug, Clone, PartialEq)]
pub struct JointData {
    /// Joint motion relative to the zero configuration.
    pub placement: SpatialTransform,
    /// Motion subspace S (6 × nv) in the child frame.
    pub motion_subspace: Matrix6xX<f64>,
    /// Scratch of the sub-joints of a composite joint.
    pub(crate) components: Vec<JointData>,
}

impl JointData {
    /// Whether these buffers were created for `joint`.
    #[must_use]
    pub fn fits(&self, joint: &JointModel) -> bool {
        if self.motion_subspace.ncols() != joint.nv() {
            return false;
        }
        match joint {
            JointModel::Composite(c) => {
                self.components.len() == c.len()
                    && c.iter()
                        .zip(&self.components)
                        .all(|((sub, _), data)| data.fits(sub))
            }
            _ => self.components.is_empty(),
        }
    }
}

fn set_identity_block(s: &mut Matrix6xX<f64>, row: usize, col: usize) {
    s.fill(0.0);
    for i in 0..3 {
        s[(row + i, col + i)] = 1.0;
    }
}

/// Rotation matrix of the quaternion `[w, x, y, z]`, which must be unit norm.
fn unit_quaternion_rotation(w: f64, x: f64, y: f64, z: f64) -> Result<Matrix3<f64>, JointError> {
    let quat = Quaternion::new(w, x, y, z);
    let norm = quat.norm();
    if !((norm - 1.0).abs() <= QUATERNION_TOLERANCE) {
        return Err(JointError::NonUnitQuaternion {
            norm,
            tolerance: QUATERNION_TOLERANCE,
        });
    }
    Ok(UnitQuaternion::new_unchecked(quat)
        .to_rotation_matrix()
        .into_inner())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector6;

    /// Spatial velocity of the child frame (in the child frame) produced by
    /// moving along `q + h·dq`, by finite differences of `calc`.
    fn finite_difference_twist(joint: &JointModel, q: &[f64], dq: &[f64]) -> Vector6<f64> {
        let h = 1e-7;
        let mut d0 = joint.create_data();
        let mut d1 = joint.create_data();
        joint.calc(q, &mut d0).unwrap();
        let q1: Vec<f64> = q.iter().zip(dq).map(|(a, b)| a + h * b).collect();
        joint.calc(&q1, &mut d1).unwrap();

        // M0⁻¹ M1 ≈ I + h [ω]^, translation ≈ h v
        let rel = d0.placement.inverse() * d1.placement;
        let w_hat = (rel.rotation - Matrix3::identity()) / h;
        let w = Vector3::new(w_hat[(2, 1)], w_hat[(0, 2)], w_hat[(1, 0)]);
        let v = rel.translation / h;
        Vector6::new(w.x, w.y, w.z, v.x, v.y, v.z)
    }

    fn assert_subspace_matches_derivative(joint: &JointModel, q: &[f64]) {
        let mut data = joint.create_data();
        joint.calc(q, &mut data).unwrap();
        for k in 0..joint.nv() {
            let mut dq = vec![0.0; joint.nq()];
            dq[k] = 1.0;
            let expected = finite_difference_twist(joint, q, &dq);
            let column: Vector6<f64> = data.motion_subspace.column(k).into_owned();
            assert_relative_eq!(column, expected, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(JointModel::revolute_z().nv(), 1);
        assert_eq!(JointModel::Spherical.nq(), 4);
        assert_eq!(JointModel::Spherical.nv(), 3);
        assert_eq!(JointModel::FreeFlyer.nq(), 7);
        assert_eq!(JointModel::FreeFlyer.nv(), 6);
        assert_eq!(JointModel::Planar.nv(), 3);
    }

    #[test]
    fn test_revolute_subspace() {
        let joint = JointModel::revolute(Vector3::new(1.0, 2.0, -0.5));
        assert_subspace_matches_derivative(&joint, &[0.8]);
    }

    #[test]
    fn test_prismatic_subspace() {
        let joint = JointModel::prismatic(Vector3::new(0.0, 1.0, 1.0));
        assert_subspace_matches_derivative(&joint, &[-0.3]);
    }

    #[test]
    fn test_spherical_zyx_subspace() {
        assert_subspace_matches_derivative(&JointModel::SphericalZyx, &[0.4, -0.9, 1.3]);
    }

    #[test]
    fn test_translation_subspace() {
        assert_subspace_matches_derivative(&JointModel::Translation, &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_spherical_neutral_is_identity() {
        let joint = JointModel::Spherical;
        let mut q = vec![0.0; joint.nq()];
        joint.neutral_into(&mut q);
        assert_eq!(q, vec![1.0, 0.0, 0.0, 0.0]);

        let mut data = joint.create_data();
        joint.calc(&q, &mut data).unwrap();
        assert_relative_eq!(data.placement.rotation, Matrix3::identity(), epsilon = 1e-15);
        assert_eq!(data.motion_subspace.fixed_view::<3, 3>(0, 0), Matrix3::identity());
    }

    #[test]
    fn test_planar_placement() {
        let joint = JointModel::Planar;
        let mut data = joint.create_data();
        joint
            .calc(&[1.0, 2.0, std::f64::consts::FRAC_PI_2], &mut data)
            .unwrap();
        assert_relative_eq!(data.placement.translation, Vector3::new(1.0, 2.0, 0.0));
        // Body x axis points along world y after a quarter turn.
        assert_relative_eq!(
            data.placement.rotation * Vector3::x(),
            Vector3::y(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_free_flyer_placement() {
        let joint = JointModel::FreeFlyer;
        let half = std::f64::consts::FRAC_1_SQRT_2;
        let q = [1.0, -2.0, 3.0, half, 0.0, 0.0, half];
        let mut data = joint.create_data();
        joint.calc(&q, &mut data).unwrap();
        assert_relative_eq!(data.placement.translation, Vector3::new(1.0, -2.0, 3.0));
        assert_relative_eq!(
            data.placement.rotation * Vector3::x(),
            Vector3::y(),
            epsilon = 1e-12
        );
        // Linear DOFs first, angular second.
        assert_eq!(data.motion_subspace[(3, 0)], 1.0);
        assert_eq!(data.motion_subspace[(0, 3)], 1.0);
    }

    #[test]
    fn test_non_unit_quaternion_rejected() {
        let joint = JointModel::Spherical;
        let mut data = joint.create_data();
        let err = joint.calc(&[1.0, 1.0, 0.0, 0.0], &mut data).unwrap_err();
        assert!(matches!(err, JointError::NonUnitQuaternion { .. }));

        let err = joint.calc(&[f64::NAN, 0.0, 0.0, 0.0], &mut data).unwrap_err();
        assert!(matches!(err, JointError::NonUnitQuaternion { .. }));
    }

    #[test]
    fn test_segment_length_checked() {
        let joint = JointModel::revolute_x();
        let mut data = joint.create_data();
        let err = joint.calc(&[0.0, 1.0], &mut data).unwrap_err();
        assert_eq!(
            err,
            JointError::SegmentLength {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(JointModel::revolute_z().to_string(), "revolute(0.000, 0.000, 1.000)");
        assert_eq!(JointModel::FreeFlyer.to_string(), "free_flyer");
    }
}
